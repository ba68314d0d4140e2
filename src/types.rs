use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDescriptor {
    pub layout_index: usize,
    pub layout_name: String,
    pub placeholders: Vec<PlaceholderDescriptor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDescriptor {
    pub idx: u32,
    #[serde(rename = "type")]
    pub kind: PlaceholderType,
}

/// Kind of content slot, one variant per `ST_PlaceholderType` token.
///
/// Serialized with stable snake_case names instead of the raw XML tokens so
/// that clients never see the abbreviated schema spelling (`ctrTitle`, `dt`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderType {
    Title,
    Body,
    CenterTitle,
    Subtitle,
    Date,
    SlideNumber,
    Footer,
    Header,
    #[default]
    Object,
    Chart,
    Table,
    ClipArt,
    OrgChart,
    MediaClip,
    SlideImage,
    Picture,
}

impl PlaceholderType {
    /// Maps the `type` attribute of `<p:ph>`. A missing attribute means `obj`.
    pub fn from_xml_token(token: &str) -> Option<Self> {
        let kind = match token {
            "title" => PlaceholderType::Title,
            "body" => PlaceholderType::Body,
            "ctrTitle" => PlaceholderType::CenterTitle,
            "subTitle" => PlaceholderType::Subtitle,
            "dt" => PlaceholderType::Date,
            "sldNum" => PlaceholderType::SlideNumber,
            "ftr" => PlaceholderType::Footer,
            "hdr" => PlaceholderType::Header,
            "obj" => PlaceholderType::Object,
            "chart" => PlaceholderType::Chart,
            "tbl" => PlaceholderType::Table,
            "clipArt" => PlaceholderType::ClipArt,
            "dgm" => PlaceholderType::OrgChart,
            "media" => PlaceholderType::MediaClip,
            "sldImg" => PlaceholderType::SlideImage,
            "pic" => PlaceholderType::Picture,
            _ => return None,
        };
        Some(kind)
    }

    pub fn as_xml_token(&self) -> &'static str {
        match self {
            PlaceholderType::Title => "title",
            PlaceholderType::Body => "body",
            PlaceholderType::CenterTitle => "ctrTitle",
            PlaceholderType::Subtitle => "subTitle",
            PlaceholderType::Date => "dt",
            PlaceholderType::SlideNumber => "sldNum",
            PlaceholderType::Footer => "ftr",
            PlaceholderType::Header => "hdr",
            PlaceholderType::Object => "obj",
            PlaceholderType::Chart => "chart",
            PlaceholderType::Table => "tbl",
            PlaceholderType::ClipArt => "clipArt",
            PlaceholderType::OrgChart => "dgm",
            PlaceholderType::MediaClip => "media",
            PlaceholderType::SlideImage => "sldImg",
            PlaceholderType::Picture => "pic",
        }
    }
}

/// A single `<Relationship>` entry of a `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}
