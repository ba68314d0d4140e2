use crate::constants::{P_NAMESPACE, RELS_NAMESPACE};
use crate::types::{PlaceholderDescriptor, PlaceholderType};
use crate::{Error, Result};
use roxmltree::{Document, Node};

/// Shape elements of `<p:spTree>` that may carry a `<p:ph>` marker.
const SHAPE_TAGS: [&str; 5] = ["sp", "pic", "graphicFrame", "grpSp", "cxnSp"];

/// A slide layout part reduced to what the layout inventory needs.
#[derive(Debug)]
pub struct ParsedLayout {
    pub name: String,
    pub placeholders: Vec<PlaceholderDescriptor>,
}

/// Reads the relationship ids of `<p:sldMasterIdLst>` from `ppt/presentation.xml`, in order.
pub fn parse_presentation_master_ids(xml_data: &[u8], part: &str) -> Result<Vec<String>> {
    parse_id_list(xml_data, part, "sldMasterIdLst", "sldMasterId")
}

/// Reads the relationship ids of `<p:sldLayoutIdLst>` from a slide master part, in order.
pub fn parse_master_layout_ids(xml_data: &[u8], part: &str) -> Result<Vec<String>> {
    parse_id_list(xml_data, part, "sldLayoutIdLst", "sldLayoutId")
}

fn parse_id_list(
    xml_data: &[u8],
    part: &str,
    list_tag: &'static str,
    entry_tag: &'static str,
) -> Result<Vec<String>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let Some(list_node) = root.children().find(|n| is_p_element(n, list_tag)) else {
        return Err(Error::MissingElement { element: list_tag, part: part.to_string() });
    };

    let ids = list_node
        .children()
        .filter(|n| is_p_element(n, entry_tag))
        .filter_map(|n| n.attribute((RELS_NAMESPACE, "id")))
        .map(str::to_string)
        .collect();

    Ok(ids)
}

/// Parses a slide layout part (`<p:sldLayout>`) into its name and placeholder list.
///
/// The name is the `name` attribute of `<p:cSld>` and defaults to an empty string.
/// Placeholders are the direct children of `<p:spTree>` whose non-visual properties
/// contain a `<p:ph>` element, reported in document order.
///
/// # Errors
///
/// Parsing fails if:
/// - The XML is not valid UTF-8 or malformed.
/// - `<p:cSld>` or `<p:spTree>` is missing.
/// - A `<p:ph>` carries an unknown `type` or a non-numeric `idx`.
pub fn parse_layout_xml(xml_data: &[u8], part: &str) -> Result<ParsedLayout> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let c_sld = root
        .children()
        .find(|n| is_p_element(n, "cSld"))
        .ok_or_else(|| Error::MissingElement { element: "cSld", part: part.to_string() })?;

    let sp_tree = c_sld
        .children()
        .find(|n| is_p_element(n, "spTree"))
        .ok_or_else(|| Error::MissingElement { element: "spTree", part: part.to_string() })?;

    let name = c_sld.attribute("name").unwrap_or_default().to_string();

    let mut placeholders = Vec::new();
    for shape in sp_tree
        .children()
        .filter(|n| SHAPE_TAGS.iter().any(|tag| is_p_element(n, tag)))
    {
        if let Some(ph) = find_ph(&shape) {
            placeholders.push(parse_ph(&ph)?);
        }
    }

    Ok(ParsedLayout { name, placeholders })
}

/// Walks `<p:nvSpPr>` (or `nvPicPr`, `nvGraphicFramePr`, ...) → `<p:nvPr>` → `<p:ph>`.
fn find_ph<'a, 'input>(shape: &Node<'a, 'input>) -> Option<Node<'a, 'input>> {
    let non_visual = shape.children().find(|n| {
        n.is_element()
            && n.tag_name().namespace() == Some(P_NAMESPACE)
            && n.tag_name().name().starts_with("nv")
            && n.tag_name().name().ends_with("Pr")
    })?;
    let nv_pr = non_visual.children().find(|n| is_p_element(n, "nvPr"))?;
    nv_pr.children().find(|n| is_p_element(n, "ph"))
}

fn parse_ph(ph: &Node) -> Result<PlaceholderDescriptor> {
    let kind = match ph.attribute("type") {
        Some(token) => PlaceholderType::from_xml_token(token)
            .ok_or_else(|| Error::UnknownPlaceholderType(token.to_string()))?,
        None => PlaceholderType::default(),
    };

    let idx = match ph.attribute("idx") {
        Some(raw) => raw
            .trim()
            .parse::<u32>()
            .map_err(|_| Error::InvalidPlaceholderIdx(raw.to_string()))?,
        None => 0,
    };

    Ok(PlaceholderDescriptor { idx, kind })
}

fn is_p_element(node: &Node, name: &str) -> bool {
    node.is_element() && node.tag_name().name() == name && node.tag_name().namespace() == Some(P_NAMESPACE)
}
