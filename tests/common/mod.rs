#![allow(dead_code)]

use std::io::{Cursor, Write};

use axum::Router;
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

use pptx_layout_scribe::server::{build_app_router, AppState, ServerConfig};

const P_NS: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const R_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const PKG_RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
pub const MASTER_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
pub const LAYOUT_REL: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

/// A `<p:ph>` as it appears in a layout: `type` and `idx` attributes, both optional.
pub type Ph<'a> = (Option<&'a str>, Option<u32>);

/// A layout of the fixture: its `cSld` name and its placeholders in shape-tree order.
pub struct FixtureLayout<'a> {
    pub name: &'a str,
    pub placeholders: Vec<Ph<'a>>,
}

pub fn layout<'a>(name: &'a str, placeholders: Vec<Ph<'a>>) -> FixtureLayout<'a> {
    FixtureLayout { name, placeholders }
}

/// Three layouts, the first one with a title and a body placeholder.
pub fn three_layouts() -> Vec<FixtureLayout<'static>> {
    vec![
        layout("Title and Content", vec![(Some("title"), None), (Some("body"), Some(1))]),
        layout(
            "Picture with Caption",
            vec![(Some("title"), None), (Some("pic"), Some(1)), (Some("body"), Some(2)), (Some("dt"), Some(10))],
        ),
        layout("Blank", vec![]),
    ]
}

/// Builds a minimal presentation container with one slide master per entry of `masters`.
///
/// Master relationships are written in reverse order so that tests notice when the
/// `.rels` order leaks into the layout order.
pub fn build_pptx(masters: &[Vec<FixtureLayout>]) -> Vec<u8> {
    build_pptx_with(masters, |_, content| content)
}

/// Like [`build_pptx`], but every part passes through `rewrite(part_name, content)` before
/// it is stored, so tests can break a single part.
pub fn build_pptx_with(masters: &[Vec<FixtureLayout>], rewrite: impl Fn(&str, String) -> String) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    let mut add = |name: &str, content: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(rewrite(name, content.to_string()).as_bytes()).unwrap();
    };

    add("[Content_Types].xml", r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#);

    let master_ids: String = (1..=masters.len())
        .map(|m| format!(r#"<p:sldMasterId id="{}" r:id="rId{m}"/>"#, 2147483647 + m))
        .collect();
    add(
        "ppt/presentation.xml",
        &format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:sldMasterIdLst>{master_ids}</p:sldMasterIdLst><p:sldSz cx="12192000" cy="6858000"/></p:presentation>"#),
    );

    let presentation_rels: String = (1..=masters.len())
        .map(|m| format!(r#"<Relationship Id="rId{m}" Type="{MASTER_REL}" Target="slideMasters/slideMaster{m}.xml"/>"#))
        .collect();
    add(
        "ppt/_rels/presentation.xml.rels",
        &format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_RELS_NS}">{presentation_rels}</Relationships>"#),
    );

    let mut layout_number = 0;
    for (m, layouts) in masters.iter().enumerate() {
        let m = m + 1;
        let mut layout_ids = String::new();
        let mut rels = Vec::new();

        for (i, layout) in layouts.iter().enumerate() {
            layout_number += 1;
            let rel_id = i + 1;
            layout_ids.push_str(&format!(r#"<p:sldLayoutId id="{}" r:id="rId{rel_id}"/>"#, 2147483649u32 + layout_number));
            rels.push(format!(
                r#"<Relationship Id="rId{rel_id}" Type="{LAYOUT_REL}" Target="../slideLayouts/slideLayout{layout_number}.xml"/>"#
            ));
            add(&format!("ppt/slideLayouts/slideLayout{layout_number}.xml"), &layout_xml(layout));
        }
        rels.reverse();

        add(
            &format!("ppt/slideMasters/slideMaster{m}.xml"),
            &format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:cSld><p:spTree/></p:cSld><p:sldLayoutIdLst>{layout_ids}</p:sldLayoutIdLst></p:sldMaster>"#),
        );
        add(
            &format!("ppt/slideMasters/_rels/slideMaster{m}.xml.rels"),
            &format!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{PKG_RELS_NS}">{}</Relationships>"#, rels.concat()),
        );
    }

    zip.finish().unwrap().into_inner()
}

fn layout_xml(layout: &FixtureLayout) -> String {
    let mut shapes = String::new();
    for (i, (kind, idx)) in layout.placeholders.iter().enumerate() {
        let mut ph = String::from("<p:ph");
        if let Some(kind) = kind {
            ph.push_str(&format!(r#" type="{kind}""#));
        }
        if let Some(idx) = idx {
            ph.push_str(&format!(r#" idx="{idx}""#));
        }
        ph.push_str("/>");

        shapes.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{}" name="Placeholder {i}"/><p:cNvSpPr/><p:nvPr>{ph}</p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#,
            i + 2
        ));
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:p="{P_NS}" xmlns:r="{R_NS}"><p:cSld name="{}"><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{shapes}</p:spTree></p:cSld></p:sldLayout>"#,
        layout.name
    )
}

/// Build a test `ServerConfig` whose uploads land in `upload_dir`.
pub fn test_config(upload_dir: &TempDir, max_content_length: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        secret_key: "test-secret".to_string(),
        max_content_length,
        upload_folder: upload_dir.path().to_path_buf(),
        script_ttl_secs: 3600,
        max_sessions: 100,
    }
}

/// Build the full application router backed by a fresh upload directory.
///
/// The directory is returned so tests can inspect it; it is deleted when dropped.
pub fn build_test_app(max_content_length: usize) -> (Router, TempDir) {
    let upload_dir = tempfile::tempdir().unwrap();
    let app = build_app_router(AppState::new(test_config(&upload_dir, max_content_length)));
    (app, upload_dir)
}
