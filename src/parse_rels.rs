use crate::types::Relationship;
use crate::Result;
use roxmltree::Document;

/// Parses relationship (`.rels`) XML data of a package part.
///
/// Every `<Relationship>` element with an `Id`, `Type` and `Target` attribute is returned
/// in document order. Entries missing one of these attributes are skipped.
///
/// # Errors
///
/// An error is returned if:
/// - The XML data is not valid UTF-8.
/// - Malformed or invalid XML structure is detected.
pub fn parse_rels(xml_data: &[u8]) -> Result<Vec<Relationship>> {
    let xml_str = std::str::from_utf8(xml_data)?;
    let doc = Document::parse(xml_str)?;
    let root = doc.root_element();

    let mut relationships = Vec::new();
    for rel in root.children().filter(|n| n.is_element() && n.tag_name().name() == "Relationship") {
        let (Some(id), Some(rel_type), Some(target)) =
            (rel.attribute("Id"), rel.attribute("Type"), rel.attribute("Target"))
        else {
            continue;
        };

        relationships.push(Relationship {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            external: rel.attribute("TargetMode") == Some("External"),
        });
    }

    Ok(relationships)
}

/// Constructs the path to the relationships file for a given part.
///
/// `ppt/slideMasters/slideMaster1.xml` becomes `ppt/slideMasters/_rels/slideMaster1.xml.rels`.
pub fn rels_path_for(part_path: &str) -> String {
    let mut rels_path = part_path.to_string();
    match rels_path.rfind('/') {
        Some(pos) => rels_path.insert_str(pos + 1, "_rels/"),
        None => rels_path.insert_str(0, "_rels/"),
    }
    rels_path.push_str(".rels");
    rels_path
}

/// Resolves a relationship target against the part that owns the relationship.
///
/// Targets are relative to the directory of the source part unless they start with `/`,
/// in which case they are relative to the package root. `..` and `.` segments are folded.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return normalize(absolute.split('/').collect());
    }

    let mut segments: Vec<&str> = source_part
        .rsplit_once('/')
        .map(|(dir, _)| dir.split('/').collect())
        .unwrap_or_default();
    segments.extend(target.split('/'));
    normalize(segments)
}

fn normalize(segments: Vec<&str>) -> String {
    let mut resolved: Vec<&str> = Vec::with_capacity(segments.len());
    for segment in segments {
        match segment {
            "" | "." => {}
            ".." => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    resolved.join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    const MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
    <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
    <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/>
    <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/>
    <Relationship Id="rId4" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com" TargetMode="External"/>
    <Relationship Id="rId5" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image"/>
</Relationships>"#;

    #[test]
    fn test_parse_rels_keeps_document_order() {
        let rels = parse_rels(MASTER_RELS.as_bytes()).unwrap();
        assert_eq!(rels.len(), 4);
        assert_eq!(rels[0].id, "rId2");
        assert_eq!(rels[0].target, "../slideLayouts/slideLayout2.xml");
        assert_eq!(rels[1].id, "rId1");
        assert!(!rels[2].external);
        assert!(rels[3].external);
    }

    #[test]
    fn test_parse_rels_empty() {
        let xml = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"/>"#;
        assert!(parse_rels(xml.as_bytes()).unwrap().is_empty());
    }

    #[test]
    fn test_parse_rels_rejects_malformed_xml() {
        assert!(parse_rels(b"<Relationships><Relationship").is_err());
    }

    #[test]
    fn test_rels_path_for() {
        assert_eq!(rels_path_for("ppt/presentation.xml"), "ppt/_rels/presentation.xml.rels");
        assert_eq!(
            rels_path_for("ppt/slideMasters/slideMaster1.xml"),
            "ppt/slideMasters/_rels/slideMaster1.xml.rels"
        );
        assert_eq!(rels_path_for("root.xml"), "_rels/root.xml.rels");
    }

    #[test]
    fn test_resolve_target() {
        assert_eq!(
            resolve_target("ppt/slideMasters/slideMaster1.xml", "../slideLayouts/slideLayout3.xml"),
            "ppt/slideLayouts/slideLayout3.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "slideMasters/slideMaster1.xml"),
            "ppt/slideMasters/slideMaster1.xml"
        );
        assert_eq!(
            resolve_target("ppt/presentation.xml", "/ppt/slideMasters/./slideMaster2.xml"),
            "ppt/slideMasters/slideMaster2.xml"
        );
    }
}
