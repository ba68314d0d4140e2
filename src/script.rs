use crate::types::LayoutDescriptor;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

/// Attachment name used when the generated script is downloaded.
pub const SCRIPT_FILE_NAME: &str = "create_presentation.py";

const LAYOUTS_ASSIGNMENT: &str = "AVAILABLE_LAYOUTS = ";

/// Renders a standalone python-pptx script for the given master template and layouts.
///
/// The script downloads `master_url` when it runs, exposes the layout inventory as
/// `AVAILABLE_LAYOUTS` and provides `create_presentation(data)`, where `data` looks like
/// `{"slides": [{"layout_index": 0, "content": {0: "Title"}}], "output_path": "out.pptx"}`.
///
/// The URL is inserted verbatim. The output is a pure function of the inputs.
pub fn generate_script(master_url: &str, layouts: &[LayoutDescriptor]) -> Result<String> {
    let layouts_json = to_indented_json(layouts)?;

    Ok(format!(
        r#"from io import BytesIO
from typing import Any, Dict

import requests
from pptx import Presentation

# Slide layouts of the analyzed master template
{LAYOUTS_ASSIGNMENT}{layouts_json}

MASTER_URL = "{master_url}"


def create_presentation(data: Dict[str, Any]) -> None:
    response = requests.get(MASTER_URL)
    response.raise_for_status()
    prs = Presentation(BytesIO(response.content))

    def create_slide(layout_index: int, content_dict: Dict[int, str]) -> None:
        """
        Adds a slide using the given layout and fills its placeholders.

        Args:
            layout_index: position of the layout in the master, see AVAILABLE_LAYOUTS
            content_dict: text per placeholder idx; placeholders without an entry stay untouched
        """
        if not 0 <= layout_index < len(prs.slide_layouts):
            raise ValueError(f"Layout index {{layout_index}} is not available")

        layout = prs.slide_layouts[layout_index]
        slide = prs.slides.add_slide(layout)

        content = {{int(idx): text for idx, text in content_dict.items()}}
        for shape in slide.placeholders:
            idx = shape.placeholder_format.idx
            if idx in content:
                shape.text = content[idx]

    for slide_data in data["slides"]:
        create_slide(
            layout_index=slide_data["layout_index"],
            content_dict=slide_data["content"],
        )

    output_path = data.get("output_path", "new_presentation.pptx")
    prs.save(output_path)


if __name__ == "__main__":
    # Example: one slide from the first layout, text for placeholder idx 0
    create_presentation({{"slides": [{{"layout_index": 0, "content": {{0: "Hello"}}}}]}})
"#
    ))
}

/// Reads the `AVAILABLE_LAYOUTS` literal back out of a script produced by [`generate_script`].
pub fn extract_embedded_layouts(script: &str) -> Result<Vec<LayoutDescriptor>> {
    let start = script
        .find(LAYOUTS_ASSIGNMENT)
        .ok_or_else(|| Error::EmbeddedLayouts(format!("no `{}` assignment", LAYOUTS_ASSIGNMENT.trim_end())))?;
    let literal = &script[start + LAYOUTS_ASSIGNMENT.len()..];

    serde_json::Deserializer::from_str(literal)
        .into_iter::<Vec<LayoutDescriptor>>()
        .next()
        .ok_or_else(|| Error::EmbeddedLayouts("empty layout literal".to_string()))?
        .map_err(|e| Error::EmbeddedLayouts(e.to_string()))
}

fn to_indented_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .map_err(|e| Error::EmbeddedLayouts(e.to_string()))?;
    String::from_utf8(buf).map_err(|e| Error::EmbeddedLayouts(e.to_string()))
}
