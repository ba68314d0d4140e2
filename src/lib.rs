mod constants;
mod container;
mod parse_rels;
mod parse_xml;
mod parser_config;
mod sanitize;
mod script;
mod types;

pub mod server;

pub use container::{extract_layouts, PptxContainer};
pub use parser_config::{ExtractorConfig, ExtractorConfigBuilder};
pub use sanitize::escape;
pub use script::{extract_embedded_layouts, generate_script, SCRIPT_FILE_NAME};
pub use types::*;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("UTF-8 conversion error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Part not found in container: {0}")]
    MissingPart(String),

    #[error("Missing <{element}> in {part}")]
    MissingElement { element: &'static str, part: String },

    #[error("Relationship {id} not found in {part}")]
    MissingRelationship { id: String, part: String },

    #[error("Slide master {0} not found")]
    MasterNotFound(usize),

    #[error("Unknown placeholder type: {0}")]
    UnknownPlaceholderType(String),

    #[error("Invalid placeholder idx: {0}")]
    InvalidPlaceholderIdx(String),

    #[error("Embedded layout data not found or invalid: {0}")]
    EmbeddedLayouts(String),
}

impl Error {
    /// Short name of the failure, reported as `details.type` by the upload endpoint.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Zip(_) => "ZipError",
            Error::Xml(_) => "XmlError",
            Error::Utf8(_) => "Utf8Error",
            Error::Io(_) => "IoError",
            Error::MissingPart(_) => "MissingPart",
            Error::MissingElement { .. } => "MissingElement",
            Error::MissingRelationship { .. } => "MissingRelationship",
            Error::MasterNotFound(_) => "MasterNotFound",
            Error::UnknownPlaceholderType(_) => "UnknownPlaceholderType",
            Error::InvalidPlaceholderIdx(_) => "InvalidPlaceholderIdx",
            Error::EmbeddedLayouts(_) => "EmbeddedLayouts",
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
