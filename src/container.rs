use crate::constants::{PRESENTATION_PART, SLIDE_LAYOUT_REL_TYPE, SLIDE_MASTER_REL_TYPE};
use crate::parse_rels::{parse_rels, rels_path_for, resolve_target};
use crate::parse_xml::{parse_layout_xml, parse_master_layout_ids, parse_presentation_master_ids};
use crate::parser_config::ExtractorConfig;
use crate::types::{LayoutDescriptor, Relationship};
use crate::{Error, Result};
use std::{
    fs::File,
    io::{Read, Seek},
    path::Path,
};

/// Holds an opened PowerPoint container (`.pptx` or `.potx`).
///
/// `PptxContainer` reads parts lazily from the underlying zip archive and resolves the
/// package relationships needed to walk from `ppt/presentation.xml` to the slide master
/// and from there to every slide layout.
pub struct PptxContainer<R = File> {
    pub config: ExtractorConfig,
    archive: zip::ZipArchive<R>,
}

impl PptxContainer<File> {
    /// Opens a PowerPoint file and initializes a `PptxContainer`.
    ///
    /// # Errors
    ///
    /// Errors are returned on file access problems or when the file is not a zip archive.
    pub fn open(path: &Path, config: ExtractorConfig) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(file, config)
    }
}

impl<R: Read + Seek> PptxContainer<R> {
    /// Initializes a `PptxContainer` from any seekable reader, e.g. an in-memory `Cursor`.
    pub fn from_reader(reader: R, config: ExtractorConfig) -> Result<Self> {
        let archive = zip::ZipArchive::new(reader)?;
        Ok(Self { config, archive })
    }

    /// Walks the configured slide master's layout collection and describes every layout.
    ///
    /// The returned vector has one entry per `<p:sldLayoutId>` of the master, in list order,
    /// and `layout_index` equals the position in that list.
    pub fn extract_layouts(&mut self) -> Result<Vec<LayoutDescriptor>> {
        let layout_paths = self.layout_paths()?;
        let mut layouts = Vec::with_capacity(layout_paths.len());

        for (layout_index, path) in layout_paths.iter().enumerate() {
            let xml = self.read_file_from_archive(path)?;
            let parsed = parse_layout_xml(&xml, path)?;

            let mut placeholders = parsed.placeholders;
            if self.config.sort_by_idx {
                placeholders.sort_by_key(|ph| ph.idx);
            }

            layouts.push(LayoutDescriptor {
                layout_index,
                layout_name: parsed.name,
                placeholders,
            });
        }

        Ok(layouts)
    }

    /// Resolves the part path of the configured slide master.
    pub fn master_path(&mut self) -> Result<String> {
        let xml = self.read_file_from_archive(PRESENTATION_PART)?;
        let master_ids = parse_presentation_master_ids(&xml, PRESENTATION_PART)?;

        let index = self.config.master_index;
        let rel_id = master_ids.get(index).ok_or(Error::MasterNotFound(index))?;

        self.resolve_relationship(PRESENTATION_PART, rel_id, SLIDE_MASTER_REL_TYPE)
    }

    /// Resolves the part paths of the configured master's layouts, in collection order.
    pub fn layout_paths(&mut self) -> Result<Vec<String>> {
        let master_path = self.master_path()?;
        let xml = self.read_file_from_archive(&master_path)?;
        let layout_ids = parse_master_layout_ids(&xml, &master_path)?;

        let rels = self.read_rels(&master_path)?;
        layout_ids
            .iter()
            .map(|id| Self::lookup(&rels, &master_path, id, SLIDE_LAYOUT_REL_TYPE))
            .collect()
    }

    /// Reads a file from the archive by its internal path.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<u8>)` - The content of the file as a byte vector.
    /// * `Err(Error::MissingPart)` - If the archive has no entry with that name.
    pub fn read_file_from_archive(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = match self.archive.by_name(path) {
            Ok(file) => file,
            Err(zip::result::ZipError::FileNotFound) => return Err(Error::MissingPart(path.to_string())),
            Err(e) => return Err(e.into()),
        };
        let mut content = Vec::new();
        file.read_to_end(&mut content)?;
        Ok(content)
    }

    fn read_rels(&mut self, part: &str) -> Result<Vec<Relationship>> {
        let data = self.read_file_from_archive(&rels_path_for(part))?;
        parse_rels(&data)
    }

    fn resolve_relationship(&mut self, part: &str, rel_id: &str, rel_type: &str) -> Result<String> {
        let rels = self.read_rels(part)?;
        Self::lookup(&rels, part, rel_id, rel_type)
    }

    /// Finds the internal relationship `rel_id` of `part`, which must be of `rel_type`.
    fn lookup(rels: &[Relationship], part: &str, rel_id: &str, rel_type: &str) -> Result<String> {
        rels.iter()
            .find(|rel| rel.id == rel_id && rel.rel_type == rel_type && !rel.external)
            .map(|rel| resolve_target(part, &rel.target))
            .ok_or_else(|| Error::MissingRelationship { id: rel_id.to_string(), part: part.to_string() })
    }
}

/// Opens the file at `path` and returns the layout inventory of its first slide master.
pub fn extract_layouts(path: &Path) -> Result<Vec<LayoutDescriptor>> {
    PptxContainer::open(path, ExtractorConfig::default())?.extract_layouts()
}
