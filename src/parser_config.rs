/// Configuration options for the layout extractor.
///
/// Use [`ExtractorConfig::builder()`] to create a configuration instance.
/// This allows you to customize only the desired fields while falling back to sensible defaults for the rest.
///
/// # Configuration Options
///
/// | Parameter | Type | Default | Description |
/// |-----------|------|---------|-------------|
/// | `master_index` | `usize` | `0` | Which entry of the presentation's slide master list to inventory |
/// | `sort_by_idx` | `bool` | `false` | Sort each layout's placeholders by `idx` instead of keeping source order |
///
/// # Example
///
/// ```
/// use pptx_layout_scribe::ExtractorConfig;
///
/// let config = ExtractorConfig::builder()
///     .sort_by_idx(true)
///     .build();
/// assert_eq!(config.master_index, 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExtractorConfig {
    pub master_index: usize,
    pub sort_by_idx: bool,
}

impl ExtractorConfig {
    pub fn builder() -> ExtractorConfigBuilder {
        ExtractorConfigBuilder::default()
    }
}

/// Builder for [`ExtractorConfig`].
///
/// Allows setting individual configuration fields while falling back to defaults for any unspecified values
#[derive(Debug, Default)]
pub struct ExtractorConfigBuilder {
    master_index: Option<usize>,
    sort_by_idx: Option<bool>,
}

impl ExtractorConfigBuilder {
    /// Selects the slide master by its position in `<p:sldMasterIdLst>`.
    pub fn master_index(mut self, value: usize) -> Self {
        self.master_index = Some(value);
        self
    }

    /// Sets whether placeholders are sorted by `idx`.
    pub fn sort_by_idx(mut self, value: bool) -> Self {
        self.sort_by_idx = Some(value);
        self
    }

    /// Builds the final [`ExtractorConfig`] instance, applying default values for any fields that were not set.
    pub fn build(self) -> ExtractorConfig {
        ExtractorConfig {
            master_index: self.master_index.unwrap_or(0),
            sort_by_idx: self.sort_by_idx.unwrap_or(false),
        }
    }
}
