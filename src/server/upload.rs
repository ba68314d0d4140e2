//! Upload validation and the temporary file that backs one analysis.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::constants::ALLOWED_EXTENSIONS;
use crate::LayoutDescriptor;

use super::error::{AppError, AppResult};

/// Checks the extension of an uploaded file name (`.pptx` or `.potx`, any case).
pub fn is_allowed_filename(filename: &str) -> bool {
    let lower = filename.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

/// Reduces a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators become spaces, whitespace runs become `_`, anything outside
/// `[A-Za-z0-9_.-]` is dropped and leading dots or underscores are stripped.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();

    kept.trim_start_matches(['.', '_']).to_string()
}

/// An uploaded file on disk that is removed when the guard goes out of scope.
#[derive(Debug)]
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Writes `data` to a uniquely named file in `dir`.
    ///
    /// The guard is created before writing so that a partial write is cleaned up too.
    pub fn write(dir: &Path, original_name: &str, data: &[u8]) -> io::Result<Self> {
        let name = secure_filename(&format!("{}_{}", uuid::Uuid::new_v4(), original_name));
        let upload = Self { path: dir.join(name) };
        fs::write(&upload.path, data)?;
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temporary upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(path = %self.path.display(), error = %e, "Failed to remove temporary upload"),
        }
    }
}

/// Stores the upload in `dir`, extracts its layouts and removes the file again.
///
/// The file is gone when this returns, whether extraction succeeded or not. Failing to
/// store the file is an internal error; only extraction failures are reported as
/// [`AppError::Parse`].
pub fn analyze_upload(dir: &Path, filename: &str, data: &[u8]) -> AppResult<Vec<LayoutDescriptor>> {
    let upload = TempUpload::write(dir, filename, data)
        .map_err(|e| AppError::InternalError(format!("Failed to store upload in {}: {e}", dir.display())))?;
    Ok(crate::extract_layouts(upload.path())?)
}
