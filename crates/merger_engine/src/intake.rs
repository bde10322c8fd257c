use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Declared content type of accepted documents.
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A document picked from the filesystem, described by declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedDocument {
    pub name: String,
    pub size_bytes: u64,
    pub declared_type: String,
    pub path: PathBuf,
}

#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("cannot read metadata for {path}: {source}")]
    Metadata { path: PathBuf, source: io::Error },
    #[error("{path} is not a regular file")]
    NotAFile { path: PathBuf },
}

/// Content type declared by the filename extension. The document is not
/// parsed here; a mislabeled file surfaces later as a merge failure, the
/// same way a browser trusts the picker's reported type.
pub fn declared_content_type(path: &Path) -> String {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => PDF_CONTENT_TYPE.to_string(),
        _ => "application/octet-stream".to_string(),
    }
}

/// Describe a path as a selected document: filename, size and declared type.
pub fn inspect_path(path: &Path) -> Result<SelectedDocument, IntakeError> {
    let metadata = fs::metadata(path).map_err(|source| IntakeError::Metadata {
        path: path.to_path_buf(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(IntakeError::NotAFile {
            path: path.to_path_buf(),
        });
    }

    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    Ok(SelectedDocument {
        name,
        size_bytes: metadata.len(),
        declared_type: declared_content_type(path),
        path: path.to_path_buf(),
    })
}
