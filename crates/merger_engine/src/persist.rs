use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use merge_logging::merge_warn;
use tempfile::NamedTempFile;
use thiserror::Error;

/// On-disk name of the persisted history snapshot (JSON array of strings).
pub const HISTORY_FILENAME: &str = ".merger_history.json";

/// On-disk name of the persisted theme preference (JSON string).
pub const THEME_FILENAME: &str = ".merger_theme.json";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Ensure output directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    // Basic writability probe: try creating a temp file.
    NamedTempFile::new_in(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        self.write_bytes(filename, content.as_bytes())
    }

    pub fn write_bytes(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Replace existing file if present to keep determinism.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target)
            .map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Persisted name snapshot. Best-effort: a malformed or unreadable stored
/// value loads as "no history", never as an error.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn save(&self, names: &[String]) -> Result<(), PersistError> {
        let content = serde_json::to_string(names)?;
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(HISTORY_FILENAME, &content)?;
        Ok(())
    }

    pub fn load(&self) -> Vec<String> {
        let path = self.dir.join(HISTORY_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
            Err(err) => {
                merge_warn!("Failed to read history from {:?}: {}", path, err);
                return Vec::new();
            }
        };
        match serde_json::from_str(&content) {
            Ok(names) => names,
            Err(err) => {
                merge_warn!("Failed to parse history from {:?}: {}", path, err);
                Vec::new()
            }
        }
    }

    pub fn clear(&self) -> Result<(), PersistError> {
        let path = self.dir.join(HISTORY_FILENAME);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PersistError::Io(err)),
        }
    }
}

/// Persisted theme flag, same best-effort contract as the history store.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    dir: PathBuf,
}

impl ThemeStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn save(&self, value: &str) -> Result<(), PersistError> {
        let content = serde_json::to_string(value)?;
        let writer = AtomicFileWriter::new(self.dir.clone());
        writer.write(THEME_FILENAME, &content)?;
        Ok(())
    }

    pub fn load(&self) -> Option<String> {
        let path = self.dir.join(THEME_FILENAME);
        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
            Err(err) => {
                merge_warn!("Failed to read theme from {:?}: {}", path, err);
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(err) => {
                merge_warn!("Failed to parse theme from {:?}: {}", path, err);
                None
            }
        }
    }
}
