//! Merger engine: document intake, merge pipeline and effect execution.
mod engine;
mod intake;
mod merge;
mod persist;
mod types;

pub use engine::EngineHandle;
pub use intake::{declared_content_type, inspect_path, IntakeError, SelectedDocument};
pub use merge::{merge_documents, DocumentInput, LopdfMerger, MergeSettings, Merger, ProgressSink};
pub use persist::{
    ensure_output_dir, AtomicFileWriter, HistoryStore, PersistError, ThemeStore,
    HISTORY_FILENAME, THEME_FILENAME,
};
pub use types::{MergeError, MergeEvent, MergeFailureKind, MergeProgress, MergeStage, MergedOutput};
