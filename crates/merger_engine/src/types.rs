use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStage {
    Loading,
    Assembling,
    Writing,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeProgress {
    pub stage: MergeStage,
    pub documents_loaded: usize,
    pub documents_total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeEvent {
    Progress(MergeProgress),
    Completed {
        result: Result<MergedOutput, MergeError>,
    },
}

/// Handle to the written merge artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedOutput {
    pub path: PathBuf,
    pub pages: usize,
    pub bytes_written: u64,
}

/// A merge fails as a whole: any bad input aborts before output is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct MergeError {
    pub kind: MergeFailureKind,
    pub message: String,
}

impl MergeError {
    pub(crate) fn new(kind: MergeFailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeFailureKind {
    NoDocuments,
    Unreadable,
    InvalidDocument,
    EmptyDocument,
    Assembly,
    Output,
}

impl fmt::Display for MergeFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeFailureKind::NoDocuments => write!(f, "no documents to merge"),
            MergeFailureKind::Unreadable => write!(f, "document could not be read"),
            MergeFailureKind::InvalidDocument => write!(f, "document could not be parsed"),
            MergeFailureKind::EmptyDocument => write!(f, "document contains no pages"),
            MergeFailureKind::Assembly => write!(f, "merged document could not be assembled"),
            MergeFailureKind::Output => write!(f, "merged document could not be written"),
        }
    }
}
