use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use lopdf::{Dictionary, Document, Object, ObjectId};
use merge_logging::merge_info;

use crate::persist::AtomicFileWriter;
use crate::{MergeError, MergeEvent, MergeFailureKind, MergeProgress, MergeStage, MergedOutput};

const OUTPUT_PDF_VERSION: &str = "1.5";

#[derive(Debug, Clone)]
pub struct MergeSettings {
    pub output_dir: PathBuf,
    pub output_filename: String,
}

impl MergeSettings {
    pub fn for_output_dir(output_dir: PathBuf) -> Self {
        Self {
            output_dir,
            output_filename: "merged.pdf".to_string(),
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: MergeEvent);
}

pub struct ChannelProgressSink {
    tx: std::sync::mpsc::Sender<MergeEvent>,
}

impl ChannelProgressSink {
    pub fn new(tx: std::sync::mpsc::Sender<MergeEvent>) -> Self {
        Self { tx }
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: MergeEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait Merger: Send + Sync {
    async fn merge(
        &self,
        inputs: &[PathBuf],
        sink: &dyn ProgressSink,
    ) -> Result<MergedOutput, MergeError>;
}

/// One in-memory input document, named for error reporting.
#[derive(Debug, Clone)]
pub struct DocumentInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct LopdfMerger {
    settings: MergeSettings,
}

impl LopdfMerger {
    pub fn new(settings: MergeSettings) -> Self {
        Self { settings }
    }
}

#[async_trait::async_trait]
impl Merger for LopdfMerger {
    async fn merge(
        &self,
        inputs: &[PathBuf],
        sink: &dyn ProgressSink,
    ) -> Result<MergedOutput, MergeError> {
        let total = inputs.len();
        let mut loaded = Vec::with_capacity(total);
        for (index, path) in inputs.iter().enumerate() {
            sink.emit(MergeEvent::Progress(MergeProgress {
                stage: MergeStage::Loading,
                documents_loaded: index,
                documents_total: total,
            }));
            let bytes = tokio::fs::read(path).await.map_err(|err| {
                MergeError::new(
                    MergeFailureKind::Unreadable,
                    format!("{}: {}", path.display(), err),
                )
            })?;
            loaded.push(DocumentInput {
                name: display_name(path),
                bytes,
            });
        }

        sink.emit(MergeEvent::Progress(MergeProgress {
            stage: MergeStage::Assembling,
            documents_loaded: total,
            documents_total: total,
        }));
        let (mut merged, pages) = merge_documents(loaded)?;

        let mut output = Vec::new();
        merged
            .save_to(&mut output)
            .map_err(|err| MergeError::new(MergeFailureKind::Assembly, err.to_string()))?;

        sink.emit(MergeEvent::Progress(MergeProgress {
            stage: MergeStage::Writing,
            documents_loaded: total,
            documents_total: total,
        }));
        let writer = AtomicFileWriter::new(self.settings.output_dir.clone());
        let path = writer
            .write_bytes(&self.settings.output_filename, &output)
            .map_err(|err| MergeError::new(MergeFailureKind::Output, err.to_string()))?;

        merge_info!(
            "Merged {} documents into {:?} ({} pages, {} bytes)",
            total,
            path,
            pages,
            output.len()
        );
        Ok(MergedOutput {
            path,
            pages,
            bytes_written: output.len() as u64,
        })
    }
}

/// Merge parsed documents into one, preserving input order.
///
/// Every input is parsed and page-counted before any assembly starts, so a
/// bad document fails the whole merge without partial output. Returns the
/// assembled document and its total page count.
pub fn merge_documents(inputs: Vec<DocumentInput>) -> Result<(Document, usize), MergeError> {
    if inputs.is_empty() {
        return Err(MergeError::new(MergeFailureKind::NoDocuments, "empty input list"));
    }

    let mut documents = Vec::with_capacity(inputs.len());
    for input in inputs {
        let doc = Document::load_mem(&input.bytes).map_err(|err| {
            MergeError::new(
                MergeFailureKind::InvalidDocument,
                format!("{}: {}", input.name, err),
            )
        })?;
        if doc.get_pages().is_empty() {
            return Err(MergeError::new(MergeFailureKind::EmptyDocument, input.name));
        }
        documents.push(doc);
    }

    // Renumber each document's objects into a disjoint id range, then pool
    // pages and objects. Page order within a document is its internal order;
    // documents contribute in list order.
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();
    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;
        page_ids.extend(doc.get_pages().into_values());
        objects.extend(doc.objects);
    }

    let mut merged = Document::with_version(OUTPUT_PDF_VERSION);
    merged.objects.extend(objects);
    // new_object_id must hand out ids above everything just pooled.
    merged.max_id = max_id - 1;

    let pages_id = merged.new_object_id();
    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();
    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));

    let catalog_id = merged.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    merged.objects.insert(pages_id, Object::Dictionary(pages_dict));
    merged.objects.insert(catalog_id, Object::Dictionary(catalog));
    merged.trailer.set("Root", Object::Reference(catalog_id));

    // Repoint every page at the rebuilt page tree root.
    for &page_id in &page_ids {
        if let Ok(Object::Dictionary(dict)) = merged.get_object_mut(page_id) {
            dict.set("Parent", Object::Reference(pages_id));
        }
    }

    merged.compress();
    let pages = page_ids.len();
    Ok((merged, pages))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
