use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use lopdf::{dictionary, Dictionary, Document, Object, Stream};
use merger_engine::{
    merge_documents, DocumentInput, LopdfMerger, MergeEvent, MergeFailureKind, MergeSettings,
    MergeStage, Merger, ProgressSink,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Builds a minimal document whose pages are identifiable by MediaBox width.
fn pdf_with_page_widths(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &width in widths {
        let content_id = doc.add_object(Object::Stream(Stream::new(Dictionary::new(), Vec::new())));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 842.into()],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => widths.len() as i64,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

fn input(name: &str, widths: &[i64]) -> DocumentInput {
    DocumentInput {
        name: name.to_string(),
        bytes: pdf_with_page_widths(widths),
    }
}

fn page_widths(doc: &Document) -> Vec<i64> {
    doc.get_pages()
        .into_values()
        .map(|page_id| {
            let dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
            let media_box = dict.get(b"MediaBox").unwrap().as_array().unwrap();
            media_box[2].as_i64().unwrap()
        })
        .collect()
}

#[derive(Default)]
struct CollectingSink {
    events: Mutex<Vec<MergeEvent>>,
}

impl ProgressSink for CollectingSink {
    fn emit(&self, event: MergeEvent) {
        self.events.lock().unwrap().push(event);
    }
}

#[test]
fn merge_preserves_document_and_page_order() {
    let inputs = vec![input("a.pdf", &[100]), input("b.pdf", &[200, 300])];

    let (merged, pages) = merge_documents(inputs).unwrap();

    assert_eq!(pages, 3);
    assert_eq!(page_widths(&merged), vec![100, 200, 300]);
}

#[test]
fn merged_output_survives_a_reparse() {
    let inputs = vec![input("a.pdf", &[100, 150]), input("b.pdf", &[200])];

    let (mut merged, _) = merge_documents(inputs).unwrap();
    let mut bytes = Vec::new();
    merged.save_to(&mut bytes).unwrap();

    let reparsed = Document::load_mem(&bytes).unwrap();
    assert_eq!(page_widths(&reparsed), vec![100, 150, 200]);
}

#[test]
fn empty_input_list_is_rejected() {
    let err = merge_documents(Vec::new()).unwrap_err();
    assert_eq!(err.kind, MergeFailureKind::NoDocuments);
}

#[test]
fn unparseable_document_fails_the_whole_merge() {
    let inputs = vec![
        input("good.pdf", &[100]),
        DocumentInput {
            name: "bad.pdf".to_string(),
            bytes: b"this is not a pdf".to_vec(),
        },
    ];

    let err = merge_documents(inputs).unwrap_err();
    assert_eq!(err.kind, MergeFailureKind::InvalidDocument);
    assert!(err.message.contains("bad.pdf"));
}

#[test]
fn document_without_pages_fails_the_whole_merge() {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.add_object(dictionary! {
        "Type" => "Pages",
        "Kids" => Vec::<Object>::new(),
        "Count" => 0,
    });
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();

    let inputs = vec![
        input("good.pdf", &[100]),
        DocumentInput {
            name: "hollow.pdf".to_string(),
            bytes,
        },
    ];

    let err = merge_documents(inputs).unwrap_err();
    assert_eq!(err.kind, MergeFailureKind::EmptyDocument);
}

#[tokio::test]
async fn merger_writes_artifact_and_reports_progress() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("x.pdf");
    let second = temp.path().join("y.pdf");
    fs::write(&first, pdf_with_page_widths(&[100])).unwrap();
    fs::write(&second, pdf_with_page_widths(&[200])).unwrap();
    let out_dir = temp.path().join("output");

    let merger = LopdfMerger::new(MergeSettings::for_output_dir(out_dir.clone()));
    let sink = CollectingSink::default();
    let output = merger
        .merge(&[first, second], &sink)
        .await
        .expect("merge succeeds");

    assert_eq!(output.path, out_dir.join("merged.pdf"));
    assert_eq!(output.pages, 2);
    assert!(output.bytes_written > 0);

    let written = Document::load(&output.path).unwrap();
    assert_eq!(page_widths(&written), vec![100, 200]);

    let events = sink.events.lock().unwrap();
    let stages: Vec<MergeStage> = events
        .iter()
        .filter_map(|event| match event {
            MergeEvent::Progress(progress) => Some(progress.stage),
            MergeEvent::Completed { .. } => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![
            MergeStage::Loading,
            MergeStage::Loading,
            MergeStage::Assembling,
            MergeStage::Writing,
        ]
    );
}

#[tokio::test]
async fn merger_fails_atomically_on_bad_input() {
    let temp = TempDir::new().unwrap();
    let good = temp.path().join("good.pdf");
    let bad = temp.path().join("bad.pdf");
    fs::write(&good, pdf_with_page_widths(&[100])).unwrap();
    fs::write(&bad, b"garbage bytes").unwrap();
    let out_dir = temp.path().join("output");

    let merger = LopdfMerger::new(MergeSettings::for_output_dir(out_dir.clone()));
    let sink = CollectingSink::default();
    let err = merger
        .merge(&[good, bad], &sink)
        .await
        .expect_err("merge fails");

    assert_eq!(err.kind, MergeFailureKind::InvalidDocument);
    assert!(!out_dir.join("merged.pdf").exists());
}

#[tokio::test]
async fn merger_reports_missing_input_as_unreadable() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("nope.pdf");
    let out_dir = temp.path().join("output");

    let merger = LopdfMerger::new(MergeSettings::for_output_dir(out_dir));
    let sink = CollectingSink::default();
    let err = merger
        .merge(&[missing.clone()], &sink)
        .await
        .expect_err("merge fails");

    assert_eq!(err.kind, MergeFailureKind::Unreadable);
    assert!(err.message.contains("nope.pdf"));
}

#[tokio::test]
async fn repeated_merges_replace_the_artifact() {
    let temp = TempDir::new().unwrap();
    let first = temp.path().join("x.pdf");
    let second = temp.path().join("y.pdf");
    fs::write(&first, pdf_with_page_widths(&[100])).unwrap();
    fs::write(&second, pdf_with_page_widths(&[200])).unwrap();
    let out_dir = temp.path().join("output");
    let merger = LopdfMerger::new(MergeSettings::for_output_dir(out_dir));

    let sink = CollectingSink::default();
    let inputs: Vec<PathBuf> = vec![first.clone(), second.clone()];
    let output_a = merger.merge(&inputs, &sink).await.unwrap();

    let reordered: Vec<PathBuf> = vec![second, first];
    let output_b = merger.merge(&reordered, &sink).await.unwrap();

    assert_eq!(output_a.path, output_b.path);
    let written = Document::load(&output_b.path).unwrap();
    assert_eq!(page_widths(&written), vec![200, 100]);
}
