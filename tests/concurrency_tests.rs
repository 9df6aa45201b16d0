//! Concurrency and thread safety tests for nlpiper

use std::sync::Arc;
use std::thread;

use nlpiper::{Compose, Document, Registry};

const STEPS: &[&str] = &[
    "CleanNumber()",
    "BasicTokenizer()",
    "CaseTokens(mode='lower')",
    "HashEmbeddings(dim=16, apply_doc='mean', normalize=False)",
];

#[test]
fn shared_pipeline_across_threads() {
    let pipeline = Arc::new(Compose::from_steps(STEPS).expect("pipeline builds"));
    let text = "Concurrent 42 pipeline test text";

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            thread::spawn(move || pipeline.apply_text(text).expect("pipeline runs"))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first = &results[0];
    for (i, result) in results.iter().enumerate().skip(1) {
        assert_eq!(first, result, "Thread {i} produced a different document");
    }
}

#[test]
fn shared_input_document_is_never_mutated() {
    let pipeline = Arc::new(Compose::from_steps(&STEPS[1..]).unwrap());
    let input = Arc::new(Document::new("Shared INPUT document"));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let pipeline = Arc::clone(&pipeline);
            let input = Arc::clone(&input);
            thread::spawn(move || pipeline.apply(&input).unwrap())
        })
        .collect();

    for handle in handles {
        let out = handle.join().unwrap();
        assert_eq!(out.token_texts(), vec!["shared", "input", "document"]);
    }
    assert_eq!(*input, Document::new("Shared INPUT document"));
}

#[test]
fn global_registry_builds_from_many_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            thread::spawn(move || {
                let step = if i % 2 == 0 {
                    "CaseTokens(mode='upper')"
                } else {
                    "RemoveStopWords(language='english', case_sensitive=True)"
                };
                Registry::global().build(step).unwrap().identity()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let identity = handle.join().unwrap();
        if i % 2 == 0 {
            assert_eq!(identity, "CaseTokens(mode='upper')");
        } else {
            assert!(identity.starts_with("RemoveStopWords("));
        }
    }
}

#[test]
fn concurrent_rollbacks_agree() {
    let doc = Arc::new(Compose::from_steps(STEPS).unwrap().apply_text("A 1 b").unwrap());

    let handles: Vec<_> = (1..=STEPS.len())
        .map(|k| {
            let doc = Arc::clone(&doc);
            thread::spawn(move || (k, Compose::rollback_document(&doc, k as isize).unwrap()))
        })
        .collect();

    for handle in handles {
        let (k, rolled) = handle.join().unwrap();
        assert_eq!(rolled.steps().len(), STEPS.len() - k);
    }
}
