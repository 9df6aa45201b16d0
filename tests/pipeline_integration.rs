//! End-to-end pipeline behaviour: ordering, copy vs in-place, reconstruction
//! and rollback.

use nlpiper::{
    BasicTokenizer, CaseTokens, CleanMarkup, CleanNumber, Compose, Document, DocumentState,
    HashEmbeddings, RemoveStopWords, Transformer, WordTokenizer,
};

fn basic_pipeline() -> Compose {
    Compose::new(vec![
        Box::new(CleanNumber::new()),
        Box::new(BasicTokenizer::new()),
        Box::new(CaseTokens::default()),
    ])
}

#[test]
fn basic_scenario() {
    let doc = Document::new("Test 123 document.");
    let out = basic_pipeline().apply(&doc).expect("pipeline runs");

    assert_eq!(out.original(), "Test 123 document.");
    assert_eq!(out.token_texts(), vec!["test", "document."]);
    assert_eq!(
        out.steps(),
        &["CleanNumber()", "BasicTokenizer()", "CaseTokens(mode='lower')"]
    );
    assert_eq!(out.state(), DocumentState::Tokenized);
}

#[test]
fn copy_apply_never_aliases_tokens() {
    let tokenized = BasicTokenizer::new()
        .apply(&Document::new("Alpha Beta"))
        .unwrap();
    let snapshot = tokenized.clone();

    let pipeline = Compose::new(vec![Box::new(CaseTokens::default())]);
    let lowered = pipeline.apply(&tokenized).unwrap();

    assert_eq!(tokenized, snapshot);
    assert!(tokenized.tokens.as_ref().unwrap().iter().all(|t| t.cleaned.is_none()));
    assert_eq!(lowered.token_texts(), vec!["alpha", "beta"]);
}

#[test]
fn in_place_apply_matches_copy_apply() {
    let pipeline = basic_pipeline();
    let copied = pipeline.apply(&Document::new("One 2 three")).unwrap();

    let mut doc = Document::new("One 2 three");
    pipeline.apply_in_place(&mut doc).unwrap();

    assert_eq!(doc, copied);
}

#[test]
fn step_log_follows_application_order() {
    let stages: Vec<Box<dyn Transformer>> = vec![
        Box::new(CleanMarkup::new()),
        Box::new(WordTokenizer::new()),
        Box::new(RemoveStopWords::new("english", false).unwrap()),
        Box::new(CaseTokens::default()),
    ];
    let expected: Vec<String> = stages.iter().map(|s| s.identity()).collect();
    let pipeline = Compose::new(stages);

    let out = pipeline.apply_text("<b>The</b> Quick fox").unwrap();
    assert_eq!(out.steps(), expected.as_slice());
    assert_eq!(out.token_texts(), vec!["", "quick", "fox"]);
}

#[test]
fn reconstruction_round_trips_identity() {
    let pipeline = Compose::from_steps(&[
        "CleanMarkup()",
        "BasicTokenizer()",
        "CaseTokens(mode='upper')",
        "HashEmbeddings(dim=8, apply_doc='sum', normalize=True)",
    ])
    .unwrap();

    let out = pipeline.apply_text("<i>hi</i> there").unwrap();
    assert_eq!(out.state(), DocumentState::Embedded);

    let rebuilt = Compose::from_steps(out.steps()).unwrap();
    assert_eq!(rebuilt.identity(), pipeline.identity());
    assert_eq!(rebuilt.apply_text("<i>hi</i> there").unwrap(), out);
}

#[test]
fn rollback_matches_replaying_prefix() {
    let stages: Vec<&str> = vec![
        "CleanNumber()",
        "BasicTokenizer()",
        "CaseTokens(mode='lower')",
        "RemoveStopWords(language='english', case_sensitive=True)",
        "HashEmbeddings(dim=4, apply_doc='mean', normalize=False)",
    ];
    let mut doc = Document::new("This is 42 a Test");
    Compose::from_steps(&stages)
        .unwrap()
        .apply_in_place(&mut doc)
        .unwrap();
    let before = doc.clone();

    for k in 1..=stages.len() {
        let rolled = Compose::rollback_document(&doc, k as isize).unwrap();
        let keep = stages.len() - k;
        assert_eq!(rolled.steps(), &doc.steps()[..keep]);

        let replayed = Compose::from_steps(&stages[..keep])
            .unwrap()
            .apply_text(doc.original())
            .unwrap();
        assert_eq!(rolled, replayed, "rollback by {k}");
    }

    assert_eq!(doc, before);
}

#[test]
fn rollback_everything_yields_fresh_document() {
    let doc = basic_pipeline().apply_text("Test 123 document.").unwrap();
    let rolled = Compose::rollback_document(&doc, 3).unwrap();
    assert_eq!(rolled, Document::new("Test 123 document."));
}

#[test]
fn embedded_pipeline_stops_accepting_stages() {
    let embed = HashEmbeddings::new(4, nlpiper::DocPooling::Mean, false).unwrap();
    let doc = basic_pipeline().apply_text("x y").unwrap();
    let doc = embed.apply(&doc).unwrap();

    assert!(CaseTokens::default().apply(&doc).is_err());
    assert!(embed.apply(&doc).is_err());
    assert!(CleanNumber::new().apply(&doc).is_err());
}
