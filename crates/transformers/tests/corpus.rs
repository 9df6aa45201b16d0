use transformers::{Document, Registry, Transformer};

struct Case {
    name: &'static str,
    input: &'static str,
    steps: &'static [&'static str],
    expected_cleaned: &'static str,
    expected_tokens: &'static [&'static str],
}

fn run(steps: &[&str], input: &str) -> Document {
    let stages = Registry::global()
        .build_all(steps)
        .unwrap_or_else(|e| panic!("steps {steps:?} failed to build: {e}"));
    let mut doc = Document::new(input);
    for stage in &stages {
        stage
            .apply_in_place(&mut doc)
            .unwrap_or_else(|e| panic!("{} failed: {e}", stage.identity()));
    }
    doc
}

#[test]
fn golden_corpus_regression() {
    let cases = [
        Case {
            name: "numbers_then_lowercase",
            input: "Test 123 document.",
            steps: &["CleanNumber()", "BasicTokenizer()", "CaseTokens()"],
            expected_cleaned: "Test  document.",
            expected_tokens: &["test", "document."],
        },
        Case {
            name: "markup_and_whitespace",
            input: "<p>Hello   <b>World</b></p>\n\n&amp; more",
            steps: &["CleanMarkup()", "CleanWhitespace()", "BasicTokenizer()"],
            expected_cleaned: "Hello World & more",
            expected_tokens: &["Hello", "World", "&", "more"],
        },
        Case {
            name: "urls_and_emails",
            input: "mail me@site.org or visit www.site.org now",
            steps: &["CleanEmail()", "CleanURL()", "CleanWhitespace()", "BasicTokenizer()"],
            expected_cleaned: "mail or visit now",
            expected_tokens: &["mail", "or", "visit", "now"],
        },
        Case {
            name: "accents_and_unicode_forms",
            input: "Caf\u{00E9} cafe\u{0301} \u{FB01}ne",
            steps: &["CleanAccents()", "BasicTokenizer()", "NormalizeUnicode()"],
            expected_cleaned: "Cafe cafe fine",
            expected_tokens: &["Cafe", "cafe", "fine"],
        },
        Case {
            name: "word_tokens_without_punctuation",
            input: "Hello, world! It's here.",
            steps: &["WordTokenizer()", "RemovePunctuation()", "CaseTokens(mode='upper')"],
            expected_cleaned: "Hello, world! It's here.",
            expected_tokens: &["HELLO", "", "WORLD", "", "ITS", "HERE", ""],
        },
        Case {
            name: "stop_words_case_insensitive",
            input: "The cat and THE hat",
            steps: &[
                "BasicTokenizer()",
                "RemoveStopWords(language='english', case_sensitive=False)",
            ],
            expected_cleaned: "The cat and THE hat",
            expected_tokens: &["", "cat", "", "", "hat"],
        },
        Case {
            name: "punctuation_cleaner_before_split",
            input: "a.b,c d!",
            steps: &["CleanPunctuation()", "BasicTokenizer()"],
            expected_cleaned: "abc d",
            expected_tokens: &["abc", "d"],
        },
    ];

    for case in cases {
        let doc = run(case.steps, case.input);

        assert_eq!(doc.original(), case.input, "original changed for {}", case.name);
        assert_eq!(
            doc.cleaned, case.expected_cleaned,
            "cleaned mismatch for {}",
            case.name
        );
        assert_eq!(
            doc.token_texts(),
            case.expected_tokens,
            "tokens mismatch for {}",
            case.name
        );
        assert_eq!(
            doc.steps().len(),
            case.steps.len(),
            "step log length for {}",
            case.name
        );
    }
}

#[test]
fn embedding_stage_closes_the_corpus_pipeline() {
    let doc = run(
        &[
            "CleanNumber()",
            "BasicTokenizer()",
            "CaseTokens(mode='lower')",
            "HashEmbeddings(dim=16, apply_doc='mean', normalize=False)",
        ],
        "Test 123 document.",
    );

    let tokens = doc.tokens.as_ref().expect("tokenized");
    assert!(tokens.iter().all(|t| t.embedded.as_ref().map(|e| e.dim()) == Some(16)));
    assert_eq!(doc.embedded.as_ref().map(|e| e.dim()), Some(16));

    let again = run(
        &doc.steps().iter().map(String::as_str).collect::<Vec<_>>(),
        doc.original(),
    );
    assert_eq!(again, doc);
}
