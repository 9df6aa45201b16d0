//! Cleaner stages: whole-document text rewrites that run before tokenization.
//!
//! Each cleaner reads and writes [`Document::cleaned`] only.

use document::Document;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use once_cell::sync::Lazy;
use regex::Regex;
use unicode_categories::UnicodeCategories;
use unicode_normalization::UnicodeNormalization;

use crate::error::TransformError;
use crate::kind::TransformerKind;
use crate::params::Params;
use crate::transformer::{FromParams, Transformer};

static URL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?:http|www)\S+").expect("valid url regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-z0-9.\-+_]+@[a-z0-9.\-+_]+\.[a-z]+").expect("valid email regex")
});
static NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("valid number regex"));

fn replace_all(re: &Regex, text: &str) -> String {
    re.replace_all(text, "").into_owned()
}

/// Removes ASCII punctuation, the same set for cleaners and normalizers.
pub(crate) fn strip_ascii_punctuation(text: &str) -> String {
    text.chars().filter(|c| !c.is_ascii_punctuation()).collect()
}

/// Collapses whitespace runs into single spaces and trims both ends.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}

/// Removes `http…` and `www…` runs.
#[derive(Debug, Clone, Default)]
pub struct CleanURL {
    params: Params,
}

impl CleanURL {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanURL {
    const NAME: &'static str = "CleanURL";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanURL {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = replace_all(&URL_RE, &doc.cleaned);
        Ok(())
    }
}

/// Removes e-mail addresses.
#[derive(Debug, Clone, Default)]
pub struct CleanEmail {
    params: Params,
}

impl CleanEmail {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanEmail {
    const NAME: &'static str = "CleanEmail";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanEmail {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = replace_all(&EMAIL_RE, &doc.cleaned);
        Ok(())
    }
}

/// Removes ASCII digit runs.
#[derive(Debug, Clone, Default)]
pub struct CleanNumber {
    params: Params,
}

impl CleanNumber {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanNumber {
    const NAME: &'static str = "CleanNumber";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanNumber {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = replace_all(&NUMBER_RE, &doc.cleaned);
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CleanPunctuation {
    params: Params,
}

impl CleanPunctuation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanPunctuation {
    const NAME: &'static str = "CleanPunctuation";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanPunctuation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = strip_ascii_punctuation(&doc.cleaned);
        Ok(())
    }
}

/// Parses the text as HTML and keeps only its text nodes. Entities are
/// decoded by the parser; comments and `script`/`style` bodies are dropped.
#[derive(Debug, Clone, Default)]
pub struct CleanMarkup {
    params: Params,
}

impl CleanMarkup {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanMarkup {
    const NAME: &'static str = "CleanMarkup";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanMarkup {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = markup_text(&doc.cleaned);
        Ok(())
    }
}

fn markup_text(markup: &str) -> String {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(markup);
    let mut text = String::with_capacity(markup.len());
    collect_text(&dom.document, &mut text);
    text
}

fn collect_text(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { name, .. }
            if matches!(&*name.local, "script" | "style" | "noscript") =>
        {
            return;
        }
        _ => {}
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccentMode {
    /// Drop combining marks, keep every other character.
    Unicode,
    /// Drop combining marks and anything left outside ASCII.
    Ascii,
}

impl AccentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccentMode::Unicode => "unicode",
            AccentMode::Ascii => "ascii",
        }
    }

    pub fn parse(mode: &str) -> Result<Self, TransformError> {
        match mode {
            "unicode" => Ok(AccentMode::Unicode),
            "ascii" => Ok(AccentMode::Ascii),
            other => Err(TransformError::Value(format!(
                "{other} mode is not available, it can only be \"unicode\" or \"ascii\""
            ))),
        }
    }
}

/// Removes accents via NFKD decomposition.
#[derive(Debug, Clone)]
pub struct CleanAccents {
    mode: AccentMode,
    params: Params,
}

impl CleanAccents {
    pub fn new(mode: AccentMode) -> Self {
        Self {
            mode,
            params: Params::new().kwarg("mode", mode.as_str()),
        }
    }

    pub fn mode(&self) -> AccentMode {
        self.mode
    }
}

impl Default for CleanAccents {
    fn default() -> Self {
        Self::new(AccentMode::Unicode)
    }
}

impl FromParams for CleanAccents {
    const NAME: &'static str = "CleanAccents";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["mode"])?;
        let mode = AccentMode::parse(&bound.str_or("mode", "unicode")?)?;
        Ok(Self::new(mode))
    }
}

impl Transformer for CleanAccents {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let stripped = doc.cleaned.nfkd().filter(|c| !c.is_mark_nonspacing());
        doc.cleaned = match self.mode {
            AccentMode::Unicode => stripped.nfc().collect(),
            AccentMode::Ascii => stripped.filter(char::is_ascii).collect(),
        };
        Ok(())
    }
}

/// Collapses whitespace runs (including newlines) to a single space.
#[derive(Debug, Clone, Default)]
pub struct CleanWhitespace {
    params: Params,
}

impl CleanWhitespace {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for CleanWhitespace {
    const NAME: &'static str = "CleanWhitespace";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for CleanWhitespace {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Cleaner
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        doc.cleaned = collapse_whitespace(&doc.cleaned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn clean(t: &dyn Transformer, input: &str) -> String {
        t.apply(&Document::new(input)).expect("cleaner applies").cleaned
    }

    #[test]
    fn clean_url() {
        let t = CleanURL::new();
        assert_eq!(clean(&t, "TEST"), "TEST");
        assert_eq!(clean(&t, "test www.web.com"), "test ");
        assert_eq!(clean(&t, "testwww.web.com"), "test");
        assert_eq!(clean(&t, r"test http:\\www.web.com"), "test ");
        assert_eq!(clean(&t, r"testhttps:\\www.web.com"), "test");
    }

    #[test]
    fn clean_email() {
        let t = CleanEmail::new();
        assert_eq!(clean(&t, "TEST"), "TEST");
        assert_eq!(clean(&t, "test test@test.com"), "test ");
        assert_eq!(clean(&t, "testtest@test.com"), "");
    }

    #[test]
    fn clean_number() {
        let t = CleanNumber::new();
        assert_eq!(clean(&t, "TEST"), "TEST");
        assert_eq!(clean(&t, "test 12 test"), "test  test");
        assert_eq!(clean(&t, "test123test"), "testtest");
    }

    #[test]
    fn clean_punctuation() {
        let t = CleanPunctuation::new();
        assert_eq!(clean(&t, "TEST.%$#\"#"), "TEST");
        assert_eq!(
            clean(&t, r##"!"te""!"#$%&()*+,-.s/:;<=>?@[\]^_`{|}~""t"##),
            "test"
        );
    }

    #[test]
    fn clean_markup() {
        let t = CleanMarkup::new();
        assert_eq!(clean(&t, "<html><title>TEST</title>"), "TEST");
        assert_eq!(
            clean(&t, r#"<p class="title"><b>test 12 test</b></p>"#),
            "test 12 test"
        );
        assert_eq!(clean(&t, "test123test"), "test123test");
        assert_eq!(clean(&t, "a &amp;lt; b &quot;c&quot;"), "a &lt; b \"c\"");
    }

    #[test]
    fn clean_markup_is_a_real_parser() {
        let t = CleanMarkup::new();
        assert_eq!(clean(&t, "1 < 2 and 3 > 2"), "1 < 2 and 3 > 2");
        assert_eq!(
            clean(&t, "<script>var x = 1;</script><p>hi &#169; &apos;x&apos;</p>"),
            "hi \u{a9} 'x'"
        );
        assert_eq!(clean(&t, "<style>p { color: red }</style>ok"), "ok");
        assert_eq!(clean(&t, "<!-- a > b -->text"), "text");
        assert_eq!(clean(&t, "caf&eacute; &nbsp;x"), "caf\u{e9} \u{a0}x");
    }

    #[test]
    fn clean_accents_modes() {
        assert_eq!(clean(&CleanAccents::default(), "Café naïve"), "Cafe naive");
        assert_eq!(
            clean(&CleanAccents::new(AccentMode::Ascii), "Ça va? 北京"),
            "Ca va? "
        );
        assert_eq!(CleanAccents::default().identity(), "CleanAccents(mode='unicode')");
    }

    #[test]
    fn clean_accents_rejects_unknown_mode() {
        let err = CleanAccents::from_params(&Params::new().arg("latin")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
    }

    #[test]
    fn clean_whitespace() {
        let t = CleanWhitespace::new();
        assert_eq!(clean(&t, "  hello \n\t world  "), "hello world");
        assert_eq!(clean(&t, "   "), "");
    }

    #[test]
    fn cleaners_take_no_arguments() {
        let err = CleanNumber::from_params(&Params::new().arg(1i64)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }
}
