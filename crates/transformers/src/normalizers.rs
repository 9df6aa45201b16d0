//! Token-level normalizers. They run on TOKENIZED documents and only ever
//! touch `Token::cleaned`, which the stage wrapper has already defaulted
//! from `Token::original`.

use document::Document;
use fxhash::FxHashSet;
use once_cell::sync::Lazy;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

use crate::cleaners::strip_ascii_punctuation;
use crate::error::TransformError;
use crate::kind::TransformerKind;
use crate::params::Params;
use crate::transformer::{FromParams, Transformer};

/// Runs `f` over the cleaned text of every token.
fn for_each_cleaned(doc: &mut Document, mut f: impl FnMut(&mut String)) {
    for token in doc.tokens.iter_mut().flatten() {
        f(token.ensure_cleaned());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseMode {
    Lower,
    Upper,
}

impl CaseMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CaseMode::Lower => "lower",
            CaseMode::Upper => "upper",
        }
    }

    pub fn parse(mode: &str) -> Result<Self, TransformError> {
        match mode {
            "lower" => Ok(CaseMode::Lower),
            "upper" => Ok(CaseMode::Upper),
            other => Err(TransformError::Value(format!(
                "{other} mode is not available, it can only be \"lower\" or \"upper\""
            ))),
        }
    }
}

/// Lower- or upper-cases every token.
#[derive(Debug, Clone)]
pub struct CaseTokens {
    mode: CaseMode,
    params: Params,
}

impl CaseTokens {
    pub fn new(mode: CaseMode) -> Self {
        Self {
            mode,
            params: Params::new().kwarg("mode", mode.as_str()),
        }
    }

    pub fn mode(&self) -> CaseMode {
        self.mode
    }
}

impl Default for CaseTokens {
    fn default() -> Self {
        Self::new(CaseMode::Lower)
    }
}

impl FromParams for CaseTokens {
    const NAME: &'static str = "CaseTokens";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["mode"])?;
        let mode = CaseMode::parse(&bound.str_or("mode", "lower")?)?;
        Ok(Self::new(mode))
    }
}

impl Transformer for CaseTokens {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Normalizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let mode = self.mode;
        for_each_cleaned(doc, |text| {
            *text = match mode {
                CaseMode::Lower => text.to_lowercase(),
                CaseMode::Upper => text.to_uppercase(),
            };
        });
        Ok(())
    }
}

/// Removes ASCII punctuation from every token. Tokens that were pure
/// punctuation become empty strings; they are not dropped.
#[derive(Debug, Clone, Default)]
pub struct RemovePunctuation {
    params: Params,
}

impl RemovePunctuation {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FromParams for RemovePunctuation {
    const NAME: &'static str = "RemovePunctuation";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        params.bind(Self::NAME, &[])?;
        Ok(Self::new())
    }
}

impl Transformer for RemovePunctuation {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Normalizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        for_each_cleaned(doc, |text| *text = strip_ascii_punctuation(text));
        Ok(())
    }
}

const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
    "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
    "wouldn't",
];

static ENGLISH: Lazy<FxHashSet<&'static str>> =
    Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

fn stop_words(language: &str) -> Result<&'static FxHashSet<&'static str>, TransformError> {
    match language {
        "english" => Ok(&ENGLISH),
        other => Err(TransformError::Value(format!(
            "{other} language is not available, only \"english\" is bundled"
        ))),
    }
}

/// Replaces stop words with empty strings, keeping token positions stable.
///
/// Matching uses each token's cleaned text so far. With `case_sensitive`
/// set, `This` survives while `this` is removed.
#[derive(Debug, Clone)]
pub struct RemoveStopWords {
    words: &'static FxHashSet<&'static str>,
    case_sensitive: bool,
    params: Params,
}

impl RemoveStopWords {
    pub fn new(language: &str, case_sensitive: bool) -> Result<Self, TransformError> {
        Ok(Self {
            words: stop_words(language)?,
            case_sensitive,
            params: Params::new()
                .kwarg("language", language)
                .kwarg("case_sensitive", case_sensitive),
        })
    }

    fn is_stop_word(&self, text: &str) -> bool {
        if self.case_sensitive {
            self.words.contains(text)
        } else {
            self.words.contains(text.to_lowercase().as_str())
        }
    }
}

impl FromParams for RemoveStopWords {
    const NAME: &'static str = "RemoveStopWords";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["language", "case_sensitive"])?;
        Self::new(
            &bound.str_or("language", "english")?,
            bound.bool_or("case_sensitive", true)?,
        )
    }
}

impl Transformer for RemoveStopWords {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Normalizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        for_each_cleaned(doc, |text| {
            if self.is_stop_word(text) {
                text.clear();
            }
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnicodeForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl UnicodeForm {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnicodeForm::Nfc => "NFC",
            UnicodeForm::Nfd => "NFD",
            UnicodeForm::Nfkc => "NFKC",
            UnicodeForm::Nfkd => "NFKD",
        }
    }

    pub fn parse(form: &str) -> Result<Self, TransformError> {
        match form {
            "NFC" => Ok(UnicodeForm::Nfc),
            "NFD" => Ok(UnicodeForm::Nfd),
            "NFKC" => Ok(UnicodeForm::Nfkc),
            "NFKD" => Ok(UnicodeForm::Nfkd),
            other => Err(TransformError::Value(format!(
                "{other} is not a unicode normalization form, expected NFC, NFD, NFKC or NFKD"
            ))),
        }
    }

    fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeForm::Nfc => text.nfc().collect(),
            UnicodeForm::Nfd => text.nfd().collect(),
            UnicodeForm::Nfkc => text.nfkc().collect(),
            UnicodeForm::Nfkd => text.nfkd().collect(),
        }
    }
}

/// Applies a Unicode normalization form to every token.
#[derive(Debug, Clone)]
pub struct NormalizeUnicode {
    form: UnicodeForm,
    params: Params,
}

impl NormalizeUnicode {
    pub fn new(form: UnicodeForm) -> Self {
        Self {
            form,
            params: Params::new().kwarg("form", form.as_str()),
        }
    }
}

impl Default for NormalizeUnicode {
    fn default() -> Self {
        Self::new(UnicodeForm::Nfkc)
    }
}

impl FromParams for NormalizeUnicode {
    const NAME: &'static str = "NormalizeUnicode";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["form"])?;
        let form = UnicodeForm::parse(&bound.str_or("form", "NFKC")?)?;
        Ok(Self::new(form))
    }
}

impl Transformer for NormalizeUnicode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Normalizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let form = self.form;
        for_each_cleaned(doc, |text| *text = form.normalize(text));
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StemLanguage {
    English,
    French,
    German,
    Spanish,
    Italian,
    Portuguese,
    Dutch,
    Russian,
}

impl StemLanguage {
    pub fn as_str(&self) -> &'static str {
        match self {
            StemLanguage::English => "english",
            StemLanguage::French => "french",
            StemLanguage::German => "german",
            StemLanguage::Spanish => "spanish",
            StemLanguage::Italian => "italian",
            StemLanguage::Portuguese => "portuguese",
            StemLanguage::Dutch => "dutch",
            StemLanguage::Russian => "russian",
        }
    }

    pub fn parse(language: &str) -> Result<Self, TransformError> {
        match language {
            "english" => Ok(StemLanguage::English),
            "french" => Ok(StemLanguage::French),
            "german" => Ok(StemLanguage::German),
            "spanish" => Ok(StemLanguage::Spanish),
            "italian" => Ok(StemLanguage::Italian),
            "portuguese" => Ok(StemLanguage::Portuguese),
            "dutch" => Ok(StemLanguage::Dutch),
            "russian" => Ok(StemLanguage::Russian),
            other => Err(TransformError::Value(format!(
                "{other} language has no stemmer"
            ))),
        }
    }

    fn algorithm(&self) -> Algorithm {
        match self {
            StemLanguage::English => Algorithm::English,
            StemLanguage::French => Algorithm::French,
            StemLanguage::German => Algorithm::German,
            StemLanguage::Spanish => Algorithm::Spanish,
            StemLanguage::Italian => Algorithm::Italian,
            StemLanguage::Portuguese => Algorithm::Portuguese,
            StemLanguage::Dutch => Algorithm::Dutch,
            StemLanguage::Russian => Algorithm::Russian,
        }
    }
}

/// Fills `Token::stem` with the Snowball stem of each token's cleaned text.
/// `cleaned` itself is left as it was.
#[derive(Debug, Clone)]
pub struct StemTokens {
    language: StemLanguage,
    params: Params,
}

impl StemTokens {
    pub fn new(language: StemLanguage) -> Self {
        Self {
            language,
            params: Params::new().kwarg("language", language.as_str()),
        }
    }

    pub fn language(&self) -> StemLanguage {
        self.language
    }
}

impl Default for StemTokens {
    fn default() -> Self {
        Self::new(StemLanguage::English)
    }
}

impl FromParams for StemTokens {
    const NAME: &'static str = "StemTokens";

    fn from_params(params: &Params) -> Result<Self, TransformError> {
        let bound = params.bind(Self::NAME, &["language"])?;
        let language = StemLanguage::parse(&bound.str_or("language", "english")?)?;
        Ok(Self::new(language))
    }
}

impl Transformer for StemTokens {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn kind(&self) -> TransformerKind {
        TransformerKind::Normalizer
    }

    fn params(&self) -> &Params {
        &self.params
    }

    fn transform(&self, doc: &mut Document) -> Result<(), TransformError> {
        let stemmer = Stemmer::create(self.language.algorithm());
        for token in doc.tokens.iter_mut().flatten() {
            token.stem = Some(stemmer.stem(token.cleaned_text()).into_owned());
        }
        Ok(())
    }
}
