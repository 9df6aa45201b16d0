//! Name → constructor table used to rebuild transformers from step strings.
//!
//! Step strings are parsed by the literal-only grammar in [`crate::step`] and
//! resolved here. Nothing is ever evaluated, so a step can only name a
//! registered transformer and pass it literal arguments.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use tracing::debug;

use crate::cleaners::{
    CleanAccents, CleanEmail, CleanMarkup, CleanNumber, CleanPunctuation, CleanURL,
    CleanWhitespace,
};
use crate::embeddings::{HashEmbeddings, WordEmbeddings};
use crate::error::TransformError;
use crate::normalizers::{
    CaseTokens, NormalizeUnicode, RemovePunctuation, RemoveStopWords, StemTokens,
};
use crate::params::Params;
use crate::step::parse_step;
use crate::tokenizers::{BasicTokenizer, WordTokenizer};
use crate::transformer::{FromParams, Transformer};

/// Builds a transformer from bound constructor arguments.
pub type Factory = fn(&Params) -> Result<Box<dyn Transformer>, TransformError>;

fn construct<T>(params: &Params) -> Result<Box<dyn Transformer>, TransformError>
where
    T: FromParams + Transformer + 'static,
{
    Ok(Box::new(T::from_params(params)?))
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    factories: BTreeMap<String, Factory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in transformer.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_type::<CleanURL>();
        registry.register_type::<CleanEmail>();
        registry.register_type::<CleanNumber>();
        registry.register_type::<CleanPunctuation>();
        registry.register_type::<CleanMarkup>();
        registry.register_type::<CleanAccents>();
        registry.register_type::<CleanWhitespace>();
        registry.register_type::<BasicTokenizer>();
        registry.register_type::<WordTokenizer>();
        registry.register_type::<CaseTokens>();
        registry.register_type::<RemovePunctuation>();
        registry.register_type::<RemoveStopWords>();
        registry.register_type::<NormalizeUnicode>();
        registry.register_type::<StemTokens>();
        registry.register_type::<HashEmbeddings>();
        registry.register_type::<WordEmbeddings>();
        registry
    }

    /// Shared read-only registry of the built-ins.
    pub fn global() -> &'static Registry {
        static GLOBAL: OnceLock<Registry> = OnceLock::new();
        GLOBAL.get_or_init(Registry::with_defaults)
    }

    /// Registers `factory` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, factory: Factory) -> &mut Self {
        self.factories.insert(name.into(), factory);
        self
    }

    /// Registers `T` under its [`FromParams::NAME`].
    pub fn register_type<T>(&mut self) -> &mut Self
    where
        T: FromParams + Transformer + 'static,
    {
        self.register(T::NAME, construct::<T>)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Parses one step string and constructs the transformer it names.
    pub fn build(&self, step: &str) -> Result<Box<dyn Transformer>, TransformError> {
        self.build_at(step, 0, &[step])
    }

    /// Builds every step in order; the first failure aborts the whole list.
    pub fn build_all<S: AsRef<str>>(
        &self,
        steps: &[S],
    ) -> Result<Vec<Box<dyn Transformer>>, TransformError> {
        steps
            .iter()
            .enumerate()
            .map(|(index, step)| self.build_at(step.as_ref(), index, steps))
            .collect()
    }

    fn build_at<S: AsRef<str>>(
        &self,
        step: &str,
        index: usize,
        steps: &[S],
    ) -> Result<Box<dyn Transformer>, TransformError> {
        let parsed = parse_step(step).map_err(|err| err.at_step(index, step))?;
        let factory =
            self.factories
                .get(&parsed.name)
                .ok_or_else(|| TransformError::UnknownTransformer {
                    name: parsed.name.clone(),
                    index,
                    steps: steps.iter().map(|s| s.as_ref().to_string()).collect(),
                })?;
        let transformer = factory(&parsed.params).map_err(|err| err.at_step(index, step))?;
        debug!(step = %transformer.identity(), "transformer_created");
        Ok(transformer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::kind::TransformerKind;
    use document::Document;

    #[test]
    fn defaults_cover_every_builtin() {
        let names: Vec<&str> = Registry::global().names().collect();
        for expected in [
            "BasicTokenizer",
            "CaseTokens",
            "CleanAccents",
            "CleanEmail",
            "CleanMarkup",
            "CleanNumber",
            "CleanPunctuation",
            "CleanURL",
            "CleanWhitespace",
            "HashEmbeddings",
            "NormalizeUnicode",
            "RemovePunctuation",
            "RemoveStopWords",
            "StemTokens",
            "WordEmbeddings",
            "WordTokenizer",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn build_round_trips_identity() {
        let registry = Registry::global();
        for step in [
            "CleanNumber()",
            "BasicTokenizer()",
            "CaseTokens(mode='upper')",
            "RemoveStopWords(language='english', case_sensitive=False)",
            "HashEmbeddings(dim=8, apply_doc='sum', normalize=True)",
        ] {
            let built = registry.build(step).unwrap();
            assert_eq!(built.identity(), step);
            assert_eq!(registry.build(&built.identity()).unwrap().identity(), step);
        }
    }

    #[test]
    fn build_canonicalizes_arguments() {
        let t = Registry::global().build("CaseTokens('lower')").unwrap();
        assert_eq!(t.identity(), "CaseTokens(mode='lower')");
        assert_eq!(t.kind(), TransformerKind::Normalizer);
    }

    #[test]
    fn unknown_name_reports_index_and_steps() {
        let err = Registry::global()
            .build_all(&["CleanNumber()", "Nope()"])
            .unwrap_err();
        match &err {
            TransformError::UnknownTransformer { name, index, steps } => {
                assert_eq!(name, "Nope");
                assert_eq!(*index, 1);
                assert_eq!(steps, &vec!["CleanNumber()".to_string(), "Nope()".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.kind(), ErrorKind::NameResolution);
    }

    #[test]
    fn bad_arguments_surface_as_type_errors() {
        let err = Registry::global().build("CaseTokens(mode=1)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        let err = Registry::global().build("CleanURL(strict=True)").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
    }

    #[test]
    fn parse_and_argument_failures_name_their_step() {
        let steps = ["CleanNumber()", "BasicTokenizer()", "CaseTokens(", "CleanURL()"];
        let err = Registry::global().build_all(&steps).unwrap_err();
        match &err {
            TransformError::InvalidStep { step, index, .. } => {
                assert_eq!(step, "CaseTokens(");
                assert_eq!(*index, 2);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = Registry::global()
            .build_all(&["CleanNumber()", "CaseTokens(mode=1)"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(err.to_string().contains("step 1 `CaseTokens(mode=1)`"), "{err}");

        let err = Registry::global()
            .build_all(&["BasicTokenizer()", "HashEmbeddings(dim=0)"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Value);
        assert!(err.to_string().contains("step 1 `HashEmbeddings(dim=0)`"), "{err}");
    }

    #[test]
    fn custom_factories_can_be_registered() {
        fn upper(_: &Params) -> Result<Box<dyn Transformer>, TransformError> {
            Ok(Box::new(crate::normalizers::CaseTokens::new(
                crate::normalizers::CaseMode::Upper,
            )))
        }

        let mut registry = Registry::with_defaults();
        registry.register("Shout", upper);
        assert!(registry.contains("Shout"));
        assert!(!Registry::global().contains("Shout"));

        let t = registry.build("Shout()").unwrap();
        let doc = crate::tokenizers::BasicTokenizer::new()
            .apply(&Document::new("hey"))
            .unwrap();
        assert_eq!(t.apply(&doc).unwrap().token_texts(), vec!["HEY"]);
    }
}
