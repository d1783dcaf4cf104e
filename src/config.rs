//! Configuration for the extraction pipeline.
//!
//! `Configuration` is a plain struct with public fields and sensible
//! defaults. Unlike loosely-typed option bags, every setting is a named,
//! typed field: an unrecognized option simply does not compile, and invalid
//! values are rejected at construction time by [`ConfigurationBuilder`].

use crate::error::{Error, Result};
use crate::patterns::DEFAULT_BOILERPLATE_TOKENS;

/// Configuration for content extraction.
///
/// Use `Configuration::default()` for standard settings, or the builder for
/// validated construction:
///
/// ```rust
/// use broadsheet::Configuration;
///
/// let config = Configuration::builder()
///     .max_text(50_000)
///     .language("de")
///     .build()?;
/// assert_eq!(config.max_text, 50_000);
/// # Ok::<(), broadsheet::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Configuration {
    /// Cap on extracted body text length (characters).
    ///
    /// Default: `100_000`
    pub max_text: usize,

    /// Cap on title length (characters).
    ///
    /// Default: `200`
    pub max_title: usize,

    /// Cap on a caller-supplied summary (characters).
    ///
    /// Default: `500`
    pub max_summary: usize,

    /// Maximum number of meta keywords kept.
    ///
    /// Default: `35`
    pub max_keywords: usize,

    /// Maximum number of authors kept.
    ///
    /// Default: `10`
    pub max_authors: usize,

    /// Minimum word count for a body to be considered a valid article.
    ///
    /// Default: `300`
    pub min_word_count: usize,

    /// Minimum sentence count for a body to be considered a valid article.
    ///
    /// Default: `7`
    pub min_sent_count: usize,

    /// Switch the pipeline language to the document's declared meta language
    /// when that language is present in the registry.
    ///
    /// Default: `true`
    pub use_meta_language: bool,

    /// Pipeline language as an ISO 639-1 two-letter code.
    ///
    /// Governs the sentence-punctuation set used by scoring and formatting.
    ///
    /// Default: `"en"`
    pub language: String,

    /// Minimum winning score; at or below this the scorer reports no
    /// selection and the pipeline completes with empty output.
    ///
    /// Default: `25.0`
    pub min_node_score: f64,

    /// Link density above which a non-paragraph subtree inside the winner
    /// is pruned during post-cleanup.
    ///
    /// Default: `0.5`
    pub max_link_density: f64,

    /// Minimum word count for a non-paragraph subtree inside the winner to
    /// survive post-cleanup.
    ///
    /// Default: `25`
    pub min_subtree_words: usize,

    /// Hard bound on scoring candidates; exceeding it fails fast with
    /// [`Error::DocumentTooLarge`] instead of degrading unboundedly.
    ///
    /// Default: `10_000`
    pub max_candidates: usize,

    /// Class/id tokens marking elements as boilerplate for the cleaner.
    ///
    /// Default: [`DEFAULT_BOILERPLATE_TOKENS`]
    pub boilerplate_tokens: Vec<String>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            max_text: 100_000,
            max_title: 200,
            max_summary: 500,
            max_keywords: 35,
            max_authors: 10,
            min_word_count: 300,
            min_sent_count: 7,
            use_meta_language: true,
            language: "en".to_string(),
            min_node_score: 25.0,
            max_link_density: 0.5,
            min_subtree_words: 25,
            max_candidates: 10_000,
            boilerplate_tokens: DEFAULT_BOILERPLATE_TOKENS
                .iter()
                .map(|s| (*s).to_string())
                .collect(),
        }
    }
}

impl Configuration {
    /// Start building a validated configuration.
    #[must_use]
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder {
            config: Self::default(),
        }
    }

    /// Validate field values; called by the builder and by the pipeline
    /// constructor so hand-assembled structs are checked too.
    pub fn validate(&self) -> Result<()> {
        if self.max_text == 0 {
            return Err(Error::Config("max_text must be nonzero".into()));
        }
        if self.max_title == 0 {
            return Err(Error::Config("max_title must be nonzero".into()));
        }
        if self.max_candidates == 0 {
            return Err(Error::Config("max_candidates must be nonzero".into()));
        }
        if self.language.len() != 2 || !self.language.chars().all(|c| c.is_ascii_lowercase()) {
            return Err(Error::Config(format!(
                "language must be a two-letter ISO 639-1 code, got {:?}",
                self.language
            )));
        }
        if !(0.0..=1.0).contains(&self.max_link_density) {
            return Err(Error::Config(
                "max_link_density must be within [0, 1]".into(),
            ));
        }
        if self.min_node_score < 0.0 {
            return Err(Error::Config("min_node_score must not be negative".into()));
        }
        if self.boilerplate_tokens.iter().any(String::is_empty) {
            return Err(Error::Config(
                "boilerplate_tokens must not contain empty patterns".into(),
            ));
        }
        Ok(())
    }
}

/// Builder performing construction-time validation of [`Configuration`].
#[derive(Debug, Clone)]
pub struct ConfigurationBuilder {
    config: Configuration,
}

impl ConfigurationBuilder {
    /// Cap on extracted body text length (characters).
    #[must_use]
    pub fn max_text(mut self, value: usize) -> Self {
        self.config.max_text = value;
        self
    }

    /// Cap on title length (characters).
    #[must_use]
    pub fn max_title(mut self, value: usize) -> Self {
        self.config.max_title = value;
        self
    }

    /// Cap on a caller-supplied summary (characters).
    #[must_use]
    pub fn max_summary(mut self, value: usize) -> Self {
        self.config.max_summary = value;
        self
    }

    /// Maximum number of meta keywords kept.
    #[must_use]
    pub fn max_keywords(mut self, value: usize) -> Self {
        self.config.max_keywords = value;
        self
    }

    /// Maximum number of authors kept.
    #[must_use]
    pub fn max_authors(mut self, value: usize) -> Self {
        self.config.max_authors = value;
        self
    }

    /// Minimum word count for the validity check.
    #[must_use]
    pub fn min_word_count(mut self, value: usize) -> Self {
        self.config.min_word_count = value;
        self
    }

    /// Minimum sentence count for the validity check.
    #[must_use]
    pub fn min_sent_count(mut self, value: usize) -> Self {
        self.config.min_sent_count = value;
        self
    }

    /// Adopt the document's declared meta language when registered.
    #[must_use]
    pub fn use_meta_language(mut self, value: bool) -> Self {
        self.config.use_meta_language = value;
        self
    }

    /// Pipeline language (ISO 639-1 two-letter code).
    #[must_use]
    pub fn language(mut self, value: &str) -> Self {
        self.config.language = value.to_string();
        self
    }

    /// Minimum winning node score.
    #[must_use]
    pub fn min_node_score(mut self, value: f64) -> Self {
        self.config.min_node_score = value;
        self
    }

    /// Link-density pruning threshold for post-cleanup.
    #[must_use]
    pub fn max_link_density(mut self, value: f64) -> Self {
        self.config.max_link_density = value;
        self
    }

    /// Minimum subtree word count for post-cleanup survival.
    #[must_use]
    pub fn min_subtree_words(mut self, value: usize) -> Self {
        self.config.min_subtree_words = value;
        self
    }

    /// Hard bound on scoring candidates.
    #[must_use]
    pub fn max_candidates(mut self, value: usize) -> Self {
        self.config.max_candidates = value;
        self
    }

    /// Replace the boilerplate token blocklist.
    #[must_use]
    pub fn boilerplate_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.boilerplate_tokens = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Validate and produce the configuration.
    pub fn build(self) -> Result<Configuration> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_thresholds() {
        let config = Configuration::default();

        assert_eq!(config.max_text, 100_000);
        assert_eq!(config.max_title, 200);
        assert_eq!(config.max_summary, 500);
        assert_eq!(config.max_keywords, 35);
        assert_eq!(config.max_authors, 10);
        assert_eq!(config.min_word_count, 300);
        assert_eq!(config.min_sent_count, 7);
        assert!(config.use_meta_language);
        assert_eq!(config.language, "en");
        assert!((config.min_node_score - 25.0).abs() < f64::EPSILON);
        assert!((config.max_link_density - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.min_subtree_words, 25);
        assert_eq!(config.max_candidates, 10_000);
        assert!(!config.boilerplate_tokens.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_produces_validated_config() {
        let config = Configuration::builder()
            .max_text(5000)
            .language("fr")
            .min_word_count(100)
            .build()
            .unwrap();

        assert_eq!(config.max_text, 5000);
        assert_eq!(config.language, "fr");
        assert_eq!(config.min_word_count, 100);
    }

    #[test]
    fn invalid_language_is_a_construction_error() {
        let err = Configuration::builder().language("english").build();
        assert!(matches!(err, Err(crate::Error::Config(_))));

        let err = Configuration::builder().language("EN").build();
        assert!(matches!(err, Err(crate::Error::Config(_))));
    }

    #[test]
    fn zero_caps_are_rejected() {
        assert!(Configuration::builder().max_text(0).build().is_err());
        assert!(Configuration::builder().max_title(0).build().is_err());
        assert!(Configuration::builder().max_candidates(0).build().is_err());
    }

    #[test]
    fn link_density_outside_unit_interval_is_rejected() {
        assert!(Configuration::builder().max_link_density(1.5).build().is_err());
        assert!(Configuration::builder().max_link_density(-0.1).build().is_err());
        assert!(Configuration::builder().max_link_density(1.0).build().is_ok());
    }

    #[test]
    fn custom_blocklist_replaces_default() {
        let config = Configuration::builder()
            .boilerplate_tokens(["promo", "partner"])
            .build()
            .unwrap();
        assert_eq!(config.boilerplate_tokens, vec!["promo", "partner"]);
    }

    #[test]
    fn empty_blocklist_pattern_is_rejected() {
        let config = Configuration::builder()
            .boilerplate_tokens(["ok", ""])
            .build();
        assert!(config.is_err());
    }
}
