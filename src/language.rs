//! Language registry: stopwords and sentence punctuation per language.
//!
//! The registry is explicit and caller-owned: build it once, wrap it in an
//! `Arc`, and share it read-only across concurrent pipeline runs. Nothing in
//! here scans directories or mutates global state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Latin-script sentence-ending punctuation.
const LATIN_SENTENCE_MARKS: &[char] = &['.', '!', '?'];

/// CJK sentence-ending punctuation (full stops, question/exclamation marks).
const CJK_SENTENCE_MARKS: &[char] = &['\u{3002}', '\u{ff01}', '\u{ff1f}', '.', '!', '?'];

/// A small built-in stopword sample per language; enough for boilerplate
/// heuristics, not a linguistics resource. Callers needing full lists can
/// register their own.
const EN_STOPWORDS: &[&str] = &[
    "a", "about", "after", "all", "also", "an", "and", "any", "are", "as",
    "at", "be", "because", "been", "but", "by", "can", "could", "did", "do",
    "for", "from", "had", "has", "have", "he", "her", "his", "how", "i",
    "if", "in", "into", "is", "it", "its", "just", "more", "most", "not",
    "of", "on", "one", "or", "other", "our", "out", "over", "said", "she",
    "so", "some", "than", "that", "the", "their", "them", "then", "there",
    "these", "they", "this", "to", "up", "was", "we", "were", "what", "when",
    "which", "who", "will", "with", "would", "you",
];

const ES_STOPWORDS: &[&str] = &[
    "a", "al", "como", "con", "de", "del", "el", "en", "es", "esta", "fue",
    "la", "las", "lo", "los", "mas", "no", "para", "pero", "por", "que",
    "se", "si", "sin", "sobre", "su", "sus", "un", "una", "y", "ya",
];

const FR_STOPWORDS: &[&str] = &[
    "au", "aux", "avec", "ce", "ces", "dans", "de", "des", "du", "elle",
    "en", "et", "il", "je", "la", "le", "les", "mais", "ne", "nous", "on",
    "ou", "par", "pas", "plus", "pour", "qui", "que", "se", "son", "sur",
    "un", "une", "vous",
];

const DE_STOPWORDS: &[&str] = &[
    "aber", "als", "auch", "auf", "aus", "bei", "das", "dass", "dem", "den",
    "der", "die", "ein", "eine", "er", "es", "im", "in", "ist", "mit",
    "nach", "nicht", "noch", "sich", "sie", "und", "von", "war", "wie",
    "wird", "zu", "zum", "zur",
];

/// Per-language resources: stopwords plus the sentence-punctuation set used
/// by scoring and formatting heuristics.
#[derive(Debug, Clone)]
pub struct Language {
    code: String,
    stopwords: HashSet<String>,
    sentence_marks: Vec<char>,
}

impl Language {
    /// Create a language entry from a two-letter code, stopwords and the
    /// sentence-punctuation set.
    #[must_use]
    pub fn new<I, S>(code: &str, stopwords: I, sentence_marks: &[char]) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            code: code.to_string(),
            stopwords: stopwords.into_iter().map(Into::into).collect(),
            sentence_marks: sentence_marks.to_vec(),
        }
    }

    /// ISO 639-1 code of this language.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Sentence-ending punctuation for this language.
    #[must_use]
    pub fn sentence_marks(&self) -> &[char] {
        &self.sentence_marks
    }

    /// Count stopwords among whitespace-separated words of `text`.
    #[must_use]
    pub fn stopword_count(&self, text: &str) -> usize {
        text.split_whitespace()
            .filter(|w| {
                let word: String = w
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect::<String>()
                    .to_lowercase();
                !word.is_empty() && self.stopwords.contains(&word)
            })
            .count()
    }

    /// Count sentence-ending marks in `text`.
    #[must_use]
    pub fn sentence_count(&self, text: &str) -> usize {
        text.chars()
            .filter(|c| self.sentence_marks.contains(c))
            .count()
    }
}

/// Registry of [`Language`] entries keyed by ISO 639-1 code.
///
/// ```rust
/// use std::sync::Arc;
/// use broadsheet::LanguageRegistry;
///
/// let registry = Arc::new(LanguageRegistry::builtin());
/// assert!(registry.get("en").is_some());
/// assert!(registry.get("xx").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: HashMap<String, Arc<Language>>,
}

impl LanguageRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            languages: HashMap::new(),
        }
    }

    /// Registry preloaded with the built-in languages
    /// (en, es, fr, de, zh, ja).
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Language::new("en", EN_STOPWORDS.iter().copied(), LATIN_SENTENCE_MARKS));
        registry.register(Language::new("es", ES_STOPWORDS.iter().copied(), LATIN_SENTENCE_MARKS));
        registry.register(Language::new("fr", FR_STOPWORDS.iter().copied(), LATIN_SENTENCE_MARKS));
        registry.register(Language::new("de", DE_STOPWORDS.iter().copied(), LATIN_SENTENCE_MARKS));
        registry.register(Language::new("zh", std::iter::empty::<String>(), CJK_SENTENCE_MARKS));
        registry.register(Language::new("ja", std::iter::empty::<String>(), CJK_SENTENCE_MARKS));
        registry
    }

    /// Register (or replace) a language entry.
    pub fn register(&mut self, language: Language) {
        self.languages
            .insert(language.code.clone(), Arc::new(language));
    }

    /// Look up a language by code.
    #[must_use]
    pub fn get(&self, code: &str) -> Option<Arc<Language>> {
        self.languages.get(code).cloned()
    }

    /// Look up a language, falling back to English, then to a minimal
    /// Latin-punctuation entry if even English was not registered.
    #[must_use]
    pub fn get_or_default(&self, code: &str) -> Arc<Language> {
        self.get(code)
            .or_else(|| self.get("en"))
            .unwrap_or_else(|| {
                Arc::new(Language::new(
                    code,
                    std::iter::empty::<String>(),
                    LATIN_SENTENCE_MARKS,
                ))
            })
    }

    /// Codes of all registered languages.
    #[must_use]
    pub fn available(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.languages.keys().cloned().collect();
        codes.sort();
        codes
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
