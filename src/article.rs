//! The extraction pipeline and its `Article` aggregate.
//!
//! An [`Article`] is a small state machine. It is constructed unparsed
//! with the raw HTML and a configuration; [`Article::parse`] runs the
//! whole pipeline once (tree build, metadata pulls, cleaning, scoring,
//! video discovery, post-cleanup, formatting) and moves it to the parsed
//! state. Accessors that depend on pipeline output return
//! [`Error::NotParsed`] until then, so forgetting to parse is a visible
//! error instead of a silent empty result.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::cleaner::DocumentCleaner;
use crate::config::Configuration;
use crate::encoding::transcode_to_utf8;
use crate::error::{Error, Result};
use crate::formatter::OutputFormatter;
use crate::language::{Language, LanguageRegistry};
use crate::metadata;
use crate::postclean::PostCleanup;
use crate::scorer::NodeScorer;
use crate::tree::{DocumentTree, NodeId};
use crate::videos::discover_videos;

/// Lifecycle state of an [`Article`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed; no pipeline output is available yet.
    Unparsed,
    /// `parse()` completed; all accessors are live.
    Parsed,
}

/// Document metadata pulled directly from markup, independent of the
/// scoring heuristics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ArticleMetadata {
    /// Best available title, capped at `max_title` characters.
    pub title: Option<String>,
    /// Author names in discovery order, capped at `max_authors`.
    pub authors: Vec<String>,
    /// Declared document language (two-letter lowercase code).
    pub meta_lang: Option<String>,
    /// Meta description.
    pub meta_description: Option<String>,
    /// Meta keywords, capped at `max_keywords`.
    pub meta_keywords: Vec<String>,
    /// Page tags from `rel="tag"` links (or tag-listing hrefs).
    pub tags: Vec<String>,
    /// Site name from og:site_name.
    pub meta_site_name: Option<String>,
    /// Declared page type (og:type or JSON-LD @type, lowercased).
    pub meta_type: Option<String>,
    /// Canonical URL for the page.
    pub canonical_link: Option<String>,
    /// Favicon href, as declared.
    pub meta_favicon: Option<String>,
    /// Every meta name/property mapped to its content.
    pub meta_data: BTreeMap<String, String>,
}

/// Everything `parse()` produces, held together so the parsed state is
/// either fully present or fully absent.
struct Parsed {
    metadata: ArticleMetadata,
    language: Arc<Language>,
    text: String,
    article_html: String,
    movies: Vec<String>,
    top_node: Option<NodeId>,
    doc: DocumentTree,
    clean_doc: DocumentTree,
    clean_top_node: Option<DocumentTree>,
}

/// A single document moving through the extraction pipeline.
pub struct Article {
    html: String,
    config: Configuration,
    registry: Arc<LanguageRegistry>,
    summary: Option<String>,
    parsed: Option<Parsed>,
}

impl Article {
    /// Create an unparsed article from a UTF-8 HTML string.
    ///
    /// The configuration is validated here, so hand-assembled structs are
    /// rejected at the same point builder-made ones would be.
    pub fn new(html: impl Into<String>, config: Configuration) -> Result<Self> {
        Self::with_registry(html, config, Arc::new(LanguageRegistry::builtin()))
    }

    /// Create an unparsed article with a caller-owned language registry.
    ///
    /// Lets callers register custom stopword sets once and share the
    /// registry across many articles.
    pub fn with_registry(
        html: impl Into<String>,
        config: Configuration,
        registry: Arc<LanguageRegistry>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            html: html.into(),
            config,
            registry,
            summary: None,
            parsed: None,
        })
    }

    /// Create an unparsed article from raw bytes, transcoding to UTF-8
    /// using any charset the document declares.
    pub fn from_bytes(bytes: &[u8], config: Configuration) -> Result<Self> {
        Self::new(transcode_to_utf8(bytes), config)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        if self.parsed.is_some() {
            PipelineState::Parsed
        } else {
            PipelineState::Unparsed
        }
    }

    /// Run the extraction pipeline.
    ///
    /// Idempotent: a second call on a parsed article is a no-op. On error
    /// the article stays unparsed.
    pub fn parse(&mut self) -> Result<()> {
        if self.parsed.is_some() {
            return Ok(());
        }

        let doc = DocumentTree::parse(&self.html)?;
        let clean_doc = doc.deep_clone();

        // Metadata comes off the untouched snapshot; the cleaner strips
        // <head> from the working tree.
        let metadata = self.pull_metadata(&clean_doc);
        debug!(
            "metadata: title={:?} authors={} lang={:?}",
            metadata.title,
            metadata.authors.len(),
            metadata.meta_lang
        );

        let language = self.select_language(metadata.meta_lang.as_deref());

        let mut work = doc;
        DocumentCleaner::new(&self.config).clean(&mut work);

        let top_node = NodeScorer::new(&self.config, Arc::clone(&language)).best_node(&work)?;
        debug!("scoring: top_node={top_node:?}");

        let mut movies = Vec::new();
        let mut clean_top_node = None;
        let mut text = String::new();
        let mut article_html = String::new();

        if let Some(top) = top_node {
            movies = discover_videos(&work, top, metadata.canonical_link.as_deref());

            PostCleanup::new(&self.config).prune(&mut work, top);
            clean_top_node = Some(work.clone_subtree(top));

            let formatter = OutputFormatter::new(&self.config, Arc::clone(&language));
            (text, article_html) = formatter.get_formatted(&work, top);
        }
        debug!(
            "output: {} text chars, {} videos",
            text.chars().count(),
            movies.len()
        );

        self.parsed = Some(Parsed {
            metadata,
            language,
            text,
            article_html,
            movies,
            top_node,
            doc: work,
            clean_doc,
            clean_top_node,
        });
        Ok(())
    }

    fn pull_metadata(&self, tree: &DocumentTree) -> ArticleMetadata {
        let title = metadata::title(tree).map(|t| cap_chars(&t, self.config.max_title));

        let mut authors = metadata::authors(tree);
        authors.truncate(self.config.max_authors);

        let mut meta_keywords = metadata::meta_keywords(tree);
        meta_keywords.truncate(self.config.max_keywords);

        ArticleMetadata {
            title,
            authors,
            meta_lang: metadata::meta_lang(tree),
            meta_description: metadata::meta_description(tree),
            meta_keywords,
            tags: metadata::tags(tree),
            meta_site_name: metadata::meta_site_name(tree),
            meta_type: metadata::meta_type(tree),
            canonical_link: metadata::canonical_link(tree),
            meta_favicon: metadata::meta_favicon(tree),
            meta_data: metadata::meta_data(tree),
        }
    }

    /// Configured language, overridden by the document's declared language
    /// when `use_meta_language` is set and the registry knows the code.
    fn select_language(&self, meta_lang: Option<&str>) -> Arc<Language> {
        if self.config.use_meta_language {
            if let Some(code) = meta_lang {
                if let Some(language) = self.registry.get(code) {
                    if code != self.config.language {
                        debug!("language: switching to declared {code:?}");
                    }
                    return language;
                }
            }
        }
        self.registry.get_or_default(&self.config.language)
    }

    fn require_parsed(&self) -> Result<&Parsed> {
        self.parsed.as_ref().ok_or(Error::NotParsed)
    }

    /// Extracted body text with paragraphs separated by blank lines.
    pub fn text(&self) -> Result<&str> {
        Ok(&self.require_parsed()?.text)
    }

    /// Minimal normalized HTML rendering of the article body.
    pub fn article_html(&self) -> Result<&str> {
        Ok(&self.require_parsed()?.article_html)
    }

    /// Best available title, if any.
    pub fn title(&self) -> Result<Option<&str>> {
        Ok(self.require_parsed()?.metadata.title.as_deref())
    }

    /// Author names in discovery order.
    pub fn authors(&self) -> Result<&[String]> {
        Ok(&self.require_parsed()?.metadata.authors)
    }

    /// Video source URLs found inside the winning node.
    pub fn movies(&self) -> Result<&[String]> {
        Ok(&self.require_parsed()?.movies)
    }

    /// Page tags from `rel="tag"` links.
    pub fn tags(&self) -> Result<&[String]> {
        Ok(&self.require_parsed()?.metadata.tags)
    }

    /// All directly-pulled metadata.
    pub fn metadata(&self) -> Result<&ArticleMetadata> {
        Ok(&self.require_parsed()?.metadata)
    }

    /// Language the pipeline actually ran with.
    pub fn language(&self) -> Result<&str> {
        Ok(self.require_parsed()?.language.code())
    }

    /// Identity of the winning node in [`Article::doc`], or `None` when no
    /// node cleared the score threshold.
    pub fn top_node(&self) -> Result<Option<NodeId>> {
        Ok(self.require_parsed()?.top_node)
    }

    /// The cleaned working tree the winner was selected from.
    pub fn doc(&self) -> Result<&DocumentTree> {
        Ok(&self.require_parsed()?.doc)
    }

    /// Untouched parse snapshot, taken before any cleaning.
    pub fn clean_doc(&self) -> Result<&DocumentTree> {
        Ok(&self.require_parsed()?.clean_doc)
    }

    /// Standalone copy of the winning subtree after post-cleanup.
    pub fn clean_top_node(&self) -> Result<Option<&DocumentTree>> {
        Ok(self.require_parsed()?.clean_top_node.as_ref())
    }

    /// Attach a caller-supplied summary, capped at `max_summary` characters.
    ///
    /// The pipeline never generates summaries; this slot exists so callers
    /// running their own summarization can keep the result with the article.
    pub fn set_summary(&mut self, summary: impl Into<String>) {
        self.summary = Some(cap_chars(&summary.into(), self.config.max_summary));
    }

    /// Caller-supplied summary, if one was set.
    #[must_use]
    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    /// Judge whether the extracted body looks like a genuine article.
    ///
    /// A declared article page type plus enough words is an immediate pass.
    /// Otherwise the body fails on a missing or one-word title, too few
    /// words, or too few sentences.
    pub fn is_valid_body(&self) -> Result<bool> {
        let parsed = self.require_parsed()?;
        let words = parsed.text.split_whitespace().count();

        let declared_article = parsed
            .metadata
            .meta_type
            .as_deref()
            .is_some_and(|t| t.contains("article"));
        if declared_article && words > self.config.min_word_count {
            debug!("validity: declared article type with {words} words");
            return Ok(true);
        }

        let title_words = parsed
            .metadata
            .title
            .as_deref()
            .map_or(0, |t| t.split_whitespace().count());
        if title_words < 2 {
            debug!("validity: rejected, title has {title_words} words");
            return Ok(false);
        }

        if words < self.config.min_word_count {
            debug!("validity: rejected, {words} words");
            return Ok(false);
        }

        let sentences = parsed.language.sentence_count(&parsed.text);
        if sentences < self.config.min_sent_count {
            debug!("validity: rejected, {sentences} sentences");
            return Ok(false);
        }

        Ok(true)
    }
}

/// Truncate on a character boundary without splitting a code point.
fn cap_chars(text: &str, cap: usize) -> String {
    if text.chars().count() <= cap {
        return text.to_string();
    }
    text.chars().take(cap).collect()
}
