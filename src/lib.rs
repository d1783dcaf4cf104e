//! # broadsheet
//!
//! Article content extraction: pull the main article body, title, byline
//! and embedded videos out of arbitrary HTML pages.
//!
//! The pipeline parses the page into an arena document tree, strips
//! boilerplate (navigation, ads, scripts, share widgets), scores block
//! containers by prose density against link density, selects the best
//! node, prunes its weak children, and renders the result as plain text
//! and as minimal normalized HTML. Metadata (title, authors, language,
//! canonical link, Open Graph and JSON-LD fields) is pulled directly from
//! markup, independent of the heuristics.
//!
//! ## Quick start
//!
//! ```rust
//! use broadsheet::{Article, Configuration};
//!
//! let html = r#"
//!     <html><head><title>Findings Published | Example News</title></head>
//!     <body>
//!       <nav><a href="/">Home</a><a href="/world">World</a></nav>
//!       <div>
//!         <p>The committee published its findings on Tuesday after a lengthy
//!         review. Observers called the report unusually detailed.</p>
//!         <p>Further hearings are expected before the end of the year, with
//!         testimony from several senior officials already scheduled.</p>
//!       </div>
//!     </body></html>"#;
//!
//! let mut article = Article::new(html, Configuration::default())?;
//! article.parse()?;
//!
//! assert_eq!(article.title()?, Some("Findings Published"));
//! assert!(article.text()?.contains("committee published its findings"));
//! assert!(!article.text()?.contains("Home"));
//! # Ok::<(), broadsheet::Error>(())
//! ```
//!
//! Output is deterministic: the same input bytes and configuration always
//! produce byte-identical text and HTML. Extraction never fetches anything
//! over the network; the caller supplies the HTML.

pub mod article;
pub mod cleaner;
pub mod config;
pub mod encoding;
pub mod error;
pub mod formatter;
pub mod language;
pub mod metadata;
pub mod patterns;
pub mod postclean;
pub mod scorer;
pub mod tree;
pub mod videos;

pub use article::{Article, ArticleMetadata, PipelineState};
pub use config::{Configuration, ConfigurationBuilder};
pub use error::{Error, Result};
pub use language::{Language, LanguageRegistry};
pub use tree::{DocumentTree, NodeId};

/// Parse a UTF-8 HTML string with default settings.
///
/// Convenience wrapper for one-off extraction; construct an [`Article`]
/// directly to reuse a configuration or registry.
pub fn extract(html: &str) -> Result<Article> {
    let mut article = Article::new(html, Configuration::default())?;
    article.parse()?;
    Ok(article)
}

/// Parse raw HTML bytes with default settings, transcoding to UTF-8
/// using any charset the document declares.
pub fn extract_bytes(bytes: &[u8]) -> Result<Article> {
    let mut article = Article::from_bytes(bytes, Configuration::default())?;
    article.parse()?;
    Ok(article)
}
