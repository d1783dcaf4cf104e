//! Compiled regex patterns and blocklist tokens for content extraction.
//!
//! All patterns are compiled once at first use via `LazyLock`. The default
//! boilerplate token list lives here as well; `Configuration` copies it so
//! callers can extend or replace it per pipeline.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Default class/id tokens marking an element as boilerplate.
///
/// Matching is token-based: the `class`/`id` value is split on `-`, `_` and
/// whitespace, then each token is compared against these patterns (exact
/// match always; substring match only for patterns of 4+ characters, so
/// short tokens like "ad" never match inside "header" or "read").
pub const DEFAULT_BOILERPLATE_TOKENS: &[&str] = &[
    "ad",
    "ads",
    "advert",
    "advertisement",
    "banner",
    "breadcrumb",
    "byline",
    "caption",
    "comment",
    "comments",
    "cookie",
    "combx",
    "community",
    "disqus",
    "footer",
    "footnote",
    "masthead",
    "menu",
    "nav",
    "navbar",
    "navigation",
    "newsletter",
    "outbrain",
    "pager",
    "pagination",
    "popup",
    "promo",
    "related",
    "retweet",
    "scroll",
    "share",
    "sharing",
    "shoutbox",
    "sidebar",
    "signup",
    "social",
    "sponsor",
    "sponsored",
    "subscribe",
    "subscription",
    "taboola",
    "tagcloud",
    "tools",
    "trending",
    "widget",
];

/// Tag names removed outright by the cleaner (never article content).
pub const NON_CONTENT_TAGS: &[&str] = &[
    "script", "style", "noscript", "form", "button", "select", "input",
    "textarea", "option", "canvas", "map", "svg",
];

/// Landmark tags removed when they sit at section level (direct children of
/// `body`, `html` or `main`), not when nested inside article markup.
pub const LANDMARK_TAGS: &[&str] = &["nav", "aside", "header", "footer"];

/// Void/media tags the cleaner keeps even when they carry no text.
///
/// Iframes and embeds must survive cleaning because video discovery runs on
/// the winning node afterwards.
pub const MEDIA_TAGS: &[&str] = &[
    "br", "hr", "img", "iframe", "embed", "object", "video", "audio", "source",
];

/// Structural tags preserved in the minimal article HTML output.
pub const STRUCTURAL_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "ul", "ol", "li", "blockquote",
    "pre", "br",
];

/// Matches runs of whitespace for normalization.
pub static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\n\f]+").expect("WHITESPACE regex"));

/// Matches common separators between an article title and the site name.
pub static TITLE_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[|\u{2013}\u{2014}\u{00bb}]\s+").expect("TITLE_SEPARATOR regex"));

/// Matches "By Jane Doe"-style byline prefixes.
pub static BYLINE_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:by|von|par|written by|posted by)[:\s]+").expect("BYLINE_PREFIX regex")
});

/// Splits multi-author byline strings on common delimiters.
pub static AUTHOR_SPLIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s*(?:,|;|\band\b|&)\s*").expect("AUTHOR_SPLIT regex"));

/// Recognizes sources from known video hosts.
pub static VIDEO_HOST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(youtube\.com|youtube-nocookie\.com|youtu\.be|vimeo\.com|dailymotion\.com|player\.twitch\.tv)")
        .expect("VIDEO_HOST regex")
});

/// Checks whether a class/id attribute value contains a boilerplate token.
///
/// Splitting plus exact/substring comparison avoids the classic false
/// positives of one big alternation regex ("ad" in "header", "nav" in
/// "in-page-nav-container" is still matched, "read" is not).
#[must_use]
pub fn matches_boilerplate(attr_value: &str, tokens: &[String]) -> bool {
    attr_value
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .any(|raw| {
            let token = raw.to_ascii_lowercase();
            tokens.iter().any(|pat| {
                token == *pat || (pat.len() >= 4 && token.contains(pat.as_str()))
            })
        })
}
