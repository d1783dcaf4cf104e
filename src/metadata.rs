//! Metadata extraction: direct attribute pulls, no heuristics.
//!
//! All functions read the pre-cleaning snapshot tree, since the cleaner
//! strips `<head>` from the working tree. Sources, in rough priority:
//! Open Graph meta tags, plain meta tags, JSON-LD blocks, then visible
//! markup (`<h1>`, byline elements).

use std::collections::BTreeMap;

use serde_json::Value;

use crate::patterns::{AUTHOR_SPLIT, BYLINE_PREFIX, TITLE_SEPARATOR};
use crate::tree::{DocumentTree, NodeId};

/// Content of a `<meta>` tag matched by `name` or `property`.
#[must_use]
pub fn meta_content(tree: &DocumentTree, key: &str) -> Option<String> {
    for meta in tree.find_all(tree.root(), "meta") {
        let named = tree.attr(meta, "name") == Some(key)
            || tree.attr(meta, "property") == Some(key)
            || tree.attr(meta, "itemprop") == Some(key);
        if named {
            if let Some(content) = tree.attr(meta, "content") {
                let content = content.trim();
                if !content.is_empty() {
                    return Some(content.to_string());
                }
            }
        }
    }
    None
}

/// Map of every `<meta>` name/property to its content.
#[must_use]
pub fn meta_data(tree: &DocumentTree) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for meta in tree.find_all(tree.root(), "meta") {
        let key = tree
            .attr(meta, "property")
            .or_else(|| tree.attr(meta, "name"));
        let (Some(key), Some(content)) = (key, tree.attr(meta, "content")) else {
            continue;
        };
        if !key.is_empty() && !content.is_empty() {
            map.entry(key.to_string())
                .or_insert_with(|| content.to_string());
        }
    }
    map
}

/// Article title: og:title, then `<title>` with the site-name suffix
/// stripped, then the first `<h1>`, then the JSON-LD headline.
#[must_use]
pub fn title(tree: &DocumentTree) -> Option<String> {
    if let Some(og) = meta_content(tree, "og:title") {
        return Some(og);
    }

    if let Some(node) = tree.find_all(tree.root(), "title").first() {
        let raw = tree.text(*node);
        if !raw.is_empty() {
            return Some(strip_site_name(&raw));
        }
    }

    if let Some(h1) = tree.find_all(tree.root(), "h1").first() {
        let text = tree.text(*h1);
        if !text.is_empty() {
            return Some(text);
        }
    }

    json_ld_string(tree, "headline")
}

/// Titles like "Big Story | Example News" carry the site name after a
/// separator; keep the longest segment.
fn strip_site_name(raw: &str) -> String {
    TITLE_SEPARATOR
        .split(raw)
        .max_by_key(|part| part.chars().count())
        .unwrap_or(raw)
        .trim()
        .to_string()
}

/// Author names from meta tags, JSON-LD and byline markup, deduplicated
/// in discovery order.
#[must_use]
pub fn authors(tree: &DocumentTree) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();

    let mut push = |raw: &str| {
        let stripped = BYLINE_PREFIX.replace(raw, "");
        for part in AUTHOR_SPLIT.split(&stripped) {
            let name = part.trim();
            if name.is_empty() || name.chars().count() > 100 {
                continue;
            }
            if !found.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
                found.push(name.to_string());
            }
        }
    };

    for key in ["author", "article:author", "parsely-author", "sailthru.author"] {
        if let Some(value) = meta_content(tree, key) {
            push(&value);
        }
    }

    for name in json_ld_authors(tree) {
        push(&name);
    }

    for node in tree.subtree(tree.root()) {
        if tree.attr(node, "rel") == Some("author") {
            push(&tree.text(node));
            continue;
        }
        let marked = tree
            .attr(node, "class")
            .or_else(|| tree.attr(node, "id"))
            .is_some_and(|v| {
                let v = v.to_ascii_lowercase();
                v.contains("byline") || v.contains("author")
            });
        if marked && tree.tag(node).is_some() {
            let text = tree.text(node);
            // Byline containers hold a name, not a paragraph
            if !text.is_empty() && text.split_whitespace().count() <= 8 {
                push(&text);
            }
        }
    }

    found
}

/// Declared document language as a two-letter lowercase code.
#[must_use]
pub fn meta_lang(tree: &DocumentTree) -> Option<String> {
    let raw = tree
        .attr(tree.root(), "lang")
        .map(ToString::to_string)
        .or_else(|| meta_content(tree, "content-language"))
        .or_else(|| meta_content(tree, "og:locale"))?;
    let code: String = raw.chars().take(2).collect::<String>().to_ascii_lowercase();
    (code.len() == 2 && code.chars().all(|c| c.is_ascii_lowercase())).then_some(code)
}

/// Meta description (og:description preferred).
#[must_use]
pub fn meta_description(tree: &DocumentTree) -> Option<String> {
    meta_content(tree, "og:description").or_else(|| meta_content(tree, "description"))
}

/// Meta keywords, comma-split and trimmed.
#[must_use]
pub fn meta_keywords(tree: &DocumentTree) -> Vec<String> {
    meta_content(tree, "keywords")
        .or_else(|| meta_content(tree, "news_keywords"))
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|k| !k.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Site name from og:site_name.
#[must_use]
pub fn meta_site_name(tree: &DocumentTree) -> Option<String> {
    meta_content(tree, "og:site_name")
}

/// Declared page type: og:type, falling back to the JSON-LD `@type`
/// (lowercased, so "Article"/"NewsArticle" compare cleanly).
#[must_use]
pub fn meta_type(tree: &DocumentTree) -> Option<String> {
    if let Some(og) = meta_content(tree, "og:type") {
        return Some(og.to_ascii_lowercase());
    }
    json_ld_string(tree, "@type").map(|t| t.to_ascii_lowercase())
}

/// Canonical link: `<link rel="canonical">` first, og:url second.
#[must_use]
pub fn canonical_link(tree: &DocumentTree) -> Option<String> {
    for link in tree.find_all(tree.root(), "link") {
        if tree.attr(link, "rel") == Some("canonical") {
            if let Some(href) = tree.attr(link, "href") {
                if !href.is_empty() {
                    return Some(href.to_string());
                }
            }
        }
    }
    meta_content(tree, "og:url")
}

/// Favicon href from `<link rel>` values containing "icon".
#[must_use]
pub fn meta_favicon(tree: &DocumentTree) -> Option<String> {
    for link in tree.find_all(tree.root(), "link") {
        let is_icon = tree
            .attr(link, "rel")
            .is_some_and(|rel| rel.to_ascii_lowercase().contains("icon"));
        if is_icon {
            if let Some(href) = tree.attr(link, "href") {
                if !href.is_empty() {
                    return Some(href.to_string());
                }
            }
        }
    }
    None
}

/// Href fragments marking a link as a tag/topic link when no `rel="tag"`
/// markup exists.
const TAG_HREF_MARKERS: &[&str] = &["/tag/", "/tags/", "/topic/", "?keyword="];

/// Page tags from `<a rel="tag">` links, falling back to links whose href
/// points at a tag or topic listing. Deduplicated in document order.
#[must_use]
pub fn tags(tree: &DocumentTree) -> Vec<String> {
    let anchors = tree.find_all(tree.root(), "a");
    let mut found: Vec<String> = Vec::new();

    for anchor in &anchors {
        if tree.attr(*anchor, "rel") == Some("tag") {
            push_tag(&mut found, tree.text(*anchor));
        }
    }
    if found.is_empty() {
        for anchor in &anchors {
            let tagged = tree
                .attr(*anchor, "href")
                .is_some_and(|href| TAG_HREF_MARKERS.iter().any(|m| href.contains(m)));
            if tagged {
                push_tag(&mut found, tree.text(*anchor));
            }
        }
    }
    found
}

fn push_tag(found: &mut Vec<String>, text: String) {
    if !text.is_empty() && !found.iter().any(|seen| seen.eq_ignore_ascii_case(&text)) {
        found.push(text);
    }
}

/// Parsed JSON-LD blocks, malformed ones skipped.
fn json_ld_blocks(tree: &DocumentTree) -> Vec<Value> {
    let mut blocks = Vec::new();
    for script in tree.find_all(tree.root(), "script") {
        if tree.attr(script, "type") != Some("application/ld+json") {
            continue;
        }
        let raw = raw_text(tree, script);
        if let Ok(value) = serde_json::from_str::<Value>(&raw) {
            match value {
                Value::Array(items) => blocks.extend(items),
                other => blocks.push(other),
            }
        }
    }
    blocks
}

/// JSON text children must not be whitespace-normalized the way display
/// text is, so scripts get their own accessor.
fn raw_text(tree: &DocumentTree, node: NodeId) -> String {
    tree.children(node)
        .iter()
        .filter_map(|child| match tree.kind(*child) {
            crate::tree::NodeKind::Text(text) => Some(text.as_str()),
            crate::tree::NodeKind::Element { .. } => None,
        })
        .collect()
}

fn json_ld_string(tree: &DocumentTree, key: &str) -> Option<String> {
    for block in json_ld_blocks(tree) {
        if let Some(Value::String(s)) = block.get(key) {
            if !s.trim().is_empty() {
                return Some(s.trim().to_string());
            }
        }
    }
    None
}

fn json_ld_authors(tree: &DocumentTree) -> Vec<String> {
    let mut names = Vec::new();
    for block in json_ld_blocks(tree) {
        match block.get("author") {
            Some(Value::String(s)) => names.push(s.clone()),
            Some(Value::Object(map)) => {
                if let Some(Value::String(name)) = map.get("name") {
                    names.push(name.clone());
                }
            }
            Some(Value::Array(items)) => {
                for item in items {
                    match item {
                        Value::String(s) => names.push(s.clone()),
                        Value::Object(map) => {
                            if let Some(Value::String(name)) = map.get("name") {
                                names.push(name.clone());
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(html: &str) -> DocumentTree {
        DocumentTree::parse(html).unwrap()
    }

    #[test]
    fn og_title_wins_over_title_tag() {
        let tree = parse(
            "<html><head><meta property=\"og:title\" content=\"The Real Title\">\
             <title>Wrong | Site</title></head><body></body></html>",
        );
        assert_eq!(title(&tree), Some("The Real Title".to_string()));
    }

    #[test]
    fn title_tag_loses_site_name_suffix() {
        let tree = parse(
            "<html><head><title>A Long Informative Headline | Site</title></head>\
             <body></body></html>",
        );
        assert_eq!(title(&tree), Some("A Long Informative Headline".to_string()));
    }

    #[test]
    fn h1_is_the_title_fallback() {
        let tree = parse(
            "<html><head></head><body><h1>Visible Headline</h1></body></html>",
        );
        assert_eq!(title(&tree), Some("Visible Headline".to_string()));
    }

    #[test]
    fn authors_from_meta_are_split_and_cleaned() {
        let tree = parse(
            "<html><head><meta name=\"author\" content=\"By Jane Doe and John Smith\">\
             </head><body></body></html>",
        );
        assert_eq!(authors(&tree), vec!["Jane Doe", "John Smith"]);
    }

    #[test]
    fn authors_from_json_ld_object() {
        let tree = parse(
            "<html><head><script type=\"application/ld+json\">\
             {\"@type\": \"NewsArticle\", \"author\": {\"name\": \"Maria Garcia\"}}\
             </script></head><body></body></html>",
        );
        assert_eq!(authors(&tree), vec!["Maria Garcia"]);
        assert_eq!(meta_type(&tree), Some("newsarticle".to_string()));
    }

    #[test]
    fn byline_markup_is_a_last_resort_and_deduplicated() {
        let tree = parse(
            "<html><head><meta name=\"author\" content=\"Jane Doe\"></head>\
             <body><span class=\"byline\">By Jane Doe</span></body></html>",
        );
        assert_eq!(authors(&tree), vec!["Jane Doe"]);
    }

    #[test]
    fn meta_lang_comes_from_html_attribute() {
        let tree = parse("<html lang=\"de-AT\"><head></head><body></body></html>");
        assert_eq!(meta_lang(&tree), Some("de".to_string()));
    }

    #[test]
    fn missing_lang_is_none() {
        let tree = parse("<html><head></head><body></body></html>");
        assert_eq!(meta_lang(&tree), None);
    }

    #[test]
    fn keywords_are_comma_split() {
        let tree = parse(
            "<html><head><meta name=\"keywords\" content=\"rust, parsing ,extraction,\">\
             </head><body></body></html>",
        );
        assert_eq!(meta_keywords(&tree), vec!["rust", "parsing", "extraction"]);
    }

    #[test]
    fn canonical_prefers_link_over_og_url() {
        let tree = parse(
            "<html><head><link rel=\"canonical\" href=\"https://example.com/story\">\
             <meta property=\"og:url\" content=\"https://example.com/other\"></head>\
             <body></body></html>",
        );
        assert_eq!(
            canonical_link(&tree),
            Some("https://example.com/story".to_string())
        );
    }

    #[test]
    fn rel_tag_links_become_tags() {
        let tree = parse(
            "<html><body><div class=\"tags\">\
             <a rel=\"tag\" href=\"/tag/politics\">Politics</a>\
             <a rel=\"tag\" href=\"/tag/economy\">Economy</a>\
             <a rel=\"tag\" href=\"/tag/politics\">politics</a>\
             </div></body></html>",
        );
        assert_eq!(tags(&tree), vec!["Politics", "Economy"]);
    }

    #[test]
    fn tag_hrefs_are_the_fallback_when_rel_is_absent() {
        let tree = parse(
            "<html><body>\
             <a href=\"/tags/science\">Science</a>\
             <a href=\"/story/other\">Not a tag</a>\
             </body></html>",
        );
        assert_eq!(tags(&tree), vec!["Science"]);
    }

    #[test]
    fn rel_tags_suppress_the_href_fallback() {
        let tree = parse(
            "<html><body>\
             <a rel=\"tag\" href=\"/tag/health\">Health</a>\
             <a href=\"/topic/misc\">Misc</a>\
             </body></html>",
        );
        assert_eq!(tags(&tree), vec!["Health"]);
    }

    #[test]
    fn meta_data_collects_all_tags() {
        let tree = parse(
            "<html><head>\
             <meta property=\"og:type\" content=\"article\">\
             <meta name=\"description\" content=\"About things\">\
             </head><body></body></html>",
        );
        let map = meta_data(&tree);
        assert_eq!(map.get("og:type").map(String::as_str), Some("article"));
        assert_eq!(map.get("description").map(String::as_str), Some("About things"));
    }

    #[test]
    fn malformed_json_ld_is_skipped() {
        let tree = parse(
            "<html><head><script type=\"application/ld+json\">{not json</script>\
             </head><body></body></html>",
        );
        assert!(authors(&tree).is_empty());
        assert_eq!(meta_type(&tree), None);
    }
}
