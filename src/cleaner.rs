//! Document cleaning: strip structurally-irrelevant nodes before scoring.
//!
//! The cleaner mutates the working tree in place and never touches the
//! pre-cleaning snapshot. It removes whole tag families that are never
//! article content, elements whose class/id matches the boilerplate
//! blocklist, whitespace-only text nodes and empty leaves, and collapses
//! redundant wrapper elements. All passes run to a fixpoint, so applying
//! the cleaner twice yields no further change.
//!
//! Cleaning never fails: malformed or unexpected nodes are skipped, not
//! reported.

use crate::config::Configuration;
use crate::patterns::{matches_boilerplate, LANDMARK_TAGS, MEDIA_TAGS, NON_CONTENT_TAGS};
use crate::tree::{DocumentTree, NodeId, NodeKind};

/// Tags the cleaner never removes, whatever their attributes say.
const PROTECTED_TAGS: &[&str] = &["html", "body", "article"];

/// Wrapper tags eligible for unwrapping when they carry no attributes and a
/// single element child.
const WRAPPER_TAGS: &[&str] = &["div", "span", "section", "main", "center", "font"];

/// Removes boilerplate-likely nodes from a working tree.
pub struct DocumentCleaner<'a> {
    config: &'a Configuration,
}

impl<'a> DocumentCleaner<'a> {
    /// Create a cleaner bound to a configuration (for the blocklist).
    #[must_use]
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Clean the tree in place.
    ///
    /// The passes run together to a joint fixpoint: unwrapping a wrapper can
    /// move a landmark element up to section level, and emptying a container
    /// can create a new empty leaf, so each pass may expose work for another.
    pub fn clean(&self, tree: &mut DocumentTree) {
        remove_head(tree);
        loop {
            let mut changed = self.remove_non_content(tree);
            changed |= drop_whitespace_text(tree);
            changed |= drop_empty_leaves(tree);
            changed |= unwrap_wrappers(tree);
            if !changed {
                break;
            }
        }
    }

    fn remove_non_content(&self, tree: &mut DocumentTree) -> bool {
        let mut changed = false;
        for node in tree.subtree(tree.root()) {
            let Some(tag) = tree.tag(node) else { continue };
            if PROTECTED_TAGS.contains(&tag) {
                continue;
            }

            if NON_CONTENT_TAGS.contains(&tag) {
                tree.detach(node);
                changed = true;
                continue;
            }

            if LANDMARK_TAGS.contains(&tag) && is_section_level(tree, node) {
                tree.detach(node);
                changed = true;
                continue;
            }

            let class_hit = tree
                .attr(node, "class")
                .is_some_and(|v| matches_boilerplate(v, &self.config.boilerplate_tokens));
            let id_hit = tree
                .attr(node, "id")
                .is_some_and(|v| matches_boilerplate(v, &self.config.boilerplate_tokens));
            if class_hit || id_hit {
                tree.detach(node);
                changed = true;
            }
        }
        changed
    }
}

/// The head never holds body content, and its title/style text would only
/// add noise to tree-level text queries.
fn remove_head(tree: &mut DocumentTree) {
    for node in tree.find_all(tree.root(), "head") {
        tree.detach(node);
    }
}

/// Landmark header/footer elements are removed only at section level;
/// `article > header` is content furniture we keep for scoring to judge.
/// Nav and aside are removed wherever they appear.
fn is_section_level(tree: &DocumentTree, node: NodeId) -> bool {
    let tag = tree.tag(node);
    if tag == Some("nav") || tag == Some("aside") {
        return true;
    }
    match tree.parent(node).and_then(|p| tree.tag(p)) {
        Some("body" | "html" | "main") | None => true,
        Some(_) => false,
    }
}

fn drop_whitespace_text(tree: &mut DocumentTree) -> bool {
    let mut changed = false;
    for node in tree.subtree(tree.root()) {
        if let NodeKind::Text(text) = tree.kind(node) {
            if text.trim().is_empty() {
                tree.detach(node);
                changed = true;
            }
        }
    }
    changed
}

/// Remove childless elements with no text; containers emptied by this pass
/// are caught when the outer loop comes back around.
fn drop_empty_leaves(tree: &mut DocumentTree) -> bool {
    let mut changed = false;
    for node in tree.subtree(tree.root()) {
        let Some(tag) = tree.tag(node) else { continue };
        if PROTECTED_TAGS.contains(&tag) || MEDIA_TAGS.contains(&tag) {
            continue;
        }
        if tree.children(node).is_empty() {
            tree.detach(node);
            changed = true;
        }
    }
    changed
}

/// Collapse attribute-less wrappers with a single element child.
fn unwrap_wrappers(tree: &mut DocumentTree) -> bool {
    let mut changed = false;
    for node in tree.subtree(tree.root()) {
        let Some(tag) = tree.tag(node) else { continue };
        if !WRAPPER_TAGS.contains(&tag) {
            continue;
        }
        let has_attrs = match tree.kind(node) {
            NodeKind::Element { attrs, .. } => !attrs.is_empty(),
            NodeKind::Text(_) => continue,
        };
        if has_attrs {
            continue;
        }
        let children = tree.children(node);
        if children.len() == 1 && tree.is_element(children[0]) {
            tree.unwrap_node(node);
            changed = true;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cleaned(html: &str) -> DocumentTree {
        let config = Configuration::default();
        let mut tree = DocumentTree::parse(html).unwrap();
        DocumentCleaner::new(&config).clean(&mut tree);
        tree
    }

    #[test]
    fn scripts_and_styles_are_removed() {
        let tree = cleaned(
            "<html><body><script>var x = 1;</script><style>p{}</style>\
             <p>Article text.</p></body></html>",
        );
        assert_eq!(tree.text(tree.root()), "Article text.");
        assert!(tree.find_all(tree.root(), "script").is_empty());
    }

    #[test]
    fn boilerplate_classes_are_removed() {
        let tree = cleaned(
            "<html><body>\
             <div class=\"social-share\"><a href=\"/t\">Tweet this</a></div>\
             <div id=\"comments\"><p>First!</p></div>\
             <p>Real content stays.</p>\
             </body></html>",
        );
        let text = tree.text(tree.root());
        assert_eq!(text, "Real content stays.");
    }

    #[test]
    fn nav_and_aside_are_removed_anywhere() {
        let tree = cleaned(
            "<html><body><div><nav><a href=\"/\">Home</a></nav>\
             <aside>Ads here</aside><p>Body.</p></div></body></html>",
        );
        assert_eq!(tree.text(tree.root()), "Body.");
    }

    #[test]
    fn article_header_survives_but_page_header_does_not() {
        let tree = cleaned(
            "<html><body>\
             <header><a href=\"/\">Site banner</a></header>\
             <article><header><h1>Headline</h1></header><p>Text.</p></article>\
             </body></html>",
        );
        let text = tree.text(tree.root());
        assert!(text.contains("Headline"));
        assert!(text.contains("Text."));
        assert!(!text.contains("Site banner"));
    }

    #[test]
    fn wrappers_are_unwrapped() {
        let tree = cleaned(
            "<html><body><div><div><div><p>Deep text here.</p></div></div></div></body></html>",
        );
        let p = tree.find_all(tree.root(), "p")[0];
        // Every attribute-less single-child div collapsed; p now hangs off body
        assert_eq!(tree.tag(tree.parent(p).unwrap()), Some("body"));
    }

    #[test]
    fn empty_leaves_are_dropped_but_media_kept() {
        let tree = cleaned(
            "<html><body><div><span></span><em>  </em></div>\
             <p>Text<br><img src=\"x.png\"></p></body></html>",
        );
        assert!(tree.find_all(tree.root(), "span").is_empty());
        assert!(tree.find_all(tree.root(), "em").is_empty());
        assert!(tree.find_all(tree.root(), "div").is_empty());
        assert_eq!(tree.find_all(tree.root(), "br").len(), 1);
        assert_eq!(tree.find_all(tree.root(), "img").len(), 1);
    }

    #[test]
    fn iframes_survive_cleaning_for_video_discovery() {
        let tree = cleaned(
            "<html><body><p>Watch:</p>\
             <iframe src=\"https://www.youtube.com/embed/abc\"></iframe></body></html>",
        );
        assert_eq!(tree.find_all(tree.root(), "iframe").len(), 1);
    }

    #[test]
    fn cleaning_is_idempotent() {
        let html = "<html><body>\
             <nav><a href=\"/\">Home</a></nav>\
             <div><div><p>One paragraph of text.</p></div></div>\
             <div class=\"ad-banner\">Buy now</div>\
             <p></p><span>   </span>\
             </body></html>";
        let config = Configuration::default();
        let cleaner = DocumentCleaner::new(&config);

        let mut tree = DocumentTree::parse(html).unwrap();
        cleaner.clean(&mut tree);
        let once = tree.to_html(tree.root());
        cleaner.clean(&mut tree);
        let twice = tree.to_html(tree.root());
        assert_eq!(once, twice);
    }

    #[test]
    fn wrapped_page_header_is_removed_in_one_clean() {
        // Unwrapping the div promotes the header to body level; the joint
        // fixpoint must then remove it within the same clean() call.
        let html = "<html><body>\
             <div><header><h1>Site banner here</h1></header></div>\
             <p>Article text body.</p>\
             </body></html>";
        let config = Configuration::default();
        let cleaner = DocumentCleaner::new(&config);

        let mut tree = DocumentTree::parse(html).unwrap();
        cleaner.clean(&mut tree);
        let once = tree.to_html(tree.root());
        assert!(!once.contains("Site banner"));

        cleaner.clean(&mut tree);
        assert_eq!(tree.to_html(tree.root()), once);
    }

    #[test]
    fn malformed_markup_never_panics() {
        let config = Configuration::default();
        let mut tree =
            DocumentTree::parse("<html><body><p><div></p></div><b><i>x</b></i></body></html>")
                .unwrap();
        DocumentCleaner::new(&config).clean(&mut tree);
    }
}
