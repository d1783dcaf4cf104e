//! Post-selection pruning of the winning node.
//!
//! Scoring judges subtrees in aggregate, so a strong winner can still carry
//! low-value children that slipped past the document cleaner: a dense link
//! list inside otherwise prose-heavy content, an embedded share widget, or
//! a trailing "related articles" block. With the winner known, local
//! context is enough to cut these. The pipeline takes the `clean_top_node`
//! snapshot immediately after this step, before formatting.

use crate::config::Configuration;
use crate::scorer::link_density;
use crate::tree::{DocumentTree, NodeId};

/// Tags kept regardless of word count (pruned only for link density).
const KEEP_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "pre", "blockquote", "br", "img",
    "iframe", "embed", "object", "video",
];

/// Prunes disqualified descendants from the winning node.
pub struct PostCleanup<'a> {
    config: &'a Configuration,
}

impl<'a> PostCleanup<'a> {
    /// Create a post-cleanup pass bound to a configuration.
    #[must_use]
    pub fn new(config: &'a Configuration) -> Self {
        Self { config }
    }

    /// Prune the winner's direct children in place.
    pub fn prune(&self, tree: &mut DocumentTree, top: NodeId) {
        self.prune_children(tree, top);
        self.prune_trailing(tree, top);
    }

    fn prune_children(&self, tree: &mut DocumentTree, top: NodeId) {
        for child in tree.children(top).to_vec() {
            let Some(tag) = tree.tag(child) else { continue };

            if link_density(tree, child) > self.config.max_link_density {
                tree.detach(child);
                continue;
            }

            if KEEP_TAGS.contains(&tag) {
                continue;
            }

            // Thin containers with no paragraph inside are page furniture,
            // not prose.
            let words = tree.text(child).split_whitespace().count();
            if words < self.config.min_subtree_words && tree.find_all(child, "p").is_empty() {
                tree.detach(child);
            }
        }
    }

    /// Trailing siblings with a sharp link-density jump are almost always a
    /// "read next" block; strip from the end until prose is reached.
    fn prune_trailing(&self, tree: &mut DocumentTree, top: NodeId) {
        while let Some(last) = tree.children(top).last().copied() {
            if tree.tag(last) == Some("p") {
                break;
            }
            let has_links = !tree.find_all(last, "a").is_empty();
            if has_links && link_density(tree, last) > self.config.max_link_density / 2.0 {
                tree.detach(last);
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROSE: &str = "The committee published its findings on Tuesday after a \
        lengthy review. Observers called the report unusually detailed. Further \
        hearings are expected before the end of the year.";

    fn pruned(html: &str) -> (DocumentTree, NodeId) {
        let config = Configuration::default();
        let mut tree = DocumentTree::parse(html).unwrap();
        let top = tree.find_all(tree.root(), "div")[0];
        PostCleanup::new(&config).prune(&mut tree, top);
        (tree, top)
    }

    #[test]
    fn dense_link_list_inside_winner_is_removed() {
        let html = format!(
            "<html><body><div>\
             <p>{PROSE}</p>\
             <ul><li><a href=\"/1\">One</a></li><li><a href=\"/2\">Two</a></li></ul>\
             <p>{PROSE}</p>\
             </div></body></html>"
        );
        let (tree, top) = pruned(&html);
        assert!(tree.find_all(top, "ul").is_empty());
        assert_eq!(tree.find_all(top, "p").len(), 2);
    }

    #[test]
    fn thin_widget_container_is_removed() {
        let html = format!(
            "<html><body><div>\
             <p>{PROSE}</p>\
             <div>Follow us everywhere</div>\
             </div></body></html>"
        );
        let (tree, top) = pruned(&html);
        let children: Vec<_> = tree
            .children(top)
            .iter()
            .filter_map(|c| tree.tag(*c))
            .collect();
        assert_eq!(children, vec!["p"]);
    }

    #[test]
    fn content_rich_child_container_survives() {
        let html = format!(
            "<html><body><div>\
             <p>{PROSE}</p>\
             <div><p>{PROSE}</p></div>\
             </div></body></html>"
        );
        let (tree, top) = pruned(&html);
        assert_eq!(tree.find_all(top, "p").len(), 2);
    }

    #[test]
    fn headings_and_quotes_survive_word_count_pruning() {
        let html = format!(
            "<html><body><div>\
             <h2>Short subhead</h2>\
             <p>{PROSE}</p>\
             <blockquote>Brief quote.</blockquote>\
             </div></body></html>"
        );
        let (tree, top) = pruned(&html);
        assert_eq!(tree.find_all(top, "h2").len(), 1);
        assert_eq!(tree.find_all(top, "blockquote").len(), 1);
    }

    #[test]
    fn trailing_related_links_are_stripped() {
        let html = format!(
            "<html><body><div>\
             <p>{PROSE}</p>\
             <h4>Read next: <a href=\"/next\">our best stories of the week</a></h4>\
             </div></body></html>"
        );
        let (tree, top) = pruned(&html);
        assert!(tree.find_all(top, "h4").is_empty());
        assert_eq!(tree.find_all(top, "p").len(), 1);
    }

    #[test]
    fn pruning_never_touches_the_snapshot() {
        let config = Configuration::default();
        let html = format!(
            "<html><body><div><p>{PROSE}</p>\
             <ul><li><a href=\"/1\">One</a></li></ul></div></body></html>"
        );
        let mut tree = DocumentTree::parse(&html).unwrap();
        let top = tree.find_all(tree.root(), "div")[0];
        let snapshot = tree.clone_subtree(top);

        PostCleanup::new(&config).prune(&mut tree, top);
        assert!(tree.find_all(top, "ul").is_empty());
        assert_eq!(snapshot.find_all(snapshot.root(), "ul").len(), 1);
    }
}
