//! Heuristic node scoring and best-node selection.
//!
//! Candidates are block-level text containers. Each one earns a base score
//! from its prose density (character count plus bonuses per sentence-ending
//! mark and per stopword, since running prose is full of function words
//! that keyword lists and navigation labels lack), discounted by its link
//! density; a fraction of the score is then
//! propagated to the parent and grandparent, so a container whose children
//! are several strong paragraphs accumulates the aggregate signal. This is
//! what makes selection robust to templates where the real article
//! container sits one level above the text-bearing leaves.
//!
//! Absence of a winner is a normal, representable outcome, not an error.
//! The weights below are a tuned starting point, not derived constants.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::Configuration;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::tree::{DocumentTree, NodeId};

/// Score bonus per sentence-ending punctuation mark.
pub const SENTENCE_BONUS: f64 = 20.0;

/// Score bonus per stopword of the active language.
pub const STOPWORD_BONUS: f64 = 4.0;

/// Fraction of a candidate's score credited to its parent.
pub const PARENT_SHARE: f64 = 0.5;

/// Fraction of a candidate's score credited to its grandparent.
pub const GRANDPARENT_SHARE: f64 = 0.25;

/// Block-level text containers eligible for scoring.
const CANDIDATE_TAGS: &[&str] = &["p", "pre", "td", "blockquote"];

/// Ephemeral mapping from node identity to score, live only during the
/// scoring pass.
pub type ScoreTable = HashMap<NodeId, f64>;

/// Fraction of a node's text that falls inside anchor elements.
///
/// Whitespace is excluded on both sides of the ratio, so separators
/// between adjacent links do not dilute the density. Always within
/// `[0, 1]`; a node with no text has density zero.
#[must_use]
pub fn link_density(tree: &DocumentTree, node: NodeId) -> f64 {
    let total = visible_chars(&tree.text(node));
    if total == 0 {
        return 0.0;
    }
    let link_chars: usize = tree
        .find_all(node, "a")
        .iter()
        .map(|a| visible_chars(&tree.text(*a)))
        .sum();
    ((link_chars as f64) / (total as f64)).min(1.0)
}

fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}

/// Assigns content-likelihood scores and selects the best node.
pub struct NodeScorer<'a> {
    config: &'a Configuration,
    language: Arc<Language>,
}

impl<'a> NodeScorer<'a> {
    /// Create a scorer for one pipeline run.
    #[must_use]
    pub fn new(config: &'a Configuration, language: Arc<Language>) -> Self {
        Self { config, language }
    }

    /// Select the node most likely to hold the article body.
    ///
    /// Returns `Ok(None)` when no candidate exists or the best score does
    /// not clear `min_node_score`. Returns [`Error::DocumentTooLarge`] when
    /// the candidate scan exceeds `max_candidates`.
    pub fn best_node(&self, tree: &DocumentTree) -> Result<Option<NodeId>> {
        let candidates = self.collect_candidates(tree)?;
        if candidates.is_empty() {
            return Ok(None);
        }

        let mut scores = ScoreTable::new();
        for node in &candidates {
            let text = tree.text(*node);
            let chars = text.chars().count() as f64;
            let sentences = self.language.sentence_count(&text) as f64;
            let stopwords = self.language.stopword_count(&text) as f64;
            let density = link_density(tree, *node);

            let base = (chars + SENTENCE_BONUS * sentences + STOPWORD_BONUS * stopwords)
                * (1.0 - density);
            if base <= 0.0 {
                continue;
            }

            *scores.entry(*node).or_insert(0.0) += base;
            if let Some(parent) = tree.parent(*node) {
                *scores.entry(parent).or_insert(0.0) += base * PARENT_SHARE;
                if let Some(grandparent) = tree.parent(parent) {
                    *scores.entry(grandparent).or_insert(0.0) += base * GRANDPARENT_SHARE;
                }
            }
        }

        // Walk in document order with a strictly-greater comparison so ties
        // resolve to the earliest node, deterministically.
        let mut best: Option<(NodeId, f64)> = None;
        for node in tree.subtree(tree.root()) {
            if let Some(score) = scores.get(&node) {
                if best.is_none_or(|(_, top)| *score > top) {
                    best = Some((node, *score));
                }
            }
        }

        Ok(best
            .filter(|(_, score)| *score > self.config.min_node_score)
            .map(|(node, _)| node))
    }

    /// One scan for block text containers, bounded by `max_candidates`.
    fn collect_candidates(&self, tree: &DocumentTree) -> Result<Vec<NodeId>> {
        let mut candidates = Vec::new();
        for node in tree.subtree(tree.root()) {
            let Some(tag) = tree.tag(node) else { continue };
            if !CANDIDATE_TAGS.contains(&tag) {
                continue;
            }
            if tree.text(node).is_empty() {
                continue;
            }
            candidates.push(node);
            if candidates.len() > self.config.max_candidates {
                return Err(Error::DocumentTooLarge(self.config.max_candidates));
            }
        }
        Ok(candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::LanguageRegistry;

    fn best(html: &str) -> (DocumentTree, Option<NodeId>) {
        let config = Configuration::default();
        let language = LanguageRegistry::builtin().get_or_default("en");
        let tree = DocumentTree::parse(html).unwrap();
        let winner = NodeScorer::new(&config, language).best_node(&tree).unwrap();
        (tree, winner)
    }

    const PROSE: &str = "The committee published its findings on Tuesday after a \
        lengthy review. Observers called the report unusually detailed. Further \
        hearings are expected before the end of the year.";

    #[test]
    fn link_density_is_zero_without_links() {
        let tree = DocumentTree::parse("<html><body><p>Plain text only.</p></body></html>")
            .unwrap();
        let p = tree.find_all(tree.root(), "p")[0];
        assert!((link_density(&tree, p) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn link_density_is_one_when_all_text_is_anchored() {
        // The whitespace between the two anchors must not dilute the ratio
        let tree = DocumentTree::parse(
            "<html><body><p><a href=\"/a\">first</a> <a href=\"/b\">second</a></p></body></html>",
        )
        .unwrap();
        let p = tree.find_all(tree.root(), "p")[0];
        assert!((link_density(&tree, p) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn link_density_stays_in_unit_interval() {
        let tree = DocumentTree::parse(
            "<html><body><p>text <a href=\"/x\">with <a href=\"/y\">nested</a></a> links</p>\
             </body></html>",
        )
        .unwrap();
        let p = tree.find_all(tree.root(), "p")[0];
        let density = link_density(&tree, p);
        assert!((0.0..=1.0).contains(&density));
    }

    #[test]
    fn container_of_many_paragraphs_beats_single_paragraph() {
        let html = format!(
            "<html><body>\
             <p>{PROSE}</p>\
             <div id=\"story\"><p>{PROSE}</p><p>{PROSE}</p><p>{PROSE}</p><p>{PROSE}</p></div>\
             </body></html>"
        );
        let (tree, winner) = best(&html);
        let winner = winner.unwrap();
        assert_eq!(tree.tag(winner), Some("div"));
        assert_eq!(tree.attr(winner, "id"), Some("story"));
    }

    #[test]
    fn all_anchor_candidate_never_beats_prose() {
        let html = format!(
            "<html><body>\
             <td><a href=\"/1\">one</a><a href=\"/2\">two</a><a href=\"/3\">three</a></td>\
             <p>{PROSE}</p>\
             </body></html>"
        );
        let (tree, winner) = best(&html);
        let winner = winner.unwrap();
        // Winner is the prose paragraph or its ancestor, never the link cell
        assert_ne!(tree.tag(winner), Some("td"));
    }

    #[test]
    fn stopword_rich_prose_outranks_keyword_spam() {
        // Comparable length and punctuation; only the function words differ.
        // The spam block comes first, so document-order tie-breaking cannot
        // produce this outcome on its own.
        let spam = "keyword widget gadget sprocket flange bracket grommet \
            spindle. keyword widget gadget sprocket flange bracket grommet spindle.";
        let prose = "The committee said that it would publish the report in \
            the autumn. The members of the panel agreed that the findings were clear.";
        let html = format!(
            "<html><body><div><p>{spam}</p></div><div><p>{prose}</p></div></body></html>"
        );
        let (tree, winner) = best(&html);
        let winner = winner.unwrap();
        assert!(tree.text(winner).contains("committee"));
    }

    #[test]
    fn no_text_means_no_winner() {
        let (_, winner) =
            best("<html><body><img src=\"a.png\"><script>x()</script></body></html>");
        assert!(winner.is_none());
    }

    #[test]
    fn short_text_below_threshold_means_no_winner() {
        let (_, winner) = best("<html><body><p>Hi</p></body></html>");
        assert!(winner.is_none());
    }

    #[test]
    fn ties_resolve_to_earliest_document_order() {
        let html = format!(
            "<html><body>\
             <div><p>{PROSE}</p></div>\
             <div><p>{PROSE}</p></div>\
             </body></html>"
        );
        let config = Configuration::default();
        let language = LanguageRegistry::builtin().get_or_default("en");
        let tree = DocumentTree::parse(&html).unwrap();
        let winner = NodeScorer::new(&config, language)
            .best_node(&tree)
            .unwrap()
            .unwrap();

        let first_p = tree.find_all(tree.root(), "p")[0];
        assert_eq!(winner, first_p);
    }

    #[test]
    fn determinism_across_repeated_runs() {
        let html = format!(
            "<html><body><div><p>{PROSE}</p><p>{PROSE}</p></div></body></html>"
        );
        let config = Configuration::default();
        let language = LanguageRegistry::builtin().get_or_default("en");
        let tree = DocumentTree::parse(&html).unwrap();
        let scorer = NodeScorer::new(&config, language);
        let first = scorer.best_node(&tree).unwrap();
        let second = scorer.best_node(&tree).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn candidate_limit_fails_fast() {
        let config = Configuration::builder().max_candidates(2).build().unwrap();
        let language = LanguageRegistry::builtin().get_or_default("en");
        let tree = DocumentTree::parse(
            "<html><body><p>one two three</p><p>four five six</p><p>seven eight nine</p>\
             </body></html>",
        )
        .unwrap();
        let result = NodeScorer::new(&config, language).best_node(&tree);
        assert!(matches!(result, Err(Error::DocumentTooLarge(2))));
    }
}
