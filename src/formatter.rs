//! Output formatting: plain text and a minimal article-HTML fragment.
//!
//! The formatter works on a private deep copy of the winning subtree, so
//! the caller-visible trees are never mutated by formatting. Anchors are
//! flattened to their text, paragraph-equivalent blocks become text
//! paragraphs joined by one blank line, and the HTML fragment keeps
//! structural tags only, with all attributes dropped.
//!
//! The language hint is the only state carried beyond (tree, config): it
//! selects the sentence-punctuation set used when an over-long paragraph
//! has to be segmented.

use std::sync::Arc;

use crate::config::Configuration;
use crate::language::Language;
use crate::patterns::STRUCTURAL_TAGS;
use crate::tree::{escape_text, DocumentTree, NodeId, NodeKind};

/// Blocks that become exactly one text paragraph.
const PARAGRAPH_BLOCKS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre", "td",
];

/// Container tags the text pass descends into.
const CONTAINER_BLOCKS: &[&str] = &[
    "div", "section", "article", "main", "figure", "table", "tbody", "thead",
    "tr", "ul", "ol", "header", "footer", "body", "html",
];

/// Serializes a post-cleaned winning node into text and article HTML.
pub struct OutputFormatter<'a> {
    config: &'a Configuration,
    language: Arc<Language>,
}

impl<'a> OutputFormatter<'a> {
    /// Create a formatter with a language hint for segmentation heuristics.
    #[must_use]
    pub fn new(config: &'a Configuration, language: Arc<Language>) -> Self {
        Self { config, language }
    }

    /// Switch the language hint, e.g. after the document declared its own.
    pub fn update_language(&mut self, language: Arc<Language>) {
        self.language = language;
    }

    /// Produce `(text, article_html)` from the winning node.
    ///
    /// Does not mutate the input tree; all destructive steps run on an
    /// internal clone.
    #[must_use]
    pub fn get_formatted(&self, tree: &DocumentTree, top: NodeId) -> (String, String) {
        let mut work = tree.clone_subtree(top);
        flatten_anchors(&mut work);

        let article_html = minimal_html(&work);
        let paragraphs = collect_paragraphs(&work);
        let text = self.join_capped(&paragraphs);
        (text, article_html)
    }

    /// Join paragraphs with blank lines, truncating at the paragraph
    /// boundary closest to but not exceeding `max_text`.
    fn join_capped(&self, paragraphs: &[String]) -> String {
        let cap = self.config.max_text;
        let mut out = String::new();
        for paragraph in paragraphs {
            let needed = if out.is_empty() {
                paragraph.chars().count()
            } else {
                paragraph.chars().count() + 2
            };
            if out.chars().count() + needed > cap {
                break;
            }
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(paragraph);
        }
        if out.is_empty() {
            if let Some(first) = paragraphs.first() {
                // A single over-long paragraph: segment it rather than
                // return nothing, still never mid-word
                out = self.truncate_segmented(first, cap);
            }
        }
        out
    }

    /// Cut an over-long paragraph at the last sentence or word boundary
    /// under the cap. Languages without whitespace word separation (CJK)
    /// fall back to sentence marks alone.
    fn truncate_segmented(&self, paragraph: &str, cap: usize) -> String {
        let head: String = paragraph.chars().take(cap).collect();
        let marks = self.language.sentence_marks();
        if let Some(pos) = head.rfind(|c| marks.contains(&c)) {
            let end = pos + head[pos..].chars().next().map_or(1, char::len_utf8);
            return head[..end].to_string();
        }
        match head.rfind(char::is_whitespace) {
            Some(pos) => head[..pos].trim_end().to_string(),
            None => String::new(),
        }
    }
}

/// Minimal HTML: structural tags kept without attributes, other elements
/// transparent, text escaped and whitespace-normalized.
fn minimal_html(tree: &DocumentTree) -> String {
    let mut out = String::new();
    render_node(tree, tree.root(), &mut out);
    out
}

fn render_node(tree: &DocumentTree, node: NodeId, out: &mut String) {
    match tree.kind(node) {
        NodeKind::Text(raw) => {
            let text = crate::patterns::WHITESPACE.replace_all(raw, " ");
            if !text.trim().is_empty() {
                out.push_str(&escape_text(&text));
            }
        }
        NodeKind::Element { tag, .. } => {
            let structural = STRUCTURAL_TAGS.contains(&tag.as_str());
            if structural {
                out.push('<');
                out.push_str(tag);
                out.push('>');
            }
            if tag != "br" {
                for child in tree.children(node) {
                    render_node(tree, *child, out);
                }
                if structural {
                    out.push_str("</");
                    out.push_str(tag);
                    out.push('>');
                }
            }
        }
    }
}

/// Walk the clone collecting one string per paragraph-equivalent block;
/// blocks with no extractable text are skipped, not emitted empty.
fn collect_paragraphs(tree: &DocumentTree) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let root = tree.root();
    if tree.tag(root).is_some_and(|t| PARAGRAPH_BLOCKS.contains(&t)) {
        // The winner itself is a single paragraph block
        let text = paragraph_text(tree, root);
        if !text.is_empty() {
            paragraphs.push(text);
        }
        return paragraphs;
    }
    let mut pending = String::new();
    collect_from(tree, root, &mut paragraphs, &mut pending);
    flush_pending(&mut paragraphs, &mut pending);
    paragraphs
}

fn collect_from(
    tree: &DocumentTree,
    node: NodeId,
    paragraphs: &mut Vec<String>,
    pending: &mut String,
) {
    for child in tree.children(node) {
        match tree.kind(*child) {
            NodeKind::Text(raw) => {
                pending.push_str(raw);
                pending.push(' ');
            }
            NodeKind::Element { tag, .. } => {
                if PARAGRAPH_BLOCKS.contains(&tag.as_str()) {
                    flush_pending(paragraphs, pending);
                    let text = paragraph_text(tree, *child);
                    if !text.is_empty() && text.chars().any(char::is_alphanumeric) {
                        paragraphs.push(text);
                    }
                } else if CONTAINER_BLOCKS.contains(&tag.as_str()) {
                    flush_pending(paragraphs, pending);
                    collect_from(tree, *child, paragraphs, pending);
                    flush_pending(paragraphs, pending);
                } else {
                    // Inline element: its text stays in the running paragraph
                    let text = tree.text(*child);
                    if !text.is_empty() {
                        pending.push_str(&text);
                        pending.push(' ');
                    }
                }
            }
        }
    }
}

/// Text of one paragraph block with `<br>` rendered as a line break;
/// each resulting line is whitespace-normalized, empty lines dropped.
fn paragraph_text(tree: &DocumentTree, node: NodeId) -> String {
    let mut raw = String::new();
    text_with_breaks(tree, node, &mut raw);
    let lines: Vec<String> = raw
        .split('\n')
        .map(|line| {
            crate::patterns::WHITESPACE
                .replace_all(line.trim(), " ")
                .into_owned()
        })
        .filter(|line| !line.is_empty())
        .collect();
    lines.join("\n")
}

fn text_with_breaks(tree: &DocumentTree, node: NodeId, out: &mut String) {
    for child in tree.children(node) {
        match tree.kind(*child) {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Element { tag, .. } => {
                if tag == "br" {
                    out.push('\n');
                } else {
                    text_with_breaks(tree, *child, out);
                    out.push(' ');
                }
            }
        }
    }
}

fn flatten_anchors(tree: &mut DocumentTree) {
    for anchor in tree.find_all(tree.root(), "a") {
        let text = tree.text(anchor);
        tree.replace_with_text(anchor, text);
    }
}

fn flush_pending(paragraphs: &mut Vec<String>, pending: &mut String) {
    let text = crate::patterns::WHITESPACE
        .replace_all(pending.trim(), " ")
        .into_owned();
    pending.clear();
    if !text.is_empty() && text.chars().any(char::is_alphanumeric) {
        paragraphs.push(text);
    }
}
