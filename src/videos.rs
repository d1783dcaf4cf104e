//! Embedded video discovery inside the winning node.
//!
//! Runs between selection and post-cleanup pruning, because the pruning
//! passes are allowed to drop embed containers the reader still wants
//! reported. Output is a deduplicated list of source URLs in document
//! order; relative sources are resolved against the canonical link when
//! one exists.

use url::Url;

use crate::patterns::VIDEO_HOST;
use crate::tree::{DocumentTree, NodeId};

/// Tags whose `src` can carry an embedded player or video file.
const EMBED_TAGS: &[&str] = &["iframe", "embed", "video", "object", "source"];

/// Collect video source URLs from the subtree rooted at `top`.
#[must_use]
pub fn discover_videos(tree: &DocumentTree, top: NodeId, base: Option<&str>) -> Vec<String> {
    let base = base.and_then(|raw| Url::parse(raw).ok());
    let mut found: Vec<String> = Vec::new();

    for node in tree.subtree(top) {
        let Some(tag) = tree.tag(node) else { continue };
        if !EMBED_TAGS.contains(&tag) {
            continue;
        }
        let Some(src) = tree.attr(node, "src").or_else(|| tree.attr(node, "data")) else {
            continue;
        };
        if src.is_empty() {
            continue;
        }

        // iframes and objects embed all sorts of widgets; keep only known
        // player hosts. A <video>/<source> src is a media file by contract.
        let direct_media = tag == "video" || tag == "source";
        if !direct_media && !VIDEO_HOST.is_match(src) {
            continue;
        }

        if let Some(resolved) = resolve(src, base.as_ref()) {
            if !found.contains(&resolved) {
                found.push(resolved);
            }
        }
    }

    found
}

/// Absolute URLs pass through; relative ones need a base to resolve
/// against, otherwise they are dropped.
fn resolve(src: &str, base: Option<&Url>) -> Option<String> {
    if let Ok(absolute) = Url::parse(src) {
        return Some(absolute.to_string());
    }
    base.and_then(|b| b.join(src).ok()).map(|u| u.to_string())
}
