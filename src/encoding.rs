//! Byte-to-UTF-8 transcoding for raw HTTP bodies.
//!
//! Charset resolution order: a BOM, then a declaration found in the first
//! kilobyte of markup (`<meta charset>` or a `Content-Type` meta), then
//! UTF-8 with lossy replacement. Decoding never fails; undecodable bytes
//! become replacement characters, which the cleaner treats as ordinary
//! text.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use encoding_rs::{Encoding, UTF_8};
use regex::bytes::Regex;

/// `<meta charset="...">`, quotes optional.
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?\s*([a-zA-Z0-9_\-]+)"#)
        .expect("META_CHARSET regex")
});

/// `charset=` inside an http-equiv Content-Type meta value.
static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)charset\s*=\s*([a-zA-Z0-9_\-]+)").expect("CONTENT_TYPE_CHARSET regex")
});

/// Number of leading bytes scanned for a charset declaration.
const DECLARATION_WINDOW: usize = 1024;

/// Encoding declared by the document itself, if any.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return Some(encoding);
    }

    let head = &bytes[..bytes.len().min(DECLARATION_WINDOW)];
    let label = META_CHARSET
        .captures(head)
        .or_else(|| CONTENT_TYPE_CHARSET.captures(head))
        .and_then(|caps| caps.get(1))?;
    Encoding::for_label(label.as_bytes())
}

/// Decode a raw body to a UTF-8 string, honoring any declared charset.
#[must_use]
pub fn transcode_to_utf8(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes).unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}
