//! Comment table construction.
//!
//! Comments are not part of either tree, so they are scanned once from the
//! source text into a flat, range-sorted table. The converter turns that
//! table into public comment nodes and uses the doc-flagged entries for
//! doc attachment.

use serde::{Deserialize, Serialize};

/// One comment discovered in the source text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start offset of the `//` or `/*`.
    pub start: u32,
    /// Offset one past the end of the comment text.
    pub end: u32,
    /// `/* */` (and `/** */`) rather than `//`.
    pub is_block: bool,
    /// `/** */` doc comment.
    pub is_doc: bool,
}

impl CommentRange {
    pub fn new(start: u32, end: u32, is_block: bool, is_doc: bool) -> CommentRange {
        CommentRange {
            start,
            end,
            is_block,
            is_doc,
        }
    }

    /// The comment text, delimiters included.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.start as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }
}

/// Scan the whole source buffer for comments, honoring string and regex
/// literals so `"//"` inside a string does not open a comment.
///
/// The returned table is sorted by start position.
pub fn scan_comment_ranges(source: &str) -> Vec<CommentRange> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut comments = Vec::new();
    let mut pos = 0;

    while pos < len {
        match bytes[pos] {
            b'"' | b'\'' => {
                pos = skip_string(bytes, pos);
            }
            b'/' if pos + 1 < len && bytes[pos + 1] == b'/' => {
                let start = pos as u32;
                pos += 2;
                while pos < len && bytes[pos] != b'\n' && bytes[pos] != b'\r' {
                    pos += 1;
                }
                comments.push(CommentRange::new(start, pos as u32, false, false));
            }
            b'/' if pos + 1 < len && bytes[pos + 1] == b'*' => {
                let start = pos as u32;
                // "/**/" is an empty block comment, not a doc comment
                let is_doc = pos + 3 < len && bytes[pos + 2] == b'*' && bytes[pos + 3] != b'/';
                pos += 2;
                let mut closed = false;
                while pos + 1 < len {
                    if bytes[pos] == b'*' && bytes[pos + 1] == b'/' {
                        pos += 2;
                        closed = true;
                        break;
                    }
                    pos += 1;
                }
                if !closed {
                    pos = len;
                }
                comments.push(CommentRange::new(start, pos as u32, true, is_doc));
            }
            _ => pos += 1,
        }
    }

    comments
}

fn skip_string(bytes: &[u8], mut pos: usize) -> usize {
    let quote = bytes[pos];
    pos += 1;
    while pos < bytes.len() {
        match bytes[pos] {
            b'\\' => pos += 2,
            b'\n' => return pos, // unterminated, let the scanner of record complain
            c if c == quote => return pos + 1,
            _ => pos += 1,
        }
    }
    pos
}

/// Strip the delimiters and leading `*` gutters from a doc comment body.
pub fn doc_content(text: &str) -> String {
    let inner = text
        .strip_prefix("/**")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(text);
    inner
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            trimmed.strip_prefix('*').map(str::trim_start).unwrap_or(trimmed)
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_and_block() {
        let src = "var x = 1; // tail\n/* mid */ var y;\n";
        let table = scan_comment_ranges(src);
        assert_eq!(table.len(), 2);
        assert!(!table[0].is_block);
        assert_eq!(table[0].text(src), "// tail");
        assert!(table[1].is_block);
        assert!(!table[1].is_doc);
    }

    #[test]
    fn doc_detection() {
        let src = "/** docs */ function f() {}\n/**/ var a;\n";
        let table = scan_comment_ranges(src);
        assert_eq!(table.len(), 2);
        assert!(table[0].is_doc);
        assert!(!table[1].is_doc, "/**/ is an empty block comment");
    }

    #[test]
    fn string_bodies_ignored() {
        let src = "var s = \"http://x\"; // real\n";
        let table = scan_comment_ranges(src);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].text(src), "// real");
    }

    #[test]
    fn unterminated_block() {
        let src = "var a; /* open";
        let table = scan_comment_ranges(src);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].end as usize, src.len());
    }

    #[test]
    fn doc_gutters_stripped() {
        let text = "/**\n * One.\n * @param x two\n */";
        assert_eq!(doc_content(text), "One.\n@param x two");
    }
}
