//! Source-range byte scans.
//!
//! The front end reports ranges that sometimes include delimiters or
//! trailing trivia the public tree must exclude: the parentheses around a
//! parenthesized expression, a comment between a call's final `)` and the
//! reported end, the individual tokens of a dotted name. These helpers
//! re-derive the tight ranges from the raw bytes. All offsets are inclusive
//! on both ends, as the front end reports them.

/// Inclusive range one paren-level inside `[start, end]`: after the first
/// `(` and before the last `)`, whitespace trimmed. Returns the input range
/// unchanged when no paren pair is found.
pub(crate) fn trim_one_paren(source: &str, start: u32, end: u32) -> (u32, u32) {
    let bytes = source.as_bytes();
    let (start, end) = (start as usize, end as usize);
    if end >= bytes.len() || start > end {
        return (start as u32, end as u32);
    }
    let open = (start..=end).find(|&i| bytes[i] == b'(');
    let close = (start..=end).rev().find(|&i| bytes[i] == b')');
    match (open, close) {
        (Some(open), Some(close)) if open < close => {
            let mut inner_start = open + 1;
            while inner_start < close && bytes[inner_start].is_ascii_whitespace() {
                inner_start += 1;
            }
            let mut inner_end = close - 1;
            while inner_end > inner_start && bytes[inner_end].is_ascii_whitespace() {
                inner_end -= 1;
            }
            (inner_start as u32, inner_end as u32)
        }
        _ => (start as u32, end as u32),
    }
}

/// End offset of the last `)` in `[start, end]`, for call-like expressions
/// whose reported range swallowed a trailing comment. Returns `end` when no
/// `)` is found.
pub(crate) fn trim_call_end(source: &str, start: u32, end: u32) -> u32 {
    let bytes = source.as_bytes();
    let (start, end) = (start as usize, (end as usize).min(bytes.len().saturating_sub(1)));
    if start > end {
        return end as u32;
    }
    if bytes[end] == b')' {
        return end as u32;
    }
    (start..=end)
        .rev()
        .find(|&i| bytes[i] == b')')
        .map(|i| i as u32)
        .unwrap_or(end as u32)
}

/// Inclusive spans of `tokens` as they occur left to right in
/// `[start, end]`. Tokens that cannot be found get the enclosing range, so a
/// degenerate input still yields one span per token.
pub(crate) fn token_spans(
    source: &str,
    start: u32,
    end: u32,
    tokens: &[String],
) -> Vec<(u32, u32)> {
    let hay = source
        .get(start as usize..(end as usize + 1).min(source.len()))
        .unwrap_or("");
    let mut spans = Vec::with_capacity(tokens.len());
    let mut cursor = 0usize;
    for token in tokens {
        match hay[cursor.min(hay.len())..].find(token.as_str()) {
            Some(found) => {
                let s = start as usize + cursor + found;
                let e = s + token.len() - 1;
                spans.push((s as u32, e as u32));
                cursor = cursor + found + token.len();
            }
            None => spans.push((start, end)),
        }
    }
    spans
}
