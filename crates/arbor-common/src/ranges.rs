//! Character source ranges.
//!
//! Ranges are `[start, start + length)` over the original source buffer.
//! Synthesized nodes that have no source carry the `NO_SOURCE` sentinel.

use serde::{Deserialize, Serialize};

/// A half-open character range into the source buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    /// Start offset, or `-1` when the node was synthesized.
    pub start: i32,
    /// Length in characters; `0` when the node was synthesized.
    pub length: u32,
}

impl SourceRange {
    /// Sentinel for nodes with no underlying source.
    pub const NO_SOURCE: SourceRange = SourceRange {
        start: -1,
        length: 0,
    };

    pub fn new(start: i32, length: u32) -> SourceRange {
        SourceRange { start, length }
    }

    /// Build from inclusive `[start, end]` offsets as the internal compiler
    /// tree reports them.
    pub fn from_inclusive(start: u32, end: u32) -> SourceRange {
        SourceRange {
            start: start as i32,
            length: end.saturating_sub(start) + 1,
        }
    }

    /// Exclusive end offset, or `-1` for synthesized nodes.
    pub fn end(&self) -> i32 {
        if self.start < 0 {
            -1
        } else {
            self.start + self.length as i32
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.start < 0
    }

    /// True when `pos` falls inside this range.
    pub fn contains(&self, pos: u32) -> bool {
        !self.is_synthesized() && (pos as i32) >= self.start && (pos as i32) < self.end()
    }
}

impl Default for SourceRange {
    fn default() -> SourceRange {
        SourceRange::NO_SOURCE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inclusive_conversion() {
        let r = SourceRange::from_inclusive(4, 9);
        assert_eq!(r.start, 4);
        assert_eq!(r.length, 6);
        assert_eq!(r.end(), 10);
    }

    #[test]
    fn sentinel() {
        assert!(SourceRange::NO_SOURCE.is_synthesized());
        assert_eq!(SourceRange::NO_SOURCE.end(), -1);
        assert!(!SourceRange::NO_SOURCE.contains(0));
    }
}
