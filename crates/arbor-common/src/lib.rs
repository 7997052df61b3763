//! Common leaf types shared by the Arbor crates: source ranges, the
//! comment/position table produced from raw source text, and the cooperative
//! cancellation token polled by the converter.

pub mod cancel;
pub mod comments;
pub mod ranges;

pub use cancel::CancelToken;
pub use comments::{CommentRange, doc_content, scan_comment_ranges};
pub use ranges::SourceRange;
