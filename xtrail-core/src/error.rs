//! Stream errors and contract violations.

use std::io;

use thiserror::Error;

/// Errors produced while navigating an event stream.
///
/// Stream errors mean the underlying document is malformed or truncated;
/// the cursor performs no retry and its further use is undefined. Contract
/// violations ([`Error::InvalidArgument`]) are independent of the input and
/// signal a programming error at the call site.
#[derive(Debug, Error)]
pub enum Error {
    /// The underlying parser rejected the document.
    #[error("malformed document: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Entity or character-reference expansion failed.
    #[error("unescape failed: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// The stream ended while elements were still open.
    #[error("unexpected end of stream with {depth} element(s) open")]
    UnexpectedEof { depth: usize },

    /// Writing dump output failed.
    #[error("write failed: {0}")]
    Io(#[from] io::Error),

    /// Caller misuse, independent of the input document.
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}
