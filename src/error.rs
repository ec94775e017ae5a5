//! Errors surfaced to callers.
//!
//! Irregular input is never an error: unbalanced delimiters and unmatched display blocks
//! degrade to text.  What remains are contract violations and I/O.

use std::{fmt, io};

/// The error type for fallible `mathdollar` operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A segment kind name that the tokenizer never produces.
    #[error("unrecognized segment kind {0:?}; expected one of text, inline-math, display-math")]
    UnrecognizedSegmentKind(String),

    /// A node kind name that the host tree does not have.
    #[error("unrecognized node kind {0:?}")]
    UnrecognizedNodeKind(String),

    /// Reading input or writing output failed.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// A formatter failed.
    #[error(transparent)]
    Fmt(#[from] fmt::Error),
}
