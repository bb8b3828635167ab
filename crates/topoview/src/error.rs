//! Error types for Topoview operations.
//!
//! [`TopoviewError`] wraps every error condition of the parse, tree, layout
//! and export stages.

use std::io;

use thiserror::Error;

use topoview_core::topology::ParseError;

use crate::tree::TreeError;

/// The main error type for Topoview operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant keeps the source text next to the error so that the
/// span can be shown in context.
#[derive(Debug, Error)]
pub enum TopoviewError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("Topology error: {0}")]
    Topology(#[from] TreeError),

    #[error("Layout error: {0}")]
    Layout(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<crate::export::Error> for TopoviewError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl TopoviewError {
    /// Create a new `Parse` error with the associated source text.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}
