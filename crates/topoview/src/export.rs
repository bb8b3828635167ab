//! Export of laid-out topologies.
//!
//! The [`Exporter`] trait is the last stage of the pipeline:
//!
//! ```text
//! JSON source
//!     ↓ parse
//! Topology
//!     ↓ tree (BFS, grouping, collapse state)
//! TopologyTree
//!     ↓ layout
//! TreeLayout
//!     ↓ export (this module)
//! Output file
//! ```
//!
//! # Available Backends
//!
//! - [`svg`] - SVG output via [`svg::SvgBuilder`] and [`svg::Svg`]
//!
//! # Error Handling
//!
//! Export operations return [`Error`], which converts into
//! [`TopoviewError::Export`] at the crate boundary.
//!
//! [`TopoviewError::Export`]: crate::TopoviewError::Export

/// SVG export backend.
pub mod svg;

use crate::layout::TreeLayout;

/// Abstraction for export backends.
pub trait Exporter {
    /// Exports a tree layout to the backend's output format.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the layout cannot be converted to the
    /// target format, or [`Error::Io`] if writing the output fails.
    fn export_tree_layout(&mut self, layout: &TreeLayout) -> Result<(), Error>;
}

/// Errors that can occur during export.
#[derive(Debug)]
pub enum Error {
    /// A rendering or conversion failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}
