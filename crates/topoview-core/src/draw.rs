//! Drawable primitives for topology rendering.
//!
//! All drawables implement the [`Drawable`] trait, which renders to a
//! [`LayeredOutput`] and reports the drawable's size.
//!
//! # Layer-Based Rendering
//!
//! Drawables render to one or more [`RenderLayer`]s, which are ordered during
//! final SVG generation: edges always end up below nodes, and the control-point
//! overlay sits between them.

mod edge;
mod layer;
mod legend;
mod node;
mod stroke;
mod table;
mod text;

pub use edge::{ControlPointOverlay, EdgeDefinition, EdgePath};
pub use layer::{LayeredOutput, RenderLayer, SvgNode};
pub use legend::{Legend, LegendEntry, LegendIcon};
pub use node::{AGGREGATE_RADIUS_FACTOR, LABEL_OFFSET_FACTOR, NodeDefinition, NodeGlyph};
pub use stroke::{StrokeDefinition, StrokeStyle};
pub use table::{DescriptionTable, TableDefinition};
pub use text::{Text, TextAnchor, TextDefinition};

use crate::geometry::{Point, Size};

/// Trait for elements that can be rendered to SVG layers.
pub trait Drawable: std::fmt::Debug {
    /// Renders this drawable at `position`.
    ///
    /// Implementations add SVG nodes to the appropriate layers of the returned
    /// [`LayeredOutput`].
    fn render_to_layers(&self, position: Point) -> LayeredOutput;

    /// Returns the size of this drawable.
    fn size(&self) -> Size;
}
