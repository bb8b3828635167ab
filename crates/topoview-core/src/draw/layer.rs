//! Layer-based rendering system for SVG output.
//!
//! Drawables state which z-order layer each SVG element belongs to; the
//! exporter then emits one `<g data-layer="...">` group per layer, bottom to
//! top.
//!
//! # Example
//!
//! ```
//! # use topoview_core::draw::{RenderLayer, LayeredOutput};
//! # use svg::node::element::{Circle, Path};
//!
//! let mut output = LayeredOutput::new();
//! output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
//! output.add_to_layer(RenderLayer::Edge, Box::new(Path::new()));
//!
//! // Edges render first even though they were added last
//! let svg_nodes = output.render();
//! assert_eq!(svg_nodes.len(), 2);
//! ```

use svg::node::element as svg_element;

/// Type alias for boxed SVG nodes.
pub type SvgNode = Box<dyn svg::Node>;

/// Rendering layers, bottom to top in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RenderLayer {
    /// Scene background
    Background,
    /// Edge curves between nodes
    Edge,
    /// Control-point overlay for edge curves
    Assistant,
    /// Node circles and description tables
    Node,
    /// Node labels and aggregate counts
    Text,
    /// Control-bar legend, drawn outside the zoomable scene
    Legend,
}

impl RenderLayer {
    /// Returns the name used in the `data-layer` attribute.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Background => "background",
            Self::Edge => "edge",
            Self::Assistant => "assistant",
            Self::Node => "node",
            Self::Text => "text",
            Self::Legend => "legend",
        }
    }
}

/// SVG nodes grouped by rendering layer.
#[derive(Debug, Default)]
pub struct LayeredOutput {
    items: Vec<(RenderLayer, SvgNode)>,
}

impl LayeredOutput {
    /// Creates a new empty `LayeredOutput`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a single node to the specified layer.
    pub fn add_to_layer(&mut self, layer: RenderLayer, node: SvgNode) {
        self.items.push((layer, node));
    }

    /// Appends all nodes of `other`, keeping their layers.
    pub fn merge(&mut self, other: LayeredOutput) {
        self.items.extend(other.items);
    }

    /// Returns `true` if there are no nodes in any layer.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Consumes the output, returning its nodes in insertion order.
    ///
    /// Used to move nodes onto a different layer than the one they were
    /// rendered to.
    pub fn into_items(self) -> Vec<(RenderLayer, SvgNode)> {
        self.items
    }

    /// Returns true if at least one node was added to `layer`.
    pub fn has_layer(&self, layer: RenderLayer) -> bool {
        self.items.iter().any(|(item_layer, _)| *item_layer == layer)
    }

    /// Renders all layers to SVG groups, consuming the output.
    ///
    /// Each non-empty layer becomes one `<g>` element carrying a `data-layer`
    /// attribute. Within a layer, nodes keep their insertion order.
    pub fn render(mut self) -> Vec<SvgNode> {
        if self.is_empty() {
            return Vec::new();
        }

        // Stable sort keeps insertion order inside each layer
        self.items.sort_by_key(|(layer, _)| *layer);

        let mut result = Vec::new();
        let mut current_layer = self.items[0].0;
        let mut current_group = svg_element::Group::new().set("data-layer", current_layer.name());

        for (layer, node) in self.items {
            if layer != current_layer {
                result.push(Box::new(current_group) as SvgNode);

                current_layer = layer;
                current_group = svg_element::Group::new().set("data-layer", layer.name());
            }

            current_group = current_group.add(node);
        }

        result.push(Box::new(current_group) as SvgNode);

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svg::node::element::{Circle, Path, Text};

    #[test]
    fn test_layered_output_new() {
        let output = LayeredOutput::new();
        assert!(output.is_empty());
    }

    #[test]
    fn test_layered_output_merge() {
        let mut output1 = LayeredOutput::new();
        output1.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));

        let mut output2 = LayeredOutput::new();
        output2.add_to_layer(RenderLayer::Edge, Box::new(Path::new()));

        output1.merge(output2);
        assert!(output1.has_layer(RenderLayer::Edge));

        let nodes = output1.render();
        assert_eq!(nodes.len(), 2);
    }

    #[test]
    fn test_render_orders_layers_bottom_up() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Text, Box::new(Text::new("label")));
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
        output.add_to_layer(RenderLayer::Edge, Box::new(Path::new()));

        let rendered: Vec<String> = output.render().iter().map(|node| node.to_string()).collect();

        assert_eq!(rendered.len(), 3);
        assert!(rendered[0].contains("data-layer=\"edge\""));
        assert!(rendered[1].contains("data-layer=\"node\""));
        assert!(rendered[2].contains("data-layer=\"text\""));
    }

    #[test]
    fn test_same_layer_is_grouped() {
        let mut output = LayeredOutput::new();
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));
        output.add_to_layer(RenderLayer::Node, Box::new(Circle::new()));

        assert_eq!(output.render().len(), 1);
    }
}
