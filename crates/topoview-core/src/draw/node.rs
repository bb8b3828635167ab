//! Node glyph: circle, label underneath and, for aggregates, the member count.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, Text, TextDefinition},
    geometry::{Point, Size},
};

/// Radius multiplier applied to aggregate nodes.
pub const AGGREGATE_RADIUS_FACTOR: f32 = 1.8;

/// Distance from the node center to the label baseline, in radii.
pub const LABEL_OFFSET_FACTOR: f32 = 2.7;

const COUNT_OFFSET: f32 = 8.0;

/// Shared style of all node glyphs in a scene.
#[derive(Debug, Clone)]
pub struct NodeDefinition {
    radius: f32,
    border_width: f32,
    highlighted_border_width: f32,
    aggregate_fill: Color,
    label: TextDefinition,
    count: TextDefinition,
}

impl NodeDefinition {
    /// Creates a node style with the given radius and label font family.
    pub fn new(radius: f32, font_family: &str) -> Self {
        let mut definition = Self {
            radius,
            ..Self::default()
        };
        definition.label.set_font_family(font_family);
        definition.count.set_font_family(font_family);
        definition
    }

    /// Returns the radius of an individual node.
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Returns the radius of a glyph, enlarged for aggregates.
    pub fn effective_radius(&self, aggregated: bool) -> f32 {
        if aggregated {
            self.radius * AGGREGATE_RADIUS_FACTOR
        } else {
            self.radius
        }
    }

    /// Returns the fill and border color of aggregate nodes.
    pub fn aggregate_fill(&self) -> Color {
        self.aggregate_fill
    }
}

impl Default for NodeDefinition {
    fn default() -> Self {
        let mut label = TextDefinition::new();
        label.set_font_size(18);
        let mut count = TextDefinition::new();
        count.set_font_size(24);

        Self {
            radius: 12.0,
            border_width: 1.0,
            highlighted_border_width: 2.0,
            aggregate_fill: Color::new("#deebf3").expect("aggregate fill is a valid color"),
            label,
            count,
        }
    }
}

/// A single node ready to be drawn.
#[derive(Debug, Clone)]
pub struct NodeGlyph<'a> {
    definition: &'a NodeDefinition,
    label: &'a str,
    color: Color,
    aggregated_count: Option<usize>,
    collapsed: bool,
}

impl<'a> NodeGlyph<'a> {
    /// Creates an individual node glyph filled with `color`.
    pub fn new(definition: &'a NodeDefinition, label: &'a str, color: Color) -> Self {
        Self {
            definition,
            label,
            color,
            aggregated_count: None,
            collapsed: false,
        }
    }

    /// Marks this glyph as an aggregate of `count` nodes.
    pub fn with_aggregated_count(mut self, count: usize) -> Self {
        self.aggregated_count = Some(count);
        self.color = self.definition.aggregate_fill();
        self
    }

    /// Marks this glyph as a collapsed node hiding its children.
    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    fn radius(&self) -> f32 {
        self.definition
            .effective_radius(self.aggregated_count.is_some())
    }
}

impl Drawable for NodeGlyph<'_> {
    /// Renders the glyph centered on `position`.
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let border_width = if self.collapsed {
            self.definition.highlighted_border_width
        } else {
            self.definition.border_width
        };
        let stroke = StrokeDefinition::solid(self.color, border_width);

        let circle = svg_element::Circle::new()
            .set("cx", position.x())
            .set("cy", position.y())
            .set("r", self.radius())
            .set("fill", self.color.to_string());
        let circle = apply_stroke!(circle, &stroke);
        output.add_to_layer(RenderLayer::Node, Box::new(circle));

        let label_position =
            position.add_point(Point::new(0.0, self.definition.radius * LABEL_OFFSET_FACTOR));
        output.merge(Text::new(&self.definition.label, self.label).render_to_layers(label_position));

        if let Some(count) = self.aggregated_count {
            let count = count.to_string();
            let count_position = position.add_point(Point::new(0.0, COUNT_OFFSET));
            output.merge(Text::new(&self.definition.count, &count).render_to_layers(count_position));
        }

        output
    }

    /// Size from the circle top to the label baseline.
    fn size(&self) -> Size {
        let radius = self.radius();
        let label_width = Text::new(&self.definition.label, self.label)
            .calculate_size()
            .width();
        Size::new(
            (radius * 2.0).max(label_width),
            radius + self.definition.radius * LABEL_OFFSET_FACTOR,
        )
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_effective_radius() {
        let definition = NodeDefinition::default();
        assert_approx_eq!(f32, definition.effective_radius(false), 12.0);
        assert_approx_eq!(f32, definition.effective_radius(true), 21.6, epsilon = 0.001);
    }

    #[test]
    fn test_render_individual_node() {
        let definition = NodeDefinition::default();
        let color = Color::new("#597b8b").unwrap();
        let glyph = NodeGlyph::new(&definition, "Node 1", color);

        let rendered: Vec<String> = glyph
            .render_to_layers(Point::new(10.0, 20.0))
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();

        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].contains("r=\"12\""));
        assert!(rendered[0].contains("stroke-width=\"1\""));
        assert!(rendered[1].contains("Node 1"));
    }

    #[test]
    fn test_render_aggregate_node_shows_count() {
        let definition = NodeDefinition::default();
        let glyph = NodeGlyph::new(&definition, "Group 3", Color::default()).with_aggregated_count(7);

        let rendered: Vec<String> = glyph
            .render_to_layers(Point::default())
            .render()
            .iter()
            .map(|node| node.to_string())
            .collect();

        let fill = format!("fill=\"{}\"", definition.aggregate_fill());
        assert!(rendered[0].contains(&fill));
        assert_eq!(rendered[1].matches("<text").count(), 2);
        assert!(rendered[1].contains('7'));
    }

    #[test]
    fn test_collapsed_node_has_thicker_border() {
        let definition = NodeDefinition::default();
        let glyph = NodeGlyph::new(&definition, "n", Color::default()).with_collapsed(true);

        let output = glyph.render_to_layers(Point::default());
        let circle = &output.render()[0];
        assert!(circle.to_string().contains("stroke-width=\"2\""));
    }
}
