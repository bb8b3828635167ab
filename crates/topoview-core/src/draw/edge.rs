//! Edge curves and the control-point overlay.
//!
//! Both drawables take their geometry as absolute scene coordinates; the
//! `position` passed to [`Drawable::render_to_layers`] is an extra offset.

use svg::node::element as svg_element;

use crate::{
    apply_stroke,
    color::Color,
    draw::{Drawable, LayeredOutput, RenderLayer, StrokeDefinition, StrokeStyle, Text, TextDefinition},
    geometry::{Bounds, Point, Size},
};

/// Style of edge curves.
#[derive(Debug, Clone)]
pub struct EdgeDefinition {
    stroke: StrokeDefinition,
}

impl EdgeDefinition {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            stroke: StrokeDefinition::solid(color, width),
        }
    }

    /// Returns the stroke used for edge curves.
    pub fn stroke(&self) -> &StrokeDefinition {
        &self.stroke
    }
}

impl Default for EdgeDefinition {
    fn default() -> Self {
        Self::new(Color::new("#999").expect("edge color is a valid color"), 3.0)
    }
}

/// A cubic Bezier edge from `start` to `end`.
#[derive(Debug, Clone)]
pub struct EdgePath<'a> {
    definition: &'a EdgeDefinition,
    points: [Point; 4],
}

impl<'a> EdgePath<'a> {
    /// Creates an edge with explicit control points.
    pub fn new(
        definition: &'a EdgeDefinition,
        start: Point,
        control1: Point,
        control2: Point,
        end: Point,
    ) -> Self {
        Self {
            definition,
            points: [start, control1, control2, end],
        }
    }

    /// Returns the SVG path data of this edge, offset by `offset`.
    pub fn path_data(&self, offset: Point) -> String {
        let [start, control1, control2, end] = self.points.map(|point| point.add_point(offset));
        format!(
            "M {} {} C {} {}, {} {}, {} {}",
            start.x(),
            start.y(),
            control1.x(),
            control1.y(),
            control2.x(),
            control2.y(),
            end.x(),
            end.y()
        )
    }
}

impl Drawable for EdgePath<'_> {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        let path = svg_element::Path::new()
            .set("d", self.path_data(position))
            .set("fill", "none")
            .set("cursor", "pointer");
        let path = apply_stroke!(path, self.definition.stroke());

        output.add_to_layer(RenderLayer::Edge, Box::new(path));
        output
    }

    fn size(&self) -> Size {
        points_bounds(&self.points).to_size()
    }
}

const MARKER_RADIUS: f32 = 2.0;
const MARKER_LABEL_OFFSET: f32 = 15.0;

/// Debug overlay showing the control points of one edge.
///
/// Draws a marker and a `cp1`/`cp2` label at each control point, and dashed
/// guide lines `start -> cp1 -> cp2 -> end`.
#[derive(Debug, Clone)]
pub struct ControlPointOverlay {
    points: [Point; 4],
    stroke: StrokeDefinition,
    label: TextDefinition,
}

impl ControlPointOverlay {
    pub fn new(start: Point, control1: Point, control2: Point, end: Point) -> Self {
        let color = Color::new("red").expect("overlay color is a valid color");
        let mut stroke = StrokeDefinition::solid(color, 1.0);
        stroke.set_style(StrokeStyle::Custom("1,1".to_string()));

        let mut label = TextDefinition::new();
        label.set_font_size(10);

        Self {
            points: [start, control1, control2, end],
            stroke,
            label,
        }
    }
}

impl Drawable for ControlPointOverlay {
    fn render_to_layers(&self, position: Point) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let points = self.points.map(|point| point.add_point(position));
        let marker_stroke = StrokeDefinition::solid(self.stroke.color(), self.stroke.width());

        for pair in points.windows(2) {
            let line = svg_element::Line::new()
                .set("x1", pair[0].x())
                .set("y1", pair[0].y())
                .set("x2", pair[1].x())
                .set("y2", pair[1].y());
            let line = apply_stroke!(line, &self.stroke);
            output.add_to_layer(RenderLayer::Assistant, Box::new(line));
        }

        for (name, point) in [("cp1", points[1]), ("cp2", points[2])] {
            let marker = svg_element::Circle::new()
                .set("cx", point.x())
                .set("cy", point.y())
                .set("r", MARKER_RADIUS)
                .set("fill", self.stroke.color().to_string());
            let marker = apply_stroke!(marker, &marker_stroke);
            output.add_to_layer(RenderLayer::Assistant, Box::new(marker));

            let label_position = point.add_point(Point::new(0.0, MARKER_LABEL_OFFSET));
            for (_, node) in Text::new(&self.label, name)
                .render_to_layers(label_position)
                .into_items()
            {
                output.add_to_layer(RenderLayer::Assistant, node);
            }
        }

        output
    }

    fn size(&self) -> Size {
        points_bounds(&self.points).to_size()
    }
}

fn points_bounds(points: &[Point]) -> Bounds {
    let mut bounds = Bounds::new(f32::MAX, f32::MAX, f32::MIN, f32::MIN);
    for point in points {
        bounds = Bounds::new(
            bounds.min_x().min(point.x()),
            bounds.min_y().min(point.y()),
            bounds.max_x().max(point.x()),
            bounds.max_y().max(point.y()),
        );
    }
    bounds
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_path_data() {
        let definition = EdgeDefinition::default();
        let edge = EdgePath::new(
            &definition,
            Point::new(0.0, 0.0),
            Point::new(0.0, 40.0),
            Point::new(350.0, 40.0),
            Point::new(350.0, 80.0),
        );

        assert_eq!(edge.path_data(Point::default()), "M 0 0 C 0 40, 350 40, 350 80");
        assert_eq!(
            edge.path_data(Point::new(10.0, 5.0)),
            "M 10 5 C 10 45, 360 45, 360 85"
        );
    }

    #[test]
    fn test_edge_renders_on_edge_layer() {
        let definition = EdgeDefinition::default();
        let edge = EdgePath::new(
            &definition,
            Point::default(),
            Point::default(),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
        );

        let output = edge.render_to_layers(Point::default());
        assert!(output.has_layer(RenderLayer::Edge));
        let rendered = output.render()[0].to_string();
        assert!(rendered.contains("fill=\"none\""));
        assert!(rendered.contains("stroke-width=\"3\""));
    }

    #[test]
    fn test_edge_size_covers_control_points() {
        let definition = EdgeDefinition::default();
        let edge = EdgePath::new(
            &definition,
            Point::new(0.0, 0.0),
            Point::new(0.0, -20.0),
            Point::new(100.0, -20.0),
            Point::new(100.0, 50.0),
        );

        assert_approx_eq!(f32, edge.size().width(), 100.0);
        assert_approx_eq!(f32, edge.size().height(), 70.0);
    }

    #[test]
    fn test_overlay_draws_guides_markers_and_labels() {
        let overlay = ControlPointOverlay::new(
            Point::new(0.0, 0.0),
            Point::new(0.0, 30.0),
            Point::new(200.0, 30.0),
            Point::new(350.0, 60.0),
        );

        let output = overlay.render_to_layers(Point::default());
        assert!(!output.has_layer(RenderLayer::Text));

        let rendered = output.render();
        assert_eq!(rendered.len(), 1);

        let group = rendered[0].to_string();
        assert!(group.contains("data-layer=\"assistant\""));
        assert_eq!(group.matches("<line").count(), 3);
        assert_eq!(group.matches("<circle").count(), 2);
        assert!(group.contains("cp1"));
        assert!(group.contains("cp2"));
        assert!(group.contains("stroke-dasharray=\"1,1\""));
    }
}
