//! SVG export backend.
//!
//! [`SvgBuilder`] collects the style and view state, [`Svg`] renders a
//! [`TreeLayout`] into an SVG document. The document has two parts:
//!
//! - the scene, translated by the left/top margins and by the view's
//!   zoom/pan transform, holding the edge, assistant, node and text layers;
//! - the legend, translated by the margins only, so it stays fixed while the
//!   scene is zoomed.

use std::{fs::File, io::Write};

use log::{debug, error, info};
use svg::{Document, node::element as svg_element};

use topoview_core::{
    color::{Color, GroupPalette},
    draw::{
        ControlPointOverlay, DescriptionTable, Drawable, EdgeDefinition, EdgePath, LABEL_OFFSET_FACTOR,
        LayeredOutput, Legend, LegendEntry, LegendIcon, NodeDefinition, NodeGlyph, RenderLayer,
        TableDefinition,
    },
    geometry::{Bounds, Insets, Point, Size, Transform},
};

use crate::{
    config::{LayoutConfig, StyleConfig},
    export,
    layout::{LayoutNode, TreeLayout, curve::EdgeCurve},
    view::{ControlType, TopologyView},
};

/// Space around the scene: room for the legend on top and the root label on
/// the left.
const MARGINS: Insets = Insets::new(50.0, 10.0, 10.0, 150.0);

/// Legend origin relative to the margin corner.
const LEGEND_ORIGIN: Point = Point::new(-50.0, -30.0);

/// Horizontal space taken by one legend entry.
const LEGEND_ENTRY_WIDTH: f32 = 220.0;

/// Builder for [`Svg`] exporters.
///
/// # Examples
///
/// ```
/// use topoview::{config::AppConfig, export::svg::SvgBuilder};
///
/// let config = AppConfig::default();
/// let svg = SvgBuilder::new("topology.svg")
///     .with_style(config.style())
///     .with_layout_config(config.layout())
///     .build()
///     .unwrap();
/// # let _ = svg;
/// ```
#[derive(Debug, Default)]
pub struct SvgBuilder<'a> {
    file_name: String,
    style: Option<&'a StyleConfig>,
    layout_config: Option<&'a LayoutConfig>,
    view: Option<&'a TopologyView>,
}

impl<'a> SvgBuilder<'a> {
    /// Creates a builder writing to `file_name`.
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: &'a StyleConfig) -> Self {
        self.style = Some(style);
        self
    }

    pub fn with_layout_config(mut self, layout_config: &'a LayoutConfig) -> Self {
        self.layout_config = Some(layout_config);
        self
    }

    /// Takes the transform, overlay flag and legend state from `view`.
    pub fn with_view(mut self, view: &'a TopologyView) -> Self {
        self.view = Some(view);
        self
    }

    /// Builds the exporter.
    ///
    /// # Errors
    ///
    /// Returns [`export::Error::Render`] if a configured color is invalid.
    pub fn build(self) -> Result<Svg, export::Error> {
        let default_style = StyleConfig::default();
        let default_layout = LayoutConfig::default();
        let style = self.style.unwrap_or(&default_style);
        let layout_config = self.layout_config.unwrap_or(&default_layout);

        let background = style.background_color().map_err(export::Error::Render)?;
        let edge_color = style.edge_color().map_err(export::Error::Render)?;
        let palette = style.group_palette().map_err(export::Error::Render)?;

        let (transform, control_points, highlights) = match self.view {
            Some(view) => (
                view.transform(),
                view.shows_control_points(),
                [
                    view.is_highlighted(ControlType::Aggregation),
                    view.is_highlighted(ControlType::ControlPoint),
                ],
            ),
            None => (Transform::identity(), false, [false, false]),
        };

        Ok(Svg {
            file_name: self.file_name,
            node_definition: NodeDefinition::new(layout_config.node_radius(), style.font_family()),
            table_definition: TableDefinition::new(
                layout_config.table_row_height(),
                style.font_family(),
            ),
            edge_definition: EdgeDefinition::new(edge_color, style.edge_width()),
            palette,
            background,
            font_family: style.font_family().to_string(),
            transform,
            control_points,
            highlights,
        })
    }
}

/// SVG exporter for tree layouts.
#[derive(Debug)]
pub struct Svg {
    file_name: String,
    node_definition: NodeDefinition,
    table_definition: TableDefinition,
    edge_definition: EdgeDefinition,
    palette: GroupPalette,
    background: Option<Color>,
    font_family: String,
    transform: Transform,
    control_points: bool,
    highlights: [bool; 2],
}

impl Svg {
    /// Renders `layout` to an SVG document.
    pub fn render_tree_layout(&self, layout: &TreeLayout) -> Document {
        let content_bounds = self.calculate_content_bounds(layout);
        let svg_size = self.calculate_svg_dimensions(content_bounds.to_size());

        let mut doc = Document::new()
            .set(
                "viewBox",
                format!("0 0 {} {}", svg_size.width(), svg_size.height()),
            )
            .set("width", svg_size.width())
            .set("height", svg_size.height());

        let mut frame = LayeredOutput::new();
        if let Some(background) = self.background {
            let rect = svg_element::Rectangle::new()
                .set("x", 0)
                .set("y", 0)
                .set("width", svg_size.width())
                .set("height", svg_size.height())
                .set("fill", background.to_string());
            frame.add_to_layer(RenderLayer::Background, Box::new(rect));
        }

        // Scene content is shifted so the layout's top-left corner sits on the
        // margin corner before zoom and pan apply
        let content = self
            .render_scene(layout)
            .render()
            .into_iter()
            .fold(
                svg_element::Group::new().set(
                    "transform",
                    format!(
                        "translate({}, {})",
                        -content_bounds.min_x(),
                        -content_bounds.min_y()
                    ),
                ),
                |group, node| group.add(node),
            );
        let scene = svg_element::Group::new()
            .set("class", "scene")
            .set(
                "transform",
                format!(
                    "translate({}, {}) {}",
                    MARGINS.left(),
                    MARGINS.top(),
                    self.transform.to_svg_value()
                ),
            )
            .add(content);

        let legend = self
            .legend()
            .render_to_layers(LEGEND_ORIGIN.add_point(Point::new(MARGINS.left(), MARGINS.top())));
        frame.merge(legend);

        // Background below the scene, legend above it
        let mut layers = frame.render();
        let legend_layers = layers.split_off(usize::from(self.background.is_some()));
        for layer in layers {
            doc = doc.add(layer);
        }
        doc = doc.add(scene);
        for layer in legend_layers {
            doc = doc.add(layer);
        }

        debug!(
            width = svg_size.width(),
            height = svg_size.height(),
            nodes = layout.len();
            "SVG document rendered"
        );
        doc
    }

    /// Renders `layout` to an SVG string.
    pub fn render_to_string(&self, layout: &TreeLayout) -> String {
        self.render_tree_layout(layout).to_string()
    }

    fn render_scene(&self, layout: &TreeLayout) -> LayeredOutput {
        let mut output = LayeredOutput::new();

        for (source, target) in layout.link_nodes() {
            let curve = EdgeCurve::between(source.position(), target.position());
            let edge = EdgePath::new(
                &self.edge_definition,
                curve.start(),
                curve.control1(),
                curve.control2(),
                curve.end(),
            );
            output.merge(edge.render_to_layers(Point::default()));

            if self.control_points {
                let overlay = ControlPointOverlay::new(
                    curve.start(),
                    curve.control1(),
                    curve.control2(),
                    curve.end(),
                );
                output.merge(overlay.render_to_layers(Point::default()));
            }
        }

        for node in layout.nodes() {
            output.merge(self.render_node(node));
        }

        output
    }

    fn render_node(&self, node: &LayoutNode) -> LayeredOutput {
        let mut output = LayeredOutput::new();
        let color = self.palette.color_for(node.node().group());

        let mut glyph = NodeGlyph::new(&self.node_definition, node.node().label(), color)
            .with_collapsed(node.is_collapsed());
        if let Some(count) = node.aggregated_count() {
            glyph = glyph.with_aggregated_count(count);
        }
        output.merge(glyph.render_to_layers(node.position()));

        let descriptions = node.node().descriptions();
        if !descriptions.is_empty() {
            let table = DescriptionTable::new(&self.table_definition, descriptions);
            output.merge(table.render_to_layers(self.table_origin(node)));
        }

        output
    }

    fn table_origin(&self, node: &LayoutNode) -> Point {
        node.position()
            .add_point(Point::new(0.0, node.radius() * LABEL_OFFSET_FACTOR))
    }

    fn legend(&self) -> Legend {
        let mut legend = Legend::new(&self.font_family);
        let entries = [
            (ControlType::Aggregation, self.node_definition.aggregate_fill()),
            (
                ControlType::ControlPoint,
                Color::new("red").expect("legend color is a valid color"),
            ),
        ];
        for ((control, border), highlighted) in entries.into_iter().zip(self.highlights) {
            legend.push(
                LegendEntry::new(control.title(), LegendIcon::Node, border)
                    .with_highlighted(highlighted),
            );
        }
        legend
    }

    /// Bounds of all node extents and description tables.
    fn calculate_content_bounds(&self, layout: &TreeLayout) -> Bounds {
        layout
            .nodes()
            .iter()
            .filter_map(|node| {
                self.table_definition
                    .bounds_at(self.table_origin(node), node.node().descriptions().len())
            })
            .fold(layout.bounds(), |acc, bounds| acc.merge(&bounds))
    }

    /// Scaled content size plus margins, wide enough for the legend.
    fn calculate_svg_dimensions(&self, content_size: Size) -> Size {
        let scale = self.transform.scale();
        let pan = self.transform.translate();

        let width = MARGINS.horizontal_sum() + content_size.width() * scale + pan.x().max(0.0);
        let height = MARGINS.vertical_sum() + content_size.height() * scale + pan.y().max(0.0);
        let legend_width = MARGINS.left() + LEGEND_ORIGIN.x() + 2.0 * LEGEND_ENTRY_WIDTH;

        Size::new(width.max(legend_width), height)
    }

    /// Writes an SVG document to the configured file.
    pub fn write_document(&self, doc: Document) -> Result<(), export::Error> {
        info!(file_name = self.file_name; "Creating SVG file");
        let mut f = match File::create(&self.file_name) {
            Ok(file) => file,
            Err(err) => {
                error!(file_name = self.file_name, err:err; "Failed to create SVG file");
                return Err(export::Error::Io(err));
            }
        };

        if let Err(err) = write!(f, "{doc}") {
            error!(file_name = self.file_name, err:err; "Failed to write SVG content");
            return Err(export::Error::Io(err));
        }

        Ok(())
    }
}

impl export::Exporter for Svg {
    fn export_tree_layout(&mut self, layout: &TreeLayout) -> Result<(), export::Error> {
        let doc = self.render_tree_layout(layout);
        self.write_document(doc)
    }
}

#[cfg(test)]
mod tests {
    use topoview_core::{
        identifier::Id,
        topology::{Node, Topology},
    };

    use super::*;
    use crate::{config::AppConfig, export::Exporter};

    fn sample_view() -> TopologyView {
        let mut topology = Topology::new();
        topology.add_node(Node::new(Id::new("r"), "Root", 1));
        topology.add_node(
            Node::new(Id::new("a"), "Access", 2)
                .with_descriptions(vec!["eth0".to_string(), "eth1".to_string()]),
        );
        topology.add_node(Node::new(Id::new("b"), "Backbone", 3));
        topology.add_edge(Id::new("r"), Id::new("a"));
        topology.add_edge(Id::new("r"), Id::new("b"));
        TopologyView::new(topology, &AppConfig::default())
    }

    fn render(view: &TopologyView) -> String {
        SvgBuilder::new("unused.svg")
            .with_view(view)
            .build()
            .unwrap()
            .render_to_string(&view.layout())
    }

    #[test]
    fn test_layers_in_order() {
        let svg = render(&sample_view());

        let edge = svg.find("data-layer=\"edge\"").unwrap();
        let node = svg.find("data-layer=\"node\"").unwrap();
        let text = svg.find("data-layer=\"text\"").unwrap();
        let legend = svg.find("data-layer=\"legend\"").unwrap();
        assert!(edge < node && node < text && text < legend);
        assert!(!svg.contains("data-layer=\"assistant\""));
        assert!(!svg.contains("data-layer=\"background\""));
    }

    #[test]
    fn test_content_elements() {
        let svg = render(&sample_view());

        assert_eq!(svg.matches("<circle").count(), 3 + 2);
        assert_eq!(svg.matches("<path").count(), 2);
        // one table cell per description row
        assert_eq!(svg.matches("<rect").count(), 2);
        assert!(svg.contains("Backbone"));
        assert!(svg.contains("Group Aggregation"));
        assert!(svg.contains("Show Control Points"));
    }

    #[test]
    fn test_control_point_overlay() {
        let mut view = sample_view();
        view.control(ControlType::ControlPoint);
        let svg = render(&view);

        assert!(svg.contains("data-layer=\"assistant\""));
        assert!(svg.contains("cp1"));
        assert!(svg.contains("cp2"));
        assert!(svg.contains("font-weight=\"800\""));
    }

    #[test]
    fn test_view_transform_applied() {
        let mut view = sample_view();
        view.zoom_by(2.0, Point::default());
        view.pan_by(30.0, 0.0);
        let svg = render(&view);

        assert!(svg.contains("translate(150, 50) translate(30, 0) scale(2)"));
    }

    #[test]
    fn test_background_rect() {
        let config: AppConfig = toml::from_str("[style]\nbackground_color = \"white\"\n").unwrap();
        let view = sample_view();
        let svg = SvgBuilder::new("unused.svg")
            .with_style(config.style())
            .with_view(&view)
            .build()
            .unwrap()
            .render_to_string(&view.layout());

        let background = svg.find("data-layer=\"background\"").unwrap();
        let scene = svg.find("class=\"scene\"").unwrap();
        assert!(background < scene);
    }

    #[test]
    fn test_invalid_style_color() {
        let config: AppConfig = toml::from_str("[style]\nedge_color = \"nope\"\n").unwrap();
        let result = SvgBuilder::new("unused.svg").with_style(config.style()).build();

        assert!(matches!(result, Err(export::Error::Render(_))));
    }

    #[test]
    fn test_export_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.svg");
        let view = sample_view();

        let mut svg = SvgBuilder::new(&path.to_string_lossy())
            .with_view(&view)
            .build()
            .unwrap();
        svg.export_tree_layout(&view.layout()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<svg"));
    }

    #[test]
    fn test_empty_layout() {
        let view = TopologyView::new(Topology::new(), &AppConfig::default());
        let svg = render(&view);

        assert!(svg.contains("<svg"));
        assert_eq!(svg.matches("<path").count(), 0);
    }
}
