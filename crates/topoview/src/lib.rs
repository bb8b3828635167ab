//! Topoview - network topology trees rendered to SVG.
//!
//! Converts a flat node/edge topology into a tree, lays it out with a tidy
//! tree algorithm and renders it to SVG. Grouping, collapsed nodes, the
//! control-point overlay and zoom/pan are kept in a [`view::TopologyView`]
//! driven by an undoable command stack.

pub mod aggregate;
pub mod command;
pub mod config;
pub mod export;
pub mod layout;
pub mod sample;
pub mod structure;
pub mod tree;
pub mod view;

mod error;

pub use topoview_core::{color, draw, geometry, identifier, topology};

pub use error::TopoviewError;

use log::{debug, info, trace};

use config::AppConfig;
use export::{
    Exporter,
    svg::{Svg, SvgBuilder},
};
use layout::TreeLayout;
use topology::Topology;
use view::TopologyView;

/// Builder for parsing and rendering topologies.
///
/// # Examples
///
/// ```rust
/// use topoview::{TopologyBuilder, config::AppConfig};
///
/// let source = r#"{
///     "nodes": [
///         { "id": "core", "label": "Core", "group": 1 },
///         { "id": "edge", "label": "Edge", "group": 2 }
///     ],
///     "edges": [ { "source": "core", "target": "edge" } ]
/// }"#;
///
/// let builder = TopologyBuilder::new(AppConfig::default());
/// let topology = builder.parse(source).expect("Failed to parse");
/// let view = builder.view(topology);
/// let svg = builder.render_svg(&view).expect("Failed to render");
///
/// assert!(svg.contains("Edge"));
/// ```
#[derive(Default)]
pub struct TopologyBuilder {
    config: AppConfig,
}

impl TopologyBuilder {
    /// Create a new topology builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Parse a JSON topology.
    ///
    /// # Errors
    ///
    /// Returns [`TopoviewError::Parse`] with the source attached if the JSON
    /// is malformed or does not describe a topology.
    pub fn parse(&self, source: &str) -> Result<Topology, TopoviewError> {
        info!("Parsing topology");

        let topology =
            Topology::from_json(source).map_err(|err| TopoviewError::new_parse_error(err, source))?;

        debug!(
            nodes = topology.nodes().len(),
            edges = topology.edges().len();
            "Topology parsed successfully"
        );
        trace!(topology:?; "Parsed topology");

        Ok(topology)
    }

    /// Create a view of `topology` in the configured initial state.
    pub fn view(&self, topology: Topology) -> TopologyView {
        TopologyView::new(topology, &self.config)
    }

    /// The built-in sample topology.
    pub fn sample(&self) -> Topology {
        sample::topology()
    }

    /// Render the current state of `view` to an SVG string.
    ///
    /// # Errors
    ///
    /// Returns [`TopoviewError::Layout`] if the layout produced non-finite
    /// coordinates and [`TopoviewError::Export`] for invalid style settings.
    pub fn render_svg(&self, view: &TopologyView) -> Result<String, TopoviewError> {
        let layout = self.checked_layout(view)?;
        let svg = self.svg_exporter(view, "")?;
        let svg_string = svg.render_to_string(&layout);

        info!("SVG rendered successfully");
        Ok(svg_string)
    }

    /// Render the current state of `view` and write it to `path`.
    ///
    /// # Errors
    ///
    /// Same as [`TopologyBuilder::render_svg`], plus [`TopoviewError::Export`]
    /// if the file cannot be written.
    pub fn export_svg(&self, view: &TopologyView, path: &str) -> Result<(), TopoviewError> {
        let layout = self.checked_layout(view)?;
        let mut svg = self.svg_exporter(view, path)?;
        svg.export_tree_layout(&layout)?;

        info!(path = path; "SVG exported successfully");
        Ok(())
    }

    fn svg_exporter(&self, view: &TopologyView, path: &str) -> Result<Svg, TopoviewError> {
        Ok(SvgBuilder::new(path)
            .with_style(self.config.style())
            .with_layout_config(self.config.layout())
            .with_view(view)
            .build()?)
    }

    fn checked_layout(&self, view: &TopologyView) -> Result<TreeLayout, TopoviewError> {
        info!(grouping:? = view.grouping(); "Calculating layout");
        let layout = view.layout();

        if let Some(node) = layout
            .nodes()
            .iter()
            .find(|node| !node.position().x().is_finite() || !node.position().y().is_finite())
        {
            return Err(TopoviewError::Layout(format!(
                "node `{}` has no finite position",
                node.id()
            )));
        }
        info!(nodes = layout.len(); "Layout calculated");

        Ok(layout)
    }
}
