//! CLI logic for the Topoview topology renderer.
//!
//! Loads a topology, replays the requested view interactions and writes the
//! resulting SVG.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{debug, info};

use topoview::{TopologyBuilder, TopoviewError, geometry::Point, identifier::Id};

/// Run the Topoview CLI application
///
/// Interactions are applied in a fixed order: collapsed nodes, zoom and pan,
/// commands, undo and finally reset.
///
/// # Errors
///
/// Returns `TopoviewError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Collapse targets that are not in the tree
/// - Layout and rendering errors
pub fn run(args: &Args) -> Result<(), TopoviewError> {
    info!(
        input_path:? = args.input,
        output_path = args.output;
        "Processing topology"
    );

    let mut app_config = config::load_config(args.config.as_ref())?;
    if let Some(grouping) = args.grouping {
        app_config.view_mut().set_grouping(grouping);
    }
    if args.control_points {
        app_config.view_mut().set_control_points(true);
    }

    let builder = TopologyBuilder::new(app_config);
    let topology = match &args.input {
        Some(input) => {
            let source = fs::read_to_string(input)?;
            builder.parse(&source)?
        }
        None => {
            info!("No input given, using the sample topology");
            builder.sample()
        }
    };

    let mut view = builder.view(topology);

    for id in &args.collapse {
        let collapsed = view.toggle_node(Id::new(id))?;
        debug!(id = id.as_str(), collapsed = collapsed; "Toggled node");
    }

    if let Some(zoom) = args.zoom {
        view.zoom_by(zoom, Point::default());
    }
    if args.pan_x != 0.0 || args.pan_y != 0.0 {
        view.pan_by(args.pan_x, args.pan_y);
    }

    for status in &args.apply {
        view.apply(*status);
    }
    for _ in 0..args.undo {
        if view.undo().is_none() {
            debug!("Nothing left to undo");
            break;
        }
    }
    if args.reset {
        view.reset();
    }

    debug!(
        grouping:? = view.grouping(),
        control_points = view.shows_control_points(),
        commands = view.commands().len();
        "View state before export"
    );

    builder.export_svg(&view, &args.output)?;

    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}
