//! Command-line argument definitions for the Topoview CLI.
//!
//! Arguments select the input topology, the output path, configuration and
//! logging, and replay view interactions (grouping, collapsing, zoom/pan and
//! commands) before the SVG is written.

use clap::Parser;

use topoview::{command::StatusType, config::GroupingMode};

/// Command-line arguments for the Topoview topology renderer
#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input topology JSON file; the built-in sample is used
    /// when omitted
    #[arg(help = "Path to the input file")]
    pub input: Option<String>,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Initial grouping, overriding the configuration
    #[arg(long)]
    pub grouping: Option<GroupingMode>,

    /// Show the control points of every edge curve
    #[arg(long)]
    pub control_points: bool,

    /// Ids of nodes to collapse
    #[arg(long, num_args = 1..)]
    pub collapse: Vec<String>,

    /// Zoom factor around the scene origin
    #[arg(long)]
    pub zoom: Option<f32>,

    /// Horizontal pan in screen units
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_x: f32,

    /// Vertical pan in screen units
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub pan_y: f32,

    /// Commands to execute in order (individual, aggregated, control-point,
    /// no-assistant)
    #[arg(long, num_args = 1..)]
    pub apply: Vec<StatusType>,

    /// Number of commands to undo after applying
    #[arg(long, default_value_t = 0)]
    pub undo: usize,

    /// Reset grouping and overlay after applying and undoing
    #[arg(long)]
    pub reset: bool,
}
