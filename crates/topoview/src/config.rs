//! Configuration types for topology layout, styling and the initial view.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file; every field is optional and falls back to its default.
//!
//! - [`AppConfig`] - top-level configuration
//! - [`LayoutConfig`] - tidy-tree spacing and node extents
//! - [`StyleConfig`] - colors and fonts
//! - [`ViewConfig`] - initial grouping, overlay and zoom limits
//!
//! # Example
//!
//! ```
//! # use topoview::config::AppConfig;
//! let config = AppConfig::default();
//! assert_eq!(config.layout().level_distance(), 350.0);
//! assert!(config.style().group_palette().is_ok());
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use topoview_core::color::{Color, DEFAULT_GROUP_COLORS, GroupPalette};

use crate::command::StatusType;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    layout: LayoutConfig,

    #[serde(default)]
    style: StyleConfig,

    #[serde(default)]
    view: ViewConfig,
}

impl AppConfig {
    pub fn new(layout: LayoutConfig, style: StyleConfig, view: ViewConfig) -> Self {
        Self {
            layout,
            style,
            view,
        }
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Returns a mutable reference to the view section, used to apply
    /// command-line overrides.
    pub fn view_mut(&mut self) -> &mut ViewConfig {
        &mut self.view
    }
}

/// Spacing of the tidy-tree layout and the extents of node glyphs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Horizontal distance between consecutive depths.
    level_distance: f32,

    /// Vertical distance between adjacent sibling leaves.
    sibling_distance: f32,

    /// Radius of an individual node.
    node_radius: f32,

    /// Height of one description table row.
    table_row_height: f32,
}

impl LayoutConfig {
    pub fn new(
        level_distance: f32,
        sibling_distance: f32,
        node_radius: f32,
        table_row_height: f32,
    ) -> Self {
        Self {
            level_distance,
            sibling_distance,
            node_radius,
            table_row_height,
        }
    }

    pub fn level_distance(&self) -> f32 {
        self.level_distance
    }

    pub fn sibling_distance(&self) -> f32 {
        self.sibling_distance
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    pub fn table_row_height(&self) -> f32 {
        self.table_row_height
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            level_distance: 350.0,
            sibling_distance: 80.0,
            node_radius: 12.0,
            table_row_height: 30.0,
        }
    }
}

/// Visual styling configuration.
///
/// Colors are kept as strings and parsed on access, so an invalid color is
/// reported when the scene is rendered rather than when the file is read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleConfig {
    background_color: Option<String>,
    edge_color: String,
    edge_width: f32,
    font_family: String,
    /// Node color per group number, keyed by the number as a string.
    group_colors: BTreeMap<String, String>,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`], or `None` if none is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn background_color(&self) -> Result<Option<Color>, String> {
        self.background_color
            .as_ref()
            .map(|color| Color::new(color))
            .transpose()
            .map_err(|err| format!("Invalid background color in config: {err}"))
    }

    /// Returns the parsed edge color.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string is not a valid color.
    pub fn edge_color(&self) -> Result<Color, String> {
        Color::new(&self.edge_color).map_err(|err| format!("Invalid edge color in config: {err}"))
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Builds the group palette from `group_colors`.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a group number or a value is not a
    /// valid color.
    pub fn group_palette(&self) -> Result<GroupPalette, String> {
        let mut palette = GroupPalette::new(Color::default());
        for (group, color) in &self.group_colors {
            let group: u32 = group
                .parse()
                .map_err(|_| format!("Invalid group `{group}` in config: expected a group number"))?;
            let color = Color::new(color)
                .map_err(|err| format!("Invalid color for group {group} in config: {err}"))?;
            palette.set(group, color);
        }
        Ok(palette)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background_color: None,
            edge_color: "#999".to_string(),
            edge_width: 3.0,
            font_family: "Arial".to_string(),
            group_colors: DEFAULT_GROUP_COLORS
                .iter()
                .map(|(group, color)| (group.to_string(), color.to_string()))
                .collect(),
        }
    }
}

/// Initial view state and zoom limits.
///
/// Deserialization rejects zoom limits that are not finite and positive, or
/// where `min_zoom > max_zoom`.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "ViewConfigFile")]
pub struct ViewConfig {
    grouping: GroupingMode,
    control_points: bool,
    min_zoom: f32,
    max_zoom: f32,
}

impl ViewConfig {
    pub fn grouping(&self) -> GroupingMode {
        self.grouping
    }

    pub fn control_points(&self) -> bool {
        self.control_points
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn set_grouping(&mut self, grouping: GroupingMode) {
        self.grouping = grouping;
    }

    pub fn set_control_points(&mut self, control_points: bool) {
        self.control_points = control_points;
    }
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            grouping: GroupingMode::Individual,
            control_points: false,
            min_zoom: 0.1,
            max_zoom: 10.0,
        }
    }
}

/// The `[view]` table as written, before the zoom limits are checked.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ViewConfigFile {
    grouping: GroupingMode,
    control_points: bool,
    min_zoom: f32,
    max_zoom: f32,
}

impl Default for ViewConfigFile {
    fn default() -> Self {
        let view = ViewConfig::default();
        Self {
            grouping: view.grouping,
            control_points: view.control_points,
            min_zoom: view.min_zoom,
            max_zoom: view.max_zoom,
        }
    }
}

impl TryFrom<ViewConfigFile> for ViewConfig {
    type Error = String;

    fn try_from(file: ViewConfigFile) -> Result<Self, Self::Error> {
        for (name, value) in [("min_zoom", file.min_zoom), ("max_zoom", file.max_zoom)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("`{name}` must be a positive number, got {value}"));
            }
        }
        if file.min_zoom > file.max_zoom {
            return Err(format!(
                "`min_zoom` ({}) must not exceed `max_zoom` ({})",
                file.min_zoom, file.max_zoom
            ));
        }

        Ok(Self {
            grouping: file.grouping,
            control_points: file.control_points,
            min_zoom: file.min_zoom,
            max_zoom: file.max_zoom,
        })
    }
}

/// How nodes are presented: one glyph per node or one per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupingMode {
    #[default]
    Individual,
    Aggregated,
}

impl GroupingMode {
    /// The command status that selects this mode.
    pub fn status(self) -> StatusType {
        match self {
            Self::Individual => StatusType::Individual,
            Self::Aggregated => StatusType::Aggregated,
        }
    }

    /// The other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Individual => Self::Aggregated,
            Self::Aggregated => Self::Individual,
        }
    }
}

impl std::str::FromStr for GroupingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "individual" => Ok(Self::Individual),
            "aggregated" => Ok(Self::Aggregated),
            _ => Err(format!(
                "invalid grouping `{s}`, valid values: individual, aggregated"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults() {
        let layout = LayoutConfig::default();
        assert_eq!(layout.level_distance(), 350.0);
        assert_eq!(layout.sibling_distance(), 80.0);
        assert_eq!(layout.node_radius(), 12.0);
        assert_eq!(layout.table_row_height(), 30.0);
    }

    #[test]
    fn test_default_palette_matches_group_colors() {
        let palette = StyleConfig::default().group_palette().unwrap();
        assert_eq!(palette.color_for(2), Color::new("#603059").unwrap());
        assert_eq!(palette.color_for(99), Color::default());
    }

    #[test]
    fn test_invalid_palette_entries() {
        let mut style = StyleConfig::default();
        style.group_colors.insert("one".to_string(), "red".to_string());
        assert!(style.group_palette().unwrap_err().contains("Invalid group `one`"));

        let mut style = StyleConfig::default();
        style.group_colors.insert("1".to_string(), "not-a-color".to_string());
        assert!(style.group_palette().is_err());
    }

    #[test]
    fn test_background_color() {
        let style = StyleConfig {
            background_color: Some("white".to_string()),
            ..StyleConfig::default()
        };
        assert!(style.background_color().unwrap().is_some());
        assert!(StyleConfig::default().background_color().unwrap().is_none());
    }

    #[test]
    fn test_grouping_mode() {
        assert_eq!("aggregated".parse(), Ok(GroupingMode::Aggregated));
        assert!("grouped".parse::<GroupingMode>().is_err());
        assert_eq!(GroupingMode::Individual.toggled(), GroupingMode::Aggregated);
        assert_eq!(GroupingMode::Aggregated.status(), StatusType::Aggregated);
    }

    #[test]
    fn test_zoom_limits_from_toml() {
        let config: AppConfig = toml::from_str("[view]\nmin_zoom = 0.5\nmax_zoom = 4.0\n").unwrap();
        assert_eq!(config.view().min_zoom(), 0.5);
        assert_eq!(config.view().max_zoom(), 4.0);

        let config: AppConfig = toml::from_str("[view]\ncontrol_points = true\n").unwrap();
        assert!(config.view().control_points());
        assert_eq!(config.view().max_zoom(), 10.0);
    }

    #[test]
    fn test_invalid_zoom_limits_rejected() {
        let err = toml::from_str::<AppConfig>("[view]\nmin_zoom = 5.0\nmax_zoom = 1.0\n")
            .unwrap_err();
        assert!(err.to_string().contains("must not exceed `max_zoom`"));

        for source in [
            "[view]\nmin_zoom = nan\n",
            "[view]\nmax_zoom = inf\n",
            "[view]\nmin_zoom = 0.0\n",
            "[view]\nmin_zoom = -1.0\n",
        ] {
            assert!(toml::from_str::<AppConfig>(source).is_err(), "{source}");
        }
    }

    #[test]
    fn test_view_rejects_unknown_fields() {
        assert!(toml::from_str::<AppConfig>("[view]\nzoom = 2.0\n").is_err());
    }
}
