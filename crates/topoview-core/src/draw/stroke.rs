//! Stroke and line-style definitions.
//!
//! - [`StrokeDefinition`]: color, width and dash style of a stroke
//! - [`StrokeStyle`]: line patterns
//! - [`apply_stroke!`](crate::apply_stroke!): applies all stroke attributes to
//!   an SVG element
//!
//! ```
//! use topoview_core::draw::{StrokeDefinition, StrokeStyle};
//! use topoview_core::color::Color;
//! use svg::node::element as svg_element;
//!
//! let mut stroke = StrokeDefinition::solid(Color::new("gray").unwrap(), 1.0);
//! stroke.set_style(StrokeStyle::Custom("1,1".to_string()));
//! let path = svg_element::Path::new().set("d", "M 0 0 L 10 10");
//! let path = topoview_core::apply_stroke!(path, &stroke);
//! assert!(path.to_string().contains("stroke-dasharray"));
//! ```

use crate::color::Color;

/// Visual pattern of a stroke.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum StrokeStyle {
    /// Continuous line
    #[default]
    Solid,
    /// Any SVG dasharray pattern, e.g. "1,1"
    Custom(String),
}

impl StrokeStyle {
    /// Returns the SVG dasharray value for this style, or None for solid lines.
    pub fn to_svg_value(&self) -> Option<&str> {
        match self {
            Self::Solid => None,
            Self::Custom(pattern) => Some(pattern),
        }
    }
}

/// A stroke definition for rendering lines and borders.
#[derive(Debug, Clone)]
pub struct StrokeDefinition {
    color: Color,
    width: f32,
    style: StrokeStyle,
}

impl StrokeDefinition {
    /// Creates a solid stroke with the given color and width.
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            style: StrokeStyle::Solid,
        }
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn style(&self) -> &StrokeStyle {
        &self.style
    }

    pub fn set_style(&mut self, style: StrokeStyle) {
        self.style = style;
    }
}

impl Default for StrokeDefinition {
    fn default() -> Self {
        Self::solid(Color::default(), 1.0)
    }
}

/// Applies every attribute of a [`StrokeDefinition`] to an SVG element.
///
/// Sets `stroke`, `stroke-opacity`, `stroke-width` and, for patterned
/// styles, `stroke-dasharray`.
#[macro_export]
macro_rules! apply_stroke {
    ($element:expr, $stroke:expr) => {{
        let mut elem = $element
            .set("stroke", $stroke.color().to_string())
            .set("stroke-opacity", $stroke.color().alpha())
            .set("stroke-width", $stroke.width());

        if let Some(dasharray) = $stroke.style().to_svg_value() {
            elem = elem.set("stroke-dasharray", dasharray);
        }

        elem
    }};
}
