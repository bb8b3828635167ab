//! Color handling for Topoview.
//!
//! This module provides the [`Color`] type which wraps the `DynamicColor` type
//! from the color crate, and the default palette used to tell node groups apart.

use std::{
    collections::HashMap,
    hash::{Hash, Hasher},
    str::FromStr,
};

use color::DynamicColor;

/// Per-group node colors used when no palette is configured.
pub const DEFAULT_GROUP_COLORS: [(u32, &str); 9] = [
    (1, "#597b8b"),
    (2, "#603059"),
    (3, "#534710"),
    (4, "#6e4b1c"),
    (5, "#d28b5f"),
    (6, "#8c4a03"),
    (7, "#cbb583"),
    (8, "#ad73c4"),
    (9, "#b8a1cc"),
];

/// Wrapper around the `DynamicColor` type from the color crate
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Eq for Color {}

impl Hash for Color {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl Color {
    /// Create a new `Color` from a CSS color string such as "#ff0000",
    /// "rgb(255, 0, 0)" or "red".
    ///
    /// # Examples
    ///
    /// ```
    /// use topoview_core::color::Color;
    ///
    /// let red = Color::new("#ff0000").unwrap();
    /// let blue = Color::new("blue").unwrap();
    /// assert!(Color::new("not-a-color").is_err());
    /// ```
    pub fn new(color_str: &str) -> Result<Self, String> {
        match DynamicColor::from_str(color_str) {
            Ok(color) => Ok(Self { color }),
            Err(err) => Err(format!("invalid color `{color_str}`: {err}")),
        }
    }

    /// Returns the alpha component of this color, between 0.0 and 1.0.
    pub fn alpha(&self) -> f32 {
        self.color.components[3]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::new("black").expect("'black' is a valid CSS color")
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.color)
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_string())
    }
}

/// Maps node group numbers to colors.
///
/// Groups without an entry fall back to the palette's fallback color.
///
/// # Examples
///
/// ```
/// use topoview_core::color::{Color, GroupPalette};
///
/// let palette = GroupPalette::default();
/// assert_eq!(palette.color_for(1), Color::new("#597b8b").unwrap());
/// assert_eq!(palette.color_for(42), Color::default());
/// ```
#[derive(Debug, Clone)]
pub struct GroupPalette {
    colors: HashMap<u32, Color>,
    fallback: Color,
}

impl GroupPalette {
    /// Creates an empty palette where every group uses `fallback`.
    pub fn new(fallback: Color) -> Self {
        Self {
            colors: HashMap::new(),
            fallback,
        }
    }

    /// Assigns `color` to `group`, replacing any previous assignment.
    pub fn set(&mut self, group: u32, color: Color) {
        self.colors.insert(group, color);
    }

    /// Returns the color of `group`.
    pub fn color_for(&self, group: u32) -> Color {
        self.colors.get(&group).copied().unwrap_or(self.fallback)
    }
}

impl Default for GroupPalette {
    fn default() -> Self {
        let mut palette = Self::new(Color::default());
        for (group, hex) in DEFAULT_GROUP_COLORS {
            palette.set(group, Color::new(hex).expect("default palette colors are valid"));
        }
        palette
    }
}
