//! Geometric primitives for topology layout and rendering.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in scene space
//! - [`Size`] - Width and height dimensions
//! - [`Bounds`] - A rectangular bounding box defined by minimum and maximum coordinates
//! - [`Insets`] - Margin values for four sides
//! - [`Transform`] - The zoom/pan transform applied to the rendered scene
//!
//! # Coordinate System
//!
//! Coordinates follow SVG: origin at the top-left, X grows rightward and Y
//! grows downward. Tree depth runs along X, siblings are stacked along Y.

/// A 2D point in scene space.
///
/// # Examples
///
/// ```
/// # use topoview_core::geometry::Point;
/// let p1 = Point::new(10.0, 20.0);
/// let p2 = Point::new(5.0, 5.0);
///
/// let sum = p1.add_point(p2);
/// assert_eq!(sum.x(), 15.0);
/// assert_eq!(sum.y(), 25.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Returns a copy of this point with a new y-coordinate
    pub fn with_y(mut self, y: f32) -> Self {
        self.y = y;
        self
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Creates a new bounds from its four edges
    pub fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds into the smallest bounds containing both.
    ///
    /// # Examples
    ///
    /// ```
    /// # use topoview_core::geometry::Bounds;
    /// let a = Bounds::new(0.0, 0.0, 100.0, 30.0);
    /// let b = Bounds::new(10.0, 40.0, 130.0, 120.0);
    ///
    /// let combined = a.merge(&b);
    /// assert_eq!(combined.width(), 130.0);
    /// assert_eq!(combined.height(), 120.0);
    /// ```
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

}

/// Represents spacing around an element with per-side values
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    /// Creates new insets with specified values for each side
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Returns the sum of left and right insets
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Returns the sum of top and bottom insets
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

/// Zoom/pan transform of the scene: `screen = scene * scale + translate`.
///
/// # Examples
///
/// ```
/// # use topoview_core::geometry::{Point, Transform};
/// let transform = Transform::identity()
///     .pan(Point::new(10.0, 0.0))
///     .zoom_at(2.0, Point::new(0.0, 0.0), 0.1, 10.0);
///
/// assert_eq!(transform.scale(), 2.0);
/// assert_eq!(transform.apply(Point::new(1.0, 1.0)), Point::new(22.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    translate: Point,
    scale: f32,
}

impl Transform {
    /// The transform that leaves the scene untouched.
    pub fn identity() -> Self {
        Self {
            translate: Point::default(),
            scale: 1.0,
        }
    }

    /// Creates a transform from a translation and a scale factor.
    pub fn new(translate: Point, scale: f32) -> Self {
        Self { translate, scale }
    }

    pub fn translate(self) -> Point {
        self.translate
    }

    pub fn scale(self) -> f32 {
        self.scale
    }

    /// Maps a scene point to screen space.
    pub fn apply(self, point: Point) -> Point {
        point.scale(self.scale).add_point(self.translate)
    }

    /// Returns the transform moved by `delta` screen units.
    pub fn pan(self, delta: Point) -> Self {
        Self {
            translate: self.translate.add_point(delta),
            scale: self.scale,
        }
    }

    /// Multiplies the scale by `factor`, keeping the screen point `anchor`
    /// fixed. The resulting scale is clamped to `[min_scale, max_scale]`.
    pub fn zoom_at(self, factor: f32, anchor: Point, min_scale: f32, max_scale: f32) -> Self {
        let scale = (self.scale * factor).clamp(min_scale, max_scale);
        let ratio = scale / self.scale;
        let translate = anchor.sub_point(anchor.sub_point(self.translate).scale(ratio));
        Self { translate, scale }
    }

    /// Renders the transform as an SVG `transform` attribute value.
    pub fn to_svg_value(self) -> String {
        format!(
            "translate({}, {}) scale({})",
            self.translate.x, self.translate.y, self.scale
        )
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn bounds_strategy() -> impl Strategy<Value = Bounds> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            1.0f32..500.0,
            1.0f32..500.0,
        )
            .prop_map(|(x, y, w, h)| Bounds::new(x, y, x + w, y + h))
    }

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn scale_strategy() -> impl Strategy<Value = f32> {
        0.1f32..10.0
    }

    /// Merged bounds must contain both inputs.
    fn check_bounds_merge_contains_both(b1: Bounds, b2: Bounds) -> Result<(), TestCaseError> {
        let merged = b1.merge(&b2);
        for b in [b1, b2] {
            prop_assert!(merged.min_x() <= b.min_x() && merged.max_x() >= b.max_x());
            prop_assert!(merged.min_y() <= b.min_y() && merged.max_y() >= b.max_y());
        }
        Ok(())
    }

    /// Panning then panning back returns the original transform.
    fn check_pan_roundtrip(start: Point, delta: Point) -> Result<(), TestCaseError> {
        let transform = Transform::new(start, 1.0);
        let back = transform.pan(delta).pan(delta.scale(-1.0));
        prop_assert!(approx_eq!(f32, back.translate().x(), start.x(), epsilon = 1e-3));
        prop_assert!(approx_eq!(f32, back.translate().y(), start.y(), epsilon = 1e-3));
        Ok(())
    }

    /// Zooming never leaves the configured scale range.
    fn check_zoom_within_range(factor: f32, anchor: Point) -> Result<(), TestCaseError> {
        let zoomed = Transform::identity().zoom_at(factor, anchor, 0.5, 2.0);
        prop_assert!(zoomed.scale() >= 0.5 && zoomed.scale() <= 2.0);
        Ok(())
    }

    proptest! {
        #[test]
        fn bounds_merge_contains_both(b1 in bounds_strategy(), b2 in bounds_strategy()) {
            check_bounds_merge_contains_both(b1, b2)?;
        }

        #[test]
        fn pan_roundtrip(start in point_strategy(), delta in point_strategy()) {
            check_pan_roundtrip(start, delta)?;
        }

        #[test]
        fn zoom_within_range(factor in scale_strategy(), anchor in point_strategy()) {
            check_zoom_within_range(factor, anchor)?;
        }
    }
}
