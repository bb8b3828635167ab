//! Cubic Bezier curves between laid-out nodes.

use topoview_core::geometry::Point;

/// Offset of the second control point from the target.
const CONTROL_POINT_OFFSET: f32 = 50.0;

/// Coordinate difference below which two endpoints count as aligned.
const ALIGNMENT_THRESHOLD: f32 = 3.0;

/// How an edge curve was derived from its endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveShape {
    /// Endpoints at different depths and breadths
    Bent,
    /// Endpoints share a breadth coordinate
    Horizontal,
    /// Endpoints share a depth coordinate
    Vertical,
}

/// A cubic Bezier edge curve `start -> control1 -> control2 -> end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeCurve {
    start: Point,
    control1: Point,
    control2: Point,
    end: Point,
    shape: CurveShape,
}

impl EdgeCurve {
    /// Computes the curve from `start` to `end`.
    ///
    /// The second control point lies beyond the target along the
    /// perpendicular offset; the first shares the start's x and the second's
    /// y. Aligned endpoints collapse the control points onto the target.
    ///
    /// ```
    /// use topoview::layout::curve::{CurveShape, EdgeCurve};
    /// use topoview_core::geometry::Point;
    ///
    /// let curve = EdgeCurve::between(Point::new(0.0, 0.0), Point::new(350.0, 0.0));
    /// assert_eq!(curve.shape(), CurveShape::Horizontal);
    /// assert_eq!(curve.control2(), Point::new(350.0, 0.0));
    /// ```
    pub fn between(start: Point, end: Point) -> Self {
        let (x0, y0) = (start.x(), start.y());
        let (x1, y1) = (end.x(), end.y());

        let shape = if (y0 - y1).abs() < ALIGNMENT_THRESHOLD {
            CurveShape::Horizontal
        } else if (x0 - x1).abs() < ALIGNMENT_THRESHOLD {
            CurveShape::Vertical
        } else {
            CurveShape::Bent
        };

        let control2 = match shape {
            CurveShape::Bent => Point::new(
                x1 + CONTROL_POINT_OFFSET * ((x1 - x0) / (y1 - y0)),
                y1 - CONTROL_POINT_OFFSET * ((y1 - y0) / (x1 - x0)),
            ),
            CurveShape::Horizontal | CurveShape::Vertical => end,
        };
        let control1 = Point::new(x0, control2.y());

        Self {
            start,
            control1,
            control2,
            end,
            shape,
        }
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn control1(&self) -> Point {
        self.control1
    }

    pub fn control2(&self) -> Point {
        self.control2
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn shape(&self) -> CurveShape {
        self.shape
    }
}
