//! 2-D points and ray directions.

use std::fmt;
use std::ops::{Add, Sub};

/// A point in the x-y plane.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    /// x coordinate.
    pub x: f64,
    /// y coordinate.
    pub y: f64,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a point from its coordinates.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// The point reached by travelling `distance` along `direction`.
    pub fn advance(&self, distance: f64, direction: Direction) -> Point {
        Point {
            x: self.x + distance * direction.cos(),
            y: self.y + distance * direction.sin(),
        }
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A unit direction in the x-y plane.
///
/// Stored as the cosine/sine pair of the azimuthal angle so that distance
/// computations never call trigonometric functions on the hot path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction {
    cos: f64,
    sin: f64,
}

impl Direction {
    /// Direction making `angle` radians with the +x axis.
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self { cos, sin }
    }

    /// Direction of the vector `(dx, dy)`.
    ///
    /// Returns `None` for the zero vector or non-finite components.
    pub fn from_components(dx: f64, dy: f64) -> Option<Self> {
        let len = dx.hypot(dy);
        if !len.is_finite() || len == 0.0 {
            return None;
        }
        Some(Self {
            cos: dx / len,
            sin: dy / len,
        })
    }

    /// x component (cosine of the angle).
    pub fn cos(&self) -> f64 {
        self.cos
    }

    /// y component (sine of the angle).
    pub fn sin(&self) -> f64 {
        self.sin
    }

    /// Angle with the +x axis in `(-pi, pi]`.
    pub fn angle(&self) -> f64 {
        self.sin.atan2(self.cos)
    }

    /// The opposite direction.
    pub fn reversed(&self) -> Self {
        Self {
            cos: -self.cos,
            sin: -self.sin,
        }
    }
}
