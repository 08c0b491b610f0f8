//! Quadric surfaces in the x-y plane and the half-spaces they bound.

use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;
use strata_core::{Direction, GeometryError, Point, SurfaceId};

/// Shape of a surface, written as the zero set of `f(x, y)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SurfaceKind {
    /// General line `a*x + b*y + c = 0`.
    Plane {
        /// x coefficient.
        a: f64,
        /// y coefficient.
        b: f64,
        /// Constant term.
        c: f64,
    },
    /// Vertical line `x = x0`.
    XPlane {
        /// Intercept on the x axis.
        x: f64,
    },
    /// Horizontal line `y = y0`.
    YPlane {
        /// Intercept on the y axis.
        y: f64,
    },
    /// Circle `(x - x0)^2 + (y - y0)^2 - r^2 = 0`.
    Circle {
        /// Center x.
        x: f64,
        /// Center y.
        y: f64,
        /// Radius, strictly positive.
        radius: f64,
    },
}

/// A bounding surface with an id.
#[derive(Clone, Debug, PartialEq)]
pub struct Surface {
    id: SurfaceId,
    kind: SurfaceKind,
}

impl Surface {
    /// Create a surface, rejecting degenerate coefficients.
    ///
    /// Returns `Err(GeometryError::InvalidSurface)` for a plane with
    /// `a == b == 0`, a non-finite coefficient, or a circle whose radius is
    /// not strictly positive.
    pub fn new(id: SurfaceId, kind: SurfaceKind) -> Result<Self, GeometryError> {
        let invalid = |reason: &str| GeometryError::InvalidSurface {
            surface: id,
            reason: reason.to_string(),
        };
        match kind {
            SurfaceKind::Plane { a, b, c } => {
                if !(a.is_finite() && b.is_finite() && c.is_finite()) {
                    return Err(invalid("plane coefficients must be finite"));
                }
                if a == 0.0 && b == 0.0 {
                    return Err(invalid("plane needs a non-zero x or y coefficient"));
                }
            }
            SurfaceKind::XPlane { x: v } | SurfaceKind::YPlane { y: v } => {
                if !v.is_finite() {
                    return Err(invalid("plane intercept must be finite"));
                }
            }
            SurfaceKind::Circle { x, y, radius } => {
                if !(x.is_finite() && y.is_finite()) {
                    return Err(invalid("circle center must be finite"));
                }
                if !(radius.is_finite() && radius > 0.0) {
                    return Err(invalid("circle radius must be finite and positive"));
                }
            }
        }
        Ok(Self { id, kind })
    }

    /// Shorthand for a general plane.
    pub fn plane(id: SurfaceId, a: f64, b: f64, c: f64) -> Result<Self, GeometryError> {
        Self::new(id, SurfaceKind::Plane { a, b, c })
    }

    /// Shorthand for a vertical plane `x = x0`.
    pub fn x_plane(id: SurfaceId, x: f64) -> Result<Self, GeometryError> {
        Self::new(id, SurfaceKind::XPlane { x })
    }

    /// Shorthand for a horizontal plane `y = y0`.
    pub fn y_plane(id: SurfaceId, y: f64) -> Result<Self, GeometryError> {
        Self::new(id, SurfaceKind::YPlane { y })
    }

    /// Shorthand for a circle.
    pub fn circle(id: SurfaceId, x: f64, y: f64, radius: f64) -> Result<Self, GeometryError> {
        Self::new(id, SurfaceKind::Circle { x, y, radius })
    }

    /// Surface id.
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Surface shape.
    pub fn kind(&self) -> &SurfaceKind {
        &self.kind
    }

    /// Radius and center, if this is a circle.
    pub fn as_circle(&self) -> Option<(Point, f64)> {
        match self.kind {
            SurfaceKind::Circle { x, y, radius } => Some((Point::new(x, y), radius)),
            _ => None,
        }
    }

    /// `(a, b, c)` of the line form for the three linear kinds.
    fn line_coefficients(&self) -> Option<(f64, f64, f64)> {
        match self.kind {
            SurfaceKind::Plane { a, b, c } => Some((a, b, c)),
            SurfaceKind::XPlane { x } => Some((1.0, 0.0, -x)),
            SurfaceKind::YPlane { y } => Some((0.0, 1.0, -y)),
            SurfaceKind::Circle { .. } => None,
        }
    }

    /// Value of the surface function at `point`.
    ///
    /// Negative on one side, positive on the other, zero on the surface.
    pub fn evaluate(&self, point: Point) -> f64 {
        match self.kind {
            SurfaceKind::Circle { x, y, radius } => {
                let dx = point.x - x;
                let dy = point.y - y;
                dx * dx + dy * dy - radius * radius
            }
            SurfaceKind::Plane { a, b, c } => a * point.x + b * point.y + c,
            SurfaceKind::XPlane { x } => point.x - x,
            SurfaceKind::YPlane { y } => point.y - y,
        }
    }

    /// Distances along the ray `point + t * direction` (with `t > 0`) at
    /// which the ray crosses the surface, in increasing order.
    pub fn intersections(&self, point: Point, direction: Direction) -> SmallVec<[f64; 2]> {
        let mut out = SmallVec::new();
        match self.kind {
            SurfaceKind::Circle { x, y, radius } => {
                let dx = point.x - x;
                let dy = point.y - y;
                let half_b = dx * direction.cos() + dy * direction.sin();
                let c = dx * dx + dy * dy - radius * radius;
                let disc = half_b * half_b - c;
                if disc < 0.0 {
                    return out;
                }
                let root = disc.sqrt();
                for t in [-half_b - root, -half_b + root] {
                    if t > 0.0 {
                        out.push(t);
                    }
                }
            }
            _ => {
                let Some((a, b, c)) = self.line_coefficients() else {
                    return out;
                };
                let denom = a * direction.cos() + b * direction.sin();
                if denom == 0.0 {
                    return out;
                }
                let t = -(a * point.x + b * point.y + c) / denom;
                if t > 0.0 {
                    out.push(t);
                }
            }
        }
        out
    }

    /// Distance along `direction` from `point` to the nearest crossing of
    /// this surface, or `f64::INFINITY` if the ray never reaches it.
    pub fn distance(&self, point: Point, direction: Direction) -> f64 {
        self.intersections(point, direction)
            .first()
            .copied()
            .unwrap_or(f64::INFINITY)
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SurfaceKind::Plane { a, b, c } => {
                write!(f, "Surface ID = {}, type = PLANE, A = {a}, B = {b}, C = {c}", self.id)
            }
            SurfaceKind::XPlane { x } => {
                write!(f, "Surface ID = {}, type = XPLANE, x = {x}", self.id)
            }
            SurfaceKind::YPlane { y } => {
                write!(f, "Surface ID = {}, type = YPLANE, y = {y}", self.id)
            }
            SurfaceKind::Circle { x, y, radius } => write!(
                f,
                "Surface ID = {}, type = CIRCLE, x0 = {x}, y0 = {y}, radius = {radius}",
                self.id
            ),
        }
    }
}

/// Which side of a surface a cell occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Halfspace {
    /// Points where the surface function is negative (inside a circle).
    Negative,
    /// Points where the surface function is positive (outside a circle).
    Positive,
}

impl Halfspace {
    /// `-1.0` or `+1.0`.
    pub fn sign(self) -> f64 {
        match self {
            Self::Negative => -1.0,
            Self::Positive => 1.0,
        }
    }

    /// The other side.
    pub fn flip(self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// One bounding half-space of a cell.
///
/// Surfaces are shared between the cells they separate, hence the `Arc`.
#[derive(Clone, Debug, PartialEq)]
pub struct Bound {
    surface: Arc<Surface>,
    halfspace: Halfspace,
}

impl Bound {
    /// Bind `surface` on side `halfspace`.
    pub fn new(surface: Arc<Surface>, halfspace: Halfspace) -> Self {
        Self { surface, halfspace }
    }

    /// The bounding surface.
    pub fn surface(&self) -> &Arc<Surface> {
        &self.surface
    }

    /// The occupied side.
    pub fn halfspace(&self) -> Halfspace {
        self.halfspace
    }

    /// Whether `point` is on the occupied side, counting points within
    /// `threshold` of the surface as inside.
    pub fn admits(&self, point: Point, threshold: f64) -> bool {
        self.halfspace.sign() * self.surface.evaluate(point) >= -threshold
    }
}
