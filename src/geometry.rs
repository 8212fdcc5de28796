use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used for every "is this zero / parallel / perpendicular" decision.
pub const EPSILON: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Builds a point from a coordinate on `axis` and one on the other axis.
    pub fn on_axes(axis: Axis, along: f32, across: f32) -> Self {
        match axis {
            Axis::X => Self::new(along, across),
            Axis::Y => Self::new(across, along),
        }
    }

    pub fn get(self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    pub fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn cross(self, other: Point) -> f32 {
        self.x * other.y - self.y * other.x
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a (near) zero vector.
    pub fn normalized(self) -> Option<Point> {
        let len = self.length();
        if len <= f32::EPSILON {
            None
        } else {
            Some(self * (1.0 / len))
        }
    }

    /// Rotates counter-clockwise (in a y-up frame) by `radians`.
    pub fn rotate(self, radians: f32) -> Point {
        let (sin, cos) = radians.sin_cos();
        Point::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    pub fn distance(self, other: Point) -> f32 {
        (other - self).length()
    }

    pub fn approx_eq(self, other: Point) -> bool {
        (self.x - other.x).abs() <= EPSILON && (self.y - other.y).abs() <= EPSILON
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

impl Mul<f32> for Point {
    type Output = Point;
    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

/// Axis-aligned rectangle stored as center plus half extents.
///
/// A zero-extent `Bounds` stands for a single point, e.g. the live cursor while an
/// edge is being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub center: Point,
    pub half: Point,
}

impl Bounds {
    pub fn from_center_size(center: Point, size: Point) -> Self {
        Self {
            center,
            half: Point::new(size.x.abs() / 2.0, size.y.abs() / 2.0),
        }
    }

    pub fn from_min_max(min: Point, max: Point) -> Self {
        let lo = Point::new(min.x.min(max.x), min.y.min(max.y));
        let hi = Point::new(min.x.max(max.x), min.y.max(max.y));
        Self {
            center: (lo + hi) * 0.5,
            half: (hi - lo) * 0.5,
        }
    }

    pub fn point(at: Point) -> Self {
        Self {
            center: at,
            half: Point::ZERO,
        }
    }

    /// Smallest bounds covering every point, `None` when empty.
    pub fn enclosing(points: impl IntoIterator<Item = Point>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut lo, mut hi) = (first, first);
        for p in iter {
            lo = Point::new(lo.x.min(p.x), lo.y.min(p.y));
            hi = Point::new(hi.x.max(p.x), hi.y.max(p.y));
        }
        Some(Self::from_min_max(lo, hi))
    }

    pub fn is_point(&self) -> bool {
        self.half.x <= EPSILON && self.half.y <= EPSILON
    }

    pub fn min(&self, axis: Axis) -> f32 {
        self.center.get(axis) - self.half.get(axis)
    }

    pub fn max(&self, axis: Axis) -> f32 {
        self.center.get(axis) + self.half.get(axis)
    }

    pub fn center_on(&self, axis: Axis) -> f32 {
        self.center.get(axis)
    }

    /// Full size along `axis`.
    pub fn extent(&self, axis: Axis) -> f32 {
        self.half.get(axis) * 2.0
    }

    pub fn min_point(&self) -> Point {
        self.center - self.half
    }

    pub fn max_point(&self) -> Point {
        self.center + self.half
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        let lo = self.min_point();
        let hi = self.max_point();
        let olo = other.min_point();
        let ohi = other.max_point();
        Bounds::from_min_max(
            Point::new(lo.x.min(olo.x), lo.y.min(olo.y)),
            Point::new(hi.x.max(ohi.x), hi.y.max(ohi.y)),
        )
    }

    /// Grows every side by `amount`; negative values shrink, clamping at zero size.
    pub fn inflate(&self, amount: f32) -> Bounds {
        Bounds {
            center: self.center,
            half: Point::new(
                (self.half.x + amount).max(0.0),
                (self.half.y + amount).max(0.0),
            ),
        }
    }

    /// Strict overlap: rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.min(Axis::X) < other.max(Axis::X)
            && other.min(Axis::X) < self.max(Axis::X)
            && self.min(Axis::Y) < other.max(Axis::Y)
            && other.min(Axis::Y) < self.max(Axis::Y)
    }

    /// Inclusive overlap with [`EPSILON`] slack, so degenerate (zero-width) areas can meet.
    pub fn touches(&self, other: &Bounds) -> bool {
        self.min(Axis::X) <= other.max(Axis::X) + EPSILON
            && other.min(Axis::X) <= self.max(Axis::X) + EPSILON
            && self.min(Axis::Y) <= other.max(Axis::Y) + EPSILON
            && other.min(Axis::Y) <= self.max(Axis::Y) + EPSILON
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min(Axis::X)
            && p.x <= self.max(Axis::X)
            && p.y >= self.min(Axis::Y)
            && p.y <= self.max(Axis::Y)
    }
}

/// Bounds of the segment `a`-`b` grown by `pad` on every side.
pub fn segment_bounds(a: Point, b: Point, pad: f32) -> Bounds {
    Bounds::from_min_max(a, b).inflate(pad)
}
