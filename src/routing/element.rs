use crate::geometry::{Axis, Bounds, Point, EPSILON};

use super::direction::Direction;

/// Where one end of a route leg attaches: a box, the side it leaves through and the
/// corner inset attachment points must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionElement {
    pub bounds: Bounds,
    pub direction: Direction,
    pub corner_offset: f32,
}

impl ConnectionElement {
    /// Point boxes never carry a corner offset.
    pub fn new(bounds: Bounds, direction: Direction, corner_offset: f32) -> Self {
        let corner_offset = if bounds.is_point() {
            0.0
        } else {
            corner_offset.max(0.0)
        };
        Self {
            bounds,
            direction,
            corner_offset,
        }
    }

    pub fn main_axis(&self) -> Axis {
        self.direction.axis()
    }

    pub fn sub_axis(&self) -> Axis {
        self.main_axis().other()
    }

    /// Main-axis coordinate of the side the element faces.
    pub fn border(&self) -> f32 {
        let axis = self.main_axis();
        self.bounds.center_on(axis) + self.direction.sign() * self.bounds.half.get(axis)
    }

    /// Sub-axis interval attachment points may slide along.
    pub fn movable_range(&self) -> (f32, f32) {
        let axis = self.sub_axis();
        let lo = self.bounds.min(axis) + self.corner_offset;
        let hi = self.bounds.max(axis) - self.corner_offset;
        if lo > hi {
            let mid = self.bounds.center_on(axis);
            (mid, mid)
        } else {
            (lo, hi)
        }
    }

    pub fn clamp_sub(&self, value: f32) -> f32 {
        let (lo, hi) = self.movable_range();
        value.clamp(lo, hi)
    }

    /// Sub coordinate on this element's border closest to `other`'s center.
    pub fn preferred_sub(&self, other: &ConnectionElement) -> f32 {
        self.clamp_sub(other.bounds.center_on(self.sub_axis()))
    }

    /// Point on the facing side at sub coordinate `sub`.
    pub fn attach_point(&self, sub: f32) -> Point {
        Point::on_axes(self.main_axis(), self.border(), sub)
    }

    /// Main-axis coordinate just beyond `common` (grown by `threshold`) on the facing side.
    pub fn far_edge(&self, common: &Bounds, threshold: f32) -> f32 {
        let grown = common.inflate(threshold);
        let axis = self.main_axis();
        if self.direction.sign() > 0.0 {
            grown.max(axis)
        } else {
            grown.min(axis)
        }
    }

    /// Region reachable from the border along the main axis without turning.
    pub fn direct_access_area(&self, common: &Bounds, threshold: f32) -> Bounds {
        let axis = self.main_axis();
        let border = self.border();
        let far = self.far_edge(common, threshold);
        let (lo, hi) = self.movable_range();
        Bounds::from_min_max(
            Point::on_axes(axis, border, lo),
            Point::on_axes(axis, far, hi),
        )
    }
}

/// Whether two elements can see each other along their main axes.
pub fn areas_intersect(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    threshold: f32,
) -> bool {
    a.direct_access_area(common, threshold)
        .touches(&b.direct_access_area(common, threshold))
}

pub fn is_perpendicular(dot: f32) -> bool {
    dot.abs() < EPSILON
}

pub fn is_same_direction(dot: f32) -> bool {
    dot > 1.0 - EPSILON
}
