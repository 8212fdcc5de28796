use crate::geometry::Bounds;

use super::element::{areas_intersect, is_perpendicular, is_same_direction, ConnectionElement};

/// Cheap bend count for a leg between `a` and `b`, without building the leg.
///
/// The numbers match what [`build_path`](super::builder::build_path) produces for the same
/// inputs whenever its clearance assumptions hold.
pub fn estimate_bends(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    threshold: f32,
) -> u32 {
    let dot = a.direction.dot(b.direction);
    if is_perpendicular(dot) {
        if areas_intersect(a, b, common, threshold) { 1 } else { 3 }
    } else if is_same_direction(dot) {
        if has_room_beside(a, b, common) { 2 } else { 4 }
    } else if areas_intersect(a, b, common, threshold) {
        0
    } else if facing_gap(a, b) > 2.0 * threshold {
        2
    } else {
        4
    }
}

/// Same-direction pairs can share one outward run when they are offset far enough sideways.
pub(super) fn has_room_beside(a: &ConnectionElement, b: &ConnectionElement, common: &Bounds) -> bool {
    let sub = a.sub_axis();
    let needed = a.bounds.extent(sub).max(b.bounds.extent(sub)) + a.corner_offset.max(b.corner_offset);
    common.extent(sub) >= needed
}

/// Distance between two opposite-facing borders, positive when they face each other.
pub(super) fn facing_gap(a: &ConnectionElement, b: &ConnectionElement) -> f32 {
    (b.border() - a.border()) * a.direction.sign()
}
