use crate::geometry::Point;

/// Chevron at the end of `path`: `[left flank, tip, right flank]`.
///
/// The flanks are the reversed last segment, scaled to `size` and rotated by half of
/// `angle_degrees` each way. Trailing zero-length segments are skipped; `None` when the path
/// has fewer than two distinct points.
pub fn arrowhead(path: &[Point], size: f32, angle_degrees: f32) -> Option<[Point; 3]> {
    let (&tip, rest) = path.split_last()?;
    let back = rest
        .iter()
        .rev()
        .find_map(|&p| (p - tip).normalized())?;
    let dir = back * size;
    let half = (angle_degrees * 0.5).to_radians();
    Some([dir.rotate(-half) + tip, tip, dir.rotate(half) + tip])
}
