//! Rounded corners for orthogonal polylines.

use crate::geometry::{Point, EPSILON};

/// Replaces every clean right-angle vertex of `points` with circular-arc samples.
///
/// A vertex is rounded only when both adjacent segments have non-zero length and meet at
/// 90 degrees; everything else passes through unchanged. The arc radius is clamped to half
/// of the shorter adjacent segment so neighbouring arcs never overlap. Each arc is split
/// into `ceil(radius * max(render_scale) * samples_per_unit)` steps (at least one), and both
/// tangent points are always emitted.
pub fn round_corners(
    points: &[Point],
    radius: f32,
    samples_per_unit: f32,
    render_scale: [f32; 3],
) -> Vec<Point> {
    if points.len() < 3 || radius <= 0.0 {
        return points.to_vec();
    }
    let scale = render_scale.iter().copied().fold(0.0, f32::max);

    let mut out = Vec::with_capacity(points.len());
    out.push(points[0]);
    for i in 1..points.len() - 1 {
        let (prev, corner, next) = (points[i - 1], points[i], points[i + 1]);
        match corner_arc(prev, corner, next, radius, samples_per_unit * scale) {
            Some(arc) => out.extend(arc),
            None => out.push(corner),
        }
    }
    out.push(points[points.len() - 1]);
    out
}

fn corner_arc(
    prev: Point,
    corner: Point,
    next: Point,
    radius: f32,
    density: f32,
) -> Option<Vec<Point>> {
    let incoming = corner - prev;
    let outgoing = next - corner;
    let in_len = incoming.length();
    let out_len = outgoing.length();
    if in_len <= EPSILON || out_len <= EPSILON {
        return None;
    }
    let in_dir = incoming * (1.0 / in_len);
    let out_dir = outgoing * (1.0 / out_len);
    if in_dir.dot(out_dir).abs() >= EPSILON {
        return None;
    }

    let r = radius.min(in_len * 0.5).min(out_len * 0.5);
    let bisector = (out_dir - in_dir).normalized()?;
    let center = corner + bisector * (r * std::f32::consts::SQRT_2);
    let from = corner - in_dir * r - center;
    let to = corner + out_dir * r - center;

    // Signed sweep keeps the turn direction of the original corner.
    let sweep = from.cross(to).atan2(from.dot(to));
    let start = from.y.atan2(from.x);
    let steps = ((r * density).ceil().max(0.0) as usize).max(1);

    let arc = (0..=steps)
        .map(|k| {
            let angle = start + sweep * (k as f32 / steps as f32);
            center + Point::new(angle.cos(), angle.sin()) * r
        })
        .collect();
    Some(arc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    const UNIT: [f32; 3] = [1.0, 1.0, 1.0];

    #[test]
    fn straight_path_is_unchanged() {
        let path = vec![p(0.0, 0.0), p(50.0, 0.0), p(100.0, 0.0)];
        let rounded = round_corners(&path, 8.0, 1.0, UNIT);
        assert_eq!(rounded, path);
        assert_eq!(round_corners(&rounded, 8.0, 1.0, UNIT), rounded);
    }

    #[test]
    fn right_angle_becomes_arc_on_circle() {
        let path = vec![p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)];
        let rounded = round_corners(&path, 10.0, 1.0, UNIT);
        // 10 steps -> 11 arc samples, plus both endpoints.
        assert_eq!(rounded.len(), 13);
        assert!(rounded[1].approx_eq(p(90.0, 0.0)), "{:?}", rounded[1]);
        assert!(rounded[11].approx_eq(p(100.0, 10.0)), "{:?}", rounded[11]);
        let center = p(90.0, 10.0);
        for sample in &rounded[1..12] {
            assert!((sample.distance(center) - 10.0).abs() < 1e-3, "{sample:?} off the arc");
        }
    }

    #[test]
    fn radius_clamps_to_half_the_shorter_segment() {
        let path = vec![p(0.0, 0.0), p(6.0, 0.0), p(6.0, 100.0)];
        let rounded = round_corners(&path, 10.0, 1.0, UNIT);
        assert!(rounded[1].approx_eq(p(3.0, 0.0)), "{:?}", rounded[1]);
        let last_arc = rounded[rounded.len() - 2];
        assert!(last_arc.approx_eq(p(6.0, 3.0)), "{last_arc:?}");
    }

    #[test]
    fn turn_direction_is_preserved() {
        // Left turn and right turn from the same incoming segment bulge to opposite sides.
        let left = round_corners(&[p(0.0, 0.0), p(100.0, 0.0), p(100.0, -100.0)], 10.0, 1.0, UNIT);
        let right = round_corners(&[p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)], 10.0, 1.0, UNIT);
        let mid_left = left[left.len() / 2];
        let mid_right = right[right.len() / 2];
        assert!(mid_left.y < 0.0 && mid_right.y > 0.0, "{mid_left:?} {mid_right:?}");
        assert!(mid_left.x < 100.0 && mid_right.x < 100.0);
    }

    #[test]
    fn render_scale_raises_sample_count() {
        let path = vec![p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)];
        let coarse = round_corners(&path, 10.0, 0.5, UNIT);
        let fine = round_corners(&path, 10.0, 0.5, [1.0, 3.0, 1.0]);
        assert_eq!(coarse.len(), 2 + 6);
        assert_eq!(fine.len(), 2 + 16);
    }

    #[test]
    fn zero_density_still_chamfers() {
        let path = vec![p(0.0, 0.0), p(100.0, 0.0), p(100.0, 100.0)];
        let rounded = round_corners(&path, 10.0, 0.0, UNIT);
        assert_eq!(rounded.len(), 4);
    }

    #[test]
    fn degenerate_vertex_passes_through() {
        let path = vec![p(0.0, 0.0), p(0.0, 0.0), p(0.0, 50.0)];
        assert_eq!(round_corners(&path, 10.0, 1.0, UNIT), path);
    }
}
