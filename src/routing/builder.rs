use crate::config::RouterConfig;
use crate::geometry::{Bounds, Point, EPSILON};

use super::element::{areas_intersect, is_perpendicular, is_same_direction, ConnectionElement};
use super::estimate::{facing_gap, has_room_beside};

// ── Attachment sliding ──────────────────────────────────────────────
/// Bisection stops once the separation bracket is this narrow (scene units).
pub const BISECT_EPSILON: f32 = 1e-2;
/// Hard cap on bisection halvings; 32 halvings of [0, 1] are far below f32 precision.
pub const BISECT_MAX_ITERATIONS: usize = 32;

pub type Path = Vec<Point>;

/// Builds the orthogonal leg from `a` to `b`.
///
/// The first point lies on `a`'s facing side, the last on `b`'s. Which of the three
/// geometric cases applies is decided by the dot product of the two directions alone.
pub fn build_path(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    config: &RouterConfig,
) -> Path {
    let threshold = config.edge_distance_threshold;
    let dot = a.direction.dot(b.direction);
    if is_perpendicular(dot) {
        if areas_intersect(a, b, common, threshold) {
            perpendicular_elbow(a, b, threshold)
        } else {
            perpendicular_detour(a, b, common, threshold)
        }
    } else if is_same_direction(dot) {
        if has_room_beside(a, b, common) {
            parallel_side_by_side(a, b, common, config)
        } else {
            parallel_u_turn(a, b, common, threshold)
        }
    } else if areas_intersect(a, b, common, threshold) {
        opposite_straight(a, b)
    } else {
        opposite_dogleg(a, b)
    }
}

/// Number of interior vertices where the route changes direction.
pub fn bend_count(path: &[Point]) -> usize {
    let mut bends = 0;
    let mut previous: Option<Point> = None;
    for pair in path.windows(2) {
        let Some(dir) = (pair[1] - pair[0]).normalized() else {
            continue;
        };
        if let Some(prev) = previous {
            if prev.dot(dir) < 1.0 - EPSILON {
                bends += 1;
            }
        }
        previous = Some(dir);
    }
    bends
}

// ── Perpendicular ───────────────────────────────────────────────────

/// One bend: leave `a`, turn once, enter `b`.
fn perpendicular_elbow(a: &ConnectionElement, b: &ConnectionElement, threshold: f32) -> Path {
    let a_sub = a.clamp_sub(keep_outside(a.preferred_sub(b), b, threshold));
    let b_sub = b.clamp_sub(keep_outside(b.preferred_sub(a), a, threshold));
    vec![
        a.attach_point(a_sub),
        Point::on_axes(a.main_axis(), b_sub, a_sub),
        b.attach_point(b_sub),
    ]
}

/// Pushes a coordinate on `other`'s main axis at least `threshold` beyond `other`'s border.
fn keep_outside(value: f32, other: &ConnectionElement, threshold: f32) -> f32 {
    let limit = other.border() + other.direction.sign() * threshold;
    if other.direction.sign() > 0.0 {
        value.max(limit)
    } else {
        value.min(limit)
    }
}

/// Three bends around the far edges of the shared bounds.
fn perpendicular_detour(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    threshold: f32,
) -> Path {
    let a_sub = a.preferred_sub(b);
    let b_sub = b.preferred_sub(a);
    let a_out = a.far_edge(common, threshold);
    let b_out = b.far_edge(common, threshold);
    vec![
        a.attach_point(a_sub),
        Point::on_axes(a.main_axis(), a_out, a_sub),
        Point::on_axes(a.main_axis(), a_out, b_out),
        Point::on_axes(b.main_axis(), b_out, b_sub),
        b.attach_point(b_sub),
    ]
}

// ── Same direction ──────────────────────────────────────────────────

/// Both legs run out past the shared bounds and meet on one cross run.
fn parallel_side_by_side(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    config: &RouterConfig,
) -> Path {
    let (a_sub, b_sub) = slide_apart(a, b, config.min_run_length);
    let out = a.far_edge(common, config.edge_distance_threshold);
    let axis = a.main_axis();
    vec![
        a.attach_point(a_sub),
        Point::on_axes(axis, out, a_sub),
        Point::on_axes(axis, out, b_sub),
        b.attach_point(b_sub),
    ]
}

/// Slides both attachments toward the far ends of their movable ranges until the cross
/// run between them is at least `min_run`.
///
/// `t` moves both points linearly from their preferred coordinates (`t = 0`) to the range
/// ends facing away from each other (`t = 1`); the separation is monotone in `t`, so the
/// smallest adequate `t` is found by bisection. The loop ends when the separation bracket
/// shrinks below [`BISECT_EPSILON`] or after [`BISECT_MAX_ITERATIONS`] halvings.
fn slide_apart(a: &ConnectionElement, b: &ConnectionElement, min_run: f32) -> (f32, f32) {
    let sub = a.sub_axis();
    let side = if b.bounds.center_on(sub) >= a.bounds.center_on(sub) {
        1.0
    } else {
        -1.0
    };
    let (a_lo, a_hi) = a.movable_range();
    let (b_lo, b_hi) = b.movable_range();
    let a_from = a.preferred_sub(b);
    let b_from = b.preferred_sub(a);
    let a_to = if side > 0.0 { a_lo } else { a_hi };
    let b_to = if side > 0.0 { b_hi } else { b_lo };

    let at = |t: f32| (a_from + (a_to - a_from) * t, b_from + (b_to - b_from) * t);
    let separation = |t: f32| {
        let (a_sub, b_sub) = at(t);
        (b_sub - a_sub) * side
    };

    if separation(0.0) >= min_run {
        return at(0.0);
    }
    if separation(1.0) < min_run {
        return at(1.0);
    }

    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    let mut iterations = 0;
    while separation(hi) - separation(lo) > BISECT_EPSILON && iterations < BISECT_MAX_ITERATIONS {
        let mid = (lo + hi) * 0.5;
        if separation(mid) >= min_run {
            hi = mid;
        } else {
            lo = mid;
        }
        iterations += 1;
    }
    at(hi)
}

/// Six points: out of the back element into the gap, sideways past the shared bounds,
/// beyond the front element, and back into it.
fn parallel_u_turn(
    a: &ConnectionElement,
    b: &ConnectionElement,
    common: &Bounds,
    threshold: f32,
) -> Path {
    let axis = a.main_axis();
    let sub = a.sub_axis();
    let sign = a.direction.sign();
    let a_front = (a.border() - b.border()) * sign >= 0.0;
    let (front, back) = if a_front { (a, b) } else { (b, a) };

    // Rear face of the front box, i.e. the side pointing back toward `back`.
    let front_rear = front.bounds.center_on(axis) - sign * front.bounds.half.get(axis);
    let gap = (front_rear - back.border()) * sign;
    let gap_main = if gap > 0.0 {
        (front_rear + back.border()) * 0.5
    } else {
        back.border() + sign * threshold
    };
    let front_out = front.far_edge(common, threshold);

    let grown = common.inflate(threshold);
    let side = if b.bounds.center_on(sub) >= a.bounds.center_on(sub) {
        grown.max(sub)
    } else {
        grown.min(sub)
    };

    let a_sub = a.preferred_sub(b);
    let b_sub = b.preferred_sub(a);
    let (a_main, b_main) = if a_front {
        (front_out, gap_main)
    } else {
        (gap_main, front_out)
    };
    vec![
        a.attach_point(a_sub),
        Point::on_axes(axis, a_main, a_sub),
        Point::on_axes(axis, a_main, side),
        Point::on_axes(axis, b_main, side),
        Point::on_axes(axis, b_main, b_sub),
        b.attach_point(b_sub),
    ]
}

// ── Opposite ────────────────────────────────────────────────────────

fn opposite_straight(a: &ConnectionElement, b: &ConnectionElement) -> Path {
    let (a_lo, a_hi) = a.movable_range();
    let (b_lo, b_hi) = b.movable_range();
    let lo = a_lo.max(b_lo);
    let hi = a_hi.min(b_hi);
    let sub = (lo + hi) * 0.5;
    vec![a.attach_point(sub), b.attach_point(sub)]
}

/// Two bends through the main-axis midpoint between the borders.
fn opposite_dogleg(a: &ConnectionElement, b: &ConnectionElement) -> Path {
    let axis = a.main_axis();
    let a_sub = a.preferred_sub(b);
    let b_sub = b.preferred_sub(a);
    let mid = (a.border() + b.border()) * 0.5;
    if facing_gap(a, b) <= 0.0 {
        tracing::trace!(gap = facing_gap(a, b), "opposite leg routed through overlapping borders");
    }
    vec![
        a.attach_point(a_sub),
        Point::on_axes(axis, mid, a_sub),
        Point::on_axes(axis, mid, b_sub),
        b.attach_point(b_sub),
    ]
}
