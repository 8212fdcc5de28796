use crate::geometry::{segment_bounds, Bounds, Point, EPSILON};

use super::builder::{bend_count, Path};
use super::direction::DirectionGroup;
use super::ranking::Candidate;

/// Built legs of one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltRoute {
    pub group: DirectionGroup,
    pub first_leg: Path,
    pub second_leg: Option<Path>,
    pub bends: usize,
}

impl BuiltRoute {
    pub fn new(group: DirectionGroup, first_leg: Path, second_leg: Option<Path>) -> Self {
        let bends = bend_count(&first_leg) + second_leg.as_deref().map(bend_count).unwrap_or(0);
        Self {
            group,
            first_leg,
            second_leg,
            bends,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub route: BuiltRoute,
    pub collision_free: bool,
}

fn segments(path: &[Point], pad: f32) -> impl Iterator<Item = Bounds> + '_ {
    path.windows(2)
        .map(move |pair| segment_bounds(pair[0], pair[1], pad))
}

/// True when the legs cross each other or run through an obstacle box.
///
/// Obstacles are shrunk by half the stroke so a leg may start and end on the border of
/// the box it attaches to. Point obstacles (cursors) never block.
pub fn route_collides(
    first_leg: &[Point],
    second_leg: Option<&[Point]>,
    obstacles: &[Bounds],
    thickness: f32,
) -> bool {
    let pad = thickness * 0.5;
    if let Some(second) = second_leg {
        for a in segments(first_leg, pad) {
            if segments(second, pad).any(|b| a.intersects(&b)) {
                return true;
            }
        }
    }

    let shrunk: Vec<Bounds> = obstacles
        .iter()
        .filter(|b| !b.is_point())
        .map(|b| b.inflate(-(pad + EPSILON)))
        .collect();
    let legs = std::iter::once(first_leg).chain(second_leg);
    for leg in legs {
        for segment in segments(leg, pad) {
            if shrunk.iter().any(|obstacle| segment.intersects(obstacle)) {
                return true;
            }
        }
    }
    false
}

/// Walks the ranked candidates and picks the route to publish.
///
/// The first collision-free candidate becomes the fallback. Scanning continues only to find
/// a later collision-free candidate with strictly fewer bends, which is returned at once.
/// When no candidate is collision-free the best-ranked one is returned anyway.
pub fn select_candidate<F, C>(ranked: &[Candidate], mut build: F, collides: C) -> Option<Selection>
where
    F: FnMut(DirectionGroup) -> BuiltRoute,
    C: Fn(&BuiltRoute) -> bool,
{
    let first = ranked.first()?;
    let mut best_ranked: Option<BuiltRoute> = None;
    let mut fallback: Option<BuiltRoute> = None;

    for candidate in ranked {
        let route = build(candidate.group);
        if best_ranked.is_none() {
            best_ranked = Some(route.clone());
        }
        if collides(&route) {
            continue;
        }
        match &fallback {
            None => {
                if route.bends == 0 {
                    return Some(Selection {
                        route,
                        collision_free: true,
                    });
                }
                fallback = Some(route);
            }
            Some(current) if route.bends < current.bends => {
                return Some(Selection {
                    route,
                    collision_free: true,
                });
            }
            Some(_) => {}
        }
    }

    if let Some(route) = fallback {
        return Some(Selection {
            route,
            collision_free: true,
        });
    }
    tracing::debug!(group = ?first.group, "no collision-free candidate, using best-ranked");
    best_ranked.map(|route| Selection {
        route,
        collision_free: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::direction::{Direction, DIRECTION_TABLE};

    fn rect(cx: f32, cy: f32, w: f32, h: f32) -> Bounds {
        Bounds::from_center_size(Point::new(cx, cy), Point::new(w, h))
    }

    fn p(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn leg_may_touch_its_own_box() {
        let source = rect(0.0, 0.0, 100.0, 40.0);
        let target = rect(300.0, 0.0, 100.0, 40.0);
        let leg = vec![p(50.0, 0.0), p(250.0, 0.0)];
        assert!(!route_collides(&leg, None, &[source, target], 2.0));
    }

    #[test]
    fn leg_through_box_collides() {
        let source = rect(0.0, 0.0, 100.0, 40.0);
        let target = rect(300.0, 0.0, 100.0, 40.0);
        let leg = vec![p(-50.0, 0.0), p(250.0, 0.0)];
        assert!(route_collides(&leg, None, &[source, target], 2.0));
    }

    #[test]
    fn crossing_legs_collide() {
        let first = vec![p(0.0, 0.0), p(100.0, 0.0)];
        let second = vec![p(50.0, -50.0), p(50.0, 50.0)];
        assert!(route_collides(&first, Some(&second), &[], 2.0));
        let apart = vec![p(50.0, 10.0), p(50.0, 50.0)];
        assert!(!route_collides(&first, Some(&apart), &[], 2.0));
    }

    #[test]
    fn cursor_obstacle_never_blocks() {
        let leg = vec![p(0.0, 0.0), p(100.0, 0.0)];
        let cursor = Bounds::point(p(50.0, 0.0));
        assert!(!route_collides(&leg, None, &[cursor], 2.0));
    }

    fn candidates(groups: &[DirectionGroup]) -> Vec<Candidate> {
        groups.iter().map(|&group| Candidate { group, cost: 0 }).collect()
    }

    fn fake_route(group: DirectionGroup, bends: usize) -> BuiltRoute {
        BuiltRoute {
            group,
            first_leg: Vec::new(),
            second_leg: None,
            bends,
        }
    }

    #[test]
    fn later_candidate_with_fewer_bends_wins() {
        let groups = [DIRECTION_TABLE[0], DIRECTION_TABLE[1], DIRECTION_TABLE[2], DIRECTION_TABLE[3]];
        let bends = [3, 2, 1, 0];
        let selection = select_candidate(
            &candidates(&groups),
            |g| {
                let idx = groups.iter().position(|x| *x == g).unwrap();
                fake_route(g, bends[idx])
            },
            |r| r.group == groups[0],
        )
        .unwrap();
        // groups[1] becomes the fallback, groups[2] is the first strict improvement.
        assert_eq!(selection.route.group, groups[2]);
        assert!(selection.collision_free);
    }

    #[test]
    fn fallback_kept_without_improvement() {
        let groups = [DIRECTION_TABLE[0], DIRECTION_TABLE[1], DIRECTION_TABLE[2]];
        let selection = select_candidate(&candidates(&groups), |g| fake_route(g, 2), |_| false).unwrap();
        assert_eq!(selection.route.group, groups[0]);
    }

    #[test]
    fn everything_colliding_returns_best_ranked() {
        let groups = [DIRECTION_TABLE[5], DIRECTION_TABLE[9]];
        let selection = select_candidate(&candidates(&groups), |g| fake_route(g, 1), |_| true).unwrap();
        assert_eq!(selection.route.group, groups[0]);
        assert!(!selection.collision_free);
    }

    #[test]
    fn empty_ranking_selects_nothing() {
        assert!(select_candidate(&[], |g| fake_route(g, 0), |_| false).is_none());
    }

    #[test]
    fn bends_sum_both_legs() {
        let group = DirectionGroup::new(Direction::Right, Direction::Left, Direction::Left);
        let route = BuiltRoute::new(
            group,
            vec![p(0.0, 0.0), p(10.0, 0.0), p(10.0, 10.0)],
            Some(vec![p(20.0, 10.0), p(30.0, 10.0), p(30.0, 20.0), p(40.0, 20.0)]),
        );
        assert_eq!(route.bends, 3);
    }
}
