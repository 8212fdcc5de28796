//! Orthogonal routing between a source box, an optional label box and a target box.
//!
//! The pipeline per recomputation is: rank all 64 direction groups by estimated bends,
//! build candidates in ranked order until the collision filter is satisfied, let the
//! stabilizer prefer last frame's group, then round corners and derive the arrowhead.

mod builder;
mod collision;
mod direction;
mod element;
mod estimate;
mod ranking;

pub use builder::{bend_count, build_path, Path, BISECT_EPSILON, BISECT_MAX_ITERATIONS};
pub use collision::{route_collides, select_candidate, BuiltRoute, Selection};
pub use direction::{Direction, DirectionGroup, DIRECTIONS, DIRECTION_TABLE};
pub use element::{areas_intersect, ConnectionElement};
pub use estimate::estimate_bends;
pub use ranking::{rank_candidates, Candidate};

use ranking::Attachments;
use std::collections::HashSet;
use std::rc::Rc;

use crate::arrow::arrowhead;
use crate::config::RouterConfig;
use crate::corners::round_corners;
use crate::geometry::{Bounds, Point};

/// Boxes one edge is routed between, all in the same coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteInput {
    pub source: Bounds,
    pub label: Option<Bounds>,
    pub target: Bounds,
}

impl RouteInput {
    pub fn new(source: Bounds, target: Bounds) -> Self {
        Self {
            source,
            label: None,
            target,
        }
    }

    pub fn with_label(mut self, label: Bounds) -> Self {
        self.label = Some(label);
        self
    }

    fn obstacles(&self) -> Vec<Bounds> {
        let mut boxes = vec![self.source, self.target];
        boxes.extend(self.label);
        boxes
    }
}

/// Published geometry of one routed edge.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutedEdge {
    pub directions: DirectionGroup,
    /// Rounded polyline from the source (to the label when there is one).
    pub first_leg: Path,
    /// Rounded polyline from the label to the target.
    pub second_leg: Option<Path>,
    pub raw_first_leg: Path,
    pub raw_second_leg: Option<Path>,
    pub arrow: Option<[Point; 3]>,
    /// Caps along the label sides the legs attach to, `mid_enter` side first.
    pub borders: Option<[[Point; 2]; 2]>,
    pub bounds: Bounds,
    pub bends: usize,
    pub collision_free: bool,
}

impl RoutedEdge {
    /// Published polylines in drawing order.
    pub fn legs(&self) -> impl Iterator<Item = &[Point]> {
        std::iter::once(self.first_leg.as_slice()).chain(self.second_leg.as_deref())
    }
}

/// Full side of `label` facing `direction`.
pub fn label_border(label: &Bounds, direction: Direction) -> [Point; 2] {
    let element = ConnectionElement::new(*label, direction, 0.0);
    let sub = element.sub_axis();
    [
        element.attach_point(label.min(sub)),
        element.attach_point(label.max(sub)),
    ]
}

pub fn label_borders(label: &Bounds, group: DirectionGroup) -> [[Point; 2]; 2] {
    [
        label_border(label, group.mid_enter),
        label_border(label, group.mid_exit),
    ]
}

/// Builds the legs of one direction group.
pub fn build_route(input: &RouteInput, group: DirectionGroup, config: &RouterConfig) -> BuiltRoute {
    let elements = Attachments::new(
        group,
        &input.source,
        input.label.as_ref(),
        &input.target,
        config.corner_offset,
    );
    match (input.label, elements.label) {
        (Some(label), Some((enter, exit))) => {
            let first = build_path(&elements.source, &enter, &input.source.union(&label), config);
            let second = build_path(&exit, &elements.target, &label.union(&input.target), config);
            BuiltRoute::new(group, first, Some(second))
        }
        _ => {
            let common = input.source.union(&input.target);
            let first = build_path(&elements.source, &elements.target, &common, config);
            BuiltRoute::new(group, first, None)
        }
    }
}

/// Routing engine for a single edge.
///
/// Owns the stabilizer state (the last accepted direction group) and the memoised result
/// of the last call, so each edge keeps its own hysteresis.
#[derive(Debug, Clone)]
pub struct EdgeRouter {
    config: RouterConfig,
    previous: Option<DirectionGroup>,
    last_input: Option<RouteInput>,
    cached: Option<Rc<RoutedEdge>>,
    rebuilds: u64,
}

impl Default for EdgeRouter {
    fn default() -> Self {
        Self::new(RouterConfig::default())
    }
}

impl EdgeRouter {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            previous: None,
            last_input: None,
            cached: None,
            rebuilds: 0,
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Replaces the configuration; the next `route` call rebuilds.
    pub fn set_config(&mut self, config: RouterConfig) {
        if config != self.config {
            self.config = config;
            self.invalidate();
        }
    }

    /// Forgets the stabilizer state and the cached route.
    pub fn reset(&mut self) {
        self.previous = None;
        self.invalidate();
    }

    pub fn stabilizer_state(&self) -> Option<DirectionGroup> {
        self.previous
    }

    /// Restores a stabilizer state saved by the host, e.g. after reloading a graph.
    pub fn set_stabilizer_state(&mut self, state: Option<DirectionGroup>) {
        self.previous = state;
        self.invalidate();
    }

    /// Number of times a route was actually recomputed.
    pub fn rebuilds(&self) -> u64 {
        self.rebuilds
    }

    pub fn current(&self) -> Option<&Rc<RoutedEdge>> {
        self.cached.as_ref()
    }

    fn invalidate(&mut self) {
        self.last_input = None;
        self.cached = None;
    }

    /// Routes the edge, reusing the previous result when the boxes did not change.
    pub fn route(&mut self, input: RouteInput) -> Rc<RoutedEdge> {
        if let (Some(last), Some(cached)) = (&self.last_input, &self.cached) {
            if *last == input {
                tracing::trace!("route inputs unchanged, reusing cached route");
                return Rc::clone(cached);
            }
        }

        let selection = self.select(&input);
        let routed = Rc::new(self.publish(&input, selection));
        self.rebuilds += 1;
        self.last_input = Some(input);
        self.cached = Some(Rc::clone(&routed));
        routed
    }

    fn select(&mut self, input: &RouteInput) -> Selection {
        let config = &self.config;
        let obstacles = input.obstacles();
        let collides = |route: &BuiltRoute| {
            route_collides(
                &route.first_leg,
                route.second_leg.as_deref(),
                &obstacles,
                config.stroke_thickness,
            )
        };

        let ranked = rank_candidates(&input.source, input.label.as_ref(), &input.target, config);
        // Without a label the mid directions are irrelevant; evaluate each (start, end) once.
        let mut seen = HashSet::new();
        let ranked: Vec<Candidate> = ranked
            .into_iter()
            .filter(|c| input.label.is_some() || seen.insert((c.group.start, c.group.end)))
            .collect();
        let chosen = select_candidate(&ranked, |group| build_route(input, group, config), &collides)
            .unwrap_or_else(|| Selection {
                route: build_route(input, DIRECTION_TABLE[0], config),
                collision_free: false,
            });

        if let Some(previous) = self.previous {
            if previous != chosen.route.group {
                let kept = build_route(input, previous, config);
                if !collides(&kept) && kept.bends <= chosen.route.bends {
                    tracing::debug!(group = ?previous, bends = kept.bends, "stabilizer keeps previous route");
                    return Selection {
                        route: kept,
                        collision_free: true,
                    };
                }
            }
        }

        tracing::debug!(
            group = ?chosen.route.group,
            bends = chosen.route.bends,
            collision_free = chosen.collision_free,
            "route rebuilt"
        );
        self.previous = Some(chosen.route.group);
        chosen
    }

    fn publish(&self, input: &RouteInput, selection: Selection) -> RoutedEdge {
        let config = &self.config;
        let Selection {
            route,
            collision_free,
        } = selection;
        let round = |leg: &[Point]| {
            round_corners(
                leg,
                config.corner_radius,
                config.samples_per_unit,
                config.render_scale,
            )
        };

        let first_leg = round(&route.first_leg);
        let second_leg = route.second_leg.as_deref().map(round);
        let last_raw = route.second_leg.as_deref().unwrap_or(&route.first_leg);
        let arrow = if config.arrow.enabled {
            arrowhead(last_raw, config.arrow.size, config.arrow.angle_degrees)
        } else {
            None
        };
        let borders = input
            .label
            .map(|label| label_borders(&label, route.group));

        let published = first_leg
            .iter()
            .chain(second_leg.iter().flatten())
            .chain(arrow.iter().flatten())
            .chain(borders.iter().flatten().flatten())
            .copied();
        let bounds = Bounds::enclosing(published).unwrap_or_else(|| Bounds::point(input.source.center));

        RoutedEdge {
            directions: route.group,
            first_leg,
            second_leg,
            raw_first_leg: route.first_leg,
            raw_second_leg: route.second_leg,
            arrow,
            borders,
            bounds,
            bends: route.bends,
            collision_free,
        }
    }
}

/// Routes `input` once with a fresh router.
pub fn route_once(input: RouteInput, config: &RouterConfig) -> RoutedEdge {
    let routed = EdgeRouter::new(config.clone()).route(input);
    Rc::try_unwrap(routed).unwrap_or_else(|shared| (*shared).clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(cx: f32, cy: f32, w: f32, h: f32) -> Bounds {
        Bounds::from_center_size(Point::new(cx, cy), Point::new(w, h))
    }

    fn group(start: Direction, end: Direction) -> DirectionGroup {
        DirectionGroup::new(start, Direction::Up, end)
    }

    #[test]
    fn facing_boxes_route_straight() {
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 0.0, 100.0, 40.0));
        let routed = route_once(input, &RouterConfig::default());
        assert_eq!(routed.raw_first_leg, vec![Point::new(50.0, 0.0), Point::new(250.0, 0.0)]);
        assert_eq!(routed.first_leg, routed.raw_first_leg);
        assert_eq!(routed.bends, 0);
        assert!(routed.collision_free);
        assert!(routed.second_leg.is_none());
        assert!(routed.borders.is_none());
        let arrow = routed.arrow.expect("arrow enabled by default");
        assert_eq!(arrow[1], Point::new(250.0, 0.0));
        assert!(arrow[0].x < 250.0 && arrow[2].x < 250.0);
    }

    #[test]
    fn unchanged_bounds_reuse_cached_route() {
        let mut router = EdgeRouter::default();
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 200.0, 100.0, 40.0));
        let first = router.route(input);
        let second = router.route(input);
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(router.rebuilds(), 1);

        let moved = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(310.0, 200.0, 100.0, 40.0));
        let third = router.route(moved);
        assert!(!Rc::ptr_eq(&first, &third));
        assert_eq!(router.rebuilds(), 2);
    }

    #[test]
    fn config_change_invalidates_cache() {
        let mut router = EdgeRouter::default();
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 200.0, 100.0, 40.0));
        router.route(input);
        router.set_config(RouterConfig {
            corner_radius: 2.0,
            ..Default::default()
        });
        router.route(input);
        assert_eq!(router.rebuilds(), 2);
    }

    #[test]
    fn diagonal_target_gets_single_elbow() {
        let mut router = EdgeRouter::default();
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 30.0, 100.0, 40.0));
        let routed = router.route(input);
        assert_eq!(routed.directions.start, Direction::Right);
        assert_eq!(routed.directions.end, Direction::Up);
        assert_eq!(routed.bends, 1);
        assert_eq!(
            routed.raw_first_leg,
            vec![Point::new(50.0, -10.0), Point::new(258.0, -10.0), Point::new(258.0, 10.0)]
        );
        assert_eq!(router.stabilizer_state(), Some(routed.directions));
    }

    #[test]
    fn stabilizer_keeps_previous_group_while_still_valid() {
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 30.0, 100.0, 40.0));
        let previous = group(Direction::Down, Direction::Left);

        let mut router = EdgeRouter::default();
        router.set_stabilizer_state(Some(previous));
        let routed = router.route(input);
        // A fresh router prefers Right/Up, which ranks earlier with the same bend count.
        assert_eq!(routed.directions, previous);
        assert_eq!(routed.bends, 1);
        assert_eq!(
            routed.raw_first_leg,
            vec![Point::new(42.0, 20.0), Point::new(42.0, 40.0), Point::new(250.0, 40.0)]
        );

        let nudged = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.4, 30.3, 100.0, 40.0));
        let again = router.route(nudged);
        assert_eq!(again.directions, previous);
        assert_eq!(router.stabilizer_state(), Some(previous));

        let fresh = route_once(nudged, router.config());
        assert_eq!(fresh.directions.start, Direction::Right);
        assert_eq!(fresh.directions.end, Direction::Up);
    }

    #[test]
    fn stabilizer_drops_colliding_group() {
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 30.0, 100.0, 40.0));
        let mut router = EdgeRouter::default();
        router.set_stabilizer_state(Some(group(Direction::Left, Direction::Right)));
        let routed = router.route(input);
        assert_eq!(routed.directions.start, Direction::Right);
        assert_eq!(routed.directions.end, Direction::Up);
        assert_eq!(router.stabilizer_state(), Some(routed.directions));
    }

    #[test]
    fn nested_boxes_publish_best_ranked_colliding_route() {
        let source = rect(0.0, 0.0, 40.0, 20.0);
        let target = rect(0.0, 0.0, 200.0, 100.0);
        let input = RouteInput::new(source, target);
        let config = RouterConfig::default();
        let best = rank_candidates(&source, None, &target, &config)[0].group;
        let previous = DIRECTION_TABLE
            .iter()
            .copied()
            .find(|g| (g.start, g.end) != (best.start, best.end))
            .unwrap();

        let mut router = EdgeRouter::new(config);
        router.set_stabilizer_state(Some(previous));
        let routed = router.route(input);
        assert!(!routed.collision_free);
        assert_eq!(routed.directions, best);
        assert_ne!(routed.directions, previous);
        assert_eq!(router.stabilizer_state(), Some(best));
    }

    #[test]
    fn label_splits_route_into_two_legs() {
        let label = rect(200.0, 0.0, 40.0, 20.0);
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(400.0, 0.0, 100.0, 40.0))
            .with_label(label);
        let routed = route_once(input, &RouterConfig::default());
        assert_eq!(routed.raw_first_leg, vec![Point::new(50.0, 0.0), Point::new(180.0, 0.0)]);
        assert_eq!(
            routed.raw_second_leg,
            Some(vec![Point::new(220.0, 0.0), Point::new(350.0, 0.0)])
        );
        assert!(routed.collision_free);
        let borders = routed.borders.expect("label adds border caps");
        assert_eq!(borders[0], [Point::new(180.0, -10.0), Point::new(180.0, 10.0)]);
        assert_eq!(borders[1], [Point::new(220.0, -10.0), Point::new(220.0, 10.0)]);
        assert_eq!(routed.bounds.min(crate::geometry::Axis::X), 50.0);
        assert_eq!(routed.bounds.max(crate::geometry::Axis::X), 350.0);
        assert_eq!(routed.bounds.max(crate::geometry::Axis::Y), 10.0);
        assert_eq!(routed.arrow.map(|a| a[1]), Some(Point::new(350.0, 0.0)));
    }

    #[test]
    fn cursor_endpoint_follows_pointer() {
        let mut router = EdgeRouter::default();
        let source = rect(0.0, 0.0, 100.0, 40.0);
        let routed = router.route(RouteInput::new(source, Bounds::point(Point::new(200.0, 0.0))));
        assert_eq!(
            routed.raw_first_leg.last().copied(),
            Some(Point::new(200.0, 0.0))
        );
        let moved = router.route(RouteInput::new(source, Bounds::point(Point::new(200.0, 150.0))));
        assert_eq!(moved.raw_first_leg.last().copied(), Some(Point::new(200.0, 150.0)));
        assert!(moved.collision_free);
    }

    #[test]
    fn rounded_legs_keep_endpoints() {
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 200.0, 100.0, 40.0));
        let routed = route_once(input, &RouterConfig::default());
        assert!(routed.bends > 0);
        assert!(routed.first_leg.len() > routed.raw_first_leg.len());
        assert_eq!(routed.first_leg.first(), routed.raw_first_leg.first());
        assert_eq!(routed.first_leg.last(), routed.raw_first_leg.last());
        let bounds = routed.bounds.inflate(crate::geometry::EPSILON);
        for p in &routed.first_leg {
            assert!(bounds.contains(*p), "{p:?} outside {bounds:?}");
        }
    }

    #[test]
    fn disabled_arrow_is_omitted() {
        let mut config = RouterConfig::default();
        config.arrow.enabled = false;
        let input = RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 0.0, 100.0, 40.0));
        assert!(route_once(input, &config).arrow.is_none());
    }
}
