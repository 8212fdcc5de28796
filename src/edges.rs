use std::collections::BTreeMap;
use std::rc::Rc;

use crate::config::RouterConfig;
use crate::geometry::{segment_bounds, Bounds, Point};
use crate::routing::{EdgeRouter, RouteInput, RoutedEdge};

/// Host-assigned identifier of an edge.
pub type EdgeId = u64;

/// Every tracked edge with its own router.
///
/// Each entry owns its stabilizer state and cache; nothing is shared between edges.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    config: RouterConfig,
    routers: BTreeMap<EdgeId, EdgeRouter>,
}

impl EdgeSet {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            routers: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: RouterConfig) {
        for router in self.routers.values_mut() {
            router.set_config(config.clone());
        }
        self.config = config;
    }

    /// Routes edge `id`, creating its router on first use.
    pub fn update(&mut self, id: EdgeId, input: RouteInput) -> Rc<RoutedEdge> {
        let config = &self.config;
        self.routers
            .entry(id)
            .or_insert_with(|| EdgeRouter::new(config.clone()))
            .route(input)
    }

    pub fn remove(&mut self, id: EdgeId) -> bool {
        self.routers.remove(&id).is_some()
    }

    pub fn get(&self, id: EdgeId) -> Option<&Rc<RoutedEdge>> {
        self.routers.get(&id).and_then(EdgeRouter::current)
    }

    pub fn router(&self, id: EdgeId) -> Option<&EdgeRouter> {
        self.routers.get(&id)
    }

    pub fn len(&self) -> usize {
        self.routers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routers.is_empty()
    }

    /// Routed edges in id order.
    pub fn iter(&self) -> impl Iterator<Item = (EdgeId, &Rc<RoutedEdge>)> {
        self.routers
            .iter()
            .filter_map(|(id, router)| router.current().map(|routed| (*id, routed)))
    }

    /// True when `point` lies on the thickened stroke of any routed edge.
    pub fn contains(&self, point: Point, extra_thickness: f32) -> bool {
        self.hit(point, extra_thickness).is_some()
    }

    /// First edge, in id order, whose stroke (grown by `extra_thickness`) covers `point`.
    pub fn hit(&self, point: Point, extra_thickness: f32) -> Option<EdgeId> {
        let pad = (self.config.stroke_thickness + extra_thickness) * 0.5;
        self.iter()
            .find(|(_, routed)| stroke_contains(routed, point, pad))
            .map(|(id, _)| id)
    }

    /// Union of all routed bounds, for fit-to-view.
    pub fn bounds(&self) -> Option<Bounds> {
        self.iter()
            .map(|(_, routed)| routed.bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

fn stroke_contains(routed: &RoutedEdge, point: Point, pad: f32) -> bool {
    routed.legs().any(|leg| {
        leg.windows(2)
            .any(|pair| segment_bounds(pair[0], pair[1], pad).contains(point))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(cx: f32, cy: f32, w: f32, h: f32) -> Bounds {
        Bounds::from_center_size(Point::new(cx, cy), Point::new(w, h))
    }

    fn straight_pair() -> RouteInput {
        RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 0.0, 100.0, 40.0))
    }

    #[test]
    fn hit_uses_stroke_plus_extra_thickness() {
        let mut edges = EdgeSet::default();
        edges.update(7, straight_pair());
        assert!(edges.contains(Point::new(150.0, 0.0), 0.0));
        assert!(edges.contains(Point::new(150.0, 0.9), 0.0));
        assert!(!edges.contains(Point::new(150.0, 3.0), 0.0));
        assert!(edges.contains(Point::new(150.0, 3.0), 4.0));
        assert_eq!(edges.hit(Point::new(150.0, 0.0), 0.0), Some(7));
    }

    #[test]
    fn hit_reports_first_edge_in_id_order() {
        let mut edges = EdgeSet::default();
        edges.update(9, straight_pair());
        edges.update(3, straight_pair());
        assert_eq!(edges.hit(Point::new(100.0, 0.0), 0.0), Some(3));
        assert!(edges.remove(3));
        assert_eq!(edges.hit(Point::new(100.0, 0.0), 0.0), Some(9));
    }

    #[test]
    fn edges_keep_separate_state() {
        let mut edges = EdgeSet::default();
        edges.update(1, straight_pair());
        edges.update(2, RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 200.0, 100.0, 40.0)));
        let first = edges.router(1).and_then(EdgeRouter::stabilizer_state);
        let second = edges.router(2).and_then(EdgeRouter::stabilizer_state);
        assert_ne!(first, second);
        edges.update(1, straight_pair());
        assert_eq!(edges.router(1).map(EdgeRouter::rebuilds), Some(1));
        assert_eq!(edges.router(2).map(EdgeRouter::rebuilds), Some(1));
    }

    #[test]
    fn bounds_cover_every_edge() {
        let mut edges = EdgeSet::default();
        assert!(edges.bounds().is_none());
        edges.update(1, straight_pair());
        edges.update(2, RouteInput::new(rect(0.0, 0.0, 100.0, 40.0), rect(300.0, 200.0, 100.0, 40.0)));
        let bounds = edges.bounds().unwrap();
        assert!(bounds.contains(Point::new(60.0, 0.0)));
        assert!(bounds.contains(Point::new(258.0, 170.0)));
        assert!(!bounds.contains(Point::new(258.0, 200.0)));
    }

    #[test]
    fn empty_set_hits_nothing() {
        let edges = EdgeSet::new(RouterConfig::default());
        assert!(edges.is_empty());
        assert!(!edges.contains(Point::ZERO, 100.0));
    }
}
