use crate::edges::EdgeId;
use crate::geometry::{Bounds, Point};
use crate::routing::{Direction, RoutedEdge};
use crate::scene::{RoutedScene, Scene};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct RouteDump {
    pub bounds: Option<BoundsDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeDump {
    pub id: EdgeId,
    pub from: String,
    pub to: Option<String>,
    pub start: Direction,
    pub mid_enter: Option<Direction>,
    pub mid_exit: Option<Direction>,
    pub end: Direction,
    pub bends: usize,
    pub collision_free: bool,
    pub points: Vec<[f32; 2]>,
    pub label_points: Option<Vec<[f32; 2]>>,
    pub arrow: Option<[[f32; 2]; 3]>,
    pub borders: Option<[[[f32; 2]; 2]; 2]>,
    pub bounds: BoundsDump,
}

#[derive(Debug, Serialize)]
pub struct BoundsDump {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl From<Bounds> for BoundsDump {
    fn from(bounds: Bounds) -> Self {
        let min = bounds.min_point();
        let max = bounds.max_point();
        Self {
            x: min.x,
            y: min.y,
            width: max.x - min.x,
            height: max.y - min.y,
        }
    }
}

fn xy(p: Point) -> [f32; 2] {
    [p.x, p.y]
}

fn xy_all(points: &[Point]) -> Vec<[f32; 2]> {
    points.iter().copied().map(xy).collect()
}

impl EdgeDump {
    fn new(id: EdgeId, scene: &Scene, routed: &RoutedEdge) -> Self {
        let edge = scene.edges.get(id as usize);
        let has_label = routed.second_leg.is_some();
        let group = routed.directions;
        Self {
            id,
            from: edge.map(|e| e.from.clone()).unwrap_or_default(),
            to: edge.and_then(|e| e.to.clone()),
            start: group.start,
            mid_enter: has_label.then_some(group.mid_enter),
            mid_exit: has_label.then_some(group.mid_exit),
            end: group.end,
            bends: routed.bends,
            collision_free: routed.collision_free,
            points: xy_all(&routed.first_leg),
            label_points: routed.second_leg.as_deref().map(xy_all),
            arrow: routed.arrow.map(|a| a.map(xy)),
            borders: routed.borders.map(|caps| caps.map(|cap| cap.map(xy))),
            bounds: routed.bounds.into(),
        }
    }
}

impl RouteDump {
    pub fn from_routes(scene: &Scene, routed: &RoutedScene) -> Self {
        let edges = routed
            .edges
            .iter()
            .map(|(id, edge)| EdgeDump::new(id, scene, edge))
            .collect();
        Self {
            bounds: routed.edges.bounds().map(BoundsDump::from),
            edges,
        }
    }
}

pub fn write_route_dump(path: &Path, scene: &Scene, routed: &RoutedScene) -> anyhow::Result<()> {
    let dump = RouteDump::from_routes(scene, routed);
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RouterConfig;
    use crate::scene::{parse_scene, route_scene};

    #[test]
    fn dump_lists_edges_with_directions() {
        let scene = parse_scene(
            r#"{"nodes": [
                {"id": "a", "x": 0, "y": 0, "width": 100, "height": 40},
                {"id": "b", "x": 300, "y": 0, "width": 100, "height": 40}
            ], "edges": [{"from": "a", "to": "b"}]}"#,
        )
        .unwrap();
        let routed = route_scene(&scene, &RouterConfig::default()).unwrap();
        let dump = RouteDump::from_routes(&scene, &routed);
        let value = serde_json::to_value(&dump).unwrap();
        let edge = &value["edges"][0];
        assert_eq!(edge["from"], "a");
        assert_eq!(edge["start"], "right");
        assert_eq!(edge["end"], "left");
        assert!(edge["midEnter"].is_null());
        assert_eq!(edge["points"][0][0], 50.0);
        assert_eq!(edge["bends"], 0);
    }
}
