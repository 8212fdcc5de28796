//! JSON/JSON5 scene description: node boxes plus the edges routed between them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::RouterConfig;
use crate::edges::{EdgeId, EdgeSet};
use crate::error::SceneError;
use crate::geometry::{Bounds, Point};
use crate::routing::RouteInput;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub edges: Vec<SceneEdge>,
}

/// Node box given by its center and size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl SceneNode {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center_size(Point::new(self.x, self.y), Point::new(self.width, self.height))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneEdge {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Free endpoint, e.g. the pointer while an edge is being dragged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_point: Option<[f32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<SceneLabel>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLabel {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl SceneLabel {
    pub fn bounds(&self) -> Bounds {
        Bounds::from_center_size(Point::new(self.x, self.y), Point::new(self.width, self.height))
    }
}

/// Parses strict JSON first and falls back to JSON5 (comments, trailing commas).
pub fn parse_scene(input: &str) -> Result<Scene, SceneError> {
    match serde_json::from_str(input) {
        Ok(scene) => Ok(scene),
        Err(json_err) => json5::from_str(input).map_err(|json5_err| {
            tracing::debug!(%json_err, "strict JSON parse failed, JSON5 fallback failed too");
            SceneError::Parse(json5_err.to_string())
        }),
    }
}

fn check_size(id: &str, width: f32, height: f32) -> Result<(), SceneError> {
    let valid = |v: f32| v.is_finite() && v >= 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(SceneError::InvalidSize {
            id: id.to_string(),
            width,
            height,
        })
    }
}

fn check_position(id: &str, x: f32, y: f32) -> Result<(), SceneError> {
    if x.is_finite() && y.is_finite() {
        Ok(())
    } else {
        Err(SceneError::NonFinitePosition { id: id.to_string(), x, y })
    }
}

impl Scene {
    /// Validates the scene and turns every edge into router input, keyed by edge index.
    pub fn resolve(&self) -> Result<Vec<(EdgeId, RouteInput)>, SceneError> {
        let mut boxes: HashMap<&str, Bounds> = HashMap::new();
        for node in &self.nodes {
            check_position(&node.id, node.x, node.y)?;
            check_size(&node.id, node.width, node.height)?;
            if boxes.insert(node.id.as_str(), node.bounds()).is_some() {
                return Err(SceneError::DuplicateNode(node.id.clone()));
            }
        }

        let lookup = |edge: usize, id: &str| {
            boxes.get(id).copied().ok_or_else(|| SceneError::UnknownNode {
                edge,
                node: id.to_string(),
            })
        };

        let mut resolved = Vec::with_capacity(self.edges.len());
        for (idx, edge) in self.edges.iter().enumerate() {
            let source = lookup(idx, &edge.from)?;
            let target = match (&edge.to, edge.to_point) {
                (Some(to), _) => lookup(idx, to)?,
                (None, Some([x, y])) => {
                    check_position(&format!("edge {idx} target"), x, y)?;
                    Bounds::point(Point::new(x, y))
                }
                (None, None) => return Err(SceneError::MissingTarget(idx)),
            };
            let mut input = RouteInput::new(source, target);
            if let Some(label) = &edge.label {
                let id = format!("edge {idx} label");
                check_position(&id, label.x, label.y)?;
                check_size(&id, label.width, label.height)?;
                input = input.with_label(label.bounds());
            }
            resolved.push((idx as EdgeId, input));
        }
        Ok(resolved)
    }

    /// Bounds of every node and edge label.
    pub fn element_bounds(&self) -> Option<Bounds> {
        self.nodes
            .iter()
            .map(SceneNode::bounds)
            .chain(self.edges.iter().filter_map(|e| e.label.as_ref().map(SceneLabel::bounds)))
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Routed edges of a scene, kept alive so later frames reuse per-edge state.
#[derive(Debug, Clone, Default)]
pub struct RoutedScene {
    pub edges: EdgeSet,
}

impl RoutedScene {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            edges: EdgeSet::new(config),
        }
    }

    /// Routes every edge of `scene` and drops edges the scene no longer has.
    pub fn update(&mut self, scene: &Scene) -> Result<(), SceneError> {
        let resolved = scene.resolve()?;
        let stale: Vec<EdgeId> = self
            .edges
            .iter()
            .map(|(id, _)| id)
            .filter(|id| *id as usize >= resolved.len())
            .collect();
        for id in stale {
            self.edges.remove(id);
        }
        for (id, input) in resolved {
            self.edges.update(id, input);
        }
        Ok(())
    }
}

/// Routes a scene from scratch.
pub fn route_scene(scene: &Scene, config: &RouterConfig) -> Result<RoutedScene, SceneError> {
    let mut routed = RoutedScene::new(config.clone());
    routed.update(scene)?;
    tracing::debug!(edges = routed.edges.len(), "scene routed");
    Ok(routed)
}
