pub mod arrow;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod corners;
pub mod edges;
pub mod error;
pub mod geometry;
pub mod render;
pub mod route_dump;
pub mod routing;
pub mod scene;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{load_config, parse_config, Config, RenderConfig, RouterConfig};
pub use edges::{EdgeId, EdgeSet};
pub use error::{ConfigError, SceneError};
pub use geometry::{Bounds, Point};
pub use routing::{route_once, EdgeRouter, RouteInput, RoutedEdge};
pub use scene::{parse_scene, route_scene, RoutedScene, Scene};
