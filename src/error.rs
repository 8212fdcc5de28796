use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidLength { field: &'static str, value: f32 },
    #[error("render scale component {index} must be finite and positive (got {value})")]
    InvalidScale { index: usize, value: f32 },
    #[error("arrow angle must lie in (0, 180) degrees (got {0})")]
    InvalidArrowAngle(f32),
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("failed to parse scene: {0}")]
    Parse(String),
    #[error("duplicate node id `{0}`")]
    DuplicateNode(String),
    #[error("edge {edge} references unknown node `{node}`")]
    UnknownNode { edge: usize, node: String },
    #[error("edge {0} needs either `to` or `toPoint`")]
    MissingTarget(usize),
    #[error("`{id}` has a non-finite position ({x}, {y})")]
    NonFinitePosition { id: String, x: f32, y: f32 },
    #[error("`{id}` has an invalid size {width}x{height}")]
    InvalidSize { id: String, width: f32, height: f32 },
}
