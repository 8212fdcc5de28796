use crate::error::ConfigError;
use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrowConfig {
    pub enabled: bool,
    pub size: f32,
    pub angle_degrees: f32,
}

impl Default for ArrowConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            size: 12.0,
            angle_degrees: 45.0,
        }
    }
}

/// Tunables of the routing engine. Every length is in scene units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Inset from a box corner that attachment points never enter.
    pub corner_offset: f32,
    /// Clearance kept between a route and the boxes it walks around.
    pub edge_distance_threshold: f32,
    /// Shortest cross run accepted when sliding parallel attachments apart.
    pub min_run_length: f32,
    pub stroke_thickness: f32,
    pub corner_radius: f32,
    pub samples_per_unit: f32,
    /// View scale of the host; the largest component drives arc sampling density.
    pub render_scale: [f32; 3],
    pub arrow: ArrowConfig,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            corner_offset: 8.0,
            edge_distance_threshold: 20.0,
            min_run_length: 20.0,
            stroke_thickness: 2.0,
            corner_radius: 8.0,
            samples_per_unit: 0.5,
            render_scale: [1.0, 1.0, 1.0],
            arrow: ArrowConfig::default(),
        }
    }
}

impl RouterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lengths = [
            ("cornerOffset", self.corner_offset),
            ("edgeDistanceThreshold", self.edge_distance_threshold),
            ("minRunLength", self.min_run_length),
            ("strokeThickness", self.stroke_thickness),
            ("cornerRadius", self.corner_radius),
            ("samplesPerUnit", self.samples_per_unit),
            ("arrow.size", self.arrow.size),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidLength { field, value });
            }
        }
        for (index, value) in self.render_scale.iter().copied().enumerate() {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidScale { index, value });
            }
        }
        let angle = self.arrow.angle_degrees;
        if !(angle > 0.0 && angle < 180.0) {
            return Err(ConfigError::InvalidArrowAngle(angle));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    pub padding: f32,
    pub min_width: f32,
    pub min_height: f32,
    pub draw_label_borders: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            padding: 24.0,
            min_width: 200.0,
            min_height: 200.0,
            draw_label_borders: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub theme: Theme,
    pub router: RouterConfig,
    pub render: RenderConfig,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ArrowConfigFile {
    enabled: Option<bool>,
    size: Option<f32>,
    angle: Option<f32>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RouterConfigFile {
    corner_offset: Option<f32>,
    edge_distance_threshold: Option<f32>,
    min_run_length: Option<f32>,
    stroke_thickness: Option<f32>,
    corner_radius: Option<f32>,
    samples_per_unit: Option<f32>,
    render_scale: Option<[f32; 3]>,
    arrow: Option<ArrowConfigFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    node_fill: Option<String>,
    node_border: Option<String>,
    node_text: Option<String>,
    label_fill: Option<String>,
    label_border: Option<String>,
    line_color: Option<String>,
    background: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct RenderConfigFile {
    padding: Option<f32>,
    min_width: Option<f32>,
    min_height: Option<f32>,
    draw_label_borders: Option<bool>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    router: Option<RouterConfigFile>,
    render: Option<RenderConfigFile>,
}

/// Loads defaults, then overlays the optional camelCase JSON file on top.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };

    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Overlays a camelCase JSON config document on the defaults and validates the result.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = serde_json::from_str(contents)?;
    apply_config_file(&mut config, parsed);
    config.router.validate()?;
    Ok(config)
}

fn apply_config_file(config: &mut Config, parsed: ConfigFile) {
    match parsed.theme.as_deref() {
        Some("classic") | Some("default") => config.theme = Theme::classic(),
        Some("modern") => config.theme = Theme::modern(),
        _ => {}
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.node_fill {
            config.theme.node_fill = v;
        }
        if let Some(v) = vars.node_border {
            config.theme.node_border = v;
        }
        if let Some(v) = vars.node_text {
            config.theme.node_text = v;
        }
        if let Some(v) = vars.label_fill {
            config.theme.label_fill = v;
        }
        if let Some(v) = vars.label_border {
            config.theme.label_border = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }

    if let Some(router) = parsed.router {
        let target = &mut config.router;
        if let Some(v) = router.corner_offset {
            target.corner_offset = v;
        }
        if let Some(v) = router.edge_distance_threshold {
            target.edge_distance_threshold = v;
        }
        if let Some(v) = router.min_run_length {
            target.min_run_length = v;
        }
        if let Some(v) = router.stroke_thickness {
            target.stroke_thickness = v;
        }
        if let Some(v) = router.corner_radius {
            target.corner_radius = v;
        }
        if let Some(v) = router.samples_per_unit {
            target.samples_per_unit = v;
        }
        if let Some(v) = router.render_scale {
            target.render_scale = v;
        }
        if let Some(arrow) = router.arrow {
            if let Some(v) = arrow.enabled {
                target.arrow.enabled = v;
            }
            if let Some(v) = arrow.size {
                target.arrow.size = v;
            }
            if let Some(v) = arrow.angle {
                target.arrow.angle_degrees = v;
            }
        }
    }

    if let Some(render) = parsed.render {
        if let Some(v) = render.padding {
            config.render.padding = v;
        }
        if let Some(v) = render.min_width {
            config.render.min_width = v;
        }
        if let Some(v) = render.min_height {
            config.render.min_height = v;
        }
        if let Some(v) = render.draw_label_borders {
            config.render.draw_label_borders = v;
        }
    }
}
