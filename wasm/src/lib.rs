use ortho_router::render::render_svg;
use ortho_router::route_dump::RouteDump;
use ortho_router::theme::Theme;
use ortho_router::{Config, parse_config, parse_scene, route_scene};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RouterOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    corner_radius: Option<f32>,
    stroke_thickness: Option<f32>,
}

fn build_config(options: RouterOptions) -> Config {
    let mut config = Config::default();
    if options.theme.as_deref() == Some("classic") {
        config.theme = Theme::classic();
    }
    if let Some(font_family) = options.font_family {
        config.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        config.theme.font_size = font_size;
    }
    if let Some(radius) = options.corner_radius {
        config.router.corner_radius = radius;
    }
    if let Some(thickness) = options.stroke_thickness {
        config.router.stroke_thickness = thickness;
    }
    config
}

fn js_error(error: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&error.to_string())
}

fn resolve_config(options_json: Option<String>) -> Result<Config, JsValue> {
    let Some(raw) = options_json else {
        return Ok(Config::default());
    };
    let options = serde_json::from_str::<RouterOptions>(&raw).map_err(js_error)?;
    let config = build_config(options);
    config.router.validate().map_err(js_error)?;
    Ok(config)
}

/// Routes a scene and returns the route dump as JSON.
#[wasm_bindgen]
pub fn route_scene_json(scene_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = resolve_config(options_json)?;
    let scene = parse_scene(scene_json).map_err(js_error)?;
    let routed = route_scene(&scene, &config.router).map_err(js_error)?;
    serde_json::to_string(&RouteDump::from_routes(&scene, &routed)).map_err(js_error)
}

#[wasm_bindgen]
pub fn render_scene_svg(scene_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let config = resolve_config(options_json)?;
    let scene = parse_scene(scene_json).map_err(js_error)?;
    let routed = route_scene(&scene, &config.router).map_err(js_error)?;
    Ok(render_svg(&scene, &routed, &config.theme, &config.render))
}

/// Same as `render_scene_svg` but takes a full config document (`configFile` format).
#[wasm_bindgen]
pub fn render_scene_svg_with_config(scene_json: &str, config_json: &str) -> Result<String, JsValue> {
    let config = parse_config(config_json).map_err(js_error)?;
    let scene = parse_scene(scene_json).map_err(js_error)?;
    let routed = route_scene(&scene, &config.router).map_err(js_error)?;
    Ok(render_svg(&scene, &routed, &config.theme, &config.render))
}

#[cfg(test)]
mod tests {
    use ortho_router::render::render_svg;
    use ortho_router::{parse_scene, route_scene};

    use crate::{RouterOptions, build_config};

    #[test]
    fn renders_scene_with_label_and_cursor_edge() {
        let scene = parse_scene(
            r#"{
                "nodes": [
                    {"id": "a", "x": 0, "y": 0, "width": 100, "height": 40},
                    {"id": "b", "x": 400, "y": 120, "width": 100, "height": 40}
                ],
                "edges": [
                    {"from": "a", "to": "b", "label": {"x": 200, "y": 60, "width": 40, "height": 20, "text": "yes"}},
                    {"from": "b", "toPoint": [600, 300]}
                ]
            }"#,
        )
        .expect("scene should parse");
        let config = build_config(RouterOptions::default());
        let routed = route_scene(&scene, &config.router).expect("scene should route");
        let svg = render_svg(&scene, &routed, &config.theme, &config.render);

        assert!(svg.contains("<svg"));
        assert!(svg.contains("yes"));
        assert_eq!(routed.edges.len(), 2);
    }

    #[test]
    fn options_override_theme_and_router() {
        let options: RouterOptions =
            serde_json::from_str(r#"{"theme": "classic", "cornerRadius": 3}"#).expect("options parse");
        let config = build_config(options);
        assert_eq!(config.router.corner_radius, 3.0);
        assert_eq!(config.theme.node_fill, ortho_router::theme::Theme::classic().node_fill);
    }
}
