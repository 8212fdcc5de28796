use crate::config::RenderConfig;
use crate::geometry::{Axis, Bounds, Point};
use crate::routing::RoutedEdge;
use crate::scene::{RoutedScene, Scene};
use crate::theme::Theme;
use anyhow::Result;
use std::path::Path;

pub fn render_svg(scene: &Scene, routed: &RoutedScene, theme: &Theme, config: &RenderConfig) -> String {
    let mut svg = String::new();
    let view = view_box(scene, routed, config);
    let (min, max) = (view.min_point(), view.max_point());
    let width = max.x - min.x;
    let height = max.y - min.y;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"{:.2} {:.2} {width:.2} {height:.2}\">",
        min.x, min.y
    ));
    svg.push_str(&format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" fill=\"{}\"/>",
        min.x, min.y, theme.background
    ));

    for node in &scene.nodes {
        svg.push_str(&rect_svg(&node.bounds(), 6.0, &theme.node_fill, &theme.node_border));
        let text = node.label.as_deref().unwrap_or(&node.id);
        svg.push_str(&text_svg(Point::new(node.x, node.y), text, theme));
    }

    let stroke_width = routed.edges.config().stroke_thickness;
    for (id, edge) in routed.edges.iter() {
        svg.push_str(&edge_svg(edge, theme, stroke_width));
        let Some(label) = scene.edges.get(id as usize).and_then(|e| e.label.as_ref()) else {
            continue;
        };
        svg.push_str(&rect_svg(&label.bounds(), 4.0, &theme.label_fill, "none"));
        if let Some(text) = &label.text {
            svg.push_str(&text_svg(Point::new(label.x, label.y), text, theme));
        }
        if config.draw_label_borders {
            for [a, b] in edge.borders.iter().flatten() {
                svg.push_str(&format!(
                    "<line x1=\"{:.2}\" y1=\"{:.2}\" x2=\"{:.2}\" y2=\"{:.2}\" stroke=\"{}\" stroke-width=\"{stroke_width}\"/>",
                    a.x, a.y, b.x, b.y, theme.label_border
                ));
            }
        }
    }

    svg.push_str("</svg>");
    svg
}

fn view_box(scene: &Scene, routed: &RoutedScene, config: &RenderConfig) -> Bounds {
    let content = match (scene.element_bounds(), routed.edges.bounds()) {
        (Some(a), Some(b)) => a.union(&b),
        (a, b) => a.or(b).unwrap_or_default(),
    };
    let padded = content.inflate(config.padding);
    let size = Point::new(
        padded.extent(Axis::X).max(config.min_width),
        padded.extent(Axis::Y).max(config.min_height),
    );
    Bounds::from_center_size(padded.center, size)
}

fn rect_svg(bounds: &Bounds, radius: f32, fill: &str, stroke: &str) -> String {
    let min = bounds.min_point();
    let max = bounds.max_point();
    format!(
        "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"{radius}\" ry=\"{radius}\" fill=\"{fill}\" stroke=\"{stroke}\" stroke-width=\"1.2\"/>",
        min.x,
        min.y,
        max.x - min.x,
        max.y - min.y,
    )
}

fn text_svg(at: Point, text: &str, theme: &Theme) -> String {
    format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        at.x,
        at.y,
        escape_xml(&theme.font_family),
        theme.font_size,
        theme.node_text,
        escape_xml(text)
    )
}

fn edge_svg(edge: &RoutedEdge, theme: &Theme, stroke_width: f32) -> String {
    let mut out = String::new();
    for leg in edge.legs() {
        out.push_str(&format!(
            "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width}\" stroke-linejoin=\"round\"/>",
            points_to_path(leg),
            theme.line_color
        ));
    }
    if let Some(arrow) = edge.arrow {
        let points = arrow
            .iter()
            .map(|p| format!("{:.2},{:.2}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(&format!(
            "<polyline points=\"{points}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width}\" stroke-linecap=\"round\" stroke-linejoin=\"round\"/>",
            theme.line_color
        ));
    }
    out
}

fn points_to_path(points: &[Point]) -> String {
    let Some(first) = points.first() else {
        return String::new();
    };
    let mut d = format!("M {:.2} {:.2}", first.x, first.y);
    for point in &points[1..] {
        d.push_str(&format!(" L {:.2} {:.2}", point.x, point.y));
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
