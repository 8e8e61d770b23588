//! SVG export of a recorded frame

use std::fmt::Write;

use super::surface::{DisplayList, DrawCommand, Point, Surface, TextAlign};

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    format!("{}", rounded)
}

fn points_attr(points: &[Point]) -> String {
    points
        .iter()
        .map(|p| format!("{},{}", fmt_num(p.x), fmt_num(p.y)))
        .collect::<Vec<_>>()
        .join(" ")
}

impl DisplayList {
    /// Serialize the current frame as a standalone SVG document.
    pub fn to_svg(&self) -> String {
        let (w, h) = (fmt_num(self.width()), fmt_num(self.height()));
        let mut svg = String::new();

        // Writing into a String cannot fail
        let _ = writeln!(
            svg,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="sans-serif" font-size="12">"#
        );

        for command in self.commands() {
            let _ = match command {
                DrawCommand::FillRect {
                    origin,
                    width,
                    height,
                    color,
                } => writeln!(
                    svg,
                    r#"  <rect x="{}" y="{}" width="{}" height="{}" fill="{}"/>"#,
                    fmt_num(origin.x),
                    fmt_num(origin.y),
                    fmt_num(*width),
                    fmt_num(*height),
                    color
                ),
                DrawCommand::Path { points, stroke } => writeln!(
                    svg,
                    r#"  <polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-opacity="{}" stroke-linejoin="round"/>"#,
                    points_attr(points),
                    stroke.color,
                    fmt_num(stroke.width),
                    fmt_num(stroke.alpha)
                ),
                DrawCommand::Circle {
                    center,
                    radius,
                    color,
                    alpha,
                } => writeln!(
                    svg,
                    r#"  <circle cx="{}" cy="{}" r="{}" fill="{}" fill-opacity="{}"/>"#,
                    fmt_num(center.x),
                    fmt_num(center.y),
                    fmt_num(*radius),
                    color,
                    fmt_num(*alpha)
                ),
                DrawCommand::Text { text, at, style } => {
                    let anchor = match style.align {
                        TextAlign::Left => "start",
                        TextAlign::Center => "middle",
                        TextAlign::Right => "end",
                    };
                    let transform = if style.rotation_deg != 0.0 {
                        format!(
                            r#" transform="rotate({} {} {})""#,
                            fmt_num(style.rotation_deg),
                            fmt_num(at.x),
                            fmt_num(at.y)
                        )
                    } else {
                        String::new()
                    };
                    writeln!(
                        svg,
                        r#"  <text x="{}" y="{}" fill="{}" font-size="{}" text-anchor="{}"{}>{}</text>"#,
                        fmt_num(at.x),
                        fmt_num(at.y),
                        style.color,
                        fmt_num(style.size_px),
                        anchor,
                        transform,
                        escape(text)
                    )
                }
            };
        }

        svg.push_str("</svg>\n");
        svg
    }
}
