//! Curve chart renderer
//!
//! Paints every curve of a [`CurveSet`] on a fixed-size surface, highlighting
//! the active preset. Each call repaints the whole surface; nothing is carried
//! over between calls.

use super::geometry::ChartGeometry;
use super::surface::{Color, Point, Stroke, Surface, TextAlign, TextStyle};
use crate::curves::{CurveLayer, CurveSet, Preset};

/// Vertical gridline spacing in °C
pub const GRID_TEMP_STEP: u32 = 10;
/// Horizontal gridline spacing in PWM units
pub const GRID_PWM_STEP: u32 = 51;
/// Temperature tick label spacing in °C
pub const TICK_TEMP_STEP: u32 = 20;

pub const ACTIVE_STROKE_WIDTH: f64 = 3.0;
pub const INACTIVE_STROKE_WIDTH: f64 = 1.5;
pub const INACTIVE_ALPHA: f64 = 0.4;
pub const MARKER_RADIUS: f64 = 5.0;

const GRID_WIDTH: f64 = 1.0;
const AXIS_WIDTH: f64 = 2.0;

const LEGEND_OFFSET: f64 = 100.0;
const LEGEND_TOP: f64 = 15.0;
const LEGEND_SWATCH: f64 = 15.0;
const LEGEND_ROW_HEIGHT: f64 = 20.0;

/// Render the chart. A `None` surface (not mounted yet) is a no-op.
pub fn render<S>(surface: Option<&mut S>, curves: &CurveSet, active_preset: &str)
where
    S: Surface + ?Sized,
{
    let Some(surface) = surface else {
        return;
    };

    let geometry = ChartGeometry::new(surface.width(), surface.height());

    surface.begin_frame();
    draw_background(surface);
    draw_grid(surface, &geometry);
    draw_axes(surface, &geometry);

    let layers = curves.layers(active_preset);
    for layer in &layers {
        draw_curve(surface, &geometry, layer);
    }
    draw_legend(surface);
}

fn draw_background<S: Surface + ?Sized>(surface: &mut S) {
    let (w, h) = (surface.width(), surface.height());
    surface.fill_rect(Point::new(0.0, 0.0), w, h, Color::WHITE);
}

fn draw_grid<S: Surface + ?Sized>(surface: &mut S, g: &ChartGeometry) {
    let stroke = Stroke::solid(Color::GRID, GRID_WIDTH);

    for t in (0..=100).step_by(GRID_TEMP_STEP as usize) {
        let x = g.x(t as f64);
        surface.stroke_path(&[Point::new(x, g.top()), Point::new(x, g.bottom())], stroke);
    }

    for p in (0..=255).step_by(GRID_PWM_STEP as usize) {
        let y = g.y(p as f64);
        surface.stroke_path(&[Point::new(g.left(), y), Point::new(g.right(), y)], stroke);
    }
}

fn draw_axes<S: Surface + ?Sized>(surface: &mut S, g: &ChartGeometry) {
    surface.stroke_path(
        &[
            Point::new(g.left(), g.top()),
            Point::new(g.left(), g.bottom()),
            Point::new(g.right(), g.bottom()),
        ],
        Stroke::solid(Color::AXIS, AXIS_WIDTH),
    );

    let centered = TextStyle::new(Color::AXIS, TextAlign::Center);
    surface.fill_text(
        "Temperature (°C)",
        Point::new(g.width / 2.0, g.height - 5.0),
        centered,
    );
    surface.fill_text(
        "PWM (0-255)",
        Point::new(12.0, g.height / 2.0),
        centered.rotated(-90.0),
    );

    for t in (0..=100).step_by(TICK_TEMP_STEP as usize) {
        surface.fill_text(
            &t.to_string(),
            Point::new(g.x(t as f64), g.bottom() + 15.0),
            centered,
        );
    }

    let right = TextStyle::new(Color::AXIS, TextAlign::Right);
    for p in (0..=255).step_by(GRID_PWM_STEP as usize) {
        surface.fill_text(
            &p.to_string(),
            Point::new(g.left() - 5.0, g.y(p as f64) + 4.0),
            right,
        );
    }
}

fn draw_curve<S: Surface + ?Sized>(surface: &mut S, g: &ChartGeometry, layer: &CurveLayer<'_>) {
    let points: Vec<Point> = layer.points.iter().map(|p| g.map(p)).collect();

    let stroke = if layer.active {
        Stroke {
            color: layer.color,
            width: ACTIVE_STROKE_WIDTH,
            alpha: 1.0,
        }
    } else {
        Stroke {
            color: layer.color,
            width: INACTIVE_STROKE_WIDTH,
            alpha: INACTIVE_ALPHA,
        }
    };
    surface.stroke_path(&points, stroke);

    if layer.active {
        for point in points {
            surface.fill_circle(point, MARKER_RADIUS, layer.color, 1.0);
        }
    }
}

fn draw_legend<S: Surface + ?Sized>(surface: &mut S) {
    let left = surface.width() - LEGEND_OFFSET;
    let label_style = TextStyle::new(Color::AXIS, TextAlign::Left);

    for (row, preset) in Preset::ALL.iter().enumerate() {
        let y = LEGEND_TOP + row as f64 * LEGEND_ROW_HEIGHT;
        surface.fill_rect(
            Point::new(left, y),
            LEGEND_SWATCH,
            LEGEND_SWATCH,
            preset.color(),
        );
        surface.fill_text(preset.label(), Point::new(left + 20.0, y + 12.0), label_style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurvePoint;
    use crate::render::{DisplayList, DrawCommand};

    const EPS: f64 = 1e-9;

    fn balanced_only() -> CurveSet {
        CurveSet::new().with(
            "balanced",
            vec![
                CurvePoint::new(0.0, 50),
                CurvePoint::new(50.0, 150),
                CurvePoint::new(100.0, 255),
            ],
        )
    }

    fn three_presets() -> CurveSet {
        balanced_only()
            .with(
                "quiet",
                vec![CurvePoint::new(30.0, 40), CurvePoint::new(80.0, 200)],
            )
            .with(
                "performance",
                vec![CurvePoint::new(20.0, 100), CurvePoint::new(60.0, 255)],
            )
    }

    #[test]
    fn test_missing_surface_is_noop() {
        render::<DisplayList>(None, &balanced_only(), "balanced");
    }

    #[test]
    fn test_active_curve_passes_through_mapped_points() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &balanced_only(), "balanced");

        let curve = list
            .paths()
            .find(|(_, stroke)| stroke.color == Color::BLUE)
            .expect("balanced curve drawn");

        let g = ChartGeometry::new(500.0, 300.0);
        let expected = [
            (g.x(0.0), g.y(50.0)),
            (g.x(50.0), g.y(150.0)),
            (g.x(100.0), g.y(255.0)),
        ];
        assert_eq!(curve.0.len(), 3);
        for (point, (x, y)) in curve.0.iter().zip(expected) {
            assert!((point.x - x).abs() < EPS);
            assert!((point.y - y).abs() < EPS);
        }
        assert_eq!(curve.1.width, ACTIVE_STROKE_WIDTH);
        assert_eq!(curve.1.alpha, 1.0);

        // (100, 255) lands on the top-right corner of the plot area
        assert!((curve.0[2].x - 460.0).abs() < EPS);
        assert!((curve.0[2].y - 40.0).abs() < EPS);
    }

    #[test]
    fn test_inactive_curves_are_thin_and_translucent() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &three_presets(), "quiet");

        for (_, stroke) in list.paths() {
            if stroke.color == Color::GREEN {
                assert_eq!(stroke.width, ACTIVE_STROKE_WIDTH);
                assert_eq!(stroke.alpha, 1.0);
            } else if stroke.color == Color::BLUE || stroke.color == Color::RED {
                assert_eq!(stroke.width, INACTIVE_STROKE_WIDTH);
                assert_eq!(stroke.alpha, INACTIVE_ALPHA);
            }
        }
        assert_eq!(ACTIVE_STROKE_WIDTH, 2.0 * INACTIVE_STROKE_WIDTH);
    }

    #[test]
    fn test_markers_only_on_active_curve() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &three_presets(), "performance");

        let markers: Vec<_> = list.circles().collect();
        assert_eq!(markers.len(), 2);
        assert!(markers
            .iter()
            .all(|(_, r, color)| *r == MARKER_RADIUS && **color == Color::RED));
    }

    #[test]
    fn test_render_is_idempotent() {
        let curves = three_presets();
        let mut list = DisplayList::new(500.0, 300.0);

        render(Some(&mut list), &curves, "balanced");
        let first = list.clone();
        render(Some(&mut list), &curves, "balanced");

        assert_eq!(first, list);
    }

    #[test]
    fn test_drawing_order() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &balanced_only(), "balanced");
        let commands = list.commands();

        // Background first, full bleed
        assert_eq!(
            commands[0],
            DrawCommand::FillRect {
                origin: Point::new(0.0, 0.0),
                width: 500.0,
                height: 300.0,
                color: Color::WHITE,
            }
        );

        let first_grid = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Path { stroke, .. } if stroke.color == Color::GRID))
            .unwrap();
        let axis = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Path { stroke, .. } if stroke.color == Color::AXIS))
            .unwrap();
        let curve = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Path { stroke, .. } if stroke.color == Color::BLUE))
            .unwrap();
        let marker = commands
            .iter()
            .position(|c| matches!(c, DrawCommand::Circle { .. }))
            .unwrap();
        let legend = commands
            .iter()
            .rposition(|c| matches!(c, DrawCommand::FillRect { width, .. } if *width == 15.0))
            .unwrap();

        assert!(first_grid < axis);
        assert!(axis < curve);
        assert!(curve < marker);
        assert!(marker < legend);
    }

    #[test]
    fn test_grid_line_counts() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &CurveSet::new(), "balanced");

        let grid = list
            .paths()
            .filter(|(_, stroke)| stroke.color == Color::GRID)
            .count();
        // 11 vertical (0..=100 step 10) + 6 horizontal (0..=255 step 51)
        assert_eq!(grid, 17);
    }

    #[test]
    fn test_unknown_and_empty_presets() {
        let curves = CurveSet::new()
            .with("turbo", vec![CurvePoint::new(10.0, 10), CurvePoint::new(90.0, 250)])
            .with("custom", vec![]);
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &curves, "custom");

        let curve_strokes: Vec<_> = list
            .paths()
            .filter(|(_, s)| s.color != Color::GRID && s.color != Color::AXIS)
            .collect();
        assert_eq!(curve_strokes.len(), 1);
        assert_eq!(curve_strokes[0].1.color, Color::GRAY);
        assert_eq!(list.circles().count(), 0);
    }

    #[test]
    fn test_legend_lists_every_known_preset() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &balanced_only(), "balanced");

        let labels: Vec<_> = list
            .texts()
            .filter(|(_, _, style)| style.align == TextAlign::Left)
            .collect();
        assert_eq!(labels.len(), 4);
        assert_eq!(labels[0].0, "Quiet");
        assert_eq!(*labels[0].1, Point::new(420.0, 27.0));
        assert_eq!(labels[3].0, "Custom");
        assert_eq!(*labels[3].1, Point::new(420.0, 87.0));
    }

    #[test]
    fn test_axis_labels() {
        let mut list = DisplayList::new(500.0, 300.0);
        render(Some(&mut list), &CurveSet::new(), "balanced");

        let texts: Vec<_> = list.texts().map(|(t, _, _)| t).collect();
        assert!(texts.contains(&"Temperature (°C)"));
        assert!(texts.contains(&"PWM (0-255)"));
        for tick in ["0", "20", "40", "60", "80", "100", "51", "102", "153", "204", "255"] {
            assert!(texts.contains(&tick), "missing tick {}", tick);
        }

        let (_, _, rotated) = list
            .texts()
            .find(|(t, _, _)| *t == "PWM (0-255)")
            .unwrap();
        assert_eq!(rotated.rotation_deg, -90.0);
    }
}
