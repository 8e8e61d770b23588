//! Output formatting utilities for the CLI
//!
//! Renders the status node tree, curve sets and fan settings as colored tables
//! or JSON.

use anyhow::Result;
use colored::*;
use fanpanel_core::render::Color;
use fanpanel_core::view::status::{
    CLASS_SUCCESS, FRESHNESS_NODE, FRESHNESS_STALE, MODE_NODE, PRESET_NODE,
};
use fanpanel_core::view::{FanGauge, TRACK_WIDTH_PX};
use fanpanel_core::{
    CurveSet, FanConfig, NodeTree, Preset, SensorGroup, StatusSnapshot, StatusView, Visibility,
};
use tabled::{settings::Style, Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

/// Track pixels drawn by one terminal cell
const PX_PER_CELL: f64 = 10.0;
const BAR_CELLS: usize = (TRACK_WIDTH_PX / PX_PER_CELL) as usize;

/// Draw a bar node as a fixed-width block bar in its own color.
pub fn format_bar(width_pct: f64, color: Color) -> String {
    let filled = ((width_pct.clamp(0.0, 100.0) / 100.0) * BAR_CELLS as f64).round() as usize;
    let bar = format!(
        "{}{}",
        "█".repeat(filled),
        "░".repeat(BAR_CELLS.saturating_sub(filled))
    );
    bar.truecolor(color.r, color.g, color.b).to_string()
}

fn bar_cell(tree: &NodeTree, id: &str) -> String {
    tree.bar(&format!("{}-bar", id))
        .map(|(width, color)| format_bar(width, color))
        .unwrap_or_default()
}

fn value_cell(tree: &NodeTree, id: &str) -> String {
    tree.text(&format!("{}-value", id))
        .unwrap_or_default()
        .to_string()
}

/// Render the mounted status view as tables.
pub fn format_status_view(view: &StatusView) -> String {
    #[derive(Tabled)]
    struct GaugeRow {
        #[tabled(rename = "Sensor")]
        label: String,
        #[tabled(rename = "Level")]
        bar: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let tree = view.tree();
    let mut output = String::new();

    let mode = tree.text(MODE_NODE).unwrap_or_default();
    let mode = if tree.class(MODE_NODE) == Some(CLASS_SUCCESS) {
        mode.green()
    } else {
        mode.yellow()
    };
    output.push_str(&"Fan Status".bold().to_string());
    output.push('\n');
    output.push_str(&format!("Mode: {}", mode));
    output.push('\n');
    output.push_str(&format!(
        "Active Curve: {}",
        tree.text(PRESET_NODE).unwrap_or_default().cyan()
    ));
    output.push('\n');

    if let Some(fan) = view.fan_gauge() {
        output.push_str(&format!(
            "{}: {} {}",
            fan.label(),
            bar_cell(tree, FanGauge::ID),
            value_cell(tree, FanGauge::ID)
        ));
        output.push('\n');
    }

    for group in [SensorGroup::System, SensorGroup::Wifi] {
        let rows: Vec<GaugeRow> = view
            .temperature_gauges()
            .filter(|(channel, _)| channel.group() == group)
            .map(|(channel, handle)| GaugeRow {
                label: handle.label().to_string(),
                bar: bar_cell(tree, channel.node_id()),
                value: value_cell(tree, channel.node_id()),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        output.push('\n');
        output.push_str(&format!("{} Temperatures:", group.title()).bold().to_string());
        output.push('\n');
        output.push_str(&table);
        output.push('\n');
    }

    if tree.text(FRESHNESS_NODE) == Some(FRESHNESS_STALE) {
        output.push_str(&"Last refresh failed; values may be outdated".red().to_string());
        output.push('\n');
    }

    output
}

/// One JSON object per refresh, read back from the mounted view.
pub fn format_view_json(view: &StatusView) -> serde_json::Value {
    let tree = view.tree();
    let temperatures: serde_json::Map<String, serde_json::Value> = view
        .temperature_gauges()
        .map(|(channel, handle)| {
            let text = tree.text(handle.value_id()).unwrap_or_default();
            (channel.name().to_string(), text.into())
        })
        .collect();

    serde_json::json!({
        "mode": tree.text(MODE_NODE),
        "preset": tree.text(PRESET_NODE),
        "fan": view.fan_gauge().and_then(|fan| tree.text(fan.value_id())),
        "temperatures": temperatures,
        "stale": view.is_stale(),
    })
}

/// Format a status snapshot
pub fn format_status(status: &StatusSnapshot, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(status)?),
        OutputFormat::Table => Ok(format_status_view(&StatusView::build(status))),
    }
}

/// Format the curve set, marking the active preset
pub fn format_curves(curves: &CurveSet, active: &str, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(curves)?),
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct CurveRow {
                #[tabled(rename = "Preset")]
                name: String,
                #[tabled(rename = "Active")]
                active: String,
                #[tabled(rename = "Points (°C → PWM)")]
                points: String,
            }

            let rows: Vec<CurveRow> = curves
                .layers(active)
                .into_iter()
                .map(|layer| {
                    let c = layer.color;
                    CurveRow {
                        name: layer.name.truecolor(c.r, c.g, c.b).to_string(),
                        active: if layer.active {
                            "✓".green().to_string()
                        } else {
                            String::new()
                        },
                        points: layer
                            .points
                            .iter()
                            .map(|p| format!("{}→{}", p.temp, p.pwm))
                            .collect::<Vec<_>>()
                            .join(", "),
                    }
                })
                .collect();

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Fan Curves:".bold(), table))
        }
    }
}

/// Format the persisted settings, showing only the fields currently visible.
pub fn format_settings(
    config: &FanConfig,
    visibility: Visibility,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let value = serde_json::json!({
                "settings": config.settings,
                "custom": config.custom.points().iter().map(|p| {
                    serde_json::json!({ "temp": p.temp, "pwm": p.pwm })
                }).collect::<Vec<_>>(),
                "visible": {
                    "manual_pwm": visibility.manual_pwm,
                    "preset_selector": visibility.preset_selector,
                    "curve_preview": visibility.curve_preview,
                    "custom_editor": visibility.custom_editor,
                },
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
        OutputFormat::Table => {
            #[derive(Tabled)]
            struct SettingRow {
                #[tabled(rename = "Setting")]
                name: String,
                #[tabled(rename = "Value")]
                value: String,
            }

            let settings = &config.settings;
            let mut rows = vec![SettingRow {
                name: "Control Mode".to_string(),
                value: settings.mode.description().to_string(),
            }];

            if visibility.manual_pwm {
                rows.push(SettingRow {
                    name: "Manual PWM Value".to_string(),
                    value: settings.manual_pwm.to_string(),
                });
            }
            if visibility.preset_selector {
                let name = settings.preset_name();
                let value = name
                    .parse::<Preset>()
                    .map(|p| p.description().to_string())
                    .unwrap_or_else(|_| name.to_string());
                rows.push(SettingRow {
                    name: "Curve Preset".to_string(),
                    value,
                });
            }
            if visibility.custom_editor {
                for (i, point) in config.custom.points().iter().enumerate() {
                    let show = |v: Option<String>| v.unwrap_or_else(|| "-".dimmed().to_string());
                    rows.push(SettingRow {
                        name: format!("Point {}", i + 1),
                        value: format!(
                            "{}°C → {}",
                            show(point.temp.map(|t| t.to_string())),
                            show(point.pwm.map(|p| p.to_string()))
                        ),
                    });
                }
            }

            let table = Table::new(rows).with(Style::rounded()).to_string();
            Ok(format!("{}\n{}", "Fan Settings:".bold(), table))
        }
    }
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
