//! Proportional bar gauges
//!
//! A gauge is created once (mounting a bar node and a value node) and then
//! updated in place through its [`GaugeHandle`]. Updates never remount.

use super::tree::{Node, NodeTree};
use crate::render::Color;

/// Width of the gauge track in pixels; bar widths are percentages of it.
pub const TRACK_WIDTH_PX: f64 = 200.0;

/// Fixed bar color of the fan gauge
pub const FAN_BAR_COLOR: Color = Color::TEAL;

/// Band a temperature into a gauge color.
///
/// `≤ 40` green, `≤ 55` yellow, `≤ 70` orange, hotter red.
pub fn temp_color(temp: f64) -> Color {
    if temp <= 40.0 {
        Color::GREEN
    } else if temp <= 55.0 {
        Color::YELLOW
    } else if temp <= 70.0 {
        Color::ORANGE
    } else {
        Color::RED
    }
}

/// Bar fill for a temperature: the value itself, clamped to `[0, 100]`.
pub fn temp_percentage(temp: f64) -> f64 {
    temp.clamp(0.0, 100.0)
}

pub fn format_temperature(temp: f64) -> String {
    format!("{}°C", temp)
}

pub fn format_fan(rpm: u32, percentage: f64) -> String {
    format!("{} RPM ({}%)", rpm, percentage)
}

/// Stable identity of a mounted gauge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GaugeHandle {
    label: String,
    bar_id: String,
    value_id: String,
}

impl GaugeHandle {
    fn new(label: &str, id: &str) -> Self {
        Self {
            label: label.to_string(),
            bar_id: format!("{}-bar", id),
            value_id: format!("{}-value", id),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn bar_id(&self) -> &str {
        &self.bar_id
    }

    pub fn value_id(&self) -> &str {
        &self.value_id
    }

    /// Both nodes of the gauge are still mounted
    pub fn is_mounted(&self, tree: &NodeTree) -> bool {
        tree.contains(&self.bar_id) && tree.contains(&self.value_id)
    }
}

/// Temperature gauge: banded color, bar clamped to `[0, 100]`.
pub struct TemperatureGauge;

impl TemperatureGauge {
    pub fn create(tree: &mut NodeTree, label: &str, temp: f64, id: &str) -> GaugeHandle {
        let handle = GaugeHandle::new(label, id);
        tree.mount(
            handle.bar_id.clone(),
            Node::bar(temp_percentage(temp), temp_color(temp)),
        );
        tree.mount(handle.value_id.clone(), Node::text(format_temperature(temp)));
        handle
    }

    /// Returns `false` (and writes nothing) if either node is gone.
    pub fn update(tree: &mut NodeTree, handle: &GaugeHandle, temp: f64) -> bool {
        if !handle.is_mounted(tree) {
            return false;
        }
        tree.set_bar(&handle.bar_id, temp_percentage(temp), Some(temp_color(temp)))
            && tree.set_text(&handle.value_id, &format_temperature(temp), None)
    }
}

/// Fan speed gauge: the device supplies the percentage, color is fixed.
pub struct FanGauge;

impl FanGauge {
    pub const ID: &'static str = "fan";
    pub const LABEL: &'static str = "Fan Speed";

    pub fn create(tree: &mut NodeTree, rpm: u32, percentage: f64) -> GaugeHandle {
        let handle = GaugeHandle::new(Self::LABEL, Self::ID);
        tree.mount(handle.bar_id.clone(), Node::bar(percentage, FAN_BAR_COLOR));
        tree.mount(handle.value_id.clone(), Node::text(format_fan(rpm, percentage)));
        handle
    }

    /// Returns `false` (and writes nothing) if either node is gone.
    pub fn update(tree: &mut NodeTree, handle: &GaugeHandle, rpm: u32, percentage: f64) -> bool {
        if !handle.is_mounted(tree) {
            return false;
        }
        tree.set_bar(&handle.bar_id, percentage, None)
            && tree.set_text(&handle.value_id, &format_fan(rpm, percentage), None)
    }
}
