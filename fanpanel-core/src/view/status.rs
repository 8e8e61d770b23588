//! Live status view
//!
//! [`StatusView::build`] mounts every gauge and label once from the initial
//! snapshot. Subsequent snapshots go through [`StatusView::apply`], which only
//! writes into nodes that still exist.

use super::gauge::{FanGauge, GaugeHandle, TemperatureGauge};
use super::tree::{Node, NodeTree};
use crate::curves::capitalize;
use crate::types::{Mode, SensorChannel, StatusSnapshot};

pub const MODE_NODE: &str = "fan-mode";
pub const PRESET_NODE: &str = "fan-preset";
pub const FRESHNESS_NODE: &str = "status-freshness";

pub const CLASS_SUCCESS: &str = "label-success";
pub const CLASS_WARNING: &str = "label-warning";

pub const FRESHNESS_LIVE: &str = "live";
pub const FRESHNESS_STALE: &str = "stale";

/// Text and class of the control-mode label
pub fn mode_label(status: &StatusSnapshot) -> (String, &'static str) {
    let text = if status.fan_mode_desc.is_empty() {
        "Unknown".to_string()
    } else {
        status.fan_mode_desc.clone()
    };
    let class = if status.is_auto_ok() {
        CLASS_SUCCESS
    } else {
        CLASS_WARNING
    };
    (text, class)
}

/// Text of the active-preset label
pub fn preset_label(status: &StatusSnapshot) -> String {
    if status.mode() == Some(Mode::Manual) {
        return "Manual Override".to_string();
    }
    if status.uci_preset.is_empty() {
        capitalize("balanced")
    } else {
        capitalize(&status.uci_preset)
    }
}

#[derive(Debug, Default)]
pub struct StatusView {
    tree: NodeTree,
    fan: Option<GaugeHandle>,
    temperatures: Vec<(SensorChannel, GaugeHandle)>,
    stale: bool,
}

impl StatusView {
    /// Mount all nodes from the first snapshot.
    pub fn build(status: &StatusSnapshot) -> Self {
        let mut tree = NodeTree::new();

        let fan = FanGauge::create(&mut tree, status.fan_rpm, status.fan_percentage);
        let (mode_text, mode_class) = mode_label(status);
        tree.mount(MODE_NODE, Node::text_with_class(mode_text, mode_class));
        tree.mount(PRESET_NODE, Node::text(preset_label(status)));
        tree.mount(FRESHNESS_NODE, Node::text(FRESHNESS_LIVE));

        let temperatures = status
            .temperatures()
            .map(|(channel, temp)| {
                let handle =
                    TemperatureGauge::create(&mut tree, channel.label(), temp, channel.node_id());
                (channel, handle)
            })
            .collect();

        Self {
            tree,
            fan: Some(fan),
            temperatures,
            stale: false,
        }
    }

    /// Write a fresh snapshot into the mounted nodes.
    ///
    /// Returns the number of gauges updated; gauges whose nodes are gone are
    /// skipped. Never mounts anything.
    pub fn apply(&mut self, status: &StatusSnapshot) -> usize {
        let mut updated = 0;

        if let Some(fan) = &self.fan {
            if FanGauge::update(&mut self.tree, fan, status.fan_rpm, status.fan_percentage) {
                updated += 1;
            }
        }

        for (channel, handle) in &self.temperatures {
            if TemperatureGauge::update(&mut self.tree, handle, status.temperature(*channel)) {
                updated += 1;
            }
        }

        let (mode_text, mode_class) = mode_label(status);
        self.tree.set_text(MODE_NODE, &mode_text, Some(mode_class));
        self.tree.set_text(PRESET_NODE, &preset_label(status), None);
        self.tree.set_text(FRESHNESS_NODE, FRESHNESS_LIVE, None);
        self.stale = false;

        updated
    }

    /// Flag the displayed values as outdated without touching them.
    pub fn mark_stale(&mut self) {
        self.stale = true;
        self.tree.set_text(FRESHNESS_NODE, FRESHNESS_STALE, None);
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut NodeTree {
        &mut self.tree
    }

    pub fn fan_gauge(&self) -> Option<&GaugeHandle> {
        self.fan.as_ref()
    }

    pub fn temperature_gauges(&self) -> impl Iterator<Item = (SensorChannel, &GaugeHandle)> {
        self.temperatures.iter().map(|(c, h)| (*c, h))
    }

    /// Remove every node. Later `apply` calls become no-ops.
    pub fn teardown(&mut self) {
        self.tree.clear();
    }

    pub fn is_mounted(&self) -> bool {
        !self.tree.is_empty()
    }
}
