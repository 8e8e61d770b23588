//! Status gauges over a retained node tree

pub mod gauge;
pub mod status;
pub mod tree;

pub use gauge::{
    format_fan, format_temperature, temp_color, temp_percentage, FanGauge, GaugeHandle,
    TemperatureGauge, FAN_BAR_COLOR, TRACK_WIDTH_PX,
};
pub use status::{mode_label, preset_label, StatusView};
pub use tree::{Node, NodeTree};
