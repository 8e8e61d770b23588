//! Fan Panel Core Library
//!
//! Curve model, chart renderer, status gauges and settings visibility for a
//! fan-control panel. Everything in this crate is synchronous and free of
//! network I/O; the CLI crate supplies the transport and the refresh loop.

pub mod api;
pub mod config;
pub mod curves;
pub mod error;
pub mod render;
pub mod settings;
pub mod types;
pub mod view;
pub mod visibility;

// Re-export commonly used types
pub use config::{
    default_config_dir, default_fan_config_path, ConfigStore, CustomCurveConfig, FanConfig,
    FanSettings, TomlConfigStore,
};
pub use curves::{CurvePoint, CurveSet, Preset};
pub use error::*;
pub use settings::SettingsForm;
pub use types::*;
pub use view::{NodeTree, StatusView};
pub use visibility::{Visibility, VisibilityContext};
