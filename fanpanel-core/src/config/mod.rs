//! Persisted fan configuration
//!
//! [`FanConfig`] mirrors the `fan.settings` and `fan.custom` sections. It is
//! read and written through a [`ConfigStore`]; [`TomlConfigStore`] keeps it in
//! a single TOML file, by default at [`default_fan_config_path`].

mod fan_config;
mod paths;

pub use fan_config::{
    parse_pwm_field, parse_temp_field, ConfigStore, CustomCurveConfig, CustomPoint, FanConfig,
    FanSettings, TomlConfigStore, CUSTOM_POINT_COUNT, DEFAULT_MANUAL_PWM,
};
pub use paths::{default_config_dir, default_fan_config_path};
