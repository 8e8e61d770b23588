//! Persisted fan settings
//!
//! Stored as TOML with two tables:
//!
//! ```toml
//! [settings]
//! mode = "auto"
//! manual_pwm = 127
//! curve_preset = "balanced"
//!
//! [custom]
//! point1_temp = 30
//! point1_pwm = 60
//! # ... through point5
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::curves::{CurvePoint, Preset, PWM_MAX, TEMP_MAX};
use crate::error::{FanPanelError, Result};
use crate::types::Mode;

/// Number of editable points on the custom curve
pub const CUSTOM_POINT_COUNT: usize = 5;

/// Default duty held in manual mode
pub const DEFAULT_MANUAL_PWM: u32 = 127;

const DEFAULT_CUSTOM_POINTS: [(f64, u32); CUSTOM_POINT_COUNT] =
    [(30.0, 60), (45.0, 100), (60.0, 150), (75.0, 200), (85.0, 255)];

/// Parse a temperature field (`range(0,100)`, required).
pub fn parse_temp_field(field: &str, raw: &str) -> Result<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FanPanelError::validation(field, "value is required"));
    }
    let value: f64 = raw
        .parse()
        .map_err(|_| FanPanelError::validation(field, format!("'{}' is not a number", raw)))?;
    check_temp(field, value)
}

/// Parse a PWM field (`range(0,255)`, required).
pub fn parse_pwm_field(field: &str, raw: &str) -> Result<u32> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FanPanelError::validation(field, "value is required"));
    }
    let value: i64 = raw.parse().map_err(|_| {
        FanPanelError::validation(field, format!("'{}' is not an integer", raw))
    })?;
    if !(0..=PWM_MAX as i64).contains(&value) {
        return Err(FanPanelError::validation(
            field,
            format!("must be between 0 and {}", PWM_MAX),
        ));
    }
    Ok(value as u32)
}

fn check_temp(field: &str, value: f64) -> Result<f64> {
    if !value.is_finite() || !(0.0..=TEMP_MAX).contains(&value) {
        return Err(FanPanelError::validation(
            field,
            format!("must be between 0 and {}", TEMP_MAX),
        ));
    }
    Ok(value)
}

fn check_pwm(field: &str, value: u32) -> Result<u32> {
    if value > PWM_MAX {
        return Err(FanPanelError::validation(
            field,
            format!("must be between 0 and {}", PWM_MAX),
        ));
    }
    Ok(value)
}

/// The `fan.settings` record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanSettings {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_manual_pwm")]
    pub manual_pwm: u32,
    /// Unset means `balanced`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub curve_preset: Option<String>,
}

fn default_manual_pwm() -> u32 {
    DEFAULT_MANUAL_PWM
}

impl Default for FanSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Auto,
            manual_pwm: DEFAULT_MANUAL_PWM,
            curve_preset: Some(Preset::Balanced.as_str().to_string()),
        }
    }
}

impl FanSettings {
    /// Effective preset name, `balanced` when unset or empty.
    pub fn preset_name(&self) -> &str {
        match self.curve_preset.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => Preset::Balanced.as_str(),
        }
    }
}

/// One editable point; either half may be unset until the user fills it.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CustomPoint {
    pub temp: Option<f64>,
    pub pwm: Option<u32>,
}

/// The five user-defined points of the `custom` preset, in slot order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "CustomSection", into = "CustomSection")]
pub struct CustomCurveConfig {
    points: [CustomPoint; CUSTOM_POINT_COUNT],
}

impl Default for CustomCurveConfig {
    fn default() -> Self {
        let mut points = [CustomPoint::default(); CUSTOM_POINT_COUNT];
        for (slot, (temp, pwm)) in points.iter_mut().zip(DEFAULT_CUSTOM_POINTS) {
            slot.temp = Some(temp);
            slot.pwm = Some(pwm);
        }
        Self { points }
    }
}

impl CustomCurveConfig {
    /// A config with every slot unset
    pub fn empty() -> Self {
        Self {
            points: [CustomPoint::default(); CUSTOM_POINT_COUNT],
        }
    }

    pub fn points(&self) -> &[CustomPoint; CUSTOM_POINT_COUNT] {
        &self.points
    }

    /// Get a slot by its 1-based number.
    pub fn point(&self, slot: usize) -> Option<&CustomPoint> {
        slot.checked_sub(1).and_then(|i| self.points.get(i))
    }

    /// Set a slot by its 1-based number, checking both ranges.
    pub fn set_point(&mut self, slot: usize, temp: f64, pwm: u32) -> Result<()> {
        let index = Self::index(slot)?;
        let temp = check_temp(&Self::temp_key(slot), temp)?;
        let pwm = check_pwm(&Self::pwm_key(slot), pwm)?;
        self.points[index] = CustomPoint {
            temp: Some(temp),
            pwm: Some(pwm),
        };
        Ok(())
    }

    /// Set a slot from raw form text.
    pub fn set_point_from_text(&mut self, slot: usize, temp: &str, pwm: &str) -> Result<()> {
        Self::index(slot)?;
        let temp = parse_temp_field(&Self::temp_key(slot), temp)?;
        let pwm = parse_pwm_field(&Self::pwm_key(slot), pwm)?;
        self.set_point(slot, temp, pwm)
    }

    /// Check every slot is filled and within range.
    pub fn validate(&self) -> Result<()> {
        for (i, point) in self.points.iter().enumerate() {
            let slot = i + 1;
            match point.temp {
                Some(temp) => {
                    check_temp(&Self::temp_key(slot), temp)?;
                }
                None => {
                    return Err(FanPanelError::validation(
                        Self::temp_key(slot),
                        "value is required",
                    ))
                }
            }
            match point.pwm {
                Some(pwm) => {
                    check_pwm(&Self::pwm_key(slot), pwm)?;
                }
                None => {
                    return Err(FanPanelError::validation(
                        Self::pwm_key(slot),
                        "value is required",
                    ))
                }
            }
        }
        Ok(())
    }

    /// Curve points in slot order. Slots are never sorted; unset halves read
    /// as zero.
    pub fn to_points(&self) -> Vec<CurvePoint> {
        self.points
            .iter()
            .map(|p| CurvePoint::new(p.temp.unwrap_or_default(), p.pwm.unwrap_or_default()))
            .collect()
    }

    pub fn temp_key(slot: usize) -> String {
        format!("point{}_temp", slot)
    }

    pub fn pwm_key(slot: usize) -> String {
        format!("point{}_pwm", slot)
    }

    fn index(slot: usize) -> Result<usize> {
        if (1..=CUSTOM_POINT_COUNT).contains(&slot) {
            Ok(slot - 1)
        } else {
            Err(FanPanelError::InvalidInput(format!(
                "Custom point slot must be 1-{}, got {}",
                CUSTOM_POINT_COUNT, slot
            )))
        }
    }
}

// Flat `pointN_temp` / `pointN_pwm` keys as they appear on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct CustomSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point1_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point1_pwm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point2_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point2_pwm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point3_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point3_pwm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point4_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point4_pwm: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point5_temp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    point5_pwm: Option<u32>,
}

impl From<CustomSection> for CustomCurveConfig {
    fn from(s: CustomSection) -> Self {
        let pair = |temp, pwm| CustomPoint { temp, pwm };
        Self {
            points: [
                pair(s.point1_temp, s.point1_pwm),
                pair(s.point2_temp, s.point2_pwm),
                pair(s.point3_temp, s.point3_pwm),
                pair(s.point4_temp, s.point4_pwm),
                pair(s.point5_temp, s.point5_pwm),
            ],
        }
    }
}

impl From<CustomCurveConfig> for CustomSection {
    fn from(c: CustomCurveConfig) -> Self {
        let [p1, p2, p3, p4, p5] = c.points;
        Self {
            point1_temp: p1.temp,
            point1_pwm: p1.pwm,
            point2_temp: p2.temp,
            point2_pwm: p2.pwm,
            point3_temp: p3.temp,
            point3_pwm: p3.pwm,
            point4_temp: p4.temp,
            point4_pwm: p4.pwm,
            point5_temp: p5.temp,
            point5_pwm: p5.pwm,
        }
    }
}

/// The whole persisted fan configuration (`fan.toml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FanConfig {
    #[serde(default)]
    pub settings: FanSettings,
    #[serde(default)]
    pub custom: CustomCurveConfig,
}

impl FanConfig {
    /// Parse FanConfig from TOML string.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize FanConfig to TOML string.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Check every field the settings form would check before saving.
    pub fn validate(&self) -> Result<()> {
        check_pwm("manual_pwm", self.settings.manual_pwm)?;
        let preset: Preset = self.settings.preset_name().parse()?;
        if self.settings.mode == Mode::Auto && preset == Preset::Custom {
            self.custom.validate()?;
        }
        Ok(())
    }
}

/// Where fan settings are read from and written back to
pub trait ConfigStore {
    fn load(&self) -> Result<FanConfig>;
    fn save(&self, config: &FanConfig) -> Result<()>;
}

/// [`ConfigStore`] backed by a single TOML file
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for TomlConfigStore {
    /// A missing file yields the defaults; nothing is written.
    fn load(&self) -> Result<FanConfig> {
        if !self.path.exists() {
            return Ok(FanConfig::default());
        }
        let content = fs::read_to_string(&self.path).map_err(|e| {
            FanPanelError::Config(format!(
                "Failed to read fan config '{}': {}",
                self.path.display(),
                e
            ))
        })?;
        FanConfig::from_toml(&content)
    }

    /// Write through a temp file and rename so readers never see a partial file.
    fn save(&self, config: &FanConfig) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    FanPanelError::Config(format!(
                        "Failed to create config directory '{}': {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let content = config.to_toml()?;
        let temp_path = self.path.with_extension("toml.tmp");
        fs::write(&temp_path, content)
            .map_err(|e| FanPanelError::Config(format!("Failed to write temp file: {}", e)))?;
        fs::rename(&temp_path, &self.path)
            .map_err(|e| FanPanelError::Config(format!("Failed to rename temp file: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = FanConfig::default();
        assert_eq!(config.settings.mode, Mode::Auto);
        assert_eq!(config.settings.manual_pwm, 127);
        assert_eq!(config.settings.preset_name(), "balanced");
        assert!(config.custom.validate().is_ok());
        assert_eq!(config.custom.to_points()[0], CurvePoint::new(30.0, 60));
    }

    #[test]
    fn test_unset_preset_defaults_to_balanced() {
        let config = FanConfig::from_toml("[settings]\nmode = \"auto\"\n").unwrap();
        assert_eq!(config.settings.curve_preset, None);
        assert_eq!(config.settings.preset_name(), "balanced");
        assert_eq!(config.settings.manual_pwm, 127);

        let settings = FanSettings {
            curve_preset: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.preset_name(), "balanced");
    }

    #[test]
    fn test_flat_custom_keys() {
        let toml_str = r#"
            [settings]
            mode = "auto"
            manual_pwm = 90
            curve_preset = "custom"

            [custom]
            point1_temp = 20
            point1_pwm = 40
            point3_temp = 55.5
        "#;

        let config = FanConfig::from_toml(toml_str).unwrap();
        let custom = &config.custom;
        assert_eq!(custom.point(1).unwrap().temp, Some(20.0));
        assert_eq!(custom.point(1).unwrap().pwm, Some(40));
        assert_eq!(custom.point(3).unwrap().temp, Some(55.5));
        assert_eq!(custom.point(3).unwrap().pwm, None);
        assert!(custom.point(0).is_none());
        assert!(custom.point(6).is_none());

        assert!(matches!(
            config.validate(),
            Err(FanPanelError::Validation { field, .. }) if field == "point2_temp"
        ));

        let out = config.to_toml().unwrap();
        assert!(out.contains("[custom]"));
        assert!(out.contains("point1_pwm = 40"));
        assert!(!out.contains("point2_temp"));
    }

    #[test]
    fn test_to_points_keeps_slot_order() {
        let mut custom = CustomCurveConfig::default();
        custom.set_point(1, 90.0, 255).unwrap();
        custom.set_point(5, 10.0, 20).unwrap();

        let points = custom.to_points();
        assert_eq!(points.len(), CUSTOM_POINT_COUNT);
        assert_eq!(points[0], CurvePoint::new(90.0, 255));
        assert_eq!(points[4], CurvePoint::new(10.0, 20));
    }

    #[test]
    fn test_field_parsing() {
        assert_eq!(parse_temp_field("t", " 42.5 ").unwrap(), 42.5);
        assert_eq!(parse_pwm_field("p", "255").unwrap(), 255);

        for bad in ["", "  ", "abc", "101", "-1"] {
            assert!(parse_temp_field("t", bad).is_err(), "{bad:?}");
        }
        for bad in ["", "256", "-5", "1.5"] {
            assert!(parse_pwm_field("p", bad).is_err(), "{bad:?}");
        }

        let err = parse_temp_field("point2_temp", "").unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for point2_temp: value is required");
    }

    #[test]
    fn test_set_point_rejects_bad_slot_and_range() {
        let mut custom = CustomCurveConfig::empty();
        assert!(matches!(
            custom.set_point(0, 10.0, 10),
            Err(FanPanelError::InvalidInput(_))
        ));
        assert!(custom.set_point(6, 10.0, 10).is_err());
        assert!(custom.set_point(2, 120.0, 10).is_err());
        assert!(custom.set_point(2, 10.0, 300).is_err());
        assert!(custom.set_point_from_text(2, "35", "90").is_ok());
        assert_eq!(custom.point(2).unwrap().pwm, Some(90));
    }

    #[test]
    fn test_validate_manual_pwm_and_preset() {
        let mut config = FanConfig::default();
        config.settings.manual_pwm = 300;
        assert!(config.validate().is_err());

        let mut config = FanConfig::default();
        config.settings.curve_preset = Some("turbo".to_string());
        assert!(matches!(
            config.validate(),
            Err(FanPanelError::UnknownPreset(_))
        ));

        // Custom points only matter when the custom editor is in use
        let mut config = FanConfig::default();
        config.custom = CustomCurveConfig::empty();
        assert!(config.validate().is_ok());
        config.settings.curve_preset = Some("custom".to_string());
        assert!(config.validate().is_err());
        config.settings.mode = Mode::Manual;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("fan.toml"));

        let config = store.load().unwrap();
        assert_eq!(config, FanConfig::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_store_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let store = TomlConfigStore::new(temp_dir.path().join("nested").join("fan.toml"));

        let mut config = FanConfig::default();
        config.settings.mode = Mode::Manual;
        config.settings.manual_pwm = 200;
        config.custom.set_point(4, 70.0, 180).unwrap();

        store.save(&config).unwrap();
        assert!(store.path().exists());
        assert_eq!(store.load().unwrap(), config);
    }

    #[test]
    fn test_store_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fan.toml");
        fs::write(&path, "[settings]\nmode = \"turbo\"\n").unwrap();

        let store = TomlConfigStore::new(path);
        assert!(matches!(store.load(), Err(FanPanelError::Parse(_))));
    }
}
