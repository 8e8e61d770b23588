//! Core types and data structures for the fan panel

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FanPanelError;

/// `fan_mode` code reported when the automatic closed loop is running normally.
pub const FAN_MODE_AUTO_OK: i64 = 2;

/// Fan control mode as persisted in `fan.settings.mode`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Follow the selected temperature curve
    #[default]
    Auto,
    /// Hold a fixed PWM value
    Manual,
}

impl Mode {
    /// Get the persisted string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Auto => "auto",
            Mode::Manual => "manual",
        }
    }

    /// Human readable label used by the mode selector
    pub fn description(&self) -> &'static str {
        match self {
            Mode::Auto => "Automatic (Follow Curve)",
            Mode::Manual => "Manual (Fixed Speed)",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = FanPanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Mode::Auto),
            "manual" => Ok(Mode::Manual),
            other => Err(FanPanelError::UnknownMode(other.to_string())),
        }
    }
}

/// Group a temperature sensor is displayed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorGroup {
    System,
    Wifi,
}

impl SensorGroup {
    pub fn title(&self) -> &'static str {
        match self {
            SensorGroup::System => "System",
            SensorGroup::Wifi => "WiFi",
        }
    }
}

/// Named temperature channel reported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SensorChannel {
    Cpu,
    Board,
    Phy1,
    Phy2,
    Wifi24g,
    Wifi5g,
    Wifi6g,
}

impl SensorChannel {
    /// All channels in display order
    pub const ALL: [SensorChannel; 7] = [
        SensorChannel::Cpu,
        SensorChannel::Board,
        SensorChannel::Phy1,
        SensorChannel::Phy2,
        SensorChannel::Wifi24g,
        SensorChannel::Wifi5g,
        SensorChannel::Wifi6g,
    ];

    /// Short channel name (`cpu`, `wifi_24g`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            SensorChannel::Cpu => "cpu",
            SensorChannel::Board => "board",
            SensorChannel::Phy1 => "phy1",
            SensorChannel::Phy2 => "phy2",
            SensorChannel::Wifi24g => "wifi_24g",
            SensorChannel::Wifi5g => "wifi_5g",
            SensorChannel::Wifi6g => "wifi_6g",
        }
    }

    /// Gauge label
    pub fn label(&self) -> &'static str {
        match self {
            SensorChannel::Cpu => "CPU",
            SensorChannel::Board => "Board (Fan Curve)",
            SensorChannel::Phy1 => "10G PHY",
            SensorChannel::Phy2 => "Switch PHY",
            SensorChannel::Wifi24g => "2.4 GHz Radio",
            SensorChannel::Wifi5g => "5 GHz Radio",
            SensorChannel::Wifi6g => "6 GHz Radio",
        }
    }

    /// Stable gauge identity; bar and value nodes derive their ids from it.
    pub fn node_id(&self) -> &'static str {
        match self {
            SensorChannel::Cpu => "temp-cpu",
            SensorChannel::Board => "temp-board",
            SensorChannel::Phy1 => "temp-phy1",
            SensorChannel::Phy2 => "temp-phy2",
            SensorChannel::Wifi24g => "temp-wifi24g",
            SensorChannel::Wifi5g => "temp-wifi5g",
            SensorChannel::Wifi6g => "temp-wifi6g",
        }
    }

    pub fn group(&self) -> SensorGroup {
        match self {
            SensorChannel::Cpu
            | SensorChannel::Board
            | SensorChannel::Phy1
            | SensorChannel::Phy2 => SensorGroup::System,
            SensorChannel::Wifi24g | SensorChannel::Wifi5g | SensorChannel::Wifi6g => {
                SensorGroup::Wifi
            }
        }
    }
}

impl fmt::Display for SensorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Missing keys and explicit nulls both fall back to the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// Any JSON number is accepted for integer fields; floats truncate, and
// negatives, non-numbers and nulls read as zero.
fn number_as_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value.as_ref().and_then(serde_json::Value::as_f64) {
        Some(n) if n.is_finite() && n >= 0.0 => n as u32,
        _ => 0,
    })
}

fn number_as_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    })
}

/// One `getStatus` response.
///
/// Created fresh on every poll; every field is optional on the wire and
/// defaults to zero (or empty) when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusSnapshot {
    /// Measured fan speed
    #[serde(deserialize_with = "number_as_u32")]
    pub fan_rpm: u32,
    /// Current PWM duty (0-255)
    #[serde(deserialize_with = "number_as_u32")]
    pub fan_pwm: u32,
    /// Duty as a percentage (0-100), computed by the device
    #[serde(deserialize_with = "null_as_default")]
    pub fan_percentage: f64,
    /// Control loop state code ([`FAN_MODE_AUTO_OK`] when healthy)
    #[serde(deserialize_with = "number_as_i64")]
    pub fan_mode: i64,
    /// Human description of `fan_mode`
    #[serde(deserialize_with = "null_as_default")]
    pub fan_mode_desc: String,
    /// Persisted mode (`auto` / `manual`)
    #[serde(deserialize_with = "null_as_default")]
    pub uci_mode: String,
    /// Persisted curve preset
    #[serde(deserialize_with = "null_as_default")]
    pub uci_preset: String,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_cpu: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_board: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_phy1: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub temp_phy2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wifi_24g: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wifi_5g: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub wifi_6g: f64,
}

impl StatusSnapshot {
    /// Parse a raw response body. A `null` body is the all-default snapshot.
    pub fn from_value(value: serde_json::Value) -> crate::Result<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Temperature of a single channel in degrees Celsius
    pub fn temperature(&self, channel: SensorChannel) -> f64 {
        match channel {
            SensorChannel::Cpu => self.temp_cpu,
            SensorChannel::Board => self.temp_board,
            SensorChannel::Phy1 => self.temp_phy1,
            SensorChannel::Phy2 => self.temp_phy2,
            SensorChannel::Wifi24g => self.wifi_24g,
            SensorChannel::Wifi5g => self.wifi_5g,
            SensorChannel::Wifi6g => self.wifi_6g,
        }
    }

    /// All channel temperatures in display order
    pub fn temperatures(&self) -> impl Iterator<Item = (SensorChannel, f64)> + '_ {
        SensorChannel::ALL
            .into_iter()
            .map(move |channel| (channel, self.temperature(channel)))
    }

    /// Persisted mode, if the device reported exactly `auto` or `manual`
    pub fn mode(&self) -> Option<Mode> {
        match self.uci_mode.as_str() {
            "auto" => Some(Mode::Auto),
            "manual" => Some(Mode::Manual),
            _ => None,
        }
    }

    /// Whether the automatic control loop reports success
    pub fn is_auto_ok(&self) -> bool {
        self.fan_mode == FAN_MODE_AUTO_OK
    }
}
