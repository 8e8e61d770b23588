//! Fan curve model
//!
//! A curve maps temperature (°C) to a PWM duty value (0-255). The device
//! reports every stored curve through `getAllCurves` as a map of preset name
//! to an ordered list of points; [`CurveSet`] keeps that order because it is
//! also the order in which the curves are overlaid on the chart.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::FanPanelError;
use crate::render::Color;

/// Highest temperature on the chart's x axis
pub const TEMP_MAX: f64 = 100.0;

/// Highest PWM duty value
pub const PWM_MAX: u32 = 255;

/// A single point on a fan curve mapping temperature to PWM.
///
/// Values outside `[0, 100] × [0, 255]` are representable; the renderer
/// extrapolates them rather than rejecting them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Temperature in Celsius
    pub temp: f64,
    /// PWM duty (0-255)
    pub pwm: u32,
}

impl CurvePoint {
    pub fn new(temp: f64, pwm: u32) -> Self {
        Self { temp, pwm }
    }
}

/// The known curve presets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Quiet,
    #[default]
    Balanced,
    Performance,
    Custom,
}

impl Preset {
    /// All presets in legend / selector order
    pub const ALL: [Preset; 4] = [
        Preset::Quiet,
        Preset::Balanced,
        Preset::Performance,
        Preset::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Quiet => "quiet",
            Preset::Balanced => "balanced",
            Preset::Performance => "performance",
            Preset::Custom => "custom",
        }
    }

    /// Capitalized display name
    pub fn label(&self) -> &'static str {
        match self {
            Preset::Quiet => "Quiet",
            Preset::Balanced => "Balanced",
            Preset::Performance => "Performance",
            Preset::Custom => "Custom",
        }
    }

    /// Selector description
    pub fn description(&self) -> &'static str {
        match self {
            Preset::Quiet => "Quiet - Lower speeds, higher temps",
            Preset::Balanced => "Balanced - Good mix of noise and cooling",
            Preset::Performance => "Performance - Higher speeds, lower temps",
            Preset::Custom => "Custom - Define your own curve",
        }
    }

    /// Stroke color used on the chart and in the legend
    pub fn color(&self) -> Color {
        match self {
            Preset::Quiet => Color::GREEN,
            Preset::Balanced => Color::BLUE,
            Preset::Performance => Color::RED,
            Preset::Custom => Color::PURPLE,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = FanPanelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quiet" => Ok(Preset::Quiet),
            "balanced" => Ok(Preset::Balanced),
            "performance" => Ok(Preset::Performance),
            "custom" => Ok(Preset::Custom),
            other => Err(FanPanelError::UnknownPreset(other.to_string())),
        }
    }
}

/// Color for an arbitrary preset name; only exact preset names get a color,
/// everything else is drawn gray.
pub fn preset_color(name: &str) -> Color {
    Preset::ALL
        .iter()
        .find(|preset| preset.as_str() == name)
        .map(Preset::color)
        .unwrap_or(Color::GRAY)
}

/// Upper-case the first character, leave the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// One curve prepared for drawing
#[derive(Debug, Clone, PartialEq)]
pub struct CurveLayer<'a> {
    pub name: &'a str,
    pub points: &'a [CurvePoint],
    pub color: Color,
    pub active: bool,
}

/// Preset name to curve mapping, in the order the device listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveSet {
    entries: Vec<(String, Vec<CurvePoint>)>,
}

impl CurveSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a curve. Replacing an existing name keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, points: Vec<CurvePoint>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = points,
            None => self.entries.push((name, points)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, points: Vec<CurvePoint>) -> Self {
        self.insert(name, points);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[CurvePoint]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, points)| points.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[CurvePoint])> {
        self.entries
            .iter()
            .map(|(name, points)| (name.as_str(), points.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A copy with the `custom` curve replaced by user-entered points.
    pub fn with_custom(&self, points: Vec<CurvePoint>) -> Self {
        self.clone().with(Preset::Custom.as_str(), points)
    }

    /// Prepare every curve for drawing against the given active preset.
    ///
    /// Layers come back in source order; the input is never modified and no
    /// cross-preset consistency is checked.
    pub fn layers(&self, active_preset: &str) -> Vec<CurveLayer<'_>> {
        self.iter()
            .map(|(name, points)| CurveLayer {
                name,
                points,
                color: preset_color(name),
                active: name == active_preset,
            })
            .collect()
    }
}

impl Serialize for CurveSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, points) in &self.entries {
            map.serialize_entry(name, points)?;
        }
        map.end()
    }
}

// Deserialize as a map while keeping the key order of the source document.
impl<'de> Deserialize<'de> for CurveSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CurveSetVisitor;

        impl<'de> Visitor<'de> for CurveSetVisitor {
            type Value = CurveSet;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of preset name to a list of {temp, pwm} points")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                Ok(CurveSet::default())
            }

            fn visit_map<M>(self, mut access: M) -> Result<Self::Value, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut set = CurveSet::default();
                while let Some((name, points)) =
                    access.next_entry::<String, Option<Vec<CurvePoint>>>()?
                {
                    set.insert(name, points.unwrap_or_default());
                }
                Ok(set)
            }
        }

        deserializer.deserialize_any(CurveSetVisitor)
    }
}
