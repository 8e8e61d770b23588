//! Data-space to pixel-space mapping for the curve chart

use super::surface::Point;
use crate::curves::{CurvePoint, PWM_MAX, TEMP_MAX};

/// Default canvas width in pixels
pub const DEFAULT_WIDTH: f64 = 500.0;

/// Default canvas height in pixels
pub const DEFAULT_HEIGHT: f64 = 300.0;

/// Space reserved on every side for axes and labels
pub const MARGIN: f64 = 40.0;

/// Affine mapping of `[0, 100] °C × [0, 255] PWM` onto the plot area.
///
/// Inputs outside the domain are extrapolated along the same lines, never
/// clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartGeometry {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for ChartGeometry {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

impl ChartGeometry {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: MARGIN,
        }
    }

    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// `x(temp) = M + (temp / 100) * (W - 2M)`
    pub fn x(&self, temp: f64) -> f64 {
        self.margin + (temp / TEMP_MAX) * (self.width - 2.0 * self.margin)
    }

    /// `y(pwm) = (H - M) - (pwm / 255) * (H - 2M)`
    pub fn y(&self, pwm: f64) -> f64 {
        (self.height - self.margin) - (pwm / PWM_MAX as f64) * (self.height - 2.0 * self.margin)
    }

    pub fn map(&self, point: &CurvePoint) -> Point {
        Point::new(self.x(point.temp), self.y(point.pwm as f64))
    }

    pub fn left(&self) -> f64 {
        self.margin
    }

    pub fn right(&self) -> f64 {
        self.width - self.margin
    }

    pub fn top(&self) -> f64 {
        self.margin
    }

    pub fn bottom(&self) -> f64 {
        self.height - self.margin
    }
}
