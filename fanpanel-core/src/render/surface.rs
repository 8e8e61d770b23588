//! Drawing surfaces
//!
//! Renderers talk to a [`Surface`], a minimal 2-D canvas abstraction. The
//! [`DisplayList`] implementation records every command so the frame can be
//! inspected, compared, or exported (see [`super::svg`]).

use std::fmt;

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const GRID: Color = Color::rgb(0xe0, 0xe0, 0xe0);
    pub const AXIS: Color = Color::rgb(0x33, 0x33, 0x33);
    pub const GRAY: Color = Color::rgb(0x99, 0x99, 0x99);
    pub const GREEN: Color = Color::rgb(0x28, 0xa7, 0x45);
    pub const BLUE: Color = Color::rgb(0x00, 0x7b, 0xff);
    pub const RED: Color = Color::rgb(0xdc, 0x35, 0x45);
    pub const PURPLE: Color = Color::rgb(0x6f, 0x42, 0xc1);
    pub const YELLOW: Color = Color::rgb(0xff, 0xc1, 0x07);
    pub const ORANGE: Color = Color::rgb(0xfd, 0x7e, 0x14);
    pub const TEAL: Color = Color::rgb(0x17, 0xa2, 0xb8);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or the short `#rgb` form.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();

        match digits.len() {
            6 => Some(Self::rgb(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
            )),
            3 => {
                let expand = |i: usize| channel(&digits[i..i + 1]).map(|v| v * 17);
                Some(Self::rgb(expand(0)?, expand(1)?, expand(2)?))
            }
            _ => None,
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// A point in pixel space (origin top-left, y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Line styling for stroked paths
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    /// Opacity in `[0, 1]`
    pub alpha: f64,
}

impl Stroke {
    pub const fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            alpha: 1.0,
        }
    }
}

/// Horizontal anchoring of a text run relative to its position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// Text styling. Rotation is in degrees, counter-clockwise negative, about the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    pub align: TextAlign,
    pub size_px: f64,
    pub rotation_deg: f64,
}

impl TextStyle {
    pub const fn new(color: Color, align: TextAlign) -> Self {
        Self {
            color,
            align,
            size_px: 12.0,
            rotation_deg: 0.0,
        }
    }

    pub const fn rotated(mut self, degrees: f64) -> Self {
        self.rotation_deg = degrees;
        self
    }
}

/// A fixed-size 2-D drawing target.
pub trait Surface {
    /// Width in pixels
    fn width(&self) -> f64;

    /// Height in pixels
    fn height(&self) -> f64;

    /// Start a new frame, discarding everything drawn before.
    fn begin_frame(&mut self);

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color);

    /// Stroke an open polyline through `points` in order.
    fn stroke_path(&mut self, points: &[Point], stroke: Stroke);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, alpha: f64);

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle);
}

/// A single recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        origin: Point,
        width: f64,
        height: f64,
        color: Color,
    },
    Path {
        points: Vec<Point>,
        stroke: Stroke,
    },
    Circle {
        center: Point,
        radius: f64,
        color: Color,
        alpha: f64,
    },
    Text {
        text: String,
        at: Point,
        style: TextStyle,
    },
}

/// Recording surface: keeps the commands of the current frame in order.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    /// Commands of the current frame, back to front
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// All stroked paths of the current frame
    pub fn paths(&self) -> impl Iterator<Item = (&[Point], &Stroke)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Path { points, stroke } => Some((points.as_slice(), stroke)),
            _ => None,
        })
    }

    /// All circles of the current frame
    pub fn circles(&self) -> impl Iterator<Item = (&Point, f64, &Color)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
                ..
            } => Some((center, *radius, color)),
            _ => None,
        })
    }

    /// All text runs of the current frame
    pub fn texts(&self) -> impl Iterator<Item = (&str, &Point, &TextStyle)> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, at, style } => Some((text.as_str(), at, style)),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn begin_frame(&mut self) {
        self.commands.clear();
    }

    fn fill_rect(&mut self, origin: Point, width: f64, height: f64, color: Color) {
        self.commands.push(DrawCommand::FillRect {
            origin,
            width,
            height,
            color,
        });
    }

    fn stroke_path(&mut self, points: &[Point], stroke: Stroke) {
        // A single moveTo strokes nothing
        if points.len() < 2 {
            return;
        }
        self.commands.push(DrawCommand::Path {
            points: points.to_vec(),
            stroke,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color, alpha: f64) {
        self.commands.push(DrawCommand::Circle {
            center,
            radius,
            color,
            alpha,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            style,
        });
    }
}
