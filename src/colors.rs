//! Row and highlight colors.
//!
//! Colors are plain 24-bit RGB values. On disk they are written as `#rrggbb`
//! strings; `#rgb` shorthand is accepted when reading.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);
    pub const BLACK: Rgb = Rgb(0, 0, 0);

    pub fn r(self) -> u8 {
        self.0
    }

    pub fn g(self) -> u8 {
        self.1
    }

    pub fn b(self) -> u8 {
        self.2
    }

    /// Format as `#rrggbb`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_color(&s).map_err(serde::de::Error::custom)
    }
}

/// Parse a color string into an [`Rgb`].
///
/// Supports `#rrggbb`, `#rgb` and the names `white` and `black`.
pub fn parse_color(s: &str) -> Result<Rgb, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }
    match s.to_lowercase().as_str() {
        "white" => Ok(Rgb::WHITE),
        "black" => Ok(Rgb::BLACK),
        _ => Err(format!(
            "unknown color: '{}'. Use hex (#rrggbb / #rgb), white or black",
            s
        )),
    }
}

fn parse_hex_color(hex: &str) -> Result<Rgb, String> {
    let invalid = || format!("invalid hex color: #{}", hex);
    if !hex.is_ascii() {
        return Err(invalid());
    }
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
            let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
            let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
            Ok(Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).map_err(|_| invalid())?;
            let g = u8::from_str_radix(&hex[1..2], 16).map_err(|_| invalid())?;
            let b = u8::from_str_radix(&hex[2..3], 16).map_err(|_| invalid())?;
            Ok(Rgb(r * 17, g * 17, b * 17))
        }
        _ => Err(invalid()),
    }
}

/// Background and foreground pair used to paint a row or a highlight run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextColor {
    pub back: Rgb,
    pub fore: Rgb,
}

impl TextColor {
    pub const fn new(back: Rgb, fore: Rgb) -> Self {
        Self { back, fore }
    }

    /// Window colors used when no rule colors a row.
    pub const fn window() -> Self {
        Self::new(Rgb::WHITE, Rgb::BLACK)
    }

    /// Colors of the literal search highlight (id 1).
    pub const fn search_highlight() -> Self {
        Self::new(Rgb(255, 255, 55), Rgb::BLACK)
    }

    /// Colors of the text selection pseudo-span.
    pub const fn selection() -> Self {
        Self::new(Rgb(128, 255, 255), Rgb::BLACK)
    }
}

impl Default for TextColor {
    fn default() -> Self {
        Self::window()
    }
}

/// Convert HSV (all components in `0.0..=1.0`) to RGB.
pub fn hsv_to_rgb(h: f64, s: f64, v: f64) -> Rgb {
    let scale = |x: f64| (x * 256.0).floor().clamp(0.0, 255.0) as u8;
    let hi = (h * 6.0).floor() as i32;
    let f = h * 6.0 - f64::from(hi);
    let p = v * (1.0 - s);
    let q = v * (1.0 - f * s);
    let t = v * (1.0 - (1.0 - f) * s);
    match hi {
        0 => Rgb(scale(v), scale(t), scale(p)),
        1 => Rgb(scale(q), scale(v), scale(p)),
        2 => Rgb(scale(p), scale(v), scale(t)),
        3 => Rgb(scale(p), scale(q), scale(v)),
        4 => Rgb(scale(t), scale(p), scale(v)),
        5 => Rgb(scale(v), scale(p), scale(q)),
        _ => Rgb::BLACK,
    }
}

/// Hands out well separated colors for new filters.
///
/// Walks the hue circle in golden-ratio steps so consecutive colors never
/// land next to each other.
#[derive(Debug, Clone)]
pub struct ColorGenerator {
    hue: f64,
}

impl ColorGenerator {
    const GOLDEN_RATIO_CONJUGATE: f64 = 0.618_033_988_749_895;

    pub fn new(seed: f64) -> Self {
        Self {
            hue: seed.rem_euclid(1.0),
        }
    }

    /// Seed the hue from the wall clock.
    pub fn from_clock() -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos())
            .unwrap_or(0);
        Self::new(f64::from(nanos) / 1_000_000_000.0)
    }

    fn next_color(&mut self, s: f64, v: f64) -> Rgb {
        self.hue += Self::GOLDEN_RATIO_CONJUGATE;
        if self.hue > 1.0 {
            self.hue -= 1.0;
        }
        hsv_to_rgb(self.hue, s, v)
    }

    /// A light, unsaturated color suited as a row background.
    pub fn back_color(&mut self) -> Rgb {
        self.next_color(0.5, 0.95)
    }

    /// A darker, saturated color suited as text on white.
    pub fn text_color(&mut self) -> Rgb {
        self.next_color(0.9, 0.7)
    }
}

impl Default for ColorGenerator {
    fn default() -> Self {
        Self::from_clock()
    }
}
