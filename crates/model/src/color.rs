use std::str::FromStr;

use crate::helpers::{FromTo, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn new_f32(r: f32, g: f32, b: f32, a: f32) -> Rgba {
        Rgba {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (b * 255.0).round() as u8,
            a: (a * 255.0).round() as u8,
        }
    }

    pub fn new_u8(r: u8, g: u8, b: u8, a: u8) -> Rgba {
        Rgba { r, g, b, a }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 255,
        }
    }
}

impl FromStr for Rgba {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        if s.starts_with('#') {
            chars.next();
        }
        let (rgb, a) = read_color::rgb_maybe_a(&mut chars).ok_or(())?;
        Ok(Rgba::new_u8(rgb[0], rgb[1], rgb[2], a.unwrap_or(255)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub fn new_f32(r: f32, g: f32, b: f32) -> Rgb {
        Rgb {
            r: (r * 255.0).round() as u8,
            g: (g * 255.0).round() as u8,
            b: (b * 255.0).round() as u8,
        }
    }

    pub fn new_u8(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }
}

/// Decode an sRGB-encoded channel into linear light.
pub fn channel_to_linear(c: u8) -> f32 {
    let c = c as f32 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Re-encode linear light into an sRGB channel.
pub fn channel_to_gamma(l: f32) -> u8 {
    let l = l.clamp(0.0, 1.0);
    let c = if l <= 0.0031308 {
        l * 12.92
    } else {
        1.055 * l.powf(1.0 / 2.4) - 0.055
    };
    (c * 255.0).round() as u8
}

impl FromTo<Value> for Rgba {
    fn from(v: Value) -> Option<Self> {
        let v = v.as_f32_vec()?;
        if v.len() < 3 {
            return None;
        }
        // Channels above 1 mean the document carries raw bytes.
        Some(if v.iter().any(|c| *c > 1.0) {
            Rgba::new_u8(
                v[0] as u8,
                v[1] as u8,
                v[2] as u8,
                v.get(3).cloned().unwrap_or(255.0) as u8,
            )
        } else {
            Rgba::new_f32(v[0], v[1], v[2], v.get(3).cloned().unwrap_or(1.0))
        })
    }
}

impl FromTo<Value> for Rgb {
    fn from(v: Value) -> Option<Self> {
        let v = v.as_f32_vec()?;
        if v.len() < 3 {
            return None;
        }
        Some(if v.iter().any(|c| *c > 1.0) {
            Rgb::new_u8(v[0] as u8, v[1] as u8, v[2] as u8)
        } else {
            Rgb::new_f32(v[0], v[1], v[2])
        })
    }
}
