use kinetic_model::{channel_to_gamma, channel_to_linear, GradientStop, PathGeometry, Rgb, Rgba, Vector2D};

use crate::Error;

/// Interpolation between two endpoint values of the same type.
///
/// `check` validates that the endpoints are structurally compatible before
/// `lerp` runs; the default accepts everything. `lerp(other, 0)` must equal
/// `self` and `lerp(other, 1)` must equal `other` exactly.
pub trait Lerp: Sized {
    fn lerp(&self, other: &Self, t: f32) -> Self;

    fn check(&self, _other: &Self) -> Result<(), Error> {
        Ok(())
    }
}

impl Lerp for f32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for i32 {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        (*self as f32 + (other - self) as f32 * t).round() as i32
    }
}

impl Lerp for Vector2D {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        *self + (*other - *self) * t
    }
}

impl Lerp for Rgb {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        Rgb {
            r: blend_channel(self.r, other.r, t),
            g: blend_channel(self.g, other.g, t),
            b: blend_channel(self.b, other.b, t),
        }
    }
}

impl Lerp for Rgba {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t <= 0.0 {
            return *self;
        }
        if t >= 1.0 {
            return *other;
        }
        Rgba {
            r: blend_channel(self.r, other.r, t),
            g: blend_channel(self.g, other.g, t),
            b: blend_channel(self.b, other.b, t),
            // Alpha is coverage, not light; it blends linearly.
            a: (self.a as f32 + (other.a as f32 - self.a as f32) * t).round() as u8,
        }
    }
}

/// Channels are stored gamma-encoded; blending happens in linear light to
/// avoid the dark bands naive sRGB averaging produces.
fn blend_channel(a: u8, b: u8, t: f32) -> u8 {
    let a = channel_to_linear(a);
    let b = channel_to_linear(b);
    channel_to_gamma(a + (b - a) * t)
}

impl Lerp for PathGeometry {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        let mut result = self.clone();
        for (v, o) in result.vertices.iter_mut().zip(other.vertices.iter()) {
            *v = Lerp::lerp(v, o, t);
        }
        for (v, o) in result.in_tangents.iter_mut().zip(other.in_tangents.iter()) {
            *v = Lerp::lerp(v, o, t);
        }
        for (v, o) in result.out_tangents.iter_mut().zip(other.out_tangents.iter()) {
            *v = Lerp::lerp(v, o, t);
        }
        result
    }

    fn check(&self, other: &Self) -> Result<(), Error> {
        if self.segments() == other.segments() {
            Ok(())
        } else {
            Err(Error::PathSegmentMismatch {
                start: self.segments(),
                end: other.segments(),
            })
        }
    }
}

impl Lerp for Vec<GradientStop> {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.iter()
            .zip(other)
            .map(|(a, b)| GradientStop {
                offset: a.offset.lerp(&b.offset, t),
                color: a.color.lerp(&b.color, t),
            })
            .collect()
    }

    fn check(&self, other: &Self) -> Result<(), Error> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(Error::GradientStopMismatch {
                start: self.len(),
                end: other.len(),
            })
        }
    }
}
