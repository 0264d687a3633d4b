//! Samples animatable properties at a frame position: keyframe lookup,
//! easing application, and arc-length-parametrized motion paths for
//! point-valued properties with spatial control points.

use std::sync::OnceLock;

use flo_curves::bezier::Curve;
use flo_curves::{BezierCurve, BezierCurveFactory, Coord2};
use kinetic_model::{Animated, Easing, KeyFrame, Vector2D};

use crate::easing;
use crate::lerp::Lerp;
use crate::Error;

/// Where a frame fell inside an animatable property's keyframe sequence.
enum Span<'a, T> {
    /// Before the first keyframe, or at/after an open-ended terminal one.
    Clamped(&'a T),
    /// Inside a closed keyframe span.
    Inside { keyframe: &'a KeyFrame<T>, index: usize, end_frame: f64 },
}

fn locate<T>(keyframes: &[KeyFrame<T>], frame: f64) -> Span<'_, T> {
    let first = &keyframes[0];
    if frame < first.start_frame {
        return Span::Clamped(&first.start_value);
    }
    for (index, keyframe) in keyframes.iter().enumerate() {
        match keyframe.end_frame {
            Some(end) if frame < end => {
                if frame >= keyframe.start_frame {
                    return Span::Inside { keyframe, index, end_frame: end };
                }
            }
            None if frame >= keyframe.start_frame => {
                return Span::Clamped(&keyframe.start_value);
            }
            _ => {}
        }
    }
    // Past the last closed keyframe: hold its final value.
    let last = &keyframes[keyframes.len() - 1];
    Span::Clamped(last.end_value.as_ref().unwrap_or(&last.start_value))
}

/// Local progress of `frame` within a span, clamped to `[0,1]`; an empty
/// span resolves to 1 so the value lands on the endpoint.
fn local_progress(start: f64, end: f64, frame: f64) -> f64 {
    if end <= start {
        1.0
    } else {
        ((frame - start) / (end - start)).clamp(0.0, 1.0)
    }
}

fn sample_keyframe<T: Clone + Lerp>(
    keyframe: &KeyFrame<T>,
    end_frame: f64,
    frame: f64,
) -> Result<T, Error> {
    // A hold keyframe never leaves its start value inside the span.
    if keyframe.easing == Easing::Hold {
        return Ok(keyframe.start_value.clone());
    }
    let end_value = keyframe
        .end_value
        .as_ref()
        .ok_or(Error::MissingEndValue(end_frame))?;
    keyframe.start_value.check(end_value)?;
    let shaped = easing::shape(
        &keyframe.easing,
        local_progress(keyframe.start_frame, end_frame, frame),
    );
    Ok(keyframe.start_value.lerp(end_value, shaped as f32))
}

/// Sampling over [`Animated`] properties.
pub trait AnimatedExt {
    type Target;

    fn initial_value(&self) -> Self::Target;
    fn sample(&self, frame: f64) -> Result<Self::Target, Error>;
    fn is_animated(&self) -> bool;
}

impl<T: Clone + Lerp> AnimatedExt for Animated<T> {
    type Target = T;

    fn initial_value(&self) -> T {
        self.keyframes[0].start_value.clone()
    }

    fn sample(&self, frame: f64) -> Result<T, Error> {
        if !self.is_animated() {
            return Ok(self.initial_value());
        }
        match locate(&self.keyframes, frame) {
            Span::Clamped(value) => Ok(value.clone()),
            Span::Inside { keyframe, end_frame, .. } => {
                sample_keyframe(keyframe, end_frame, frame)
            }
        }
    }

    fn is_animated(&self) -> bool {
        let first = &self.keyframes[0];
        self.keyframes.len() > 1 || first.end_value.is_some() || first.end_frame.is_some()
    }
}

/// Runtime-pluggable value override, consulted before keyframe
/// interpolation.
pub type ValueProvider<T> = Box<dyn Fn(f64) -> Option<T> + Send + Sync>;

/// An evaluable property: the parsed keyframes plus an optional override
/// strategy. Built once per layer and re-sampled every frame.
pub struct Property<T> {
    animated: Animated<T>,
    provider: Option<ValueProvider<T>>,
}

impl<T: Clone + Lerp> Property<T> {
    pub fn new(animated: Animated<T>) -> Self {
        Property {
            animated,
            provider: None,
        }
    }

    pub fn fixed(value: T) -> Self {
        Property::new(Animated::from_value(value))
    }

    pub fn set_value_provider(&mut self, provider: ValueProvider<T>) {
        self.provider = Some(provider);
    }

    pub fn clear_value_provider(&mut self) {
        self.provider = None;
    }

    pub fn sample(&self, frame: f64) -> Result<T, Error> {
        if let Some(value) = self.provider.as_ref().and_then(|p| p(frame)) {
            return Ok(value);
        }
        self.animated.sample(frame)
    }

    pub fn is_animated(&self) -> bool {
        self.animated.is_animated()
    }
}

/// A point-valued property whose keyframes may travel along curved motion
/// paths. The synthesized path and its arc-length table are memoized per
/// keyframe; the memo is the only lazily-written state and is not
/// observable.
pub struct MotionProperty {
    animated: Animated<Vector2D>,
    provider: Option<ValueProvider<Vector2D>>,
    paths: Vec<OnceLock<Option<MotionPath>>>,
}

impl MotionProperty {
    pub fn new(animated: Animated<Vector2D>) -> Self {
        let paths = (0..animated.keyframes.len())
            .map(|_| OnceLock::new())
            .collect();
        MotionProperty {
            animated,
            provider: None,
            paths,
        }
    }

    pub fn fixed(value: Vector2D) -> Self {
        MotionProperty::new(Animated::from_value(value))
    }

    pub fn set_value_provider(&mut self, provider: ValueProvider<Vector2D>) {
        self.provider = Some(provider);
    }

    pub fn is_animated(&self) -> bool {
        self.animated.is_animated()
    }

    pub fn sample(&self, frame: f64) -> Result<Vector2D, Error> {
        if let Some(value) = self.provider.as_ref().and_then(|p| p(frame)) {
            return Ok(value);
        }
        match locate(&self.animated.keyframes, frame) {
            Span::Clamped(value) => Ok(*value),
            Span::Inside { keyframe, index, end_frame } => {
                if keyframe.easing == Easing::Hold {
                    return Ok(keyframe.start_value);
                }
                let end_value = keyframe
                    .end_value
                    .ok_or(Error::MissingEndValue(end_frame))?;
                let shaped = easing::shape(
                    &keyframe.easing,
                    local_progress(keyframe.start_frame, end_frame, frame),
                );
                let path = self.paths[index].get_or_init(|| MotionPath::build(keyframe));
                Ok(match path {
                    Some(path) => path.position_at(shaped),
                    None => Lerp::lerp(&keyframe.start_value, &end_value, shaped as f32),
                })
            }
        }
    }
}

const ARC_LENGTH_STEPS: usize = 32;

/// A single cubic bezier motion path between two keyframe positions, with
/// a sampled cumulative arc-length table so progress maps to distance
/// travelled rather than the bezier parameter.
struct MotionPath {
    curve: Curve<Coord2>,
    lengths: [f64; ARC_LENGTH_STEPS + 1],
    total: f64,
}

impl MotionPath {
    /// The spatial tangents are stored relative to the endpoints, the way
    /// the document encodes them.
    fn build(keyframe: &KeyFrame<Vector2D>) -> Option<Self> {
        let end = keyframe.end_value?;
        let start = keyframe.start_value;
        let (out_tangent, in_tangent) = match (keyframe.spatial_out, keyframe.spatial_in) {
            (None, None) => return None,
            (o, i) => (
                o.unwrap_or_else(Vector2D::zero),
                i.unwrap_or_else(Vector2D::zero),
            ),
        };
        if out_tangent == Vector2D::zero() && in_tangent == Vector2D::zero() {
            return None;
        }
        let curve = Curve::from_points(
            Coord2(start.x as f64, start.y as f64),
            (
                Coord2((start.x + out_tangent.x) as f64, (start.y + out_tangent.y) as f64),
                Coord2((end.x + in_tangent.x) as f64, (end.y + in_tangent.y) as f64),
            ),
            Coord2(end.x as f64, end.y as f64),
        );
        let mut lengths = [0.0; ARC_LENGTH_STEPS + 1];
        let mut previous = curve.point_at_pos(0.0);
        let mut total = 0.0;
        for (step, slot) in lengths.iter_mut().enumerate().skip(1) {
            let t = step as f64 / ARC_LENGTH_STEPS as f64;
            let point = curve.point_at_pos(t);
            total += ((point.0 - previous.0).powi(2) + (point.1 - previous.1).powi(2)).sqrt();
            *slot = total;
            previous = point;
        }
        Some(MotionPath {
            curve,
            lengths,
            total,
        })
    }

    /// Position at an arc-length fraction of the whole path.
    fn position_at(&self, fraction: f64) -> Vector2D {
        let t = if self.total <= 0.0 {
            fraction
        } else {
            let target = fraction.clamp(0.0, 1.0) * self.total;
            match self
                .lengths
                .iter()
                .position(|length| *length >= target)
            {
                Some(0) | None => fraction,
                Some(step) => {
                    let below = self.lengths[step - 1];
                    let segment = self.lengths[step] - below;
                    let inner = if segment <= 0.0 {
                        0.0
                    } else {
                        (target - below) / segment
                    };
                    (step as f64 - 1.0 + inner) / ARC_LENGTH_STEPS as f64
                }
            }
        };
        let point = self.curve.point_at_pos(t.clamp(0.0, 1.0));
        Vector2D::new(point.0 as f32, point.1 as f32)
    }
}
