use glam::{Mat4, Vec3};
use kinetic_model::{Animated, RepeaterTransform, Transform, Vector2D};

use crate::animated::{AnimatedExt, MotionProperty, Property};
use crate::Error;

fn mat4(anchor: Vector2D, position: Vector2D, scale: Vector2D, rotation: f32) -> Mat4 {
    let anchor = Vec3::new(anchor.x, anchor.y, 0.0);
    let position = Vec3::new(position.x, position.y, 0.0);
    let scale = Vec3::new(scale.x, scale.y, 1.0);
    Mat4::from_translation(position)
        * Mat4::from_rotation_z(rotation * std::f32::consts::PI / 180.0)
        * Mat4::from_scale(scale)
        * Mat4::from_translation(-anchor)
}

/// A layer or group transform, lowered from the document model into
/// sampleable properties. The matrix composes as translate, rotate,
/// scale, then the negated anchor.
pub struct TransformProperty {
    anchor: MotionProperty,
    position: MotionProperty,
    scale: Property<Vector2D>,
    rotation: Property<f32>,
    pub opacity: Property<f32>,
    auto_orient: Option<Animated<Vector2D>>,
}

impl TransformProperty {
    pub fn new(transform: Transform, auto_orient: bool) -> Self {
        let position = transform.position.unwrap_or_default();
        let auto_orient = if auto_orient && position.is_animated() {
            Some(position.clone())
        } else {
            None
        };
        TransformProperty {
            anchor: MotionProperty::new(transform.anchor.unwrap_or_default()),
            position: MotionProperty::new(position),
            scale: Property::new(transform.scale),
            rotation: Property::new(transform.rotation),
            opacity: Property::new(transform.opacity),
            auto_orient,
        }
    }

    pub fn is_animated(&self) -> bool {
        self.anchor.is_animated()
            || self.position.is_animated()
            || self.scale.is_animated()
            || self.rotation.is_animated()
    }

    /// Extra rotation from the motion direction when auto-orient is on:
    /// the angle of the active keyframe's travel vector.
    fn orient_angle(&self, frame: f64) -> f32 {
        let Some(position) = self.auto_orient.as_ref() else {
            return 0.0;
        };
        let keyframes = &position.keyframes;
        let frame = frame
            .max(keyframes[0].start_frame)
            .min(keyframes[keyframes.len() - 1].start_frame);
        keyframes
            .iter()
            .find(|keyframe| {
                frame >= keyframe.start_frame
                    && keyframe.end_frame.map(|end| frame < end).unwrap_or(true)
            })
            .and_then(|keyframe| {
                let end = keyframe.end_value?;
                Some((end - keyframe.start_value).angle_from_x_axis().to_degrees())
            })
            .unwrap_or(0.0)
    }

    pub fn matrix(&self, frame: f64) -> Result<Mat4, Error> {
        let anchor = self.anchor.sample(frame)?;
        let position = self.position.sample(frame)?;
        let mut scale = self.scale.sample(frame)? / 100.0;
        let rotation = self.rotation.sample(frame)? + self.orient_angle(frame);
        // A zero scale axis would collapse the matrix and break hit
        // regions downstream.
        if scale.x == 0.0 {
            scale.x = f32::EPSILON;
        }
        if scale.y == 0.0 {
            scale.y = f32::EPSILON;
        }
        Ok(mat4(anchor, position, scale, rotation))
    }

    pub fn set_position_provider(
        &mut self,
        provider: crate::animated::ValueProvider<Vector2D>,
    ) {
        self.position.set_value_provider(provider);
    }
}

/// The per-copy transform of a repeater. Copy `n` applies the transform
/// `n + offset` times: translation and rotation accumulate linearly,
/// scale compounds, and opacity sweeps from the start to the end value
/// across the copy range.
pub struct RepeaterTransformProperty {
    anchor: MotionProperty,
    position: MotionProperty,
    scale: Property<Vector2D>,
    rotation: Property<f32>,
    start_opacity: Property<f32>,
    end_opacity: Property<f32>,
}

impl RepeaterTransformProperty {
    pub fn new(transform: RepeaterTransform) -> Self {
        RepeaterTransformProperty {
            anchor: MotionProperty::new(transform.anchor.unwrap_or_default()),
            position: MotionProperty::new(transform.position.unwrap_or_default()),
            scale: Property::new(transform.scale),
            rotation: Property::new(transform.rotation),
            start_opacity: Property::new(transform.start_opacity),
            end_opacity: Property::new(transform.end_opacity),
        }
    }

    pub fn matrix_for(&self, frame: f64, amount: f32) -> Result<Mat4, Error> {
        let anchor = self.anchor.sample(frame)?;
        let position = self.position.sample(frame)? * amount;
        let base = self.scale.sample(frame)? / 100.0;
        let scale = Vector2D::new(base.x.powf(amount), base.y.powf(amount));
        let rotation = self.rotation.sample(frame)? * amount;
        Ok(mat4(anchor, position, scale, rotation))
    }

    /// Opacity for copy `index` of `copies`, in `[0,1]`.
    pub fn opacity_for(&self, frame: f64, index: usize, copies: usize) -> Result<f32, Error> {
        let start = self.start_opacity.sample(frame)? / 100.0;
        let end = self.end_opacity.sample(frame)? / 100.0;
        let t = if copies <= 1 {
            0.0
        } else {
            index as f32 / (copies - 1) as f32
        };
        Ok(start + (end - start) * t)
    }
}
