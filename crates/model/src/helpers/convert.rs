use crate::{PathGeometry, Value, Vector2D};

/// Conversion from the loosely-typed keyframe payload into a concrete
/// property value. Returns `None` when the payload has the wrong shape,
/// which the reader reports as a parse issue.
pub trait FromTo<T>: Sized {
    fn from(v: T) -> Option<Self>;
}

impl FromTo<Value> for Vector2D {
    fn from(v: Value) -> Option<Self> {
        let v = v.as_f32_vec()?;
        Some(Vector2D::new(
            *v.first()?,
            v.get(1).cloned().unwrap_or(0.0),
        ))
    }
}

impl FromTo<Value> for f32 {
    fn from(v: Value) -> Option<Self> {
        let v = v.as_f32_vec()?;
        v.first().cloned()
    }
}

impl FromTo<Value> for Vec<f32> {
    fn from(v: Value) -> Option<Self> {
        v.as_f32_vec()
    }
}

impl FromTo<Value> for PathGeometry {
    fn from(v: Value) -> Option<Self> {
        match v {
            Value::Bezier(b) => Some(b),
            Value::ComplexBezier(mut b) => {
                if b.is_empty() {
                    None
                } else {
                    Some(b.swap_remove(0))
                }
            }
            _ => None,
        }
    }
}
