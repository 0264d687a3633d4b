use serde::Deserialize;

use crate::{Easing, EasingHandle, KeyFrame, Value, Vector2D};

use super::FromTo;

/// A property value as it appears in the document: either a plain static
/// value or an array of keyframes in one of several legacy encodings.
#[derive(Deserialize)]
#[serde(transparent)]
pub(crate) struct AnimatedHelper {
    data: TolerantAnimatedHelper,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TolerantAnimatedHelper {
    Plain(Value),
    Keyframes(Vec<LegacyTolerantKeyFrame>),
}

fn default_none<T>() -> Option<T> {
    None
}

/// Tangent pair of a temporal easing curve. Older exporters write single
/// numbers, newer ones arrays with one entry per dimension; only the first
/// entry shapes time.
#[derive(Deserialize, Default, Debug, Clone)]
struct EasingPoints {
    #[serde(deserialize_with = "super::array_from_array_or_number")]
    x: Vec<f32>,
    #[serde(deserialize_with = "super::array_from_array_or_number")]
    y: Vec<f32>,
}

#[derive(Deserialize, Debug, Clone)]
struct LegacyKeyFrame<T> {
    #[serde(rename = "s")]
    start_value: T,
    #[serde(rename = "e", default = "default_none")]
    end_value: Option<T>,
    #[serde(rename = "t", default)]
    start_frame: f64,
    #[serde(rename = "o", default)]
    easing_out: Option<EasingPoints>,
    #[serde(rename = "i", default)]
    easing_in: Option<EasingPoints>,
    #[serde(rename = "h", default, deserialize_with = "super::bool_from_int")]
    hold: bool,
    #[serde(rename = "to", default)]
    spatial_out: Option<[f32; 2]>,
    #[serde(rename = "ti", default)]
    spatial_in: Option<[f32; 2]>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LegacyTolerantKeyFrame {
    KeyFrame(LegacyKeyFrame<Value>),
    // Some exports terminate the list with a frame carrying only `t`.
    TOnly { t: f64 },
}

impl LegacyKeyFrame<Value> {
    fn easing(&self) -> Easing {
        if self.hold {
            return Easing::Hold;
        }
        match (&self.easing_out, &self.easing_in) {
            (Some(o), Some(i)) if !o.x.is_empty() && !i.x.is_empty() => Easing::Bezier {
                out_tangent: EasingHandle {
                    x: o.x[0].clamp(0.0, 1.0),
                    y: o.y.first().cloned().unwrap_or(0.0),
                },
                in_tangent: EasingHandle {
                    x: i.x[0].clamp(0.0, 1.0),
                    y: i.y.first().cloned().unwrap_or(1.0),
                },
            },
            _ => Easing::Linear,
        }
    }
}

impl<T> TryFrom<AnimatedHelper> for Vec<KeyFrame<T>>
where
    T: FromTo<Value> + Clone,
{
    type Error = &'static str;

    fn try_from(animated: AnimatedHelper) -> Result<Self, Self::Error> {
        match animated.data {
            TolerantAnimatedHelper::Plain(v) => {
                let value = T::from(v).ok_or("malformed static property value")?;
                Ok(vec![KeyFrame::from_value(value)])
            }
            TolerantAnimatedHelper::Keyframes(v) => {
                let mut raw: Vec<LegacyKeyFrame<Value>> = vec![];
                let mut trailing_t = None;
                for k in v {
                    match k {
                        LegacyTolerantKeyFrame::KeyFrame(k) => raw.push(k),
                        LegacyTolerantKeyFrame::TOnly { t } => {
                            trailing_t = Some(t);
                            break;
                        }
                    }
                }
                if raw.is_empty() {
                    return Err("empty keyframe list");
                }
                let mut result = Vec::with_capacity(raw.len());
                for (index, k) in raw.iter().enumerate() {
                    // Spans are contiguous: a keyframe ends where the next
                    // one starts. The last span may be closed by a trailing
                    // `t`-only frame, otherwise it holds to the end.
                    let end_frame = match raw.get(index + 1) {
                        Some(next) => Some(next.start_frame),
                        None => trailing_t,
                    };
                    let end_value = if end_frame.is_none() {
                        None
                    } else if k.hold {
                        Some(T::from(k.start_value.clone()).ok_or("malformed keyframe value")?)
                    } else {
                        let raw_end = k
                            .end_value
                            .clone()
                            .or_else(|| raw.get(index + 1).map(|next| next.start_value.clone()))
                            .unwrap_or_else(|| k.start_value.clone());
                        Some(T::from(raw_end).ok_or("malformed keyframe value")?)
                    };
                    result.push(KeyFrame {
                        start_value: T::from(k.start_value.clone())
                            .ok_or("malformed keyframe value")?,
                        end_value,
                        start_frame: k.start_frame,
                        end_frame,
                        easing: k.easing(),
                        spatial_out: k.spatial_out.map(|[x, y]| Vector2D::new(x, y)),
                        spatial_in: k.spatial_in.map(|[x, y]| Vector2D::new(x, y)),
                    });
                }
                Ok(result)
            }
        }
    }
}
