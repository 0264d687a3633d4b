mod convert;
mod keyframe;

use std::fmt;

pub use self::convert::FromTo;
pub(crate) use self::keyframe::AnimatedHelper;

use super::*;
use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer};

/// The loosely-typed payload of a property or keyframe value as found in
/// the document tree.
#[derive(Deserialize, Clone, Debug)]
#[serde(untagged)]
pub enum Value {
    Primitive(f32),
    List(Vec<f32>),
    Bezier(PathGeometry),
    ComplexBezier(Vec<PathGeometry>),
}

impl Value {
    pub(crate) fn as_f32_vec(&self) -> Option<Vec<f32>> {
        Some(match self {
            Value::Primitive(p) => vec![*p],
            Value::List(l) => l.clone(),
            _ => return None,
        })
    }
}

pub(crate) fn bool_from_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    struct IntOrBool;

    impl<'de> Visitor<'de> for IntOrBool {
        type Value = bool;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("zero, one or a boolean")
        }

        fn visit_bool<E: Error>(self, v: bool) -> Result<bool, E> {
            Ok(v)
        }

        fn visit_u64<E: Error>(self, v: u64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_i64<E: Error>(self, v: i64) -> Result<bool, E> {
            Ok(v != 0)
        }

        fn visit_f64<E: Error>(self, v: f64) -> Result<bool, E> {
            Ok(v != 0.0)
        }
    }

    deserializer.deserialize_any(IntOrBool)
}

pub(crate) fn str_to_rgba<'de, D>(deserializer: D) -> Result<Rgba, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.parse()
        .map_err(|_| D::Error::custom(format!("malformed color string `{s}`")))
}

pub(crate) fn keyframes_from_array<'de, D, T>(deserializer: D) -> Result<Vec<KeyFrame<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: FromTo<Value> + Clone,
{
    let helper = AnimatedHelper::deserialize(deserializer)?;
    Vec::<KeyFrame<T>>::try_from(helper).map_err(D::Error::custom)
}

pub(crate) fn vec_from_array<'de, D>(deserializer: D) -> Result<Vec<Vector2D>, D::Error>
where
    D: Deserializer<'de>,
{
    let result = Vec::<[f32; 2]>::deserialize(deserializer)?;
    Ok(result.into_iter().map(|f| f.into()).collect())
}

pub(crate) fn array_from_array_or_number<'de, D>(deserializer: D) -> Result<Vec<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value
        .as_f32_vec()
        .ok_or_else(|| D::Error::custom("expected a number or an array of numbers"))
}

pub(crate) fn default_vec2_100() -> Animated<Vector2D> {
    Animated::from_value(Vector2D::new(100.0, 100.0))
}

pub(crate) fn default_number_100() -> Animated<f32> {
    Animated::from_value(100.0)
}

pub(crate) fn default_time_stretch() -> f64 {
    1.0
}

impl<'de> serde::Deserialize<'de> for LayerContent {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(d)?;

        #[derive(Deserialize)]
        struct SolidColor {
            #[serde(rename = "sc", deserialize_with = "str_to_rgba")]
            color: Rgba,
            #[serde(rename = "sh")]
            height: f32,
            #[serde(rename = "sw")]
            width: f32,
        }

        let ty = value
            .get("ty")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| D::Error::missing_field("ty"))?;
        Ok(match ty {
            0 => LayerContent::PreComposition(
                PreCompositionRef::deserialize(value).map_err(D::Error::custom)?,
            ),
            1 => {
                let solid = SolidColor::deserialize(value).map_err(D::Error::custom)?;
                LayerContent::SolidColor {
                    color: solid.color,
                    height: solid.height,
                    width: solid.width,
                }
            }
            2 => LayerContent::Image(ImageRef::deserialize(value).map_err(D::Error::custom)?),
            3 => LayerContent::Empty,
            4 => {
                let shapes = match value.get("shapes") {
                    Some(v) => Vec::<ShapeLayer>::deserialize(v).map_err(D::Error::custom)?,
                    None => vec![],
                };
                LayerContent::Shape(ShapeGroup { shapes })
            }
            5 => {
                let v = value.get("t").ok_or_else(|| D::Error::missing_field("t"))?;
                LayerContent::Text(text_body(v).map_err(D::Error::custom)?)
            }
            other => {
                return Err(D::Error::custom(format!("unsupported layer type {other}")));
            }
        })
    }
}

/// Pulls the static text document out of a text layer. Only the first
/// document keyframe is honored; animated text is unsupported.
fn text_body(value: &serde_json::Value) -> Result<TextBody, String> {
    #[derive(Deserialize)]
    struct RawDocument {
        #[serde(rename = "t")]
        value: String,
        #[serde(rename = "f")]
        font_name: String,
        #[serde(rename = "s")]
        size: f32,
        #[serde(rename = "fc", default)]
        fill_color: Option<Vec<f32>>,
        #[serde(rename = "j", default)]
        justify: TextJustify,
    }

    let raw = value
        .get("d")
        .and_then(|d| d.get("k"))
        .and_then(|k| k.as_array())
        .and_then(|k| k.first())
        .and_then(|k| k.get("s"))
        .ok_or_else(|| "text layer has no document".to_string())?;
    let raw = RawDocument::deserialize(raw).map_err(|e| e.to_string())?;
    let fill_color = raw
        .fill_color
        .and_then(|c| <Rgba as FromTo<Value>>::from(Value::List(c)))
        .unwrap_or_default();
    Ok(TextBody {
        value: raw.value,
        font_name: raw.font_name,
        size: raw.size,
        fill_color,
        justify: raw.justify,
    })
}

#[derive(Deserialize)]
pub(crate) struct ColorListHelper {
    #[serde(rename = "p")]
    stop_count: usize,
    #[serde(rename = "k")]
    stops: Animated<Vec<f32>>,
}

impl From<ColorListHelper> for ColorList {
    fn from(helper: ColorListHelper) -> Self {
        let stop_count = helper.stop_count;
        ColorList {
            stop_count,
            stops: Animated {
                animated: helper.stops.animated,
                keyframes: helper
                    .stops
                    .keyframes
                    .into_iter()
                    .map(|keyframe| {
                        let start = f32_to_gradient_stops(&keyframe.start_value, stop_count);
                        let end = keyframe
                            .end_value
                            .as_ref()
                            .map(|end| f32_to_gradient_stops(end, stop_count));
                        keyframe.alter_value(start, end)
                    })
                    .collect(),
            },
        }
    }
}

/// The document packs gradient stops into a flat float array: `count`
/// leading `(offset, r, g, b)` quads, optionally followed by `(offset,
/// alpha)` pairs when the gradient carries transparency.
fn f32_to_gradient_stops(data: &[f32], stop_count: usize) -> Vec<GradientStop> {
    let rgb_len = stop_count * 4;
    if data.len() < rgb_len {
        return data
            .chunks_exact(4)
            .map(|chunk| GradientStop {
                offset: chunk[0],
                color: Rgba::new_f32(chunk[1], chunk[2], chunk[3], 1.0),
            })
            .collect();
    }
    if data.len() >= rgb_len + stop_count * 2 {
        data[0..rgb_len]
            .chunks(4)
            .zip(data[rgb_len..].chunks(2))
            .map(|(chunk, opacity)| GradientStop {
                offset: chunk[0],
                color: Rgba::new_f32(chunk[1], chunk[2], chunk[3], opacity[1]),
            })
            .collect()
    } else {
        data[0..rgb_len]
            .chunks(4)
            .map(|chunk| GradientStop {
                offset: chunk[0],
                color: Rgba::new_f32(chunk[1], chunk[2], chunk[3], 1.0),
            })
            .collect()
    }
}
