//! The typed data model for declarative vector-animation documents and the
//! issue-collecting reader that builds it from a parsed JSON tree.

use serde::Deserialize;

pub type Vector2D = euclid::default::Vector2D<f32>;

mod color;
mod helpers;
mod reader;

pub use color::*;
pub use helpers::Value;
use helpers::*;
pub use reader::read;

/// A fully parsed, time-bounded animation document. Immutable once built.
#[derive(Debug, Clone)]
pub struct Composition {
    pub name: Option<String>,
    pub version: Option<String>,
    pub start_frame: f64,
    pub end_frame: f64,
    pub frame_rate: f64,
    pub width: u32,
    pub height: u32,
    pub layers: Vec<Layer>,
    pub assets: Vec<Asset>,
    pub markers: Vec<Marker>,
}

impl Composition {
    pub fn duration(&self) -> f64 {
        (self.end_frame - self.start_frame) / self.frame_rate
    }

    pub fn asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id() == id)
    }

    pub fn marker(&self, name: &str) -> Option<&Marker> {
        self.markers.iter().find(|m| m.name == name)
    }
}

/// A named time offset in the composition.
#[derive(Deserialize, Debug, Clone)]
pub struct Marker {
    #[serde(rename = "cm")]
    pub name: String,
    #[serde(rename = "tm")]
    pub frame: f64,
    #[serde(rename = "dr", default)]
    pub duration: f64,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Layer {
    #[serde(rename = "ddd", deserialize_with = "bool_from_int", default)]
    pub is_3d: bool,
    #[serde(rename = "hd", default)]
    pub hidden: bool,
    #[serde(rename = "ind", default)]
    pub index: Option<u32>,
    #[serde(rename = "parent", default)]
    pub parent_index: Option<u32>,
    #[serde(rename = "ao", deserialize_with = "bool_from_int", default)]
    pub auto_orient: bool,
    #[serde(rename = "ip")]
    pub start_frame: f64,
    #[serde(rename = "op")]
    pub end_frame: f64,
    #[serde(rename = "st", default)]
    pub start_time: f64,
    #[serde(rename = "sr", default = "default_time_stretch")]
    pub time_stretch: f64,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "ks", default)]
    pub transform: Option<Transform>,
    #[serde(flatten)]
    pub content: LayerContent,
    #[serde(rename = "bm", default)]
    pub blend_mode: Option<BlendMode>,
}

impl Layer {
    pub fn time_remapping(&self) -> Option<&Animated<f32>> {
        if let LayerContent::PreComposition(pre) = &self.content {
            pre.time_remapping.as_ref()
        } else {
            None
        }
    }
}

#[derive(Debug, Clone)]
pub enum LayerContent {
    PreComposition(PreCompositionRef),
    SolidColor { color: Rgba, height: f32, width: f32 },
    Image(ImageRef),
    Empty,
    Shape(ShapeGroup),
    Text(TextBody),
}

#[derive(Deserialize, Debug, Clone)]
pub struct ImageRef {
    #[serde(rename = "refId")]
    pub ref_id: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PreCompositionRef {
    #[serde(rename = "refId")]
    pub ref_id: String,
    #[serde(rename = "w", default)]
    pub width: Option<u32>,
    #[serde(rename = "h", default)]
    pub height: Option<u32>,
    #[serde(rename = "tm", default)]
    pub time_remapping: Option<Animated<f32>>,
}

/// The static document of a text layer. Animated per-character properties
/// are unsupported and reported by the reader.
#[derive(Debug, Clone)]
pub struct TextBody {
    pub value: String,
    pub font_name: String,
    pub size: f32,
    pub fill_color: Rgba,
    pub justify: TextJustify,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Transform {
    #[serde(rename = "a", default)]
    pub anchor: Option<Animated<Vector2D>>,
    #[serde(rename = "p", default)]
    pub position: Option<Animated<Vector2D>>,
    #[serde(rename = "s", default = "default_vec2_100")]
    pub scale: Animated<Vector2D>,
    #[serde(rename = "r", default)]
    pub rotation: Animated<f32>,
    #[serde(rename = "o", default = "default_number_100")]
    pub opacity: Animated<f32>,
    #[serde(rename = "sk", default)]
    pub skew: Option<Animated<f32>>,
    #[serde(rename = "sa", default)]
    pub skew_axis: Option<Animated<f32>>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            anchor: None,
            position: None,
            scale: default_vec2_100(),
            rotation: Animated::default(),
            opacity: default_number_100(),
            skew: None,
            skew_axis: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct RepeaterTransform {
    #[serde(rename = "a", default)]
    pub anchor: Option<Animated<Vector2D>>,
    #[serde(rename = "p", default)]
    pub position: Option<Animated<Vector2D>>,
    #[serde(rename = "s", default = "default_vec2_100")]
    pub scale: Animated<Vector2D>,
    #[serde(rename = "r", default)]
    pub rotation: Animated<f32>,
    #[serde(rename = "so", default = "default_number_100")]
    pub start_opacity: Animated<f32>,
    #[serde(rename = "eo", default = "default_number_100")]
    pub end_opacity: Animated<f32>,
}

/// Temporal easing of a keyframe span. The bezier tangents shape *when* a
/// value changes; spatial tangents on the keyframe shape *where* a point
/// travels.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Easing {
    #[default]
    Linear,
    Hold,
    Bezier {
        out_tangent: EasingHandle,
        in_tangent: EasingHandle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EasingHandle {
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Clone)]
pub struct KeyFrame<T> {
    pub start_value: T,
    /// Absent only on a terminal open-ended keyframe, which holds its start
    /// value for the rest of the time domain.
    pub end_value: Option<T>,
    pub start_frame: f64,
    pub end_frame: Option<f64>,
    pub easing: Easing,
    /// Control points of the curved motion path between the two values,
    /// relative to the start and end positions respectively. Only
    /// meaningful for point-valued properties.
    pub spatial_out: Option<Vector2D>,
    pub spatial_in: Option<Vector2D>,
}

impl<T: Clone> KeyFrame<T> {
    pub fn from_value(value: T) -> Self {
        KeyFrame {
            start_value: value,
            end_value: None,
            start_frame: 0.0,
            end_frame: None,
            easing: Easing::Linear,
            spatial_out: None,
            spatial_in: None,
        }
    }

    pub fn alter_value<U>(&self, start: U, end: Option<U>) -> KeyFrame<U> {
        KeyFrame {
            start_value: start,
            end_value: end,
            start_frame: self.start_frame,
            end_frame: self.end_frame,
            easing: self.easing.clone(),
            spatial_out: self.spatial_out,
            spatial_in: self.spatial_in,
        }
    }
}

/// A property that is either a constant or an ordered, contiguous sequence
/// of keyframes covering the queried time domain.
#[derive(Deserialize, Debug, Clone)]
pub struct Animated<T> {
    #[serde(deserialize_with = "bool_from_int", rename = "a", default)]
    pub animated: bool,
    #[serde(
        deserialize_with = "keyframes_from_array",
        bound = "T: FromTo<helpers::Value> + Clone",
        rename = "k"
    )]
    pub keyframes: Vec<KeyFrame<T>>,
}

impl<T: Clone> Animated<T> {
    pub fn from_value(value: T) -> Self {
        Animated {
            animated: false,
            keyframes: vec![KeyFrame::from_value(value)],
        }
    }
}

impl<T: Clone + Default> Default for Animated<T> {
    fn default() -> Self {
        Animated::from_value(T::default())
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeLayer {
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "mn", default)]
    pub match_name: Option<String>,
    #[serde(rename = "hd", default)]
    pub hidden: bool,
    #[serde(flatten)]
    pub shape: Shape,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "ty")]
pub enum Shape {
    #[serde(rename = "rc")]
    Rectangle(Rectangle),
    #[serde(rename = "el")]
    Ellipse(Ellipse),
    #[serde(rename = "sr")]
    PolyStar(PolyStar),
    #[serde(rename = "sh")]
    Path {
        #[serde(rename = "ks")]
        d: Animated<PathGeometry>,
    },
    #[serde(rename = "fl")]
    Fill(Fill),
    #[serde(rename = "st")]
    Stroke(Stroke),
    #[serde(rename = "gf")]
    GradientFill(GradientFill),
    #[serde(rename = "gs")]
    GradientStroke(GradientStroke),
    #[serde(rename = "gr")]
    Group {
        #[serde(rename = "it")]
        shapes: Vec<ShapeLayer>,
    },
    #[serde(rename = "tr")]
    Transform(Transform),
    #[serde(rename = "rp")]
    Repeater {
        #[serde(rename = "c")]
        copies: Animated<f32>,
        #[serde(rename = "o", default)]
        offset: Animated<f32>,
        #[serde(rename = "m", default)]
        composite: Composite,
        #[serde(rename = "tr")]
        transform: RepeaterTransform,
    },
    #[serde(rename = "tm")]
    Trim {
        #[serde(rename = "s")]
        start: Animated<f32>,
        #[serde(rename = "e")]
        end: Animated<f32>,
        #[serde(rename = "o", default)]
        offset: Animated<f32>,
        #[serde(rename = "m", default)]
        multiple_shape: TrimMultipleShape,
    },
    #[serde(rename = "rd")]
    RoundedCorners {
        #[serde(rename = "r")]
        radius: Animated<f32>,
    },
    #[serde(rename = "mm")]
    Merge {
        #[serde(rename = "mm", default)]
        mode: MergeMode,
    },
}

#[derive(Deserialize, Debug, Clone)]
pub struct ShapeGroup {
    pub shapes: Vec<ShapeLayer>,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum PolyStarType {
    Star = 1,
    Polygon = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum FillRule {
    #[default]
    NonZero = 1,
    EvenOdd = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineCap {
    Butt = 1,
    Round = 2,
    Square = 3,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum LineJoin {
    Miter = 1,
    Round = 2,
    Bevel = 3,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StrokeDash {
    #[serde(rename = "v")]
    pub length: Animated<f32>,
    #[serde(rename = "n")]
    pub ty: StrokeDashType,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum StrokeDashType {
    #[serde(rename = "d")]
    Dash,
    #[serde(rename = "g")]
    Gap,
    #[serde(rename = "o")]
    Offset,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum GradientType {
    Linear = 1,
    Radial = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum Composite {
    #[default]
    Above = 1,
    Below = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum TrimMultipleShape {
    #[default]
    Individually = 1,
    Simultaneously = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum ShapeDirection {
    #[default]
    Clockwise = 1,
    CounterClockwise = 2,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum MergeMode {
    #[default]
    Merge = 1,
    Add = 2,
    Subtract = 3,
    Intersect = 4,
    ExcludeIntersections = 5,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum TextJustify {
    #[default]
    Left = 0,
    Right = 1,
    Center = 2,
    LastLineLeft = 3,
    LastLineRight = 4,
    LastLineCenter = 5,
    LastLineFull = 6,
}

#[derive(serde_repr::Deserialize_repr, Debug, Clone, Copy, PartialEq, Default)]
#[repr(u8)]
pub enum BlendMode {
    #[default]
    Normal = 0,
    Multiply,
    Screen,
    Overlay,
    Darken,
    Lighten,
    ColorDodge,
    ColorBurn,
    HardLight,
    SoftLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
    Add,
    HardMix,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Fill {
    #[serde(rename = "o", default = "default_number_100")]
    pub opacity: Animated<f32>,
    #[serde(rename = "c")]
    pub color: Animated<Rgb>,
    #[serde(rename = "r", default)]
    pub fill_rule: FillRule,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Stroke {
    #[serde(rename = "lc")]
    pub line_cap: LineCap,
    #[serde(rename = "lj")]
    pub line_join: LineJoin,
    #[serde(rename = "ml", default)]
    pub miter_limit: f32,
    #[serde(rename = "o", default = "default_number_100")]
    pub opacity: Animated<f32>,
    #[serde(rename = "w")]
    pub width: Animated<f32>,
    #[serde(rename = "d", default)]
    pub dashes: Vec<StrokeDash>,
    #[serde(rename = "c")]
    pub color: Animated<Rgb>,
}

/// A gradient color ramp: stop offsets and colors, both animatable.
#[derive(Deserialize, Debug, Clone)]
#[serde(from = "ColorListHelper")]
pub struct ColorList {
    pub stop_count: usize,
    pub stops: Animated<Vec<GradientStop>>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Rgba,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Gradient {
    #[serde(rename = "s")]
    pub start: Animated<Vector2D>,
    #[serde(rename = "e")]
    pub end: Animated<Vector2D>,
    #[serde(rename = "t")]
    pub gradient_ty: GradientType,
    #[serde(rename = "g")]
    pub colors: ColorList,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GradientFill {
    #[serde(rename = "o", default = "default_number_100")]
    pub opacity: Animated<f32>,
    #[serde(rename = "r", default)]
    pub fill_rule: FillRule,
    #[serde(flatten)]
    pub gradient: Gradient,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GradientStroke {
    #[serde(rename = "lc")]
    pub line_cap: LineCap,
    #[serde(rename = "lj")]
    pub line_join: LineJoin,
    #[serde(rename = "ml", default)]
    pub miter_limit: f32,
    #[serde(rename = "o", default = "default_number_100")]
    pub opacity: Animated<f32>,
    #[serde(rename = "w")]
    pub width: Animated<f32>,
    #[serde(rename = "d", default)]
    pub dashes: Vec<StrokeDash>,
    #[serde(flatten)]
    pub gradient: Gradient,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Rectangle {
    #[serde(rename = "d", default)]
    pub direction: ShapeDirection,
    #[serde(rename = "p")]
    pub position: Animated<Vector2D>,
    #[serde(rename = "s")]
    pub size: Animated<Vector2D>,
    #[serde(rename = "r", default)]
    pub radius: Animated<f32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Ellipse {
    #[serde(rename = "d", default)]
    pub direction: ShapeDirection,
    #[serde(rename = "p")]
    pub position: Animated<Vector2D>,
    #[serde(rename = "s")]
    pub size: Animated<Vector2D>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PolyStar {
    #[serde(rename = "d", default)]
    pub direction: ShapeDirection,
    #[serde(rename = "p")]
    pub position: Animated<Vector2D>,
    #[serde(rename = "or")]
    pub outer_radius: Animated<f32>,
    #[serde(rename = "os", default)]
    pub outer_roundness: Animated<f32>,
    #[serde(rename = "ir", default)]
    pub inner_radius: Animated<f32>,
    #[serde(rename = "is", default)]
    pub inner_roundness: Animated<f32>,
    #[serde(rename = "r", default)]
    pub rotation: Animated<f32>,
    #[serde(rename = "pt")]
    pub points: Animated<f32>,
    #[serde(rename = "sy")]
    pub star_type: PolyStarType,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum Asset {
    Image(ImageAsset),
    PreComposition(PreCompositionAsset),
}

impl Asset {
    pub fn id(&self) -> &str {
        match self {
            Asset::Image(i) => i.id.as_str(),
            Asset::PreComposition(p) => p.id.as_str(),
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ImageAsset {
    pub id: String,
    #[serde(rename = "u", default)]
    pub directory: String,
    #[serde(rename = "p")]
    pub filename: String,
    #[serde(rename = "e", deserialize_with = "bool_from_int", default)]
    pub embedded: bool,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "w", default)]
    pub width: Option<u32>,
    #[serde(rename = "h", default)]
    pub height: Option<u32>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct PreCompositionAsset {
    pub id: String,
    pub layers: Vec<Layer>,
    #[serde(rename = "nm", default)]
    pub name: Option<String>,
    #[serde(rename = "fr", default)]
    pub frame_rate: Option<f64>,
}

/// A vector path: vertices with incoming/outgoing tangents (relative to
/// each vertex) plus a closed flag. Equivalent to a start point followed by
/// cubic bezier segments.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct PathGeometry {
    #[serde(rename = "c", default)]
    pub closed: bool,
    #[serde(rename = "v", deserialize_with = "vec_from_array")]
    pub vertices: Vec<Vector2D>,
    #[serde(rename = "i", deserialize_with = "vec_from_array")]
    pub in_tangents: Vec<Vector2D>,
    #[serde(rename = "o", deserialize_with = "vec_from_array")]
    pub out_tangents: Vec<Vector2D>,
}

impl PathGeometry {
    /// Vertex count; two geometries interpolate only when these match.
    pub fn segments(&self) -> usize {
        self.vertices.len()
    }
}
