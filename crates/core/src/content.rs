//! Resolves a layer's shape list into an evaluable content tree and
//! evaluates it frame by frame.
//!
//! Declared order is bottom-to-top. Resolution runs an absorption scan
//! from the top of each group: merges and repeaters consume everything
//! above them that is still free, trims attach themselves to the path
//! shapes below. Evaluation then walks bottom-to-top, painting every
//! path node with the style nodes above it.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use kinetic_model::{
    Composite, FillRule, GradientStop, GradientType, LineCap, LineJoin, MergeMode, PathGeometry,
    PolyStarType, Rgb, Rgba, Shape, ShapeDirection, ShapeLayer, StrokeDashType, TrimMultipleShape,
    Vector2D,
};
use lyon_path::path::Builder;
use lyon_path::{Event, Path};

use crate::animated::Property;
use crate::renderer::{Brush, Canvas, Paint, PaintStyle};
use crate::shapes;
use crate::transform::{RepeaterTransformProperty, TransformProperty};
use crate::Error;

#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Merge paths degrade the fill quality of everything around them in
    /// most raster backends, so they are opt-in.
    pub enable_merge_paths: bool,
}

/// A trim window shared by every shape it was attached to.
pub struct TrimContent {
    start: Property<f32>,
    end: Property<f32>,
    offset: Property<f32>,
    pub mode: TrimMultipleShape,
}

impl TrimContent {
    fn window(&self, frame: f64) -> Result<(f32, f32, f32), Error> {
        Ok((
            self.start.sample(frame)?,
            self.end.sample(frame)?,
            self.offset.sample(frame)?,
        ))
    }
}

enum GeometrySource {
    Rectangle {
        position: Property<Vector2D>,
        size: Property<Vector2D>,
        radius: Property<f32>,
        direction: ShapeDirection,
    },
    Ellipse {
        position: Property<Vector2D>,
        size: Property<Vector2D>,
        direction: ShapeDirection,
    },
    PolyStar {
        position: Property<Vector2D>,
        points: Property<f32>,
        rotation: Property<f32>,
        outer_radius: Property<f32>,
        outer_roundness: Property<f32>,
        inner_radius: Property<f32>,
        inner_roundness: Property<f32>,
        star_type: PolyStarType,
        direction: ShapeDirection,
    },
    Free {
        d: Property<PathGeometry>,
    },
}

impl GeometrySource {
    fn build(&self, frame: f64) -> Result<PathGeometry, Error> {
        Ok(match self {
            GeometrySource::Rectangle {
                position,
                size,
                radius,
                direction,
            } => shapes::rectangle(
                position.sample(frame)?,
                size.sample(frame)?,
                radius.sample(frame)?,
                *direction,
            ),
            GeometrySource::Ellipse {
                position,
                size,
                direction,
            } => shapes::ellipse(position.sample(frame)?, size.sample(frame)?, *direction),
            GeometrySource::PolyStar {
                position,
                points,
                rotation,
                outer_radius,
                outer_roundness,
                inner_radius,
                inner_roundness,
                star_type,
                direction,
            } => shapes::polystar(&shapes::PolyStarParams {
                position: position.sample(frame)?,
                points: points.sample(frame)?,
                rotation: rotation.sample(frame)?,
                outer_radius: outer_radius.sample(frame)?,
                outer_roundness: outer_roundness.sample(frame)?,
                inner_radius: inner_radius.sample(frame)?,
                inner_roundness: inner_roundness.sample(frame)?,
                star_type: *star_type,
                direction: *direction,
            }),
            GeometrySource::Free { d } => d.sample(frame)?,
        })
    }
}

pub struct ShapeContent {
    geometry: GeometrySource,
    trims: Vec<Arc<TrimContent>>,
    round: Option<Arc<Property<f32>>>,
}

impl ShapeContent {
    fn build_path(&self, frame: f64) -> Result<Path, Error> {
        let mut geometry = self.geometry.build(frame)?;
        if let Some(round) = &self.round {
            geometry = shapes::round_corners(&geometry, round.sample(frame)?);
        }
        let mut builder = Path::builder();
        match self.trims.as_slice() {
            [] => shapes::to_path(&geometry, &mut builder),
            [trim] => {
                let (start, end, offset) = trim.window(frame)?;
                shapes::trim(&geometry, start, end, offset, &mut builder);
            }
            trims => {
                // Stacked trims compose as nested windows.
                let mut from = 0.0f32;
                let mut to = 1.0f32;
                for trim in trims {
                    let (start, end, offset) = trim.window(frame)?;
                    let shift = offset / 360.0;
                    let s = (start / 100.0 + shift).clamp(0.0, 1.0);
                    let e = (end / 100.0 + shift).clamp(0.0, 1.0);
                    let span = to - from;
                    let (s, e) = if s <= e { (s, e) } else { (e, s) };
                    to = from + e * span;
                    from += s * span;
                }
                shapes::trim(&geometry, from * 100.0, to * 100.0, 0.0, &mut builder);
            }
        }
        Ok(builder.build())
    }
}

pub enum StyleContent {
    Fill {
        color: Property<Rgb>,
        opacity: Property<f32>,
        rule: FillRule,
    },
    Stroke {
        color: Property<Rgb>,
        opacity: Property<f32>,
        width: Property<f32>,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
        dashes: Vec<(StrokeDashType, Property<f32>)>,
    },
    GradientFill {
        start: Property<Vector2D>,
        end: Property<Vector2D>,
        gradient_ty: GradientType,
        stops: Property<Vec<GradientStop>>,
        opacity: Property<f32>,
        rule: FillRule,
    },
    GradientStroke {
        start: Property<Vector2D>,
        end: Property<Vector2D>,
        gradient_ty: GradientType,
        stops: Property<Vec<GradientStop>>,
        opacity: Property<f32>,
        width: Property<f32>,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
        dashes: Vec<(StrokeDashType, Property<f32>)>,
    },
}

fn sample_dashes(
    dashes: &[(StrokeDashType, Property<f32>)],
    frame: f64,
) -> Result<Option<Vec<f32>>, Error> {
    let mut lengths = Vec::new();
    for (ty, length) in dashes {
        if *ty != StrokeDashType::Offset {
            lengths.push(length.sample(frame)?);
        }
    }
    Ok(if lengths.is_empty() {
        None
    } else {
        Some(lengths)
    })
}

fn gradient_brush(
    gradient_ty: GradientType,
    start: Vector2D,
    end: Vector2D,
    stops: Vec<GradientStop>,
) -> Brush {
    match gradient_ty {
        GradientType::Linear => Brush::LinearGradient { start, end, stops },
        GradientType::Radial => Brush::RadialGradient { start, end, stops },
    }
}

impl StyleContent {
    fn paint(&self, frame: f64, alpha: f32) -> Result<Paint, Error> {
        Ok(match self {
            StyleContent::Fill {
                color,
                opacity,
                rule,
            } => {
                let c = color.sample(frame)?;
                Paint {
                    brush: Brush::Solid(Rgba::new_u8(c.r, c.g, c.b, 255)),
                    style: PaintStyle::Fill { rule: *rule },
                    alpha: alpha * opacity.sample(frame)? / 100.0,
                }
            }
            StyleContent::Stroke {
                color,
                opacity,
                width,
                cap,
                join,
                miter_limit,
                dashes,
            } => {
                let c = color.sample(frame)?;
                Paint {
                    brush: Brush::Solid(Rgba::new_u8(c.r, c.g, c.b, 255)),
                    style: PaintStyle::Stroke {
                        width: width.sample(frame)?,
                        cap: *cap,
                        join: *join,
                        miter_limit: *miter_limit,
                        dashes: sample_dashes(dashes, frame)?,
                    },
                    alpha: alpha * opacity.sample(frame)? / 100.0,
                }
            }
            StyleContent::GradientFill {
                start,
                end,
                gradient_ty,
                stops,
                opacity,
                rule,
            } => Paint {
                brush: gradient_brush(
                    *gradient_ty,
                    start.sample(frame)?,
                    end.sample(frame)?,
                    stops.sample(frame)?,
                ),
                style: PaintStyle::Fill { rule: *rule },
                alpha: alpha * opacity.sample(frame)? / 100.0,
            },
            StyleContent::GradientStroke {
                start,
                end,
                gradient_ty,
                stops,
                opacity,
                width,
                cap,
                join,
                miter_limit,
                dashes,
            } => Paint {
                brush: gradient_brush(
                    *gradient_ty,
                    start.sample(frame)?,
                    end.sample(frame)?,
                    stops.sample(frame)?,
                ),
                style: PaintStyle::Stroke {
                    width: width.sample(frame)?,
                    cap: *cap,
                    join: *join,
                    miter_limit: *miter_limit,
                    dashes: sample_dashes(dashes, frame)?,
                },
                alpha: alpha * opacity.sample(frame)? / 100.0,
            },
        })
    }
}

pub struct GroupContent {
    tree: ContentTree,
    transform: TransformProperty,
}

pub struct MergeContent {
    mode: MergeMode,
    children: ContentTree,
}

pub struct RepeaterContent {
    copies: Property<f32>,
    offset: Property<f32>,
    composite: Composite,
    transform: RepeaterTransformProperty,
    children: ContentTree,
}

pub enum Content {
    Shape(ShapeContent),
    Style(StyleContent),
    Group(GroupContent),
    Merge(MergeContent),
    Repeater(RepeaterContent),
}

impl Content {
    fn is_path_producing(&self) -> bool {
        !matches!(self, Content::Style(_))
    }

    /// All paths this node contributes, in node-local coordinates paired
    /// with the matrix that lifts them into the parent list's space.
    fn build_paths(&self, frame: f64, out: &mut Vec<(Path, Mat4)>) -> Result<(), Error> {
        match self {
            Content::Style(_) => {}
            Content::Shape(shape) => out.push((shape.build_path(frame)?, Mat4::IDENTITY)),
            Content::Group(group) => {
                let matrix = group.transform.matrix(frame)?;
                let mut inner = Vec::new();
                group.tree.collect_paths(frame, &mut inner)?;
                out.extend(
                    inner
                        .into_iter()
                        .map(|(path, local)| (path, matrix * local)),
                );
            }
            Content::Merge(merge) => out.push((merge.merged_path(frame)?, Mat4::IDENTITY)),
            Content::Repeater(repeater) => {
                let copies = repeater.copy_count(frame)?;
                let offset = repeater.offset.sample(frame)?;
                let mut inner = Vec::new();
                repeater.children.collect_paths(frame, &mut inner)?;
                for copy in 0..copies {
                    let matrix = repeater
                        .transform
                        .matrix_for(frame, copy as f32 + offset)?;
                    out.extend(
                        inner
                            .iter()
                            .map(|(path, local)| (path.clone(), matrix * *local)),
                    );
                }
            }
        }
        Ok(())
    }
}

impl RepeaterContent {
    fn copy_count(&self, frame: f64) -> Result<usize, Error> {
        Ok(self.copies.sample(frame)?.round().max(0.0) as usize)
    }
}

impl MergeContent {
    /// Children concatenate into a single path. Boolean modes beyond
    /// plain merging are not computed geometrically.
    fn merged_path(&self, frame: f64) -> Result<Path, Error> {
        match self.mode {
            MergeMode::Merge | MergeMode::Add => {}
            mode => log::warn!("merge mode {mode:?} degrades to concatenation"),
        }
        let mut paths = Vec::new();
        self.children.collect_paths(frame, &mut paths)?;
        let mut builder = Path::builder();
        for (path, matrix) in &paths {
            append_transformed(&mut builder, path, matrix);
        }
        Ok(builder.build())
    }
}

fn transform_point(matrix: &Mat4, p: lyon_path::math::Point) -> lyon_path::math::Point {
    let v = matrix.transform_point3(Vec3::new(p.x, p.y, 0.0));
    lyon_path::math::point(v.x, v.y)
}

fn append_transformed(builder: &mut Builder, path: &Path, matrix: &Mat4) {
    for event in path.iter() {
        match event {
            Event::Begin { at } => {
                builder.begin(transform_point(matrix, at));
            }
            Event::Line { to, .. } => {
                builder.line_to(transform_point(matrix, to));
            }
            Event::Quadratic { ctrl, to, .. } => {
                builder.quadratic_bezier_to(
                    transform_point(matrix, ctrl),
                    transform_point(matrix, to),
                );
            }
            Event::Cubic {
                ctrl1, ctrl2, to, ..
            } => {
                builder.cubic_bezier_to(
                    transform_point(matrix, ctrl1),
                    transform_point(matrix, ctrl2),
                    transform_point(matrix, to),
                );
            }
            Event::End { close, .. } => {
                if close {
                    builder.close();
                } else {
                    builder.end(false);
                }
            }
        }
    }
}

/// The resolved content of one shape layer (or one group within it).
/// Immutable after [`resolve`]; safe to evaluate from multiple threads.
#[derive(Default)]
pub struct ContentTree {
    nodes: Vec<Content>,
}

impl ContentTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn collect_paths(&self, frame: f64, out: &mut Vec<(Path, Mat4)>) -> Result<(), Error> {
        for node in &self.nodes {
            node.build_paths(frame, out)?;
        }
        Ok(())
    }

    /// Draws the tree at `frame`. Path nodes paint with every style node
    /// above them; nested groups repeat their content for styles of the
    /// enclosing list.
    pub fn evaluate(
        &self,
        frame: f64,
        canvas: &mut dyn Canvas,
        transform: Mat4,
        alpha: f32,
    ) -> Result<(), Error> {
        for (index, node) in self.nodes.iter().enumerate() {
            match node {
                Content::Group(group) => {
                    let matrix = group.transform.matrix(frame)?;
                    let opacity = group.transform.opacity.sample(frame)? / 100.0;
                    group
                        .tree
                        .evaluate(frame, canvas, transform * matrix, alpha * opacity)?;
                }
                Content::Repeater(repeater) => {
                    repeater.evaluate(frame, canvas, transform, alpha)?;
                }
                Content::Merge(merge) => {
                    // A merge's own path is painted by the styles it
                    // absorbed as well as by styles above it.
                    let path = merge.merged_path(frame)?;
                    for child in &merge.children.nodes {
                        if let Content::Style(style) = child {
                            canvas.draw(&path, &style.paint(frame, alpha)?, transform);
                        }
                    }
                }
                Content::Shape(_) | Content::Style(_) => {}
            }
            if node.is_path_producing() {
                let mut paths = Vec::new();
                node.build_paths(frame, &mut paths)?;
                if paths.is_empty() {
                    continue;
                }
                for later in &self.nodes[index + 1..] {
                    if let Content::Style(style) = later {
                        let paint = style.paint(frame, alpha)?;
                        for (path, local) in &paths {
                            canvas.draw(path, &paint, transform * *local);
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl RepeaterContent {
    fn evaluate(
        &self,
        frame: f64,
        canvas: &mut dyn Canvas,
        transform: Mat4,
        alpha: f32,
    ) -> Result<(), Error> {
        let copies = self.copy_count(frame)?;
        let offset = self.offset.sample(frame)?;
        let order: Vec<usize> = match self.composite {
            Composite::Above => (0..copies).collect(),
            Composite::Below => (0..copies).rev().collect(),
        };
        for copy in order {
            let matrix = self.transform.matrix_for(frame, copy as f32 + offset)?;
            let opacity = self.transform.opacity_for(frame, copy, copies)?;
            self.children
                .evaluate(frame, canvas, transform * matrix, alpha * opacity)?;
        }
        Ok(())
    }
}

fn shape_content(shape: &Shape) -> Option<ShapeContent> {
    let geometry = match shape {
        Shape::Rectangle(rect) => GeometrySource::Rectangle {
            position: Property::new(rect.position.clone()),
            size: Property::new(rect.size.clone()),
            radius: Property::new(rect.radius.clone()),
            direction: rect.direction,
        },
        Shape::Ellipse(ellipse) => GeometrySource::Ellipse {
            position: Property::new(ellipse.position.clone()),
            size: Property::new(ellipse.size.clone()),
            direction: ellipse.direction,
        },
        Shape::PolyStar(star) => GeometrySource::PolyStar {
            position: Property::new(star.position.clone()),
            points: Property::new(star.points.clone()),
            rotation: Property::new(star.rotation.clone()),
            outer_radius: Property::new(star.outer_radius.clone()),
            outer_roundness: Property::new(star.outer_roundness.clone()),
            inner_radius: Property::new(star.inner_radius.clone()),
            inner_roundness: Property::new(star.inner_roundness.clone()),
            star_type: star.star_type,
            direction: star.direction,
        },
        Shape::Path { d } => GeometrySource::Free {
            d: Property::new(d.clone()),
        },
        _ => return None,
    };
    Some(ShapeContent {
        geometry,
        trims: Vec::new(),
        round: None,
    })
}

fn style_content(shape: &Shape) -> Option<StyleContent> {
    Some(match shape {
        Shape::Fill(fill) => StyleContent::Fill {
            color: Property::new(fill.color.clone()),
            opacity: Property::new(fill.opacity.clone()),
            rule: fill.fill_rule,
        },
        Shape::Stroke(stroke) => StyleContent::Stroke {
            color: Property::new(stroke.color.clone()),
            opacity: Property::new(stroke.opacity.clone()),
            width: Property::new(stroke.width.clone()),
            cap: stroke.line_cap,
            join: stroke.line_join,
            miter_limit: stroke.miter_limit,
            dashes: stroke
                .dashes
                .iter()
                .map(|dash| (dash.ty, Property::new(dash.length.clone())))
                .collect(),
        },
        Shape::GradientFill(fill) => StyleContent::GradientFill {
            start: Property::new(fill.gradient.start.clone()),
            end: Property::new(fill.gradient.end.clone()),
            gradient_ty: fill.gradient.gradient_ty,
            stops: Property::new(fill.gradient.colors.stops.clone()),
            opacity: Property::new(fill.opacity.clone()),
            rule: fill.fill_rule,
        },
        Shape::GradientStroke(stroke) => StyleContent::GradientStroke {
            start: Property::new(stroke.gradient.start.clone()),
            end: Property::new(stroke.gradient.end.clone()),
            gradient_ty: stroke.gradient.gradient_ty,
            stops: Property::new(stroke.gradient.colors.stops.clone()),
            opacity: Property::new(stroke.opacity.clone()),
            width: Property::new(stroke.width.clone()),
            cap: stroke.line_cap,
            join: stroke.line_join,
            miter_limit: stroke.miter_limit,
            dashes: stroke
                .dashes
                .iter()
                .map(|dash| (dash.ty, Property::new(dash.length.clone())))
                .collect(),
        },
        _ => return None,
    })
}

/// Attaches a trim to every free path shape below `top` in the list,
/// recursing into groups. Simultaneous trims claim their targets so a
/// second one lower down starts fresh; individual trims attach alongside
/// whatever is already there.
fn attach_trim(
    nodes: &mut [Content],
    claimed: &mut [bool],
    top: usize,
    trim: &Arc<TrimContent>,
) {
    let claims = trim.mode == TrimMultipleShape::Simultaneously;
    for index in (0..top).rev() {
        if claims && claimed[index] {
            continue;
        }
        match &mut nodes[index] {
            Content::Shape(shape) => {
                shape.trims.push(trim.clone());
                if claims {
                    claimed[index] = true;
                }
            }
            Content::Group(group) => {
                group.tree.attach_trim_all(trim);
                if claims {
                    claimed[index] = true;
                }
            }
            _ => {}
        }
    }
}

impl ContentTree {
    fn attach_trim_all(&mut self, trim: &Arc<TrimContent>) {
        for node in &mut self.nodes {
            match node {
                Content::Shape(shape) => shape.trims.push(trim.clone()),
                Content::Group(group) => group.tree.attach_trim_all(trim),
                _ => {}
            }
        }
    }

    fn attach_round_all(&mut self, round: &Arc<Property<f32>>) {
        for node in &mut self.nodes {
            match node {
                Content::Shape(shape) => {
                    if shape.round.is_none() {
                        shape.round = Some(round.clone());
                    }
                }
                Content::Group(group) => group.tree.attach_round_all(round),
                _ => {}
            }
        }
    }
}

/// Resolves a declared shape list into a content tree. Problems that do
/// not prevent the rest of the layer from rendering come back as issue
/// strings.
pub fn resolve(shapes: &[ShapeLayer], options: &ResolveOptions) -> (ContentTree, Vec<String>) {
    let mut issues = Vec::new();
    let tree = resolve_list(shapes, options, &mut issues);
    (tree, issues)
}

fn resolve_list(
    shapes: &[ShapeLayer],
    options: &ResolveOptions,
    issues: &mut Vec<String>,
) -> ContentTree {
    // First pass: lower each visible entry, remembering the absorbers
    // for the scan below.
    let mut nodes: Vec<Content> = Vec::new();
    let mut pending: Vec<(usize, PendingAbsorber)> = Vec::new();
    for layer in shapes {
        if layer.hidden {
            continue;
        }
        match &layer.shape {
            Shape::Group { shapes } => {
                let (transform, rest): (Vec<_>, Vec<_>) = shapes
                    .iter()
                    .cloned()
                    .partition(|child| matches!(child.shape, Shape::Transform(_)));
                let transform = transform
                    .into_iter()
                    .find_map(|child| match child.shape {
                        Shape::Transform(t) => Some(t),
                        _ => None,
                    })
                    .unwrap_or_default();
                nodes.push(Content::Group(GroupContent {
                    tree: resolve_list(&rest, options, issues),
                    transform: TransformProperty::new(transform, false),
                }));
            }
            Shape::Transform(_) => {
                // Only meaningful inside a group; handled there.
            }
            Shape::Trim {
                start,
                end,
                offset,
                multiple_shape,
            } => {
                pending.push((
                    nodes.len(),
                    PendingAbsorber::Trim(Arc::new(TrimContent {
                        start: Property::new(start.clone()),
                        end: Property::new(end.clone()),
                        offset: Property::new(offset.clone()),
                        mode: *multiple_shape,
                    })),
                ));
            }
            Shape::RoundedCorners { radius } => {
                pending.push((
                    nodes.len(),
                    PendingAbsorber::Round(Arc::new(Property::new(radius.clone()))),
                ));
            }
            Shape::Merge { mode } => {
                if options.enable_merge_paths {
                    nodes.push(Content::Merge(MergeContent {
                        mode: *mode,
                        children: ContentTree::default(),
                    }));
                } else {
                    issues.push(format!(
                        "merge paths ({:?}) not enabled; node dropped",
                        mode
                    ));
                }
            }
            Shape::Repeater {
                copies,
                offset,
                composite,
                transform,
            } => {
                nodes.push(Content::Repeater(RepeaterContent {
                    copies: Property::new(copies.clone()),
                    offset: Property::new(offset.clone()),
                    composite: *composite,
                    transform: RepeaterTransformProperty::new(transform.clone()),
                    children: ContentTree::default(),
                }));
            }
            other => {
                if let Some(shape) = shape_content(other) {
                    nodes.push(Content::Shape(shape));
                } else if let Some(style) = style_content(other) {
                    nodes.push(Content::Style(style));
                }
            }
        }
    }

    // Trims and rounded corners attach at their declared position before
    // any greedy absorber moves its victims, so absorbed content carries
    // its attachments along.
    let mut claimed = vec![false; nodes.len()];
    for (position, absorber) in pending.iter().rev() {
        match absorber {
            PendingAbsorber::Trim(trim) => {
                attach_trim(&mut nodes, &mut claimed, *position, trim)
            }
            PendingAbsorber::Round(round) => {
                for index in (0..*position).rev() {
                    match &mut nodes[index] {
                        Content::Shape(shape) => {
                            if shape.round.is_none() {
                                shape.round = Some(round.clone());
                            }
                        }
                        Content::Group(group) => group.tree.attach_round_all(round),
                        _ => {}
                    }
                }
            }
        }
    }

    // Absorption scan, top toward bottom.
    let mut absorbed = vec![false; nodes.len()];
    for index in (0..nodes.len()).rev() {
        let greedy = matches!(nodes[index], Content::Merge(_) | Content::Repeater(_));
        if !greedy || absorbed[index] {
            continue;
        }
        let taken: Vec<usize> = (index + 1..nodes.len())
            .filter(|i| !absorbed[*i])
            .collect();
        for i in &taken {
            absorbed[*i] = true;
        }
        // Placeholders keep the indices stable while children move.
        let children: Vec<Content> = taken
            .into_iter()
            .map(|i| {
                std::mem::replace(
                    &mut nodes[i],
                    Content::Merge(MergeContent {
                        mode: MergeMode::Merge,
                        children: ContentTree::default(),
                    }),
                )
            })
            .collect();
        match &mut nodes[index] {
            Content::Merge(merge) => merge.children = ContentTree { nodes: children },
            Content::Repeater(repeater) => repeater.children = ContentTree { nodes: children },
            _ => {}
        }
    }

    let nodes: Vec<Content> = nodes
        .into_iter()
        .zip(absorbed)
        .filter_map(|(node, gone)| (!gone).then_some(node))
        .collect();

    ContentTree { nodes }
}

enum PendingAbsorber {
    Trim(Arc<TrimContent>),
    Round(Arc<Property<f32>>),
}
