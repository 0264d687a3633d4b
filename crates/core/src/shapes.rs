//! Geometry builders. Every parametric shape lowers to a [`PathGeometry`]
//! so trimming, corner rounding and winding reversal all operate on one
//! representation before the final conversion to a lyon path.

use flo_curves::bezier::Curve;
use flo_curves::{BezierCurve, BezierCurveFactory, Coord2};
use kinetic_model::{PathGeometry, PolyStarType, ShapeDirection, Vector2D};
use lyon_path::path::Builder;

/// Tangent scale of a quarter-circle cubic arc.
const CUBIC_ARC: f32 = 0.552_284_8;

// Empirical tangent scales for rounded polystar points.
const STAR_ROUNDNESS: f32 = 0.478_29;
const POLYGON_ROUNDNESS: f32 = 0.25;

fn apply_direction(mut geometry: PathGeometry, direction: ShapeDirection) -> PathGeometry {
    if direction == ShapeDirection::CounterClockwise {
        geometry.vertices.reverse();
        geometry.in_tangents.reverse();
        geometry.out_tangents.reverse();
        std::mem::swap(&mut geometry.in_tangents, &mut geometry.out_tangents);
    }
    geometry
}

/// An ellipse as four cubic arcs, starting at the top vertex and winding
/// clockwise.
pub fn ellipse(position: Vector2D, size: Vector2D, direction: ShapeDirection) -> PathGeometry {
    let rx = size.x / 2.0;
    let ry = size.y / 2.0;
    let kx = rx * CUBIC_ARC;
    let ky = ry * CUBIC_ARC;
    let geometry = PathGeometry {
        closed: true,
        vertices: vec![
            Vector2D::new(position.x, position.y - ry),
            Vector2D::new(position.x + rx, position.y),
            Vector2D::new(position.x, position.y + ry),
            Vector2D::new(position.x - rx, position.y),
        ],
        in_tangents: vec![
            Vector2D::new(-kx, 0.0),
            Vector2D::new(0.0, -ky),
            Vector2D::new(kx, 0.0),
            Vector2D::new(0.0, ky),
        ],
        out_tangents: vec![
            Vector2D::new(kx, 0.0),
            Vector2D::new(0.0, ky),
            Vector2D::new(-kx, 0.0),
            Vector2D::new(0.0, -ky),
        ],
    };
    apply_direction(geometry, direction)
}

/// An axis-aligned rectangle around `position`, corner radius clamped to
/// the half extents.
pub fn rectangle(
    position: Vector2D,
    size: Vector2D,
    radius: f32,
    direction: ShapeDirection,
) -> PathGeometry {
    let half = size / 2.0;
    let left = position.x - half.x;
    let right = position.x + half.x;
    let top = position.y - half.y;
    let bottom = position.y + half.y;
    let radius = radius.min(half.x.abs()).min(half.y.abs()).max(0.0);
    let geometry = if radius <= 0.0 {
        PathGeometry {
            closed: true,
            vertices: vec![
                Vector2D::new(right, top),
                Vector2D::new(right, bottom),
                Vector2D::new(left, bottom),
                Vector2D::new(left, top),
            ],
            in_tangents: vec![Vector2D::zero(); 4],
            out_tangents: vec![Vector2D::zero(); 4],
        }
    } else {
        let k = radius * CUBIC_ARC;
        let zero = Vector2D::zero();
        PathGeometry {
            closed: true,
            vertices: vec![
                Vector2D::new(right, top + radius),
                Vector2D::new(right, bottom - radius),
                Vector2D::new(right - radius, bottom),
                Vector2D::new(left + radius, bottom),
                Vector2D::new(left, bottom - radius),
                Vector2D::new(left, top + radius),
                Vector2D::new(left + radius, top),
                Vector2D::new(right - radius, top),
            ],
            in_tangents: vec![
                Vector2D::new(0.0, -k),
                zero,
                Vector2D::new(k, 0.0),
                zero,
                Vector2D::new(0.0, k),
                zero,
                Vector2D::new(-k, 0.0),
                zero,
            ],
            out_tangents: vec![
                zero,
                Vector2D::new(0.0, k),
                zero,
                Vector2D::new(-k, 0.0),
                zero,
                Vector2D::new(0.0, -k),
                zero,
                Vector2D::new(k, 0.0),
            ],
        }
    };
    apply_direction(geometry, direction)
}

pub struct PolyStarParams {
    pub position: Vector2D,
    pub points: f32,
    pub rotation: f32,
    pub outer_radius: f32,
    pub outer_roundness: f32,
    pub inner_radius: f32,
    pub inner_roundness: f32,
    pub star_type: PolyStarType,
    pub direction: ShapeDirection,
}

/// A star or regular polygon, first point straight up before rotation.
/// Roundness bends each point by scaling a tangent perpendicular to its
/// radius.
pub fn polystar(params: &PolyStarParams) -> PathGeometry {
    let points = params.points.round().max(3.0) as usize;
    let start = (params.rotation - 90.0).to_radians();
    let (count, magic) = match params.star_type {
        PolyStarType::Star => (points * 2, STAR_ROUNDNESS),
        PolyStarType::Polygon => (points, POLYGON_ROUNDNESS),
    };
    let step = std::f32::consts::TAU / count as f32;
    let mut vertices = Vec::with_capacity(count);
    let mut in_tangents = Vec::with_capacity(count);
    let mut out_tangents = Vec::with_capacity(count);
    for index in 0..count {
        let outer = params.star_type == PolyStarType::Polygon || index % 2 == 0;
        let (radius, roundness) = if outer {
            (params.outer_radius, params.outer_roundness)
        } else {
            (params.inner_radius, params.inner_roundness)
        };
        let angle = start + step * index as f32;
        let (sin, cos) = angle.sin_cos();
        vertices.push(params.position + Vector2D::new(cos, sin) * radius);
        let tangent = Vector2D::new(-sin, cos) * (radius * roundness / 100.0 * magic);
        in_tangents.push(-tangent);
        out_tangents.push(tangent);
    }
    apply_direction(
        PathGeometry {
            closed: true,
            vertices,
            in_tangents,
            out_tangents,
        },
        params.direction,
    )
}

pub fn with_direction(geometry: &PathGeometry, direction: ShapeDirection) -> PathGeometry {
    apply_direction(geometry.clone(), direction)
}

/// Rounds every hard corner (a vertex whose tangents are both zero) by
/// pulling it apart into two vertices offset along the adjacent edges.
/// Vertices that already carry tangents are left alone.
pub fn round_corners(geometry: &PathGeometry, radius: f32) -> PathGeometry {
    let count = geometry.vertices.len();
    if radius <= 0.0 || count < 3 {
        return geometry.clone();
    }
    let mut vertices = Vec::with_capacity(count * 2);
    let mut in_tangents = Vec::with_capacity(count * 2);
    let mut out_tangents = Vec::with_capacity(count * 2);
    for index in 0..count {
        let vertex = geometry.vertices[index];
        let hard = geometry.in_tangents[index] == Vector2D::zero()
            && geometry.out_tangents[index] == Vector2D::zero();
        let interior = geometry.closed || (index > 0 && index + 1 < count);
        if !hard || !interior {
            vertices.push(vertex);
            in_tangents.push(geometry.in_tangents[index]);
            out_tangents.push(geometry.out_tangents[index]);
            continue;
        }
        let previous = geometry.vertices[(index + count - 1) % count];
        let next = geometry.vertices[(index + 1) % count];
        let to_previous = previous - vertex;
        let to_next = next - vertex;
        let cut_previous = radius.min(to_previous.length() / 2.0);
        let cut_next = radius.min(to_next.length() / 2.0);
        let entry = vertex + normalized(to_previous) * cut_previous;
        let exit = vertex + normalized(to_next) * cut_next;
        vertices.push(entry);
        in_tangents.push(Vector2D::zero());
        out_tangents.push((vertex - entry) * CUBIC_ARC);
        vertices.push(exit);
        in_tangents.push((vertex - exit) * CUBIC_ARC);
        out_tangents.push(Vector2D::zero());
    }
    PathGeometry {
        closed: geometry.closed,
        vertices,
        in_tangents,
        out_tangents,
    }
}

fn normalized(v: Vector2D) -> Vector2D {
    let length = v.length();
    if length <= 0.0 {
        Vector2D::zero()
    } else {
        v / length
    }
}

/// Appends the geometry to a lyon path builder as cubic segments.
pub fn to_path(geometry: &PathGeometry, builder: &mut Builder) {
    let count = geometry.vertices.len();
    if count == 0 {
        return;
    }
    builder.begin(geometry.vertices[0].to_point());
    for index in 1..count {
        let from = geometry.vertices[index - 1];
        let to = geometry.vertices[index];
        builder.cubic_bezier_to(
            (from + geometry.out_tangents[index - 1]).to_point(),
            (to + geometry.in_tangents[index]).to_point(),
            to.to_point(),
        );
    }
    if geometry.closed && count > 1 {
        let from = geometry.vertices[count - 1];
        let to = geometry.vertices[0];
        builder.cubic_bezier_to(
            (from + geometry.out_tangents[count - 1]).to_point(),
            (to + geometry.in_tangents[0]).to_point(),
            to.to_point(),
        );
        builder.close();
    } else {
        builder.end(false);
    }
}

fn segment_curves(geometry: &PathGeometry) -> Vec<Curve<Coord2>> {
    let count = geometry.vertices.len();
    let mut curves = Vec::new();
    if count < 2 {
        return curves;
    }
    let segments = if geometry.closed { count } else { count - 1 };
    for index in 0..segments {
        let next = (index + 1) % count;
        let from = geometry.vertices[index];
        let to = geometry.vertices[next];
        let cp1 = from + geometry.out_tangents[index];
        let cp2 = to + geometry.in_tangents[next];
        curves.push(Curve::from_points(
            Coord2(from.x as f64, from.y as f64),
            (
                Coord2(cp1.x as f64, cp1.y as f64),
                Coord2(cp2.x as f64, cp2.y as f64),
            ),
            Coord2(to.x as f64, to.y as f64),
        ));
    }
    curves
}

fn chord_length(curve: &Curve<Coord2>) -> f64 {
    const STEPS: usize = 16;
    let mut previous = curve.point_at_pos(0.0);
    let mut total = 0.0;
    for step in 1..=STEPS {
        let point = curve.point_at_pos(step as f64 / STEPS as f64);
        total += ((point.0 - previous.0).powi(2) + (point.1 - previous.1).powi(2)).sqrt();
        previous = point;
    }
    total
}

fn emit_curves(curves: &[Curve<Coord2>], closed: bool, builder: &mut Builder) {
    let Some(first) = curves.first() else {
        return;
    };
    let start = first.start_point();
    builder.begin(lyon_path::math::point(start.0 as f32, start.1 as f32));
    for curve in curves {
        let (cp1, cp2) = curve.control_points;
        let end = curve.end_point;
        builder.cubic_bezier_to(
            lyon_path::math::point(cp1.0 as f32, cp1.1 as f32),
            lyon_path::math::point(cp2.0 as f32, cp2.1 as f32),
            lyon_path::math::point(end.0 as f32, end.1 as f32),
        );
    }
    if closed {
        builder.close();
    } else {
        builder.end(false);
    }
}

/// Cuts one arc-length window out of the segment list and appends it to
/// the builder. `from`/`to` are fractions of the total length.
fn emit_window(curves: &[Curve<Coord2>], lengths: &[f64], total: f64, from: f64, to: f64, builder: &mut Builder) {
    if to <= from {
        return;
    }
    let target_start = from * total;
    let target_end = to * total;
    let mut piece = Vec::new();
    let mut walked = 0.0;
    for (curve, length) in curves.iter().zip(lengths) {
        let begin = walked;
        let end = walked + length;
        walked = end;
        if end <= target_start || begin >= target_end || *length <= 0.0 {
            continue;
        }
        let t1 = ((target_start - begin) / length).clamp(0.0, 1.0);
        let t2 = ((target_end - begin) / length).clamp(0.0, 1.0);
        let mut section = curve.clone();
        if t1 > 0.0 {
            let (_, tail): (Curve<Coord2>, Curve<Coord2>) = section.subdivide(t1);
            section = tail;
        }
        if t2 < 1.0 {
            let local = (t2 - t1) / (1.0 - t1);
            let (head, _): (Curve<Coord2>, Curve<Coord2>) = section.subdivide(local);
            section = head;
        }
        piece.push(section);
    }
    emit_curves(&piece, false, builder);
}

/// Trims the geometry to the `[start, end]` arc-length window. `start` and
/// `end` are percentages, `offset` is degrees with a full turn shifting the
/// window once around a closed path. A window that wraps past the end of a
/// closed path emits two subpaths.
pub fn trim(geometry: &PathGeometry, start: f32, end: f32, offset: f32, builder: &mut Builder) {
    let mut from = (start / 100.0) as f64;
    let mut to = (end / 100.0) as f64;
    if from > to {
        std::mem::swap(&mut from, &mut to);
    }
    let shift = (offset / 360.0) as f64;
    from += shift;
    to += shift;
    if to - from >= 1.0 {
        to_path(geometry, builder);
        return;
    }
    if to <= from {
        return;
    }
    let curves = segment_curves(geometry);
    let lengths: Vec<f64> = curves.iter().map(chord_length).collect();
    let total: f64 = lengths.iter().sum();
    if total <= 0.0 {
        return;
    }
    if geometry.closed {
        // Normalize the window into [0,1), wrapping around the seam.
        let span = to - from;
        let from = from.rem_euclid(1.0);
        let to = from + span;
        if to > 1.0 {
            emit_window(&curves, &lengths, total, from, 1.0, builder);
            emit_window(&curves, &lengths, total, 0.0, to - 1.0, builder);
        } else {
            emit_window(&curves, &lengths, total, from, to, builder);
        }
    } else {
        emit_window(
            &curves,
            &lengths,
            total,
            from.clamp(0.0, 1.0),
            to.clamp(0.0, 1.0),
            builder,
        );
    }
}
