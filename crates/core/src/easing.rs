//! Interpolation-shape functions mapping linear local progress in `[0,1]`
//! to eased progress.

use flo_curves::bezier::{curve_intersects_line, Curve};
use flo_curves::{BezierCurveFactory, Coord2};
use kinetic_model::Easing;

/// Applies an easing to a local progress value. `t` is clamped to `[0,1]`
/// first; NaN counts as 0.
pub fn shape(easing: &Easing, t: f64) -> f64 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    match easing {
        Easing::Linear => t,
        // The value function short-circuits holds; defined here as well so
        // the shape alone is self-consistent.
        Easing::Hold => {
            if t < 1.0 {
                0.0
            } else {
                1.0
            }
        }
        Easing::Bezier {
            out_tangent,
            in_tangent,
        } => {
            if t <= 0.0 {
                return 0.0;
            }
            if t >= 1.0 {
                return 1.0;
            }
            let curve = Curve::from_points(
                Coord2(0.0, 0.0),
                (
                    Coord2(out_tangent.x as f64, out_tangent.y as f64),
                    Coord2(in_tangent.x as f64, in_tangent.y as f64),
                ),
                Coord2(1.0, 1.0),
            );
            // The x component is monotonic for control points with x in
            // [0,1], so the vertical line meets the curve exactly once.
            let intersections =
                curve_intersects_line(&curve, &(Coord2(t, -10.0), Coord2(t, 10.0)));
            match intersections.first() {
                Some((_, _, point)) => point.1,
                None => t,
            }
        }
    }
}
