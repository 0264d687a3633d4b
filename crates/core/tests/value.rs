use kinetic_core::easing;
use kinetic_core::{AnimatedExt, Error, Lerp, MotionProperty, Property};
use kinetic_model::{
    Animated, Easing, EasingHandle, GradientStop, KeyFrame, PathGeometry, Rgb, Rgba, Vector2D,
};

fn keyframe<T>(start: T, end: T, from: f64, to: f64, easing: Easing) -> KeyFrame<T> {
    KeyFrame {
        start_value: start,
        end_value: Some(end),
        start_frame: from,
        end_frame: Some(to),
        easing,
        spatial_out: None,
        spatial_in: None,
    }
}

fn animated<T: Clone>(keyframes: Vec<KeyFrame<T>>) -> Animated<T> {
    Animated {
        animated: true,
        keyframes,
    }
}

#[test]
fn linear_span_hits_both_endpoints() {
    let value = animated(vec![keyframe(0.0f32, 10.0, 0.0, 10.0, Easing::Linear)]);
    assert_eq!(value.sample(0.0).unwrap(), 0.0);
    assert_eq!(value.sample(5.0).unwrap(), 5.0);
    assert_eq!(value.sample(10.0).unwrap(), 10.0);
}

#[test]
fn sampling_clamps_outside_the_keyframe_range() {
    let value = animated(vec![keyframe(2.0f32, 8.0, 10.0, 20.0, Easing::Linear)]);
    assert_eq!(value.sample(-5.0).unwrap(), 2.0);
    assert_eq!(value.sample(100.0).unwrap(), 8.0);
}

#[test]
fn hold_keyframe_keeps_its_start_value() {
    let value = animated(vec![
        keyframe(1.0f32, 1.0, 0.0, 10.0, Easing::Hold),
        keyframe(5.0f32, 5.0, 10.0, 20.0, Easing::Hold),
    ]);
    assert_eq!(value.sample(0.0).unwrap(), 1.0);
    assert_eq!(value.sample(9.99).unwrap(), 1.0);
    assert_eq!(value.sample(10.0).unwrap(), 5.0);
    assert_eq!(value.sample(15.0).unwrap(), 5.0);
}

#[test]
fn open_terminal_keyframe_holds_forever() {
    let value = animated(vec![KeyFrame {
        start_value: 7.0f32,
        end_value: None,
        start_frame: 0.0,
        end_frame: None,
        easing: Easing::Linear,
        spatial_out: None,
        spatial_in: None,
    }]);
    assert_eq!(value.sample(0.0).unwrap(), 7.0);
    assert_eq!(value.sample(1000.0).unwrap(), 7.0);
}

#[test]
fn missing_end_value_in_closed_span_is_an_error() {
    let value = animated(vec![KeyFrame {
        start_value: 7.0f32,
        end_value: None,
        start_frame: 0.0,
        end_frame: Some(10.0),
        easing: Easing::Linear,
        spatial_out: None,
        spatial_in: None,
    }]);
    assert_eq!(value.sample(5.0), Err(Error::MissingEndValue(10.0)));
}

#[test]
fn color_lerp_is_exact_at_endpoints() {
    let black = Rgb::new_u8(0, 0, 0);
    let white = Rgb::new_u8(255, 255, 255);
    assert_eq!(black.lerp(&white, 0.0), black);
    assert_eq!(black.lerp(&white, 1.0), white);
}

#[test]
fn color_lerp_blends_in_linear_light() {
    let black = Rgb::new_u8(0, 0, 0);
    let white = Rgb::new_u8(255, 255, 255);
    let mid = black.lerp(&white, 0.5);
    // Halfway in linear light is brighter than the naive byte midpoint.
    assert!(mid.r > 180 && mid.r < 195, "got {}", mid.r);
    assert_eq!(mid.r, mid.g);
    assert_eq!(mid.g, mid.b);
}

#[test]
fn integer_lerp_rounds_to_nearest() {
    assert_eq!(0i32.lerp(&10, 0.26), 3);
    assert_eq!(0i32.lerp(&10, 0.24), 2);
}

#[test]
fn path_vertex_count_mismatch_is_reported() {
    let two = PathGeometry {
        closed: false,
        vertices: vec![Vector2D::zero(), Vector2D::new(1.0, 0.0)],
        in_tangents: vec![Vector2D::zero(); 2],
        out_tangents: vec![Vector2D::zero(); 2],
    };
    let three = PathGeometry {
        closed: false,
        vertices: vec![
            Vector2D::zero(),
            Vector2D::new(1.0, 0.0),
            Vector2D::new(2.0, 0.0),
        ],
        in_tangents: vec![Vector2D::zero(); 3],
        out_tangents: vec![Vector2D::zero(); 3],
    };
    let value = animated(vec![keyframe(two, three, 0.0, 10.0, Easing::Linear)]);
    assert_eq!(
        value.sample(5.0),
        Err(Error::PathSegmentMismatch { start: 2, end: 3 })
    );
}

#[test]
fn gradient_stop_count_mismatch_is_reported() {
    let stop = |offset: f32| GradientStop {
        offset,
        color: Rgba::new_u8(255, 0, 0, 255),
    };
    let two = vec![stop(0.0), stop(1.0)];
    let three = vec![stop(0.0), stop(0.5), stop(1.0)];
    let value = animated(vec![keyframe(two, three, 0.0, 10.0, Easing::Linear)]);
    assert_eq!(
        value.sample(5.0),
        Err(Error::GradientStopMismatch { start: 2, end: 3 })
    );
}

#[test]
fn easing_shape_endpoints_and_clamping() {
    let bezier = Easing::Bezier {
        out_tangent: EasingHandle { x: 0.4, y: 0.0 },
        in_tangent: EasingHandle { x: 0.6, y: 1.0 },
    };
    assert_eq!(easing::shape(&bezier, 0.0), 0.0);
    assert_eq!(easing::shape(&bezier, 1.0), 1.0);
    let mid = easing::shape(&bezier, 0.5);
    assert!(mid > 0.0 && mid < 1.0);
    assert_eq!(easing::shape(&bezier, -1.0), 0.0);
    assert_eq!(easing::shape(&bezier, 2.0), 1.0);
    assert_eq!(easing::shape(&bezier, f64::NAN), 0.0);
}

#[test]
fn ease_in_slows_the_first_half() {
    let ease_in = Easing::Bezier {
        out_tangent: EasingHandle { x: 0.9, y: 0.0 },
        in_tangent: EasingHandle { x: 1.0, y: 1.0 },
    };
    assert!(easing::shape(&ease_in, 0.5) < 0.5);
}

#[test]
fn motion_path_bends_away_from_the_chord() {
    let mut keyframe = keyframe(
        Vector2D::new(0.0, 0.0),
        Vector2D::new(10.0, 0.0),
        0.0,
        10.0,
        Easing::Linear,
    );
    keyframe.spatial_out = Some(Vector2D::new(0.0, -10.0));
    keyframe.spatial_in = Some(Vector2D::new(0.0, -10.0));
    let property = MotionProperty::new(animated(vec![keyframe]));
    let mid = property.sample(5.0).unwrap();
    assert!(mid.y < -1.0, "expected an arc, got {mid:?}");
    assert_eq!(property.sample(0.0).unwrap(), Vector2D::new(0.0, 0.0));
    assert_eq!(property.sample(10.0).unwrap(), Vector2D::new(10.0, 0.0));
}

#[test]
fn motion_without_spatial_tangents_is_a_straight_line() {
    let property = MotionProperty::new(animated(vec![keyframe(
        Vector2D::new(0.0, 0.0),
        Vector2D::new(10.0, 20.0),
        0.0,
        10.0,
        Easing::Linear,
    )]));
    assert_eq!(property.sample(5.0).unwrap(), Vector2D::new(5.0, 10.0));
}

#[test]
fn value_provider_overrides_keyframes() {
    let mut property = Property::fixed(1.0f32);
    property.set_value_provider(Box::new(|_| Some(42.0)));
    assert_eq!(property.sample(0.0).unwrap(), 42.0);
    property.clear_value_provider();
    assert_eq!(property.sample(0.0).unwrap(), 1.0);
}

#[test]
fn provider_may_decline_a_frame() {
    let mut property = Property::fixed(1.0f32);
    property.set_value_provider(Box::new(|frame| (frame > 5.0).then_some(9.0)));
    assert_eq!(property.sample(0.0).unwrap(), 1.0);
    assert_eq!(property.sample(6.0).unwrap(), 9.0);
}
