use glam::Mat4;
use kinetic_core::{resolve, Brush, PaintStyle, RecordingCanvas, ResolveOptions};
use kinetic_model::{
    Animated, Composite, Ellipse, Fill, FillRule, MergeMode, RepeaterTransform, Rgb, Shape,
    ShapeDirection, ShapeLayer, TrimMultipleShape, Vector2D,
};
use lyon_path::Event;

fn layer(shape: Shape) -> ShapeLayer {
    ShapeLayer {
        name: None,
        match_name: None,
        hidden: false,
        shape,
    }
}

fn ellipse() -> Shape {
    Shape::Ellipse(Ellipse {
        direction: ShapeDirection::Clockwise,
        position: Animated::from_value(Vector2D::new(50.0, 50.0)),
        size: Animated::from_value(Vector2D::new(40.0, 40.0)),
    })
}

fn red_fill() -> Shape {
    Shape::Fill(Fill {
        opacity: Animated::from_value(100.0),
        color: Animated::from_value(Rgb::new_u8(255, 0, 0)),
        fill_rule: FillRule::NonZero,
    })
}

fn trim(start: f32, end: f32, mode: TrimMultipleShape) -> Shape {
    Shape::Trim {
        start: Animated::from_value(start),
        end: Animated::from_value(end),
        offset: Animated::from_value(0.0),
        multiple_shape: mode,
    }
}

fn evaluate(shapes: Vec<ShapeLayer>, options: &ResolveOptions) -> (RecordingCanvas, Vec<String>) {
    let (tree, issues) = resolve(&shapes, options);
    let mut canvas = RecordingCanvas::new();
    tree.evaluate(0.0, &mut canvas, Mat4::IDENTITY, 1.0)
        .unwrap();
    (canvas, issues)
}

#[test]
fn shape_paints_with_the_style_above_it() {
    let (canvas, issues) = evaluate(
        vec![layer(ellipse()), layer(red_fill())],
        &ResolveOptions::default(),
    );
    assert!(issues.is_empty());
    assert_eq!(canvas.calls.len(), 1);
    let (_, paint, _) = &canvas.calls[0];
    assert_eq!(paint.brush, Brush::Solid(kinetic_model::Rgba::new_u8(255, 0, 0, 255)));
    assert_eq!(
        paint.style,
        PaintStyle::Fill {
            rule: FillRule::NonZero
        }
    );
    assert_eq!(paint.alpha, 1.0);
}

#[test]
fn style_below_a_shape_does_not_paint_it() {
    let (canvas, _) = evaluate(
        vec![layer(red_fill()), layer(ellipse())],
        &ResolveOptions::default(),
    );
    assert!(canvas.calls.is_empty());
}

#[test]
fn hidden_entries_produce_no_content() {
    let mut hidden = layer(ellipse());
    hidden.hidden = true;
    let (canvas, _) = evaluate(vec![hidden, layer(red_fill())], &ResolveOptions::default());
    assert!(canvas.calls.is_empty());
}

#[test]
fn trim_opens_a_closed_ellipse() {
    let (full, _) = evaluate(
        vec![layer(ellipse()), layer(red_fill())],
        &ResolveOptions::default(),
    );
    let (trimmed, _) = evaluate(
        vec![
            layer(ellipse()),
            layer(trim(0.0, 50.0, TrimMultipleShape::Simultaneously)),
            layer(red_fill()),
        ],
        &ResolveOptions::default(),
    );
    let closed = |canvas: &RecordingCanvas| {
        canvas.calls[0]
            .0
            .iter()
            .any(|event| matches!(event, Event::End { close: true, .. }))
    };
    assert!(closed(&full));
    assert!(!closed(&trimmed));
}

#[test]
fn empty_trim_window_removes_the_geometry() {
    let (canvas, _) = evaluate(
        vec![
            layer(ellipse()),
            layer(trim(30.0, 30.0, TrimMultipleShape::Simultaneously)),
            layer(red_fill()),
        ],
        &ResolveOptions::default(),
    );
    // The trimmed path is empty; nothing reaches the canvas for it.
    assert!(canvas.calls.is_empty() || canvas.calls[0].0.iter().next().is_none());
}

#[test]
fn simultaneous_trim_claims_stop_at_a_second_trim() {
    // The upper trim claims both shapes; the lower one finds nothing
    // left and the list still renders two styled shapes.
    let (canvas, _) = evaluate(
        vec![
            layer(ellipse()),
            layer(trim(0.0, 25.0, TrimMultipleShape::Simultaneously)),
            layer(ellipse()),
            layer(trim(0.0, 50.0, TrimMultipleShape::Simultaneously)),
            layer(red_fill()),
        ],
        &ResolveOptions::default(),
    );
    assert_eq!(canvas.calls.len(), 2);
}

#[test]
fn trim_survives_absorption_by_a_repeater() {
    // The ellipse is consumed by the repeater below it; the trim above
    // still applies inside every copy.
    let repeater = Shape::Repeater {
        copies: Animated::from_value(2.0),
        offset: Animated::from_value(0.0),
        composite: Composite::Above,
        transform: RepeaterTransform {
            anchor: None,
            position: Some(Animated::from_value(Vector2D::new(100.0, 0.0))),
            scale: Animated::from_value(Vector2D::new(100.0, 100.0)),
            rotation: Animated::from_value(0.0),
            start_opacity: Animated::from_value(100.0),
            end_opacity: Animated::from_value(100.0),
        },
    };
    let (canvas, _) = evaluate(
        vec![
            layer(repeater),
            layer(ellipse()),
            layer(trim(0.0, 50.0, TrimMultipleShape::Simultaneously)),
            layer(red_fill()),
        ],
        &ResolveOptions::default(),
    );
    assert_eq!(canvas.calls.len(), 2);
    for (path, _, _) in &canvas.calls {
        assert!(!path
            .iter()
            .any(|event| matches!(event, Event::End { close: true, .. })));
    }
}

#[test]
fn repeater_expands_copies_with_distinct_transforms() {
    let repeater = Shape::Repeater {
        copies: Animated::from_value(3.0),
        offset: Animated::from_value(0.0),
        composite: Composite::Above,
        transform: RepeaterTransform {
            anchor: None,
            position: Some(Animated::from_value(Vector2D::new(100.0, 0.0))),
            scale: Animated::from_value(Vector2D::new(100.0, 100.0)),
            rotation: Animated::from_value(0.0),
            start_opacity: Animated::from_value(100.0),
            end_opacity: Animated::from_value(100.0),
        },
    };
    let (canvas, issues) = evaluate(
        vec![layer(repeater), layer(ellipse()), layer(red_fill())],
        &ResolveOptions::default(),
    );
    assert!(issues.is_empty());
    assert_eq!(canvas.calls.len(), 3);
    let x = |index: usize| canvas.calls[index].2.w_axis.x;
    assert_eq!(x(0), 0.0);
    assert_eq!(x(1), 100.0);
    assert_eq!(x(2), 200.0);
}

#[test]
fn repeater_fades_between_start_and_end_opacity() {
    let repeater = Shape::Repeater {
        copies: Animated::from_value(3.0),
        offset: Animated::from_value(0.0),
        composite: Composite::Above,
        transform: RepeaterTransform {
            anchor: None,
            position: None,
            scale: Animated::from_value(Vector2D::new(100.0, 100.0)),
            rotation: Animated::from_value(0.0),
            start_opacity: Animated::from_value(100.0),
            end_opacity: Animated::from_value(0.0),
        },
    };
    let (canvas, _) = evaluate(
        vec![layer(repeater), layer(ellipse()), layer(red_fill())],
        &ResolveOptions::default(),
    );
    assert_eq!(canvas.calls.len(), 3);
    assert_eq!(canvas.calls[0].1.alpha, 1.0);
    assert_eq!(canvas.calls[1].1.alpha, 0.5);
    assert_eq!(canvas.calls[2].1.alpha, 0.0);
}

#[test]
fn group_content_repeats_for_outer_styles() {
    let group = Shape::Group {
        shapes: vec![layer(ellipse()), layer(red_fill())],
    };
    let (canvas, _) = evaluate(
        vec![layer(group), layer(red_fill())],
        &ResolveOptions::default(),
    );
    // Once for the fill inside the group, once for the one above it.
    assert_eq!(canvas.calls.len(), 2);
}

#[test]
fn merge_paths_disabled_by_default() {
    let (canvas, issues) = evaluate(
        vec![
            layer(Shape::Merge {
                mode: MergeMode::Merge,
            }),
            layer(ellipse()),
            layer(red_fill()),
        ],
        &ResolveOptions::default(),
    );
    assert_eq!(issues.len(), 1);
    assert!(issues[0].contains("merge"));
    // The merge node is gone but the rest of the list still renders.
    assert_eq!(canvas.calls.len(), 1);
}

#[test]
fn enabled_merge_concatenates_absorbed_shapes() {
    let options = ResolveOptions {
        enable_merge_paths: true,
    };
    let (canvas, issues) = evaluate(
        vec![
            layer(Shape::Merge {
                mode: MergeMode::Merge,
            }),
            layer(ellipse()),
            layer(ellipse()),
            layer(red_fill()),
        ],
        &options,
    );
    assert!(issues.is_empty());
    // Everything above the merge is absorbed; the merged path paints
    // once with the absorbed fill.
    assert_eq!(canvas.calls.len(), 1);
    let begins = canvas.calls[0]
        .0
        .iter()
        .filter(|event| matches!(event, Event::Begin { .. }))
        .count();
    assert_eq!(begins, 2);
}
