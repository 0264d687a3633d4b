use kinetic_model::{read, Easing, LayerContent, Shape, TrimMultipleShape};
use serde_json::json;

fn minimal_doc() -> serde_json::Value {
    json!({
        "v": "5.5.2",
        "nm": "demo",
        "ip": 0.0,
        "op": 120.0,
        "fr": 30.0,
        "w": 512,
        "h": 512,
        "layers": []
    })
}

#[test]
fn reads_minimal_composition() {
    let (composition, issues) = read(&minimal_doc());
    let composition = composition.expect("composition should parse");
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    assert_eq!(composition.width, 512);
    assert_eq!(composition.start_frame, 0.0);
    assert_eq!(composition.end_frame, 120.0);
    assert_eq!(composition.name.as_deref(), Some("demo"));
    assert!((composition.duration() - 4.0).abs() < 1e-9);
}

#[test]
fn missing_required_field_is_fatal() {
    let mut doc = minimal_doc();
    doc.as_object_mut().unwrap().remove("fr");
    let (composition, issues) = read(&doc);
    assert!(composition.is_none());
    assert!(issues.iter().any(|i| i.contains("`fr`")));
}

#[test]
fn inverted_frame_range_is_fatal() {
    let mut doc = minimal_doc();
    doc["op"] = json!(-10.0);
    let (composition, issues) = read(&doc);
    assert!(composition.is_none());
    assert!(!issues.is_empty());
}

#[test]
fn non_object_root_is_fatal() {
    let (composition, issues) = read(&json!([1, 2, 3]));
    assert!(composition.is_none());
    assert_eq!(issues.len(), 1);
}

fn shape_layer(shapes: serde_json::Value) -> serde_json::Value {
    json!({
        "ty": 4,
        "nm": "shapes",
        "ip": 0.0,
        "op": 120.0,
        "st": 0.0,
        "ks": {},
        "shapes": shapes
    })
}

#[test]
fn matte_source_layer_is_dropped_with_issue() {
    let mut doc = minimal_doc();
    let mut layer = shape_layer(json!([]));
    layer["td"] = json!(1);
    doc["layers"] = json!([layer]);
    let (composition, issues) = read(&doc);
    let composition = composition.unwrap();
    assert!(composition.layers.is_empty());
    assert!(issues.iter().any(|i| i.contains("matte source")));
}

#[test]
fn unsupported_features_are_non_fatal() {
    let mut doc = minimal_doc();
    let mut layer = shape_layer(json!([]));
    layer["ef"] = json!([{"ty": 29}]);
    layer["masksProperties"] = json!([{"mode": "a"}]);
    doc["layers"] = json!([layer]);
    let (composition, issues) = read(&doc);
    let composition = composition.unwrap();
    assert_eq!(composition.layers.len(), 1);
    assert!(issues.iter().any(|i| i.contains("effects")));
    assert!(issues.iter().any(|i| i.contains("masks")));
}

#[test]
fn unknown_shape_type_is_stripped_not_fatal() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([shape_layer(json!([
        {"ty": "zz", "nm": "zigzag", "r": {"k": 1.0}, "s": {"k": 1.0}, "pt": {"k": 2.0}},
        {"ty": "fl", "nm": "fill", "c": {"k": [1.0, 0.0, 0.0]}, "o": {"k": 100.0}}
    ]))]);
    let (composition, issues) = read(&doc);
    let composition = composition.unwrap();
    let LayerContent::Shape(group) = &composition.layers[0].content else {
        panic!("expected a shape layer");
    };
    assert_eq!(group.shapes.len(), 1);
    assert!(matches!(group.shapes[0].shape, Shape::Fill(_)));
    assert!(issues.iter().any(|i| i.contains("`zz`")));
}

#[test]
fn byte_and_normalized_colors_converge() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([
        shape_layer(json!([
            {"ty": "fl", "nm": "bytes", "c": {"k": [255.0, 0.0, 0.0]}, "o": {"k": 100.0}}
        ])),
        shape_layer(json!([
            {"ty": "fl", "nm": "normalized", "c": {"k": [1.0, 0.0, 0.0]}, "o": {"k": 100.0}}
        ])),
    ]);
    let (composition, _) = read(&doc);
    let composition = composition.unwrap();
    let mut colors = composition.layers.iter().map(|layer| {
        let LayerContent::Shape(group) = &layer.content else {
            panic!("expected shape layers");
        };
        let Shape::Fill(fill) = &group.shapes[0].shape else {
            panic!("expected fills");
        };
        fill.color.keyframes[0].start_value
    });
    let a = colors.next().unwrap();
    let b = colors.next().unwrap();
    assert_eq!(a, b);
    assert_eq!(a.r, 255);
}

#[test]
fn solid_layer_color_parses_from_hex() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([{
        "ty": 1,
        "nm": "bg",
        "ip": 0.0,
        "op": 120.0,
        "st": 0.0,
        "ks": {},
        "sc": "#ff8000",
        "sw": 512.0,
        "sh": 512.0
    }]);
    let (composition, issues) = read(&doc);
    let composition = composition.unwrap();
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    let LayerContent::SolidColor { color, width, .. } = &composition.layers[0].content else {
        panic!("expected a solid layer");
    };
    assert_eq!((color.r, color.g, color.b), (255, 128, 0));
    assert_eq!(*width, 512.0);
}

#[test]
fn markers_are_read_in_order() {
    let mut doc = minimal_doc();
    doc["markers"] = json!([
        {"cm": "intro", "tm": 0.0, "dr": 30.0},
        {"cm": "loop", "tm": 30.0, "dr": 90.0}
    ]);
    let (composition, _) = read(&doc);
    let composition = composition.unwrap();
    assert_eq!(composition.markers.len(), 2);
    assert_eq!(composition.marker("loop").unwrap().frame, 30.0);
}

#[test]
fn keyframes_build_contiguous_spans() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([shape_layer(json!([{
        "ty": "fl",
        "nm": "fill",
        "c": {"k": [1.0, 1.0, 1.0]},
        "o": {"a": 1, "k": [
            {"t": 0.0, "s": [0.0], "e": [50.0]},
            {"t": 30.0, "s": [50.0]},
            {"t": 60.0}
        ]}
    }]))]);
    let (composition, _) = read(&doc);
    let composition = composition.unwrap();
    let LayerContent::Shape(group) = &composition.layers[0].content else {
        panic!("expected a shape layer");
    };
    let Shape::Fill(fill) = &group.shapes[0].shape else {
        panic!("expected a fill");
    };
    let keyframes = &fill.opacity.keyframes;
    assert_eq!(keyframes.len(), 2);
    assert_eq!(keyframes[0].start_frame, 0.0);
    assert_eq!(keyframes[0].end_frame, Some(30.0));
    assert_eq!(keyframes[0].end_value, Some(50.0));
    // The t-only terminator closes the final span.
    assert_eq!(keyframes[1].start_frame, 30.0);
    assert_eq!(keyframes[1].end_frame, Some(60.0));
}

#[test]
fn hold_keyframes_keep_their_start_value() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([shape_layer(json!([{
        "ty": "fl",
        "nm": "fill",
        "c": {"k": [1.0, 1.0, 1.0]},
        "o": {"a": 1, "k": [
            {"t": 0.0, "s": [10.0], "h": 1},
            {"t": 40.0, "s": [90.0]}
        ]}
    }]))]);
    let (composition, _) = read(&doc);
    let composition = composition.unwrap();
    let LayerContent::Shape(group) = &composition.layers[0].content else {
        panic!("expected a shape layer");
    };
    let Shape::Fill(fill) = &group.shapes[0].shape else {
        panic!("expected a fill");
    };
    let first = &fill.opacity.keyframes[0];
    assert_eq!(first.easing, Easing::Hold);
    assert_eq!(first.end_value, Some(10.0));
    // Terminal keyframe stays open-ended.
    assert_eq!(fill.opacity.keyframes[1].end_frame, None);
}

#[test]
fn trim_mode_parses() {
    let mut doc = minimal_doc();
    doc["layers"] = json!([shape_layer(json!([{
        "ty": "tm",
        "nm": "trim",
        "s": {"k": 0.0},
        "e": {"k": 50.0},
        "o": {"k": 0.0},
        "m": 2
    }]))]);
    let (composition, _) = read(&doc);
    let composition = composition.unwrap();
    let LayerContent::Shape(group) = &composition.layers[0].content else {
        panic!("expected a shape layer");
    };
    let Shape::Trim { multiple_shape, .. } = &group.shapes[0].shape else {
        panic!("expected a trim");
    };
    assert_eq!(*multiple_shape, TrimMultipleShape::Simultaneously);
}
