use glam::Mat4;
use kinetic_core::{Animation, Brush, RecordingCanvas, ResolveOptions};
use serde_json::json;

fn document(layers: serde_json::Value, assets: serde_json::Value) -> serde_json::Value {
    json!({
        "v": "5.7.1",
        "ip": 0,
        "op": 60,
        "fr": 30,
        "w": 200,
        "h": 200,
        "layers": layers,
        "assets": assets,
    })
}

fn solid_layer(index: u32, color: &str) -> serde_json::Value {
    json!({
        "ty": 1,
        "ind": index,
        "ip": 0,
        "op": 60,
        "st": 0,
        "sc": color,
        "sw": 10,
        "sh": 20,
        "ks": {},
    })
}

fn animation(document: &serde_json::Value) -> Animation {
    let (animation, issues) =
        Animation::from_json(document, &ResolveOptions::default()).expect("fatal issues");
    assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    animation
}

#[test]
fn solid_layer_renders_one_rectangle() {
    let animation = animation(&document(json!([solid_layer(1, "#ff0000")]), json!([])));
    let mut canvas = RecordingCanvas::new();
    animation.render(0.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
    let (path, paint, transform) = &canvas.calls[0];
    assert_eq!(
        paint.brush,
        Brush::Solid(kinetic_model::Rgba::new_u8(255, 0, 0, 255))
    );
    assert_eq!(*transform, Mat4::IDENTITY);
    assert!(path.iter().next().is_some());
}

#[test]
fn layers_outside_their_window_are_skipped() {
    let mut layer = solid_layer(1, "#00ff00");
    layer["ip"] = json!(10);
    layer["op"] = json!(20);
    let animation = animation(&document(json!([layer]), json!([])));
    let mut canvas = RecordingCanvas::new();
    animation.render(5.0, &mut canvas).unwrap();
    assert!(canvas.calls.is_empty());
    let mut canvas = RecordingCanvas::new();
    animation.render(15.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
    let mut canvas = RecordingCanvas::new();
    animation.render(20.0, &mut canvas).unwrap();
    assert!(canvas.calls.is_empty(), "end frame is exclusive");
}

#[test]
fn document_top_layer_draws_last() {
    let animation = animation(&document(
        json!([solid_layer(1, "#ff0000"), solid_layer(2, "#0000ff")]),
        json!([]),
    ));
    let mut canvas = RecordingCanvas::new();
    animation.render(0.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 2);
    // The first entry of the document paints on top, so it records last.
    assert_eq!(
        canvas.calls[1].1.brush,
        Brush::Solid(kinetic_model::Rgba::new_u8(255, 0, 0, 255))
    );
}

#[test]
fn parent_transform_chains_into_the_child() {
    let layers = json!([
        {
            "ty": 1,
            "ind": 1,
            "parent": 2,
            "ip": 0, "op": 60, "st": 0,
            "sc": "#ff0000", "sw": 10, "sh": 10,
            "ks": {},
        },
        {
            "ty": 3,
            "ind": 2,
            "ip": 0, "op": 60, "st": 0,
            "ks": { "p": { "a": 0, "k": [30.0, 40.0] } },
        },
    ]);
    let animation = animation(&document(layers, json!([])));
    let mut canvas = RecordingCanvas::new();
    animation.render(0.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
    let transform = canvas.calls[0].2;
    assert_eq!(transform.w_axis.x, 30.0);
    assert_eq!(transform.w_axis.y, 40.0);
}

#[test]
fn self_parenting_is_detached_with_an_issue() {
    let mut layer = solid_layer(1, "#ff0000");
    layer["parent"] = json!(1);
    let (animation, issues) = Animation::from_json(
        &document(json!([layer]), json!([])),
        &ResolveOptions::default(),
    )
    .expect("fatal issues");
    assert!(issues.iter().any(|issue| issue.contains("parents itself")));
    let mut canvas = RecordingCanvas::new();
    animation.render(0.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
}

#[test]
fn precomposition_expands_its_asset_layers() {
    let assets = json!([{
        "id": "comp_0",
        "layers": [solid_layer(1, "#0000ff")],
    }]);
    let layers = json!([{
        "ty": 0,
        "ind": 1,
        "refId": "comp_0",
        "ip": 0, "op": 60, "st": 0,
        "w": 100, "h": 100,
        "ks": { "p": { "a": 0, "k": [50.0, 0.0] } },
    }]);
    let animation = animation(&document(layers, assets));
    let mut canvas = RecordingCanvas::new();
    animation.render(0.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
    // The host layer's transform applies to the expanded child.
    assert_eq!(canvas.calls[0].2.w_axis.x, 50.0);
}

#[test]
fn missing_precomposition_asset_is_an_issue() {
    let layers = json!([{
        "ty": 0,
        "ind": 1,
        "refId": "nope",
        "ip": 0, "op": 60, "st": 0,
        "ks": {},
    }]);
    let (_, issues) = Animation::from_json(
        &document(layers, json!([])),
        &ResolveOptions::default(),
    )
    .expect("fatal issues");
    assert!(issues.iter().any(|issue| issue.contains("nope")));
}

#[test]
fn animator_takes_the_composition_bounds() {
    let animation = animation(&document(json!([]), json!([])));
    let animator = animation.animator();
    assert_eq!(animator.min_frame(), 0.0);
    assert_eq!(animator.max_frame(), 60.0);
}

#[test]
fn start_time_shifts_the_layer_clock() {
    let mut layer = solid_layer(1, "#ff0000");
    layer["st"] = json!(10);
    layer["ip"] = json!(0);
    layer["op"] = json!(20);
    let animation = animation(&document(json!([layer]), json!([])));
    let mut canvas = RecordingCanvas::new();
    // Composition frame 5 is local frame -5, before the window opens.
    animation.render(5.0, &mut canvas).unwrap();
    assert!(canvas.calls.is_empty());
    let mut canvas = RecordingCanvas::new();
    animation.render(15.0, &mut canvas).unwrap();
    assert_eq!(canvas.calls.len(), 1);
}
