use kinetic_model::{Animated, PathGeometry, Transform, Vector2D};
use serde_json::json;

#[test]
fn transform_with_split_defaults() {
    let value = json!({
        "a": {"k": [50.0, 50.0]},
        "p": {"k": [100.0, 200.0]},
        "r": {"k": 45.0}
    });
    let transform: Transform = match serde_path_to_error::deserialize(&value) {
        Ok(t) => t,
        Err(e) => panic!("failed at {}: {e}", e.path()),
    };
    assert_eq!(
        transform.anchor.unwrap().keyframes[0].start_value,
        Vector2D::new(50.0, 50.0)
    );
    // Omitted scale and opacity fall back to 100.
    assert_eq!(
        transform.scale.keyframes[0].start_value,
        Vector2D::new(100.0, 100.0)
    );
    assert_eq!(transform.opacity.keyframes[0].start_value, 100.0);
}

#[test]
fn path_geometry_from_arrays() {
    let value = json!({
        "a": 0,
        "k": {
            "c": true,
            "v": [[0.0, 0.0], [100.0, 0.0], [100.0, 100.0]],
            "i": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]],
            "o": [[0.0, 0.0], [0.0, 0.0], [0.0, 0.0]]
        }
    });
    let animated: Animated<PathGeometry> = match serde_path_to_error::deserialize(&value) {
        Ok(a) => a,
        Err(e) => panic!("failed at {}: {e}", e.path()),
    };
    let geometry = &animated.keyframes[0].start_value;
    assert!(geometry.closed);
    assert_eq!(geometry.segments(), 3);
    assert_eq!(geometry.vertices[1], Vector2D::new(100.0, 0.0));
}

#[test]
fn spatial_tangents_survive_parsing() {
    let value = json!({
        "a": 1,
        "k": [
            {
                "t": 0.0,
                "s": [0.0, 0.0],
                "e": [100.0, 0.0],
                "to": [0.0, 50.0],
                "ti": [0.0, -50.0]
            },
            {"t": 60.0, "s": [100.0, 0.0]}
        ]
    });
    let animated: Animated<Vector2D> = serde_json::from_value(value).unwrap();
    let first = &animated.keyframes[0];
    assert_eq!(first.spatial_out, Some(Vector2D::new(0.0, 50.0)));
    assert_eq!(first.spatial_in, Some(Vector2D::new(0.0, -50.0)));
}
