//! Builds a [`Composition`] from an abstract parsed-document tree
//! (`serde_json::Value`), collecting non-fatal parse issues instead of
//! aborting on the first unsupported feature.

use serde::Deserialize;
use serde_json::Value as Json;

use crate::{Asset, Composition, Layer, Marker};

const KNOWN_SHAPE_TYPES: &[&str] = &[
    "gr", "sh", "el", "rc", "sr", "fl", "st", "gf", "gs", "tm", "mm", "rp", "rd", "tr",
];

const REQUIRED_FIELDS: &[&str] = &["v", "w", "h", "ip", "op", "fr", "layers"];

/// Reads a composition out of a parsed document tree.
///
/// Missing required top-level fields are fatal: no composition is returned
/// and the issue list explains why. Everything else is best-effort — broken
/// layers, unknown shape types and unsupported features are dropped and
/// recorded as issues on a still-usable composition.
pub fn read(document: &Json) -> (Option<Composition>, Vec<String>) {
    let mut issues = Vec::new();
    let Some(root) = document.as_object() else {
        note(&mut issues, "document root is not an object".to_string());
        return (None, issues);
    };

    let mut fatal = false;
    for field in REQUIRED_FIELDS {
        if !root.contains_key(*field) {
            note(&mut issues, format!("missing required field `{field}`"));
            fatal = true;
        }
    }
    if fatal {
        return (None, issues);
    }

    let (Some(width), Some(height)) = (root["w"].as_u64(), root["h"].as_u64()) else {
        note(&mut issues, "composition dimensions are not numbers".to_string());
        return (None, issues);
    };
    let (Some(start_frame), Some(end_frame), Some(frame_rate)) = (
        root["ip"].as_f64(),
        root["op"].as_f64(),
        root["fr"].as_f64(),
    ) else {
        note(&mut issues, "composition frame range is not numeric".to_string());
        return (None, issues);
    };
    if end_frame <= start_frame {
        note(
            &mut issues,
            format!("composition end frame {end_frame} does not come after start frame {start_frame}"),
        );
        return (None, issues);
    }

    let mut layers = Vec::new();
    if let Some(entries) = root["layers"].as_array() {
        for (index, entry) in entries.iter().enumerate() {
            if let Some(layer) = read_layer(entry, index, &mut issues) {
                layers.push(layer);
            }
        }
    } else {
        note(&mut issues, "`layers` is not an array".to_string());
        return (None, issues);
    }

    let mut assets = Vec::new();
    if let Some(entries) = root.get("assets").and_then(Json::as_array) {
        for entry in entries {
            match Asset::deserialize(entry) {
                Ok(asset) => assets.push(asset),
                Err(e) => note(&mut issues, format!("skipping malformed asset: {e}")),
            }
        }
    }

    let mut markers = Vec::new();
    if let Some(entries) = root.get("markers").and_then(Json::as_array) {
        for entry in entries {
            match Marker::deserialize(entry) {
                Ok(marker) => markers.push(marker),
                Err(e) => note(&mut issues, format!("skipping malformed marker: {e}")),
            }
        }
    }

    if root.get("fonts").is_some() || root.get("chars").is_some() {
        note(
            &mut issues,
            "embedded font and character data is unsupported".to_string(),
        );
    }

    let composition = Composition {
        name: root.get("nm").and_then(Json::as_str).map(str::to_owned),
        version: root.get("v").and_then(Json::as_str).map(str::to_owned),
        start_frame,
        end_frame,
        frame_rate,
        width: width as u32,
        height: height as u32,
        layers,
        assets,
        markers,
    };
    (Some(composition), issues)
}

fn read_layer(entry: &Json, index: usize, issues: &mut Vec<String>) -> Option<Layer> {
    let Some(obj) = entry.as_object() else {
        note(issues, format!("layer {index} is not an object"));
        return None;
    };
    let label = obj
        .get("nm")
        .and_then(Json::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| format!("#{index}"));

    // Matte sources exist only to cut out other layers. Mattes themselves
    // are unsupported, so the source never renders and is dropped outright.
    if obj.get("td").and_then(Json::as_u64).unwrap_or(0) != 0 {
        note(
            issues,
            format!("layer {label} is a matte source and will not render"),
        );
        return None;
    }

    if obj.get("tt").is_some() {
        note(issues, format!("layer {label}: mattes are unsupported"));
    }
    if non_empty_array(obj.get("ef")) {
        note(issues, format!("layer {label}: effects are unsupported"));
    }
    if non_empty_array(obj.get("masksProperties")) || obj.get("hasMask") == Some(&Json::Bool(true))
    {
        note(issues, format!("layer {label}: masks are unsupported"));
    }
    if non_empty_array(obj.get("sy")) {
        note(issues, format!("layer {label}: layer styles are unsupported"));
    }

    let Some(ty) = obj.get("ty").and_then(Json::as_u64) else {
        note(issues, format!("layer {label} has no type discriminator"));
        return None;
    };
    if ty > 5 {
        note(issues, format!("layer {label}: unsupported layer type {ty}"));
        return None;
    }
    if ty == 5 && non_empty_array(entry.pointer("/t/a")) {
        note(
            issues,
            format!("layer {label}: animated text properties are unsupported"),
        );
    }

    let mut entry = entry.clone();
    if ty == 4 {
        if let Some(shapes) = entry.get_mut("shapes") {
            sanitize_shapes(shapes, &label, issues);
        }
    }

    match Layer::deserialize(&entry) {
        Ok(layer) => Some(layer),
        Err(e) => {
            note(issues, format!("skipping layer {label}: {e}"));
            None
        }
    }
}

/// Strips shape entries the model cannot represent so the rest of the layer
/// still parses, recursing through groups.
fn sanitize_shapes(shapes: &mut Json, label: &str, issues: &mut Vec<String>) {
    let Some(entries) = shapes.as_array_mut() else {
        return;
    };
    entries.retain(|entry| {
        let Some(ty) = entry.get("ty").and_then(Json::as_str) else {
            note(
                issues,
                format!("layer {label}: shape entry without a type discriminator"),
            );
            return false;
        };
        if KNOWN_SHAPE_TYPES.contains(&ty) {
            true
        } else {
            note(
                issues,
                format!("layer {label}: unsupported shape type `{ty}`"),
            );
            false
        }
    });
    for entry in entries {
        if entry.get("ty").and_then(Json::as_str) == Some("gr") {
            if let Some(children) = entry.get_mut("it") {
                sanitize_shapes(children, label, issues);
            }
        }
    }
}

fn non_empty_array(value: Option<&Json>) -> bool {
    value.and_then(Json::as_array).map_or(false, |a| !a.is_empty())
}

fn note(issues: &mut Vec<String>, message: String) {
    log::warn!("{message}");
    issues.push(message);
}
