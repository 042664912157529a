//! Prop descriptor loading and validation
//!
//! A descriptor is `<prop_dir>/meta.json` next to `<prop_dir>/model.glb`.
//! Parsing and validation are separate steps: the JSON is read into a
//! generic value first, then checked field by field so every failure
//! message names the prop and the field that broke.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

/// Error type for the prop pipeline.
#[derive(Debug)]
pub enum PropError {
    /// A required file or directory does not exist.
    MissingAsset(PathBuf),
    /// The descriptor is malformed; the reason names the field.
    InvalidMeta { prop_id: String, reason: String },
    /// The model file parsed but contains no geometry.
    EmptyModel { prop_id: String, path: PathBuf },
    Io(String),
}

impl std::fmt::Display for PropError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropError::MissingAsset(path) => write!(f, "missing asset: {}", path.display()),
            PropError::InvalidMeta { prop_id, reason } => write!(f, "[{}] {}", prop_id, reason),
            PropError::EmptyModel { prop_id, path } => {
                write!(f, "[{}] model has no geometry: {}", prop_id, path.display())
            }
            PropError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for PropError {}

impl From<std::io::Error> for PropError {
    fn from(e: std::io::Error) -> Self {
        PropError::Io(e.to_string())
    }
}

fn invalid(prop_id: &str, reason: impl Into<String>) -> PropError {
    PropError::InvalidMeta {
        prop_id: prop_id.to_string(),
        reason: reason.into(),
    }
}

/// Collision primitive named by a descriptor. Dims are interpreted per
/// shape: box (w, d, h), sphere (r, _, _), capsule (r, h, _).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionShapeKind {
    Box,
    Sphere,
    Capsule,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionMeta {
    pub shape: CollisionShapeKind,
    pub dims: [f32; 3],
    /// Center offset in prop-local space.
    pub offset: [f32; 3],
    /// Solid obstacle when true, pass-through sensor when false.
    pub blocking: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderMeta {
    pub casts_shadow: bool,
    pub two_sided: bool,
}

/// Validated prop descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct PropMeta {
    pub prop_id: String,
    pub model_path: PathBuf,
    pub scale: f32,
    /// Added to the spawn position's z.
    pub y_offset: f32,
    /// Heading, pitch, roll in degrees.
    pub hpr: [f32; 3],
    pub collision: CollisionMeta,
    pub render: RenderMeta,
}

fn triple_of_numbers(values: &[Value]) -> Option<[f32; 3]> {
    let mut out = [0.0f32; 3];
    for (slot, value) in out.iter_mut().zip(values.iter()) {
        *slot = value.as_f64()? as f32;
    }
    Some(out)
}

/// Load and validate `<prop_dir>/meta.json`, requiring `model.glb` beside it.
pub fn load_prop_meta(prop_dir: &Path, prop_id: &str) -> Result<PropMeta, PropError> {
    let meta_path = prop_dir.join("meta.json");
    let model_path = prop_dir.join("model.glb");
    if !meta_path.is_file() {
        return Err(PropError::MissingAsset(meta_path));
    }
    if !model_path.is_file() {
        return Err(PropError::MissingAsset(model_path));
    }

    let contents = fs::read_to_string(&meta_path)?;
    let raw: Value = serde_json::from_str(&contents)
        .map_err(|e| invalid(prop_id, format!("meta.json is not valid JSON: {}", e)))?;
    let obj = raw
        .as_object()
        .ok_or_else(|| invalid(prop_id, "meta.json must be a JSON object"))?;

    if obj.get("type").and_then(Value::as_str) != Some("mesh") {
        return Err(invalid(prop_id, "meta.json.type must be 'mesh'"));
    }

    let scale = match obj.get("scale") {
        None => 1.0,
        Some(v) => v
            .as_f64()
            .filter(|s| *s > 0.0)
            .ok_or_else(|| invalid(prop_id, "scale must be > 0"))? as f32,
    };

    let y_offset = match obj.get("y_offset") {
        None => 0.0,
        Some(v) => v
            .as_f64()
            .ok_or_else(|| invalid(prop_id, "y_offset must be number"))? as f32,
    };

    let hpr = match obj.get("hpr") {
        None => [0.0; 3],
        Some(v) => v
            .as_array()
            .filter(|a| a.len() == 3)
            .and_then(|a| triple_of_numbers(a))
            .ok_or_else(|| invalid(prop_id, "hpr must be [h,p,r]"))?,
    };

    let col = obj
        .get("collision")
        .and_then(Value::as_object)
        .ok_or_else(|| invalid(prop_id, "collision must be an object"))?;

    let shape = match col.get("shape").and_then(Value::as_str) {
        Some("box") => CollisionShapeKind::Box,
        Some("sphere") => CollisionShapeKind::Sphere,
        Some("capsule") => CollisionShapeKind::Capsule,
        _ => return Err(invalid(prop_id, "collision.shape must be box|sphere|capsule")),
    };

    let dims_values = col
        .get("dims")
        .and_then(Value::as_array)
        .filter(|a| a.len() == 3)
        .ok_or_else(|| invalid(prop_id, "collision.dims must be [a,b,c] numbers"))?;
    let dims = triple_of_numbers(dims_values)
        .ok_or_else(|| invalid(prop_id, "collision.dims entries must be numbers"))?;

    let offset = match col.get("offset") {
        None => [0.0; 3],
        Some(v) => {
            let values = v
                .as_array()
                .filter(|a| a.len() == 3)
                .ok_or_else(|| invalid(prop_id, "collision.offset must be [x,y,z]"))?;
            triple_of_numbers(values)
                .ok_or_else(|| invalid(prop_id, "collision.offset entries must be numbers"))?
        }
    };

    let blocking = match col.get("blocking") {
        None => true,
        Some(v) => v
            .as_bool()
            .ok_or_else(|| invalid(prop_id, "collision.blocking must be boolean"))?,
    };

    let render = match obj.get("render") {
        None => RenderMeta::default(),
        Some(v) => {
            let r = v
                .as_object()
                .ok_or_else(|| invalid(prop_id, "render must be an object if present"))?;
            RenderMeta {
                casts_shadow: r.get("casts_shadow").and_then(Value::as_bool).unwrap_or(false),
                two_sided: r.get("two_sided").and_then(Value::as_bool).unwrap_or(false),
            }
        }
    };

    Ok(PropMeta {
        prop_id: prop_id.to_string(),
        model_path,
        scale,
        y_offset,
        hpr,
        collision: CollisionMeta {
            shape,
            dims,
            offset,
            blocking,
        },
        render,
    })
}
