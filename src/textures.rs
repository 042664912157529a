//! Texture catalog
//!
//! Maps texture names to handles plus enough description (path, wrap mode)
//! for the host renderer to load them. The catalog is passed explicitly
//! into the geometry compiler - there is no global texture table.
//!
//! Catalogs can be built in code or loaded from a RON manifest; manifests
//! are parsed first and then validated in a separate pass so bad data
//! fails with a message naming the offending entry.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::warn;
use serde::{Deserialize, Serialize};

/// Maximum length for texture names and paths in a manifest.
pub const MAX_STRING_LEN: usize = 256;

/// Name of the shared door texture; always clamped.
pub const DOOR_TEXTURE: &str = "door_old";

/// Texture addressing outside [0,1].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
}

/// One catalog entry: a named image with its wrap mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureDesc {
    /// Lookup name, e.g. "west_wing_wall".
    pub name: String,
    /// Image path relative to the asset root.
    pub path: String,
    #[serde(default)]
    pub wrap: WrapMode,
}

impl TextureDesc {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            wrap: WrapMode::Repeat,
        }
    }

    pub fn clamped(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            wrap: WrapMode::Clamp,
        }
    }
}

/// Opaque handle into a `TextureCatalog`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(usize);

/// Error type for catalog loading.
#[derive(Debug)]
pub enum TextureError {
    Io(String),
    Parse(String),
    Validation(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TextureError::Io(msg) => write!(f, "I/O error: {}", msg),
            TextureError::Parse(msg) => write!(f, "parse error: {}", msg),
            TextureError::Validation(msg) => write!(f, "validation error: {}", msg),
        }
    }
}

impl std::error::Error for TextureError {}

impl From<std::io::Error> for TextureError {
    fn from(e: std::io::Error) -> Self {
        TextureError::Io(e.to_string())
    }
}

/// Name-keyed texture registry handed to the geometry compiler.
#[derive(Debug, Default)]
pub struct TextureCatalog {
    descs: Vec<TextureDesc>,
    by_name: HashMap<String, TextureHandle>,
}

impl TextureCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The texture set the shipped wings expect, mirroring the game's
    /// assets/images layout.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for wing in ["main_floor", "main_upper"] {
            catalog.insert(TextureDesc::new(
                format!("{}_wall", wing),
                "assets/images/main_wing_wall_1.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_floor", wing),
                "assets/images/main_wing_floor.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_ceiling", wing),
                "assets/images/main_wing_ceiling.png",
            ));
        }
        for wing in ["west_wing", "west_upper"] {
            catalog.insert(TextureDesc::new(
                format!("{}_wall", wing),
                "assets/images/west_wing_wall_1.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_floor", wing),
                "assets/images/west_wing_floor_1.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_ceiling", wing),
                "assets/images/west_wing_ceiling.png",
            ));
        }
        for wing in ["east_wing", "east_upper"] {
            catalog.insert(TextureDesc::new(
                format!("{}_wall", wing),
                "assets/images/east_wing_wall_old_1.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_floor", wing),
                "assets/images/east_wing_floor.png",
            ));
            catalog.insert(TextureDesc::new(
                format!("{}_ceiling", wing),
                "assets/images/east_wing_ceiling.png",
            ));
        }
        catalog.insert(TextureDesc::clamped(
            DOOR_TEXTURE,
            "assets/images/door_old.png",
        ));
        catalog.insert(TextureDesc::clamped(
            "door_new",
            "assets/images/door_new.png",
        ));
        catalog
    }

    /// Load a catalog from a RON manifest: a list of `TextureDesc` entries.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a catalog from a RON string (for embedded manifests or tests).
    pub fn from_ron(contents: &str) -> Result<Self, TextureError> {
        let entries: Vec<TextureDesc> =
            ron::from_str(contents).map_err(|e| TextureError::Parse(e.to_string()))?;
        validate_entries(&entries)?;

        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        Ok(catalog)
    }

    /// Register a texture, returning its handle.
    ///
    /// Re-registering a name replaces the description but keeps the handle,
    /// so references held by already-compiled geometry stay valid.
    pub fn insert(&mut self, desc: TextureDesc) -> TextureHandle {
        if let Some(&handle) = self.by_name.get(&desc.name) {
            warn!("texture '{}' re-registered, replacing entry", desc.name);
            self.descs[handle.0] = desc;
            return handle;
        }
        let handle = TextureHandle(self.descs.len());
        self.by_name.insert(desc.name.clone(), handle);
        self.descs.push(desc);
        handle
    }

    pub fn handle(&self, name: &str) -> Option<TextureHandle> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, handle: TextureHandle) -> Option<&TextureDesc> {
        self.descs.get(handle.0)
    }

    pub fn len(&self) -> usize {
        self.descs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descs.is_empty()
    }

    /// Wall texture for a wing, keyed "<wing>_wall".
    pub fn wing_wall(&self, wing: &str) -> Option<TextureHandle> {
        self.handle(&format!("{}_wall", wing))
    }

    /// Floor texture for a wing, keyed "<wing>_floor".
    pub fn wing_floor(&self, wing: &str) -> Option<TextureHandle> {
        self.handle(&format!("{}_floor", wing))
    }

    /// Ceiling texture for a wing, keyed "<wing>_ceiling".
    pub fn wing_ceiling(&self, wing: &str) -> Option<TextureHandle> {
        self.handle(&format!("{}_ceiling", wing))
    }

    /// The shared door texture used for every door glyph regardless of wing.
    pub fn door(&self) -> Option<TextureHandle> {
        self.handle(DOOR_TEXTURE)
    }
}

fn validate_entries(entries: &[TextureDesc]) -> Result<(), TextureError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (i, entry) in entries.iter().enumerate() {
        if entry.name.is_empty() {
            return Err(TextureError::Validation(format!(
                "entry[{}]: name must not be empty",
                i
            )));
        }
        if entry.path.is_empty() {
            return Err(TextureError::Validation(format!(
                "entry[{}] '{}': path must not be empty",
                i, entry.name
            )));
        }
        if entry.name.len() > MAX_STRING_LEN {
            return Err(TextureError::Validation(format!(
                "entry[{}]: name too long ({} > {})",
                i,
                entry.name.len(),
                MAX_STRING_LEN
            )));
        }
        if entry.path.len() > MAX_STRING_LEN {
            return Err(TextureError::Validation(format!(
                "entry[{}] '{}': path too long ({} > {})",
                i,
                entry.name,
                entry.path.len(),
                MAX_STRING_LEN
            )));
        }
        if let Some(first) = seen.insert(entry.name.as_str(), i) {
            return Err(TextureError::Validation(format!(
                "entry[{}] '{}': duplicate of entry[{}]",
                i, entry.name, first
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_roles_resolve() {
        let catalog = TextureCatalog::builtin();
        for wing in ["main_floor", "west_wing", "east_wing"] {
            assert!(catalog.wing_wall(wing).is_some(), "{} wall", wing);
            assert!(catalog.wing_floor(wing).is_some(), "{} floor", wing);
            assert!(catalog.wing_ceiling(wing).is_some(), "{} ceiling", wing);
        }
        assert!(catalog.door().is_some());
    }

    #[test]
    fn test_door_texture_is_clamped() {
        let catalog = TextureCatalog::builtin();
        let door = catalog.get(catalog.door().unwrap()).unwrap();
        assert_eq!(door.wrap, WrapMode::Clamp);
    }

    #[test]
    fn test_from_ron_roundtrip() {
        let manifest = r#"[
            (name: "cellar_wall", path: "assets/images/cellar_wall.png"),
            (name: "door_old", path: "assets/images/door_old.png", wrap: Clamp),
        ]"#;
        let catalog = TextureCatalog::from_ron(manifest).unwrap();
        assert_eq!(catalog.len(), 2);
        let handle = catalog.handle("cellar_wall").unwrap();
        assert_eq!(catalog.get(handle).unwrap().wrap, WrapMode::Repeat);
        assert_eq!(
            catalog.get(catalog.door().unwrap()).unwrap().wrap,
            WrapMode::Clamp
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let manifest = r#"[
            (name: "wall", path: "a.png"),
            (name: "wall", path: "b.png"),
        ]"#;
        let err = TextureCatalog::from_ron(manifest).unwrap_err();
        assert!(matches!(err, TextureError::Validation(_)));
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let err = TextureCatalog::from_ron(r#"[(name: "", path: "a.png")]"#).unwrap_err();
        assert!(matches!(err, TextureError::Validation(_)));
    }

    #[test]
    fn test_reinsert_keeps_handle() {
        let mut catalog = TextureCatalog::new();
        let first = catalog.insert(TextureDesc::new("wall", "a.png"));
        let second = catalog.insert(TextureDesc::new("wall", "b.png"));
        assert_eq!(first, second);
        assert_eq!(catalog.get(first).unwrap().path, "b.png");
        assert_eq!(catalog.len(), 1);
    }
}
