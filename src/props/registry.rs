//! Prop registry - descriptor and model caching
//!
//! Models are loaded once per prop id and baked into a single flat
//! `MeshData`: every node transform in the glTF scene is applied to its
//! vertices up front, so instances share one buffer with no residual
//! hierarchy. Caches are keyed by prop id and never invalidated; props on
//! disk do not change while the game runs.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use glam::{Mat3, Mat4, Vec3};

use crate::scene::{MeshData, Vertex};

use super::meta::{load_prop_meta, PropError, PropMeta};

/// Default location of prop directories.
pub const DEFAULT_PROPS_ROOT: &str = "assets/props";

/// Caching loader for prop descriptors and source models.
pub struct PropRegistry {
    props_root: PathBuf,
    meta_cache: HashMap<String, Arc<PropMeta>>,
    model_cache: HashMap<String, Arc<MeshData>>,
}

impl Default for PropRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_PROPS_ROOT)
    }
}

impl PropRegistry {
    pub fn new(props_root: impl Into<PathBuf>) -> Self {
        Self {
            props_root: props_root.into(),
            meta_cache: HashMap::new(),
            model_cache: HashMap::new(),
        }
    }

    /// Descriptor for a prop, loading and validating it on first request.
    pub fn get_meta(&mut self, prop_id: &str) -> Result<Arc<PropMeta>, PropError> {
        if let Some(meta) = self.meta_cache.get(prop_id) {
            return Ok(meta.clone());
        }
        let prop_dir = self.props_root.join(prop_id);
        if !prop_dir.is_dir() {
            return Err(PropError::MissingAsset(prop_dir));
        }
        let meta = Arc::new(load_prop_meta(&prop_dir, prop_id)?);
        self.meta_cache.insert(prop_id.to_string(), meta.clone());
        Ok(meta)
    }

    /// Shared source mesh for a prop, loading and baking it on first
    /// request. Instances hold clones of the returned `Arc`.
    pub fn get_source_model(&mut self, prop_id: &str) -> Result<Arc<MeshData>, PropError> {
        if let Some(mesh) = self.model_cache.get(prop_id) {
            return Ok(mesh.clone());
        }
        let meta = self.get_meta(prop_id)?;
        let mesh = Arc::new(load_model(&meta)?);
        self.model_cache.insert(prop_id.to_string(), mesh.clone());
        Ok(mesh)
    }
}

fn load_model(meta: &PropMeta) -> Result<MeshData, PropError> {
    let (document, buffers, _images) = gltf::import(&meta.model_path)
        .map_err(|e| PropError::Io(format!("{}: {}", meta.model_path.display(), e)))?;

    let mut mesh = MeshData::new();
    let scene = document.default_scene().or_else(|| document.scenes().next());
    if let Some(scene) = scene {
        for node in scene.nodes() {
            bake_node(&node, Mat4::IDENTITY, &buffers, &mut mesh);
        }
    }
    if mesh.is_empty() {
        return Err(PropError::EmptyModel {
            prop_id: meta.prop_id.clone(),
            path: meta.model_path.clone(),
        });
    }
    Ok(mesh)
}

fn bake_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut MeshData,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            bake_primitive(&primitive, world, buffers, out);
        }
    }
    for child in node.children() {
        bake_node(&child, world, buffers, out);
    }
}

fn bake_primitive(
    primitive: &gltf::Primitive<'_>,
    world: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut MeshData,
) {
    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));
    let positions: Vec<[f32; 3]> = match reader.read_positions() {
        Some(iter) => iter.collect(),
        None => return,
    };
    let normals: Vec<[f32; 3]> = reader
        .read_normals()
        .map(|iter| iter.collect())
        .unwrap_or_default();
    let uvs: Vec<[f32; 2]> = reader
        .read_tex_coords(0)
        .map(|tc| tc.into_f32().collect())
        .unwrap_or_default();

    let normal_matrix = Mat3::from_mat4(world).inverse().transpose();
    let base = out.vertices.len() as u32;
    for (i, position) in positions.iter().enumerate() {
        let baked = world.transform_point3(Vec3::from_array(*position));
        let normal = match normals.get(i) {
            Some(n) => normal_matrix
                .mul_vec3(Vec3::from_array(*n))
                .normalize_or_zero(),
            None => Vec3::ZERO,
        };
        let uv = uvs.get(i).copied().unwrap_or([0.0, 0.0]);
        out.vertices
            .push(Vertex::new(baked.to_array(), normal.to_array(), uv));
    }
    match reader.read_indices() {
        Some(indices) => out.indices.extend(indices.into_u32().map(|i| base + i)),
        None => out
            .indices
            .extend((0..positions.len() as u32).map(|i| base + i)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::testutil::{glb, triangle_glb, triangle_glb_at, write_prop, BASIC_META, EMPTY_GLB_JSON};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_missing_prop_dir() {
        let dir = tempdir().unwrap();
        let mut registry = PropRegistry::new(dir.path());
        let err = registry.get_meta("ghost").unwrap_err();
        match err {
            PropError::MissingAsset(path) => assert!(path.ends_with("ghost")),
            other => panic!("expected MissingAsset, got {:?}", other),
        }
    }

    #[test]
    fn test_triangle_model_loads() {
        let dir = tempdir().unwrap();
        write_prop(dir.path(), "crate_small", BASIC_META, &triangle_glb());
        let mut registry = PropRegistry::new(dir.path());

        let mesh = registry.get_source_model("crate_small").unwrap();
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices, vec![0, 1, 2]);
        assert_eq!(mesh.vertices[1].position, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_node_transform_baked_into_vertices() {
        let dir = tempdir().unwrap();
        write_prop(
            dir.path(),
            "lamp",
            BASIC_META,
            &triangle_glb_at([0.0, 0.0, 2.0]),
        );
        let mut registry = PropRegistry::new(dir.path());

        let mesh = registry.get_source_model("lamp").unwrap();
        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 2.0]);
        assert!(mesh.vertices.iter().all(|v| v.position[2] == 2.0));
    }

    #[test]
    fn test_empty_model_rejected() {
        let dir = tempdir().unwrap();
        write_prop(dir.path(), "shell", BASIC_META, &glb(EMPTY_GLB_JSON, None));
        let mut registry = PropRegistry::new(dir.path());

        let err = registry.get_source_model("shell").unwrap_err();
        match err {
            PropError::EmptyModel { prop_id, path } => {
                assert_eq!(prop_id, "shell");
                assert!(path.ends_with("model.glb"));
            }
            other => panic!("expected EmptyModel, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_model_is_io_error() {
        let dir = tempdir().unwrap();
        write_prop(dir.path(), "junk", BASIC_META, b"not a glb");
        let mut registry = PropRegistry::new(dir.path());

        let err = registry.get_source_model("junk").unwrap_err();
        assert!(matches!(err, PropError::Io(_)));
    }

    #[test]
    fn test_meta_cache_survives_file_removal() {
        let dir = tempdir().unwrap();
        write_prop(dir.path(), "chair", BASIC_META, &triangle_glb());
        let mut registry = PropRegistry::new(dir.path());

        let first = registry.get_meta("chair").unwrap();
        fs::remove_file(dir.path().join("chair/meta.json")).unwrap();
        let second = registry.get_meta("chair").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_model_cache_survives_file_removal() {
        let dir = tempdir().unwrap();
        write_prop(dir.path(), "chair", BASIC_META, &triangle_glb());
        let mut registry = PropRegistry::new(dir.path());

        let first = registry.get_source_model("chair").unwrap();
        fs::remove_file(dir.path().join("chair/model.glb")).unwrap();
        let second = registry.get_source_model("chair").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
