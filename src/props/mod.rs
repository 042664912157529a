//! Prop pipeline - descriptors, cached models, spawning
//!
//! Each prop lives in `<props_root>/<prop_id>/` as a `meta.json` descriptor
//! plus a `model.glb` mesh. Descriptors are validated field by field with
//! messages naming the prop and the offending field. Loaded models are
//! cached so every spawned instance shares one source mesh.

mod meta;
mod registry;
mod spawn;

pub use meta::*;
pub use registry::*;
pub use spawn::*;

#[cfg(test)]
pub(crate) mod testutil {
    use std::fs;
    use std::path::Path;

    /// Minimal valid descriptor: a mesh with a unit box collider.
    pub const BASIC_META: &str =
        r#"{"type":"mesh","collision":{"shape":"box","dims":[1,1,1]}}"#;

    /// glTF with a scene but no geometry.
    pub const EMPTY_GLB_JSON: &str =
        r#"{"asset":{"version":"2.0"},"scene":0,"scenes":[{"nodes":[]}]}"#;

    /// Assemble a binary glTF container from a JSON chunk and an optional
    /// BIN chunk. JSON pads with spaces, BIN pads with zeros.
    pub fn glb(json: &str, bin: Option<&[u8]>) -> Vec<u8> {
        fn chunk(kind: u32, data: &[u8], pad: u8) -> Vec<u8> {
            let padded = (data.len() + 3) & !3;
            let mut out = Vec::with_capacity(8 + padded);
            out.extend_from_slice(&(padded as u32).to_le_bytes());
            out.extend_from_slice(&kind.to_le_bytes());
            out.extend_from_slice(data);
            out.resize(8 + padded, pad);
            out
        }

        let json_chunk = chunk(0x4E4F_534A, json.as_bytes(), b' ');
        let bin_chunk = bin.map(|data| chunk(0x004E_4942, data, 0));
        let total = 12 + json_chunk.len() + bin_chunk.as_ref().map_or(0, |c| c.len());

        let mut out = Vec::with_capacity(total);
        out.extend_from_slice(&0x4654_6C67u32.to_le_bytes());
        out.extend_from_slice(&2u32.to_le_bytes());
        out.extend_from_slice(&(total as u32).to_le_bytes());
        out.extend_from_slice(&json_chunk);
        if let Some(c) = bin_chunk {
            out.extend_from_slice(&c);
        }
        out
    }

    /// One-triangle GLB with the mesh node translated by `translation`.
    pub fn triangle_glb_at(translation: [f32; 3]) -> Vec<u8> {
        let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0];
        let mut bin = Vec::with_capacity(36);
        for v in positions {
            bin.extend_from_slice(&v.to_le_bytes());
        }
        let json = format!(
            concat!(
                r#"{{"asset":{{"version":"2.0"}},"scene":0,"scenes":[{{"nodes":[0]}}],"#,
                r#""nodes":[{{"mesh":0,"translation":[{},{},{}]}}],"#,
                r#""meshes":[{{"primitives":[{{"attributes":{{"POSITION":0}}}}]}}],"#,
                r#""buffers":[{{"byteLength":36}}],"#,
                r#""bufferViews":[{{"buffer":0,"byteOffset":0,"byteLength":36,"target":34962}}],"#,
                r#""accessors":[{{"bufferView":0,"componentType":5126,"count":3,"type":"VEC3","#,
                r#""min":[0.0,0.0,0.0],"max":[1.0,1.0,0.0]}}]}}"#
            ),
            translation[0], translation[1], translation[2]
        );
        glb(&json, Some(&bin))
    }

    pub fn triangle_glb() -> Vec<u8> {
        triangle_glb_at([0.0, 0.0, 0.0])
    }

    /// Write a prop directory with the given descriptor and model bytes.
    pub fn write_prop(root: &Path, prop_id: &str, meta_json: &str, model: &[u8]) {
        let dir = root.join(prop_id);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("meta.json"), meta_json).unwrap();
        fs::write(dir.join("model.glb"), model).unwrap();
    }
}
