//! Prop spawning
//!
//! A spawned prop is three nodes: a root carrying the transform, a model
//! child sharing the registry's source mesh, and a collision child whose
//! volume points back at the root. Interaction code that hits the
//! collision node resolves straight to the prop root through that owner
//! reference.

use std::path::PathBuf;

use glam::Vec3;

use crate::scene::{
    CollisionCategory, CollisionShape, CollisionVolume, MeshInstance, NodeId, SceneGraph,
    Transform,
};

use super::meta::{CollisionShapeKind, PropError, PropMeta};
use super::registry::PropRegistry;

/// Build the collision volume a descriptor asks for.
///
/// Dim checks happen here rather than at descriptor load time so the
/// failure names the shape that was actually requested. The returned
/// volume has no owner; the spawner fills it in.
pub fn build_collision_volume(meta: &PropMeta) -> Result<CollisionVolume, PropError> {
    let c = &meta.collision;
    let invalid = |reason: &str| PropError::InvalidMeta {
        prop_id: meta.prop_id.clone(),
        reason: reason.to_string(),
    };
    let offset = Vec3::from_array(c.offset);
    let [a, b, h] = c.dims;

    let shape = match c.shape {
        CollisionShapeKind::Box => {
            if !(a > 0.0 && b > 0.0 && h > 0.0) {
                return Err(invalid("box dims must be > 0"));
            }
            CollisionShape::Box {
                center: offset,
                half_extents: Vec3::new(a, b, h) * 0.5,
            }
        }
        CollisionShapeKind::Sphere => {
            if !(a > 0.0) {
                return Err(invalid("sphere radius must be > 0"));
            }
            CollisionShape::Sphere {
                center: offset,
                radius: a,
            }
        }
        CollisionShapeKind::Capsule => {
            if !(a > 0.0 && b > 0.0) {
                return Err(invalid("capsule (r,h) must be > 0"));
            }
            // Vertical capsule centered on the offset.
            CollisionShape::Capsule {
                a: offset - Vec3::new(0.0, 0.0, b * 0.5),
                b: offset + Vec3::new(0.0, 0.0, b * 0.5),
                radius: a,
            }
        }
    };

    Ok(CollisionVolume {
        shape,
        category: if c.blocking {
            CollisionCategory::Solid
        } else {
            CollisionCategory::Sensor
        },
        owner: None,
    })
}

/// Spawn one prop instance under `parent`.
///
/// `hpr` overrides the descriptor rotation when given; the descriptor's
/// y_offset is added to the spawn position's z. Returns the prop root.
pub fn spawn_prop(
    registry: &mut PropRegistry,
    scene: &mut SceneGraph,
    parent: NodeId,
    prop_id: &str,
    pos: Vec3,
    hpr: Option<[f32; 3]>,
    name: Option<&str>,
) -> Result<NodeId, PropError> {
    let meta = registry.get_meta(prop_id)?;
    let source = registry.get_source_model(prop_id)?;
    // Validate before touching the scene so a bad descriptor leaves no
    // half-built prop behind.
    let mut volume = build_collision_volume(&meta)?;

    let root_name = name
        .map(str::to_string)
        .unwrap_or_else(|| format!("prop_{}", prop_id));
    let root = scene.add_child(parent, root_name);
    volume.owner = Some(root);
    if let Some(node) = scene.get_mut(root) {
        node.transform = Transform {
            position: pos + Vec3::new(0.0, 0.0, meta.y_offset),
            hpr: hpr.unwrap_or(meta.hpr),
            scale: meta.scale,
        };
    }

    let model = scene.add_child(root, format!("model_{}", prop_id));
    if let Some(node) = scene.get_mut(model) {
        let mut instance = MeshInstance::new(source);
        instance.two_sided = meta.render.two_sided;
        node.mesh = Some(instance);
    }

    let coll = scene.add_child(root, format!("coll_{}", prop_id));
    if let Some(node) = scene.get_mut(coll) {
        node.collision = Some(volume);
    }

    Ok(root)
}

/// One entry in a batch spawn list.
#[derive(Debug, Clone)]
pub struct PropSpawn {
    pub prop_id: String,
    pub pos: Vec3,
    /// Always applied; a batch entry never falls back to the descriptor
    /// rotation.
    pub hpr: [f32; 3],
    pub name: Option<String>,
}

impl PropSpawn {
    pub fn new(prop_id: impl Into<String>, pos: Vec3) -> Self {
        Self {
            prop_id: prop_id.into(),
            pos,
            hpr: [0.0; 3],
            name: None,
        }
    }
}

/// Registry plus the node everything spawns under, typically a wing root.
pub struct PropManager {
    registry: PropRegistry,
    parent: NodeId,
}

impl PropManager {
    pub fn new(props_root: impl Into<PathBuf>, parent: NodeId) -> Self {
        Self {
            registry: PropRegistry::new(props_root),
            parent,
        }
    }

    pub fn spawn(
        &mut self,
        scene: &mut SceneGraph,
        prop_id: &str,
        pos: Vec3,
        hpr: [f32; 3],
        name: Option<&str>,
    ) -> Result<NodeId, PropError> {
        spawn_prop(
            &mut self.registry,
            scene,
            self.parent,
            prop_id,
            pos,
            Some(hpr),
            name,
        )
    }

    /// Spawn a list in order. Stops at the first failure; props spawned
    /// before it stay in the scene.
    pub fn spawn_batch(
        &mut self,
        scene: &mut SceneGraph,
        spawns: &[PropSpawn],
    ) -> Result<Vec<NodeId>, PropError> {
        let mut out = Vec::with_capacity(spawns.len());
        for spawn in spawns {
            out.push(self.spawn(
                scene,
                &spawn.prop_id,
                spawn.pos,
                spawn.hpr,
                spawn.name.as_deref(),
            )?);
        }
        Ok(out)
    }
}
