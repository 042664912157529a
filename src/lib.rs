//! Protocol Black - level-building core
//!
//! The data-to-geometry half of a first-person horror game:
//! - Tile-map compiler: ASCII wing maps become face-culled wall geometry,
//!   floor/ceiling tiles, collision boxes, and typed door tags
//! - Prop pipeline: JSON descriptors + glTF meshes become cached source
//!   models spawned into the scene graph with collision volumes
//!
//! Rendering, physics resolution, audio, and input are external
//! collaborators: this crate stops at scene nodes, collision volumes, and
//! spawn points.

pub mod props;
pub mod scene;
pub mod textures;
pub mod world;

pub use props::{
    build_collision_volume, load_prop_meta, spawn_prop, CollisionMeta, CollisionShapeKind,
    PropError, PropManager, PropMeta, PropRegistry, PropSpawn, RenderMeta,
};
pub use scene::{
    CollisionCategory, CollisionShape, CollisionVolume, DoorTag, MeshData, MeshInstance, Node,
    NodeId, NodeTag, SceneGraph, Transform, Vertex,
};
pub use textures::{TextureCatalog, TextureDesc, TextureError, TextureHandle, WrapMode};
pub use world::{
    build_builtin_wing, build_wing, CellKind, MapError, TileGrid, Wing, WorldError,
};
