//! Tile-map geometry compiler
//!
//! Walks a `TileGrid` and emits one wall block per solid cell (quads only
//! on faces that border a non-solid or out-of-bounds neighbor), a floor
//! tile per open cell, a ceiling tile per cell, and a collision box per
//! solid cell. Door glyphs get the shared clamped door texture, an inset
//! UV window, and a typed `DoorTag`.
//!
//! Compilation is deterministic and synchronous; the only inputs are the
//! grid and the injected texture catalog.

use std::sync::Arc;

use glam::Vec3;
use log::warn;

use crate::scene::{
    CollisionCategory, CollisionShape, CollisionVolume, DoorTag, MeshData, MeshInstance, NodeId,
    NodeTag, SceneGraph, Transform,
};
use crate::textures::TextureCatalog;

use super::grid::{
    CellKind, MapError, TileGrid, DOOR_U_MARGIN, DOOR_U_SCALE, DOOR_V_MARGIN, DOOR_V_SCALE,
    PLAYER_EYE_HEIGHT, TILE_SIZE, WALL_HEIGHT,
};

/// Error type for wing construction.
#[derive(Debug)]
pub enum WorldError {
    Map(MapError),
    /// A texture name the wing needs is not in the catalog.
    UnknownTexture(String),
    /// The map has no player start glyph.
    MissingSpawn(String),
    /// No built-in map exists for the requested wing name.
    UnknownWing(String),
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::Map(e) => write!(f, "{}", e),
            WorldError::UnknownTexture(name) => {
                write!(f, "texture '{}' not found in catalog", name)
            }
            WorldError::MissingSpawn(wing) => {
                write!(f, "wing '{}' has no player start (X) glyph", wing)
            }
            WorldError::UnknownWing(name) => write!(f, "no built-in map for wing '{}'", name),
        }
    }
}

impl std::error::Error for WorldError {}

impl From<MapError> for WorldError {
    fn from(e: MapError) -> Self {
        WorldError::Map(e)
    }
}

/// Which cardinal faces of a wall block need geometry.
///
/// A face is emitted iff the neighboring cell in that direction is
/// non-solid or out of bounds; faces shared by two solid cells are culled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WallFaces {
    pub north: bool,
    pub south: bool,
    pub west: bool,
    pub east: bool,
}

impl WallFaces {
    /// Compute face flags for the solid cell at `(x, y)`.
    pub fn at(grid: &TileGrid, x: usize, y: usize) -> Self {
        let (xi, yi) = (x as isize, y as isize);
        Self {
            north: !grid.is_solid(xi, yi - 1),
            south: !grid.is_solid(xi, yi + 1),
            west: !grid.is_solid(xi - 1, yi),
            east: !grid.is_solid(xi + 1, yi),
        }
    }

    pub fn count(&self) -> usize {
        [self.north, self.south, self.west, self.east]
            .iter()
            .filter(|&&f| f)
            .count()
    }
}

/// A compiled wing: the subtree root, the recorded spawn point, and the
/// door blocks for the interaction system.
#[derive(Debug)]
pub struct Wing {
    pub name: String,
    pub root: NodeId,
    /// World-space player start, tile-centered at eye height. `None` when
    /// the map has no `X` glyph; gameplay must not start in that case.
    pub spawn_point: Option<Vec3>,
    /// Wall blocks carrying a `DoorTag`, in row-major map order.
    pub doors: Vec<NodeId>,
}

impl Wing {
    /// The spawn point, or `MissingSpawn` - callers must fail level
    /// startup on maps without one.
    pub fn require_spawn(&self) -> Result<Vec3, WorldError> {
        self.spawn_point
            .ok_or_else(|| WorldError::MissingSpawn(self.name.clone()))
    }
}

/// Build the mesh for one wall block in tile-local space.
///
/// Quads wind counter-clockwise seen from outside, normals point outward.
/// Door blocks sample an inset window of the door texture; plain walls
/// span the full [0,1] range.
pub fn wall_block_mesh(door: bool, faces: &WallFaces) -> MeshData {
    let s = TILE_SIZE;
    let h = WALL_HEIGHT;
    let (u0, u1, v0, v1) = if door {
        (
            (0.0 + DOOR_U_MARGIN) * DOOR_U_SCALE,
            (1.0 - DOOR_U_MARGIN) * DOOR_U_SCALE,
            (0.0 + DOOR_V_MARGIN) * DOOR_V_SCALE,
            (1.0 - DOOR_V_MARGIN) * DOOR_V_SCALE,
        )
    } else {
        (0.0, 1.0, 0.0, 1.0)
    };
    let uvs = [[u0, v0], [u1, v0], [u1, v1], [u0, v1]];

    let mut mesh = MeshData::new();
    if faces.north {
        mesh.push_quad(
            [
                [0.0, 0.0, 0.0],
                [s, 0.0, 0.0],
                [s, 0.0, h],
                [0.0, 0.0, h],
            ],
            [0.0, -1.0, 0.0],
            uvs,
        );
    }
    if faces.south {
        mesh.push_quad(
            [[s, s, 0.0], [0.0, s, 0.0], [0.0, s, h], [s, s, h]],
            [0.0, 1.0, 0.0],
            uvs,
        );
    }
    if faces.west {
        mesh.push_quad(
            [
                [0.0, s, 0.0],
                [0.0, 0.0, 0.0],
                [0.0, 0.0, h],
                [0.0, s, h],
            ],
            [-1.0, 0.0, 0.0],
            uvs,
        );
    }
    if faces.east {
        mesh.push_quad(
            [[s, 0.0, 0.0], [s, s, 0.0], [s, s, h], [s, 0.0, h]],
            [1.0, 0.0, 0.0],
            uvs,
        );
    }
    mesh
}

/// Collision box covering one solid tile up to wall height.
fn tile_collision_box() -> CollisionShape {
    let half = Vec3::new(TILE_SIZE * 0.5, TILE_SIZE * 0.5, WALL_HEIGHT * 0.5);
    CollisionShape::Box {
        center: half,
        half_extents: half,
    }
}

/// Horizontal tile quad in tile-local space: floor at z = 0 facing up,
/// ceiling at z = WALL_HEIGHT facing down.
fn tile_quad(floor: bool) -> MeshData {
    let s = TILE_SIZE;
    let mut mesh = MeshData::new();
    if floor {
        mesh.push_quad(
            [
                [0.0, 0.0, 0.0],
                [s, 0.0, 0.0],
                [s, s, 0.0],
                [0.0, s, 0.0],
            ],
            [0.0, 0.0, 1.0],
            [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]],
        );
    } else {
        let h = WALL_HEIGHT;
        mesh.push_quad(
            [[0.0, 0.0, h], [0.0, s, h], [s, s, h], [s, 0.0, h]],
            [0.0, 0.0, -1.0],
            [[0.0, 0.0], [0.0, 1.0], [1.0, 1.0], [1.0, 0.0]],
        );
    }
    mesh
}

/// Compile a wing's tile map into scene geometry under a fresh root node.
pub fn build_wing(
    scene: &mut SceneGraph,
    catalog: &TextureCatalog,
    grid: &TileGrid,
    wing: &str,
) -> Result<Wing, WorldError> {
    let wall_tex = catalog
        .wing_wall(wing)
        .ok_or_else(|| WorldError::UnknownTexture(format!("{}_wall", wing)))?;
    let floor_tex = catalog
        .wing_floor(wing)
        .ok_or_else(|| WorldError::UnknownTexture(format!("{}_floor", wing)))?;
    let ceiling_tex = catalog
        .wing_ceiling(wing)
        .ok_or_else(|| WorldError::UnknownTexture(format!("{}_ceiling", wing)))?;
    let door_tex = catalog
        .door()
        .ok_or_else(|| WorldError::UnknownTexture(crate::textures::DOOR_TEXTURE.into()))?;

    let root = scene.add_root(format!("wing_{}", wing));
    let mut spawn_point = None;
    let mut doors = Vec::new();

    // Solid pass: wall blocks, door tags, collision, spawn point.
    for (x, y, glyph) in grid.cells() {
        let wx = x as f32 * TILE_SIZE;
        let wy = y as f32 * TILE_SIZE;

        match TileGrid::classify(glyph) {
            CellKind::Wall | CellKind::Door => {
                let door = TileGrid::classify(glyph) == CellKind::Door;
                let faces = WallFaces::at(grid, x, y);
                let mesh = wall_block_mesh(door, &faces);

                let block = scene.add_child(root, "wall_block");
                {
                    let node = scene.get_mut(block).expect("block just created");
                    node.transform = Transform::from_position(Vec3::new(wx, wy, 0.0));
                    if !mesh.is_empty() {
                        let tex = if door { door_tex } else { wall_tex };
                        node.mesh = Some(MeshInstance::new(Arc::new(mesh)).with_texture(tex));
                    }
                    if door {
                        node.tag = Some(NodeTag::Door(DoorTag {
                            x,
                            y,
                            unlocked: TileGrid::door_unlocked(glyph),
                        }));
                    }
                }
                if door {
                    doors.push(block);
                }

                // Doors stay collidable; the interaction system opens them
                // by removing the block, not by disabling the box.
                let coll = scene.add_child(block, "solid");
                scene.get_mut(coll).expect("node just created").collision =
                    Some(CollisionVolume {
                        shape: tile_collision_box(),
                        category: CollisionCategory::Solid,
                        owner: Some(block),
                    });
            }
            CellKind::Spawn => {
                let point = Vec3::new(
                    wx + TILE_SIZE * 0.5,
                    wy + TILE_SIZE * 0.5,
                    PLAYER_EYE_HEIGHT,
                );
                if spawn_point.is_some() {
                    warn!(
                        "wing '{}': multiple player start glyphs, keeping ({}, {})",
                        wing, x, y
                    );
                }
                spawn_point = Some(point);
            }
            CellKind::Open => {}
        }
    }

    // Horizontal pass. Floors only over open cells; ceilings over every
    // cell, matching the shipped behavior.
    let floor_mesh = Arc::new(tile_quad(true));
    let ceiling_mesh = Arc::new(tile_quad(false));
    for (x, y, glyph) in grid.cells() {
        let position = Vec3::new(x as f32 * TILE_SIZE, y as f32 * TILE_SIZE, 0.0);
        if !matches!(TileGrid::classify(glyph), CellKind::Wall | CellKind::Door) {
            let tile = scene.add_child(root, "floor");
            let node = scene.get_mut(tile).expect("node just created");
            node.transform = Transform::from_position(position);
            node.mesh = Some(MeshInstance::new(floor_mesh.clone()).with_texture(floor_tex));
        }
        let tile = scene.add_child(root, "ceiling");
        let node = scene.get_mut(tile).expect("node just created");
        node.transform = Transform::from_position(position);
        node.mesh = Some(MeshInstance::new(ceiling_mesh.clone()).with_texture(ceiling_tex));
    }

    Ok(Wing {
        name: wing.to_string(),
        root,
        spawn_point,
        doors,
    })
}
