//! Arena scene graph
//!
//! Nodes live in a flat arena and are addressed by copyable `NodeId`
//! handles, so callers never hold borrows across structural mutation.
//! Door state and collision ownership are typed attachments resolved by
//! direct lookup - no string tags, no parent-chain walks.

use glam::Vec3;

use super::mesh::MeshInstance;

/// Handle to a node in a `SceneGraph`.
///
/// Handles stay valid until the node's subtree is removed; a removed
/// node's slot is never reused within the same graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Local transform relative to the parent node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    /// Heading, pitch, roll in degrees.
    pub hpr: [f32; 3],
    /// Uniform scale.
    pub scale: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            hpr: [0.0, 0.0, 0.0],
            scale: 1.0,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Which of the two disjoint collision classes a volume belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionCategory {
    /// Blocks traversal.
    Solid,
    /// Pass-through trigger zone.
    Sensor,
}

/// Collision primitive in node-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    /// Axis-aligned box: center plus half-extents.
    Box { center: Vec3, half_extents: Vec3 },
    Sphere { center: Vec3, radius: f32 },
    /// Capsule between two endpoints.
    Capsule { a: Vec3, b: Vec3, radius: f32 },
}

/// A collision volume attached to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionVolume {
    pub shape: CollisionShape,
    pub category: CollisionCategory,
    /// The node that owns this volume for interaction purposes (set at
    /// spawn/build time). Interaction code resolves hits through this
    /// back-reference instead of climbing the parent chain.
    pub owner: Option<NodeId>,
}

/// Door state attached to a wall block compiled from a door glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorTag {
    /// Grid coordinates of the source tile.
    pub x: usize,
    pub y: usize,
    pub unlocked: bool,
}

/// Typed tag attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeTag {
    Door(DoorTag),
}

/// A node in the scene graph.
#[derive(Debug)]
pub struct Node {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<MeshInstance>,
    pub collision: Option<CollisionVolume>,
    pub tag: Option<NodeTag>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            transform: Transform::default(),
            mesh: None,
            collision: None,
            tag: None,
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn door_tag(&self) -> Option<&DoorTag> {
        match &self.tag {
            Some(NodeTag::Door(tag)) => Some(tag),
            None => None,
        }
    }
}

/// Flat arena of scene nodes.
///
/// Removed nodes leave tombstone slots so outstanding handles to other
/// nodes stay valid. Not thread-safe: all mutation happens on the owning
/// thread, matching the single-threaded build model.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: Vec<Option<Node>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parentless root node.
    pub fn add_root(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(name.into(), None)));
        id
    }

    /// Create a node parented under `parent`.
    ///
    /// Panics if `parent` has been removed; structural bugs should fail
    /// loudly during level construction rather than build a detached tree.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        assert!(
            self.get(parent).is_some(),
            "add_child: parent {:?} is not a live node",
            parent
        );
        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(name.into(), Some(parent))));
        self.nodes[parent.0]
            .as_mut()
            .expect("parent checked above")
            .children
            .push(id);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|slot| slot.as_ref())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove a node and its entire subtree.
    pub fn remove_subtree(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.0).and_then(|slot| slot.take()) else {
            return;
        };
        if let Some(parent) = node.parent {
            if let Some(parent_node) = self.get_mut(parent) {
                parent_node.children.retain(|&child| child != id);
            }
        }
        let mut pending = node.children;
        while let Some(child) = pending.pop() {
            if let Some(child_node) = self.nodes.get_mut(child.0).and_then(|slot| slot.take()) {
                pending.extend(child_node.children);
            }
        }
    }

    /// Iterate over `id` and all of its live descendants, depth-first.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = match self.get(id) {
            Some(_) => vec![id],
            None => Vec::new(),
        };
        std::iter::from_fn(move || {
            let next = stack.pop()?;
            if let Some(node) = self.get(next) {
                stack.extend(node.children.iter().copied());
            }
            Some(next)
        })
    }

    /// Resolve a collision hit on `id` to the node that owns the volume.
    ///
    /// Falls back to the hit node itself when the volume carries no
    /// explicit owner.
    pub fn collision_owner(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        let volume = node.collision.as_ref()?;
        Some(volume.owner.unwrap_or(id))
    }

    /// Door tag reachable from a collision hit, if the owning node has one.
    pub fn door_for_collision(&self, id: NodeId) -> Option<&DoorTag> {
        let owner = self.collision_owner(id)?;
        self.get(owner)?.door_tag()
    }
}
