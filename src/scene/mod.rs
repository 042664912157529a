//! Scene module - arena scene graph and shared mesh data
//!
//! The compiler and the prop spawner both target this graph: nodes carry a
//! local transform plus optional mesh, collision, and tag attachments.
//! Traversal for rendering and collision resolution is the host's job.

mod graph;
mod mesh;

pub use graph::*;
pub use mesh::*;
