//! World module - tile maps and the map-to-geometry compiler
//!
//! A wing is one named, texture-themed section of the level described by an
//! ASCII tile map. The compiler turns a validated `TileGrid` into wall
//! blocks with face culling, floor/ceiling tiles, collision boxes, typed
//! door tags, and the player spawn point.

mod builder;
mod grid;
mod wings;

pub use builder::*;
pub use grid::*;
pub use wings::*;
