//! Built-in wing maps
//!
//! The shipped level layouts, embedded as ASCII rows. Each wing name keys
//! both its map here and its texture theme in the catalog
//! ("<wing>_wall" and friends).

use super::builder::{build_wing, Wing, WorldError};
use super::grid::TileGrid;
use crate::scene::SceneGraph;
use crate::textures::TextureCatalog;

/// Wing loaded when a save file names none.
pub const DEFAULT_WING: &str = "main_floor";

const MAIN_FLOOR: &[&str] = &[
    "##############",
    "#X...#.......#",
    "#....#..###..#",
    "#....@..#.#..#",
    "#....#..###..#",
    "######.......#",
    "#....$.......#",
    "#....#...#####",
    "#....#...+...#",
    "##############",
];

const WEST_WING: &[&str] = &[
    "##########",
    "#X.......#",
    "#..####..#",
    "#..#.....#",
    "#..#..####",
    "#..@..-..#",
    "#..#..#..#",
    "##########",
];

const EAST_WING: &[&str] = &[
    "************",
    "*......*...*",
    "*.X....+...*",
    "*......*...*",
    "****@***...*",
    "*......*...*",
    "*......$...*",
    "************",
];

/// The built-in map for a wing name, if one ships with the game.
pub fn wing_map(name: &str) -> Option<&'static [&'static str]> {
    match name {
        "main_floor" => Some(MAIN_FLOOR),
        "west_wing" => Some(WEST_WING),
        "east_wing" => Some(EAST_WING),
        _ => None,
    }
}

/// Names of all built-in wings.
pub fn wing_names() -> &'static [&'static str] {
    &["main_floor", "west_wing", "east_wing"]
}

/// Compile a built-in wing by name.
pub fn build_builtin_wing(
    scene: &mut SceneGraph,
    catalog: &TextureCatalog,
    name: &str,
) -> Result<Wing, WorldError> {
    let rows = wing_map(name).ok_or_else(|| WorldError::UnknownWing(name.to_string()))?;
    let grid = TileGrid::parse(rows)?;
    build_wing(scene, catalog, &grid, name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_builtin_map_parses() {
        for name in wing_names() {
            let rows = wing_map(name).unwrap();
            let grid = TileGrid::parse(rows).unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(grid.width() >= 3, "{} too narrow", name);
            assert!(grid.height() >= 3, "{} too short", name);
        }
    }

    #[test]
    fn test_every_builtin_wing_builds_with_builtin_catalog() {
        let catalog = TextureCatalog::builtin();
        for name in wing_names() {
            let mut scene = SceneGraph::new();
            let wing = build_builtin_wing(&mut scene, &catalog, name)
                .unwrap_or_else(|e| panic!("{}: {}", name, e));
            assert!(wing.require_spawn().is_ok(), "{} has no spawn", name);
            assert!(!wing.doors.is_empty(), "{} has no doors", name);
        }
    }

    #[test]
    fn test_default_wing_is_built_in() {
        assert!(wing_map(DEFAULT_WING).is_some());
    }

    #[test]
    fn test_unknown_wing_rejected() {
        let catalog = TextureCatalog::builtin();
        let mut scene = SceneGraph::new();
        let err = build_builtin_wing(&mut scene, &catalog, "attic").unwrap_err();
        assert!(matches!(err, WorldError::UnknownWing(_)));
    }
}
