//! Tile grid - the ASCII map legend and its validation
//!
//! Map legend:
//! - `#`, `*` walls
//! - `$`, `@`, `-`, `+` doors (`@`/`-` unlocked, `$`/`+` locked)
//! - `X` player start
//! - anything else open floor
//!
//! Grids must be rectangular. Ragged or empty input is rejected outright
//! rather than padded: padding would invent open cells at the ragged edge
//! and change which wall faces get emitted.

/// World-units width of one grid tile.
pub const TILE_SIZE: f32 = 4.0;

/// Height of wall blocks and the ceiling plane.
pub const WALL_HEIGHT: f32 = 3.5;

/// Camera height above the floor at the spawn point.
pub const PLAYER_EYE_HEIGHT: f32 = 1.6;

/// Door texture UV tuning: doors render an inset window of the door
/// texture instead of the full [0,1] range a plain wall uses.
pub const DOOR_U_SCALE: f32 = 1.18;
pub const DOOR_U_MARGIN: f32 = 0.2;
pub const DOOR_V_SCALE: f32 = 1.0;
pub const DOOR_V_MARGIN: f32 = 0.0;

/// Glyph for the player start tile.
pub const PLAYER_START: char = 'X';

const WALL_CHARS: [char; 2] = ['#', '*'];
const DOOR_CHARS: [char; 4] = ['$', '@', '-', '+'];
const UNLOCKED_DOOR_CHARS: [char; 2] = ['@', '-'];

/// Error type for map validation.
#[derive(Debug)]
pub enum MapError {
    /// The grid is not a usable rectangle; the message names the problem.
    InvalidMap(String),
}

impl std::fmt::Display for MapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapError::InvalidMap(msg) => write!(f, "invalid map: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

/// How a glyph behaves for geometry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Open,
    Wall,
    Door,
    /// Open for geometry, plus records the player start.
    Spawn,
}

/// A validated rectangular tile map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    rows: Vec<Vec<char>>,
    width: usize,
    height: usize,
}

impl TileGrid {
    /// Parse and validate a grid from row strings.
    ///
    /// Width is fixed by the first row; every other row must match it.
    pub fn parse<S: AsRef<str>>(rows: &[S]) -> Result<Self, MapError> {
        if rows.is_empty() {
            return Err(MapError::InvalidMap("map has no rows".into()));
        }
        let width = rows[0].as_ref().chars().count();
        if width == 0 {
            return Err(MapError::InvalidMap("first row is empty".into()));
        }
        let mut grid = Vec::with_capacity(rows.len());
        for (y, row) in rows.iter().enumerate() {
            let cells: Vec<char> = row.as_ref().chars().collect();
            if cells.len() != width {
                return Err(MapError::InvalidMap(format!(
                    "row {} has {} columns, expected {}",
                    y,
                    cells.len(),
                    width
                )));
            }
            grid.push(cells);
        }
        Ok(Self {
            height: grid.len(),
            rows: grid,
            width,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Glyph at in-bounds coordinates.
    pub fn glyph(&self, x: usize, y: usize) -> Option<char> {
        self.rows.get(y)?.get(x).copied()
    }

    /// Classify a glyph.
    pub fn classify(glyph: char) -> CellKind {
        if WALL_CHARS.contains(&glyph) {
            CellKind::Wall
        } else if DOOR_CHARS.contains(&glyph) {
            CellKind::Door
        } else if glyph == PLAYER_START {
            CellKind::Spawn
        } else {
            CellKind::Open
        }
    }

    /// Whether the cell blocks traversal. Out-of-bounds neighbors count as
    /// non-solid, so edge cells always face the map boundary with a wall.
    pub fn is_solid(&self, x: isize, y: isize) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        match self.glyph(x as usize, y as usize) {
            Some(glyph) => matches!(Self::classify(glyph), CellKind::Wall | CellKind::Door),
            None => false,
        }
    }

    /// Whether an in-bounds cell is a door glyph.
    pub fn is_door(&self, x: usize, y: usize) -> bool {
        self.glyph(x, y)
            .map(|glyph| Self::classify(glyph) == CellKind::Door)
            .unwrap_or(false)
    }

    /// Whether a door glyph starts unlocked (`@` and `-` do, `$` and `+`
    /// need a key).
    pub fn door_unlocked(glyph: char) -> bool {
        UNLOCKED_DOOR_CHARS.contains(&glyph)
    }

    /// Iterate all cells as `(x, y, glyph)` in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, char)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &glyph)| (x, y, glyph))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rectangular_grid() {
        let grid = TileGrid::parse(&["###", "#.#", "###"]).unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 3);
        assert_eq!(grid.glyph(1, 1), Some('.'));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let err = TileGrid::parse::<&str>(&[]).unwrap_err();
        assert!(err.to_string().contains("no rows"));
    }

    #[test]
    fn test_empty_first_row_rejected() {
        let err = TileGrid::parse(&["", "##"]).unwrap_err();
        assert!(err.to_string().contains("first row is empty"));
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let err = TileGrid::parse(&["###", "##", "###"]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("row 1"), "message was: {}", msg);
        assert!(msg.contains("expected 3"), "message was: {}", msg);
    }

    #[test]
    fn test_glyph_classification() {
        assert_eq!(TileGrid::classify('#'), CellKind::Wall);
        assert_eq!(TileGrid::classify('*'), CellKind::Wall);
        for glyph in ['$', '@', '-', '+'] {
            assert_eq!(TileGrid::classify(glyph), CellKind::Door);
        }
        assert_eq!(TileGrid::classify('X'), CellKind::Spawn);
        assert_eq!(TileGrid::classify('.'), CellKind::Open);
        assert_eq!(TileGrid::classify(' '), CellKind::Open);
    }

    #[test]
    fn test_door_lock_state() {
        assert!(TileGrid::door_unlocked('@'));
        assert!(TileGrid::door_unlocked('-'));
        assert!(!TileGrid::door_unlocked('$'));
        assert!(!TileGrid::door_unlocked('+'));
    }

    #[test]
    fn test_out_of_bounds_is_not_solid() {
        let grid = TileGrid::parse(&["#"]).unwrap();
        assert!(grid.is_solid(0, 0));
        assert!(!grid.is_solid(-1, 0));
        assert!(!grid.is_solid(0, -1));
        assert!(!grid.is_solid(1, 0));
        assert!(!grid.is_solid(0, 1));
    }

    #[test]
    fn test_doors_are_solid() {
        let grid = TileGrid::parse(&["$@"]).unwrap();
        assert!(grid.is_solid(0, 0));
        assert!(grid.is_solid(1, 0));
        assert!(grid.is_door(0, 0));
        assert!(grid.is_door(1, 0));
    }
}
