use serde_derive::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

/// A grid position. Rows grow southwards and columns grow eastwards.
///
/// The components are signed so that a step off the edge of the grid (the exit step
/// beyond the goal) is still representable. Whether a coordinate lies inside a given
/// maze is a question for the maze, see `Maze::is_valid_coordinate`.
#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: isize,
    pub col: isize,
}

impl Coordinate {
    pub fn new(row: isize, col: isize) -> Coordinate {
        Coordinate { row, col }
    }

    /// Number of unit steps between two coordinates on a 4-connected grid.
    /// Saturates at `usize::MAX` for coordinates at opposite extremes.
    pub fn manhattan_distance(&self, other: Coordinate) -> usize {
        self.row.abs_diff(other.row).saturating_add(self.col.abs_diff(other.col))
    }

    #[inline]
    pub fn is_adjacent(&self, other: Coordinate) -> bool {
        self.manhattan_distance(other) == 1
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

pub type CoordinateSmallVec = SmallVec<[Coordinate; 4]>;

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompassPrimary {
    North,
    East,
    South,
    West,
}

impl CompassPrimary {
    /// The order neighbours are looked at by the carver and the router.
    pub const ALL: [CompassPrimary; 4] = [CompassPrimary::North,
                                          CompassPrimary::East,
                                          CompassPrimary::South,
                                          CompassPrimary::West];

    pub fn opposite(self) -> CompassPrimary {
        match self {
            CompassPrimary::North => CompassPrimary::South,
            CompassPrimary::East => CompassPrimary::West,
            CompassPrimary::South => CompassPrimary::North,
            CompassPrimary::West => CompassPrimary::East,
        }
    }

    /// Creates a new `Coordinate` offset 1 cell away in this direction.
    /// The result may lie outside of any particular maze.
    pub fn offset(self, coord: Coordinate) -> Coordinate {
        let (row, col) = (coord.row, coord.col);
        match self {
            CompassPrimary::North => Coordinate::new(row - 1, col),
            CompassPrimary::East => Coordinate::new(row, col + 1),
            CompassPrimary::South => Coordinate::new(row + 1, col),
            CompassPrimary::West => Coordinate::new(row, col - 1),
        }
    }

    /// The direction of a single step from `from` to `to`, if they are adjacent.
    pub fn between(from: Coordinate, to: Coordinate) -> Option<CompassPrimary> {
        CompassPrimary::ALL.iter()
            .cloned()
            .find(|dir| dir.offset(from) == to)
    }
}

impl FromStr for CompassPrimary {
    type Err = String;

    fn from_str(name: &str) -> Result<CompassPrimary, String> {
        match name.to_lowercase().as_ref() {
            "north" | "n" => Ok(CompassPrimary::North),
            "east" | "e" => Ok(CompassPrimary::East),
            "south" | "s" => Ok(CompassPrimary::South),
            "west" | "w" => Ok(CompassPrimary::West),
            _ => Err(format!("unknown direction '{}', expected north, east, south or west", name)),
        }
    }
}

/// The four walls of one grid cell. `true` means the wall is standing.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Serialize, Deserialize)]
pub struct Cell {
    pub north: bool,
    pub east: bool,
    pub south: bool,
    pub west: bool,
}

impl Cell {
    pub fn walled() -> Cell {
        Cell {
            north: true,
            east: true,
            south: true,
            west: true,
        }
    }

    #[inline]
    pub fn has_wall(&self, direction: CompassPrimary) -> bool {
        match direction {
            CompassPrimary::North => self.north,
            CompassPrimary::East => self.east,
            CompassPrimary::South => self.south,
            CompassPrimary::West => self.west,
        }
    }

    pub fn set_wall(&mut self, direction: CompassPrimary, standing: bool) {
        let wall = match direction {
            CompassPrimary::North => &mut self.north,
            CompassPrimary::East => &mut self.east,
            CompassPrimary::South => &mut self.south,
            CompassPrimary::West => &mut self.west,
        };
        *wall = standing;
    }

    /// Directions with no wall, in `CompassPrimary::ALL` order.
    pub fn open_directions(&self) -> SmallVec<[CompassPrimary; 4]> {
        CompassPrimary::ALL.iter()
            .cloned()
            .filter(|dir| !self.has_wall(*dir))
            .collect()
    }
}

impl Default for Cell {
    fn default() -> Cell {
        Cell::walled()
    }
}
