//! **prim-mazes** generates perfect rectangular mazes with randomized Prim's algorithm and finds
//! the route from a start cell to a goal cell, out through an exit in the goal's boundary wall.
//!
//! ```
//! use prim_mazes::{generators, grid, pathing, units::{ColumnsCount, RowsCount}};
//!
//! let mut maze = grid::build_grid(RowsCount(8), ColumnsCount(8)).unwrap();
//! generators::carve_maze(&mut maze).unwrap();
//! let route = pathing::find_route(&maze).unwrap();
//! assert_eq!(route.start(), maze.start());
//! assert_eq!(route.exit_step(), maze.exit_step());
//! ```

pub mod cells;
pub mod descriptions;
pub mod errors;
pub mod generators;
pub mod grid;
pub mod grid_iterators;
pub mod options;
pub mod pathing;
pub mod units;
mod utils;
