//! The persisted form of a maze.
//!
//! A description is what gets written to and read back from a JSON maze file:
//!
//! ```json
//! { "rows": 2, "cols": 2,
//!   "start": { "row": 0, "col": 0 }, "goal": { "row": 1, "col": 1 }, "exit": "east",
//!   "maze": [[{ "north": true, "east": false, "south": false, "west": true }, ...], ...] }
//! ```
//!
//! `maze` holds one array of cells per row, northmost row first. Any other fields on a cell
//! are ignored, and a missing `exit` means east.

use error_chain::bail;
use log::{debug, warn};
use serde_derive::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::io::{Read, Write};

use crate::cells::{Cell, CompassPrimary, Coordinate};
use crate::errors::*;
use crate::grid::Maze;
use crate::units::{ColumnsCount, RowsCount};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeDescription {
    pub rows: usize,
    pub cols: usize,
    pub start: Coordinate,
    pub goal: Coordinate,
    #[serde(default = "default_exit")]
    pub exit: CompassPrimary,
    pub maze: Vec<Vec<Cell>>,
}

fn default_exit() -> CompassPrimary {
    CompassPrimary::East
}

impl<'a> From<&'a Maze> for MazeDescription {
    fn from(maze: &'a Maze) -> MazeDescription {
        let cells = maze.cells();
        let rows = maze.iter_row()
            .map(|row| {
                row.into_iter()
                    .filter_map(|coord| maze.coordinate_to_index(coord))
                    .map(|index| cells[index])
                    .collect()
            })
            .collect();

        MazeDescription {
            rows: maze.rows().0,
            cols: maze.columns().0,
            start: maze.start(),
            goal: maze.goal(),
            exit: maze.exit_direction(),
            maze: rows,
        }
    }
}

impl TryFrom<MazeDescription> for Maze {
    type Error = Error;

    /// Takes the walls as given. Walls that disagree with their neighbour's are logged but
    /// do not stop the maze loading.
    fn try_from(description: MazeDescription) -> Result<Maze> {
        let MazeDescription { rows, cols, start, goal, exit, maze: cell_rows } = description;

        if rows == 0 || cols == 0 {
            bail!(ErrorKind::InvalidDimensions(rows, cols));
        }
        if cell_rows.len() != rows {
            bail!(ErrorKind::MalformedDescription(format!("expected {} rows of cells, found {}",
                                                          rows,
                                                          cell_rows.len())));
        }
        if let Some((index, row)) = cell_rows.iter().enumerate().find(|&(_, row)| row.len() != cols) {
            bail!(ErrorKind::MalformedDescription(format!("expected {} cells in row {}, found {}",
                                                          cols,
                                                          index,
                                                          row.len())));
        }

        let cells = cell_rows.into_iter().flatten().collect();
        let mut maze = Maze::from_cells(RowsCount(rows), ColumnsCount(cols), cells)?;
        maze.set_start(start)?;
        maze.set_goal(goal)?;
        maze.set_exit_direction(exit);

        let inconsistencies = maze.wall_inconsistencies();
        if let Some(first) = inconsistencies.first() {
            warn!("Loaded maze has {} one sided walls, the first between {} and {}",
                  inconsistencies.len(),
                  first.cell,
                  first.neighbour);
            for inconsistency in &inconsistencies {
                debug!("One sided wall: {:?}", inconsistency);
            }
        }

        Ok(maze)
    }
}

/// Read a JSON maze description.
pub fn load_maze<R: Read>(reader: R) -> Result<Maze> {
    let description: MazeDescription = serde_json::from_reader(reader)?;
    Maze::try_from(description)
}

/// Write the maze as a pretty printed JSON description.
pub fn save_maze<W: Write>(maze: &Maze, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, &MazeDescription::from(maze))?;
    Ok(())
}
