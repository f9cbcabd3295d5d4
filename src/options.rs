use rand::Rng;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::generators;
use crate::grid::{self, Maze};
use crate::units::{ColumnsCount, RowsCount};

pub const DEFAULT_ROWS: usize = 20;
pub const DEFAULT_COLUMNS: usize = 20;

/// Everything needed to set up a maze before it is carved.
///
/// A start or goal of None falls back to the grid's defaults: the north west and south east
/// corners.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MazeOptions {
    pub rows: RowsCount,
    pub columns: ColumnsCount,
    pub start: Option<Coordinate>,
    pub goal: Option<Coordinate>,
    pub exit_direction: CompassPrimary,
}

impl Default for MazeOptions {
    fn default() -> MazeOptions {
        MazeOptions {
            rows: RowsCount(DEFAULT_ROWS),
            columns: ColumnsCount(DEFAULT_COLUMNS),
            start: None,
            goal: None,
            exit_direction: CompassPrimary::East,
        }
    }
}

impl MazeOptions {
    /// A fully walled maze with the start, goal and exit direction applied.
    pub fn build_maze(&self) -> Result<Maze> {
        let mut maze = grid::build_grid(self.rows, self.columns)?;
        if let Some(start) = self.start {
            maze.set_start(start)?;
        }
        if let Some(goal) = self.goal {
            maze.set_goal(goal)?;
        }
        maze.set_exit_direction(self.exit_direction);
        Ok(maze)
    }

    /// Build and carve a maze.
    pub fn generate(&self) -> Result<Maze> {
        let mut maze = self.build_maze()?;
        generators::carve_maze(&mut maze)?;
        Ok(maze)
    }

    pub fn generate_with_rng<R: Rng>(&self, rng: &mut R) -> Result<Maze> {
        let mut maze = self.build_maze()?;
        generators::carve_maze_with_rng(&mut maze, rng)?;
        Ok(maze)
    }
}

#[derive(Debug, Default)]
pub struct MazeOptionsBuilder {
    options: MazeOptions,
}

impl MazeOptionsBuilder {
    pub fn new() -> MazeOptionsBuilder {
        MazeOptionsBuilder::default()
    }

    pub fn rows(mut self, rows: usize) -> Self {
        self.options.rows = RowsCount(rows);
        self
    }

    pub fn columns(mut self, columns: usize) -> Self {
        self.options.columns = ColumnsCount(columns);
        self
    }

    pub fn start(mut self, start: Option<Coordinate>) -> Self {
        self.options.start = start;
        self
    }

    pub fn goal(mut self, goal: Option<Coordinate>) -> Self {
        self.options.goal = goal;
        self
    }

    pub fn exit_direction(mut self, direction: CompassPrimary) -> Self {
        self.options.exit_direction = direction;
        self
    }

    pub fn build(self) -> MazeOptions {
        self.options
    }
}
