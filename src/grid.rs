use error_chain::bail;
use itertools::iproduct;
use petgraph::graph::NodeIndex;
use petgraph::{Graph, Undirected};
use rand::Rng;

use crate::cells::{Cell, CompassPrimary, Coordinate, CoordinateSmallVec};
use crate::errors::*;
use crate::grid_iterators::{self, CellIter, RowIter};
use crate::units::{ColumnsCount, EdgesCount, NodesCount, RowsCount};

/// A rectangular maze: row-major walled cells plus the start and goal of the route through it.
///
/// Walls are stored on both sides of every interior edge. Carving keeps the two flags in
/// agreement; mazes loaded from elsewhere are expected to, see `wall_inconsistencies`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    cells: Vec<Cell>,
    rows: RowsCount,
    columns: ColumnsCount,
    start: Coordinate,
    goal: Coordinate,
    exit_direction: CompassPrimary,
}

/// Looking only east and south from each cell visits every interior edge once.
const FORWARD_DIRECTIONS: [CompassPrimary; 2] = [CompassPrimary::East, CompassPrimary::South];

/// Two neighbouring cells that disagree about the wall between them.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct WallInconsistency {
    pub cell: Coordinate,
    pub direction: CompassPrimary,
    pub neighbour: Coordinate,
}

/// Allocate a fully walled `rows` x `columns` maze.
///
/// The start is the north west corner, the goal the south east corner and the exit faces east.
/// Zero rows or columns is an `InvalidDimensions` error.
pub fn build_grid(rows: RowsCount, columns: ColumnsCount) -> Result<Maze> {
    if rows.0 == 0 || columns.0 == 0 {
        bail!(ErrorKind::InvalidDimensions(rows.0, columns.0));
    }
    let cells = vec![Cell::walled(); rows.0 * columns.0];
    Maze::from_cells(rows, columns, cells)
}

impl Maze {
    /// Wrap existing cells, keeping their walls as they are.
    pub fn from_cells(rows: RowsCount, columns: ColumnsCount, cells: Vec<Cell>) -> Result<Maze> {
        if rows.0 == 0 || columns.0 == 0 {
            bail!(ErrorKind::InvalidDimensions(rows.0, columns.0));
        }
        if cells.len() != rows.0 * columns.0 {
            bail!(ErrorKind::MalformedDescription(format!("expected {} cells for a {}x{} maze, found {}",
                                                          rows.0 * columns.0,
                                                          rows.0,
                                                          columns.0,
                                                          cells.len())));
        }

        Ok(Maze {
            cells,
            rows,
            columns,
            start: Coordinate::new(0, 0),
            goal: Coordinate::new(rows.0 as isize - 1, columns.0 as isize - 1),
            exit_direction: CompassPrimary::East,
        })
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.rows
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.columns
    }

    #[inline]
    pub fn size(&self) -> NodesCount {
        NodesCount(self.cells.len())
    }

    #[inline]
    pub fn start(&self) -> Coordinate {
        self.start
    }

    #[inline]
    pub fn goal(&self) -> Coordinate {
        self.goal
    }

    #[inline]
    pub fn exit_direction(&self) -> CompassPrimary {
        self.exit_direction
    }

    pub fn set_start(&mut self, start: Coordinate) -> Result<()> {
        self.check_valid_coordinate(start)?;
        self.start = start;
        Ok(())
    }

    pub fn set_goal(&mut self, goal: Coordinate) -> Result<()> {
        self.check_valid_coordinate(goal)?;
        self.goal = goal;
        Ok(())
    }

    pub fn set_exit_direction(&mut self, direction: CompassPrimary) {
        self.exit_direction = direction;
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell(&self, coord: Coordinate) -> Option<&Cell> {
        self.coordinate_to_index(coord).map(|index| &self.cells[index])
    }

    /// Is the coordinate within the maze's dimensions?
    #[inline]
    pub fn is_valid_coordinate(&self, coord: Coordinate) -> bool {
        coord.row >= 0 && coord.col >= 0 && (coord.row as usize) < self.rows.0 &&
        (coord.col as usize) < self.columns.0
    }

    /// Convert a coordinate to a row-major index in the range 0..maze.size().
    /// Returns None if the coordinate is invalid.
    #[inline]
    pub fn coordinate_to_index(&self, coord: Coordinate) -> Option<usize> {
        if self.is_valid_coordinate(coord) {
            Some(coord.row as usize * self.columns.0 + coord.col as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn index_to_coordinate(&self, index: usize) -> Coordinate {
        grid_iterators::index_to_coordinate(index, self.columns)
    }

    /// A cell coordinate chosen uniformly at random.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Coordinate {
        let index = rng.gen_range(0..self.cells.len());
        self.index_to_coordinate(index)
    }

    pub fn neighbour_at_direction(&self,
                                  coord: Coordinate,
                                  direction: CompassPrimary)
                                  -> Option<Coordinate> {
        let neighbour_coord = direction.offset(coord);
        if self.is_valid_coordinate(neighbour_coord) {
            Some(neighbour_coord)
        } else {
            None
        }
    }

    /// Cells that are to the North, East, South or West of a particular cell, but not
    /// necessarily reachable through an open wall.
    pub fn neighbours(&self, coord: Coordinate) -> CoordinateSmallVec {
        CompassPrimary::ALL.iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    /// Is the wall standing? Walls of coordinates outside of the maze always stand.
    pub fn has_wall(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        self.cell(coord).map_or(true, |cell| cell.has_wall(direction))
    }

    /// Can we walk from `coord` to its neighbour in `direction`?
    pub fn is_neighbour_linked(&self, coord: Coordinate, direction: CompassPrimary) -> bool {
        !self.has_wall(coord, direction) && self.neighbour_at_direction(coord, direction).is_some()
    }

    /// Knock down the wall between a cell and its neighbour, on both sides.
    /// Returns the neighbour's coordinate.
    pub fn carve_passage(&mut self, coord: Coordinate, direction: CompassPrimary) -> Result<Coordinate> {
        self.check_valid_coordinate(coord)?;
        let neighbour = direction.offset(coord);
        let (index, neighbour_index) = match (self.coordinate_to_index(coord),
                                              self.coordinate_to_index(neighbour)) {
            (Some(a), Some(b)) => (a, b),
            _ => bail!(ErrorKind::InvalidCoordinate(neighbour, self.rows.0, self.columns.0)),
        };

        self.cells[index].set_wall(direction, false);
        self.cells[neighbour_index].set_wall(direction.opposite(), false);
        Ok(neighbour)
    }

    /// Is the goal on the edge of the maze that the exit direction faces?
    pub fn goal_faces_boundary(&self) -> bool {
        self.is_valid_coordinate(self.goal) &&
        self.neighbour_at_direction(self.goal, self.exit_direction).is_none()
    }

    /// Clear the goal's boundary wall in the exit direction.
    ///
    /// An exit that does not lead out of the grid would open an extra interior passage and
    /// break the spanning tree, so that is refused with `ExitNotOnBoundary`.
    pub fn open_exit(&mut self) -> Result<()> {
        if !self.goal_faces_boundary() {
            bail!(ErrorKind::ExitNotOnBoundary(self.goal, self.exit_direction));
        }
        let goal = self.goal;
        let direction = self.exit_direction;
        if let Some(index) = self.coordinate_to_index(goal) {
            self.cells[index].set_wall(direction, false);
        }
        Ok(())
    }

    #[inline]
    pub fn is_exit_open(&self) -> bool {
        !self.has_wall(self.goal, self.exit_direction)
    }

    /// The coordinate just beyond the exit, one step past the goal.
    #[inline]
    pub fn exit_step(&self) -> Coordinate {
        self.exit_direction.offset(self.goal)
    }

    /// Open walls on the outer edge of the maze, as (cell, direction) pairs.
    pub fn boundary_openings(&self) -> Vec<(Coordinate, CompassPrimary)> {
        iproduct!(self.iter(), CompassPrimary::ALL.iter().cloned())
            .filter(|&(coord, dir)| {
                self.neighbour_at_direction(coord, dir).is_none() && !self.has_wall(coord, dir)
            })
            .collect()
    }

    /// Number of interior edges with the walls on both sides cleared.
    pub fn passages_count(&self) -> EdgesCount {
        EdgesCount(self.iter_passages().count())
    }

    /// Interior edges where both neighbouring cells have their walls cleared, each edge once.
    pub fn iter_passages<'a>(&'a self) -> impl Iterator<Item = (Coordinate, Coordinate)> + 'a {
        iproduct!(self.iter(), FORWARD_DIRECTIONS.iter().cloned()).filter_map(move |(coord, dir)| {
            self.neighbour_at_direction(coord, dir)
                .filter(|neighbour| {
                    !self.has_wall(coord, dir) && !self.has_wall(*neighbour, dir.opposite())
                })
                .map(|neighbour| (coord, neighbour))
        })
    }

    /// Interior edges whose two wall flags disagree. Empty for any carved maze.
    pub fn wall_inconsistencies(&self) -> Vec<WallInconsistency> {
        iproduct!(self.iter(), FORWARD_DIRECTIONS.iter().cloned())
            .filter_map(|(coord, dir)| {
                self.neighbour_at_direction(coord, dir)
                    .filter(|neighbour| self.has_wall(coord, dir) != self.has_wall(*neighbour, dir.opposite()))
                    .map(|neighbour| WallInconsistency {
                        cell: coord,
                        direction: dir,
                        neighbour,
                    })
            })
            .collect()
    }

    /// The open passages as an undirected graph, one node per cell in row-major order.
    pub fn passage_graph(&self) -> Graph<Coordinate, (), Undirected> {
        let NodesCount(nodes) = self.size();
        let mut graph = Graph::with_capacity(nodes, nodes.saturating_sub(1));
        for coord in self.iter() {
            let _ = graph.add_node(coord);
        }
        for (a, b) in self.iter_passages() {
            if let (Some(a_index), Some(b_index)) = (self.coordinate_to_index(a),
                                                     self.coordinate_to_index(b)) {
                let _ = graph.add_edge(NodeIndex::new(a_index), NodeIndex::new(b_index), ());
            }
        }
        graph
    }

    #[inline]
    pub fn iter(&self) -> CellIter {
        CellIter::new(self.rows, self.columns)
    }

    #[inline]
    pub fn iter_row(&self) -> RowIter {
        RowIter::new(self.rows, self.columns)
    }

    fn check_valid_coordinate(&self, coord: Coordinate) -> Result<()> {
        if self.is_valid_coordinate(coord) {
            Ok(())
        } else {
            Err(ErrorKind::InvalidCoordinate(coord, self.rows.0, self.columns.0).into())
        }
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools;

    use super::*;

    fn small_maze(rows: usize, columns: usize) -> Maze {
        build_grid(RowsCount(rows), ColumnsCount(columns)).expect("valid dimensions")
    }

    fn gc(row: isize, col: isize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn build_fully_walled_grid() {
        let m = small_maze(3, 4);
        assert_eq!(m.size(), NodesCount(12));
        assert_eq!(m.rows(), RowsCount(3));
        assert_eq!(m.columns(), ColumnsCount(4));
        assert!(m.cells().iter().all(|cell| *cell == Cell::walled()));
        assert_eq!(m.passages_count(), EdgesCount(0));
        assert!(m.boundary_openings().is_empty());
    }

    #[test]
    fn build_grid_defaults() {
        let m = small_maze(3, 4);
        assert_eq!(m.start(), gc(0, 0));
        assert_eq!(m.goal(), gc(2, 3));
        assert_eq!(m.exit_direction(), CompassPrimary::East);
        assert_eq!(m.exit_step(), gc(2, 4));
    }

    #[test]
    fn zero_dimensions_are_rejected() {
        for &(rows, columns) in &[(0, 5), (5, 0), (0, 0)] {
            match build_grid(RowsCount(rows), ColumnsCount(columns)) {
                Err(Error(ErrorKind::InvalidDimensions(r, c), _)) => {
                    assert_eq!((r, c), (rows, columns));
                }
                other => panic!("expected InvalidDimensions, got {:?}", other),
            }
        }
    }

    #[test]
    fn single_cell_grid() {
        let m = small_maze(1, 1);
        assert_eq!(m.size(), NodesCount(1));
        assert!(m.neighbours(gc(0, 0)).is_empty());
        assert_eq!(m.goal(), gc(0, 0));
    }

    #[test]
    fn neighbour_cells() {
        let m = small_maze(10, 10);
        let check_expected_neighbours = |coord, expected: &[Coordinate]| {
            let neighbours: Vec<Coordinate> = m.neighbours(coord).iter().cloned().sorted().collect();
            let expected: Vec<Coordinate> = expected.iter().cloned().sorted().collect();
            assert_eq!(neighbours, expected);
        };

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(0, 1), gc(1, 0)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // sides
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(1, 1), gc(0, 2)]);
        check_expected_neighbours(gc(8, 9), &[gc(7, 9), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbour_at_dir() {
        let m = small_maze(2, 2);
        assert_eq!(m.neighbour_at_direction(gc(0, 0), CompassPrimary::North), None);
        assert_eq!(m.neighbour_at_direction(gc(0, 0), CompassPrimary::South), Some(gc(1, 0)));
        assert_eq!(m.neighbour_at_direction(gc(0, 0), CompassPrimary::East), Some(gc(0, 1)));
        assert_eq!(m.neighbour_at_direction(gc(0, 0), CompassPrimary::West), None);
        assert_eq!(m.neighbour_at_direction(gc(1, 1), CompassPrimary::North), Some(gc(0, 1)));
        assert_eq!(m.neighbour_at_direction(gc(1, 1), CompassPrimary::East), None);
    }

    #[test]
    fn coordinate_as_index() {
        let m = small_maze(3, 3);
        let indices = m.iter().map(|coord| m.coordinate_to_index(coord)).collect::<Vec<_>>();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(indices, expected);
        for index in 0..9 {
            assert_eq!(m.coordinate_to_index(m.index_to_coordinate(index)), Some(index));
        }

        assert_eq!(m.coordinate_to_index(gc(3, 2)), None);
        assert_eq!(m.coordinate_to_index(gc(2, 3)), None);
        assert_eq!(m.coordinate_to_index(gc(-1, 0)), None);
        assert_eq!(m.coordinate_to_index(gc(0, -1)), None);
    }

    #[test]
    fn random_cell() {
        let m = small_maze(4, 5);
        let mut rng = rand::thread_rng();
        for _ in 0..1000 {
            assert!(m.is_valid_coordinate(m.random_cell(&mut rng)));
        }
    }

    #[test]
    fn carving_clears_both_sides() {
        let mut m = small_maze(3, 3);
        let neighbour = m.carve_passage(gc(1, 1), CompassPrimary::North).expect("carve failed");
        assert_eq!(neighbour, gc(0, 1));
        assert!(!m.has_wall(gc(1, 1), CompassPrimary::North));
        assert!(!m.has_wall(gc(0, 1), CompassPrimary::South));
        assert!(m.is_neighbour_linked(gc(1, 1), CompassPrimary::North));
        assert!(m.is_neighbour_linked(gc(0, 1), CompassPrimary::South));
        assert!(!m.is_neighbour_linked(gc(1, 1), CompassPrimary::East));
        assert_eq!(m.passages_count(), EdgesCount(1));
        assert_eq!(m.iter_passages().collect::<Vec<_>>(), vec![(gc(0, 1), gc(1, 1))]);
        assert!(m.wall_inconsistencies().is_empty());
    }

    #[test]
    fn carving_through_the_boundary_fails() {
        let mut m = small_maze(2, 2);
        assert!(m.carve_passage(gc(0, 0), CompassPrimary::North).is_err());
        assert!(m.carve_passage(gc(5, 5), CompassPrimary::North).is_err());
        assert_eq!(m, small_maze(2, 2));
    }

    #[test]
    fn exit_opens_on_boundary() {
        let mut m = small_maze(3, 3);
        m.open_exit().expect("goal is on the east boundary");
        assert!(m.is_exit_open());
        assert_eq!(m.boundary_openings(), vec![(gc(2, 2), CompassPrimary::East)]);
        assert_eq!(m.passages_count(), EdgesCount(0));
    }

    #[test]
    fn exit_refused_inside_grid() {
        let mut m = small_maze(3, 3);
        m.set_goal(gc(1, 1)).unwrap();
        match m.open_exit() {
            Err(Error(ErrorKind::ExitNotOnBoundary(goal, dir), _)) => {
                assert_eq!(goal, gc(1, 1));
                assert_eq!(dir, CompassPrimary::East);
            }
            other => panic!("expected ExitNotOnBoundary, got {:?}", other),
        }
        assert!(!m.is_exit_open());

        m.set_goal(gc(0, 1)).unwrap();
        m.set_exit_direction(CompassPrimary::North);
        m.open_exit().expect("goal is on the north boundary");
        assert_eq!(m.exit_step(), gc(-1, 1));
    }

    #[test]
    fn start_and_goal_must_be_in_bounds() {
        let mut m = small_maze(2, 2);
        assert!(m.set_start(gc(2, 0)).is_err());
        assert!(m.set_goal(gc(0, -1)).is_err());
        assert_eq!(m.start(), gc(0, 0));
        assert_eq!(m.goal(), gc(1, 1));
    }

    #[test]
    fn one_sided_walls_are_reported() {
        let mut cells = vec![Cell::walled(); 4];
        cells[0].east = false;
        let m = Maze::from_cells(RowsCount(2), ColumnsCount(2), cells).unwrap();
        assert_eq!(m.wall_inconsistencies(),
                   vec![WallInconsistency {
                            cell: gc(0, 0),
                            direction: CompassPrimary::East,
                            neighbour: gc(0, 1),
                        }]);
        // Only a passage open from both sides counts.
        assert_eq!(m.passages_count(), EdgesCount(0));
    }

    #[test]
    fn cells_count_must_match_dimensions() {
        assert!(Maze::from_cells(RowsCount(2), ColumnsCount(2), vec![Cell::walled(); 3]).is_err());
    }

    #[test]
    fn passage_graph_mirrors_open_walls() {
        let mut m = small_maze(2, 2);
        m.carve_passage(gc(0, 0), CompassPrimary::East).unwrap();
        m.carve_passage(gc(0, 1), CompassPrimary::South).unwrap();
        let graph = m.passage_graph();
        assert_eq!(graph.node_count(), 4);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph[NodeIndex::new(3)], gc(1, 1));
        assert_eq!(petgraph::algo::connected_components(&graph), 2);
    }
}
