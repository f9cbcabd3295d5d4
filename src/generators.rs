use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace};
use rand::{self, Rng};
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::grid::Maze;
use crate::units::NodesCount;
use crate::utils;

/// A wall between a cell already in the maze and a neighbour that was not in the maze
/// when the wall was recorded.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct WallCandidate {
    pub interior: Coordinate,
    pub exterior: Coordinate,
    pub direction: CompassPrimary,
}

/// Turn a fully walled grid into a perfect maze and open the exit at the goal.
pub fn carve_maze(maze: &mut Maze) -> Result<()> {
    let mut rng = rand::thread_rng();
    carve_maze_with_rng(maze, &mut rng)
}

/// `carve_maze` with a caller supplied random number source, e.g. a seeded `StdRng`.
///
/// The goal must sit on the boundary the exit direction faces. That is checked before any
/// wall comes down, so a refused maze is returned untouched.
pub fn carve_maze_with_rng<R: Rng>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    if !maze.goal_faces_boundary() {
        bail!(ErrorKind::ExitNotOnBoundary(maze.goal(), maze.exit_direction()));
    }

    prims_spanning_tree(maze, rng)?;
    maze.open_exit()
}

/// Apply randomized Prim's algorithm to the grid.
///
/// Starting from one random seed cell, the maze grows by repeatedly picking a random wall out
/// of the frontier list - walls between the grown region and the cells outside of it - and
/// knocking it down if the cell behind it has still not joined the maze. A cell joins once,
/// through exactly one wall, so the passages form a spanning tree of the grid.
///
/// The frontier list holds duplicates: a cell outside the maze is recorded once per neighbour
/// that joined. Once the cell joins, its remaining records go stale and are skipped when picked.
/// Which cells are in the maze is tracked in a set local to this call, not in the cells.
pub fn prims_spanning_tree<R: Rng>(maze: &mut Maze, rng: &mut R) -> Result<()> {
    let NodesCount(cells_count) = maze.size();
    let mut in_maze = utils::cell_index_set(cells_count);
    let mut frontier: Vec<WallCandidate> = Vec::with_capacity(2 * cells_count);

    let seed = maze.random_cell(rng);
    debug!("Growing a {}x{} maze from seed cell {}", maze.rows().0, maze.columns().0, seed);
    absorb(maze, seed, &mut in_maze, &mut frontier);

    let mut passages_carved = 0;
    let mut stale_candidates = 0;
    while !frontier.is_empty() {

        // Order within the list does not matter, so swap_remove keeps the pick O(1).
        let pick = rng.gen_range(0..frontier.len());
        let candidate = frontier.swap_remove(pick);

        if is_in_maze(maze, &in_maze, candidate.exterior) {
            stale_candidates += 1;
            continue;
        }

        trace!("Carving {:?} from {} into {}", candidate.direction, candidate.interior, candidate.exterior);
        let _ = maze.carve_passage(candidate.interior, candidate.direction)?;
        passages_carved += 1;
        absorb(maze, candidate.exterior, &mut in_maze, &mut frontier);
    }

    debug!("Carved {} passages, skipped {} stale wall candidates",
           passages_carved,
           stale_candidates);
    Ok(())
}

/// The walls from `coord` to each of its neighbours that are not in the maze yet.
pub fn frontier_candidates(maze: &Maze,
                           in_maze: &BitSet,
                           coord: Coordinate)
                           -> SmallVec<[WallCandidate; 4]> {
    CompassPrimary::ALL.iter()
        .filter_map(|dir| {
            maze.neighbour_at_direction(coord, *dir)
                .filter(|neighbour| !is_in_maze(maze, in_maze, *neighbour))
                .map(|neighbour| {
                    WallCandidate {
                        interior: coord,
                        exterior: neighbour,
                        direction: *dir,
                    }
                })
        })
        .collect()
}

fn absorb(maze: &Maze, coord: Coordinate, in_maze: &mut BitSet, frontier: &mut Vec<WallCandidate>) {
    if let Some(index) = maze.coordinate_to_index(coord) {
        let _ = in_maze.insert(index);
    }
    frontier.extend(frontier_candidates(maze, in_maze, coord));
}

#[inline]
fn is_in_maze(maze: &Maze, in_maze: &BitSet, coord: Coordinate) -> bool {
    maze.coordinate_to_index(coord)
        .map_or(false, |index| in_maze.contains(index))
}

#[cfg(test)]
mod tests {

    use petgraph::algo::{connected_components, is_cyclic_undirected};
    use quickcheck::quickcheck;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::cells::Cell;
    use crate::grid::build_grid;
    use crate::units::{ColumnsCount, EdgesCount, RowsCount};

    fn carved(rows: usize, columns: usize, seed: u64) -> Maze {
        let mut maze = build_grid(RowsCount(rows), ColumnsCount(columns)).unwrap();
        let mut rng = StdRng::seed_from_u64(seed);
        carve_maze_with_rng(&mut maze, &mut rng).expect("carving failed");
        maze
    }

    fn gc(row: isize, col: isize) -> Coordinate {
        Coordinate::new(row, col)
    }

    #[test]
    fn single_cell_only_opens_the_exit() {
        let mut maze = build_grid(RowsCount(1), ColumnsCount(1)).unwrap();
        carve_maze(&mut maze).unwrap();
        assert_eq!(maze.cell(gc(0, 0)),
                   Some(&Cell {
                       north: true,
                       east: false,
                       south: true,
                       west: true,
                   }));
        assert_eq!(maze.passages_count(), EdgesCount(0));
    }

    #[test]
    fn two_by_two_is_a_spanning_tree() {
        for seed in 0..20 {
            let maze = carved(2, 2, seed);
            assert_eq!(maze.passages_count(), EdgesCount(3));
            assert_eq!(maze.boundary_openings(), vec![(gc(1, 1), CompassPrimary::East)]);
        }
    }

    #[test]
    fn corridor_has_no_branches() {
        let maze = carved(1, 6, 7);
        assert_eq!(maze.passages_count(), EdgesCount(5));
        for col in 0..5 {
            assert!(maze.is_neighbour_linked(gc(0, col), CompassPrimary::East));
        }

        let maze = carved(6, 1, 7);
        assert_eq!(maze.passages_count(), EdgesCount(5));
        for row in 0..5 {
            assert!(maze.is_neighbour_linked(gc(row, 0), CompassPrimary::South));
        }
    }

    #[test]
    fn same_seed_same_maze() {
        assert_eq!(carved(9, 7, 42), carved(9, 7, 42));
    }

    #[test]
    fn misplaced_goal_is_refused_before_carving() {
        let mut maze = build_grid(RowsCount(4), ColumnsCount(4)).unwrap();
        maze.set_goal(gc(1, 1)).unwrap();
        let untouched = maze.clone();
        match carve_maze(&mut maze) {
            Err(Error(ErrorKind::ExitNotOnBoundary(goal, direction), _)) => {
                assert_eq!(goal, gc(1, 1));
                assert_eq!(direction, CompassPrimary::East);
            }
            other => panic!("expected ExitNotOnBoundary, got {:?}", other),
        }
        assert_eq!(maze, untouched);
    }

    #[test]
    fn exit_in_other_directions() {
        let mut maze = build_grid(RowsCount(5), ColumnsCount(5)).unwrap();
        maze.set_goal(gc(4, 2)).unwrap();
        maze.set_exit_direction(CompassPrimary::South);
        carve_maze(&mut maze).unwrap();
        assert_eq!(maze.boundary_openings(), vec![(gc(4, 2), CompassPrimary::South)]);
    }

    #[test]
    fn frontier_skips_cells_in_maze_and_outside_grid() {
        let maze = build_grid(RowsCount(3), ColumnsCount(3)).unwrap();
        let mut in_maze = utils::cell_index_set(9);
        let _ = in_maze.insert(maze.coordinate_to_index(gc(0, 1)).unwrap());

        let candidates = frontier_candidates(&maze, &in_maze, gc(0, 0));
        assert_eq!(&*candidates,
                   &[WallCandidate {
                         interior: gc(0, 0),
                         exterior: gc(1, 0),
                         direction: CompassPrimary::South,
                     }]);

        let candidates = frontier_candidates(&maze, &in_maze, gc(1, 1));
        let exteriors = candidates.iter().map(|c| c.exterior).collect::<Vec<_>>();
        assert_eq!(exteriors, vec![gc(1, 2), gc(2, 1), gc(1, 0)]);
    }

    #[test]
    fn quickcheck_carved_mazes_are_spanning_trees() {

        fn p(rows: u8, columns: u8, seed: u64) -> bool {
            let (rows, columns) = (rows as usize % 12 + 1, columns as usize % 12 + 1);
            let maze = carved(rows, columns, seed);
            let graph = maze.passage_graph();

            maze.passages_count() == EdgesCount(rows * columns - 1) &&
            connected_components(&graph) == 1 &&
            !is_cyclic_undirected(&graph) &&
            maze.wall_inconsistencies().is_empty() &&
            maze.boundary_openings() == vec![(maze.goal(), CompassPrimary::East)]
        }
        quickcheck(p as fn(u8, u8, u64) -> bool)
    }
}
