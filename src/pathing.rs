//! Route finding through a maze.
//!
//! The router walks the open passages depth first from the start until it pops the goal, then
//! follows the predecessor map back to the start. On a perfect maze there is exactly one simple
//! path between any two cells, so the first path found is the only one and no proper
//! backtracking (un-visiting cells) is needed. The visited set and predecessor map belong to
//! the search, the maze is only borrowed, so any number of searches can share one maze.

use bit_set::BitSet;
use error_chain::bail;
use log::{debug, trace, warn};
use smallvec::SmallVec;

use crate::cells::{CompassPrimary, Coordinate};
use crate::errors::*;
use crate::grid::Maze;
use crate::units::NodesCount;
use crate::utils::{self, FnvHashMap};

/// Two consecutive route steps that are not next to each other.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct AdjacencyViolation {
    /// Index of the `from` step in the route.
    pub step: usize,
    pub from: Coordinate,
    pub to: Coordinate,
}

/// The path from the maze start to its goal, followed by one step out through the exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    steps: Vec<Coordinate>,
    dead_ends: Vec<Coordinate>,
    adjacency_violations: Vec<AdjacencyViolation>,
}

impl Route {
    /// Every step, start first, ending with the exit step beyond the goal.
    #[inline]
    pub fn steps(&self) -> &[Coordinate] {
        &self.steps
    }

    /// The steps from start to goal inclusive, without the exit step.
    #[inline]
    pub fn goal_path(&self) -> &[Coordinate] {
        &self.steps[..self.steps.len() - 1]
    }

    #[inline]
    pub fn start(&self) -> Coordinate {
        self.steps[0]
    }

    #[inline]
    pub fn goal(&self) -> Coordinate {
        self.steps[self.steps.len() - 2]
    }

    /// The coordinate one step beyond the goal, outside of the maze.
    #[inline]
    pub fn exit_step(&self) -> Coordinate {
        self.steps[self.steps.len() - 1]
    }

    /// Number of steps including the exit step. Never less than 2.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The heading of each move along the route, e.g. for turning a walking figure.
    /// Pairs of steps that are not adjacent have no heading and are left out.
    pub fn moves(&self) -> Vec<CompassPrimary> {
        self.steps
            .windows(2)
            .filter_map(|pair| CompassPrimary::between(pair[0], pair[1]))
            .collect()
    }

    /// Cells the search reached that led nowhere new, in the order they were found.
    #[inline]
    pub fn dead_ends(&self) -> &[Coordinate] {
        &self.dead_ends
    }

    /// Empty unless the predecessor map or the maze walls were inconsistent.
    #[inline]
    pub fn adjacency_violations(&self) -> &[AdjacencyViolation] {
        &self.adjacency_violations
    }
}

/// Find the route from the maze's start to its goal.
///
/// Fails with `NoRouteFound` when the goal is not reachable, which can only happen for a maze
/// that was not carved here, and with `InvalidCoordinate` when the start or goal lies outside
/// of the maze.
pub fn find_route(maze: &Maze) -> Result<Route> {
    let (start, goal) = (maze.start(), maze.goal());
    for coord in &[start, goal] {
        if !maze.is_valid_coordinate(*coord) {
            bail!(ErrorKind::InvalidCoordinate(*coord, maze.rows().0, maze.columns().0));
        }
    }

    let search = depth_first_search(maze, start, goal);
    if !search.goal_reached {
        bail!(ErrorKind::NoRouteFound(start, goal));
    }

    let mut steps = match reconstruct_path(&search.predecessors, start, goal, maze.size()) {
        Some(path) => path,
        None => bail!(ErrorKind::NoRouteFound(start, goal)),
    };
    let adjacency_violations = check_route_adjacency(&steps);

    steps.push(maze.exit_step());

    debug!("Route from {} to {} has {} steps, {} dead ends visited",
           start,
           goal,
           steps.len(),
           search.dead_ends.len());

    Ok(Route {
        steps,
        dead_ends: search.dead_ends,
        adjacency_violations,
    })
}

/// Warn about, and return, each pair of consecutive steps that are not one unit apart.
pub fn check_route_adjacency(steps: &[Coordinate]) -> Vec<AdjacencyViolation> {
    steps.windows(2)
        .enumerate()
        .filter(|&(_, pair)| !pair[0].is_adjacent(pair[1]))
        .map(|(step, pair)| {
            warn!("Non-adjacent cells found between steps {} and {}: {} -> {}",
                  step,
                  step + 1,
                  pair[0],
                  pair[1]);
            AdjacencyViolation {
                step,
                from: pair[0],
                to: pair[1],
            }
        })
        .collect()
}

#[derive(Debug)]
struct DepthFirstSearch {
    goal_reached: bool,
    predecessors: FnvHashMap<Coordinate, Coordinate>,
    dead_ends: Vec<Coordinate>,
}

fn depth_first_search(maze: &Maze, start: Coordinate, goal: Coordinate) -> DepthFirstSearch {
    let NodesCount(cells_count) = maze.size();
    let mut visited: BitSet = utils::cell_index_set(cells_count);
    let mut predecessors = utils::fnv_hashmap(cells_count);
    let mut dead_ends = vec![];

    let mut work_list = vec![start];
    let _ = mark_visited(maze, &mut visited, start);

    while let Some(current) = work_list.pop() {
        trace!("Visiting cell {}", current);

        if current == goal {
            return DepthFirstSearch {
                goal_reached: true,
                predecessors,
                dead_ends,
            };
        }

        let unvisited_links = open_neighbours(maze, current)
            .into_iter()
            .filter(|neighbour| mark_visited(maze, &mut visited, *neighbour))
            .collect::<SmallVec<[Coordinate; 4]>>();

        if unvisited_links.is_empty() {
            trace!("Dead end at {}", current);
            dead_ends.push(current);
        }
        for neighbour in unvisited_links {
            let _ = predecessors.insert(neighbour, current);
            work_list.push(neighbour);
        }
    }

    DepthFirstSearch {
        goal_reached: false,
        predecessors,
        dead_ends,
    }
}

/// In-grid neighbours with no wall in between, as seen from `coord`'s side of the wall.
fn open_neighbours(maze: &Maze, coord: Coordinate) -> SmallVec<[Coordinate; 4]> {
    maze.cell(coord)
        .map(|cell| {
            cell.open_directions()
                .iter()
                .filter_map(|dir| maze.neighbour_at_direction(coord, *dir))
                .collect()
        })
        .unwrap_or_else(SmallVec::new)
}

/// Returns true if the coordinate had not been visited before.
fn mark_visited(maze: &Maze, visited: &mut BitSet, coord: Coordinate) -> bool {
    maze.coordinate_to_index(coord)
        .map_or(false, |index| visited.insert(index))
}

/// Walk back from the goal to the start through the predecessor map and reverse the result.
/// None if the chain breaks off or runs longer than the maze has cells.
fn reconstruct_path(predecessors: &FnvHashMap<Coordinate, Coordinate>,
                    start: Coordinate,
                    goal: Coordinate,
                    cells_count: NodesCount)
                    -> Option<Vec<Coordinate>> {
    let mut path = vec![goal];
    let mut current = goal;

    while current != start {
        if path.len() > cells_count.0 {
            return None;
        }
        current = *predecessors.get(&current)?;
        path.push(current);
    }

    path.reverse();
    Some(path)
}
