mod astar;
mod bfs;
mod bidirectional;

pub use astar::AStarPathfinder;
pub use bfs::BreadthFirstPathfinder;
pub use bidirectional::BidirectionalAStarPathfinder;

use crate::grid::{Grid, Point};

/// Cost of a cardinal move before terrain weighting.
pub(crate) const CARDINAL_COST: u32 = 10;
/// Cost of a diagonal move: sqrt(2) in the same fixed-point scale, keeping
/// the whole cost domain integral.
pub(crate) const DIAGONAL_COST: u32 = 14;

/// The four cardinal offsets. BFS expands exactly these.
pub(crate) const NEIGHBORS_4: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Cardinal offsets first, diagonals after, so an offset's index tells the
/// move cost: below 4 is cardinal, 4 and up is diagonal.
pub(crate) const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, 0),
    (1, 0),
    (0, -1),
    (0, 1),
    (-1, -1),
    (-1, 1),
    (1, -1),
    (1, 1),
];

/// Manhattan distance in the fixed-point cost scale. Exact for 4-connected
/// unit moves; with diagonals costing 14 it can overestimate, a known
/// trade-off the A* variants tolerate (see `AStarPathfinder`).
pub(crate) fn heuristic(a: Point, b: Point) -> u32 {
    ((a.r - b.r).unsigned_abs() + (a.c - b.c).unsigned_abs()) * CARDINAL_COST
}

/// Where a search currently stands. `Running` is re-enterable for as long
/// as the frontier holds cells; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgoState {
    Running,
    PathFound,
    PathNotFound,
}

impl AlgoState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AlgoState::Running)
    }
}

/// A search re-expressed as a resumable state machine.
///
/// `step` performs one frontier pop worth of work and returns, so a driver
/// can interleave several searches, redraw between steps, or stop calling
/// altogether. There is nothing to suspend: the complete resume point is
/// the pathfinder's frontier plus the grid's per-cell fields.
pub trait Pathfinder {
    fn name(&self) -> &'static str;

    /// Starts a fresh run against `grid`, discarding any prior frontier
    /// and clearing every per-cell search field on the grid.
    fn init(&mut self, grid: &mut Grid);

    /// Advances the search by exactly one unit of work (one pop per
    /// direction). Publishes the settled cell through the grid's
    /// processing cursor and clears the cursor on termination. Calling it
    /// again after a terminal state is a no-op returning that same state.
    fn step(&mut self, grid: &mut Grid) -> AlgoState;

    fn state(&self) -> AlgoState;

    /// The start-to-end path, populated once `step` reports `PathFound`
    /// and empty otherwise.
    fn path(&self) -> &[Point];

    /// A changed wall invalidates frontier state in general, so the run is
    /// restarted from scratch rather than repaired incrementally.
    fn on_wall_changed(&mut self, grid: &mut Grid, _pos: Point) {
        self.init(grid);
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::*;
    use super::*;
    use crate::grid::{Grid, Node};

    fn all_variants() -> Vec<Box<dyn Pathfinder>> {
        vec![
            Box::new(BreadthFirstPathfinder::new()),
            Box::new(AStarPathfinder::new(false)),
            Box::new(AStarPathfinder::new(true)),
            Box::new(BidirectionalAStarPathfinder::new()),
        ]
    }

    #[test]
    fn heuristic_is_manhattan_scaled() {
        assert_eq!(heuristic(Point::new(0, 0), Point::new(3, 4)), 70);
        assert_eq!(heuristic(Point::new(5, 5), Point::new(5, 5)), 0);
        assert_eq!(
            heuristic(Point::new(2, 1), Point::new(0, 0)),
            heuristic(Point::new(0, 0), Point::new(2, 1))
        );
    }

    #[test]
    fn walled_pocket_defeats_every_variant() {
        for mut pf in all_variants() {
            let mut grid = Grid::from_layout(&POCKET_LAYOUT).unwrap();
            pf.init(&mut grid);
            assert_eq!(
                run_to_completion(pf.as_mut(), &mut grid),
                AlgoState::PathNotFound,
                "{} should not find a path into the pocket",
                pf.name()
            );
            assert!(pf.path().is_empty(), "{} path should be empty", pf.name());
            assert!(grid.processing().is_none());
        }
    }

    #[test]
    fn wall_edit_restarts_from_clean_state() {
        for mut pf in all_variants() {
            let mut grid = Grid::new(9, 9).unwrap();
            grid.generate_maze(Some(3));
            pf.init(&mut grid);
            for _ in 0..10 {
                pf.step(&mut grid);
            }

            let toggled = Point::new(4, 4);
            grid.toggle_wall(toggled);
            pf.on_wall_changed(&mut grid, toggled);

            assert_eq!(pf.state(), AlgoState::Running);
            assert!(pf.path().is_empty());
            for r in 0..grid.rows() {
                for c in 0..grid.cols() {
                    let p = Point::new(r, c);
                    let node = &grid[p];
                    assert!(!node.visited_bwd, "visited_bwd not cleared at {p}");
                    assert!(node.parent.is_none(), "parent not cleared at {p}");
                    assert!(node.parent_bwd.is_none(), "parent_bwd not cleared at {p}");
                    // Seeding the new run is the only write after the reset
                    // (BFS also re-marks the start visited when enqueuing it).
                    if p != grid.start() {
                        assert!(!node.visited_fwd, "visited_fwd not cleared at {p}");
                        assert_eq!(node.g_score, Node::UNREACHED);
                    }
                    if p != grid.end() {
                        assert_eq!(node.g_score_bwd, Node::UNREACHED);
                    }
                }
            }
        }
    }

    #[test]
    fn every_variant_solves_a_generated_maze() {
        for mut pf in all_variants() {
            let mut grid = Grid::new(11, 15).unwrap();
            grid.generate_maze(Some(42));
            pf.init(&mut grid);
            assert_eq!(
                run_to_completion(pf.as_mut(), &mut grid),
                AlgoState::PathFound,
                "{} failed on a connected maze",
                pf.name()
            );
            let path = pf.path();
            assert_eq!(path.first(), Some(&grid.start()));
            assert_eq!(path.last(), Some(&grid.end()));
            assert!(grid.processing().is_none());
        }
    }
}
