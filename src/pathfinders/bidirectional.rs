use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{AlgoState, CARDINAL_COST, DIAGONAL_COST, NEIGHBORS_8, Pathfinder, heuristic};
use crate::grid::{Grid, Node, Point};

/// The two halves of the search. All per-cell bookkeeping is selected
/// through this so forward and backward share one advance routine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn opposite(self) -> Direction {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }

    fn visited(self, node: &Node) -> bool {
        match self {
            Direction::Forward => node.visited_fwd,
            Direction::Backward => node.visited_bwd,
        }
    }

    fn set_visited(self, node: &mut Node) {
        match self {
            Direction::Forward => node.visited_fwd = true,
            Direction::Backward => node.visited_bwd = true,
        }
    }

    fn g(self, node: &Node) -> u32 {
        match self {
            Direction::Forward => node.g_score,
            Direction::Backward => node.g_score_bwd,
        }
    }

    fn relax(self, node: &mut Node, g: u32, parent: Point) {
        match self {
            Direction::Forward => {
                node.g_score = g;
                node.parent = parent;
            }
            Direction::Backward => {
                node.g_score_bwd = g;
                node.parent_bwd = parent;
            }
        }
    }
}

/// Two simultaneous priority-ordered searches, one from each endpoint,
/// with the same 8-connected cost model as `AStarPathfinder`. Every
/// `step` advances both directions by one pop.
///
/// A cell settled by both directions is a candidate meeting point whose
/// combined g-scores bound the total path cost. The search does not stop
/// at the first meeting (that is suboptimal in general); it keeps going
/// until the sum of the two frontiers' minimum keys can no longer beat
/// the best candidate, then reconstructs through that meeting cell.
pub struct BidirectionalAStarPathfinder {
    frontier_fwd: BinaryHeap<Reverse<(u32, Point)>>,
    frontier_bwd: BinaryHeap<Reverse<(u32, Point)>>,
    start: Point,
    end: Point,
    meeting: Point,
    best_cost: u32,
    path: Vec<Point>,
    state: AlgoState,
}

impl BidirectionalAStarPathfinder {
    pub fn new() -> Self {
        BidirectionalAStarPathfinder {
            frontier_fwd: BinaryHeap::new(),
            frontier_bwd: BinaryHeap::new(),
            start: Point::NONE,
            end: Point::NONE,
            meeting: Point::NONE,
            best_cost: Node::UNREACHED,
            path: Vec::new(),
            state: AlgoState::Running,
        }
    }

    fn conclude_found(&mut self, grid: &mut Grid) -> AlgoState {
        self.path = grid.reconstruct_path(true, self.meeting);
        grid.set_processing(Point::NONE);
        AlgoState::PathFound
    }

    /// One frontier pop for one direction: settle, record a meeting if the
    /// other direction already settled this cell, test the stopping rule,
    /// then relax the neighborhood.
    fn advance(&mut self, grid: &mut Grid, dir: Direction) -> AlgoState {
        let popped = match dir {
            Direction::Forward => self.frontier_fwd.pop(),
            Direction::Backward => self.frontier_bwd.pop(),
        };
        let Some(Reverse((_, current))) = popped else {
            // This half has nothing left to explore. Any recorded meeting
            // is now unbeatable, since a cheaper connection would need an
            // entry from the exhausted frontier.
            if self.best_cost < Node::UNREACHED {
                return self.conclude_found(grid);
            }
            grid.set_processing(Point::NONE);
            return AlgoState::PathNotFound;
        };

        if dir.visited(&grid[current]) {
            // Stale frontier entry for a settled cell.
            return AlgoState::Running;
        }
        dir.set_visited(&mut grid[current]);
        grid.set_processing(current);

        if dir.opposite().visited(&grid[current]) {
            let node = &grid[current];
            let total = node.g_score.saturating_add(node.g_score_bwd);
            if total < self.best_cost {
                self.best_cost = total;
                self.meeting = current;
            }
        }

        // Stopping rule: no pair of undiscovered cells can combine into
        // anything cheaper once the two minimum keys already sum past the
        // best candidate.
        if self.best_cost < Node::UNREACHED {
            if let (Some(Reverse((f_fwd, _))), Some(Reverse((f_bwd, _)))) =
                (self.frontier_fwd.peek(), self.frontier_bwd.peek())
            {
                if f_fwd.saturating_add(*f_bwd) >= self.best_cost {
                    return self.conclude_found(grid);
                }
            }
        }

        let current_g = dir.g(&grid[current]);
        let goal = match dir {
            Direction::Forward => self.end,
            Direction::Backward => self.start,
        };
        for (i, (dr, dc)) in NEIGHBORS_8.iter().enumerate() {
            let (nr, nc) = (current.r + dr, current.c + dc);
            if !grid.is_valid(nr, nc) {
                continue;
            }
            let neighbor = Point::new(nr, nc);
            if grid[neighbor].is_wall {
                continue;
            }
            let base = if i < 4 { CARDINAL_COST } else { DIAGONAL_COST };
            let tentative = current_g + base * grid[neighbor].weight;
            if tentative < dir.g(&grid[neighbor]) {
                dir.relax(&mut grid[neighbor], tentative, current);
                let entry = Reverse((tentative + heuristic(neighbor, goal), neighbor));
                match dir {
                    Direction::Forward => self.frontier_fwd.push(entry),
                    Direction::Backward => self.frontier_bwd.push(entry),
                }
            }
        }
        AlgoState::Running
    }
}

impl Default for BidirectionalAStarPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder for BidirectionalAStarPathfinder {
    fn name(&self) -> &'static str {
        "Bidirectional A*"
    }

    fn init(&mut self, grid: &mut Grid) {
        grid.reset();
        self.start = grid.start();
        self.end = grid.end();
        self.frontier_fwd.clear();
        self.frontier_bwd.clear();
        self.path.clear();
        self.meeting = Point::NONE;
        self.best_cost = Node::UNREACHED;
        self.state = AlgoState::Running;

        let (start, end) = (self.start, self.end);
        grid[start].g_score = 0;
        self.frontier_fwd.push(Reverse((heuristic(start, end), start)));
        grid[end].g_score_bwd = 0;
        self.frontier_bwd.push(Reverse((heuristic(end, start), end)));
    }

    fn step(&mut self, grid: &mut Grid) -> AlgoState {
        if self.state.is_terminal() {
            return self.state;
        }
        // Both directions make progress on every call, not alternating.
        for dir in [Direction::Forward, Direction::Backward] {
            let state = self.advance(grid, dir);
            if state.is_terminal() {
                self.state = state;
                return state;
            }
        }
        AlgoState::Running
    }

    fn state(&self) -> AlgoState {
        self.state
    }

    fn path(&self) -> &[Point] {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pathfinders::AStarPathfinder;
    use crate::pathfinders::testutil::{path_cost, run_to_completion};

    #[test]
    fn matches_unidirectional_astar_on_random_mazes() {
        for seed in 0..20u64 {
            let base = {
                let mut g = Grid::new(13, 17).unwrap();
                g.generate_maze(Some(seed));
                g
            };

            let mut uni_grid = base.clone();
            let mut uni = AStarPathfinder::new(true);
            uni.init(&mut uni_grid);
            assert_eq!(
                run_to_completion(&mut uni, &mut uni_grid),
                AlgoState::PathFound,
                "seed {seed}"
            );

            let mut bi_grid = base.clone();
            let mut bi = BidirectionalAStarPathfinder::new();
            bi.init(&mut bi_grid);
            assert_eq!(
                run_to_completion(&mut bi, &mut bi_grid),
                AlgoState::PathFound,
                "seed {seed}"
            );

            assert_eq!(
                path_cost(&bi_grid, bi.path()),
                path_cost(&uni_grid, uni.path()),
                "seed {seed}"
            );
        }
    }

    #[test]
    fn path_runs_start_to_end_through_the_meeting() {
        let mut grid = Grid::new(11, 11).unwrap();
        grid.generate_maze(Some(5));
        let mut pf = BidirectionalAStarPathfinder::new();
        pf.init(&mut grid);
        assert_eq!(run_to_completion(&mut pf, &mut grid), AlgoState::PathFound);

        let path = pf.path();
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.end()));
        // Every hop is a legal move onto an open cell.
        for pair in path.windows(2) {
            let (dr, dc) = ((pair[1].r - pair[0].r).abs(), (pair[1].c - pair[0].c).abs());
            assert!(dr <= 1 && dc <= 1);
            assert!(!grid[pair[1]].is_wall);
        }
    }

    #[test]
    fn both_directions_advance_each_step() {
        let mut grid = Grid::from_layout(&[
            "S      ", //
            "       ", //
            "      E",
        ])
        .unwrap();
        let mut pf = BidirectionalAStarPathfinder::new();
        pf.init(&mut grid);
        pf.step(&mut grid);
        // After one step both endpoints are settled, one per direction.
        assert!(grid[grid.start()].visited_fwd);
        assert!(grid[grid.end()].visited_bwd);
    }

    #[test]
    fn reports_not_found_when_a_frontier_dies() {
        let mut grid = Grid::from_layout(&[
            "S #  ", //
            "### E",
        ])
        .unwrap();
        let mut pf = BidirectionalAStarPathfinder::new();
        pf.init(&mut grid);
        assert_eq!(
            run_to_completion(&mut pf, &mut grid),
            AlgoState::PathNotFound
        );
        assert!(pf.path().is_empty());
        assert_eq!(pf.step(&mut grid), AlgoState::PathNotFound);
    }
}
