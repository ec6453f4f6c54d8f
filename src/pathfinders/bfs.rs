use std::collections::VecDeque;

use super::{AlgoState, NEIGHBORS_4, Pathfinder};
use crate::grid::{Grid, Point};

/// Unweighted shortest path by hop count over the 4-connected
/// neighborhood. Cells are marked visited when enqueued, so each enters
/// the FIFO frontier at most once and terrain weights are ignored by
/// design (every hop costs one).
pub struct BreadthFirstPathfinder {
    frontier: VecDeque<Point>,
    start: Point,
    end: Point,
    path: Vec<Point>,
    state: AlgoState,
}

impl BreadthFirstPathfinder {
    pub fn new() -> Self {
        BreadthFirstPathfinder {
            frontier: VecDeque::new(),
            start: Point::NONE,
            end: Point::NONE,
            path: Vec::new(),
            state: AlgoState::Running,
        }
    }
}

impl Default for BreadthFirstPathfinder {
    fn default() -> Self {
        Self::new()
    }
}

impl Pathfinder for BreadthFirstPathfinder {
    fn name(&self) -> &'static str {
        "Breadth-First Search"
    }

    fn init(&mut self, grid: &mut Grid) {
        grid.reset();
        self.start = grid.start();
        self.end = grid.end();
        self.frontier.clear();
        self.path.clear();
        self.state = AlgoState::Running;

        let start = self.start;
        grid[start].g_score = 0;
        grid[start].visited_fwd = true;
        self.frontier.push_back(start);
    }

    fn step(&mut self, grid: &mut Grid) -> AlgoState {
        if self.state.is_terminal() {
            return self.state;
        }

        let Some(current) = self.frontier.pop_front() else {
            grid.set_processing(Point::NONE);
            self.state = AlgoState::PathNotFound;
            return self.state;
        };
        grid.set_processing(current);

        if current == self.end {
            self.path = grid.reconstruct_path(false, Point::NONE);
            grid.set_processing(Point::NONE);
            self.state = AlgoState::PathFound;
            return self.state;
        }

        let next_hop = grid[current].g_score + 1;
        for (dr, dc) in NEIGHBORS_4 {
            let (nr, nc) = (current.r + dr, current.c + dc);
            if !grid.is_valid(nr, nc) {
                continue;
            }
            let neighbor = Point::new(nr, nc);
            let node = &mut grid[neighbor];
            if node.is_wall || node.visited_fwd {
                continue;
            }
            node.visited_fwd = true;
            node.parent = current;
            node.g_score = next_hop;
            self.frontier.push_back(neighbor);
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
