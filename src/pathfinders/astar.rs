use std::cmp::Reverse;
use std::collections::BinaryHeap;

use super::{AlgoState, CARDINAL_COST, DIAGONAL_COST, NEIGHBORS_8, Pathfinder, heuristic};
use crate::grid::{Grid, Point};

/// Priority-ordered search over the 8-connected neighborhood: cardinal
/// moves cost 10, diagonals 14, both multiplied by the entered cell's
/// terrain weight. With the heuristic disabled this is plain Dijkstra;
/// enabled, the Manhattan estimate toward the end is added to the key.
///
/// Frontier entries are `(f, coordinate)` so equal keys break ties in
/// row-major coordinate order, keeping expansion deterministic. Stale
/// entries for already-settled cells are discarded at pop time rather
/// than removed from the heap (lazy deletion).
///
/// The Manhattan estimate is not strictly admissible once diagonals cost
/// 14, so heuristic mode can occasionally trade a sliver of optimality
/// for speed on diagonal-heavy layouts. Dijkstra mode stays exact.
pub struct AStarPathfinder {
    use_heuristic: bool,
    frontier: BinaryHeap<Reverse<(u32, Point)>>,
    start: Point,
    end: Point,
    path: Vec<Point>,
    state: AlgoState,
}

impl AStarPathfinder {
    /// `use_heuristic` false selects Dijkstra mode (h = 0 everywhere).
    pub fn new(use_heuristic: bool) -> Self {
        AStarPathfinder {
            use_heuristic,
            frontier: BinaryHeap::new(),
            start: Point::NONE,
            end: Point::NONE,
            path: Vec::new(),
            state: AlgoState::Running,
        }
    }

    fn h(&self, from: Point) -> u32 {
        if self.use_heuristic {
            heuristic(from, self.end)
        } else {
            0
        }
    }
}

impl Pathfinder for AStarPathfinder {
    fn name(&self) -> &'static str {
        if self.use_heuristic {
            "A* Search"
        } else {
            "Dijkstra"
        }
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
        self.frontier.push(Reverse((self.h(start), start)));
    }

    fn step(&mut self, grid: &mut Grid) -> AlgoState {
        if self.state.is_terminal() {
            return self.state;
        }

        let Some(Reverse((_, current))) = self.frontier.pop() else {
            grid.set_processing(Point::NONE);
            self.state = AlgoState::PathNotFound;
            return self.state;
        };
        if grid[current].visited_fwd {
            // Stale frontier entry for a settled cell.
            return AlgoState::Running;
        }
        grid[current].visited_fwd = true;
        grid.set_processing(current);

        if current == self.end {
            self.path = grid.reconstruct_path(false, Point::NONE);
            grid.set_processing(Point::NONE);
            self.state = AlgoState::PathFound;
            return self.state;
        }

        let current_g = grid[current].g_score;
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
            if tentative < grid[neighbor].g_score {
                let f = tentative + self.h(neighbor);
                let node = &mut grid[neighbor];
                node.parent = current;
                node.g_score = tentative;
                self.frontier.push(Reverse((f, neighbor)));
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
    use crate::grid::Node;
    use crate::pathfinders::testutil::{brute_force_costs, path_cost, run_to_completion};

    const WEIGHTED_5X5: [&str; 5] = [
        "S~   ", //
        " ~ ~ ", //
        " ~ ~ ", //
        " ~ ~ ", //
        "  ~ E",
    ];

    #[test]
    fn dijkstra_matches_exhaustive_costs() {
        let layouts: [&[&str]; 3] = [
            &WEIGHTED_5X5,
            &[
                "S ~~~", //
                "#### ", //
                "E    ",
            ],
            &[
                "S    ", //
                " ### ", //
                " #E# ", //
                " # # ", //
                "     ",
            ],
        ];
        for layout in layouts {
            let mut grid = Grid::from_layout(layout).unwrap();
            let mut pf = AStarPathfinder::new(false);
            pf.init(&mut grid);
            assert_eq!(run_to_completion(&mut pf, &mut grid), AlgoState::PathFound);

            let optimal = brute_force_costs(&grid, grid.start())[&grid.end()];
            assert_eq!(grid[grid.end()].g_score, optimal);
            assert_eq!(path_cost(&grid, pf.path()), optimal);
        }
    }

    #[test]
    fn astar_is_optimal_on_open_grid() {
        // Corner to corner on an open 5x5: four diagonals, 4 * 14 = 56.
        let mut grid = Grid::from_layout(&[
            "S    ", //
            "     ", //
            "     ", //
            "     ", //
            "    E",
        ])
        .unwrap();
        let mut pf = AStarPathfinder::new(true);
        pf.init(&mut grid);
        assert_eq!(run_to_completion(&mut pf, &mut grid), AlgoState::PathFound);
        assert_eq!(path_cost(&grid, pf.path()), 56);
        assert_eq!(
            brute_force_costs(&grid, grid.start())[&grid.end()],
            56
        );
    }

    #[test]
    fn dijkstra_is_exact_on_generated_mazes() {
        for seed in 0..10u64 {
            let mut grid = Grid::new(13, 17).unwrap();
            grid.generate_maze(Some(seed));
            let mut pf = AStarPathfinder::new(false);
            pf.init(&mut grid);
            assert_eq!(run_to_completion(&mut pf, &mut grid), AlgoState::PathFound);

            let optimal = brute_force_costs(&grid, grid.start())[&grid.end()];
            assert_eq!(grid[grid.end()].g_score, optimal, "seed {seed}");
            assert_eq!(path_cost(&grid, pf.path()), optimal, "seed {seed}");
        }
    }

    #[test]
    fn weights_multiply_move_cost() {
        // Entering the terrain cell costs 10 * 5; the detour below is
        // cheaper despite more hops.
        let mut grid = Grid::from_layout(&[
            "S~E", //
            "   ",
        ])
        .unwrap();
        let mut pf = AStarPathfinder::new(false);
        pf.init(&mut grid);
        assert_eq!(run_to_completion(&mut pf, &mut grid), AlgoState::PathFound);
        // Diagonal down, diagonal up: 14 + 14 = 28 beats 10*5 + 10 = 60.
        assert_eq!(grid[grid.end()].g_score, 28);
    }

    #[test]
    fn terminal_state_is_idempotent() {
        for use_heuristic in [false, true] {
            let mut grid = Grid::from_layout(&WEIGHTED_5X5).unwrap();
            let mut pf = AStarPathfinder::new(use_heuristic);
            pf.init(&mut grid);
            let state = run_to_completion(&mut pf, &mut grid);
            assert_eq!(state, AlgoState::PathFound);

            let snapshot: Vec<Node> = (0..grid.rows())
                .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
                .map(|p| grid[p].clone())
                .collect();
            let path_before = pf.path().to_vec();

            for _ in 0..3 {
                assert_eq!(pf.step(&mut grid), state);
            }

            let after: Vec<Node> = (0..grid.rows())
                .flat_map(|r| (0..grid.cols()).map(move |c| Point::new(r, c)))
                .map(|p| grid[p].clone())
                .collect();
            assert_eq!(snapshot, after);
            assert_eq!(path_before, pf.path());
            assert!(grid.processing().is_none());
        }
    }
}
