pub mod node;

use rand::{Rng, SeedableRng, rngs::StdRng};
use thiserror::Error;

pub use node::{Node, Point};

/// Layout character marking a weighted terrain cell.
const TERRAIN_MARKER: char = '~';
/// Entry weight applied to terrain cells parsed from a layout.
const TERRAIN_WEIGHT: u32 = 5;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("grid dimensions must be positive, got {rows}x{cols}")]
    InvalidDimensions { rows: i32, cols: i32 },
    #[error("maze layout is empty")]
    EmptyLayout,
    #[error("maze layout has no start marker 'S'")]
    MissingStart,
    #[error("maze layout has no end marker 'E'")]
    MissingEnd,
}

/// Get a random number generator, optionally seeded for reproducibility.
fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Maze topology plus the per-cell state searches write into.
///
/// Holds no algorithm logic. Pathfinders borrow the grid per call; a driver
/// displaying several searches at once gives each its own clone so their
/// cell state never aliases.
#[derive(Clone)]
pub struct Grid {
    rows: i32,
    cols: i32,
    nodes: Vec<Node>,
    start: Point,
    end: Point,
    /// Cell the active search settled most recently. Observational only:
    /// set on every step, cleared to the sentinel on termination.
    processing: Point,
}

impl Grid {
    pub fn new(rows: i32, cols: i32) -> Result<Self, GridError> {
        if rows <= 0 || cols <= 0 {
            return Err(GridError::InvalidDimensions { rows, cols });
        }
        Ok(Grid {
            rows,
            cols,
            nodes: vec![Node::default(); (rows * cols) as usize],
            start: Point::new(0, 0),
            end: Point::new(rows - 1, cols - 1),
            processing: Point::NONE,
        })
    }

    /// Builds a grid from a rectangular character layout: `#` wall, `S`
    /// start, `E` end, `~` weighted terrain, anything else open. Rows
    /// shorter than the widest one are padded with open cells.
    ///
    /// Start and end come out open, but nothing guarantees a path between
    /// them; unreachability is a legitimate outcome the searches report.
    pub fn from_layout(layout: &[&str]) -> Result<Self, GridError> {
        if layout.is_empty() {
            return Err(GridError::EmptyLayout);
        }
        let rows = layout.len() as i32;
        let cols = layout
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0) as i32;
        if cols == 0 {
            return Err(GridError::EmptyLayout);
        }

        let mut grid = Grid::new(rows, cols)?;
        let mut start = None;
        let mut end = None;
        for (r, row) in layout.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let pos = Point::new(r as i32, c as i32);
                match ch {
                    '#' => grid[pos].is_wall = true,
                    'S' => start = Some(pos),
                    'E' => end = Some(pos),
                    TERRAIN_MARKER => grid[pos].weight = TERRAIN_WEIGHT,
                    _ => {}
                }
            }
        }
        grid.start = start.ok_or(GridError::MissingStart)?;
        grid.end = end.ok_or(GridError::MissingEnd)?;
        Ok(grid)
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn start(&self) -> Point {
        self.start
    }

    pub fn end(&self) -> Point {
        self.end
    }

    pub fn processing(&self) -> Point {
        self.processing
    }

    pub fn set_processing(&mut self, pos: Point) {
        self.processing = pos;
    }

    /// True iff (r, c) lies within the grid. Neighbor expansion calls this
    /// before any cell access; it is the sole bounds guard.
    pub fn is_valid(&self, r: i32, c: i32) -> bool {
        r >= 0 && r < self.rows && c >= 0 && c < self.cols
    }

    /// Flips the wall flag at `pos`. The start and end cells are immune so
    /// a search can never be walled out of its own endpoints; toggling them
    /// (or an out-of-bounds cell) is a silent no-op.
    pub fn toggle_wall(&mut self, pos: Point) {
        if !self.is_valid(pos.r, pos.c) || pos == self.start || pos == self.end {
            return;
        }
        let node = &mut self[pos];
        node.is_wall = !node.is_wall;
    }

    /// Clears every per-cell search field and the processing cursor while
    /// leaving walls, weights, start, and end alone. Runs at the top of
    /// every search initialization.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            node.clear_search_state();
        }
        self.processing = Point::NONE;
    }

    /// Regenerates the maze: every cell becomes a wall, then a randomized
    /// depth-first backtracker carves corridors over the odd-coordinate
    /// lattice, then the start (1,1) and end (rows-2, cols-2) are forced
    /// open. The carve is a spanning tree of the lattice, so with odd
    /// dimensions the result is a perfect maze.
    ///
    /// A fresh generator is drawn per call; pass a seed to reproduce a maze.
    /// Grids too small to carve (under 3x3) are left fully open instead.
    pub fn generate_maze(&mut self, seed: Option<u64>) {
        let mut rng = get_rng(seed);
        for node in &mut self.nodes {
            *node = Node {
                is_wall: true,
                ..Node::default()
            };
        }
        self.processing = Point::NONE;

        if self.rows < 3 || self.cols < 3 {
            for node in &mut self.nodes {
                node.is_wall = false;
            }
            self.start = Point::new(0, 0);
            self.end = Point::new(self.rows - 1, self.cols - 1);
            return;
        }

        let origin = Point::new(
            rng.random_range(0..(self.rows - 1) / 2) * 2 + 1,
            rng.random_range(0..(self.cols - 1) / 2) * 2 + 1,
        );
        self.carve(origin, &mut rng);

        self.start = Point::new(1, 1);
        self.end = Point::new(self.rows - 2, self.cols - 2);
        let (start, end) = (self.start, self.end);
        self[start].is_wall = false;
        self[end].is_wall = false;
    }

    /// Depth-first carving with an explicit stack. Each popped cell picks a
    /// random still-walled cell two steps away, opens the door between, and
    /// re-pushes itself so its remaining directions get another look.
    fn carve(&mut self, origin: Point, rng: &mut StdRng) {
        const JUMPS: [(i32, i32); 4] = [(-2, 0), (2, 0), (0, -2), (0, 2)];

        self[origin].is_wall = false;
        let mut stack = vec![origin];
        while let Some(cell) = stack.pop() {
            let candidates = JUMPS
                .iter()
                .copied()
                .filter(|&(dr, dc)| {
                    let (nr, nc) = (cell.r + dr, cell.c + dc);
                    self.is_valid(nr, nc) && self[Point::new(nr, nc)].is_wall
                })
                .collect::<Vec<_>>();
            if candidates.is_empty() {
                continue;
            }

            let (dr, dc) = candidates[rng.random_range(0..candidates.len())];
            let door = Point::new(cell.r + dr / 2, cell.c + dc / 2);
            let next = Point::new(cell.r + dr, cell.c + dc);
            self[door].is_wall = false;
            self[next].is_wall = false;
            stack.push(cell);
            stack.push(next);
        }
    }

    /// Walks parent links into a start-to-end path.
    ///
    /// Single-direction: follow `parent` backward from `end` and reverse.
    /// Bidirectional: the reversed forward chain of `meeting`, then the
    /// `parent_bwd` chain onward to `end`. Returns an empty or partial
    /// sequence when no chain was established; callers are expected to
    /// check for `PathFound` first.
    pub fn reconstruct_path(&self, bidirectional: bool, meeting: Point) -> Vec<Point> {
        let mut path = Vec::new();
        if bidirectional {
            if meeting.is_none() {
                return path;
            }
            let mut curr = meeting;
            while !curr.is_none() {
                path.push(curr);
                curr = self[curr].parent;
            }
            path.reverse();
            let mut curr = self[meeting].parent_bwd;
            while !curr.is_none() {
                path.push(curr);
                curr = self[curr].parent_bwd;
            }
        } else {
            if self.end != self.start && self[self.end].parent.is_none() {
                return path;
            }
            let mut curr = self.end;
            loop {
                path.push(curr);
                if curr == self.start {
                    break;
                }
                curr = self[curr].parent;
                if curr.is_none() {
                    break;
                }
            }
            path.reverse();
        }
        path
    }
}

impl std::ops::Index<Point> for Grid {
    type Output = Node;

    fn index(&self, pos: Point) -> &Self::Output {
        &self.nodes[(pos.r * self.cols + pos.c) as usize]
    }
}

impl std::ops::IndexMut<Point> for Grid {
    fn index_mut(&mut self, pos: Point) -> &mut Self::Output {
        &mut self.nodes[(pos.r * self.cols + pos.c) as usize]
    }
}
