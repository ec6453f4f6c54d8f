use std::fmt;

/// A cell coordinate as (row, column).
///
/// The derived `Ord` is row-major, which doubles as the deterministic
/// tie-break key when coordinates sit inside ordered frontiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Point {
    pub r: i32,
    pub c: i32,
}

impl Point {
    /// Sentinel meaning "no cell": an absent parent link or a cleared
    /// processing cursor.
    pub const NONE: Point = Point { r: -1, c: -1 };

    pub const fn new(r: i32, c: i32) -> Self {
        Point { r, c }
    }

    pub fn is_none(&self) -> bool {
        *self == Point::NONE
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.r, self.c)
    }
}

/// Per-cell state: the fixed topology (wall flag, terrain weight) plus the
/// mutable bookkeeping every search run writes into.
///
/// The `_bwd` fields mirror the forward ones for the backward half of a
/// bidirectional run; single-direction searches leave them untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Impassable when true.
    pub is_wall: bool,
    /// Traversal cost multiplier for entering this cell. Always >= 1.
    pub weight: u32,
    /// Cumulative cost from the start. `UNREACHED` until relaxed, and only
    /// ever decreases within one run.
    pub g_score: u32,
    pub parent: Point,
    pub g_score_bwd: u32,
    pub parent_bwd: Point,
    /// Settled flags, one per search direction. Once set, the matching
    /// g-score is final for the rest of the run.
    pub visited_fwd: bool,
    pub visited_bwd: bool,
}

impl Node {
    /// Cost value standing in for infinity.
    pub const UNREACHED: u32 = u32::MAX;

    pub(crate) fn clear_search_state(&mut self) {
        self.g_score = Node::UNREACHED;
        self.parent = Point::NONE;
        self.g_score_bwd = Node::UNREACHED;
        self.parent_bwd = Point::NONE;
        self.visited_fwd = false;
        self.visited_bwd = false;
    }
}

impl Default for Node {
    fn default() -> Self {
        Node {
            is_wall: false,
            weight: 1,
            g_score: Node::UNREACHED,
            parent: Point::NONE,
            g_score_bwd: Node::UNREACHED,
            parent_bwd: Point::NONE,
            visited_fwd: false,
            visited_bwd: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_order_is_row_major() {
        assert!(Point::new(0, 9) < Point::new(1, 0));
        assert!(Point::new(2, 3) < Point::new(2, 4));
        assert_eq!(Point::new(5, 5), Point::new(5, 5));
    }

    #[test]
    fn clear_search_state_keeps_topology() {
        let mut node = Node {
            is_wall: true,
            weight: 5,
            g_score: 42,
            parent: Point::new(1, 1),
            g_score_bwd: 17,
            parent_bwd: Point::new(2, 2),
            visited_fwd: true,
            visited_bwd: true,
        };
        node.clear_search_state();
        assert!(node.is_wall);
        assert_eq!(node.weight, 5);
        assert_eq!(node.g_score, Node::UNREACHED);
        assert!(node.parent.is_none());
        assert_eq!(node.g_score_bwd, Node::UNREACHED);
        assert!(node.parent_bwd.is_none());
        assert!(!node.visited_fwd);
        assert!(!node.visited_bwd);
    }
}
