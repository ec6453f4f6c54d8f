use std::collections::HashSet;
use std::fmt;
use std::io::{Stdout, Write};

use crossterm::{
    QueueableCommand, cursor, queue,
    style::{self, Color, StyledContent, Stylize},
    terminal::{self, ClearType},
};

use crate::app::Panel;
use crate::grid::{Grid, Point};
use crate::pathfinders::AlgoState;

/// How a cell reads on screen. Every tile renders as exactly
/// `Renderer::CELL_WIDTH` character columns so the panels line up.
enum Tile {
    Cursor,
    Start,
    End,
    Route,
    Processing,
    Wall,
    VisitedBoth,
    VisitedFwd,
    VisitedBwd,
    Terrain,
    Open,
}

impl Tile {
    fn styled(&self) -> StyledContent<&'static str> {
        match self {
            Tile::Cursor => "[]".with(Color::White),
            Tile::Start => " S".with(Color::Green),
            Tile::End => " E".with(Color::Red),
            Tile::Route => " *".with(Color::Yellow),
            Tile::Processing => " @".with(Color::Red),
            Tile::Wall => "##".with(Color::DarkGrey),
            Tile::VisitedBoth => " x".with(Color::Magenta),
            Tile::VisitedFwd => " .".with(Color::Blue),
            Tile::VisitedBwd => " ,".with(Color::Cyan),
            Tile::Terrain => "~~".with(Color::DarkYellow),
            Tile::Open => "  ".with(Color::Reset),
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled = self.styled();

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled.content().width(),
                Renderer::CELL_WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled)
    }
}

pub(crate) struct Renderer;

impl Renderer {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
    /// Blank columns between adjacent panels.
    pub const PANEL_GAP: u16 = 5;
    /// Rows reserved under the grids for the key help and speed lines.
    pub const FOOTER_ROWS: u16 = 2;

    fn tile_for(grid: &Grid, pos: Point, on_route: &HashSet<Point>, cursor_pos: Point) -> Tile {
        if pos == cursor_pos {
            return Tile::Cursor;
        }
        if pos == grid.start() {
            return Tile::Start;
        }
        if pos == grid.end() {
            return Tile::End;
        }
        if on_route.contains(&pos) {
            return Tile::Route;
        }
        if pos == grid.processing() {
            return Tile::Processing;
        }
        let node = &grid[pos];
        if node.is_wall {
            Tile::Wall
        } else if node.visited_fwd && node.visited_bwd {
            Tile::VisitedBoth
        } else if node.visited_fwd {
            Tile::VisitedFwd
        } else if node.visited_bwd {
            Tile::VisitedBwd
        } else if node.weight > 1 {
            Tile::Terrain
        } else {
            Tile::Open
        }
    }

    /// Redraws every panel side by side, plus the footer. The shared edit
    /// cursor is shown on all panels since they mirror one maze.
    pub fn draw(
        stdout: &mut Stdout,
        panels: &[Panel],
        cursor_pos: Point,
        steps_per_frame: u32,
    ) -> std::io::Result<()> {
        queue!(stdout, terminal::Clear(ClearType::All))?;

        let mut x_offset: u16 = 0;
        let mut max_rows: u16 = 0;
        for panel in panels {
            let grid = &panel.grid;
            let pathfinder = &panel.pathfinder;
            let on_route: HashSet<Point> = pathfinder.path().iter().copied().collect();

            let header = match pathfinder.state() {
                AlgoState::Running => pathfinder.name().to_string(),
                AlgoState::PathFound => format!("{} - path found", pathfinder.name()),
                AlgoState::PathNotFound => format!("{} - no path", pathfinder.name()),
            };
            queue!(stdout, cursor::MoveTo(x_offset, 0), style::Print(&header))?;

            for r in 0..grid.rows() {
                stdout.queue(cursor::MoveTo(x_offset, r as u16 + 1))?;
                for c in 0..grid.cols() {
                    let tile = Renderer::tile_for(grid, Point::new(r, c), &on_route, cursor_pos);
                    stdout.queue(style::Print(tile))?;
                }
            }

            max_rows = max_rows.max(grid.rows() as u16);
            x_offset += grid.cols() as u16 * Renderer::CELL_WIDTH + Renderer::PANEL_GAP;
        }

        queue!(
            stdout,
            cursor::MoveTo(0, max_rows + 1),
            style::Print("Move: WASD/arrows | Toggle wall: Space | Speed: +/- | Quit: Q/Esc"),
            cursor::MoveTo(0, max_rows + 2),
            style::Print(format!("Speed: {} steps/frame", steps_per_frame)),
        )?;
        stdout.flush()
    }
}
