mod renderer;

use std::io::{Stdout, Write};
use std::time::Duration;

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode, KeyEventKind},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::grid::Grid;
use crate::pathfinders::{
    AStarPathfinder, AlgoState, BidirectionalAStarPathfinder, BreadthFirstPathfinder, Pathfinder,
};
use renderer::Renderer;

/// One algorithm racing on its own copy of the maze. Every panel owns a
/// private grid so concurrently-stepping searches never alias each
/// other's per-cell state; wall edits are applied to each copy in turn.
pub struct Panel {
    pub grid: Grid,
    pub pathfinder: Box<dyn Pathfinder>,
}

pub struct App {
    /// Pause between frames of the driver loop.
    frame_duration: Duration,
    /// How many `step` calls each running search gets per frame.
    initial_steps_per_frame: u32,
}

impl Default for App {
    fn default() -> Self {
        Self {
            frame_duration: Duration::from_millis(30),
            initial_steps_per_frame: 2,
        }
    }
}

impl App {
    /// Set a panic hook to restore terminal state on panic
    /// This ensures that the terminal is not left in raw mode or alternate screen on panic
    fn set_panic_hook() {
        let hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = App::restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
            hook(panic_info);
        }));
    }

    /// Setup terminal in raw mode and enter alternate screen
    /// Also sets a panic hook to restore terminal on panic
    pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        terminal::enable_raw_mode()?;
        App::set_panic_hook();
        queue!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide,
            cursor::MoveTo(0, 0)
        )?;
        stdout.flush()?;
        Ok(())
    }

    /// Restore terminal to original state
    /// Leave alternate screen and disable raw mode
    pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
        queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
        stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    /// Builds the shared maze, one panel per algorithm, and runs the
    /// poll-edit-step-draw loop until the user quits.
    pub fn run(&self, stdout: &mut Stdout, rows: i32, cols: i32) -> std::io::Result<()> {
        let mut grid = Grid::new(rows, cols)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string()))?;
        grid.generate_maze(None);
        tracing::info!("generated {}x{} maze", rows, cols);

        let pathfinders: Vec<Box<dyn Pathfinder>> = vec![
            Box::new(AStarPathfinder::new(true)),
            Box::new(AStarPathfinder::new(false)),
            Box::new(BidirectionalAStarPathfinder::new()),
            Box::new(BreadthFirstPathfinder::new()),
        ];
        let mut panels: Vec<Panel> = pathfinders
            .into_iter()
            .map(|pathfinder| Panel {
                grid: grid.clone(),
                pathfinder,
            })
            .collect();
        for panel in &mut panels {
            panel.pathfinder.init(&mut panel.grid);
        }

        if !App::check_terminal_size(stdout, &panels, rows)? {
            return Ok(());
        }

        let mut cursor_pos = grid.start();
        let mut steps_per_frame = self.initial_steps_per_frame;
        loop {
            // Drain pending input before doing any work this frame.
            while event::poll(Duration::ZERO)? {
                let event::Event::Key(key) = event::read()? else {
                    continue;
                };
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => {
                        tracing::info!("quit requested");
                        return Ok(());
                    }
                    KeyCode::Char('w') | KeyCode::Up => {
                        cursor_pos.r = (cursor_pos.r - 1).max(0);
                    }
                    KeyCode::Char('s') | KeyCode::Down => {
                        cursor_pos.r = (cursor_pos.r + 1).min(rows - 1);
                    }
                    KeyCode::Char('a') | KeyCode::Left => {
                        cursor_pos.c = (cursor_pos.c - 1).max(0);
                    }
                    KeyCode::Char('d') | KeyCode::Right => {
                        cursor_pos.c = (cursor_pos.c + 1).min(cols - 1);
                    }
                    KeyCode::Char(' ') => {
                        tracing::info!("toggling wall at {}", cursor_pos);
                        for panel in &mut panels {
                            panel.grid.toggle_wall(cursor_pos);
                            panel.pathfinder.on_wall_changed(&mut panel.grid, cursor_pos);
                        }
                    }
                    KeyCode::Char('+') => steps_per_frame = steps_per_frame.saturating_add(1),
                    KeyCode::Char('-') => steps_per_frame = steps_per_frame.max(2) - 1,
                    _ => {}
                }
            }

            for _ in 0..steps_per_frame {
                for panel in &mut panels {
                    if panel.pathfinder.state() == AlgoState::Running {
                        let state = panel.pathfinder.step(&mut panel.grid);
                        if state.is_terminal() {
                            tracing::debug!(
                                "{} finished with {:?}",
                                panel.pathfinder.name(),
                                state
                            );
                        }
                    }
                }
            }

            Renderer::draw(stdout, &panels, cursor_pos, steps_per_frame)?;
            std::thread::sleep(self.frame_duration);
        }
    }

    /// Check the terminal against the combined panel footprint. If it is
    /// too small, display a message, wait for Esc, and return Ok(false).
    fn check_terminal_size(
        stdout: &mut Stdout,
        panels: &[Panel],
        rows: i32,
    ) -> std::io::Result<bool> {
        let needed_width = panels.len() as u16
            * (panels[0].grid.cols() as u16 * Renderer::CELL_WIDTH + Renderer::PANEL_GAP);
        let needed_height = rows as u16 + Renderer::FOOTER_ROWS + 1;
        let (term_width, term_height) = terminal::size()?;
        if term_width < needed_width || term_height < needed_height {
            let msg = format!(
                "Terminal size ({}x{}) is too small to display {} panels ({}x{} needed). Please resize and restart.\r\n",
                term_width,
                term_height,
                panels.len(),
                needed_width,
                needed_height
            );
            stdout.execute(style::PrintStyledContent(
                msg.with(Color::Yellow).attribute(Attribute::Bold),
            ))?;
            stdout.execute(style::PrintStyledContent(
                "Press Esc to exit...\r\n"
                    .with(Color::Blue)
                    .attribute(Attribute::Bold),
            ))?;
            App::wait_for_esc()?;
            return Ok(false);
        }
        Ok(true)
    }

    /// Wait for the user to press the Esc key
    /// This function blocks until Esc is pressed
    fn wait_for_esc() -> std::io::Result<()> {
        loop {
            if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
                if code == KeyCode::Esc && kind == KeyEventKind::Press {
                    break;
                }
            }
        }
        Ok(())
    }
}
