pub mod app;
pub mod grid;
pub mod pathfinders;
