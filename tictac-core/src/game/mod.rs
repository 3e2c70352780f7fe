//! Game logic
//!
//! Grid bookkeeping, the phase machine and the engine that drives the
//! robot through a session.

pub mod engine;
pub mod error;
pub mod events;
pub mod grid;
pub mod machine;
pub mod state;

pub use engine::{GameEngine, GameReport};
pub use error::GameError;
pub use events::Event;
pub use grid::{victory, Cell, CellOccupied, Grid, GridCell, Side, GRID_CELLS, GRID_SIZE};
pub use machine::{ErrorKind, Phase};
pub use state::{choose_robot_cell, decide_starter, GameState, Move, MoveLog, Outcome};
