//! Motion
//!
//! Board geometry, coordinate mapping and the blocking carriage primitives.

pub mod controller;
pub mod mapper;
pub mod position;

pub use crate::config::PointerTarget;
pub use controller::{Axes, MotionController, MotionError};
pub use mapper::CoordinateMapper;
pub use position::{Axis, Position, BOARD_COLUMNS, BOARD_LINES};
