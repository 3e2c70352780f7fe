//! Brick sensing
//!
//! The robot has no presence sensors. It finds bricks by lowering the
//! magnet until the Z motor stalls and comparing the stall height against
//! the depth where a brick top sits.

pub mod probe;

pub use probe::{BrickSensor, StallReading};
