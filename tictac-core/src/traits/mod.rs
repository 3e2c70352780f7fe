//! Hardware abstraction traits
//!
//! These traits define the interface between the application logic
//! and hardware-specific implementations.

pub mod axis;
pub mod indicator;
pub mod input;
pub mod random;

pub use axis::{AxisActuator, AxisError, Direction, StopMode};
pub use indicator::{Color, Indicator};
pub use input::InputPanel;
pub use random::{RandomSource, RngSource};
