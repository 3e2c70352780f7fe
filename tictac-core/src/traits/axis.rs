//! Axis actuator trait
//!
//! One implementation per independently driven degree of freedom
//! (horizontal X, horizontal Y, vertical Z, indicator pointer). The robot
//! has no absolute position sensors: every axis is referenced by running it
//! into a mechanical limit until it stalls.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Direction of a stall run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Direction {
    /// Toward increasing positions
    Positive,
    /// Toward decreasing positions
    Negative,
}

/// What the motor does once it reaches its target or stalls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopMode {
    /// Let the motor spin freely
    Coast,
    /// Coast, but remember the target so the next relative move is exact
    CoastSmart,
    /// Actively hold the position
    Hold,
}

/// Errors that can occur with axis operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisError {
    /// The axis stalled while positioning (not during a stall run)
    Stalled,
    /// The axis did not report completion in time
    Timeout,
    /// Communication error with the motor driver
    CommunicationError,
    /// Invalid speed or duty limit
    InvalidCommand,
}

/// Trait for a single position-controlled axis
///
/// Positions and speeds are in the motor's native units (degrees of
/// rotation for the gantry motors). The sign convention is fixed by
/// homing: the reference zero sits at the negative mechanical limit.
pub trait AxisActuator {
    /// Move to an absolute target
    ///
    /// When `blocking` is false the call returns as soon as the move is
    /// commanded; completion is then observed through
    /// [`is_motion_complete`](Self::is_motion_complete).
    fn move_absolute(
        &mut self,
        target: i32,
        speed: u16,
        stop: StopMode,
        blocking: bool,
    ) -> Result<(), AxisError>;

    /// Drive until the axis stalls against an obstruction
    ///
    /// The motor output is limited to `duty_limit` percent so the stall
    /// happens gently. Returns the position at which the axis stopped.
    fn run_until_stalled(
        &mut self,
        direction: Direction,
        speed: u16,
        stop: StopMode,
        duty_limit: u8,
    ) -> Result<i32, AxisError>;

    /// Redefine the current position as `value`
    fn reset_reference_zero(&mut self, value: i32);

    /// Check if the last commanded move has finished
    fn is_motion_complete(&self) -> bool;

    /// Get the current position
    fn position(&self) -> i32;
}
