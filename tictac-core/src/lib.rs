//! Board-agnostic core logic for the tic-tac-toe gantry robot
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (axis actuator, indicator, input, randomness)
//! - Coordinate mapping from board positions to axis targets
//! - Multi-axis motion primitives (move, pick, drop, homing)
//! - Stall-based brick sensing
//! - Storage lane bookkeeping
//! - The game engine and its phase state machine
//! - Configuration type definitions

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

#[macro_use]
mod fmt;

pub mod config;
pub mod game;
pub mod motion;
pub mod sensing;
pub mod storage;
pub mod traits;

#[cfg(test)]
mod testing;
