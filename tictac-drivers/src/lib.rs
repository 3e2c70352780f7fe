//! Driver implementations
//!
//! Concrete implementations of the traits defined in tictac-core:
//!
//! - Simulated gantry (axes, delay, human opponent, status light)
//! - GPIO button panel
//! - RGB status LED

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
#[macro_use]
extern crate std;

pub mod indicator;
pub mod input;
pub mod sim;
