//! Configuration types
//!
//! Board-agnostic configuration structures, optionally deserialized from
//! TOML on the host (`serde` feature).

pub mod calibration;
pub mod types;

pub use calibration::*;
pub use types::*;
