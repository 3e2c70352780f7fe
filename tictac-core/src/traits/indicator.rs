//! Status light trait

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Indicator colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Color {
    /// Light off
    #[default]
    Off,
    /// Robot is running / idle between turns
    Green,
    /// Player side
    Orange,
    /// Robot side
    Cyan,
    /// Fault
    Red,
}

/// Trait for the hub status light
pub trait Indicator {
    /// Show a steady color
    fn set_color(&mut self, color: Color);

    /// Blink a color with the given on/off times
    ///
    /// Blinking continues until the next call to either method.
    fn blink(&mut self, color: Color, on_ms: u16, off_ms: u16);
}
