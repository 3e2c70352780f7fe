//! Recording status light

use tictac_core::traits::{Color, Indicator};

/// Status light that remembers what it showed
#[derive(Debug, Clone, Default)]
pub struct SimIndicator {
    color: Color,
    blinking: bool,
    shown_fault: bool,
}

impl SimIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_blinking(&self) -> bool {
        self.blinking
    }

    /// Red was shown at some point
    pub fn shown_fault(&self) -> bool {
        self.shown_fault
    }

    fn show(&mut self, color: Color, blinking: bool) {
        self.color = color;
        self.blinking = blinking;
        self.shown_fault |= color == Color::Red;
    }
}

impl Indicator for SimIndicator {
    fn set_color(&mut self, color: Color) {
        self.show(color, false);
    }

    fn blink(&mut self, color: Color, _on_ms: u16, _off_ms: u16) {
        self.show(color, true);
    }
}
