//! GPIO button panel
//!
//! A play button and a stop button on GPIO inputs. The play button is
//! debounced and reports each press once; the stop button only counts
//! while the abort input is enabled.

use embedded_hal::digital::InputPin;
use tictac_core::traits::InputPanel;

/// Default number of consecutive active samples for a press
const DEFAULT_DEBOUNCE: u8 = 3;

/// Play and stop buttons on two GPIO inputs
pub struct GpioPanel<P, S> {
    play: P,
    stop: S,
    /// Buttons pull the pin low when pressed
    active_low: bool,
    debounce: u8,
    /// Consecutive active samples of the play button
    stable: u8,
    abort_enabled: bool,
}

impl<P: InputPin, S: InputPin> GpioPanel<P, S> {
    /// Create a panel with buttons to ground (pull-ups enabled)
    pub fn new(play: P, stop: S) -> Self {
        Self {
            play,
            stop,
            active_low: true,
            debounce: DEFAULT_DEBOUNCE,
            stable: 0,
            abort_enabled: true,
        }
    }

    /// Buttons drive the pin high when pressed
    pub fn active_high(mut self) -> Self {
        self.active_low = false;
        self
    }

    /// Consecutive samples needed to accept a press (at least 1)
    pub fn with_debounce(mut self, samples: u8) -> Self {
        self.debounce = samples.max(1);
        self
    }

    pub fn abort_enabled(&self) -> bool {
        self.abort_enabled
    }

    /// Check the stop button
    ///
    /// Always false while the abort input is disabled.
    pub fn abort_requested(&mut self) -> bool {
        let active_low = self.active_low;
        self.abort_enabled && is_active(&mut self.stop, active_low)
    }
}

/// Read a pin; a failed read counts as released
fn is_active<P: InputPin>(pin: &mut P, active_low: bool) -> bool {
    let level = if active_low { pin.is_low() } else { pin.is_high() };
    level.unwrap_or(false)
}

impl<P: InputPin, S: InputPin> InputPanel for GpioPanel<P, S> {
    fn is_button_pressed(&mut self) -> bool {
        if is_active(&mut self.play, self.active_low) {
            self.stable = self.stable.saturating_add(1);
        } else {
            self.stable = 0;
        }
        // Report once, on the sample that completes the debounce
        self.stable == self.debounce
    }

    fn set_abort_enabled(&mut self, enabled: bool) {
        self.abort_enabled = enabled;
    }
}
