//! Three-pin RGB status LED
//!
//! Mixes the status colors from red, green and blue channels driven by
//! plain GPIO outputs. Blinking is time-sliced: the owner calls
//! [`RgbLed::update`] with the elapsed time.

use embedded_hal::digital::OutputPin;
use tictac_core::traits::{Color, Indicator};

/// Channel mix (red, green, blue) for a status color
fn channels(color: Color) -> (bool, bool, bool) {
    match color {
        Color::Off => (false, false, false),
        Color::Green => (false, true, false),
        Color::Orange => (true, true, false),
        Color::Cyan => (false, true, true),
        Color::Red => (true, false, false),
    }
}

#[derive(Debug, Clone, Copy)]
struct Blink {
    on_ms: u16,
    off_ms: u16,
    elapsed_ms: u32,
}

/// RGB LED on three GPIO pins
pub struct RgbLed<R, G, B> {
    red: R,
    green: G,
    blue: B,
    /// Common-anode LEDs light up on a low pin
    inverted: bool,
    color: Color,
    blink: Option<Blink>,
    lit: bool,
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> RgbLed<R, G, B> {
    /// Create a new LED, initially off
    ///
    /// # Arguments
    /// - `inverted`: set for common-anode LEDs
    pub fn new(red: R, green: G, blue: B, inverted: bool) -> Self {
        let mut led = Self {
            red,
            green,
            blue,
            inverted,
            color: Color::Off,
            blink: None,
            lit: false,
        };
        led.drive(Color::Off);
        led
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the LED is emitting light right now
    pub fn is_lit(&self) -> bool {
        self.lit
    }

    /// Advance the blink pattern by `delta_ms`
    pub fn update(&mut self, delta_ms: u32) {
        let Some(mut blink) = self.blink else {
            return;
        };

        let period = u32::from(blink.on_ms) + u32::from(blink.off_ms);
        if period == 0 {
            return;
        }
        blink.elapsed_ms = (blink.elapsed_ms + delta_ms) % period;
        self.blink = Some(blink);

        let on = blink.elapsed_ms < u32::from(blink.on_ms);
        if on != self.lit {
            self.drive(if on { self.color } else { Color::Off });
        }
    }

    fn drive(&mut self, color: Color) {
        let (r, g, b) = channels(color);
        let inverted = self.inverted;
        // GPIO errors are not recoverable from a status light
        let _ = set_pin(&mut self.red, r != inverted);
        let _ = set_pin(&mut self.green, g != inverted);
        let _ = set_pin(&mut self.blue, b != inverted);
        self.lit = color != Color::Off;
    }
}

fn set_pin<P: OutputPin>(pin: &mut P, high: bool) -> Result<(), P::Error> {
    if high {
        pin.set_high()
    } else {
        pin.set_low()
    }
}

impl<R: OutputPin, G: OutputPin, B: OutputPin> Indicator for RgbLed<R, G, B> {
    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.blink = None;
        self.drive(color);
    }

    fn blink(&mut self, color: Color, on_ms: u16, off_ms: u16) {
        self.color = color;
        self.blink = Some(Blink {
            on_ms,
            off_ms,
            elapsed_ms: 0,
        });
        self.drive(color);
    }
}
