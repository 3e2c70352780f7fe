//! Operator input trait

/// Trait for the hub button panel
///
/// The same physical button doubles as the hardware stop input, which is
/// why the abort function can be switched off while the engine waits for
/// the player to confirm a move.
pub trait InputPanel {
    /// Check if the player button is currently pressed
    fn is_button_pressed(&mut self) -> bool;

    /// Enable or disable the hardware stop/abort input
    fn set_abort_enabled(&mut self, enabled: bool);
}
