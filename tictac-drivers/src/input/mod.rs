//! Input drivers

mod button;

pub use button::GpioPanel;
