//! Status light drivers

mod rgb;

pub use rgb::RgbLed;
