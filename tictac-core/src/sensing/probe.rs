//! Stall probe

use embedded_hal::delay::DelayNs;

use crate::config::SensingConfig;
use crate::motion::{MotionController, MotionError, Position};
use crate::traits::AxisActuator;

/// Result of one stall probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StallReading {
    /// Z position where the magnet stalled
    pub height: i32,
    /// A brick top stopped the magnet
    pub present: bool,
}

impl StallReading {
    /// Classify a stall height
    ///
    /// A brick is present when the height lies within `tolerance` of the
    /// brick depth, bounds included. Anything else is the grid or
    /// baseplate floor.
    pub fn classify(height: i32, config: &SensingConfig) -> Self {
        let low = config.brick_depth - config.tolerance;
        let high = config.brick_depth + config.tolerance;
        Self {
            height,
            present: (low..=high).contains(&height),
        }
    }
}

/// Stall-based brick detector
#[derive(Debug, Clone, Copy)]
pub struct BrickSensor {
    config: SensingConfig,
}

impl BrickSensor {
    pub const fn new(config: SensingConfig) -> Self {
        Self { config }
    }

    /// Probe one board position
    ///
    /// The magnet always ends at the top. When a brick was found the
    /// carriage first slides toward the next line with the magnet down,
    /// so the brick stays seated instead of riding up with the magnet.
    pub fn probe<A: AxisActuator, D: DelayNs>(
        &self,
        motion: &mut MotionController<A, D>,
        position: Position,
    ) -> Result<StallReading, MotionError> {
        motion.move_to(position)?;
        let height = motion.stall_descend(self.config.approach_depth(), self.config.probe_duty)?;
        let reading = StallReading::classify(height, &self.config);
        debug!(
            "Probe at ({}, {}) stalled at {}, present: {}",
            position.line,
            position.column,
            height,
            reading.present
        );

        if reading.present {
            motion.slide_to_next_line(position.line)?;
        }
        motion.raise()?;
        motion.settle();
        Ok(reading)
    }
}
