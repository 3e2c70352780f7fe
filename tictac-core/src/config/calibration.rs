//! Axis calibration data types
//!
//! Each horizontal axis maps a logical board index to a motor target with
//! an affine `offset + index * stride` law. The constants depend on the
//! motors and the supply voltage and are measured by hand.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::types::ConfigError;
use crate::motion::{Axis, BOARD_COLUMNS, BOARD_LINES};

/// Highest index ever mapped; peel slides reach one line past the board
const LAST_MAPPED_INDEX: u8 = if BOARD_LINES > BOARD_COLUMNS {
    BOARD_LINES
} else {
    BOARD_COLUMNS
};

/// Affine calibration for a single axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisCalibration {
    /// Motor target for index 0
    pub offset: i32,
    /// Motor units between two adjacent indices
    pub stride: i32,
}

impl AxisCalibration {
    /// Create a new calibration entry
    pub const fn new(offset: i32, stride: i32) -> Self {
        Self { offset, stride }
    }

    /// Motor target for a logical index
    pub const fn target(&self, index: u8) -> i32 {
        self.offset + index as i32 * self.stride
    }

    /// Motor target for a logical index, `None` on overflow
    pub const fn checked_target(&self, index: u8) -> Option<i32> {
        match self.stride.checked_mul(index as i32) {
            Some(span) => self.offset.checked_add(span),
            None => None,
        }
    }

    /// Check if targets strictly increase with the index
    pub const fn is_monotonic(&self) -> bool {
        self.stride > 0
    }
}

/// Calibration for both horizontal axes
///
/// Immutable for the whole session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CalibrationTable {
    /// X axis, indexed by board column
    pub column: AxisCalibration,
    /// Y axis, indexed by board line
    pub line: AxisCalibration,
}

impl Default for CalibrationTable {
    fn default() -> Self {
        Self {
            column: AxisCalibration::new(120, 632),
            line: AxisCalibration::new(375, 1048),
        }
    }
}

impl CalibrationTable {
    /// Get the calibration for a horizontal axis
    pub fn for_axis(&self, axis: Axis) -> Option<&AxisCalibration> {
        match axis {
            Axis::X => Some(&self.column),
            Axis::Y => Some(&self.line),
            Axis::Z | Axis::Pointer => None,
        }
    }

    /// Check that both axes map indices in increasing order
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.column.is_monotonic() {
            return Err(ConfigError::NonMonotonicAxis(Axis::X));
        }
        if !self.line.is_monotonic() {
            return Err(ConfigError::NonMonotonicAxis(Axis::Y));
        }
        for (axis, cal) in [(Axis::X, &self.column), (Axis::Y, &self.line)] {
            if cal.checked_target(LAST_MAPPED_INDEX).is_none() {
                return Err(ConfigError::CalibrationOverflow(axis));
            }
        }
        Ok(())
    }
}
