//! Board coordinate mapping
//!
//! Converts logical board positions into horizontal axis targets.

use crate::config::CalibrationTable;

use super::position::{Axis, Position};

/// Maps board positions to X/Y motor targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinateMapper {
    table: CalibrationTable,
}

impl CoordinateMapper {
    /// Create a mapper over a validated calibration table
    pub const fn new(table: CalibrationTable) -> Self {
        Self { table }
    }

    /// Motor target for a logical index on a horizontal axis
    ///
    /// Returns `None` for Z and the pointer, which are not board-mapped.
    pub fn physical(&self, axis: Axis, index: u8) -> Option<i32> {
        self.table.for_axis(axis).map(|cal| cal.target(index))
    }

    /// X target for a board column
    pub fn x(&self, column: u8) -> i32 {
        self.table.column.target(column)
    }

    /// Y target for a board line
    pub fn y(&self, line: u8) -> i32 {
        self.table.line.target(line)
    }

    /// Both targets for a board position
    pub fn target(&self, position: Position) -> (i32, i32) {
        (self.x(position.column), self.y(position.line))
    }

    /// Y target halfway between `line` and the next line toward the player
    ///
    /// Sliding here with the magnet down peels a brick off the magnet.
    pub fn midpoint_line(&self, line: u8) -> i32 {
        let here = self.y(line);
        let next = self.table.line.target(line.saturating_add(1));
        here + (next - here) / 2
    }
}
