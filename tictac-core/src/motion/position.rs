//! Board positions and axis identifiers
//!
//! The physical board is a 5x5 arrangement of cells. The 3x3 playing grid
//! occupies lines 1..=3 and columns 1..=3; the storage lanes are whole
//! columns at the left and right edges.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of board lines (Y direction, away from the player is line 0)
pub const BOARD_LINES: u8 = 5;

/// Number of board columns (X direction, left is column 0)
pub const BOARD_COLUMNS: u8 = 5;

/// Axis identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Axis {
    /// Horizontal, across columns
    X,
    /// Horizontal, across lines
    Y,
    /// Vertical magnet lift (positive is down)
    Z,
    /// Indicator pointer
    Pointer,
}

impl Axis {
    /// All axes, in homing order
    pub const ALL: [Axis; 4] = [Axis::Z, Axis::X, Axis::Y, Axis::Pointer];

    /// Check if this axis moves the carriage over the board
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Axis::X | Axis::Y)
    }
}

/// A cell on the physical board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// Line (0 = far from the player)
    pub line: u8,
    /// Column (0 = left)
    pub column: u8,
}

impl Position {
    /// Create a new board position
    pub const fn new(line: u8, column: u8) -> Self {
        Self { line, column }
    }

    /// Check if the position lies on the 5x5 board
    pub fn is_on_board(&self) -> bool {
        self.line < BOARD_LINES && self.column < BOARD_COLUMNS
    }

    /// Position offset by a signed column delta, if it stays on the board
    pub fn column_offset(&self, delta: i8) -> Option<Self> {
        let column = self.column as i16 + delta as i16;
        if (0..BOARD_COLUMNS as i16).contains(&column) {
            Some(Self::new(self.line, column as u8))
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_on_board() {
        assert!(Position::new(0, 0).is_on_board());
        assert!(Position::new(4, 4).is_on_board());
        assert!(!Position::new(5, 0).is_on_board());
        assert!(!Position::new(0, 5).is_on_board());
    }

    #[test]
    fn test_column_offset() {
        let p = Position::new(0, 0);
        assert_eq!(p.column_offset(1), Some(Position::new(0, 1)));
        assert_eq!(p.column_offset(-1), None);

        let p = Position::new(2, 4);
        assert_eq!(p.column_offset(-1), Some(Position::new(2, 3)));
        assert_eq!(p.column_offset(1), None);
    }

    #[test]
    fn test_axis_horizontal() {
        assert!(Axis::X.is_horizontal());
        assert!(Axis::Y.is_horizontal());
        assert!(!Axis::Z.is_horizontal());
        assert!(!Axis::Pointer.is_horizontal());
    }
}
