//! Game errors

use core::fmt;

use crate::motion::MotionError;
use crate::storage::{Lane, LaneOverflow};

use super::grid::{CellOccupied, GridCell};
use super::machine::ErrorKind;

/// Unrecoverable game failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GameError {
    /// Scanned every empty cell after the button press, found nothing
    PlayerMoveNotFound,
    /// No slot left in a storage lane
    LaneOverflow(Lane),
    /// A motion primitive failed
    Motion(MotionError),
    /// The button wait expired
    ButtonTimeout,
    /// Tried to place a brick on a taken cell
    CellOccupied(GridCell),
}

impl GameError {
    /// Classification used by the phase machine
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::PlayerMoveNotFound => ErrorKind::PlayerMoveNotFound,
            GameError::LaneOverflow(_) => ErrorKind::LaneOverflow,
            GameError::Motion(_) => ErrorKind::MotionFault,
            GameError::ButtonTimeout => ErrorKind::ButtonTimeout,
            GameError::CellOccupied(_) => ErrorKind::CellOccupied,
        }
    }
}

impl From<MotionError> for GameError {
    fn from(err: MotionError) -> Self {
        GameError::Motion(err)
    }
}

impl From<LaneOverflow> for GameError {
    fn from(err: LaneOverflow) -> Self {
        GameError::LaneOverflow(err.lane)
    }
}

impl From<CellOccupied> for GameError {
    fn from(err: CellOccupied) -> Self {
        GameError::CellOccupied(err.0)
    }
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::PlayerMoveNotFound => {
                f.write_str("button pressed but no new brick found on the grid")
            }
            GameError::LaneOverflow(lane) => write!(f, "{}", LaneOverflow { lane: *lane }),
            GameError::Motion(err) => write!(f, "{}", err),
            GameError::ButtonTimeout => f.write_str("timed out waiting for the player"),
            GameError::CellOccupied(cell) => write!(f, "{}", CellOccupied(*cell)),
        }
    }
}
