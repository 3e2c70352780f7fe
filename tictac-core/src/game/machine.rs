//! Game phase machine
//!
//! The engine performs the physical work of a phase, then feeds the
//! resulting [`Event`] through [`Phase::transition`].

use super::events::Event;
use super::grid::Side;

/// Game phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    /// Homing all axes
    Init,
    /// Drawing who moves first
    DecideStarter,
    /// Waiting for the human, then scanning for the new brick
    PlayerTurn,
    /// Robot picks a cell and places a brick
    RobotTurn,
    /// A side completed a line
    Victory(Side),
    /// Grid full without a line
    Draw,
    /// Returning every brick to its lane
    Cleanup,
    /// Session finished
    Done,
    /// Unrecoverable failure; the carriage was parked if possible
    Error(ErrorKind),
}

/// Types of unrecoverable failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ErrorKind {
    /// Button pressed but no new brick found on the grid
    PlayerMoveNotFound,
    /// A storage lane had no slot left
    LaneOverflow,
    /// An axis stopped responding or failed a command
    MotionFault,
    /// Nobody pressed the button in time
    ButtonTimeout,
    /// Grid bookkeeping and the board disagree
    CellOccupied,
}

impl Phase {
    /// Check if the engine has nothing left to do
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Done | Phase::Error(_))
    }

    /// Process an event and return the next phase
    pub fn transition(self, event: Event) -> Self {
        use Event::*;
        use Phase::*;

        match (self, event) {
            // Terminal phases absorb everything
            (Done, _) => Done,
            (Error(kind), _) => Error(kind),

            (_, Fault(kind)) => Error(kind),

            (Init, Homed) => DecideStarter,

            (DecideStarter, StarterChosen(Side::Player)) => PlayerTurn,
            (DecideStarter, StarterChosen(Side::Robot)) => RobotTurn,

            // Turns alternate until a line or a full grid
            (PlayerTurn, TurnPassed) => RobotTurn,
            (RobotTurn, TurnPassed) => PlayerTurn,
            (PlayerTurn | RobotTurn, LineCompleted(side)) => Victory(side),
            (PlayerTurn | RobotTurn, BoardFull) => Draw,

            (Victory(_) | Draw, ResultShown) => Cleanup,

            (Cleanup, BoardCleared) => Done,

            // Default: stay in current phase
            _ => self,
        }
    }
}
