//! Events that drive the game phases

use super::grid::Side;
use super::machine::ErrorKind;

/// Outcome of one engine step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    /// Every axis found its reference and the carriage is at rest
    Homed,
    /// The starting side was drawn
    StarterChosen(Side),
    /// A move was made and the game goes on
    TurnPassed,
    /// A move completed a line for this side
    LineCompleted(Side),
    /// A move filled the last cell without completing a line
    BoardFull,
    /// The celebration or the consolation finished
    ResultShown,
    /// Every brick is back in its lane
    BoardCleared,
    /// Something failed that the engine cannot recover from
    Fault(ErrorKind),
}
