//! Game bookkeeping and random choices

use heapless::Vec;

use crate::traits::RandomSource;

use super::grid::{Grid, GridCell, Side, GRID_CELLS};

/// Result of a game so far
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    InProgress,
    Winner(Side),
    Draw,
}

impl Outcome {
    /// Evaluate a grid after a move
    pub fn of(grid: &Grid) -> Self {
        match grid.winner() {
            Some(side) => Outcome::Winner(side),
            None if grid.is_full() => Outcome::Draw,
            None => Outcome::InProgress,
        }
    }

    pub fn is_over(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// Whose turn it is and how the game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GameState {
    pub turn: Side,
    pub started_by: Side,
    pub result: Outcome,
}

impl GameState {
    pub fn new(started_by: Side) -> Self {
        Self {
            turn: started_by,
            started_by,
            result: Outcome::InProgress,
        }
    }

    /// Hand the move to the other side
    pub fn pass_turn(&mut self) {
        self.turn = self.turn.opposite();
    }
}

/// A brick placed on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Move {
    pub side: Side,
    pub cell: GridCell,
}

/// Moves in play order
pub type MoveLog = Vec<Move, GRID_CELLS>;

/// Draw the starting side with a fair coin
pub fn decide_starter<R: RandomSource>(random: &mut R) -> Side {
    if random.coin() {
        Side::Player
    } else {
        Side::Robot
    }
}

/// Pick the robot's cell uniformly among the empty ones
///
/// The candidate set is built first, so any index the source returns
/// lands on an empty cell. Returns `None` on a full grid.
pub fn choose_robot_cell<R: RandomSource>(grid: &Grid, random: &mut R) -> Option<GridCell> {
    let empty = grid.empty_cells();
    if empty.is_empty() {
        return None;
    }
    let index = random.index(empty.len()) % empty.len();
    Some(empty[index])
}
