//! Simulated human opponent

use core::cell::RefCell;

use tictac_core::game::GridCell;
use tictac_core::traits::InputPanel;

use super::world::World;

/// Decides where the human puts the next brick
pub trait HumanPlayer {
    /// Pick one of the `free` grid cells, or `None` to press the button
    /// without playing
    fn next_move(&mut self, free: &[GridCell]) -> Option<GridCell>;
}

impl<F> HumanPlayer for F
where
    F: FnMut(&[GridCell]) -> Option<GridCell>,
{
    fn next_move(&mut self, free: &[GridCell]) -> Option<GridCell> {
        self(free)
    }
}

/// Plays a fixed list of cells, then presses without playing
pub struct ScriptedHuman<'s> {
    moves: core::slice::Iter<'s, GridCell>,
}

impl<'s> ScriptedHuman<'s> {
    pub fn new(moves: &'s [GridCell]) -> Self {
        Self {
            moves: moves.iter(),
        }
    }
}

impl HumanPlayer for ScriptedHuman<'_> {
    fn next_move(&mut self, _free: &[GridCell]) -> Option<GridCell> {
        self.moves.next().copied()
    }
}

/// Button panel with a human standing at it
///
/// Every press is preceded by the human's move: the brick lands on the
/// board first, then the button reads pressed.
pub struct SimHuman<'a, P> {
    world: &'a RefCell<World>,
    player: P,
    lane_column: u8,
    from_lane: bool,
    hesitation: u32,
    polls_left: u32,
    abort_enabled: bool,
    presses: u32,
    unguarded_presses: u32,
}

impl<'a, P: HumanPlayer> SimHuman<'a, P> {
    pub fn new(world: &'a RefCell<World>, player: P, lane_column: u8) -> Self {
        Self {
            world,
            player,
            lane_column,
            from_lane: true,
            hesitation: 0,
            polls_left: 0,
            abort_enabled: true,
            presses: 0,
            unguarded_presses: 0,
        }
    }

    /// Unpressed polls before every press
    pub fn hesitating(mut self, polls: u32) -> Self {
        self.hesitation = polls;
        self.polls_left = polls;
        self
    }

    /// Bring bricks from outside instead of the player lane
    pub fn from_pocket(mut self) -> Self {
        self.from_lane = false;
        self
    }

    pub fn presses(&self) -> u32 {
        self.presses
    }

    /// Presses that happened while the abort input was live
    pub fn unguarded_presses(&self) -> u32 {
        self.unguarded_presses
    }

    pub fn abort_enabled(&self) -> bool {
        self.abort_enabled
    }
}

impl<P: HumanPlayer> InputPanel for SimHuman<'_, P> {
    fn is_button_pressed(&mut self) -> bool {
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return false;
        }

        let free = self.world.borrow().free_grid_cells();
        if let Some(cell) = self.player.next_move(&free) {
            self.world
                .borrow_mut()
                .human_place(cell, self.from_lane, self.lane_column);
        }

        self.presses += 1;
        if self.abort_enabled {
            self.unguarded_presses += 1;
        }
        self.polls_left = self.hesitation;
        true
    }

    fn set_abort_enabled(&mut self, enabled: bool) {
        self.abort_enabled = enabled;
    }
}
