//! Game engine
//!
//! Runs one session from homing to a cleared board. Each call to
//! [`GameEngine::step`] performs the physical work of the current phase
//! and advances the phase machine with the resulting event. Any failure
//! parks the carriage (when the mechanics still respond) and ends in
//! [`Phase::Error`].

use embedded_hal::delay::DelayNs;

use crate::config::{BoardLayout, PointerTarget, RobotConfig, TimingConfig};
use crate::motion::{MotionController, Position, BOARD_COLUMNS};
use crate::sensing::BrickSensor;
use crate::storage::StorageAllocator;
use crate::traits::{AxisActuator, Color, Indicator, InputPanel, RandomSource};

use super::error::GameError;
use super::events::Event;
use super::grid::{Cell, Grid, GridCell, Side};
use super::machine::Phase;
use super::state::{choose_robot_cell, decide_starter, GameState, Move, MoveLog, Outcome};

/// Indicator color while the robot is idle or busy with itself
const COLOR_RUN: Color = Color::Green;
/// Indicator color on the player's turn and victory
const COLOR_PLAYER: Color = Color::Orange;
/// Indicator color on the robot's turn and victory
const COLOR_ROBOT: Color = Color::Cyan;
/// Indicator color after a failure
const COLOR_FAULT: Color = Color::Red;

/// Victory dance repetitions
const DANCE_STEPS: usize = 3;

/// Summary of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameReport {
    pub starter: Side,
    pub outcome: Outcome,
    pub moves: MoveLog,
}

/// Tic-tac-toe session runner
pub struct GameEngine<A, D, I, B, R> {
    motion: MotionController<A, D>,
    sensor: BrickSensor,
    storage: StorageAllocator,
    indicator: I,
    input: B,
    random: R,
    timing: TimingConfig,
    layout: BoardLayout,
    phase: Phase,
    grid: Grid,
    state: GameState,
    starter: Option<Side>,
    moves: MoveLog,
    error: Option<GameError>,
}

impl<A, D, I, B, R> GameEngine<A, D, I, B, R>
where
    A: AxisActuator,
    D: DelayNs,
    I: Indicator,
    B: InputPanel,
    R: RandomSource,
{
    /// Create an engine in [`Phase::Init`]
    pub fn new(
        motion: MotionController<A, D>,
        config: &RobotConfig,
        indicator: I,
        input: B,
        random: R,
    ) -> Self {
        Self {
            motion,
            sensor: BrickSensor::new(config.sensing),
            storage: StorageAllocator::new(config.layout),
            indicator,
            input,
            random,
            timing: config.timing,
            layout: config.layout,
            phase: Phase::Init,
            grid: Grid::new(),
            state: GameState::new(Side::Player),
            starter: None,
            moves: MoveLog::new(),
            error: None,
        }
    }

    /// Skip the coin flip and let `side` move first
    pub fn starting_with(mut self, side: Side) -> Self {
        self.starter = Some(side);
        self
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The failure that ended the session, if any
    pub fn error(&self) -> Option<GameError> {
        self.error
    }

    pub fn motion(&self) -> &MotionController<A, D> {
        &self.motion
    }

    pub fn storage(&self) -> &StorageAllocator {
        &self.storage
    }

    pub fn indicator(&self) -> &I {
        &self.indicator
    }

    pub fn input(&self) -> &B {
        &self.input
    }

    /// Run the session to completion
    pub fn run(&mut self) -> Result<GameReport, GameError> {
        while !self.phase.is_terminal() {
            self.step();
        }
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.report()),
        }
    }

    /// Summary of the session so far
    pub fn report(&self) -> GameReport {
        GameReport {
            starter: self.state.started_by,
            outcome: self.state.result,
            moves: self.moves.clone(),
        }
    }

    /// Perform the current phase and advance
    ///
    /// Returns the new phase. Terminal phases are left untouched.
    pub fn step(&mut self) -> Phase {
        let result = match self.phase {
            Phase::Init => self.init(),
            Phase::DecideStarter => Ok(self.choose_starter()),
            Phase::PlayerTurn => self.player_turn(),
            Phase::RobotTurn => self.robot_turn(),
            Phase::Victory(side) => self.show_victory(side),
            Phase::Draw => self.show_draw(),
            Phase::Cleanup => self.cleanup(),
            Phase::Done | Phase::Error(_) => return self.phase,
        };

        let event = match result {
            Ok(event) => event,
            Err(err) => self.fault(err),
        };

        let next = self.phase.transition(event);
        if next != self.phase {
            debug!("Phase {:?} -> {:?}", self.phase, next);
        }
        self.phase = next;
        next
    }

    fn init(&mut self) -> Result<Event, GameError> {
        self.indicator.set_color(COLOR_RUN);
        self.motion.home()?;
        self.motion.rest()?;
        Ok(Event::Homed)
    }

    fn choose_starter(&mut self) -> Event {
        let side = match self.starter {
            Some(side) => side,
            None => decide_starter(&mut self.random),
        };
        info!("{:?} starts", side);
        self.state = GameState::new(side);
        Event::StarterChosen(side)
    }

    fn player_turn(&mut self) -> Result<Event, GameError> {
        self.wait_for_player()?;
        let cell = self.find_player_brick()?;
        self.grid.place(cell, Side::Player)?;
        info!("Player: ({}, {})", cell.row, cell.col);
        self.motion.rest()?;
        self.record(Side::Player, cell)
    }

    /// Block until the button is pressed
    ///
    /// The abort input stays off until the press registers, so a stray
    /// touch cannot kill the scan that follows.
    fn wait_for_player(&mut self) -> Result<(), GameError> {
        self.input.set_abort_enabled(false);
        self.motion.point_to(PointerTarget::Player)?;
        self.indicator.blink(
            COLOR_PLAYER,
            self.timing.blink_on_ms,
            self.timing.blink_off_ms,
        );

        let poll_ms = self.timing.button_poll_ms;
        let mut waited_ms: u32 = 0;
        while !self.input.is_button_pressed() {
            if let Some(timeout_ms) = self.timing.button_timeout_ms {
                if waited_ms >= timeout_ms {
                    return Err(GameError::ButtonTimeout);
                }
            }
            self.motion.pause(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }

        self.motion.settle();
        self.motion.point_to(PointerTarget::Center)?;
        self.indicator.set_color(COLOR_RUN);
        self.input.set_abort_enabled(true);
        Ok(())
    }

    /// Probe empty cells in row-major order until a brick turns up
    fn find_player_brick(&mut self) -> Result<GridCell, GameError> {
        for cell in self.grid.empty_cells() {
            let reading = self.sensor.probe(&mut self.motion, cell.board_position())?;
            if reading.present {
                return Ok(cell);
            }
        }
        warn!("Scanned every empty cell without finding the new brick");
        Err(GameError::PlayerMoveNotFound)
    }

    fn robot_turn(&mut self) -> Result<Event, GameError> {
        self.motion.point_to(PointerTarget::Robot)?;
        self.indicator.blink(
            COLOR_ROBOT,
            self.timing.blink_on_ms,
            self.timing.blink_off_ms,
        );

        let Some(cell) = choose_robot_cell(&self.grid, &mut self.random) else {
            return Ok(Event::BoardFull);
        };
        let supply = self.storage.take_robot_supply()?;
        self.grid.place(cell, Side::Robot)?;
        info!("Robot: ({}, {})", cell.row, cell.col);

        self.motion.pick_at(supply)?;
        self.motion.drop_at(cell.board_position())?;
        self.motion.point_to(PointerTarget::Center)?;
        self.indicator.set_color(COLOR_RUN);
        self.motion.rest()?;
        self.record(Side::Robot, cell)
    }

    /// Log a placed brick and evaluate the grid
    fn record(&mut self, side: Side, cell: GridCell) -> Result<Event, GameError> {
        self.moves
            .push(Move { side, cell })
            .map_err(|_| GameError::CellOccupied(cell))?;

        let outcome = Outcome::of(&self.grid);
        self.state.result = outcome;
        Ok(match outcome {
            Outcome::Winner(winner) => {
                info!("{:?} wins", winner);
                Event::LineCompleted(winner)
            }
            Outcome::Draw => {
                info!("No one wins");
                Event::BoardFull
            }
            Outcome::InProgress => {
                self.state.pass_turn();
                Event::TurnPassed
            }
        })
    }

    /// Wiggle between the winner's lane and its neighbour column
    fn show_victory(&mut self, side: Side) -> Result<Event, GameError> {
        let color = match side {
            Side::Player => COLOR_PLAYER,
            Side::Robot => COLOR_ROBOT,
        };
        self.indicator
            .blink(color, self.timing.blink_on_ms, self.timing.blink_off_ms);

        let home = Position::new(0, side.lane().column(&self.layout));
        // Step toward the board center
        let toward_center = if home.column < BOARD_COLUMNS / 2 { 1 } else { -1 };
        let beside = home.column_offset(toward_center).unwrap_or(home);

        for _ in 0..DANCE_STEPS {
            self.motion.move_to(beside)?;
            self.motion.point_to(side.pointer())?;
            self.motion.move_to(home)?;
            self.motion.point_to(PointerTarget::Center)?;
        }
        self.finish_result()
    }

    fn show_draw(&mut self) -> Result<Event, GameError> {
        for _ in 0..DANCE_STEPS {
            self.motion.point_to(PointerTarget::HalfPlayer)?;
            self.motion.settle();
            self.motion.point_to(PointerTarget::HalfRobot)?;
            self.motion.settle();
        }
        self.motion.point_to(PointerTarget::Center)?;
        self.finish_result()
    }

    fn finish_result(&mut self) -> Result<Event, GameError> {
        self.indicator.set_color(COLOR_RUN);
        self.motion.rest()?;
        self.motion.pause(self.timing.completion_ms);
        Ok(Event::ResultShown)
    }

    /// Return every brick on the grid to its owner's lane
    ///
    /// A lane slot is claimed before the brick is picked, so an overflow
    /// never leaves a brick hanging on the magnet.
    fn cleanup(&mut self) -> Result<Event, GameError> {
        self.storage.scan_player_lane(&self.sensor, &mut self.motion)?;

        for cell in self.grid.occupied_cells() {
            let slot = match self.grid.get(cell) {
                Cell::Player => self.storage.next_free_player_slot()?,
                Cell::Robot => self.storage.next_robot_return()?,
                Cell::Empty => continue,
            };
            debug!(
                "Returning ({}, {}) to lane slot ({}, {})",
                cell.row,
                cell.col,
                slot.line,
                slot.column
            );
            self.motion.pick_at(cell.board_position())?;
            self.motion.drop_at(slot)?;
        }

        self.motion.rest()?;
        info!("Board cleared");
        Ok(Event::BoardCleared)
    }

    /// Record a failure and park the carriage
    fn fault(&mut self, err: GameError) -> Event {
        error!("Failed during {:?}: {:?}", self.phase, err);
        self.error = Some(err);
        self.indicator.set_color(COLOR_FAULT);
        self.input.set_abort_enabled(true);

        // Only travel once the magnet is up
        if self.motion.raise().and_then(|()| self.motion.rest()).is_err() {
            warn!("Could not park the carriage");
        }
        Event::Fault(err.kind())
    }
}
