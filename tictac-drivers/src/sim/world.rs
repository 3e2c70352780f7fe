//! Simulated board physics
//!
//! Tracks bricks on the 5x5 board, the carriage, the magnet and a clock.
//! The physics are just rich enough to punish the mistakes the real
//! machine punishes: a magnet lifted straight off a brick takes the brick
//! with it, and horizontal travel with the magnet down knocks bricks over.

use heapless::Vec;
use tictac_core::config::{RobotConfig, SensingConfig};
use tictac_core::game::{GridCell, Side, GRID_CELLS};
use tictac_core::motion::{Axis, CoordinateMapper, Position, BOARD_COLUMNS, BOARD_LINES};
use tictac_core::traits::{AxisError, Direction};

/// Stall height of the grid cell floor
pub const GRID_FLOOR: i32 = 482;

/// Stall height of the bare baseplate under the lanes
pub const BASEPLATE: i32 = 618;

const NANOS_PER_MS: u64 = 1_000_000;

#[derive(Debug, Clone, Copy, Default)]
struct AxisState {
    position: i32,
    /// Clock (ns) at which the current move finishes
    busy_until: u64,
}

/// Complete simulated machine state
#[derive(Debug, Clone)]
pub struct World {
    mapper: CoordinateMapper,
    sensing: SensingConfig,
    board: [[Option<Side>; BOARD_COLUMNS as usize]; BOARD_LINES as usize],
    clock_ns: u64,
    axes: [AxisState; 4],
    /// Brick hanging from the magnet
    held: Option<Side>,
    /// Board cell whose brick the lowered magnet is stuck to
    attached: Option<Position>,
    jammed: Option<Axis>,
    stall_bias: i32,
    collisions: u32,
    pocket_bricks: u32,
}

fn slot(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
        Axis::Z => 2,
        Axis::Pointer => 3,
    }
}

/// Travel time for a move in nanoseconds
fn travel_ns(from: i32, to: i32, speed: u16) -> u64 {
    let distance = u64::from(from.abs_diff(to));
    distance * 1_000 * NANOS_PER_MS / u64::from(speed.max(1))
}

impl World {
    /// A board with both lanes full and an empty grid
    pub fn new(config: &RobotConfig) -> Self {
        let mut world = Self::empty(config);
        for line in 0..BOARD_LINES {
            world.put(Position::new(line, config.layout.player_lane), Some(Side::Player));
            world.put(Position::new(line, config.layout.robot_lane), Some(Side::Robot));
        }
        world
    }

    /// A board without any bricks
    pub fn empty(config: &RobotConfig) -> Self {
        Self {
            mapper: CoordinateMapper::new(config.calibration),
            sensing: config.sensing,
            board: [[None; BOARD_COLUMNS as usize]; BOARD_LINES as usize],
            clock_ns: 0,
            axes: [AxisState::default(); 4],
            held: None,
            attached: None,
            jammed: None,
            stall_bias: 0,
            collisions: 0,
            pocket_bricks: 0,
        }
    }

    pub fn brick_at(&self, position: Position) -> Option<Side> {
        self.board
            .get(position.line as usize)
            .and_then(|line| line.get(position.column as usize))
            .copied()
            .flatten()
    }

    /// Put or remove a brick by hand
    pub fn put(&mut self, position: Position, brick: Option<Side>) {
        if let Some(cell) = self
            .board
            .get_mut(position.line as usize)
            .and_then(|line| line.get_mut(position.column as usize))
        {
            *cell = brick;
        }
    }

    /// Bricks of `side` anywhere on the board
    pub fn count(&self, side: Side) -> usize {
        self.board
            .iter()
            .flatten()
            .filter(|brick| **brick == Some(side))
            .count()
    }

    pub fn held(&self) -> Option<Side> {
        self.held
    }

    pub fn clock_ms(&self) -> u64 {
        self.clock_ns / NANOS_PER_MS
    }

    /// Times a brick was knocked or stacked
    pub fn collisions(&self) -> u32 {
        self.collisions
    }

    /// Bricks the human brought from outside the player lane
    pub fn pocket_bricks(&self) -> u32 {
        self.pocket_bricks
    }

    pub fn position(&self, axis: Axis) -> i32 {
        self.axes[slot(axis)].position
    }

    /// Board cell exactly under the carriage
    pub fn carriage_cell(&self) -> Option<Position> {
        let x = self.position(Axis::X);
        let y = self.position(Axis::Y);
        let column = (0..BOARD_COLUMNS).find(|&c| self.mapper.x(c) == x)?;
        let line = (0..BOARD_LINES).find(|&l| self.mapper.y(l) == y)?;
        Some(Position::new(line, column))
    }

    /// Stop an axis from ever finishing a move
    pub fn jam(&mut self, axis: Option<Axis>) {
        self.jammed = axis;
    }

    /// Shift every brick stall reading by `bias`
    pub fn set_stall_bias(&mut self, bias: i32) {
        self.stall_bias = bias;
    }

    /// Empty grid cells in row-major order
    pub fn free_grid_cells(&self) -> Vec<GridCell, GRID_CELLS> {
        GridCell::all()
            .filter(|cell| self.brick_at(cell.board_position()).is_none())
            .collect()
    }

    /// The human puts a brick on the grid
    ///
    /// The brick comes from the player lane, nearest slot first, unless
    /// `from_lane` is false or the lane is empty. Occupied cells are left
    /// alone.
    pub fn human_place(&mut self, cell: GridCell, from_lane: bool, lane_column: u8) {
        let target = cell.board_position();
        if self.brick_at(target).is_some() {
            return;
        }

        let source = (0..BOARD_LINES)
            .rev()
            .map(|line| Position::new(line, lane_column))
            .find(|&position| self.brick_at(position) == Some(Side::Player));
        match source {
            Some(position) if from_lane => self.put(position, None),
            _ => self.pocket_bricks += 1,
        }
        self.put(target, Some(Side::Player));
    }

    pub fn advance(&mut self, ns: u64) {
        self.clock_ns += ns;
    }

    pub fn is_complete(&self, axis: Axis) -> bool {
        self.jammed != Some(axis) && self.clock_ns >= self.axes[slot(axis)].busy_until
    }

    pub fn reset_reference(&mut self, axis: Axis, value: i32) {
        self.axes[slot(axis)].position = value;
    }

    pub fn move_axis(
        &mut self,
        axis: Axis,
        target: i32,
        speed: u16,
        blocking: bool,
    ) -> Result<(), AxisError> {
        if blocking && self.jammed == Some(axis) {
            return Err(AxisError::Stalled);
        }
        if axis.is_horizontal() {
            self.carriage_moving(axis);
        }

        let state = &mut self.axes[slot(axis)];
        let done = self.clock_ns + travel_ns(state.position, target, speed);
        state.position = target;
        state.busy_until = done;
        if blocking {
            self.clock_ns = done;
        }

        if axis == Axis::Z {
            self.magnet_at(target);
        }
        Ok(())
    }

    pub fn stall(&mut self, axis: Axis, direction: Direction, speed: u16) -> Result<i32, AxisError> {
        if self.jammed == Some(axis) {
            return Err(AxisError::Stalled);
        }

        let stop = match (axis, direction) {
            (Axis::Z, Direction::Positive) => self.obstacle_height(),
            // Every negative stop sits a little past the working range
            (_, Direction::Negative) => -12,
            (_, Direction::Positive) => i32::from(u16::MAX),
        };
        self.move_axis(axis, stop, speed, true)?;
        Ok(stop)
    }

    /// Height where a descending magnet stops
    fn obstacle_height(&self) -> i32 {
        match self.carriage_cell() {
            Some(position) if self.brick_at(position).is_some() => {
                self.sensing.brick_depth + self.stall_bias
            }
            Some(position) if is_grid(position) => GRID_FLOOR,
            _ => BASEPLATE,
        }
    }

    /// Horizontal travel with the magnet down
    fn carriage_moving(&mut self, axis: Axis) {
        if self.position(Axis::Z) <= 0 {
            return;
        }
        match (axis, self.attached) {
            // Sliding along Y peels the brick off and leaves it seated
            (Axis::Y, Some(_)) => self.attached = None,
            _ => self.collisions += 1,
        }
    }

    /// Magnet reached height `z`
    fn magnet_at(&mut self, z: i32) {
        let contact = z >= self.sensing.brick_depth;
        if !contact {
            if let Some(position) = self.attached.take() {
                self.held = self.brick_at(position);
                self.put(position, None);
            }
            return;
        }

        let Some(position) = self.carriage_cell() else {
            return;
        };
        match (self.held, self.brick_at(position)) {
            (Some(side), None) => {
                self.put(position, Some(side));
                self.held = None;
                self.attached = Some(position);
            }
            (Some(_), Some(_)) => self.collisions += 1,
            (None, Some(_)) => self.attached = Some(position),
            (None, None) => {}
        }
    }
}

fn is_grid(position: Position) -> bool {
    (1..=3).contains(&position.line) && (1..=3).contains(&position.column)
}
