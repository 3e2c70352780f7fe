//! Lane slot allocation

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::BoardLayout;
use crate::game::Cell;
use crate::motion::{MotionController, MotionError, Position, BOARD_LINES};
use crate::sensing::BrickSensor;
use crate::traits::AxisActuator;

/// Slots per lane, one per board line
pub const LANE_SLOTS: usize = BOARD_LINES as usize;

/// Storage lane identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Lane {
    Player,
    Robot,
}

impl Lane {
    /// Board column of this lane
    pub fn column(&self, layout: &BoardLayout) -> u8 {
        match self {
            Lane::Player => layout.player_lane,
            Lane::Robot => layout.robot_lane,
        }
    }

    /// Board position of a slot in this lane
    pub fn slot_position(&self, layout: &BoardLayout, slot: usize) -> Position {
        Position::new(slot as u8, self.column(layout))
    }
}

/// Lane ran out of slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LaneOverflow {
    pub lane: Lane,
}

impl fmt::Display for LaneOverflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} lane has no free slot", self.lane)
    }
}

/// Occupancy of one lane, slot 0 is the far end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StorageLane {
    slots: [Cell; LANE_SLOTS],
}

impl StorageLane {
    /// An empty lane
    pub const fn new() -> Self {
        Self {
            slots: [Cell::Empty; LANE_SLOTS],
        }
    }

    pub const fn from_slots(slots: [Cell; LANE_SLOTS]) -> Self {
        Self { slots }
    }

    pub fn get(&self, slot: usize) -> Option<Cell> {
        self.slots.get(slot).copied()
    }

    /// Set a slot, ignoring out-of-range indices
    pub fn set(&mut self, slot: usize, cell: Cell) {
        if let Some(entry) = self.slots.get_mut(slot) {
            *entry = cell;
        }
    }

    pub fn free_slots(&self) -> usize {
        self.slots.iter().filter(|cell| cell.is_empty()).count()
    }
}

/// First empty slot at or after `cursor`
pub fn next_free_slot(lane: &StorageLane, cursor: usize) -> Option<usize> {
    (cursor..LANE_SLOTS).find(|&slot| lane.slots[slot].is_empty())
}

/// Hands out lane slots for the robot's moves and for cleanup
#[derive(Debug, Clone)]
pub struct StorageAllocator {
    layout: BoardLayout,
    player_lane: StorageLane,
    player_cursor: usize,
    robot_supply: usize,
    robot_return: usize,
}

impl StorageAllocator {
    pub fn new(layout: BoardLayout) -> Self {
        Self {
            layout,
            player_lane: StorageLane::new(),
            player_cursor: 0,
            robot_supply: 0,
            robot_return: 0,
        }
    }

    /// Player lane as last scanned, with handed-out slots marked
    pub fn player_lane(&self) -> &StorageLane {
        &self.player_lane
    }

    /// Bricks taken from the robot lane so far
    pub fn robot_bricks_used(&self) -> usize {
        self.robot_supply
    }

    /// Probe every player lane slot and restart the free-slot search
    pub fn scan_player_lane<A: AxisActuator, D: DelayNs>(
        &mut self,
        sensor: &BrickSensor,
        motion: &mut MotionController<A, D>,
    ) -> Result<&StorageLane, MotionError> {
        let mut lane = StorageLane::new();
        for slot in 0..LANE_SLOTS {
            let position = Lane::Player.slot_position(&self.layout, slot);
            if sensor.probe(motion, position)?.present {
                lane.set(slot, Cell::Player);
            }
        }
        info!("Player lane has {} free slots", lane.free_slots());
        self.load_player_lane(lane);
        Ok(&self.player_lane)
    }

    /// Replace the player lane occupancy and restart the free-slot search
    pub fn load_player_lane(&mut self, lane: StorageLane) {
        self.player_lane = lane;
        self.player_cursor = 0;
    }

    /// Claim the next empty player lane slot
    ///
    /// The cursor only moves forward, so no slot is handed out twice.
    pub fn next_free_player_slot(&mut self) -> Result<Position, LaneOverflow> {
        let slot = next_free_slot(&self.player_lane, self.player_cursor).ok_or(LaneOverflow {
            lane: Lane::Player,
        })?;
        self.player_lane.set(slot, Cell::Player);
        self.player_cursor = slot + 1;
        Ok(Lane::Player.slot_position(&self.layout, slot))
    }

    /// Slot holding the next unused robot brick
    pub fn take_robot_supply(&mut self) -> Result<Position, LaneOverflow> {
        Self::advance(&mut self.robot_supply, Lane::Robot, &self.layout)
    }

    /// Slot where the next robot brick goes back during cleanup
    pub fn next_robot_return(&mut self) -> Result<Position, LaneOverflow> {
        Self::advance(&mut self.robot_return, Lane::Robot, &self.layout)
    }

    fn advance(counter: &mut usize, lane: Lane, layout: &BoardLayout) -> Result<Position, LaneOverflow> {
        if *counter >= LANE_SLOTS {
            return Err(LaneOverflow { lane });
        }
        let position = lane.slot_position(layout, *counter);
        *counter += 1;
        Ok(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RobotConfig;
    use crate::testing::{Rig, FLOOR};
    use proptest::prelude::*;

    const E: Cell = Cell::Empty;
    const P: Cell = Cell::Player;

    #[test]
    fn test_next_free_slot() {
        let lane = StorageLane::from_slots([P, E, P, E, E]);
        assert_eq!(next_free_slot(&lane, 0), Some(1));
        assert_eq!(next_free_slot(&lane, 2), Some(3));
        assert_eq!(next_free_slot(&lane, 5), None);
        assert_eq!(next_free_slot(&StorageLane::from_slots([P; 5]), 0), None);
    }

    #[test]
    fn test_player_slots_skip_occupied() {
        let mut storage = StorageAllocator::new(BoardLayout::default());
        storage.load_player_lane(StorageLane::from_slots([P, E, P, E, P]));

        assert_eq!(storage.next_free_player_slot(), Ok(Position::new(1, 0)));
        assert_eq!(storage.next_free_player_slot(), Ok(Position::new(3, 0)));
        assert_eq!(
            storage.next_free_player_slot(),
            Err(LaneOverflow { lane: Lane::Player })
        );
        assert_eq!(storage.player_lane().free_slots(), 0);
    }

    #[test]
    fn test_robot_counters() {
        let mut storage = StorageAllocator::new(BoardLayout::default());
        for line in 0..5 {
            assert_eq!(storage.take_robot_supply(), Ok(Position::new(line, 4)));
        }
        assert_eq!(
            storage.take_robot_supply(),
            Err(LaneOverflow { lane: Lane::Robot })
        );
        assert_eq!(storage.robot_bricks_used(), 5);

        // Returns start from the far end independently of the supply
        assert_eq!(storage.next_robot_return(), Ok(Position::new(0, 4)));
        assert_eq!(storage.next_robot_return(), Ok(Position::new(1, 4)));
    }

    #[test]
    fn test_scan_player_lane() {
        let config = RobotConfig::default();
        let rig = Rig::with_heights(&[FLOOR, 392, FLOOR, 388, FLOOR]);
        let mut motion = rig.motion(&config);
        let sensor = BrickSensor::new(config.sensing);
        let mut storage = StorageAllocator::new(config.layout);

        let lane = *storage.scan_player_lane(&sensor, &mut motion).unwrap();
        assert_eq!(lane, StorageLane::from_slots([E, P, E, P, E]));
        assert_eq!(storage.next_free_player_slot(), Ok(Position::new(0, 0)));
        assert_eq!(storage.next_free_player_slot(), Ok(Position::new(2, 0)));

        // Every lane slot was visited in order
        let visited: std::vec::Vec<i32> = rig
            .trace()
            .into_iter()
            .filter(|&(axis, _)| axis == crate::motion::Axis::X)
            .map(|(_, target)| target)
            .collect();
        assert_eq!(visited, std::vec![motion.mapper().x(0); 5]);
    }

    fn cell_strategy() -> impl Strategy<Value = Cell> {
        prop_oneof![Just(Cell::Empty), Just(Cell::Player)]
    }

    proptest! {
        #[test]
        fn prop_player_slots_unique_and_free(
            slots in proptest::array::uniform5(cell_strategy()),
            requests in 0usize..8,
        ) {
            let scanned = StorageLane::from_slots(slots);
            let mut storage = StorageAllocator::new(BoardLayout::default());
            storage.load_player_lane(scanned);

            let mut seen = std::vec::Vec::new();
            for _ in 0..requests {
                match storage.next_free_player_slot() {
                    Ok(position) => {
                        let slot = position.line as usize;
                        prop_assert_eq!(scanned.get(slot), Some(Cell::Empty));
                        prop_assert!(!seen.contains(&slot));
                        seen.push(slot);
                    }
                    Err(overflow) => {
                        prop_assert_eq!(overflow.lane, Lane::Player);
                        prop_assert_eq!(seen.len(), scanned.free_slots());
                    }
                }
            }
        }
    }
}
