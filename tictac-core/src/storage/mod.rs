//! Storage lanes
//!
//! Bricks that are not on the grid live in two board columns, one per
//! side. The player lane is re-scanned before every cleanup because the
//! human may have moved bricks around. The robot lane is only ever
//! touched by the robot, in slot order, so counters are enough.

pub mod allocator;

pub use allocator::{next_free_slot, Lane, LaneOverflow, StorageAllocator, StorageLane, LANE_SLOTS};
