//! Configuration type definitions
//!
//! These types represent the robot configuration. Defaults are the values
//! measured on the reference build (LEGO Education large motors on a
//! 9 V supply); a host can override any of them from TOML.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::calibration::CalibrationTable;
use crate::motion::{Axis, Position, BOARD_COLUMNS};

/// First and last board column covered by the playing grid
pub const GRID_FIRST_COLUMN: u8 = 1;
pub const GRID_LAST_COLUMN: u8 = 3;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Calibration stride is not positive
    NonMonotonicAxis(Axis),
    /// Calibrated targets overflow the motor position range
    CalibrationOverflow(Axis),
    /// Drive speed is zero
    InvalidSpeed(Axis),
    /// Duty limit outside 1..=100
    InvalidDuty(Axis),
    /// Classification tolerance negative or larger than the brick depth
    InvalidTolerance,
    /// Fast-approach margin not within the brick depth
    InvalidApproach,
    /// Storage lane column outside the board
    LaneOutOfRange,
    /// Storage lane column overlaps the playing grid
    LaneOverlapsGrid,
    /// Both lanes use the same column
    LanesCoincide,
    /// Rest position outside the board
    RestOutOfRange,
    /// Poll interval is zero
    InvalidPollInterval,
    /// Pointer angles are not ordered player < half < center < half < robot
    PointerOutOfOrder,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonMonotonicAxis(axis) => {
                write!(f, "calibration stride for {:?} must be positive", axis)
            }
            ConfigError::CalibrationOverflow(axis) => {
                write!(f, "calibration for {:?} overflows the position range", axis)
            }
            ConfigError::InvalidSpeed(axis) => write!(f, "speed for {:?} must be non-zero", axis),
            ConfigError::InvalidDuty(axis) => {
                write!(f, "duty limit for {:?} must be within 1..=100", axis)
            }
            ConfigError::InvalidTolerance => f.write_str("sensing tolerance out of range"),
            ConfigError::InvalidApproach => f.write_str("approach margin out of range"),
            ConfigError::LaneOutOfRange => f.write_str("lane column outside the board"),
            ConfigError::LaneOverlapsGrid => f.write_str("lane column overlaps the grid"),
            ConfigError::LanesCoincide => f.write_str("player and robot lanes share a column"),
            ConfigError::RestOutOfRange => f.write_str("rest position outside the board"),
            ConfigError::InvalidPollInterval => f.write_str("poll interval must be non-zero"),
            ConfigError::PointerOutOfOrder => f.write_str("pointer angles are out of order"),
        }
    }
}

/// Speed and stall force for one axis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AxisDrive {
    /// Travel speed in motor units per second
    pub speed: u16,
    /// Duty limit (percent) used when homing against the mechanical stop
    pub stall_duty: u8,
}

impl AxisDrive {
    /// Create a new drive setting
    pub const fn new(speed: u16, stall_duty: u8) -> Self {
        Self { speed, stall_duty }
    }
}

/// Drive settings for all axes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DriveConfig {
    pub x: AxisDrive,
    pub y: AxisDrive,
    pub z: AxisDrive,
    pub pointer: AxisDrive,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            x: AxisDrive::new(1000, 87),
            y: AxisDrive::new(1000, 80),
            // Z duty drifts with battery level; 17 works from 8.3 V up
            z: AxisDrive::new(1000, 17),
            pointer: AxisDrive::new(800, 20),
        }
    }
}

impl DriveConfig {
    /// Get the drive for an axis
    pub fn get(&self, axis: Axis) -> &AxisDrive {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
            Axis::Pointer => &self.pointer,
        }
    }
}

/// Stall sensing constants
///
/// Z positions grow downward from the homed top (0).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SensingConfig {
    /// Z position at which the magnet touches a brick
    pub brick_depth: i32,
    /// Half-width of the presence window around `brick_depth`
    pub tolerance: i32,
    /// Distance above `brick_depth` where the fast approach ends
    pub approach_margin: i32,
    /// Duty limit (percent) for the slow stall-seeking descent
    pub probe_duty: u8,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            brick_depth: 390,
            tolerance: 50,
            approach_margin: 50,
            probe_duty: 13,
        }
    }
}

impl SensingConfig {
    /// Z target where the fast approach hands over to the stall run
    pub fn approach_depth(&self) -> i32 {
        self.brick_depth - self.approach_margin
    }
}

/// Named pointer targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PointerTarget {
    /// Neither side
    Center,
    /// Player's lane
    Player,
    /// Robot's lane
    Robot,
    /// Halfway toward the player
    HalfPlayer,
    /// Halfway toward the robot
    HalfRobot,
}

/// Pointer angles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PointerConfig {
    /// Angle pointing at the player lane (also the homing stop)
    pub player: i32,
    /// Angle pointing at the robot lane
    pub robot: i32,
    /// Neutral angle
    pub center: i32,
    pub half_player: i32,
    pub half_robot: i32,
}

impl Default for PointerConfig {
    fn default() -> Self {
        Self {
            player: -87,
            robot: 87,
            center: 0,
            half_player: -44,
            half_robot: 44,
        }
    }
}

impl PointerConfig {
    /// Angle for a named target
    pub fn angle(&self, target: PointerTarget) -> i32 {
        match target {
            PointerTarget::Center => self.center,
            PointerTarget::Player => self.player,
            PointerTarget::Robot => self.robot,
            PointerTarget::HalfPlayer => self.half_player,
            PointerTarget::HalfRobot => self.half_robot,
        }
    }
}

/// Where things are on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BoardLayout {
    /// Carriage position at the start and end of every move sequence
    pub rest: Position,
    /// Board column holding the player's bricks
    pub player_lane: u8,
    /// Board column holding the robot's bricks
    pub robot_lane: u8,
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self {
            rest: Position::new(0, 2),
            player_lane: 0,
            robot_lane: BOARD_COLUMNS - 1,
        }
    }
}

/// Delays and poll intervals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TimingConfig {
    /// Short pause after each completed action
    pub settle_ms: u32,
    /// Pause with the magnet down so it grips the brick
    pub pick_settle_ms: u32,
    /// Indicator blink on time
    pub blink_on_ms: u16,
    /// Indicator blink off time
    pub blink_off_ms: u16,
    /// Pause between the end of a game and the cleanup
    pub completion_ms: u32,
    /// Poll interval while two axes travel in parallel
    pub motion_poll_ms: u32,
    /// Poll interval while waiting for the button
    pub button_poll_ms: u32,
    /// Give up waiting for parallel motion after this long
    pub motion_timeout_ms: Option<u32>,
    /// Give up waiting for the player after this long
    pub button_timeout_ms: Option<u32>,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            settle_ms: 100,
            pick_settle_ms: 250,
            blink_on_ms: 500,
            blink_off_ms: 500,
            completion_ms: 5000,
            motion_poll_ms: 10,
            button_poll_ms: 10,
            motion_timeout_ms: None,
            button_timeout_ms: None,
        }
    }
}

/// Complete robot configuration
///
/// This is the top-level configuration structure, validated once at
/// startup and read-only afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RobotConfig {
    pub calibration: CalibrationTable,
    pub drives: DriveConfig,
    pub sensing: SensingConfig,
    pub pointer: PointerConfig,
    pub layout: BoardLayout,
    pub timing: TimingConfig,
}

impl RobotConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the whole configuration
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.calibration.validate()?;

        for axis in Axis::ALL {
            let drive = self.drives.get(axis);
            if drive.speed == 0 {
                return Err(ConfigError::InvalidSpeed(axis));
            }
            if !(1..=100).contains(&drive.stall_duty) {
                return Err(ConfigError::InvalidDuty(axis));
            }
        }

        let sensing = &self.sensing;
        if !(1..=100).contains(&sensing.probe_duty) {
            return Err(ConfigError::InvalidDuty(Axis::Z));
        }
        if sensing.tolerance < 0 || sensing.tolerance >= sensing.brick_depth {
            return Err(ConfigError::InvalidTolerance);
        }
        if sensing.approach_margin <= 0 || sensing.approach_margin >= sensing.brick_depth {
            return Err(ConfigError::InvalidApproach);
        }

        let pointer = &self.pointer;
        if !(pointer.player < pointer.half_player
            && pointer.half_player < pointer.center
            && pointer.center < pointer.half_robot
            && pointer.half_robot < pointer.robot)
        {
            return Err(ConfigError::PointerOutOfOrder);
        }

        let layout = &self.layout;
        for lane in [layout.player_lane, layout.robot_lane] {
            if lane >= BOARD_COLUMNS {
                return Err(ConfigError::LaneOutOfRange);
            }
            if (GRID_FIRST_COLUMN..=GRID_LAST_COLUMN).contains(&lane) {
                return Err(ConfigError::LaneOverlapsGrid);
            }
        }
        if layout.player_lane == layout.robot_lane {
            return Err(ConfigError::LanesCoincide);
        }
        if !layout.rest.is_on_board() {
            return Err(ConfigError::RestOutOfRange);
        }

        if self.timing.motion_poll_ms == 0 || self.timing.button_poll_ms == 0 {
            return Err(ConfigError::InvalidPollInterval);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RobotConfig::new();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.sensing.approach_depth(), 340);
        assert_eq!(config.layout.rest, Position::new(0, 2));
        assert_eq!(config.timing.motion_timeout_ms, None);
    }

    #[test]
    fn test_rejects_zero_speed() {
        let mut config = RobotConfig::new();
        config.drives.pointer.speed = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSpeed(Axis::Pointer))
        );
    }

    #[test]
    fn test_rejects_bad_duty() {
        let mut config = RobotConfig::new();
        config.drives.x.stall_duty = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDuty(Axis::X)));

        let mut config = RobotConfig::new();
        config.sensing.probe_duty = 101;
        assert_eq!(config.validate(), Err(ConfigError::InvalidDuty(Axis::Z)));
    }

    #[test]
    fn test_rejects_sensing_window() {
        let mut config = RobotConfig::new();
        config.sensing.tolerance = -1;
        assert_eq!(config.validate(), Err(ConfigError::InvalidTolerance));

        let mut config = RobotConfig::new();
        config.sensing.approach_margin = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidApproach));
    }

    #[test]
    fn test_rejects_lane_layout() {
        let mut config = RobotConfig::new();
        config.layout.robot_lane = 2;
        assert_eq!(config.validate(), Err(ConfigError::LaneOverlapsGrid));

        let mut config = RobotConfig::new();
        config.layout.player_lane = 7;
        assert_eq!(config.validate(), Err(ConfigError::LaneOutOfRange));

        let mut config = RobotConfig::new();
        config.layout.player_lane = 4;
        assert_eq!(config.validate(), Err(ConfigError::LanesCoincide));

        let mut config = RobotConfig::new();
        config.layout.rest = Position::new(5, 2);
        assert_eq!(config.validate(), Err(ConfigError::RestOutOfRange));
    }

    #[test]
    fn test_rejects_pointer_order() {
        let mut config = RobotConfig::new();
        config.pointer.half_player = -90;
        assert_eq!(config.validate(), Err(ConfigError::PointerOutOfOrder));
    }

    #[test]
    fn test_rejects_zero_poll() {
        let mut config = RobotConfig::new();
        config.timing.button_poll_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidPollInterval));
    }

    #[test]
    fn test_pointer_angles() {
        let pointer = PointerConfig::default();
        assert_eq!(pointer.angle(PointerTarget::Player), -87);
        assert_eq!(pointer.angle(PointerTarget::Robot), 87);
        assert_eq!(pointer.angle(PointerTarget::Center), 0);
        assert_eq!(pointer.angle(PointerTarget::HalfPlayer), -44);
        assert_eq!(pointer.angle(PointerTarget::HalfRobot), 44);
    }
}
