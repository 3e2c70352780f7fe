//! Multi-axis motion sequencing
//!
//! Builds the carriage primitives (travel, pick, drop, stall descent,
//! homing) on top of four [`AxisActuator`]s. Every primitive is blocking:
//! a call returns only after the mechanics have come to rest. The single
//! exception inside a primitive is horizontal travel, where X and Y are
//! commanded back to back and then awaited together.

use core::fmt;

use embedded_hal::delay::DelayNs;

use crate::config::{DriveConfig, PointerConfig, PointerTarget, RobotConfig, TimingConfig};
use crate::traits::{AxisActuator, AxisError, Direction, StopMode};

use super::mapper::CoordinateMapper;
use super::position::{Axis, Position};

/// The four actuators of the robot
#[derive(Debug)]
pub struct Axes<A> {
    pub x: A,
    pub y: A,
    pub z: A,
    pub pointer: A,
}

impl<A> Axes<A> {
    /// Bundle four actuators
    pub fn new(x: A, y: A, z: A, pointer: A) -> Self {
        Self { x, y, z, pointer }
    }

    /// Get an actuator mutably by axis
    pub fn get_mut(&mut self, axis: Axis) -> &mut A {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
            Axis::Pointer => &mut self.pointer,
        }
    }
}

/// A failed motion primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionError {
    /// Axis that failed
    pub axis: Axis,
    /// What went wrong
    pub kind: AxisError,
}

impl MotionError {
    /// Create a motion error
    pub const fn new(axis: Axis, kind: AxisError) -> Self {
        Self { axis, kind }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} axis failed: {:?}", self.axis, self.kind)
    }
}

/// Motion controller
///
/// Owns the actuators and the delay provider. Z positions grow downward
/// from the homed top (0); the pointer is referenced so that its homing
/// stop reads as the player angle.
pub struct MotionController<A, D> {
    axes: Axes<A>,
    delay: D,
    mapper: CoordinateMapper,
    drives: DriveConfig,
    pointer: PointerConfig,
    timing: TimingConfig,
    /// Z target where the magnet meets a brick
    brick_depth: i32,
    /// Carriage rest position
    rest: Position,
    /// Last position reached by `move_to`, `None` when between cells
    position: Option<Position>,
}

impl<A: AxisActuator, D: DelayNs> MotionController<A, D> {
    /// Create a motion controller from a validated configuration
    pub fn new(axes: Axes<A>, delay: D, config: &RobotConfig) -> Self {
        Self {
            axes,
            delay,
            mapper: CoordinateMapper::new(config.calibration),
            drives: config.drives,
            pointer: config.pointer,
            timing: config.timing,
            brick_depth: config.sensing.brick_depth,
            rest: config.layout.rest,
            position: None,
        }
    }

    /// Get the coordinate mapper
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Get the actuators
    pub fn axes(&self) -> &Axes<A> {
        &self.axes
    }

    /// Last cell the carriage stopped over
    pub fn position(&self) -> Option<Position> {
        self.position
    }

    /// Check if the carriage is parked at the rest position
    pub fn is_at_rest(&self) -> bool {
        self.position == Some(self.rest)
    }

    /// Establish the reference frame of every axis
    ///
    /// Each axis is driven into its negative mechanical stop under a
    /// reduced duty limit and the stall position becomes its zero. The
    /// magnet goes first so the carriage never drags it across bricks.
    pub fn home(&mut self) -> Result<(), MotionError> {
        for axis in [Axis::Z, Axis::X, Axis::Y] {
            let drive = *self.drives.get(axis);
            let stopped = self
                .axes
                .get_mut(axis)
                .run_until_stalled(
                    Direction::Negative,
                    drive.speed,
                    StopMode::CoastSmart,
                    drive.stall_duty,
                )
                .map_err(|kind| MotionError::new(axis, kind))?;
            debug!("{:?} homed, stalled at {}", axis, stopped);
            self.axes.get_mut(axis).reset_reference_zero(0);
            self.settle();
        }

        // The pointer stop is bricked in at the player angle
        let drive = self.drives.pointer;
        self.axes
            .pointer
            .run_until_stalled(
                Direction::Negative,
                drive.speed,
                StopMode::Coast,
                drive.stall_duty,
            )
            .map_err(|kind| MotionError::new(Axis::Pointer, kind))?;
        self.axes.pointer.reset_reference_zero(self.pointer.player);
        self.settle();

        self.drive_pointer(self.pointer.center, StopMode::Hold)?;
        self.position = None;
        info!("All axes homed");
        Ok(())
    }

    /// Travel to a board position with X and Y moving together
    pub fn move_to(&mut self, position: Position) -> Result<(), MotionError> {
        let (x, y) = self.mapper.target(position);
        // Unknown until both axes report completion
        self.position = None;

        self.axes
            .x
            .move_absolute(x, self.drives.x.speed, StopMode::CoastSmart, false)
            .map_err(|kind| MotionError::new(Axis::X, kind))?;
        self.axes
            .y
            .move_absolute(y, self.drives.y.speed, StopMode::CoastSmart, false)
            .map_err(|kind| MotionError::new(Axis::Y, kind))?;

        self.wait_horizontal()?;
        self.position = Some(position);
        Ok(())
    }

    /// Travel to the rest position
    pub fn rest(&mut self) -> Result<(), MotionError> {
        self.move_to(self.rest)
    }

    /// Pick up the brick under `position`
    pub fn pick_at(&mut self, position: Position) -> Result<(), MotionError> {
        self.move_to(position)?;
        self.lower_to_brick()?;
        // Give the magnet time to grip
        self.delay.delay_ms(self.timing.pick_settle_ms);
        self.raise()
    }

    /// Put the carried brick down at `position`
    ///
    /// Lifting straight up would take the brick with it. Sliding half a
    /// cell toward the player while the magnet is still down peels the
    /// brick off instead.
    pub fn drop_at(&mut self, position: Position) -> Result<(), MotionError> {
        self.move_to(position)?;
        self.lower_to_brick()?;
        self.settle();
        self.slide_to_next_line(position.line)?;
        self.raise()
    }

    /// Two-phase descent for sensing
    ///
    /// Fast to `approach_depth`, then a stall run at `duty_limit`.
    /// Returns the Z position where the magnet stopped.
    pub fn stall_descend(&mut self, approach_depth: i32, duty_limit: u8) -> Result<i32, MotionError> {
        let speed = self.drives.z.speed;
        self.axes
            .z
            .move_absolute(approach_depth, speed, StopMode::CoastSmart, true)
            .map_err(|kind| MotionError::new(Axis::Z, kind))?;
        self.settle();

        let height = self
            .axes
            .z
            .run_until_stalled(Direction::Positive, speed, StopMode::Coast, duty_limit)
            .map_err(|kind| MotionError::new(Axis::Z, kind))?;
        self.settle();
        Ok(height)
    }

    /// Slide Y to the midpoint between `line` and the next line
    pub fn slide_to_next_line(&mut self, line: u8) -> Result<(), MotionError> {
        let target = self.mapper.midpoint_line(line);
        self.axes
            .y
            .move_absolute(target, self.drives.y.speed, StopMode::Hold, true)
            .map_err(|kind| MotionError::new(Axis::Y, kind))?;
        self.position = None;
        self.settle();
        Ok(())
    }

    /// Raise the magnet to the top
    pub fn raise(&mut self) -> Result<(), MotionError> {
        self.axes
            .z
            .move_absolute(0, self.drives.z.speed, StopMode::Hold, true)
            .map_err(|kind| MotionError::new(Axis::Z, kind))
    }

    /// Turn the pointer to a named target
    pub fn point_to(&mut self, target: PointerTarget) -> Result<(), MotionError> {
        self.drive_pointer(self.pointer.angle(target), StopMode::Coast)
    }

    /// Block for `ms` milliseconds
    pub fn pause(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }

    /// Short pause after a completed action
    pub fn settle(&mut self) {
        self.delay.delay_ms(self.timing.settle_ms);
    }

    fn lower_to_brick(&mut self) -> Result<(), MotionError> {
        self.axes
            .z
            .move_absolute(self.brick_depth, self.drives.z.speed, StopMode::Hold, true)
            .map_err(|kind| MotionError::new(Axis::Z, kind))
    }

    fn drive_pointer(&mut self, angle: i32, stop: StopMode) -> Result<(), MotionError> {
        self.axes
            .pointer
            .move_absolute(angle, self.drives.pointer.speed, stop, true)
            .map_err(|kind| MotionError::new(Axis::Pointer, kind))
    }

    /// Poll both horizontal axes until they report completion
    fn wait_horizontal(&mut self) -> Result<(), MotionError> {
        let poll_ms = self.timing.motion_poll_ms;
        let mut waited_ms: u32 = 0;

        loop {
            let x_done = self.axes.x.is_motion_complete();
            let y_done = self.axes.y.is_motion_complete();
            if x_done && y_done {
                return Ok(());
            }

            if let Some(timeout_ms) = self.timing.motion_timeout_ms {
                if waited_ms >= timeout_ms {
                    let axis = if x_done { Axis::Y } else { Axis::X };
                    warn!("{:?} axis still moving after {} ms", axis, waited_ms);
                    return Err(MotionError::new(axis, AxisError::Timeout));
                }
            }

            self.delay.delay_ms(poll_ms);
            waited_ms = waited_ms.saturating_add(poll_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::RefCell;
    use heapless::Vec;

    /// One recorded actuator call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Move {
            axis: Axis,
            target: i32,
            blocking: bool,
        },
        Stall {
            axis: Axis,
            direction: Direction,
            duty: u8,
        },
        Reset {
            axis: Axis,
            value: i32,
        },
        Delay(u32),
    }

    /// Shared call log for all mock actuators
    struct Log {
        calls: RefCell<Vec<Call, 128>>,
        /// Polls each non-blocking move reports busy
        busy_polls: u32,
        /// Height reported by Z stall runs
        stall_height: i32,
    }

    impl Log {
        fn new(busy_polls: u32) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                busy_polls,
                stall_height: 390,
            }
        }

        fn push(&self, call: Call) {
            self.calls.borrow_mut().push(call).unwrap();
        }

        fn moves(&self) -> std::vec::Vec<Call> {
            self.calls
                .borrow()
                .iter()
                .copied()
                .filter(|c| !matches!(c, Call::Delay(_)))
                .collect()
        }
    }

    struct MockAxis<'a> {
        axis: Axis,
        log: &'a Log,
        position: i32,
        busy: RefCell<u32>,
        jammed: bool,
    }

    impl<'a> MockAxis<'a> {
        fn new(axis: Axis, log: &'a Log) -> Self {
            Self {
                axis,
                log,
                position: 500,
                busy: RefCell::new(0),
                jammed: false,
            }
        }
    }

    impl AxisActuator for MockAxis<'_> {
        fn move_absolute(
            &mut self,
            target: i32,
            _speed: u16,
            _stop: StopMode,
            blocking: bool,
        ) -> Result<(), AxisError> {
            self.log.push(Call::Move {
                axis: self.axis,
                target,
                blocking,
            });
            self.position = target;
            if !blocking {
                *self.busy.borrow_mut() = self.log.busy_polls;
            }
            Ok(())
        }

        fn run_until_stalled(
            &mut self,
            direction: Direction,
            _speed: u16,
            _stop: StopMode,
            duty_limit: u8,
        ) -> Result<i32, AxisError> {
            self.log.push(Call::Stall {
                axis: self.axis,
                direction,
                duty: duty_limit,
            });
            self.position = if self.axis == Axis::Z && direction == Direction::Positive {
                self.log.stall_height
            } else {
                -3
            };
            Ok(self.position)
        }

        fn reset_reference_zero(&mut self, value: i32) {
            self.log.push(Call::Reset {
                axis: self.axis,
                value,
            });
            self.position = value;
        }

        fn is_motion_complete(&self) -> bool {
            if self.jammed {
                return false;
            }
            let mut busy = self.busy.borrow_mut();
            if *busy == 0 {
                true
            } else {
                *busy -= 1;
                false
            }
        }

        fn position(&self) -> i32 {
            self.position
        }
    }

    struct MockDelay<'a> {
        log: &'a Log,
    }

    impl DelayNs for MockDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.log.push(Call::Delay(ns / 1_000_000));
        }

        fn delay_ms(&mut self, ms: u32) {
            self.log.push(Call::Delay(ms));
        }
    }

    fn controller<'a>(log: &'a Log, config: &RobotConfig) -> MotionController<MockAxis<'a>, MockDelay<'a>> {
        let axes = Axes::new(
            MockAxis::new(Axis::X, log),
            MockAxis::new(Axis::Y, log),
            MockAxis::new(Axis::Z, log),
            MockAxis::new(Axis::Pointer, log),
        );
        MotionController::new(axes, MockDelay { log }, config)
    }

    #[test]
    fn test_move_to_commands_both_axes_before_waiting() {
        let log = Log::new(3);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        motion.move_to(Position::new(2, 3)).unwrap();

        let calls = log.calls.borrow();
        // X and Y are both commanded non-blocking before the first poll delay
        assert_eq!(
            calls[0],
            Call::Move {
                axis: Axis::X,
                target: 120 + 3 * 632,
                blocking: false
            }
        );
        assert_eq!(
            calls[1],
            Call::Move {
                axis: Axis::Y,
                target: 375 + 2 * 1048,
                blocking: false
            }
        );
        // Both axes busy for 3 polls: exactly 3 poll delays
        let polls = calls.iter().filter(|c| **c == Call::Delay(10)).count();
        assert_eq!(polls, 3);
        assert_eq!(motion.position(), Some(Position::new(2, 3)));
    }

    #[test]
    fn test_pick_lowers_only_after_travel() {
        let log = Log::new(2);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        motion.pick_at(Position::new(1, 4)).unwrap();

        let calls = log.calls.borrow();
        let z_index = calls
            .iter()
            .position(|c| matches!(c, Call::Move { axis: Axis::Z, .. }))
            .unwrap();
        let last_poll = calls
            .iter()
            .rposition(|c| *c == Call::Delay(config.timing.motion_poll_ms))
            .unwrap();
        assert!(z_index > last_poll);

        let moves = log.moves();
        assert_eq!(
            &moves[2..],
            &[
                Call::Move {
                    axis: Axis::Z,
                    target: 390,
                    blocking: true
                },
                Call::Move {
                    axis: Axis::Z,
                    target: 0,
                    blocking: true
                },
            ]
        );
        assert!(calls.contains(&Call::Delay(config.timing.pick_settle_ms)));
    }

    #[test]
    fn test_drop_slides_to_midpoint_before_raising() {
        let log = Log::new(0);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        motion.drop_at(Position::new(2, 2)).unwrap();

        let midpoint = (375 + 2 * 1048 + 375 + 3 * 1048) / 2;
        let moves = log.moves();
        assert_eq!(
            &moves[2..],
            &[
                Call::Move {
                    axis: Axis::Z,
                    target: 390,
                    blocking: true
                },
                Call::Move {
                    axis: Axis::Y,
                    target: midpoint,
                    blocking: true
                },
                Call::Move {
                    axis: Axis::Z,
                    target: 0,
                    blocking: true
                },
            ]
        );
        assert_eq!(motion.position(), None);
    }

    #[test]
    fn test_stall_descend_is_two_phase() {
        let log = Log::new(0);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        let height = motion.stall_descend(340, 13).unwrap();
        assert_eq!(height, 390);
        assert_eq!(
            log.moves(),
            std::vec![
                Call::Move {
                    axis: Axis::Z,
                    target: 340,
                    blocking: true
                },
                Call::Stall {
                    axis: Axis::Z,
                    direction: Direction::Positive,
                    duty: 13
                },
            ]
        );
    }

    #[test]
    fn test_home_order_and_references() {
        let log = Log::new(0);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        motion.home().unwrap();

        assert_eq!(
            log.moves(),
            std::vec![
                Call::Stall {
                    axis: Axis::Z,
                    direction: Direction::Negative,
                    duty: 17
                },
                Call::Reset {
                    axis: Axis::Z,
                    value: 0
                },
                Call::Stall {
                    axis: Axis::X,
                    direction: Direction::Negative,
                    duty: 87
                },
                Call::Reset {
                    axis: Axis::X,
                    value: 0
                },
                Call::Stall {
                    axis: Axis::Y,
                    direction: Direction::Negative,
                    duty: 80
                },
                Call::Reset {
                    axis: Axis::Y,
                    value: 0
                },
                Call::Stall {
                    axis: Axis::Pointer,
                    direction: Direction::Negative,
                    duty: 20
                },
                Call::Reset {
                    axis: Axis::Pointer,
                    value: -87
                },
                Call::Move {
                    axis: Axis::Pointer,
                    target: 0,
                    blocking: true
                },
            ]
        );
    }

    #[test]
    fn test_wait_times_out_on_jammed_axis() {
        let log = Log::new(0);
        let mut config = RobotConfig::default();
        config.timing.motion_timeout_ms = Some(50);
        let mut motion = controller(&log, &config);
        motion.axes.y.jammed = true;

        let result = motion.move_to(Position::new(0, 0));
        assert_eq!(result, Err(MotionError::new(Axis::Y, AxisError::Timeout)));
        assert_eq!(motion.position(), None);

        let polls = log
            .calls
            .borrow()
            .iter()
            .filter(|c| **c == Call::Delay(10))
            .count();
        assert_eq!(polls, 5);
    }

    #[test]
    fn test_failed_move_forgets_rest_position() {
        let log = Log::new(0);
        let mut config = RobotConfig::default();
        config.timing.motion_timeout_ms = Some(50);
        let mut motion = controller(&log, &config);

        motion.rest().unwrap();
        assert!(motion.is_at_rest());

        motion.axes.y.jammed = true;
        let result = motion.move_to(Position::new(0, 4));
        assert_eq!(result, Err(MotionError::new(Axis::Y, AxisError::Timeout)));
        assert!(!motion.is_at_rest());
        assert_eq!(motion.position(), None);
    }

    #[test]
    fn test_rest_and_pointer() {
        let log = Log::new(1);
        let config = RobotConfig::default();
        let mut motion = controller(&log, &config);

        assert!(!motion.is_at_rest());
        motion.rest().unwrap();
        assert!(motion.is_at_rest());

        motion.point_to(PointerTarget::Robot).unwrap();
        assert_eq!(motion.axes().pointer.position(), 87);
    }
}
