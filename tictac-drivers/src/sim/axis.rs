//! Simulated actuators and delay

use core::cell::RefCell;

use embedded_hal::delay::DelayNs;
use tictac_core::motion::Axis;
use tictac_core::traits::{AxisActuator, AxisError, Direction, StopMode};

use super::world::World;

/// One simulated motor
pub struct SimAxis<'a> {
    axis: Axis,
    world: &'a RefCell<World>,
}

impl<'a> SimAxis<'a> {
    pub fn new(axis: Axis, world: &'a RefCell<World>) -> Self {
        Self { axis, world }
    }
}

impl AxisActuator for SimAxis<'_> {
    fn move_absolute(
        &mut self,
        target: i32,
        speed: u16,
        _stop: StopMode,
        blocking: bool,
    ) -> Result<(), AxisError> {
        if speed == 0 {
            return Err(AxisError::InvalidCommand);
        }
        self.world
            .borrow_mut()
            .move_axis(self.axis, target, speed, blocking)
    }

    fn run_until_stalled(
        &mut self,
        direction: Direction,
        speed: u16,
        _stop: StopMode,
        duty_limit: u8,
    ) -> Result<i32, AxisError> {
        if speed == 0 || duty_limit == 0 || duty_limit > 100 {
            return Err(AxisError::InvalidCommand);
        }
        self.world.borrow_mut().stall(self.axis, direction, speed)
    }

    fn reset_reference_zero(&mut self, value: i32) {
        self.world.borrow_mut().reset_reference(self.axis, value);
    }

    fn is_motion_complete(&self) -> bool {
        self.world.borrow().is_complete(self.axis)
    }

    fn position(&self) -> i32 {
        self.world.borrow().position(self.axis)
    }
}

/// Delay that advances the simulated clock instead of sleeping
pub struct SimDelay<'a> {
    world: &'a RefCell<World>,
}

impl<'a> SimDelay<'a> {
    pub fn new(world: &'a RefCell<World>) -> Self {
        Self { world }
    }
}

impl DelayNs for SimDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.world.borrow_mut().advance(u64::from(ns));
    }
}
