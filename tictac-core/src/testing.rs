//! Test doubles shared by the unit tests
//!
//! `Rig` stands in for the whole machine at the actuator level: moves
//! always complete, and every Z stall run pops the next scripted height.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::config::RobotConfig;
use crate::motion::{Axes, Axis, MotionController};
use crate::traits::{
    AxisActuator, AxisError, Color, Direction, Indicator, InputPanel, RandomSource, StopMode,
};

/// Baseplate height reported once the script runs dry
pub const FLOOR: i32 = 618;

pub struct Rig {
    heights: RefCell<VecDeque<i32>>,
    trace: RefCell<Vec<(Axis, i32)>>,
    elapsed_ms: Cell<u64>,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_heights(&[])
    }

    pub fn with_heights(heights: &[i32]) -> Self {
        Self {
            heights: RefCell::new(heights.iter().copied().collect()),
            trace: RefCell::new(Vec::new()),
            elapsed_ms: Cell::new(0),
        }
    }

    pub fn push_heights(&self, heights: &[i32]) {
        self.heights.borrow_mut().extend(heights.iter().copied());
    }

    /// Every `move_absolute` call as (axis, target)
    pub fn trace(&self) -> Vec<(Axis, i32)> {
        self.trace.borrow().clone()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms.get()
    }

    pub fn motion<'a>(&'a self, config: &RobotConfig) -> MotionController<RigAxis<'a>, RigDelay<'a>> {
        let axes = Axes::new(
            RigAxis::new(Axis::X, self),
            RigAxis::new(Axis::Y, self),
            RigAxis::new(Axis::Z, self),
            RigAxis::new(Axis::Pointer, self),
        );
        MotionController::new(axes, RigDelay { rig: self }, config)
    }
}

pub struct RigAxis<'a> {
    axis: Axis,
    rig: &'a Rig,
    position: i32,
}

impl<'a> RigAxis<'a> {
    fn new(axis: Axis, rig: &'a Rig) -> Self {
        Self {
            axis,
            rig,
            position: 0,
        }
    }
}

impl AxisActuator for RigAxis<'_> {
    fn move_absolute(
        &mut self,
        target: i32,
        _speed: u16,
        _stop: StopMode,
        _blocking: bool,
    ) -> Result<(), AxisError> {
        self.rig.trace.borrow_mut().push((self.axis, target));
        self.position = target;
        Ok(())
    }

    fn run_until_stalled(
        &mut self,
        direction: Direction,
        _speed: u16,
        _stop: StopMode,
        _duty_limit: u8,
    ) -> Result<i32, AxisError> {
        self.position = match (self.axis, direction) {
            (Axis::Z, Direction::Positive) => {
                self.rig.heights.borrow_mut().pop_front().unwrap_or(FLOOR)
            }
            _ => -4,
        };
        Ok(self.position)
    }

    fn reset_reference_zero(&mut self, value: i32) {
        self.position = value;
    }

    fn is_motion_complete(&self) -> bool {
        true
    }

    fn position(&self) -> i32 {
        self.position
    }
}

pub struct RigDelay<'a> {
    rig: &'a Rig,
}

impl DelayNs for RigDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.rig.elapsed_ms.set(self.rig.elapsed_ms.get() + u64::from(ms));
    }
}

/// Records every indicator change
#[derive(Default)]
pub struct Lamp {
    pub history: Vec<(Color, bool)>,
}

impl Lamp {
    /// Current color and whether it blinks
    pub fn last(&self) -> Option<(Color, bool)> {
        self.history.last().copied()
    }
}

impl Indicator for Lamp {
    fn set_color(&mut self, color: Color) {
        self.history.push((color, false));
    }

    fn blink(&mut self, color: Color, _on_ms: u16, _off_ms: u16) {
        self.history.push((color, true));
    }
}

/// Button pressed once per entry, after that many unpressed polls
pub struct Panel {
    presses: VecDeque<u32>,
    pub abort_log: Vec<bool>,
}

impl Panel {
    pub fn pressing(presses: &[u32]) -> Self {
        Self {
            presses: presses.iter().copied().collect(),
            abort_log: Vec::new(),
        }
    }

    pub fn never() -> Self {
        Self::pressing(&[])
    }
}

impl InputPanel for Panel {
    fn is_button_pressed(&mut self) -> bool {
        match self.presses.front_mut() {
            Some(0) => {
                self.presses.pop_front();
                true
            }
            Some(n) => {
                *n -= 1;
                false
            }
            None => false,
        }
    }

    fn set_abort_enabled(&mut self, enabled: bool) {
        self.abort_log.push(enabled);
    }
}

/// Replays a fixed list of indices, then repeats the last one
pub struct Scripted {
    values: VecDeque<usize>,
    last: usize,
}

impl Scripted {
    pub fn new(values: &[usize]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            last: 0,
        }
    }
}

impl RandomSource for Scripted {
    fn index(&mut self, _bound: usize) -> usize {
        if let Some(value) = self.values.pop_front() {
            self.last = value;
        }
        self.last
    }
}
