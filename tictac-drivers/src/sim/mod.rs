//! Simulated gantry
//!
//! A deterministic stand-in for the whole machine, used by the
//! integration tests and the host simulator. All parts share one
//! [`World`] through a `RefCell`; the clock only moves when something
//! waits or travels.

mod axis;
mod human;
mod indicator;
pub mod world;

use core::cell::{Ref, RefCell, RefMut};

use tictac_core::config::RobotConfig;
use tictac_core::motion::{Axes, Axis, MotionController};

pub use axis::{SimAxis, SimDelay};
pub use human::{HumanPlayer, ScriptedHuman, SimHuman};
pub use indicator::SimIndicator;
pub use world::{World, BASEPLATE, GRID_FLOOR};

/// Owner of the simulated world
pub struct Gantry {
    world: RefCell<World>,
    config: RobotConfig,
}

impl Gantry {
    /// Both lanes full, grid empty
    pub fn new(config: &RobotConfig) -> Self {
        Self::with_world(config, World::new(config))
    }

    pub fn with_world(config: &RobotConfig, world: World) -> Self {
        Self {
            world: RefCell::new(world),
            config: *config,
        }
    }

    pub fn world(&self) -> Ref<'_, World> {
        self.world.borrow()
    }

    pub fn world_mut(&self) -> RefMut<'_, World> {
        self.world.borrow_mut()
    }

    pub fn axis(&self, axis: Axis) -> SimAxis<'_> {
        SimAxis::new(axis, &self.world)
    }

    pub fn delay(&self) -> SimDelay<'_> {
        SimDelay::new(&self.world)
    }

    /// Motion controller wired to the simulated axes
    pub fn motion(&self) -> MotionController<SimAxis<'_>, SimDelay<'_>> {
        let axes = Axes::new(
            self.axis(Axis::X),
            self.axis(Axis::Y),
            self.axis(Axis::Z),
            self.axis(Axis::Pointer),
        );
        MotionController::new(axes, self.delay(), &self.config)
    }

    /// Button panel operated by a simulated human
    pub fn human<P: HumanPlayer>(&self, player: P) -> SimHuman<'_, P> {
        SimHuman::new(&self.world, player, self.config.layout.player_lane)
    }
}
