//! Randomness source
//!
//! The starting side and the robot's moves are uniform random choices.
//! The engine only ever needs "an index below `bound`", which keeps
//! scripted sources trivial to write.

use rand::{Rng, RngCore};

/// Source of uniform random indices
pub trait RandomSource {
    /// Return a uniformly distributed index in `0..bound`
    ///
    /// `bound` is never zero. Implementations that return an index
    /// `>= bound` are wrapped by the caller.
    fn index(&mut self, bound: usize) -> usize;

    /// Fair coin flip
    fn coin(&mut self) -> bool {
        self.index(2) == 0
    }
}

/// Adapter from any [`RngCore`] generator
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl<R: RngCore> RandomSource for RngSource<R> {
    fn index(&mut self, bound: usize) -> usize {
        self.0.gen_range(0..bound)
    }
}
