//! The seam between the parallel engine and whatever is being simulated.
//!
//! The engine only needs to know how to build one private scratch context
//! per worker, how to run a single trial into a local accumulator, and how
//! to fold accumulators together.

use crate::random::RandomStream;

/// A partial result that can be summed with another.
///
/// `merge` must be associative and commutative; the engine merges batches
/// in arrival order.
pub trait Accumulator: Default + Clone + Send + 'static {
    fn merge(&mut self, other: &Self);

    /// Trials folded into this accumulator so far.
    fn iterations(&self) -> u64;
}

pub trait Simulation: Send + Sync + 'static {
    type Context: Send;
    type Output: Accumulator;

    fn make_context(&self) -> Self::Context;

    /// Runs one trial and folds it into `output`. Must count the trial in
    /// `output.iterations()`.
    fn trial(&self, context: &mut Self::Context, rng: &mut RandomStream, output: &mut Self::Output);
}
