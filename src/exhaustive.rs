//! Exact enumeration for draw spaces small enough to walk completely.

use itertools::Itertools;

use crate::draw::DrawSimulation;
use crate::hand_evaluator::Classifier;
use crate::tally::Tally;

/// Draw spaces at or below this many combinations are cheap to enumerate.
pub const DEFAULT_EXHAUSTIVE_LIMIT: u64 = 30_000;

/// `n choose k`, or `None` when it does not fit in a `u64`.
pub fn combinations(n: usize, k: usize) -> Option<u64> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k) as u64;
    let n = n as u64;
    let mut result: u64 = 1;
    for i in 0..k {
        // result * (n - i) is always divisible by (i + 1) here.
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}

/// Classifies every possible draw exactly once.
pub fn enumerate(simulation: &DrawSimulation) -> Tally {
    let held = simulation.held();
    let draw_count = simulation.draw_count();
    let mut classifier = Classifier::new();
    let mut tally = Tally::new();
    let mut hand = Vec::with_capacity(simulation.target_hand_size());

    for draw in simulation.deck().cards.iter().combinations(draw_count) {
        hand.clear();
        hand.extend_from_slice(held);
        hand.extend(draw.into_iter().copied());
        tally.record(classifier.classify(&hand));
    }

    log::debug!(
        "enumerated {} draws of {} from {} cards",
        tally.iterations(),
        draw_count,
        simulation.deck().len()
    );
    tally
}
