use std::collections::HashSet;

use crate::cards::{Card, Deck};
use crate::error::{ConfigError, DiscarderResult};
use crate::hand_evaluator::Classifier;
use crate::random::RandomStream;
use crate::sampler::Sampler;
use crate::simulation::Simulation;
use crate::tally::Tally;

/// Held cards topped up with random draws from the deck until the hand
/// reaches the target size, then classified.
#[derive(Debug, Clone)]
pub struct DrawSimulation {
    held: Vec<Card>,
    deck: Deck,
    target_hand_size: usize,
}

/// Worker-private scratch for [`DrawSimulation`].
#[derive(Debug, Clone)]
pub struct DrawContext {
    classifier: Classifier,
    sampler: Sampler,
    hand: Vec<Card>,
}

impl DrawSimulation {
    pub fn new(held: Vec<Card>, deck: Deck, target_hand_size: usize) -> DiscarderResult<Self> {
        if target_hand_size < held.len() {
            return Err(ConfigError::HandExceedsTarget {
                held: held.len(),
                target: target_hand_size,
            }
            .into());
        }
        let draw_count = target_hand_size - held.len();
        if draw_count > deck.len() {
            return Err(ConfigError::NotEnoughDeck {
                requested: draw_count,
                available: deck.len(),
            }
            .into());
        }

        let held_set: HashSet<Card> = held.iter().copied().collect();
        let mut seen = HashSet::with_capacity(deck.len());
        for &card in &deck.cards {
            if held_set.contains(&card) {
                return Err(ConfigError::OverlappingCard(card).into());
            }
            if !seen.insert(card) {
                return Err(ConfigError::DuplicateDeckCard(card).into());
            }
        }

        Ok(DrawSimulation {
            held,
            deck,
            target_hand_size,
        })
    }

    pub fn held(&self) -> &[Card] {
        &self.held
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn target_hand_size(&self) -> usize {
        self.target_hand_size
    }

    pub fn draw_count(&self) -> usize {
        self.target_hand_size - self.held.len()
    }
}

impl Simulation for DrawSimulation {
    type Context = DrawContext;
    type Output = Tally;

    fn make_context(&self) -> DrawContext {
        let mut hand = Vec::with_capacity(self.target_hand_size);
        hand.extend_from_slice(&self.held);
        // Placeholder draw slots, overwritten on every trial.
        hand.extend(self.deck.cards.iter().take(self.draw_count()));
        DrawContext {
            classifier: Classifier::new(),
            sampler: Sampler::with_capacity(self.deck.len()),
            hand,
        }
    }

    #[inline]
    fn trial(&self, context: &mut DrawContext, rng: &mut RandomStream, output: &mut Tally) {
        let held_count = self.held.len();
        context
            .sampler
            .draw_into(&self.deck.cards, rng, &mut context.hand[held_count..]);
        output.record(context.classifier.classify(&context.hand));
    }
}
