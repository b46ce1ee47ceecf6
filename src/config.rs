use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cards::{Card, Deck};
use crate::draw::DrawSimulation;
use crate::engine::{default_workers, EngineConfig};
use crate::error::{ConfigError, DiscarderResult};

/// Everything needed to start one run. Cards use the text form (`"AS"`,
/// `"10H"`) when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunRequest {
    pub held_cards: Vec<Card>,
    pub deck: Vec<Card>,
    pub target_hand_size: usize,
    pub seed: u64,
    pub total_iterations: u64,
    pub batch_size: u64,
    /// Defaults to the available hardware parallelism.
    #[serde(default)]
    pub workers: Option<usize>,
    /// Enumerate exactly when the draw space has at most this many
    /// combinations.
    #[serde(default)]
    pub exhaustive_limit: Option<u64>,
}

impl RunRequest {
    pub fn new(
        held_cards: Vec<Card>,
        deck: Vec<Card>,
        target_hand_size: usize,
        seed: u64,
        total_iterations: u64,
        batch_size: u64,
    ) -> Self {
        RunRequest {
            held_cards,
            deck,
            target_hand_size,
            seed,
            total_iterations,
            batch_size,
            workers: None,
            exhaustive_limit: None,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_exhaustive_limit(mut self, limit: u64) -> Self {
        self.exhaustive_limit = Some(limit);
        self
    }

    pub fn from_json(json: &str) -> DiscarderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> DiscarderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            workers: self.workers.unwrap_or_else(default_workers),
            batch_size: self.batch_size,
        }
    }

    /// Checks every field and builds the simulation it describes.
    pub fn validate(&self) -> DiscarderResult<(DrawSimulation, EngineConfig)> {
        let simulation = DrawSimulation::new(
            self.held_cards.clone(),
            Deck::new(self.deck.clone()),
            self.target_hand_size,
        )?;
        if self.total_iterations == 0 {
            return Err(ConfigError::NoIterations.into());
        }
        let engine = self.engine_config();
        engine.validate()?;
        Ok((simulation, engine))
    }
}
