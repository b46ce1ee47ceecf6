use thiserror::Error;

use crate::cards::Card;

#[derive(Error, Debug)]
pub enum DiscarderError {
    #[error("Invalid rank: {0}")]
    InvalidRank(String),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("A simulation thread panicked")]
    WorkerPanicked,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Rejections raised before any worker is launched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Target hand size {target} is smaller than the {held} held cards")]
    HandExceedsTarget { held: usize, target: usize },

    #[error("Cannot draw {requested} cards, only {available} in the deck")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Iteration count must be positive")]
    NoIterations,

    #[error("Batch size must be positive")]
    ZeroBatchSize,

    #[error("Worker count must be positive")]
    NoWorkers,

    #[error("Card {0} is both held and in the deck")]
    OverlappingCard(Card),

    #[error("Card {0} appears more than once in the deck")]
    DuplicateDeckCard(Card),
}

impl DiscarderError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, DiscarderError::Configuration(_))
    }
}

pub type DiscarderResult<T> = Result<T, DiscarderError>;
