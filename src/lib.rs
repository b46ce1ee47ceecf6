//! Parallel Monte Carlo estimation of which poker hand categories a held
//! hand can reach once it is topped up with random draws from a deck.

pub mod cards;
pub mod config;
pub mod discarder;
pub mod display;
pub mod draw;
pub mod engine;
pub mod error;
pub mod exhaustive;
pub mod hand_evaluator;
pub mod random;
pub mod sampler;
pub mod simulation;
pub mod tally;
mod worker;

pub use cards::{parse_card, parse_cards, Card, Deck, Rank, Suit};
pub use config::RunRequest;
pub use discarder::Discarder;
pub use draw::DrawSimulation;
pub use engine::{CancelToken, Engine, EngineConfig, Progress, RunHandle, RunOutcome, RunState};
pub use error::{ConfigError, DiscarderError, DiscarderResult};
pub use hand_evaluator::{classify, CategorySet, Classifier, HandCategory};
pub use random::RandomStream;
pub use tally::Tally;
