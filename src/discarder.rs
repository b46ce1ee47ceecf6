use crate::config::RunRequest;
use crate::draw::DrawSimulation;
use crate::engine::{Engine, EngineConfig, Progress, RunHandle, RunOutcome};
use crate::error::DiscarderResult;
use crate::exhaustive::{self, combinations};
use crate::tally::Tally;

/// Estimates category odds for one held hand, enumerating exactly when the
/// draw space is small enough and sampling in parallel otherwise.
pub struct Discarder {
    engine: Engine<DrawSimulation>,
    total_iterations: u64,
    exhaustive_limit: Option<u64>,
}

impl Discarder {
    pub fn from_request(request: &RunRequest) -> DiscarderResult<Self> {
        let (simulation, config) = request.validate()?;
        Ok(Self::new(
            simulation,
            config,
            request.seed,
            request.total_iterations,
            request.exhaustive_limit,
        ))
    }

    pub fn new(
        simulation: DrawSimulation,
        config: EngineConfig,
        seed: u64,
        total_iterations: u64,
        exhaustive_limit: Option<u64>,
    ) -> Self {
        Discarder {
            engine: Engine::new(simulation, config, seed),
            total_iterations,
            exhaustive_limit,
        }
    }

    pub fn simulation(&self) -> &DrawSimulation {
        self.engine.simulation()
    }

    /// Number of distinct draws, when it fits in a `u64`.
    pub fn draw_space(&self) -> Option<u64> {
        let simulation = self.simulation();
        combinations(simulation.deck().len(), simulation.draw_count())
    }

    pub fn uses_enumeration(&self) -> bool {
        match (self.exhaustive_limit, self.draw_space()) {
            (Some(limit), Some(space)) => space <= limit,
            _ => false,
        }
    }

    /// Starts resolving the request in the background, enumerating exactly
    /// when the draw space is within the limit and sampling otherwise.
    pub fn spawn<F>(&self, subscriber: F) -> DiscarderResult<RunHandle<Tally>>
    where
        F: FnMut(&Progress<'_, Tally>) + Send + 'static,
    {
        if self.uses_enumeration() {
            log::info!(
                "draw space of {:?} within limit, enumerating exactly",
                self.draw_space()
            );
            let simulation = self.simulation().clone();
            return RunHandle::resolve_with(move || exhaustive::enumerate(&simulation), subscriber);
        }
        self.engine.spawn(self.total_iterations, subscriber)
    }

    /// Resolves the request, publishing progress as it goes.
    pub fn run<F>(&self, subscriber: F) -> DiscarderResult<RunOutcome<Tally>>
    where
        F: FnMut(&Progress<'_, Tally>) + Send + 'static,
    {
        self.spawn(subscriber)?.join()
    }
}
