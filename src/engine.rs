//! Parallel Monte Carlo driver.
//!
//! A run splits its iteration budget into one share per worker, gives each
//! worker a child stream split off the run seed, and launches them on a
//! dedicated rayon pool. Workers hand finished batches over a channel to a
//! single coordinator thread, which is the only writer of the cumulative
//! result and the only caller of the subscriber.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{ConfigError, DiscarderError, DiscarderResult};
use crate::random::RandomStream;
use crate::simulation::{Accumulator, Simulation};
use crate::worker::{Worker, WorkerExit};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub workers: usize,
    /// Trials per handoff. Bounds both message size and progress latency.
    pub batch_size: u64,
}

impl EngineConfig {
    pub fn new(batch_size: u64) -> Self {
        EngineConfig {
            workers: default_workers(),
            batch_size,
        }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.batch_size == 0 {
            return Err(ConfigError::ZeroBatchSize);
        }
        Ok(())
    }
}

/// One worker per hardware thread.
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Splits `total` into `workers` shares that differ by at most one; the
/// first `total % workers` shares get the extra iteration.
pub fn shares(total: u64, workers: usize) -> Vec<u64> {
    if workers == 0 {
        return Vec::new();
    }
    let base = total / workers as u64;
    let remainder = (total % workers as u64) as usize;
    (0..workers)
        .map(|i| if i < remainder { base + 1 } else { base })
        .collect()
}

// ---------------------------------------------------------------------------
// Cancellation and run state
// ---------------------------------------------------------------------------

/// Cooperative stop flag. Workers check it once per trial.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RunState {
    Idle = 0,
    Splitting = 1,
    Running = 2,
    Draining = 3,
    Completed = 4,
    Cancelled = 5,
}

impl RunState {
    fn from_u8(value: u8) -> RunState {
        match value {
            1 => RunState::Splitting,
            2 => RunState::Running,
            3 => RunState::Draining,
            4 => RunState::Completed,
            5 => RunState::Cancelled,
            _ => RunState::Idle,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Completed | RunState::Cancelled)
    }
}

#[derive(Debug, Clone, Default)]
struct StateCell(Arc<AtomicU8>);

impl StateCell {
    fn set(&self, state: RunState) {
        self.0.store(state as u8, Ordering::Release);
    }

    fn get(&self) -> RunState {
        RunState::from_u8(self.0.load(Ordering::Acquire))
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// A published view of the cumulative result.
#[derive(Debug)]
pub struct Progress<'a, O> {
    pub cumulative: &'a O,
    pub total_iterations: u64,
}

impl<O: Accumulator> Progress<'_, O> {
    pub fn iterations(&self) -> u64 {
        self.cumulative.iterations()
    }

    pub fn fraction_completed(&self) -> f64 {
        if self.total_iterations == 0 {
            0.0
        } else {
            self.iterations() as f64 / self.total_iterations as f64
        }
    }
}

/// How a run resolved. A cancelled run keeps whatever had been merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome<O> {
    Completed(O),
    Cancelled(O),
}

impl<O> RunOutcome<O> {
    pub fn is_completed(&self) -> bool {
        matches!(self, RunOutcome::Completed(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunOutcome::Cancelled(_))
    }

    pub fn output(&self) -> &O {
        match self {
            RunOutcome::Completed(o) | RunOutcome::Cancelled(o) => o,
        }
    }

    pub fn into_output(self) -> O {
        match self {
            RunOutcome::Completed(o) | RunOutcome::Cancelled(o) => o,
        }
    }
}

/// Caller's side of a run in flight.
pub struct RunHandle<O> {
    cancel: CancelToken,
    state: StateCell,
    workers: usize,
    thread: JoinHandle<RunOutcome<O>>,
}

impl<O> RunHandle<O> {
    /// Requests an early stop. The run still has to be joined.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> RunState {
        self.state.get()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Blocks until the run resolves.
    pub fn join(self) -> DiscarderResult<RunOutcome<O>> {
        self.thread.join().map_err(|_| DiscarderError::WorkerPanicked)
    }
}

impl<O: Accumulator> RunHandle<O> {
    /// Runs `job` on a coordinator thread of its own and publishes its
    /// result once. The job never observes the cancel token, so the run
    /// always resolves as completed.
    pub(crate) fn resolve_with<J, F>(job: J, mut subscriber: F) -> DiscarderResult<Self>
    where
        J: FnOnce() -> O + Send + 'static,
        F: FnMut(&Progress<'_, O>) + Send + 'static,
    {
        let state = StateCell::default();
        state.set(RunState::Running);
        let run_state = state.clone();

        let thread = thread::Builder::new()
            .name("discarder-coordinator".to_string())
            .spawn(move || {
                let output = job();
                run_state.set(RunState::Draining);
                subscriber(&Progress {
                    cumulative: &output,
                    total_iterations: output.iterations(),
                });
                run_state.set(RunState::Completed);
                RunOutcome::Completed(output)
            })?;

        Ok(RunHandle {
            cancel: CancelToken::new(),
            state,
            workers: 1,
            thread,
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

pub struct Engine<S: Simulation> {
    simulation: Arc<S>,
    config: EngineConfig,
    seed: u64,
}

impl<S: Simulation> Engine<S> {
    pub fn new(simulation: S, config: EngineConfig, seed: u64) -> Self {
        Engine {
            simulation: Arc::new(simulation),
            config,
            seed,
        }
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Starts a run in the background and returns immediately.
    ///
    /// `subscriber` is called on the coordinator thread after every merged
    /// batch and once more when the run resolves. Configuration problems are
    /// reported here, before any thread is started.
    pub fn spawn<F>(&self, total_iterations: u64, mut subscriber: F) -> DiscarderResult<RunHandle<S::Output>>
    where
        F: FnMut(&Progress<'_, S::Output>) + Send + 'static,
    {
        if total_iterations == 0 {
            return Err(ConfigError::NoIterations.into());
        }
        self.config.validate()?;

        let state = StateCell::default();
        state.set(RunState::Splitting);

        let workers = self.config.workers;
        let batch_size = self.config.batch_size;
        let worker_shares = shares(total_iterations, workers);
        let streams = RandomStream::new(self.seed).split_n(workers);
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("discarder-worker-{}", i))
            .build()?;

        log::info!(
            "starting run: {} iterations on {} workers, batch size {}, seed {}",
            total_iterations,
            workers,
            batch_size,
            self.seed
        );

        let cancel = CancelToken::new();
        let simulation = Arc::clone(&self.simulation);
        let run = RunContext {
            pool,
            shares: worker_shares,
            streams,
            batch_size,
            total_iterations,
            cancel: cancel.clone(),
            state: state.clone(),
        };

        let thread = thread::Builder::new()
            .name("discarder-coordinator".to_string())
            .spawn(move || run.coordinate(&*simulation, &mut subscriber))?;

        Ok(RunHandle {
            cancel,
            state,
            workers,
            thread,
        })
    }

    /// Runs to resolution on the calling thread's behalf.
    pub fn run<F>(&self, total_iterations: u64, subscriber: F) -> DiscarderResult<RunOutcome<S::Output>>
    where
        F: FnMut(&Progress<'_, S::Output>) + Send + 'static,
    {
        self.spawn(total_iterations, subscriber)?.join()
    }
}

/// Stops the workers if the coordinator unwinds, e.g. from a panicking
/// subscriber, so nobody keeps feeding a channel that is no longer read.
struct StopOnPanic<'a> {
    cancel: &'a CancelToken,
    state: &'a StateCell,
}

impl Drop for StopOnPanic<'_> {
    fn drop(&mut self) {
        if thread::panicking() {
            log::warn!("coordinator panicked, stopping workers");
            self.cancel.cancel();
            self.state.set(RunState::Cancelled);
        }
    }
}

struct RunContext {
    pool: ThreadPool,
    shares: Vec<u64>,
    streams: Vec<RandomStream>,
    batch_size: u64,
    total_iterations: u64,
    cancel: CancelToken,
    state: StateCell,
}

impl RunContext {
    fn coordinate<S, F>(self, simulation: &S, subscriber: &mut F) -> RunOutcome<S::Output>
    where
        S: Simulation,
        F: FnMut(&Progress<'_, S::Output>),
    {
        let RunContext {
            pool,
            shares,
            streams,
            batch_size,
            total_iterations,
            cancel,
            state,
        } = self;

        let interrupted = AtomicBool::new(false);
        let mut cumulative = S::Output::default();
        let (sender, receiver) = mpsc::channel::<S::Output>();

        state.set(RunState::Running);
        pool.in_place_scope(|scope| {
            for (id, (share, stream)) in shares.into_iter().zip(streams).enumerate() {
                if share == 0 {
                    continue;
                }
                let worker = Worker::new(
                    id,
                    simulation,
                    stream,
                    share,
                    batch_size,
                    sender.clone(),
                    cancel.clone(),
                );
                let interrupted = &interrupted;
                scope.spawn(move |_| {
                    if worker.run() != WorkerExit::Exhausted {
                        interrupted.store(true, Ordering::Relaxed);
                    }
                });
            }
            drop(sender);

            // Must live inside the scope: rayon waits for the workers before
            // it rethrows, so they have to see the stop while it unwinds.
            let _stop_on_panic = StopOnPanic {
                cancel: &cancel,
                state: &state,
            };
            for batch in receiver.iter() {
                cumulative.merge(&batch);
                if cancel.is_cancelled() {
                    state.set(RunState::Draining);
                }
                subscriber(&Progress {
                    cumulative: &cumulative,
                    total_iterations,
                });
            }
        });

        state.set(RunState::Draining);
        subscriber(&Progress {
            cumulative: &cumulative,
            total_iterations,
        });

        if interrupted.load(Ordering::Relaxed) {
            log::info!(
                "run cancelled after {} of {} iterations",
                cumulative.iterations(),
                total_iterations
            );
            state.set(RunState::Cancelled);
            RunOutcome::Cancelled(cumulative)
        } else {
            log::info!("run completed: {} iterations", cumulative.iterations());
            state.set(RunState::Completed);
            RunOutcome::Completed(cumulative)
        }
    }
}
