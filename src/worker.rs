use std::mem;
use std::sync::mpsc::Sender;

use crate::engine::CancelToken;
use crate::random::RandomStream;
use crate::simulation::Simulation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WorkerExit {
    /// Every trial of the share ran and was handed off.
    Exhausted,
    /// Stopped early; the unreported tail of the batch was dropped.
    Cancelled,
    /// The coordinator stopped listening.
    Disconnected,
}

/// Runs one slice of the iteration budget on a private stream and context.
pub(crate) struct Worker<'a, S: Simulation> {
    id: usize,
    simulation: &'a S,
    stream: RandomStream,
    context: S::Context,
    share: u64,
    batch_size: u64,
    sender: Sender<S::Output>,
    cancel: CancelToken,
}

impl<'a, S: Simulation> Worker<'a, S> {
    pub(crate) fn new(
        id: usize,
        simulation: &'a S,
        stream: RandomStream,
        share: u64,
        batch_size: u64,
        sender: Sender<S::Output>,
        cancel: CancelToken,
    ) -> Self {
        Worker {
            id,
            simulation,
            stream,
            context: simulation.make_context(),
            share,
            batch_size,
            sender,
            cancel,
        }
    }

    pub(crate) fn run(mut self) -> WorkerExit {
        let mut remaining = self.share;
        let mut pending = 0u64;
        let mut batch = S::Output::default();

        while remaining > 0 {
            if self.cancel.is_cancelled() {
                log::debug!(
                    "worker {} cancelled with {} of {} trials left",
                    self.id,
                    remaining,
                    self.share
                );
                return WorkerExit::Cancelled;
            }

            self.simulation
                .trial(&mut self.context, &mut self.stream, &mut batch);
            pending += 1;
            remaining -= 1;

            if pending == self.batch_size || remaining == 0 {
                if self.sender.send(mem::take(&mut batch)).is_err() {
                    log::warn!("worker {}: coordinator gone, dropping batch", self.id);
                    return WorkerExit::Disconnected;
                }
                pending = 0;
            }
        }

        log::debug!("worker {} finished {} trials", self.id, self.share);
        WorkerExit::Exhausted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::Accumulator;
    use std::sync::mpsc;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Count(u64);

    impl Accumulator for Count {
        fn merge(&mut self, other: &Self) {
            self.0 += other.0;
        }

        fn iterations(&self) -> u64 {
            self.0
        }
    }

    struct Counting;

    impl Simulation for Counting {
        type Context = ();
        type Output = Count;

        fn make_context(&self) {}

        fn trial(&self, _: &mut (), _: &mut RandomStream, output: &mut Count) {
            output.0 += 1;
        }
    }

    fn collect(share: u64, batch_size: u64, cancel: CancelToken) -> (WorkerExit, Vec<u64>) {
        let (tx, rx) = mpsc::channel();
        let worker = Worker::new(0, &Counting, RandomStream::new(0), share, batch_size, tx, cancel);
        let exit = worker.run();
        (exit, rx.iter().map(|c| c.0).collect())
    }

    #[test]
    fn test_batches_split_share() {
        let (exit, batches) = collect(10, 4, CancelToken::new());
        assert_eq!(exit, WorkerExit::Exhausted);
        assert_eq!(batches, vec![4, 4, 2]);
    }

    #[test]
    fn test_batch_larger_than_share() {
        let (_, batches) = collect(3, 100, CancelToken::new());
        assert_eq!(batches, vec![3]);
    }

    #[test]
    fn test_cancelled_before_start_reports_nothing() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let (exit, batches) = collect(10, 2, cancel);
        assert_eq!(exit, WorkerExit::Cancelled);
        assert!(batches.is_empty());
    }

    #[test]
    fn test_disconnected_coordinator() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let worker = Worker::new(0, &Counting, RandomStream::new(0), 5, 1, tx, CancelToken::new());
        assert_eq!(worker.run(), WorkerExit::Disconnected);
    }
}
