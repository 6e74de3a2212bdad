//! Parallel event processing.
//!
//! Workers receive whole events over a crossbeam channel and send back
//! their [`EventOutput`]. Every event draws from its own ChaCha8 stream,
//! selected by the event id under the run seed, so results do not depend
//! on which worker ran the event or in which order events finished.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;

use chargeprop_core::{DepositedCharge, EventId};
use crossbeam_channel::{Receiver, Sender};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::config::{ConfigError, PoolConfig};
use crate::propagation::{ChargePropagation, EventOutput};
use crate::statistics::{RunStatistics, StatisticsSnapshot};

struct EventTask {
    event: EventId,
    deposits: Vec<DepositedCharge>,
}

enum WorkerReply {
    Done(EventResult),
    Panicked(EventId),
}

/// Output of one event, tagged with its id.
#[derive(Clone, Debug)]
pub struct EventResult {
    /// The event.
    pub event: EventId,
    /// Its propagated charges, trajectories and totals.
    pub output: EventOutput,
}

/// Generator for `event` under the run seed `seed`.
pub fn event_rng(seed: u64, event: EventId) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(event.0);
    rng
}

/// Worker pool running [`ChargePropagation::run_event`] for many events.
pub struct EventPool {
    module: Arc<ChargePropagation>,
    statistics: Arc<RunStatistics>,
    task_tx: Option<Sender<EventTask>>,
    result_rx: Receiver<WorkerReply>,
    workers: Vec<JoinHandle<()>>,
}

impl EventPool {
    /// Spawn the workers.
    ///
    /// Trajectory recording forces a single worker.
    pub fn new(module: ChargePropagation, config: PoolConfig) -> Result<Self, ConfigError> {
        let worker_count = if module.config().output_trajectories {
            log::warn!("Trajectory recording enabled, disabling parallel event processing");
            1
        } else {
            config.resolved_worker_count()
        };

        let module = Arc::new(module);
        let statistics = Arc::new(RunStatistics::new());
        let (task_tx, task_rx) = crossbeam_channel::unbounded::<EventTask>();
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<WorkerReply>();

        let mut workers = Vec::with_capacity(worker_count);
        for i in 0..worker_count {
            let task_rx = task_rx.clone();
            let result_tx = result_tx.clone();
            let module = Arc::clone(&module);
            let statistics = Arc::clone(&statistics);
            let seed = config.seed;
            let handle = std::thread::Builder::new()
                .name(format!("chargeprop-worker-{i}"))
                .spawn(move || worker_loop(task_rx, result_tx, module, statistics, seed))
                .map_err(|e| ConfigError::ThreadSpawnFailed {
                    reason: format!("worker {i}: {e}"),
                })?;
            workers.push(handle);
        }
        log::debug!("Started {worker_count} propagation workers");

        Ok(Self {
            module,
            statistics,
            task_tx: Some(task_tx),
            result_rx,
            workers,
        })
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Propagate `events` and return their outputs ordered by event id.
    ///
    /// Blocks until every submitted event has completed. Events whose
    /// propagation panicked are logged and missing from the result; the
    /// worker that ran them keeps serving the queue.
    pub fn run<I>(&mut self, events: I) -> Vec<EventResult>
    where
        I: IntoIterator<Item = (EventId, Vec<DepositedCharge>)>,
    {
        let Some(task_tx) = self.task_tx.as_ref() else {
            return Vec::new();
        };

        let mut submitted = 0usize;
        for (event, deposits) in events {
            if task_tx.send(EventTask { event, deposits }).is_err() {
                log::error!("All propagation workers exited, dropping event {event}");
                break;
            }
            submitted += 1;
        }

        let mut results = Vec::with_capacity(submitted);
        for _ in 0..submitted {
            match self.result_rx.recv() {
                Ok(WorkerReply::Done(result)) => results.push(result),
                Ok(WorkerReply::Panicked(event)) => {
                    log::error!("Propagation of event {event} panicked, dropping it");
                }
                Err(_) => break,
            }
        }
        if results.len() < submitted {
            log::error!(
                "Lost {} of {submitted} events to failed propagation",
                submitted - results.len()
            );
        }
        results.sort_by_key(|r| r.event);
        results
    }

    /// Stop the workers, report the run totals and return them.
    pub fn finish(mut self) -> StatisticsSnapshot {
        self.shutdown();
        let config = self.module.config();
        self.statistics
            .report(config.charge_per_step, config.max_charge_groups);
        self.statistics.snapshot()
    }

    fn shutdown(&mut self) {
        // Closing the task channel ends every worker loop.
        self.task_tx.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("A propagation worker panicked");
            }
        }
    }
}

impl Drop for EventPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    task_rx: Receiver<EventTask>,
    result_tx: Sender<WorkerReply>,
    module: Arc<ChargePropagation>,
    statistics: Arc<RunStatistics>,
    seed: u64,
) {
    while let Ok(task) = task_rx.recv() {
        let event = task.event;
        // A panicking collaborator must still produce a reply, otherwise
        // `run` waits forever on the surviving workers.
        let output = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut rng = event_rng(seed, event);
            module.run_event(&task.deposits, &mut rng, &statistics)
        }));
        let reply = match output {
            Ok(output) => WorkerReply::Done(EventResult { event, output }),
            Err(_) => WorkerReply::Panicked(event),
        };
        if result_tx.send(reply).is_err() {
            break;
        }
    }
}
