//! # Task Management System
//!
//! This module runs the engine's background work. Each pipeline stage owns one
//! long-lived [`TaskWorker`]: a named thread blocked on a channel, processing
//! tasks strictly in the order they were published.
//!
//! ## Architecture Overview
//!
//! - `Task`: A unit of work that runs on a worker thread
//! - `TaskWorker`: One worker thread plus its task and result channels
//! - `ChunkPipeline`: The generation and build workers, their bookkeeping and
//!   the distance-ordered apply queue
//!
//! ## Task Lifecycle
//! 1. The owning thread publishes a task; the in-flight count goes up
//! 2. The worker receives it (sleeping while its queue is empty) and runs it
//!    under `catch_unwind`, so a failing or panicking job is logged and dropped
//!    without taking the worker down
//! 3. The outcome is sent back on the result channel
//! 4. The owning thread collects outcomes; the in-flight count goes down
//!
//! Dropping a worker closes its task channel, which ends the worker's receive
//! loop, and joins the thread.

pub mod pipeline;
pub mod task;

use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{channel, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, error, info};

use crate::error::WorldError;
use task::Task;

pub use pipeline::{ApplyQueue, BuildCallback, BuildKind, BuiltChunk, ChunkPipeline, GeneratedChunk, PipelineStats};

/// Outcome of one task, as reported back by the worker.
enum TaskOutcome<O, K> {
    Completed(O),
    Failed(K),
}

/// Everything a worker finished since the last collect.
pub struct Collected<T: Task> {
    pub completed: Vec<T::Output>,
    /// Keys of the tasks that returned an error or panicked.
    pub failed: Vec<T::Key>,
}

/// A single background thread serving one FIFO task queue.
pub struct TaskWorker<T: Task> {
    name: String,
    task_sender: Option<Sender<T>>,
    result_receiver: Receiver<TaskOutcome<T::Output, T::Key>>,
    num_tasks_in_flight: usize,
    num_failed: usize,
    worker: Option<JoinHandle<()>>,
}

impl<T: Task> TaskWorker<T> {
    /// Starts a worker thread.
    ///
    /// # Arguments
    /// * `name` - Thread name, also used in log messages
    ///
    /// # Returns
    /// The worker, or an error if the thread could not be spawned.
    pub fn new(name: impl Into<String>) -> Result<Self, WorldError> {
        let name = name.into();
        let (task_tx, task_rx) = channel::<T>();
        let (result_tx, result_rx) = channel::<TaskOutcome<T::Output, T::Key>>();

        let thread_name = name.clone();
        let task_closure = move || {
            while let Ok(task) = task_rx.recv() {
                let description = task.describe();
                let key = task.key();
                let outcome = match panic::catch_unwind(AssertUnwindSafe(|| task.process())) {
                    Ok(Ok(output)) => TaskOutcome::Completed(output),
                    Ok(Err(err)) => {
                        error!("{thread_name}: {description} failed: {err}");
                        TaskOutcome::Failed(key)
                    }
                    Err(_) => {
                        error!("{thread_name}: {description} panicked");
                        TaskOutcome::Failed(key)
                    }
                };

                if result_tx.send(outcome).is_err() {
                    break;
                }
            }
            debug!("{thread_name}: task queue closed");
        };

        let worker = thread::Builder::new().name(name.clone()).spawn(task_closure)?;
        info!("Started worker {name}");

        Ok(TaskWorker {
            name,
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            num_tasks_in_flight: 0,
            num_failed: 0,
            worker: Some(worker),
        })
    }

    /// Queues a task behind every task published before it.
    ///
    /// # Returns
    /// `false` if the worker is gone and the task was dropped.
    pub fn publish(&mut self, task: T) -> bool {
        let Some(sender) = &self.task_sender else {
            return false;
        };

        match sender.send(task) {
            Ok(()) => {
                self.num_tasks_in_flight += 1;
                true
            }
            Err(_) => {
                error!("{}: worker is gone, dropping task", self.name);
                false
            }
        }
    }

    /// Takes every finished outcome without blocking.
    pub fn collect(&mut self) -> Collected<T> {
        let mut collected = Collected {
            completed: Vec::new(),
            failed: Vec::new(),
        };
        loop {
            match self.result_receiver.try_recv() {
                Ok(outcome) => {
                    self.num_tasks_in_flight = self.num_tasks_in_flight.saturating_sub(1);
                    match outcome {
                        TaskOutcome::Completed(output) => collected.completed.push(output),
                        TaskOutcome::Failed(key) => {
                            self.num_failed += 1;
                            collected.failed.push(key);
                        }
                    }
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.num_tasks_in_flight > 0 {
                        error!(
                            "{}: worker exited with {} tasks in flight",
                            self.name, self.num_tasks_in_flight
                        );
                        self.num_failed += self.num_tasks_in_flight;
                        self.num_tasks_in_flight = 0;
                    }
                    break;
                }
            }
        }
        collected
    }

    /// Tasks published but not yet collected.
    pub fn in_flight(&self) -> usize {
        self.num_tasks_in_flight
    }

    /// Tasks that returned an error or panicked.
    pub fn failed(&self) -> usize {
        self.num_failed
    }
}

impl<T: Task> Drop for TaskWorker<T> {
    fn drop(&mut self) {
        self.task_sender.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("{}: worker thread panicked", self.name);
            }
        }
        info!("Stopped worker {}", self.name);
    }
}
