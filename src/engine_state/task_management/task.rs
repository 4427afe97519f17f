//! Task definitions for the pipeline workers.
//!
//! A task is a self-contained unit of CPU-bound work. It owns everything it
//! needs (shared handles included), runs once on a worker thread, and hands
//! its output back to the owning thread through the worker's result channel.

use crate::error::WorldError;

/// A unit of work that can be executed on a worker thread.
pub trait Task: Send + 'static {
    /// What the task hands back to the owning thread.
    type Output: Send + 'static;

    /// Identifies the job when it fails, so the owning thread can release
    /// whatever it reserved for it.
    type Key: Send + 'static;

    /// The key reported back if this task fails.
    fn key(&self) -> Self::Key;

    /// Short label used in log messages.
    fn describe(&self) -> String;

    /// Runs the task on the worker thread.
    ///
    /// An `Err` is logged by the worker and the task is dropped; the worker
    /// keeps serving its queue.
    fn process(self) -> Result<Self::Output, WorldError>;
}
