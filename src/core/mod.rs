//! # Core Module
//!
//! Shared concurrency primitives used across the engine.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking.
//!   The world's chunk store lives in one so the pipeline workers can read block
//!   data while the owning thread applies geometry and mutations.

pub mod mt_resource;

pub use mt_resource::MtResource;
