use std::sync::Arc;
use std::sync::atomic::AtomicBool;

/// Shared flag checked by long-running operations (process execution) to
/// support graceful interruption.
pub type CancellationToken = Arc<AtomicBool>;

pub mod cli;
pub mod constants;
pub mod core;
pub mod models;
pub mod system;
