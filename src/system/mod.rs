//! # System Interaction Layer
//!
//! Boundary between the core prompt-flow logic and the outside world:
//! terminal prompts, filesystem watching, schematic package discovery and
//! external process execution. Everything the core consumes from here is
//! reachable through a trait seam so the interactive flow stays testable.

pub mod executor;
pub mod prompt;
pub mod source;
pub mod watcher;
