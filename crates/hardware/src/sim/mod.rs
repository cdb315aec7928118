//! Simulation driver.
//!
//! This module hosts the pieces that advance the composed fabric through
//! simulated time:
//! 1. **Scheduler:** One next-edge timestamp per clock, earliest-edge
//!    advance, deterministic order on coincident edges.
//! 2. **Simulator:** Owns the [`System`](crate::soc::System), maps scheduler
//!    entries onto reference/domain/transport edges, and records run
//!    milestones.

/// Multi-clock edge scheduler.
pub mod scheduler;

/// Top-level simulator driving the system.
pub mod simulator;

pub use scheduler::Scheduler;
pub use simulator::Simulator;
