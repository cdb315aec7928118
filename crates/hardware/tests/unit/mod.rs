//! # Unit Tests
//!
//! This module serves as the hub for the fine-grained component tests:
//! clocking, registry, SoC, and the simulation driver.


/// Unit tests for the resource and interrupt registry.
pub mod registry;

/// Unit tests for the simulation driver and full-system runs.
pub mod sim;
