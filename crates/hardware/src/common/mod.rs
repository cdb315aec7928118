//! Common types shared across the fabric model.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Error Handling:** The composition-time error type and table kinds.
//!
//! Everything here is deliberately small; domain-specific types live next to
//! the component that owns them.

/// Composition-time error types.
pub mod error;

pub use error::{ConfigError, TableKind};
