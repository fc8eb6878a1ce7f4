//! # Adyen Store
//!
//! Adapters implementing the `Cache` and `SessionStore` ports. The host
//! runtime normally provides its own; these in-memory versions serve the
//! CLI, tests and single-process deployments.

pub mod memory;

pub use memory::{MemoryCache, MemorySession};
