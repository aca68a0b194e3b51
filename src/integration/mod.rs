//! Integration test support
//!
//! Synthetic segment builders and end-to-end tests over the full decode
//! pipeline. Only compiled for tests.

pub mod e2e;
pub mod fixtures;
