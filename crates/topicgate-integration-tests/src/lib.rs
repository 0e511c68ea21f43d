//! Topicgate Integration Tests
//!
//! End-to-end tests that wire the real loading caches to an in-memory
//! project directory. It is NOT published to crates.io.
//!
//! # Test Categories
//!
//! - **authorization**: verdicts for topics, groups and the cluster through real caches
//! - **resilience**: retry and fail-closed behaviour against a flaky directory
//! - **concurrency**: many threads authorizing against cold and warm caches
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p topicgate-integration-tests
//!
//! # Run with logging
//! RUST_LOG=topicgate_core=debug cargo test -p topicgate-integration-tests -- --nocapture
//! ```

pub mod fixtures;
pub mod helpers;
pub mod mocks;

pub use fixtures::*;
pub use helpers::*;
