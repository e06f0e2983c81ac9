//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and under the `test-support` feature.

mod clock;
mod memory;

pub use clock::MutableClock;
pub use memory::InMemoryStore;
