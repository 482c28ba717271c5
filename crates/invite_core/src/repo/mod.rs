//! Guest-list persistence: one contract, two interchangeable backends.
//!
//! # Responsibility
//! - Define the storage contract (`GuestRepository`) callers depend on.
//! - Provide a durable SQLite backend and a process-local backend.
//!
//! # Invariants
//! - Both backends pass the same contract tests.
//! - Repositories return backend failures only; absence is a value.

pub mod guest_repo;
pub mod memory_guest_repo;
pub mod sqlite_guest_repo;
