//! In-process record store
//!
//! Implements the same repository traits as the PostgreSQL layer, with the
//! same uniqueness rules and atomicity. All state sits behind one mutex, so
//! every multi-record operation is a single critical section.

mod store;

pub use store::{MemoryCustomerRepository, MemoryStore, MemoryUserRepository};
