//! Persistence boundary for aggregates.
//!
//! Aggregates are stored as serialized snapshots keyed by [`AggregateId`].
//! Every save is checked against the stored [`Version`] so that two
//! writers racing on the same aggregate cannot silently overwrite each other.

pub mod error;
pub mod memory;
pub mod store;
pub mod version;

pub use common::AggregateId;
pub use error::{RepositoryError, Result};
pub use memory::InMemoryRepository;
pub use store::{Repository, SharedRepository, Versioned};
pub use version::Version;
