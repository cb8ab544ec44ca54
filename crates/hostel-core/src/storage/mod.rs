//! Storage layer
//!
//! The hostel document and the current session are stored as JSON strings
//! under fixed keys in a [`StorageBackend`].
//!
//! - **FileStorage**: one file per key in the data directory
//! - **MemoryStorage**: in-process map, used by tests

pub mod backend;
pub mod error;
pub mod file;

pub use backend::{MemoryStorage, StorageBackend};
pub use error::{StorageError, StorageResult};
pub use file::FileStorage;
