//! Hostel Core Library
//!
//! This crate provides the data layer for hostel management: hostels and
//! their owners, rooms, students, payments and login sessions.
//!
//! # Architecture
//!
//! All state lives in one JSON document stored under a fixed key in a
//! pluggable [`StorageBackend`]. Each operation reads the whole document,
//! changes one collection and writes the whole document back.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = Store::open()?;
//!
//! let hostel_id = store.register_hostel(&new_hostel)?;
//! let result = store.join_hostel(&new_student, &hostel_id)?;
//! if !result.is_success() {
//!     eprintln!("{}", result.message.unwrap_or_default());
//! }
//! ```
//!
//! # Modules
//!
//! - `store`: Document store facade (main entry point)
//! - `models`: Records held in the document collections
//! - `document`: The root document and its JSON form
//! - `session`: Roles, current session and authorization checks
//! - `outcome`: Results of operations that can be turned down
//! - `storage`: File and in-memory backends
//! - `config`: Application configuration

pub mod config;
pub mod document;
pub mod models;
pub mod outcome;
pub mod session;
pub mod storage;
pub mod store;

pub use config::Config;
pub use document::{DocumentStats, HostelDocument, DOCUMENT_KEY};
pub use models::{
    Hostel, LedgerEntry, NewHostel, NewPayment, NewStudent, Owner, Payment, Room,
    RoomChangeRequest, SessionAccount, Student,
};
pub use outcome::{ActionResult, Rejection};
pub use session::{ensure_role, AuthError, CurrentSession, Role};
pub use storage::{FileStorage, MemoryStorage, StorageBackend, StorageError};
pub use store::Store;
