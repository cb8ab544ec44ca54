//! Command handlers

use anyhow::{anyhow, Result};

use hostel_core::{ensure_role, CurrentSession, Hostel, Role, Store};

pub mod config;
pub mod hostel;
pub mod payment;
pub mod room;
pub mod session;
pub mod status;
pub mod student;

/// The logged-in owner and the hostel they run
pub(crate) fn owner_hostel(store: &Store) -> Result<(CurrentSession, Hostel)> {
    let session = require_role(store, Role::Owner)?;
    let hostel = store
        .hostel_by_owner(&session.username)?
        .ok_or_else(|| anyhow!("No hostel registered for owner {}", session.username))?;
    Ok((session, hostel))
}

/// The current session, which must have the given role
pub(crate) fn require_role(store: &Store, role: Role) -> Result<CurrentSession> {
    let session = store.current_user()?;
    Ok(ensure_role(session.as_ref(), role)?.clone())
}
