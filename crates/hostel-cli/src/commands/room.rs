//! Room command handlers
//!
//! All room commands act on the hostel of the logged-in owner.

use anyhow::{Context, Result};

use hostel_core::Store;

use super::owner_hostel;
use crate::output::Output;

/// List rooms of the owner's hostel
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    let rooms = store.rooms(&hostel.id)?;
    output.print_rooms(&rooms);
    Ok(())
}

/// Add a room
pub fn add(store: &mut Store, number: String, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    store
        .add_room(&hostel.id, &number)
        .context("Failed to add room")?;
    output.success(&format!("Added room {} to {}", number, hostel.id));
    Ok(())
}

/// Delete a room
pub fn delete(store: &mut Store, number: String, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    let removed = store
        .delete_room(&hostel.id, &number)
        .context("Failed to delete room")?;

    if removed == 0 {
        output.message(&format!("No room {} in {}", number, hostel.id));
    } else {
        output.success(&format!("Deleted room {}", number));
    }
    Ok(())
}
