//! Hostel command handlers

use anyhow::{bail, Context, Result};

use hostel_core::{NewHostel, Store};

use crate::output::Output;

/// Register a hostel and its owner account
pub fn register(store: &mut Store, hostel: NewHostel, output: &Output) -> Result<()> {
    if hostel.floors == 0 || hostel.rooms_per_floor == 0 {
        output.message("Note: no rooms will be generated for this layout.");
    }

    let id = store
        .register_hostel(&hostel)
        .context("Failed to register hostel")?;

    let room_count = store.rooms(&id)?.len();
    output.success(&format!(
        "Registered hostel {} with {} room(s)",
        id, room_count
    ));
    output.message("Share this hostel ID with students so they can join.");
    if let Some(hostel) = store.hostel_by_id(&id)? {
        output.print_hostel(&hostel);
    }
    Ok(())
}

/// List all hostels
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let hostels = store.hostels()?;
    output.print_hostels(&hostels);
    Ok(())
}

/// Show a hostel by id
pub fn show(store: &Store, id: String, output: &Output) -> Result<()> {
    let Some(hostel) = store.hostel_by_id(&id)? else {
        bail!("Hostel not found: {}", id);
    };
    output.print_hostel(&hostel);
    Ok(())
}

/// Show the hostel run by an owner
pub fn by_owner(store: &Store, contact: String, output: &Output) -> Result<()> {
    let Some(hostel) = store.hostel_by_owner(&contact)? else {
        bail!("No hostel registered for owner {}", contact);
    };
    output.print_hostel(&hostel);
    Ok(())
}

/// Show an owner account by contact
pub fn owner(store: &Store, contact: String, output: &Output) -> Result<()> {
    let Some(owner) = store.owner_by_contact(&contact)? else {
        bail!("Owner not found: {}", contact);
    };
    output.print_owner(&owner);
    Ok(())
}
