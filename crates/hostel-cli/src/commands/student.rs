//! Student command handlers

use anyhow::{bail, Context, Result};

use hostel_core::{NewStudent, Role, Store};

use super::{owner_hostel, require_role};
use crate::output::Output;

/// Join a hostel as a student
pub fn join(store: &mut Store, student: NewStudent, hostel_id: String, output: &Output) -> Result<()> {
    let result = store
        .join_hostel(&student, &hostel_id)
        .context("Failed to join hostel")?;
    output.print_result(
        &result,
        &format!("Joined {}. Log in with your phone number.", hostel_id),
    )
}

/// List students of the owner's hostel
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    let students = store.students_in_hostel(&hostel.id)?;
    output.print_students(&students);
    Ok(())
}

/// Show a student by phone
pub fn show(store: &Store, phone: String, output: &Output) -> Result<()> {
    let Some(student) = store.student(&phone)? else {
        bail!("Student not found: {}", phone);
    };
    output.print_student(&student);
    Ok(())
}

/// Leave the hostel as the logged-in student, then log out
pub fn vacate(store: &mut Store, output: &Output) -> Result<()> {
    let session = require_role(store, Role::Student)?;
    let removed = store
        .vacate_hostel(&session.username)
        .context("Failed to vacate hostel")?;
    store.logout()?;
    output.success(&format!(
        "Vacated {} student record(s) for {}. Payment history is kept.",
        removed, session.username
    ));
    Ok(())
}

/// Ask to move to another room as the logged-in student
pub fn request_room(store: &mut Store, room: String, output: &Output) -> Result<()> {
    let session = require_role(store, Role::Student)?;
    store
        .request_room_change(&session.username, &room)
        .context("Failed to request room change")?;
    output.success(&format!("Requested room change to {}", room));
    Ok(())
}

/// List room change requests for the owner's hostel
pub fn requests(store: &Store, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    let requests = store.room_change_requests(&hostel.id)?;
    output.print_requests(&requests);
    Ok(())
}
