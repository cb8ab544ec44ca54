//! Payment command handlers

use anyhow::{bail, Context, Result};

use hostel_core::{NewPayment, Store};

use super::owner_hostel;
use crate::output::Output;

/// Record a payment from a student of the owner's hostel
pub fn add(
    store: &mut Store,
    phone: String,
    amount: f64,
    note: Option<String>,
    output: &Output,
) -> Result<()> {
    if !amount.is_finite() {
        bail!("Invalid amount: {}", amount);
    }

    let (_, hostel) = owner_hostel(store)?;

    // Name is copied onto the payment; fall back to the phone for unknown students
    let student_name = store
        .students_in_hostel(&hostel.id)?
        .into_iter()
        .find(|s| s.phone == phone)
        .map(|s| s.student_name)
        .unwrap_or_else(|| phone.clone());

    store
        .add_payment(NewPayment {
            hostel_id: hostel.id.clone(),
            student_phone: phone.clone(),
            student_name,
            amount,
            note,
        })
        .context("Failed to record payment")?;

    output.success(&format!("Recorded payment of {:.2} from {}", amount, phone));
    Ok(())
}

/// List payments received by the owner's hostel
pub fn list(store: &Store, output: &Output) -> Result<()> {
    let (_, hostel) = owner_hostel(store)?;
    let payments = store.payments(&hostel.id)?;
    output.print_payments(&payments);
    Ok(())
}
