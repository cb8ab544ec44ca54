//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use anyhow::{bail, Result};
use serde::Serialize;

use hostel_core::{
    ActionResult, CurrentSession, Hostel, Owner, Payment, Room, RoomChangeRequest, Student,
};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single hostel
    pub fn print_hostel(&self, hostel: &Hostel) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", hostel.id);
                println!("Name:     {}", hostel.hostel_name);
                println!("Location: {}", hostel.location);
                println!("Wifi:     {}", if hostel.wifi { "yes" } else { "no" });
                println!(
                    "Layout:   {} floor(s) x {} room(s)",
                    hostel.floors, hostel.rooms_per_floor
                );
                println!("Owner:    {} ({})", hostel.owner_name, hostel.contact);
                println!("Created:  {}", hostel.created.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(hostel),
            OutputFormat::Quiet => println!("{}", hostel.id),
        }
    }

    /// Print a list of hostels
    pub fn print_hostels(&self, hostels: &[Hostel]) {
        match self.format {
            OutputFormat::Human => {
                if hostels.is_empty() {
                    println!("No hostels found.");
                    return;
                }
                for hostel in hostels {
                    println!(
                        "{:<14} | {} | {}",
                        hostel.id,
                        truncate(&hostel.hostel_name, 30),
                        truncate(&hostel.location, 30)
                    );
                }
                println!("\n{} hostel(s)", hostels.len());
            }
            OutputFormat::Json => print_json(&hostels),
            OutputFormat::Quiet => {
                for hostel in hostels {
                    println!("{}", hostel.id);
                }
            }
        }
    }

    /// Print an owner account
    pub fn print_owner(&self, owner: &Owner) {
        match self.format {
            OutputFormat::Human => {
                println!("Name:    {}", owner.owner_name);
                println!("Contact: {}", owner.contact);
                println!("Hostel:  {}", owner.hostel_id);
            }
            OutputFormat::Json => print_json(owner),
            OutputFormat::Quiet => println!("{}", owner.hostel_id),
        }
    }

    /// Print the rooms of a hostel
    pub fn print_rooms(&self, rooms: &[Room]) {
        match self.format {
            OutputFormat::Human => {
                if rooms.is_empty() {
                    println!("No rooms found.");
                    return;
                }
                for room in rooms {
                    println!(
                        "{:<8} {}",
                        room.number,
                        room.occupant.as_deref().unwrap_or("(vacant)")
                    );
                }
                println!("\n{} room(s)", rooms.len());
            }
            OutputFormat::Json => print_json(&rooms),
            OutputFormat::Quiet => {
                for room in rooms {
                    println!("{}", room.number);
                }
            }
        }
    }

    /// Print a single student
    pub fn print_student(&self, student: &Student) {
        match self.format {
            OutputFormat::Human => {
                println!("Name:   {}", student.student_name);
                println!("Phone:  {}", student.phone);
                println!("Org:    {}", student.org);
                println!("Room:   {}", student.room.as_deref().unwrap_or("(none)"));
                println!("Hostel: {}", student.hostel_id);
                println!("Joined: {}", student.joined.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => print_json(student),
            OutputFormat::Quiet => println!("{}", student.phone),
        }
    }

    /// Print a list of students
    pub fn print_students(&self, students: &[Student]) {
        match self.format {
            OutputFormat::Human => {
                if students.is_empty() {
                    println!("No students found.");
                    return;
                }
                for student in students {
                    println!(
                        "{:<14} | {} | {} | {}",
                        student.phone,
                        truncate(&student.student_name, 25),
                        truncate(&student.org, 25),
                        student.room.as_deref().unwrap_or("-")
                    );
                }
                println!("\n{} student(s)", students.len());
            }
            OutputFormat::Json => print_json(&students),
            OutputFormat::Quiet => {
                for student in students {
                    println!("{}", student.phone);
                }
            }
        }
    }

    /// Print payments with a total
    pub fn print_payments(&self, payments: &[Payment]) {
        match self.format {
            OutputFormat::Human => {
                if payments.is_empty() {
                    println!("No payments found.");
                    return;
                }
                for payment in payments {
                    let note = payment
                        .note
                        .as_deref()
                        .map(|n| format!(" ({})", truncate(n, 30)))
                        .unwrap_or_default();
                    println!(
                        "{} | {:<14} | {} | {:>10.2}{}",
                        payment.date.format("%Y-%m-%d"),
                        payment.student_phone,
                        truncate(&payment.student_name, 20),
                        payment.amount,
                        note
                    );
                }
                let total: f64 = payments.iter().map(|p| p.amount).sum();
                println!("\n{} payment(s), total {:.2}", payments.len(), total);
            }
            OutputFormat::Json => print_json(&payments),
            OutputFormat::Quiet => {
                for payment in payments {
                    println!("{}\t{}", payment.student_phone, payment.amount);
                }
            }
        }
    }

    /// Print room change requests
    pub fn print_requests(&self, requests: &[RoomChangeRequest]) {
        match self.format {
            OutputFormat::Human => {
                if requests.is_empty() {
                    println!("No room change requests.");
                    return;
                }
                for request in requests {
                    println!(
                        "{} | {:<14} | {}",
                        request.date.format("%Y-%m-%d %H:%M"),
                        request.student_phone,
                        request.note
                    );
                }
                println!("\n{} request(s)", requests.len());
            }
            OutputFormat::Json => print_json(&requests),
            OutputFormat::Quiet => {
                for request in requests {
                    println!("{}\t{}", request.student_phone, request.requested_room);
                }
            }
        }
    }

    /// Print the current session
    pub fn print_session(&self, session: Option<&CurrentSession>) {
        match (self.format, session) {
            (OutputFormat::Json, s) => print_json(&s),
            (OutputFormat::Human, Some(s)) => println!("Logged in as {} {}", s.role, s.username),
            (OutputFormat::Human, None) => println!("Not logged in."),
            (OutputFormat::Quiet, Some(s)) => println!("{}", s.username),
            (OutputFormat::Quiet, None) => {}
        }
    }

    /// Print the outcome of an operation that may be turned down
    ///
    /// JSON output carries the rejection in the result object; other
    /// formats turn a rejection into an error so the exit status is non-zero.
    pub fn print_result(&self, result: &ActionResult, success_message: &str) -> Result<()> {
        match self.format {
            OutputFormat::Json => print_json(result),
            _ if result.is_success() => self.success(success_message),
            _ => bail!(
                "{}",
                result.message.as_deref().unwrap_or("Operation failed.")
            ),
        }
        Ok(())
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// Pretty-print a value as JSON
fn print_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to format JSON output: {}", e),
    }
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hostel_core::Rejection;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_rejected_result_is_an_error() {
        let rejected = ActionResult::rejected(Rejection::AlreadyJoined);

        let err = Output::new(OutputFormat::Human)
            .print_result(&rejected, "Joined")
            .unwrap_err();
        assert_eq!(err.to_string(), "Student already joined this hostel.");
        assert!(Output::new(OutputFormat::Quiet)
            .print_result(&rejected, "Joined")
            .is_err());

        // JSON callers read `success` from the printed object
        assert!(Output::new(OutputFormat::Json)
            .print_result(&rejected, "Joined")
            .is_ok());
    }

    #[test]
    fn test_accepted_result_is_ok() {
        assert!(Output::new(OutputFormat::Quiet)
            .print_result(&ActionResult::ok(), "Joined")
            .is_ok());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_truncate_multibyte() {
        assert_eq!(truncate("पुणे हॉस्टेल", 6), "पुण...");
    }
}
