//! Data models for hostel management
//!
//! Records stored in the six collections of the hostel document. Field names
//! serialize as camelCase and timestamps as epoch milliseconds, matching the
//! JSON layout the web front end writes.

use chrono::{DateTime, SubsecRound, Utc};
use rand::Rng;
use serde::de::Error as _;
use serde::{Deserialize, Serialize};

use crate::session::Role;

/// Placeholder password stored for owner accounts
pub const OWNER_PLACEHOLDER_PASSWORD: &str = "ownerpass";

/// Placeholder password stored for student accounts
pub const STUDENT_PLACEHOLDER_PASSWORD: &str = "studentpass";

/// Owner name characters kept in a generated hostel id
const HOSTEL_ID_NAME_LEN: usize = 8;

/// A registered hostel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Hostel {
    /// Generated identifier, see [`generate_hostel_id`]
    pub id: String,
    pub hostel_name: String,
    pub location: String,
    /// Whether the hostel offers wifi
    pub wifi: bool,
    pub floors: u32,
    pub rooms_per_floor: u32,
    pub owner_name: String,
    /// Owner contact (phone)
    pub contact: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created: DateTime<Utc>,
}

/// Details an owner supplies when registering a hostel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewHostel {
    pub owner_name: String,
    pub hostel_name: String,
    pub location: String,
    pub wifi: bool,
    pub floors: u32,
    pub rooms_per_floor: u32,
    pub contact: String,
}

impl NewHostel {
    /// Rooms this layout generates, `None` if the count overflows
    pub fn room_capacity(&self) -> Option<u32> {
        self.floors.checked_mul(self.rooms_per_floor)
    }
}

/// An owner account, keyed by contact
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    pub contact: String,
    pub owner_name: String,
    pub hostel_id: String,
    pub password: String,
}

/// A student living in a hostel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_name: String,
    /// Contact phone; unique within a hostel only
    pub phone: String,
    /// College or employer
    pub org: String,
    #[serde(default)]
    pub room: Option<String>,
    pub hostel_id: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub joined: DateTime<Utc>,
}

/// Details a student supplies when joining a hostel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub student_name: String,
    pub phone: String,
    pub org: String,
    #[serde(default)]
    pub room: Option<String>,
}

/// A room in a hostel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub hostel_id: String,
    /// Room label, `R1`..`Rn` for generated rooms
    pub number: String,
    /// Never populated by any store operation
    #[serde(default)]
    pub occupant: Option<String>,
}

impl Room {
    /// Create an unoccupied room
    pub fn new(hostel_id: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            hostel_id: hostel_id.into(),
            number: number.into(),
            occupant: None,
        }
    }
}

/// A rent payment received from a student
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub hostel_id: String,
    pub student_phone: String,
    /// Copy of the student's name at payment time
    pub student_name: String,
    pub amount: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Details of a payment to record
#[derive(Debug, Clone, PartialEq)]
pub struct NewPayment {
    pub hostel_id: String,
    pub student_phone: String,
    pub student_name: String,
    pub amount: f64,
    pub note: Option<String>,
}

/// A student's request to move to another room
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RoomChangeRequest {
    pub student_phone: String,
    /// Hostel of the requesting student, when it could be resolved
    #[serde(default)]
    pub hostel_id: Option<String>,
    pub requested_room: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub date: DateTime<Utc>,
    pub note: String,
}

impl RoomChangeRequest {
    /// Create a request dated now
    pub fn new(
        student_phone: impl Into<String>,
        hostel_id: Option<String>,
        requested_room: impl Into<String>,
    ) -> Self {
        let requested_room = requested_room.into();
        Self {
            student_phone: student_phone.into(),
            hostel_id,
            note: format!("Room change to {}", requested_room),
            requested_room,
            date: now(),
        }
    }
}

/// An entry in the payment log
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LedgerEntry {
    Payment(Payment),
    RoomChangeRequest(RoomChangeRequest),
}

impl LedgerEntry {
    /// The payment, if this entry is one
    pub fn as_payment(&self) -> Option<&Payment> {
        match self {
            LedgerEntry::Payment(p) => Some(p),
            LedgerEntry::RoomChangeRequest(_) => None,
        }
    }

    /// The room change request, if this entry is one
    pub fn as_room_change_request(&self) -> Option<&RoomChangeRequest> {
        match self {
            LedgerEntry::RoomChangeRequest(r) => Some(r),
            LedgerEntry::Payment(_) => None,
        }
    }
}

/// Hostel id the web front end wrote on room change requests
const LEGACY_REQUEST_HOSTEL_ID: &str = "request";

/// Untagged shape written before entries carried a `kind`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyEntry {
    hostel_id: String,
    student_phone: String,
    student_name: String,
    amount: f64,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    date: DateTime<Utc>,
    #[serde(default)]
    note: Option<String>,
}

#[derive(Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
enum TaggedEntry {
    Payment(Payment),
    RoomChangeRequest(RoomChangeRequest),
}

impl<'de> Deserialize<'de> for LedgerEntry {
    /// Entries with a `kind` must parse as that kind; only untagged entries
    /// take the legacy path
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;

        if value.get("kind").is_none() {
            let legacy = LegacyEntry::deserialize(value).map_err(D::Error::custom)?;
            return Ok(legacy.into_entry());
        }

        Ok(match TaggedEntry::deserialize(value).map_err(D::Error::custom)? {
            TaggedEntry::Payment(p) => LedgerEntry::Payment(p),
            TaggedEntry::RoomChangeRequest(r) => LedgerEntry::RoomChangeRequest(r),
        })
    }
}

impl LegacyEntry {
    /// Requests were marked by a sentinel hostel id and a note
    fn into_entry(self) -> LedgerEntry {
        if self.hostel_id != LEGACY_REQUEST_HOSTEL_ID {
            return LedgerEntry::Payment(Payment {
                hostel_id: self.hostel_id,
                student_phone: self.student_phone,
                student_name: self.student_name,
                amount: self.amount,
                date: self.date,
                note: self.note,
            });
        }

        let note = self.note.unwrap_or_default();
        let requested_room = note
            .strip_prefix("Room change to ")
            .unwrap_or(&note)
            .to_string();
        LedgerEntry::RoomChangeRequest(RoomChangeRequest {
            student_phone: self.student_phone,
            hostel_id: None,
            requested_room,
            date: self.date,
            note,
        })
    }
}

/// A login account appended when a student joins
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionAccount {
    pub role: Role,
    pub username: String,
    pub password: String,
}

/// Current time at the millisecond precision records are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Generate a hostel id: owner name without whitespace, cut to eight
/// characters, then `-` and a number in 1000..=9999
///
/// The suffix is not checked against existing ids.
pub fn generate_hostel_id(owner_name: &str) -> String {
    let prefix: String = owner_name
        .chars()
        .filter(|c| !c.is_whitespace())
        .take(HOSTEL_ID_NAME_LEN)
        .collect();
    let suffix: u32 = rand::thread_rng().gen_range(1000..=9999);
    format!("{}-{}", prefix, suffix)
}

/// Labels for rooms generated at registration: `R1`..`R{total}`
pub fn room_labels(total: u32) -> impl Iterator<Item = String> {
    (1..=total).map(|i| format!("R{}", i))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_hostel_id() {
        let id = generate_hostel_id("Ravi Kumar Sharma");
        let (prefix, suffix) = id.rsplit_once('-').unwrap();
        assert_eq!(prefix, "RaviKuma");
        let n: u32 = suffix.parse().unwrap();
        assert!((1000..=9999).contains(&n));
    }

    #[test]
    fn test_generate_hostel_id_short_name() {
        let id = generate_hostel_id("Al");
        assert!(id.starts_with("Al-"));
        assert_eq!(id.len(), "Al-".len() + 4);
    }

    #[test]
    fn test_now_is_millisecond_precision() {
        let t = now();
        assert_eq!(t.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn test_room_labels() {
        let labels: Vec<_> = room_labels(3).collect();
        assert_eq!(labels, vec!["R1", "R2", "R3"]);
        assert_eq!(room_labels(0).count(), 0);
    }

    #[test]
    fn test_room_new_is_unoccupied() {
        let room = Room::new("H-1000", "R7");
        assert_eq!(room.number, "R7");
        assert!(room.occupant.is_none());
    }

    #[test]
    fn test_hostel_camel_case_fields() {
        let hostel = Hostel {
            id: "Asha-1234".to_string(),
            hostel_name: "Sunrise".to_string(),
            location: "Pune".to_string(),
            wifi: true,
            floors: 2,
            rooms_per_floor: 3,
            owner_name: "Asha".to_string(),
            contact: "9000000001".to_string(),
            created: DateTime::from_timestamp_millis(1_700_000_000_000).unwrap(),
        };

        let value = serde_json::to_value(&hostel).unwrap();
        assert_eq!(value["hostelName"], "Sunrise");
        assert_eq!(value["roomsPerFloor"], 3);
        assert_eq!(value["created"], 1_700_000_000_000i64);
    }

    #[test]
    fn test_room_capacity_overflow() {
        let layout = NewHostel {
            owner_name: "Asha".to_string(),
            hostel_name: "Tower".to_string(),
            location: "Pune".to_string(),
            wifi: false,
            floors: 65_536,
            rooms_per_floor: 65_536,
            contact: "9000000001".to_string(),
        };
        assert_eq!(layout.room_capacity(), None);
        assert_eq!(
            NewHostel { floors: 4, rooms_per_floor: 5, ..layout }.room_capacity(),
            Some(20)
        );
    }

    #[test]
    fn test_ledger_entry_tagged() {
        let entry = LedgerEntry::RoomChangeRequest(RoomChangeRequest::new(
            "9000000002",
            Some("Asha-1234".to_string()),
            "R5",
        ));

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["kind"], "roomChangeRequest");
        assert_eq!(value["note"], "Room change to R5");

        let back: LedgerEntry = serde_json::from_value(value).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_legacy_payment_entry() {
        let value = json!({
            "hostelId": "Asha-1234",
            "studentPhone": "9000000002",
            "studentName": "Meera",
            "amount": 4500,
            "date": 1_700_000_000_000i64
        });

        let entry: LedgerEntry = serde_json::from_value(value).unwrap();
        let payment = entry.as_payment().unwrap();
        assert_eq!(payment.hostel_id, "Asha-1234");
        assert_eq!(payment.amount, 4500.0);
        assert!(payment.note.is_none());
    }

    #[test]
    fn test_legacy_request_entry() {
        let value = json!({
            "hostelId": "request",
            "studentPhone": "9000000002",
            "studentName": "9000000002",
            "amount": 0,
            "date": 1_700_000_000_000i64,
            "note": "Room change to R9"
        });

        let entry: LedgerEntry = serde_json::from_value(value).unwrap();
        let request = entry.as_room_change_request().unwrap();
        assert_eq!(request.requested_room, "R9");
        assert_eq!(request.student_phone, "9000000002");
        assert!(request.hostel_id.is_none());
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let value = json!({
            "kind": "refund",
            "hostelId": "Asha-1234",
            "studentPhone": "9000000002",
            "studentName": "Meera",
            "amount": 4500,
            "date": 1_700_000_000_000i64
        });

        let err = serde_json::from_value::<LedgerEntry>(value).unwrap_err();
        assert!(err.to_string().contains("refund"), "{}", err);
    }

    #[test]
    fn test_tagged_entry_missing_field() {
        let value = json!({
            "kind": "payment",
            "hostelId": "Asha-1234",
            "studentPhone": "9000000002",
            "amount": 4500,
            "date": 1_700_000_000_000i64
        });

        let err = serde_json::from_value::<LedgerEntry>(value).unwrap_err();
        assert!(err.to_string().contains("studentName"), "{}", err);
    }

    #[test]
    fn test_tagged_payment_entry() {
        let value = json!({
            "kind": "payment",
            "hostelId": "request",
            "studentPhone": "9000000002",
            "studentName": "Meera",
            "amount": 4500,
            "date": 1_700_000_000_000i64
        });

        // A tagged payment never takes the legacy request path
        let entry: LedgerEntry = serde_json::from_value(value).unwrap();
        assert_eq!(entry.as_payment().unwrap().hostel_id, "request");
    }

    #[test]
    fn test_student_missing_room_defaults() {
        let value = json!({
            "studentName": "Meera",
            "phone": "9000000002",
            "org": "COEP",
            "hostelId": "Asha-1234",
            "joined": 1_700_000_000_000i64
        });

        let student: Student = serde_json::from_value(value).unwrap();
        assert!(student.room.is_none());
    }
}
