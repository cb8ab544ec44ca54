//! The hostel document
//!
//! All application data lives in one JSON object with six ordered
//! collections. It is always read and written whole.

use serde::{Deserialize, Serialize};

use crate::models::{Hostel, LedgerEntry, Owner, Room, SessionAccount, Student};
use crate::storage::{StorageError, StorageResult};

/// Storage key holding the document
pub const DOCUMENT_KEY: &str = "hostel_app_v1";

/// Root document with every collection, in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HostelDocument {
    #[serde(default)]
    pub hostels: Vec<Hostel>,
    #[serde(default)]
    pub owners: Vec<Owner>,
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    /// Payments and room change requests
    #[serde(default)]
    pub payments: Vec<LedgerEntry>,
    #[serde(default)]
    pub sessions: Vec<SessionAccount>,
}

impl HostelDocument {
    /// Create a document with all collections empty
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a stored document
    pub fn from_json(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::InvalidFormat {
            key: DOCUMENT_KEY.to_string(),
            details: e.to_string(),
        })
    }

    /// Serialize for storage
    pub fn to_json(&self, pretty: bool) -> StorageResult<String> {
        let result = if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        result.map_err(|e| StorageError::InvalidFormat {
            key: DOCUMENT_KEY.to_string(),
            details: e.to_string(),
        })
    }

    /// Record counts per collection
    pub fn stats(&self) -> DocumentStats {
        let requests = self
            .payments
            .iter()
            .filter(|e| e.as_room_change_request().is_some())
            .count();
        DocumentStats {
            hostels: self.hostels.len(),
            owners: self.owners.len(),
            students: self.students.len(),
            rooms: self.rooms.len(),
            payments: self.payments.len() - requests,
            room_change_requests: requests,
            sessions: self.sessions.len(),
        }
    }
}

/// Number of records in each collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub hostels: usize,
    pub owners: usize,
    pub students: usize,
    pub rooms: usize,
    pub payments: usize,
    pub room_change_requests: usize,
    pub sessions: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{now, Payment, RoomChangeRequest};

    #[test]
    fn test_empty_document_shape() {
        let json = HostelDocument::new().to_json(false).unwrap();
        assert_eq!(
            json,
            r#"{"hostels":[],"owners":[],"students":[],"rooms":[],"payments":[],"sessions":[]}"#
        );
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let doc = HostelDocument::from_json(r#"{"hostels":[]}"#).unwrap();
        assert_eq!(doc, HostelDocument::new());
    }

    #[test]
    fn test_invalid_json() {
        let err = HostelDocument::from_json("not json").unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_stats_split_ledger_kinds() {
        let mut doc = HostelDocument::new();
        doc.rooms.push(Room::new("H-1000", "R1"));
        doc.payments.push(LedgerEntry::Payment(Payment {
            hostel_id: "H-1000".to_string(),
            student_phone: "1".to_string(),
            student_name: "A".to_string(),
            amount: 100.0,
            date: now(),
            note: None,
        }));
        doc.payments
            .push(LedgerEntry::RoomChangeRequest(RoomChangeRequest::new("1", None, "R2")));

        let stats = doc.stats();
        assert_eq!(stats.rooms, 1);
        assert_eq!(stats.payments, 1);
        assert_eq!(stats.room_change_requests, 1);
        assert_eq!(stats.hostels, 0);
    }

    #[test]
    fn test_pretty_json_parses_back() {
        let mut doc = HostelDocument::new();
        doc.rooms.push(Room::new("H-1000", "R1"));

        let pretty = doc.to_json(true).unwrap();
        assert!(pretty.contains('\n'));
        assert_eq!(HostelDocument::from_json(&pretty).unwrap(), doc);
    }
}
