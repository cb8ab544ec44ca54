//! Unified storage interface
//!
//! The `Store` exposes record-level operations over the hostel document.
//! Every mutation reads the whole document from the backend, changes one or
//! more collections, and writes the whole document back.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = Store::open()?;  // Creates the document if missing
//!
//! let id = store.register_hostel(&new_hostel)?;
//! let result = store.join_hostel(&new_student, &id)?;
//! let rooms = store.rooms(&id)?;
//! ```

use anyhow::{anyhow, Context, Result};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::document::{DocumentStats, HostelDocument, DOCUMENT_KEY};
use crate::models::{
    generate_hostel_id, now, room_labels, Hostel, LedgerEntry, NewHostel, NewPayment,
    NewStudent, Owner, Payment, Room, RoomChangeRequest, SessionAccount, Student,
    OWNER_PLACEHOLDER_PASSWORD, STUDENT_PLACEHOLDER_PASSWORD,
};
use crate::outcome::{ActionResult, Rejection};
use crate::session::{CurrentSession, Role, SESSION_KEY};
use crate::storage::{FileStorage, StorageBackend, StorageError};

/// Document store facade over a storage backend
pub struct Store {
    backend: Box<dyn StorageBackend>,
    /// Write indented JSON
    pretty_json: bool,
}

impl Store {
    /// Open the store using the default configuration
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(&config)
    }

    /// Open a file-backed store in the configured data directory
    pub fn open_with_config(config: &Config) -> Result<Self> {
        let mut store = Self::with_backend(FileStorage::from_config(config))?;
        store.pretty_json = config.pretty_json;
        Ok(store)
    }

    /// Open a store over any backend, creating an empty document if none exists
    pub fn with_backend(backend: impl StorageBackend + 'static) -> Result<Self> {
        let mut store = Self {
            backend: Box::new(backend),
            pretty_json: false,
        };
        store
            .document()
            .context("Failed to load or create hostel document")?;
        Ok(store)
    }

    // ==================== Document ====================

    /// Return the current document, persisting an empty one if none exists
    pub fn document(&mut self) -> Result<HostelDocument> {
        if let Some(doc) = self.read()? {
            return Ok(doc);
        }

        debug!("No stored document, creating an empty one");
        let doc = HostelDocument::new();
        self.write(&doc)?;
        Ok(doc)
    }

    /// Replace the stored document
    pub fn write(&mut self, doc: &HostelDocument) -> Result<()> {
        let json = doc.to_json(self.pretty_json)?;
        self.backend
            .set(DOCUMENT_KEY, &json)
            .context("Failed to save hostel document")
    }

    fn read(&self) -> Result<Option<HostelDocument>> {
        let raw = self
            .backend
            .get(DOCUMENT_KEY)
            .context("Failed to read hostel document")?;
        match raw {
            Some(json) => Ok(Some(HostelDocument::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Document for read-only queries; empty if nothing is stored
    fn load(&self) -> Result<HostelDocument> {
        Ok(self.read()?.unwrap_or_default())
    }

    /// Record counts per collection
    pub fn stats(&self) -> Result<DocumentStats> {
        Ok(self.load()?.stats())
    }

    // ==================== Hostel Operations ====================

    /// Register a hostel with its owner account and generated rooms
    ///
    /// Rooms are labelled `R1`..`Rn` for n = floors × rooms per floor.
    /// Returns the generated hostel id.
    pub fn register_hostel(&mut self, owner: &NewHostel) -> Result<String> {
        let room_count = owner.room_capacity().ok_or_else(|| {
            anyhow!(
                "Too many rooms: {} floors x {} rooms per floor",
                owner.floors,
                owner.rooms_per_floor
            )
        })?;
        let mut doc = self.load()?;

        let id = generate_hostel_id(&owner.owner_name);
        let hostel = Hostel {
            id: id.clone(),
            hostel_name: owner.hostel_name.clone(),
            location: owner.location.clone(),
            wifi: owner.wifi,
            floors: owner.floors,
            rooms_per_floor: owner.rooms_per_floor,
            owner_name: owner.owner_name.clone(),
            contact: owner.contact.clone(),
            created: now(),
        };

        doc.owners.push(Owner {
            contact: owner.contact.clone(),
            owner_name: owner.owner_name.clone(),
            hostel_id: id.clone(),
            password: OWNER_PLACEHOLDER_PASSWORD.to_string(),
        });
        doc.rooms
            .extend(room_labels(room_count).map(|label| Room::new(&id, label)));
        doc.hostels.push(hostel);

        self.write(&doc).context("Failed to register hostel")?;
        info!("Registered hostel {} with {} rooms", id, room_count);
        Ok(id)
    }

    /// All hostels, in registration order
    pub fn hostels(&self) -> Result<Vec<Hostel>> {
        Ok(self.load()?.hostels)
    }

    /// Find a hostel by id
    pub fn hostel_by_id(&self, id: &str) -> Result<Option<Hostel>> {
        Ok(self.load()?.hostels.into_iter().find(|h| h.id == id))
    }

    /// Find the hostel run by the owner with this contact
    ///
    /// Matches the hostel's own contact first, then falls back to the
    /// hostel referenced by the owner account with that contact.
    pub fn hostel_by_owner(&self, contact: &str) -> Result<Option<Hostel>> {
        let doc = self.load()?;

        if let Some(hostel) = doc.hostels.iter().find(|h| h.contact == contact) {
            return Ok(Some(hostel.clone()));
        }

        let hostel = doc
            .owners
            .iter()
            .find(|o| o.contact == contact)
            .and_then(|owner| doc.hostels.iter().find(|h| h.id == owner.hostel_id))
            .cloned();
        if hostel.is_some() {
            debug!("Hostel for {} resolved through owner account", contact);
        }
        Ok(hostel)
    }

    /// Find an owner account by contact
    pub fn owner_by_contact(&self, contact: &str) -> Result<Option<Owner>> {
        Ok(self.load()?.owners.into_iter().find(|o| o.contact == contact))
    }

    // ==================== Student Operations ====================

    /// Add a student to a hostel
    ///
    /// Rejected when the hostel is unknown or a student with the same phone
    /// already joined it. On success a student login account is recorded too.
    pub fn join_hostel(&mut self, student: &NewStudent, hostel_id: &str) -> Result<ActionResult> {
        let mut doc = self.load()?;

        if !doc.hostels.iter().any(|h| h.id == hostel_id) {
            warn!("Join rejected: unknown hostel {}", hostel_id);
            return Ok(Rejection::HostelNotFound.into());
        }

        if doc
            .students
            .iter()
            .any(|s| s.phone == student.phone && s.hostel_id == hostel_id)
        {
            warn!("Join rejected: {} already in {}", student.phone, hostel_id);
            return Ok(Rejection::AlreadyJoined.into());
        }

        doc.students.push(Student {
            student_name: student.student_name.clone(),
            phone: student.phone.clone(),
            org: student.org.clone(),
            room: student.room.clone().filter(|room| !room.is_empty()),
            hostel_id: hostel_id.to_string(),
            joined: now(),
        });
        doc.sessions.push(SessionAccount {
            role: Role::Student,
            username: student.phone.clone(),
            password: STUDENT_PLACEHOLDER_PASSWORD.to_string(),
        });

        self.write(&doc).context("Failed to save joined student")?;
        info!("Student {} joined hostel {}", student.phone, hostel_id);
        Ok(ActionResult::ok())
    }

    /// Students of a hostel, in join order
    pub fn students_in_hostel(&self, hostel_id: &str) -> Result<Vec<Student>> {
        Ok(self
            .load()?
            .students
            .into_iter()
            .filter(|s| s.hostel_id == hostel_id)
            .collect())
    }

    /// First student record with this phone, in any hostel
    pub fn student(&self, phone: &str) -> Result<Option<Student>> {
        Ok(self.load()?.students.into_iter().find(|s| s.phone == phone))
    }

    /// Remove every student record with this phone, across all hostels
    ///
    /// Payments made by the student are kept. Returns the number of records
    /// removed.
    pub fn vacate_hostel(&mut self, phone: &str) -> Result<usize> {
        let mut doc = self.load()?;

        let before = doc.students.len();
        doc.students.retain(|s| s.phone != phone);
        let removed = before - doc.students.len();

        self.write(&doc).context("Failed to save vacated student")?;
        info!("Vacated {} student record(s) for {}", removed, phone);
        Ok(removed)
    }

    /// Record a student's request to move to another room
    pub fn request_room_change(&mut self, phone: &str, new_room: &str) -> Result<()> {
        let mut doc = self.load()?;

        let hostel_id = doc
            .students
            .iter()
            .find(|s| s.phone == phone)
            .map(|s| s.hostel_id.clone());
        doc.payments.push(LedgerEntry::RoomChangeRequest(RoomChangeRequest::new(
            phone, hostel_id, new_room,
        )));

        self.write(&doc)
            .context("Failed to save room change request")?;
        info!("Room change to {} requested by {}", new_room, phone);
        Ok(())
    }

    /// Room change requests from students of a hostel
    pub fn room_change_requests(&self, hostel_id: &str) -> Result<Vec<RoomChangeRequest>> {
        Ok(self
            .load()?
            .payments
            .into_iter()
            .filter_map(|e| match e {
                LedgerEntry::RoomChangeRequest(r) if r.hostel_id.as_deref() == Some(hostel_id) => {
                    Some(r)
                }
                _ => None,
            })
            .collect())
    }

    // ==================== Room Operations ====================

    /// Rooms of a hostel, in creation order
    pub fn rooms(&self, hostel_id: &str) -> Result<Vec<Room>> {
        Ok(self
            .load()?
            .rooms
            .into_iter()
            .filter(|r| r.hostel_id == hostel_id)
            .collect())
    }

    /// Add an unoccupied room
    pub fn add_room(&mut self, hostel_id: &str, number: &str) -> Result<()> {
        let mut doc = self.load()?;
        doc.rooms.push(Room::new(hostel_id, number));
        self.write(&doc).context("Failed to save room")?;
        info!("Added room {} to {}", number, hostel_id);
        Ok(())
    }

    /// Remove every room with this number in the hostel
    ///
    /// Returns the number of rooms removed.
    pub fn delete_room(&mut self, hostel_id: &str, number: &str) -> Result<usize> {
        let mut doc = self.load()?;

        let before = doc.rooms.len();
        doc.rooms
            .retain(|r| !(r.hostel_id == hostel_id && r.number == number));
        let removed = before - doc.rooms.len();

        self.write(&doc).context("Failed to save room deletion")?;
        info!("Deleted {} room(s) {} from {}", removed, number, hostel_id);
        Ok(removed)
    }

    // ==================== Payment Operations ====================

    /// Append a payment to the log
    pub fn add_payment(&mut self, payment: NewPayment) -> Result<()> {
        let mut doc = self.load()?;

        info!(
            "Recording payment of {} from {} to {}",
            payment.amount, payment.student_phone, payment.hostel_id
        );
        doc.payments.push(LedgerEntry::Payment(Payment {
            hostel_id: payment.hostel_id,
            student_phone: payment.student_phone,
            student_name: payment.student_name,
            amount: payment.amount,
            date: now(),
            note: payment.note,
        }));

        self.write(&doc).context("Failed to save payment")
    }

    /// Payments received by a hostel, oldest first
    pub fn payments(&self, hostel_id: &str) -> Result<Vec<Payment>> {
        Ok(self
            .load()?
            .payments
            .into_iter()
            .filter_map(|e| match e {
                LedgerEntry::Payment(p) if p.hostel_id == hostel_id => Some(p),
                _ => None,
            })
            .collect())
    }

    // ==================== Sessions ====================

    /// Log in as an owner (by contact) or a student (by phone)
    ///
    /// The password is not checked. On success the current session is
    /// replaced; on failure it is left as it was.
    pub fn login(&mut self, role: Role, username: &str, _password: &str) -> Result<ActionResult> {
        let doc = self.load()?;

        let found = match role {
            Role::Owner => doc.owners.iter().any(|o| o.contact == username),
            Role::Student => doc.students.iter().any(|s| s.phone == username),
        };
        if !found {
            warn!("Login failed: no {} {}", role, username);
            return Ok(match role {
                Role::Owner => Rejection::OwnerNotFound,
                Role::Student => Rejection::StudentNotFound,
            }
            .into());
        }

        let session = CurrentSession::new(role, username);
        let json = serde_json::to_string(&session).context("Failed to serialize session")?;
        self.backend
            .set(SESSION_KEY, &json)
            .context("Failed to save session")?;
        info!("Logged in {} {}", role, username);
        Ok(ActionResult::ok())
    }

    /// Clear the current session
    pub fn logout(&mut self) -> Result<()> {
        self.backend
            .remove(SESSION_KEY)
            .context("Failed to clear session")?;
        info!("Logged out");
        Ok(())
    }

    /// The current session, if logged in
    pub fn current_user(&self) -> Result<Option<CurrentSession>> {
        let raw = self
            .backend
            .get(SESSION_KEY)
            .context("Failed to read session")?;
        match raw {
            Some(json) => {
                let session = serde_json::from_str(&json).map_err(|e| {
                    StorageError::InvalidFormat {
                        key: SESSION_KEY.to_string(),
                        details: e.to_string(),
                    }
                })?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}
