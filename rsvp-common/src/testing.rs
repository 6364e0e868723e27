//! In-memory store and recording mailer for tests
//!
//! Enabled for this crate's own tests and, through the `test-util` feature,
//! for the integration tests of the API crate.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::email::{EmailError, EmailMessage, Mailer};
use crate::models::{AvatarData, AvatarSelection, Guest, NewGuest, RsvpRecord};
use crate::store::{Store, StoreError};

/// Failure mode injected into avatar reads
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadFailure {
    Network,
    Status(u16),
    Parse,
}

impl ReadFailure {
    fn to_error(self) -> StoreError {
        match self {
            Self::Network => StoreError::Network("connection refused".to_string()),
            Self::Status(status) => StoreError::Api(status, "injected".to_string()),
            Self::Parse => StoreError::Parse("injected".to_string()),
        }
    }
}

#[derive(Debug, Clone)]
struct StoredRsvp {
    record: RsvpRecord,
    avatar_data: AvatarData,
}

/// Store kept in process memory
///
/// RSVP rows are ordered by insertion, which stands in for `submitted_at`.
#[derive(Default)]
pub struct MemoryStore {
    unconfigured: bool,
    guests: Mutex<Vec<Guest>>,
    rsvps: Mutex<Vec<StoredRsvp>>,
    guest_fetches: AtomicUsize,
    insert_calls: AtomicUsize,
    fail_fetches: AtomicBool,
    fail_writes: AtomicBool,
    failing_batches: Mutex<HashSet<usize>>,
    avatar_read_failure: Mutex<Option<ReadFailure>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that reports missing connection settings
    pub fn unconfigured() -> Self {
        Self {
            unconfigured: true,
            ..Self::default()
        }
    }

    pub fn with_guests(names: &[&str]) -> Self {
        let store = Self::new();
        for name in names {
            store.add_guest(name);
        }
        store
    }

    pub fn add_guest(&self, name: &str) {
        let mut guests = self.guests.lock().unwrap();
        let id = (guests.len() + 1).to_string();
        guests.push(Guest {
            id,
            name: name.to_string(),
            address: None,
        });
    }

    /// Seed an RSVP row with avatar data
    pub fn push_rsvp(&self, record: RsvpRecord, avatar_data: AvatarData) {
        self.rsvps
            .lock()
            .unwrap()
            .push(StoredRsvp { record, avatar_data });
    }

    pub fn guests(&self) -> Vec<Guest> {
        self.guests.lock().unwrap().clone()
    }

    pub fn rsvps(&self) -> Vec<RsvpRecord> {
        self.rsvps
            .lock()
            .unwrap()
            .iter()
            .map(|row| row.record.clone())
            .collect()
    }

    /// Avatar data of the most recent RSVP for `email`
    pub fn avatar_data(&self, email: &str) -> Option<AvatarData> {
        self.rsvps
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|row| row.record.email == email)
            .map(|row| row.avatar_data.clone())
    }

    pub fn guest_fetches(&self) -> usize {
        self.guest_fetches.load(Ordering::SeqCst)
    }

    pub fn fail_fetches(&self, fail: bool) {
        self.fail_fetches.store(fail, Ordering::SeqCst);
    }

    /// Make RSVP inserts and updates fail
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make the given `insert_guests` calls fail, counted from zero
    pub fn fail_batches(&self, calls: &[usize]) {
        *self.failing_batches.lock().unwrap() = calls.iter().copied().collect();
    }

    pub fn fail_avatar_reads(&self, failure: Option<ReadFailure>) {
        *self.avatar_read_failure.lock().unwrap() = failure;
    }

    fn check_configured(&self) -> Result<(), StoreError> {
        if self.unconfigured {
            Err(StoreError::NotConfigured)
        } else {
            Ok(())
        }
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        self.check_configured()?;
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Api(503, "injected".to_string()));
        }
        Ok(())
    }

    fn update_latest<F>(&self, email: &str, update: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut StoredRsvp),
    {
        self.check_writable()?;
        let mut rsvps = self.rsvps.lock().unwrap();
        if let Some(row) = rsvps.iter_mut().rev().find(|row| row.record.email == email) {
            update(row);
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn is_configured(&self) -> bool {
        !self.unconfigured
    }

    async fn ensure_guests_table(&self) -> Result<(), StoreError> {
        self.check_configured()
    }

    async fn fetch_guests(&self) -> Result<Vec<Guest>, StoreError> {
        self.check_configured()?;
        self.guest_fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(StoreError::Network("connection refused".to_string()));
        }
        Ok(self.guests())
    }

    async fn insert_guests(&self, batch: &[NewGuest]) -> Result<(), StoreError> {
        self.check_configured()?;
        let call = self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_batches.lock().unwrap().contains(&call) {
            return Err(StoreError::Api(500, "injected".to_string()));
        }

        let mut guests = self.guests.lock().unwrap();
        for new_guest in batch {
            let id = (guests.len() + 1).to_string();
            guests.push(Guest {
                id,
                name: new_guest.name.clone(),
                address: Some(new_guest.address.clone()).filter(|a| !a.is_empty()),
            });
        }
        Ok(())
    }

    async fn insert_rsvp(&self, record: &RsvpRecord) -> Result<(), StoreError> {
        self.check_writable()?;
        self.push_rsvp(record.clone(), AvatarData::Absent);
        Ok(())
    }

    async fn mark_verified(&self, email: &str) -> Result<(), StoreError> {
        self.update_latest(email, |row| row.record.verified = true)
    }

    async fn latest_rsvp(&self, email: &str) -> Result<Option<RsvpRecord>, StoreError> {
        self.check_configured()?;
        Ok(self
            .rsvps
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|row| row.record.email == email)
            .map(|row| row.record.clone()))
    }

    async fn save_avatars(
        &self,
        email: &str,
        avatars: &[AvatarSelection],
    ) -> Result<(), StoreError> {
        let data = AvatarData::from(avatars.to_vec());
        self.update_latest(email, |row| row.avatar_data = data)
    }

    async fn displayable_avatar_data(&self) -> Result<Vec<AvatarData>, StoreError> {
        self.check_configured()?;
        if let Some(failure) = *self.avatar_read_failure.lock().unwrap() {
            return Err(failure.to_error());
        }
        Ok(self
            .rsvps
            .lock()
            .unwrap()
            .iter()
            .filter(|row| row.record.is_attending && row.record.verified)
            .map(|row| row.avatar_data.clone())
            .collect())
    }
}

/// Mailer that keeps every message it is asked to send
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<EmailMessage>>,
    fail: AtomicBool,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sends fail after recording the attempt
    pub fn fail_sends(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Every attempted message, in order
    pub fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, address: &str) -> Vec<EmailMessage> {
        self.sent()
            .into_iter()
            .filter(|message| message.to == address)
            .collect()
    }

    /// Wait until at least `count` messages were attempted or `timeout` passes
    pub async fn wait_for(&self, count: usize, timeout: Duration) -> Vec<EmailMessage> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            let sent = self.sent();
            if sent.len() >= count || tokio::time::Instant::now() >= deadline {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<String, EmailError> {
        let id = {
            let mut sent = self.sent.lock().unwrap();
            sent.push(message.clone());
            format!("msg-{}", sent.len())
        };

        if self.fail.load(Ordering::SeqCst) {
            return Err(EmailError::Api(422, "injected".to_string()));
        }
        Ok(id)
    }
}
