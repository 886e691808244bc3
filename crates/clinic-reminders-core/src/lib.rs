//! Clinic Reminders Core Library
//!
//! Local-first patient appointment tracker with daily reminder
//! notifications.
//!
//! # Architecture
//!
//! ```text
//! UI shell (form, list, stat cards)
//!      │ add_patient / delete_patient / derived queries
//!      ▼
//! ClinicCore ─── in-memory collection (cache of the store)
//!      │ full-collection save on every mutation
//!      ▼
//! Store (SQLite, one JSON entry under a fixed key)
//!
//! reminder worker: check at startup, then every 24 h
//!      │ days_remaining == days_in_advance ?
//!      ▼
//! NotificationSink (host capability; no-op without permission)
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (Patient, Reminder)
//! - [`store`]: SQLite-backed key-value persistence
//! - [`queries`]: Pure derived queries (days remaining, status, filters)
//! - [`notify`]: Due-reminder trigger, sink capability, periodic worker

pub mod models;
pub mod notify;
pub mod queries;
pub mod store;

// Re-export commonly used types
pub use models::{Patient, Reminder};
pub use notify::{
    DueReminder, Notification, NotificationSink, ReminderTrigger, TriggerState, WorkerHandle,
};
pub use queries::{Stats, Status};
pub use store::Store;

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum ClinicError {
    #[error("Store error: {0}")]
    StoreError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Worker error: {0}")]
    WorkerError(String),
}

impl From<store::StoreError> for ClinicError {
    fn from(e: store::StoreError) -> Self {
        ClinicError::StoreError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for ClinicError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        ClinicError::StoreError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the clinic store at the given path.
///
/// An unreadable or corrupt store is a fatal open error; it is never
/// silently replaced with an empty collection.
#[uniffi::export]
pub fn open_clinic(path: String) -> Result<Arc<ClinicCore>, ClinicError> {
    let store = Store::open(&path)?;
    ClinicCore::from_store(store)
}

/// Create an in-memory clinic core (for testing).
#[uniffi::export]
pub fn open_clinic_in_memory() -> Result<Arc<ClinicCore>, ClinicError> {
    let store = Store::open_in_memory()?;
    ClinicCore::from_store(store)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe coordinator for FFI.
///
/// Owns the patient collection; every mutation replaces it wholesale and
/// persists the new collection before it becomes visible.
#[derive(uniffi::Object)]
pub struct ClinicCore {
    store: Arc<Mutex<Store>>,
    patients: Mutex<Vec<Patient>>,
    worker: Mutex<Option<WorkerHandle>>,
}

impl ClinicCore {
    fn from_store(store: Store) -> Result<Arc<ClinicCore>, ClinicError> {
        let patients = store.load_patients()?;
        Ok(Arc::new(ClinicCore {
            store: Arc::new(Mutex::new(store)),
            patients: Mutex::new(patients),
            worker: Mutex::new(None),
        }))
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }
}

#[uniffi::export]
impl ClinicCore {
    // =========================================================================
    // Commands
    // =========================================================================

    /// Register a new patient.
    ///
    /// `appointment_date` is an ISO-8601 calendar date (YYYY-MM-DD).
    /// Requires a non-empty name and at least one reminder offset; offsets
    /// are clamped to a minimum of one day.
    pub fn add_patient(
        &self,
        name: String,
        appointment_date: String,
        reminder_offsets: Vec<u32>,
    ) -> Result<FfiPatient, ClinicError> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ClinicError::InvalidInput(
                "patient name must not be empty".into(),
            ));
        }
        let date = NaiveDate::parse_from_str(&appointment_date, "%Y-%m-%d")
            .map_err(|e| ClinicError::InvalidInput(format!("invalid appointment date: {}", e)))?;
        if reminder_offsets.is_empty() {
            return Err(ClinicError::InvalidInput(
                "at least one reminder is required".into(),
            ));
        }
        let reminders = reminder_offsets
            .into_iter()
            .map(|days| Reminder::new(days.max(1)))
            .collect();
        let patient = Patient::new(name, date, reminders);

        let mut patients = self.patients.lock()?;
        let mut updated = patients.clone();
        updated.push(patient.clone());
        self.store.lock()?.save_patients(&updated)?;
        *patients = updated;

        Ok(patient.into())
    }

    /// Delete a patient by ID, cascading to its reminders.
    ///
    /// Returns false (no-op) when the ID is unknown.
    pub fn delete_patient(&self, id: String) -> Result<bool, ClinicError> {
        let mut patients = self.patients.lock()?;
        let updated: Vec<Patient> = patients.iter().filter(|p| p.id != id).cloned().collect();
        let removed = updated.len() < patients.len();
        if removed {
            self.store.lock()?.save_patients(&updated)?;
            *patients = updated;
        }
        Ok(removed)
    }

    // =========================================================================
    // Derived Queries
    // =========================================================================

    /// All patients, sorted ascending by appointment date.
    pub fn list_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(queries::sorted_by_appointment(&patients)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Patients due today or within their own largest reminder offset.
    pub fn upcoming_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(queries::upcoming(&patients, Self::today())
            .into_iter()
            .map(|p| p.clone().into())
            .collect())
    }

    /// Patients whose appointment date has passed.
    pub fn overdue_patients(&self) -> Result<Vec<FfiPatient>, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(queries::overdue(&patients, Self::today())
            .into_iter()
            .map(|p| p.clone().into())
            .collect())
    }

    /// Aggregate counts for the stat cards.
    pub fn stats(&self) -> Result<FfiStats, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(queries::stats(&patients, Self::today()).into())
    }

    /// Dataset-wide reminder window used for status coloring.
    pub fn reminder_window(&self) -> Result<u32, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(queries::max_reminder_offset(&patients))
    }

    /// Reminders whose offset matches today exactly.
    pub fn due_today(&self) -> Result<Vec<DueReminder>, ClinicError> {
        let patients = self.patients.lock()?;
        Ok(notify::due_reminders(&patients, Self::today()))
    }

    // =========================================================================
    // Reminder Worker
    // =========================================================================

    /// Start the daily reminder worker with the host's notification sink.
    ///
    /// Requests notification permission once, runs an immediate check, then
    /// one every 24 hours. No-op when the worker is already running.
    pub fn start_reminder_worker(
        &self,
        sink: Arc<dyn NotificationSink>,
    ) -> Result<(), ClinicError> {
        let mut worker = self.worker.lock()?;
        if worker.is_some() {
            return Ok(());
        }
        let trigger = ReminderTrigger::new(sink);
        let handle = WorkerHandle::spawn(Arc::clone(&self.store), trigger, notify::CHECK_PERIOD)
            .map_err(|e| ClinicError::WorkerError(e.to_string()))?;
        *worker = Some(handle);
        Ok(())
    }

    /// Stop the reminder worker. No-op when it is not running.
    pub fn stop_reminder_worker(&self) -> Result<(), ClinicError> {
        if let Some(handle) = self.worker.lock()?.take() {
            handle.stop();
        }
        Ok(())
    }
}

// =========================================================================
// Free Functions (exported to FFI)
// =========================================================================

/// Classify a days-remaining value against an upcoming threshold.
#[uniffi::export]
pub fn classify_status(days_remaining: i64, threshold: u32) -> Status {
    queries::status_of(days_remaining, threshold)
}

/// Default offset for the first reminder on a new patient.
#[uniffi::export]
pub fn default_reminder_offset() -> u32 {
    Reminder::DEFAULT_OFFSET
}

/// Default offset for reminders added beyond the first.
#[uniffi::export]
pub fn additional_reminder_offset() -> u32 {
    Reminder::ADDITIONAL_OFFSET
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe reminder.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiReminder {
    pub id: String,
    pub days_in_advance: u32,
}

impl From<Reminder> for FfiReminder {
    fn from(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            days_in_advance: reminder.days_in_advance,
        }
    }
}

/// FFI-safe patient. Dates are ISO-8601 strings.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiPatient {
    pub id: String,
    pub name: String,
    pub appointment_date: String,
    pub created_at: String,
    pub reminders: Vec<FfiReminder>,
}

impl From<Patient> for FfiPatient {
    fn from(patient: Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name,
            appointment_date: patient.appointment_date.format("%Y-%m-%d").to_string(),
            created_at: patient.created_at.to_rfc3339(),
            reminders: patient.reminders.into_iter().map(Into::into).collect(),
        }
    }
}

/// FFI-safe aggregate counts.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStats {
    pub total: u64,
    pub upcoming: u64,
    pub overdue: u64,
}

impl From<Stats> for FfiStats {
    fn from(stats: Stats) -> Self {
        Self {
            total: stats.total,
            upcoming: stats.upcoming,
            overdue: stats.overdue,
        }
    }
}
