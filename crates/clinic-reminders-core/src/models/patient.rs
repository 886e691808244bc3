//! Patient and reminder models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A reminder offset attached to a patient.
///
/// Fires a single notification on the day the remaining days until the
/// appointment equal `days_in_advance`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Reminder {
    /// Unique reminder ID
    pub id: String,
    /// Days before the appointment at which the notification fires (>= 1)
    pub days_in_advance: u32,
}

impl Reminder {
    /// Default offset for the first reminder on a new patient.
    pub const DEFAULT_OFFSET: u32 = 20;

    /// Default offset for reminders added beyond the first.
    pub const ADDITIONAL_OFFSET: u32 = 10;

    /// Create a new reminder with the given offset.
    ///
    /// Offsets below one are clamped at the FFI boundary; this constructor
    /// does not re-validate.
    pub fn new(days_in_advance: u32) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            days_in_advance,
        }
    }
}

/// A patient record with an appointment date and its reminder offsets.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Patient {
    /// Unique patient ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Appointment date (whole-day granularity, time of day irrelevant)
    pub appointment_date: NaiveDate,
    /// Creation timestamp (informational only)
    pub created_at: DateTime<Utc>,
    /// Reminder offsets; holds at least one entry
    pub reminders: Vec<Reminder>,
}

impl Patient {
    /// Create a new patient with the given reminders.
    ///
    /// The boundary guarantees `reminders` is non-empty before the record
    /// reaches the domain.
    pub fn new(name: String, appointment_date: NaiveDate, reminders: Vec<Reminder>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            appointment_date,
            created_at: Utc::now(),
            reminders,
        }
    }

    /// Add a reminder with the given offset.
    pub fn add_reminder(&mut self, days_in_advance: u32) -> &Reminder {
        self.reminders.push(Reminder::new(days_in_advance));
        &self.reminders[self.reminders.len() - 1]
    }

    /// Remove a reminder by ID.
    ///
    /// No-op (returns false) when the ID is unknown or when removal would
    /// drop the last remaining reminder.
    pub fn remove_reminder(&mut self, reminder_id: &str) -> bool {
        if self.reminders.len() <= 1 {
            return false;
        }
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != reminder_id);
        self.reminders.len() < before
    }

    /// Update a reminder's offset. Returns false when the ID is unknown.
    pub fn set_reminder_offset(&mut self, reminder_id: &str, days_in_advance: u32) -> bool {
        match self.reminders.iter_mut().find(|r| r.id == reminder_id) {
            Some(reminder) => {
                reminder.days_in_advance = days_in_advance;
                true
            }
            None => false,
        }
    }

    /// Largest offset among this patient's own reminders.
    pub fn max_reminder_offset(&self) -> u32 {
        self.reminders
            .iter()
            .map(|r| r.days_in_advance)
            .max()
            .unwrap_or(0)
    }
}
