//! Due-reminder detection and the periodic check trigger.

use std::sync::Arc;

use chrono::NaiveDate;

use super::{Notification, NotificationSink};
use crate::models::Patient;
use crate::queries::days_remaining;

/// Trigger check states. Each tick runs Idle -> Checking -> Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerState {
    Idle,
    Checking,
}

/// A (patient, reminder) pair whose offset matches today exactly.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct DueReminder {
    pub patient_id: String,
    pub patient_name: String,
    pub days_in_advance: u32,
}

/// Reminders due on `today`: days remaining equals the offset exactly.
///
/// A reminder therefore fires on precisely one calendar day. Days the
/// process was not running are silently missed; there is no catch-up.
pub fn due_reminders(patients: &[Patient], today: NaiveDate) -> Vec<DueReminder> {
    let mut due = Vec::new();
    for patient in patients {
        let days = days_remaining(patient, today);
        for reminder in &patient.reminders {
            if days == i64::from(reminder.days_in_advance) {
                due.push(DueReminder {
                    patient_id: patient.id.clone(),
                    patient_name: patient.name.clone(),
                    days_in_advance: reminder.days_in_advance,
                });
            }
        }
    }
    due
}

/// Periodic reminder check against a notification sink.
///
/// There is no dedup guard across ticks: running twice on the same
/// calendar day delivers the same notifications again.
pub struct ReminderTrigger {
    sink: Arc<dyn NotificationSink>,
    permission_granted: bool,
    state: TriggerState,
}

impl ReminderTrigger {
    /// Create a trigger, requesting notification permission once.
    ///
    /// Denied permission is non-fatal: checks keep running, delivery
    /// becomes a no-op.
    pub fn new(sink: Arc<dyn NotificationSink>) -> Self {
        let permission_granted = sink.request_permission();
        if !permission_granted {
            log::warn!("notification permission denied; reminders will not be delivered");
        }
        Self {
            sink,
            permission_granted,
            state: TriggerState::Idle,
        }
    }

    /// Current state. Idle between ticks.
    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Whether the host granted notification permission at construction.
    pub fn permission_granted(&self) -> bool {
        self.permission_granted
    }

    /// Run one check over `patients`, delivering a notification per due
    /// reminder. Returns the number of due reminders found.
    pub fn tick(&mut self, patients: &[Patient], today: NaiveDate) -> usize {
        self.state = TriggerState::Checking;
        let due = due_reminders(patients, today);
        for item in &due {
            log::debug!(
                "reminder due for {} ({} days ahead)",
                item.patient_name,
                item.days_in_advance
            );
            if self.permission_granted {
                self.sink.send(Notification::appointment_reminder(
                    &item.patient_name,
                    item.days_in_advance,
                ));
            }
        }
        self.state = TriggerState::Idle;
        due.len()
    }
}
