//! Notification payload and the host delivery capability.

/// A notification handed to the host's delivery capability.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub sound: String,
}

impl Notification {
    /// Reminder notification for an appointment `days_in_advance` days out.
    pub fn appointment_reminder(patient_name: &str, days_in_advance: u32) -> Self {
        Self {
            title: "Appointment reminder".into(),
            body: format!(
                "{} has an appointment in {} days.",
                patient_name, days_in_advance
            ),
            sound: "default".into(),
        }
    }
}

/// Delivery capability provided by the host environment.
///
/// Implemented on the foreign side (the desktop shell) and handed to the
/// trigger. Delivery is fire-and-forget: no confirmation, no retries.
#[uniffi::export(with_foreign)]
pub trait NotificationSink: Send + Sync {
    /// Ask the host for notification permission. Called once per trigger.
    fn request_permission(&self) -> bool;

    /// Deliver a notification.
    fn send(&self, notification: Notification);
}
