//! Day arithmetic and status classification.

use chrono::NaiveDate;

use crate::models::Patient;

/// Appointment status relative to an upcoming threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum Status {
    /// Appointment date has passed
    Overdue,
    /// Today or within the upcoming threshold
    DueSoon,
    /// Further out than the threshold
    Normal,
}

/// Signed whole-day difference between the appointment date and `today`.
///
/// Negative means the appointment has passed.
pub fn days_remaining(patient: &Patient, today: NaiveDate) -> i64 {
    patient
        .appointment_date
        .signed_duration_since(today)
        .num_days()
}

/// Classify a days-remaining value against an upcoming threshold.
pub fn status_of(days_remaining: i64, threshold: u32) -> Status {
    if days_remaining < 0 {
        Status::Overdue
    } else if days_remaining <= i64::from(threshold) {
        Status::DueSoon
    } else {
        Status::Normal
    }
}
