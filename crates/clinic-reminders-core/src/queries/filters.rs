//! Collection filters and aggregate counts.

use chrono::NaiveDate;

use super::days_remaining;
use crate::models::{Patient, Reminder};

/// Aggregate counts backing the stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub total: u64,
    pub upcoming: u64,
    pub overdue: u64,
}

/// Largest configured offset across the whole dataset.
///
/// Falls back to [`Reminder::DEFAULT_OFFSET`] for an empty collection.
/// This global window drives display classification via
/// [`status_of`](super::status_of); it is distinct from the per-patient
/// window used by [`upcoming`].
pub fn max_reminder_offset(patients: &[Patient]) -> u32 {
    patients
        .iter()
        .flat_map(|p| p.reminders.iter())
        .map(|r| r.days_in_advance)
        .max()
        .unwrap_or(Reminder::DEFAULT_OFFSET)
}

/// Patients whose appointment is today or within their own largest offset.
pub fn upcoming<'a>(patients: &'a [Patient], today: NaiveDate) -> Vec<&'a Patient> {
    patients
        .iter()
        .filter(|p| {
            let days = days_remaining(p, today);
            days >= 0 && days <= i64::from(p.max_reminder_offset())
        })
        .collect()
}

/// Patients whose appointment date has passed.
pub fn overdue<'a>(patients: &'a [Patient], today: NaiveDate) -> Vec<&'a Patient> {
    patients
        .iter()
        .filter(|p| days_remaining(p, today) < 0)
        .collect()
}

/// The collection sorted ascending by appointment date.
///
/// The sort is stable: patients sharing a date keep their original
/// relative order.
pub fn sorted_by_appointment(patients: &[Patient]) -> Vec<Patient> {
    let mut sorted = patients.to_vec();
    sorted.sort_by_key(|p| p.appointment_date);
    sorted
}

/// Aggregate counts for the collection.
pub fn stats(patients: &[Patient], today: NaiveDate) -> Stats {
    Stats {
        total: patients.len() as u64,
        upcoming: upcoming(patients, today).len() as u64,
        overdue: overdue(patients, today).len() as u64,
    }
}
