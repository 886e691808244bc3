//! FFI surface tests: commands, boundary validation, and worker lifecycle.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{Duration as Days, Local};
use clinic_reminders_core::{
    additional_reminder_offset, classify_status, default_reminder_offset, open_clinic,
    open_clinic_in_memory, ClinicError, Notification, NotificationSink, Status,
};

struct RecordingSink {
    permission: bool,
    sent: Mutex<Vec<Notification>>,
}

impl RecordingSink {
    fn new(permission: bool) -> Arc<Self> {
        Arc::new(Self {
            permission,
            sent: Mutex::new(Vec::new()),
        })
    }
}

impl NotificationSink for RecordingSink {
    fn request_permission(&self) -> bool {
        self.permission
    }

    fn send(&self, notification: Notification) {
        self.sent.lock().unwrap().push(notification);
    }
}

fn date_days_out(days: i64) -> String {
    (Local::now().date_naive() + Days::days(days))
        .format("%Y-%m-%d")
        .to_string()
}

#[test]
fn test_add_and_list_sorted() {
    let core = open_clinic_in_memory().unwrap();
    core.add_patient("Cora".into(), date_days_out(9), vec![5]).unwrap();
    core.add_patient("Ana".into(), date_days_out(2), vec![5]).unwrap();
    core.add_patient("Bob".into(), date_days_out(5), vec![5]).unwrap();

    let names: Vec<_> = core
        .list_patients()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["Ana", "Bob", "Cora"]);
}

#[test]
fn test_add_patient_validation() {
    let core = open_clinic_in_memory().unwrap();

    let err = core.add_patient("   ".into(), date_days_out(5), vec![5]);
    assert!(matches!(err, Err(ClinicError::InvalidInput(_))));

    let err = core.add_patient("Ana".into(), "not-a-date".into(), vec![5]);
    assert!(matches!(err, Err(ClinicError::InvalidInput(_))));

    let err = core.add_patient("Ana".into(), date_days_out(5), vec![]);
    assert!(matches!(err, Err(ClinicError::InvalidInput(_))));

    // Offsets below one are clamped, not rejected.
    let patient = core
        .add_patient("Ana".into(), date_days_out(5), vec![0])
        .unwrap();
    assert_eq!(patient.reminders[0].days_in_advance, 1);
}

#[test]
fn test_delete_patient() {
    let core = open_clinic_in_memory().unwrap();
    let ana = core
        .add_patient("Ana".into(), date_days_out(5), vec![5, 12])
        .unwrap();
    let bob = core
        .add_patient("Bob".into(), date_days_out(9), vec![7])
        .unwrap();

    assert!(core.delete_patient(ana.id).unwrap());

    let remaining = core.list_patients().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, bob.id);
    assert_eq!(remaining[0].reminders.len(), 1);

    // Deleting a nonexistent id is a no-op.
    assert!(!core.delete_patient("no-such-id".into()).unwrap());
    assert_eq!(core.list_patients().unwrap().len(), 1);
}

#[test]
fn test_stats_and_reminder_window() {
    let core = open_clinic_in_memory().unwrap();

    let stats = core.stats().unwrap();
    assert_eq!((stats.total, stats.upcoming, stats.overdue), (0, 0, 0));
    assert_eq!(core.reminder_window().unwrap(), 20);

    core.add_patient("Ana".into(), date_days_out(5), vec![5]).unwrap();
    core.add_patient("Cora".into(), date_days_out(60), vec![30]).unwrap();

    let stats = core.stats().unwrap();
    assert_eq!(stats.total, 2);
    assert_eq!(stats.upcoming, 1);
    assert_eq!(stats.overdue, 0);
    assert_eq!(core.reminder_window().unwrap(), 30);
}

#[test]
fn test_due_today() {
    let core = open_clinic_in_memory().unwrap();
    core.add_patient("Ana".into(), date_days_out(5), vec![5]).unwrap();
    core.add_patient("Bob".into(), date_days_out(9), vec![3]).unwrap();

    let due = core.due_today().unwrap();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].patient_name, "Ana");
    assert_eq!(due[0].days_in_advance, 5);
}

#[test]
fn test_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("clinic.db").to_string_lossy().into_owned();

    {
        let core = open_clinic(path.clone()).unwrap();
        core.add_patient("Ana".into(), date_days_out(5), vec![5]).unwrap();
    }

    let core = open_clinic(path).unwrap();
    let patients = core.list_patients().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name, "Ana");
}

#[test]
fn test_form_defaults() {
    assert_eq!(default_reminder_offset(), 20);
    assert_eq!(additional_reminder_offset(), 10);
}

#[test]
fn test_classify_status() {
    assert_eq!(classify_status(-1, 20), Status::Overdue);
    assert_eq!(classify_status(0, 20), Status::DueSoon);
    assert_eq!(classify_status(21, 20), Status::Normal);
}

#[test]
fn test_worker_start_and_stop() {
    let core = open_clinic_in_memory().unwrap();
    core.add_patient("Ana".into(), date_days_out(5), vec![5]).unwrap();

    let sink = RecordingSink::new(true);
    core.start_reminder_worker(sink.clone()).unwrap();
    // Starting again while running is a no-op.
    core.start_reminder_worker(sink.clone()).unwrap();

    // The first check runs immediately.
    std::thread::sleep(Duration::from_millis(200));
    core.stop_reminder_worker().unwrap();

    let sent = sink.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].body, "Ana has an appointment in 5 days.");
}

#[test]
fn test_worker_denied_permission_degrades_to_noop() {
    let core = open_clinic_in_memory().unwrap();
    core.add_patient("Ana".into(), date_days_out(5), vec![5]).unwrap();

    let sink = RecordingSink::new(false);
    core.start_reminder_worker(sink.clone()).unwrap();
    std::thread::sleep(Duration::from_millis(200));
    core.stop_reminder_worker().unwrap();

    assert!(sink.sent.lock().unwrap().is_empty());
}
