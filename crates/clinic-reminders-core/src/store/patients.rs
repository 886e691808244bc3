//! Patient collection persistence.
//!
//! The whole collection lives in one JSON document under a fixed key and is
//! replaced wholesale on every save. Date fields are revived from their
//! ISO-8601 serialized form on load.

use rusqlite::{params, OptionalExtension};

use super::{Store, StoreResult};
use crate::models::Patient;

/// Fixed key under which the patient collection is stored.
pub const PATIENTS_KEY: &str = "clinic_patients";

impl Store {
    /// Load the stored patient collection.
    ///
    /// An absent key yields an empty collection. A malformed stored value
    /// propagates the parse error; it is never mapped to an empty result.
    pub fn load_patients(&self) -> StoreResult<Vec<Patient>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?",
                [PATIENTS_KEY],
                |row| row.get(0),
            )
            .optional()?;

        match value {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    /// Overwrite the stored collection with `patients`.
    ///
    /// Single-statement upsert, so the replace is atomic from the caller's
    /// perspective.
    pub fn save_patients(&self, patients: &[Patient]) -> StoreResult<()> {
        let json = serde_json::to_string(patients)?;
        self.conn.execute(
            r#"
            INSERT INTO app_state (key, value, updated_at)
            VALUES (?1, ?2, datetime('now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![PATIENTS_KEY, json],
        )?;
        Ok(())
    }
}
