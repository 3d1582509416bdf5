//! Patient directory port: read-only lookup of patient records.

use crate::domain::PatientRecord;

/// Read-only patient lookup keyed by patient identifier.
pub trait PatientDirectory: Send + Sync {
    /// Look up a patient. `None` when the identifier is unknown.
    fn get_patient_by_id(&self, id: &str) -> Option<PatientRecord>;

    /// Number of records in the directory.
    fn len(&self) -> usize;

    /// Whether the directory has no records.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
