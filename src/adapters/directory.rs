//! In-memory patient directory.
//!
//! Seeded either from the built-in demo roster or from a JSON file holding
//! an array of `PatientRecord`s.

use std::collections::HashMap;
use std::path::Path;

use chrono::NaiveDate;

use crate::domain::{PatientRecord, Sex};
use crate::ports::PatientDirectory;

/// Errors while loading a directory file.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Failed to read patient file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid patient file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Duplicate patient id in directory: {0}")]
    DuplicateId(String),
}

/// Read-only directory backed by a `HashMap`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPatientDirectory {
    records: HashMap<String, PatientRecord>,
}

impl InMemoryPatientDirectory {
    /// Build a directory from records.
    ///
    /// # Errors
    /// Returns `DirectoryError::DuplicateId` if two records share an id.
    pub fn from_records(
        records: impl IntoIterator<Item = PatientRecord>,
    ) -> Result<Self, DirectoryError> {
        let mut map = HashMap::new();
        for record in records {
            if map.contains_key(&record.id) {
                return Err(DirectoryError::DuplicateId(record.id));
            }
            map.insert(record.id.clone(), record);
        }
        Ok(Self { records: map })
    }

    /// Load a JSON array of patient records.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let content = std::fs::read_to_string(path)?;
        let records: Vec<PatientRecord> = serde_json::from_str(&content)?;
        let directory = Self::from_records(records)?;
        tracing::info!(count = directory.records.len(), "Loaded patient directory");
        Ok(directory)
    }

    /// Built-in demo roster.
    #[must_use]
    pub fn demo() -> Self {
        let records = demo_records();
        let records = records.into_iter().map(|r| (r.id.clone(), r)).collect();
        Self { records }
    }
}

impl PatientDirectory for InMemoryPatientDirectory {
    fn get_patient_by_id(&self, id: &str) -> Option<PatientRecord> {
        self.records.get(id).cloned()
    }

    fn len(&self) -> usize {
        self.records.len()
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn demo_records() -> Vec<PatientRecord> {
    vec![
        PatientRecord {
            id: "P1001".to_string(),
            mrn: "MRN-204981".to_string(),
            name: "Maria Lopez".to_string(),
            date_of_birth: date(1968, 4, 12),
            sex: Sex::Female,
            primary_condition: Some("Hypertension".to_string()),
        },
        PatientRecord {
            id: "P1002".to_string(),
            mrn: "MRN-337120".to_string(),
            name: "James Carter".to_string(),
            date_of_birth: date(1955, 11, 3),
            sex: Sex::Male,
            primary_condition: Some("Type 2 diabetes".to_string()),
        },
        PatientRecord {
            id: "P1003".to_string(),
            mrn: "MRN-418764".to_string(),
            name: "Aisha Bello".to_string(),
            date_of_birth: date(1982, 7, 21),
            sex: Sex::Female,
            primary_condition: Some("Asthma".to_string()),
        },
        PatientRecord {
            id: "P1004".to_string(),
            mrn: "MRN-509233".to_string(),
            name: "Tomasz Nowak".to_string(),
            date_of_birth: date(1947, 2, 28),
            sex: Sex::Male,
            primary_condition: Some("Heart failure".to_string()),
        },
        PatientRecord {
            id: "P1005".to_string(),
            mrn: "MRN-611905".to_string(),
            name: "Lena Fischer".to_string(),
            date_of_birth: date(1999, 9, 9),
            sex: Sex::Female,
            primary_condition: None,
        },
    ]
}
