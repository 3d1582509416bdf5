//! Patient directory records.

use serde::{Deserialize, Serialize};

/// Administrative sex as recorded in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
    Other,
    Unknown,
}

impl std::fmt::Display for Sex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Female => write!(f, "Female"),
            Self::Male => write!(f, "Male"),
            Self::Other => write!(f, "Other"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A patient as known to the clinical directory.
///
/// Read-only from the application's point of view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Patient identifier (e.g. `P1001`)
    pub id: String,

    /// Medical record number
    pub mrn: String,

    /// Full name
    pub name: String,

    /// Date of birth
    pub date_of_birth: chrono::NaiveDate,

    /// Administrative sex
    pub sex: Sex,

    /// Primary condition under follow-up, if any
    #[serde(default)]
    pub primary_condition: Option<String>,
}

impl PatientRecord {
    /// Age in whole years on `today`.
    #[must_use]
    pub fn age_on(&self, today: chrono::NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }
}
