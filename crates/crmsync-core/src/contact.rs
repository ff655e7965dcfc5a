//! Local contact record
//!
//! The contact is owned by the storage collaborator; the core only reads and
//! writes the fields it maps. All fields except the identity pair are plain
//! profile data.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A local CRM contact record
///
/// Invariant: `external_id`, when present, is a non-negative integer encoded
/// as a string. It is the correlation key linking this record to its remote
/// profile counterpart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalContact {
    /// Opaque record ID, assigned by the store on first insert
    pub id: Option<String>,

    /// Correlation key to the remote profile (string-encoded integer)
    pub external_id: Option<String>,

    pub first_name: Option<String>,
    pub last_name: Option<String>,

    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthdate: Option<NaiveDate>,

    pub mailing_street: Option<String>,
    pub mailing_city: Option<String>,
    pub mailing_state: Option<String>,
    pub mailing_country: Option<String>,
    pub mailing_postal_code: Option<String>,

    /// When this record last completed a push to the remote system
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl LocalContact {
    /// Create an empty contact with no identity and no correlation key
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a contact pre-correlated to a remote profile
    pub fn with_external_id(external_id: impl Into<String>) -> Self {
        Self {
            external_id: Some(external_id.into()),
            ..Self::default()
        }
    }

    /// The correlation key parsed as an integer, if present and numeric
    pub fn external_id_value(&self) -> Option<i64> {
        self.external_id
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }
}
