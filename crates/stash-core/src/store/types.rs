//! Core data types for the vault store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StashError};

/// A stored secret entry.
///
/// On disk the `passphrase` field always holds the transform-encoded value.
/// Values returned to callers carry either the decoded passphrase (Fetch) or
/// no passphrase at all (FetchAll/Query) — `None` is skipped entirely during
/// serialization so listings never contain the field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretEntry {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    /// Platform this credential belongs to (e.g., "mail")
    pub platform: String,

    /// Username on that platform
    pub username: String,

    /// Passphrase (encoded at rest, decoded only toward Fetch callers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,

    /// Optional free-form notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Optional URL for the platform
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// When this entry was created
    pub created_at: DateTime<Utc>,

    /// How many times this entry was fetched by identifier
    pub total_accesses: u64,
}

/// Builder for creating or replacing a secret entry.
///
/// Produced from a JSON payload by [`NewEntry::from_json`], which rejects
/// unknown fields and missing/empty required fields before any store
/// mutation happens.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewEntry {
    pub platform: String,
    pub username: String,
    pub passphrase: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl NewEntry {
    pub fn new(
        platform: impl Into<String>,
        username: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            platform: platform.into(),
            username: username.into(),
            passphrase: passphrase.into(),
            notes: None,
            url: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Parse and validate an entry payload.
    ///
    /// # Errors
    ///
    /// Returns `StashError::Validation` for structurally invalid JSON,
    /// unknown fields, or missing/empty required fields.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let entry: NewEntry = serde_json::from_value(value)
            .map_err(|e| StashError::Validation(format!("Invalid entry payload: {}", e)))?;
        entry.validate()?;
        Ok(entry)
    }

    /// Check required fields are present and non-empty.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("platform", &self.platform),
            ("username", &self.username),
            ("passphrase", &self.passphrase),
        ] {
            if value.trim().is_empty() {
                return Err(StashError::Validation(format!(
                    "Missing required field: {}",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// A constant key/value substitution pair.
///
/// Distinct from secret entries: keys are unique (declaring an existing key
/// overwrites) and forgetting an absent key is not an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConstantPair {
    pub key: String,
    pub value: String,
}

/// The single owner credential record.
///
/// Holds a passphrase-derived verifier (argon2 PHC string), never the raw
/// passphrase. Created once by registration, replaced only by a passphrase
/// reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerRecord {
    pub identity: String,
    pub verifier: String,
}

/// The persisted vault document: one file per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultDocument {
    /// Format version (e.g., "1")
    pub format_version: String,

    /// When this vault was created
    pub created_at: DateTime<Utc>,

    /// The registered owner, if any
    pub owner: Option<OwnerRecord>,

    /// Secret entries in insertion order
    pub entries: Vec<SecretEntry>,

    /// Constant pairs in declaration order
    pub constants: Vec<ConstantPair>,
}

impl VaultDocument {
    pub fn new() -> Self {
        Self {
            format_version: "1".to_string(),
            created_at: Utc::now(),
            owner: None,
            entries: Vec::new(),
            constants: Vec::new(),
        }
    }
}

impl Default for VaultDocument {
    fn default() -> Self {
        Self::new()
    }
}
