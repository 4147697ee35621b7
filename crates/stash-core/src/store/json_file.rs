//! JSON-file-backed vault store.
//!
//! One vault file per deployment. Every mutating call performs a whole-file
//! read-modify-write: the document is held in memory, mutated, then
//! serialized back in full. There is no cross-call locking — concurrent
//! external modification of the backing file is out of scope under the
//! single-process, single-user assumption.

use std::fs;
use std::path::{Path, PathBuf};

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use uuid::Uuid;

use crate::error::{Result, StashError};
use crate::store::types::{ConstantPair, NewEntry, OwnerRecord, SecretEntry, VaultDocument};
use crate::transform::Transform;

/// The vault store: secret entries, constant pairs, and the owner record.
///
/// The store is the sole writer to persisted state. Passphrase fields are
/// encoded via the injected [`Transform`] at the store boundary: encoded on
/// the way in, decoded only on [`fetch`](VaultStore::fetch), and omitted
/// entirely from [`fetch_all`](VaultStore::fetch_all) and
/// [`query`](VaultStore::query) results.
pub struct VaultStore {
    path: PathBuf,
    doc: VaultDocument,
    transform: Box<dyn Transform>,
}

impl VaultStore {
    /// Open the vault at `path`, creating an empty document if the file does
    /// not exist yet. The file itself is only written on the first mutation.
    ///
    /// # Errors
    ///
    /// Returns `StashError::Storage` if the file exists but cannot be read
    /// or parsed.
    pub fn open(path: &Path, transform: Box<dyn Transform>) -> Result<Self> {
        let doc = if path.exists() {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str(&raw)
                .map_err(|e| StashError::Storage(format!("Corrupt vault file: {}", e)))?
        } else {
            VaultDocument::new()
        };

        Ok(Self {
            path: path.to_path_buf(),
            doc,
            transform,
        })
    }

    fn persist(&self) -> Result<()> {
        let raw = serde_json::to_string_pretty(&self.doc)
            .map_err(|e| StashError::Storage(format!("Failed to serialize vault: {}", e)))?;
        fs::write(&self.path, raw)?;
        Ok(())
    }

    // --- Owner operations ---

    /// Whether an owner has been registered for this vault.
    pub fn is_registered(&self) -> bool {
        self.doc.owner.is_some()
    }

    /// Register the vault owner. One-time: a second attempt fails.
    ///
    /// Stores a passphrase-derived argon2 verifier, never the passphrase.
    pub fn register(&mut self, identity: &str, passphrase: &str) -> Result<()> {
        if self.doc.owner.is_some() {
            return Err(StashError::AlreadyRegistered);
        }
        if identity.trim().is_empty() {
            return Err(StashError::Validation("Identity cannot be empty".to_string()));
        }
        if passphrase.is_empty() {
            return Err(StashError::Validation(
                "Passphrase cannot be empty".to_string(),
            ));
        }

        self.doc.owner = Some(OwnerRecord {
            identity: identity.to_string(),
            verifier: derive_verifier(passphrase)?,
        });
        self.persist()
    }

    /// Verify a login attempt against the stored owner verifier.
    ///
    /// # Errors
    ///
    /// Returns `StashError::InvalidCredential` when the vault is
    /// unregistered, the identity is unknown, or the passphrase mismatches.
    pub fn verify_owner(&self, identity: &str, passphrase: &str) -> Result<()> {
        let owner = self
            .doc
            .owner
            .as_ref()
            .ok_or(StashError::InvalidCredential)?;
        if owner.identity != identity {
            return Err(StashError::InvalidCredential);
        }

        let parsed = PasswordHash::new(&owner.verifier)
            .map_err(|e| StashError::Storage(format!("Corrupt owner verifier: {}", e)))?;
        Argon2::default()
            .verify_password(passphrase.as_bytes(), &parsed)
            .map_err(|_| StashError::InvalidCredential)
    }

    /// Replace the owner passphrase verifier. The caller is responsible for
    /// token validation before invoking this.
    pub fn reset_passphrase(&mut self, new_passphrase: &str) -> Result<()> {
        if new_passphrase.is_empty() {
            return Err(StashError::Validation(
                "Passphrase cannot be empty".to_string(),
            ));
        }
        let owner = self.doc.owner.as_mut().ok_or_else(|| {
            StashError::Validation("Vault is not registered".to_string())
        })?;
        owner.verifier = derive_verifier(new_passphrase)?;
        self.persist()
    }

    // --- Entry operations ---

    /// Insert a new entry, encoding its passphrase for persistence.
    ///
    /// # Returns
    ///
    /// Returns the generated entry identifier.
    pub fn create(&mut self, new: NewEntry) -> Result<Uuid> {
        new.validate()?;

        let id = Uuid::new_v4();
        self.doc.entries.push(SecretEntry {
            id,
            platform: new.platform,
            username: new.username,
            passphrase: Some(self.transform.encode(&new.passphrase)),
            notes: new.notes,
            url: new.url,
            created_at: Utc::now(),
            total_accesses: 0,
        });
        self.persist()?;

        Ok(id)
    }

    /// List every entry in insertion order, with passphrases omitted.
    pub fn fetch_all(&self) -> Vec<SecretEntry> {
        self.doc
            .entries
            .iter()
            .map(|entry| SecretEntry {
                passphrase: None,
                ..entry.clone()
            })
            .collect()
    }

    /// Fetch one entry by identifier, decoding its passphrase.
    ///
    /// Unconditionally increments the entry's access counter and persists it
    /// before returning; the returned value reflects this access.
    pub fn fetch(&mut self, id: &Uuid) -> Result<SecretEntry> {
        let index = self.position(id)?;
        self.doc.entries[index].total_accesses += 1;
        self.persist()?;

        let entry = &self.doc.entries[index];
        Ok(SecretEntry {
            passphrase: entry.passphrase.as_deref().map(|p| self.transform.decode(p)),
            ..entry.clone()
        })
    }

    /// Case-insensitive substring search over platform, username, and notes.
    ///
    /// Passphrases are omitted from results; access counters are untouched.
    pub fn query(&self, keyword: &str) -> Vec<SecretEntry> {
        let needle = keyword.to_lowercase();
        self.doc
            .entries
            .iter()
            .filter(|entry| {
                entry.platform.to_lowercase().contains(&needle)
                    || entry.username.to_lowercase().contains(&needle)
                    || entry
                        .notes
                        .as_deref()
                        .is_some_and(|notes| notes.to_lowercase().contains(&needle))
            })
            .map(|entry| SecretEntry {
                passphrase: None,
                ..entry.clone()
            })
            .collect()
    }

    /// Replace an entry's mutable fields.
    ///
    /// The identifier and creation timestamp are immutable; the access
    /// counter is left untouched unless `total_accesses` is supplied.
    pub fn update(
        &mut self,
        id: &Uuid,
        new: NewEntry,
        total_accesses: Option<u64>,
    ) -> Result<()> {
        new.validate()?;
        let index = self.position(id)?;
        let encoded = self.transform.encode(&new.passphrase);

        let entry = &mut self.doc.entries[index];
        entry.platform = new.platform;
        entry.username = new.username;
        entry.passphrase = Some(encoded);
        entry.notes = new.notes;
        entry.url = new.url;
        if let Some(accesses) = total_accesses {
            entry.total_accesses = accesses;
        }
        self.persist()
    }

    /// Remove an entry permanently. Deleting a missing id fails.
    pub fn delete(&mut self, id: &Uuid) -> Result<()> {
        let index = self.position(id)?;
        self.doc.entries.remove(index);
        self.persist()
    }

    fn position(&self, id: &Uuid) -> Result<usize> {
        self.doc
            .entries
            .iter()
            .position(|entry| entry.id == *id)
            .ok_or_else(|| StashError::NotFound(format!("Entry {}", id)))
    }

    /// Decoded snapshot of every entry, for in-memory aggregation only.
    pub fn entries_decoded(&self) -> Vec<SecretEntry> {
        self.doc
            .entries
            .iter()
            .map(|entry| SecretEntry {
                passphrase: entry.passphrase.as_deref().map(|p| self.transform.decode(p)),
                ..entry.clone()
            })
            .collect()
    }

    // --- Constant operations ---

    /// Declare a constant pair, overwriting any existing value for the key.
    pub fn declare_constant(&mut self, key: &str, value: &str) -> Result<()> {
        if key.trim().is_empty() {
            return Err(StashError::Validation(
                "Constant key cannot be empty".to_string(),
            ));
        }

        match self.doc.constants.iter_mut().find(|pair| pair.key == key) {
            Some(pair) => pair.value = value.to_string(),
            None => self.doc.constants.push(ConstantPair {
                key: key.to_string(),
                value: value.to_string(),
            }),
        }
        self.persist()
    }

    /// Forget a constant by key. Unlike entry deletion, a missing key is not
    /// an error.
    pub fn forget_constant(&mut self, key: &str) -> Result<()> {
        self.doc.constants.retain(|pair| pair.key != key);
        self.persist()
    }

    /// All constant pairs in declaration order.
    pub fn constants(&self) -> &[ConstantPair] {
        &self.doc.constants
    }

    /// Replace every occurrence of each constant key in `text` with its
    /// value.
    pub fn substitute(&self, text: &str) -> String {
        self.doc
            .constants
            .iter()
            .fold(text.to_string(), |acc, pair| {
                acc.replace(&pair.key, &pair.value)
            })
    }
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("path", &self.path)
            .field("entries", &self.doc.entries.len())
            .field("constants", &self.doc.constants.len())
            .field("registered", &self.is_registered())
            .finish()
    }
}

fn derive_verifier(passphrase: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(passphrase.as_bytes(), &salt)
        .map_err(|e| StashError::Crypto(format!("Failed to derive verifier: {}", e)))?
        .to_string())
}
