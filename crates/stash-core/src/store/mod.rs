//! Vault store: persistence and CRUD for entries, constants, and the owner
//! record.

pub mod json_file;
pub mod types;

pub use json_file::VaultStore;
pub use types::{ConstantPair, NewEntry, OwnerRecord, SecretEntry, VaultDocument};
