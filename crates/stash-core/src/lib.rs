//! # Stash Core
//!
//! Core library for Stash - a personal credential vault with token-gated
//! access and keyed obfuscation of secrets at rest.
//!
//! This crate provides the domain logic, storage, and data models
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **transform**: Reversible, deployment-keyed encoding of secret material
//! - **token**: Bearer token issuance and validation
//! - **store**: Vault persistence, entry CRUD, search, and constants
//! - **generate**: Passphrase generation and manipulation
//! - **stats**: Aggregate statistics over stored entries

pub mod error;
pub mod generate;
pub mod stats;
pub mod store;
pub mod token;
pub mod transform;

pub use error::{Result, StashError};
pub use store::{ConstantPair, NewEntry, SecretEntry, VaultStore};
pub use token::TokenAuthority;
pub use transform::{KeyedTransform, Transform};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
