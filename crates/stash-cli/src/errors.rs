//! Exit-code mapping for CLI failures.
//!
//! Core errors carry their kind; the CLI maps each kind to a stable exit
//! code so scripts can distinguish auth failures from missing entries.

use stash_core::StashError;

pub mod exit_codes {
    /// Fallback for storage and other unexpected failures.
    pub const GENERAL: i32 = 1;
    /// Entry or update/delete target absent.
    pub const NOT_FOUND: i32 = 3;
    /// Malformed payload, invalid length, or repeat registration.
    pub const INVALID_INPUT: i32 = 4;
    /// Missing/expired/forged token or wrong login passphrase.
    pub const AUTH_FAILED: i32 = 5;
}

/// Map a failure to its process exit code.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<StashError>() {
        Some(StashError::InvalidToken) | Some(StashError::InvalidCredential) => {
            exit_codes::AUTH_FAILED
        }
        Some(StashError::NotFound(_)) => exit_codes::NOT_FOUND,
        Some(StashError::Validation(_)) | Some(StashError::AlreadyRegistered) => {
            exit_codes::INVALID_INPUT
        }
        _ => exit_codes::GENERAL,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_code(&StashError::InvalidToken.into()), 5);
        assert_eq!(exit_code(&StashError::InvalidCredential.into()), 5);
        assert_eq!(
            exit_code(&StashError::NotFound("entry".to_string()).into()),
            3
        );
        assert_eq!(
            exit_code(&StashError::Validation("bad".to_string()).into()),
            4
        );
        assert_eq!(exit_code(&StashError::AlreadyRegistered.into()), 4);
        assert_eq!(
            exit_code(&StashError::Storage("io".to_string()).into()),
            1
        );
        assert_eq!(exit_code(&anyhow::anyhow!("plain error")), 1);
    }
}
