//! Bearer token issuance and validation.
//!
//! Login mints a self-contained token binding the owner identity to an
//! issued/expiry window, signed with key material derived from the same
//! deployment secret as the transform. Validation is a pure function of the
//! signature and the clock — no token state is persisted, and a malformed
//! token is simply invalid, never a panic.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use zeroize::ZeroizeOnDrop;

use crate::error::{Result, StashError};
use crate::store::VaultStore;

/// Context string for deriving the signing key from the deployment secret.
const SIGNING_CONTEXT: &str = "stash v1 token signing";

/// Lifetime of an issued token.
pub const TOKEN_TTL_MINUTES: i64 = 15;

/// Issues and validates bearer tokens for the registered owner.
///
/// The signing key is derived from the deployment secret, so rotating the
/// secret invalidates every outstanding token.
#[derive(Clone, ZeroizeOnDrop)]
pub struct TokenAuthority {
    key: [u8; 32],
    #[zeroize(skip)]
    ttl: Duration,
}

impl TokenAuthority {
    /// Create an authority keyed by the deployment secret, with the default
    /// token lifetime.
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::minutes(TOKEN_TTL_MINUTES))
    }

    /// Create an authority with an explicit token lifetime.
    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            key: blake3::derive_key(SIGNING_CONTEXT, secret.as_bytes()),
            ttl,
        }
    }

    /// Verify the login passphrase against the vault's owner verifier and
    /// mint a token on success.
    ///
    /// # Errors
    ///
    /// Returns `StashError::InvalidCredential` if the vault is unregistered,
    /// the identity is unknown, or the passphrase does not match.
    pub fn generate(
        &self,
        identity: &str,
        passphrase: &str,
        store: &VaultStore,
    ) -> Result<String> {
        store.verify_owner(identity, passphrase)?;

        let issued = Utc::now();
        let expires = issued + self.ttl;
        let payload = format!(
            "{}|{}|{}",
            identity,
            issued.timestamp(),
            expires.timestamp()
        );
        let signature = blake3::keyed_hash(&self.key, payload.as_bytes());

        Ok(format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(payload.as_bytes()),
            URL_SAFE_NO_PAD.encode(signature.as_bytes())
        ))
    }

    /// Check a presented token.
    ///
    /// Returns `true` iff the signature verifies under the current key and
    /// the expiry has not elapsed. Malformed input returns `false`.
    pub fn validate(&self, token: &str) -> bool {
        let Some((payload_b64, signature_b64)) = token.split_once('.') else {
            return false;
        };
        let Ok(payload) = URL_SAFE_NO_PAD.decode(payload_b64) else {
            return false;
        };
        let Ok(signature) = URL_SAFE_NO_PAD.decode(signature_b64) else {
            return false;
        };
        let signature: [u8; 32] = match signature.try_into() {
            Ok(bytes) => bytes,
            Err(_) => return false,
        };

        // blake3::Hash comparison is constant-time.
        let expected = blake3::keyed_hash(&self.key, &payload);
        if blake3::Hash::from_bytes(signature) != expected {
            return false;
        }

        let Ok(text) = String::from_utf8(payload) else {
            return false;
        };
        // identity|issued|expires; the identity may itself contain '|'.
        let mut fields = text.rsplitn(3, '|');
        let Some(Ok(expires)) = fields.next().map(str::parse::<i64>) else {
            return false;
        };
        let Some(Ok(_issued)) = fields.next().map(str::parse::<i64>) else {
            return false;
        };

        Utc::now().timestamp() < expires
    }

    /// Gate a privileged operation on a presented token.
    ///
    /// # Errors
    ///
    /// Returns `StashError::InvalidToken` when [`validate`](Self::validate)
    /// is false.
    pub fn require(&self, token: &str) -> Result<()> {
        if self.validate(token) {
            Ok(())
        } else {
            Err(StashError::InvalidToken)
        }
    }
}

impl std::fmt::Debug for TokenAuthority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenAuthority")
            .field("key", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .finish()
    }
}
