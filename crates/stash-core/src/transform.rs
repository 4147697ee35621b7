//! Reversible, deployment-keyed encoding of secret material.
//!
//! Passphrases are not stored in the clear: every persisted passphrase field
//! passes through a [`Transform`] on its way into the vault file and back out.
//! The concrete scheme is a deployment parameter — the store only relies on
//! the round-trip law `decode(encode(x)) == x` — so the transform is injected
//! as a strategy object rather than hard-wired.
//!
//! This is an obfuscation layer keyed by the deployment secret, not
//! authenticated encryption. Changing the secret invalidates every ciphertext
//! already on disk (and all outstanding tokens, which derive from the same
//! secret).

use zeroize::ZeroizeOnDrop;

/// Context string for deriving the keystream key from the deployment secret.
const KEYSTREAM_CONTEXT: &str = "stash v1 transform keystream";

/// A reversible, deterministic string transform.
///
/// Implementations must be total: `decode` accepts arbitrary input and
/// returns *some* deterministic output rather than failing, since the store
/// does not separately validate ciphertext integrity.
pub trait Transform: Send + Sync {
    /// Encode a plaintext string for persistence.
    fn encode(&self, plaintext: &str) -> String;

    /// Decode a previously encoded string.
    ///
    /// Must satisfy `decode(encode(x)) == x` for every string `x`. Malformed
    /// or foreign ciphertext yields deterministic garbage, never an error.
    fn decode(&self, ciphertext: &str) -> String;
}

/// Default transform: keyed keystream XOR with base64 armor.
///
/// The key is derived once from the deployment secret with
/// `blake3::derive_key`; encoding XORs the plaintext bytes against a
/// BLAKE3-XOF keystream and armors the result with base64. Key material is
/// zeroized on drop.
#[derive(Clone, ZeroizeOnDrop)]
pub struct KeyedTransform {
    key: [u8; 32],
}

impl KeyedTransform {
    /// Create a transform keyed by the deployment secret.
    pub fn new(secret: &str) -> Self {
        Self {
            key: blake3::derive_key(KEYSTREAM_CONTEXT, secret.as_bytes()),
        }
    }

    fn keystream(&self, len: usize) -> Vec<u8> {
        let mut stream = vec![0u8; len];
        blake3::Hasher::new_keyed(&self.key)
            .finalize_xof()
            .fill(&mut stream);
        stream
    }

    fn xor_in_place(&self, bytes: &mut [u8]) {
        let stream = self.keystream(bytes.len());
        for (byte, mask) in bytes.iter_mut().zip(stream) {
            *byte ^= mask;
        }
    }
}

impl std::fmt::Debug for KeyedTransform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyedTransform")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

impl Transform for KeyedTransform {
    fn encode(&self, plaintext: &str) -> String {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;

        let mut bytes = plaintext.as_bytes().to_vec();
        self.xor_in_place(&mut bytes);
        STANDARD.encode(bytes)
    }

    fn decode(&self, ciphertext: &str) -> String {
        use base64::engine::general_purpose::STANDARD;
        use base64::Engine;

        // Foreign input that is not valid base64 is de-armored as its raw
        // bytes so decoding stays total and deterministic.
        let mut bytes = STANDARD
            .decode(ciphertext)
            .unwrap_or_else(|_| ciphertext.as_bytes().to_vec());
        self.xor_in_place(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_round_trip() {
        let transform = KeyedTransform::new("deployment-secret-123");
        for plaintext in [
            "",
            "p1",
            "correct horse battery staple",
            "symbols !@#$%^&*()[]{}",
            "unicode: héllo wörld ❤",
        ] {
            let encoded = transform.encode(plaintext);
            assert_eq!(transform.decode(&encoded), plaintext);
        }
    }

    #[test]
    fn test_encoded_differs_from_plaintext() {
        let transform = KeyedTransform::new("deployment-secret-123");
        let encoded = transform.encode("hunter2");
        assert_ne!(encoded, "hunter2");
        assert!(!encoded.contains("hunter2"));
    }

    #[test]
    fn test_deterministic_per_key() {
        let transform = KeyedTransform::new("deployment-secret-123");
        assert_eq!(transform.encode("same input"), transform.encode("same input"));
    }

    #[test]
    fn test_different_keys_different_ciphertext() {
        let a = KeyedTransform::new("secret-one");
        let b = KeyedTransform::new("secret-two");
        assert_ne!(a.encode("same input"), b.encode("same input"));
    }

    #[test]
    fn test_malformed_ciphertext_decodes_without_error() {
        let transform = KeyedTransform::new("deployment-secret-123");
        // Not valid base64, and not produced by this key. Output is garbage
        // but stable.
        let first = transform.decode("!!not-base64!!");
        let second = transform.decode("!!not-base64!!");
        assert_eq!(first, second);
    }

    #[test]
    fn test_foreign_key_ciphertext_is_garbage_not_error() {
        let writer = KeyedTransform::new("secret-one");
        let reader = KeyedTransform::new("secret-two");
        let encoded = writer.encode("original text");
        assert_ne!(reader.decode(&encoded), "original text");
    }

    #[test]
    fn test_debug_redacts_key() {
        let transform = KeyedTransform::new("deployment-secret-123");
        assert!(format!("{:?}", transform).contains("REDACTED"));
    }
}
