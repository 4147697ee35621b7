//! Passphrase generation and manipulation.
//!
//! `generate` draws from a fixed printable alphabet using the operating
//! system's random source, with rejection sampling so every alphabet
//! character is equally likely. `manipulate` perturbs an existing passphrase
//! with lookalike substitutions and case flips — randomized per call,
//! length-preserving, and still visually traceable to the original.

use crate::error::{Result, StashError};

/// Default generated passphrase length.
pub const DEFAULT_LENGTH: usize = 32;

/// Alphabet for generated passphrases: upper, lower, digits, symbols.
const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}<>?";

/// Visually similar stand-ins for common characters.
const LOOKALIKES: &[(char, char)] = &[
    ('a', '@'),
    ('A', '4'),
    ('b', '8'),
    ('B', '8'),
    ('e', '3'),
    ('E', '3'),
    ('g', '9'),
    ('i', '!'),
    ('I', '1'),
    ('l', '1'),
    ('o', '0'),
    ('O', '0'),
    ('s', '$'),
    ('S', '5'),
    ('t', '7'),
    ('T', '7'),
    ('z', '2'),
    ('Z', '2'),
    ('0', 'O'),
    ('1', 'l'),
    ('2', 'Z'),
    ('3', 'E'),
    ('4', 'A'),
    ('5', 'S'),
    ('7', 'T'),
    ('8', 'B'),
    ('9', 'g'),
];

fn random_bytes(buf: &mut [u8]) -> Result<()> {
    getrandom::getrandom(buf)
        .map_err(|e| StashError::Crypto(format!("Random source failed: {}", e)))
}

/// Generate a random passphrase of `length` characters from [`ALPHABET`].
///
/// # Errors
///
/// Returns `StashError::Validation` when `length` is zero.
pub fn generate(length: usize) -> Result<String> {
    if length == 0 {
        return Err(StashError::Validation(
            "Length must be a positive integer".to_string(),
        ));
    }

    // Rejection sampling: discard bytes above the largest multiple of the
    // alphabet size so no character is favored.
    let bound = 256 - (256 % ALPHABET.len());
    let mut out = String::with_capacity(length);
    let mut buf = [0u8; 64];
    while out.len() < length {
        random_bytes(&mut buf)?;
        for byte in buf {
            if (byte as usize) < bound {
                out.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
                if out.len() == length {
                    break;
                }
            }
        }
    }

    Ok(out)
}

fn lookalike(ch: char) -> Option<char> {
    LOOKALIKES
        .iter()
        .find(|(from, _)| *from == ch)
        .map(|(_, to)| *to)
}

fn perturb(ch: char) -> Option<char> {
    if let Some(swap) = lookalike(ch) {
        Some(swap)
    } else if ch.is_ascii_lowercase() {
        Some(ch.to_ascii_uppercase())
    } else if ch.is_ascii_uppercase() {
        Some(ch.to_ascii_lowercase())
    } else {
        None
    }
}

/// Perturb `input` while keeping it recognizable to a human reader.
///
/// Applies randomized lookalike substitutions and case flips, one character
/// at a time. The output has the same character count as the input and
/// differs from it whenever the input contains at least one letter or
/// substitutable character.
pub fn manipulate(input: &str) -> Result<String> {
    let chars: Vec<char> = input.chars().collect();
    if chars.is_empty() {
        return Ok(String::new());
    }

    let mut coins = vec![0u8; chars.len()];
    random_bytes(&mut coins)?;

    let mut out: Vec<char> = Vec::with_capacity(chars.len());
    let mut changed = false;
    for (ch, coin) in chars.iter().zip(&coins) {
        let swapped = match (lookalike(*ch), coin) {
            (Some(swap), c) if c % 2 == 0 => Some(swap),
            _ if ch.is_ascii_lowercase() && coin % 4 == 1 => Some(ch.to_ascii_uppercase()),
            _ if ch.is_ascii_uppercase() && coin % 4 == 1 => Some(ch.to_ascii_lowercase()),
            _ => None,
        };
        match swapped {
            Some(swap) => {
                changed = true;
                out.push(swap);
            }
            None => out.push(*ch),
        }
    }

    // The coins may decline every swap; force one so the result still
    // differs from the input when anything is substitutable.
    if !changed {
        for (index, ch) in chars.iter().enumerate() {
            if let Some(swap) = perturb(*ch) {
                out[index] = swap;
                break;
            }
        }
    }

    Ok(out.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_requested_length() {
        for length in [1, 8, 32, 64] {
            let passphrase = generate(length).expect("generate");
            assert_eq!(passphrase.chars().count(), length);
        }
    }

    #[test]
    fn test_generate_draws_from_alphabet() {
        let passphrase = generate(256).expect("generate");
        for ch in passphrase.bytes() {
            assert!(ALPHABET.contains(&ch), "unexpected character: {}", ch as char);
        }
    }

    #[test]
    fn test_generate_zero_length_rejected() {
        let result = generate(0);
        assert!(matches!(result, Err(StashError::Validation(_))));
    }

    #[test]
    fn test_generate_is_not_constant() {
        let a = generate(32).expect("generate");
        let b = generate(32).expect("generate");
        // 83^32 outcomes; a collision here means the random source is broken.
        assert_ne!(a, b);
    }

    #[test]
    fn test_manipulate_preserves_length() {
        for input in ["p", "password", "correct horse battery staple", "Tr0ub4dor&3"] {
            let output = manipulate(input).expect("manipulate");
            assert_eq!(output.chars().count(), input.chars().count());
        }
    }

    #[test]
    fn test_manipulate_changes_mappable_input() {
        for _ in 0..16 {
            let output = manipulate("password").expect("manipulate");
            assert_ne!(output, "password");
        }
    }

    #[test]
    fn test_manipulate_digits_have_lookalikes() {
        for _ in 0..16 {
            let output = manipulate("12345").expect("manipulate");
            assert_ne!(output, "12345");
            assert_eq!(output.chars().count(), 5);
        }
    }

    #[test]
    fn test_manipulate_without_mappable_chars_is_identity() {
        assert_eq!(manipulate("!?**").expect("manipulate"), "!?**");
        assert_eq!(manipulate("").expect("manipulate"), "");
    }
}
