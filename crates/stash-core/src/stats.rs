//! Aggregate statistics over the vault's entries.
//!
//! Pure functions over a decoded snapshot of the store (see
//! `VaultStore::entries_decoded`); nothing here touches disk. All "most
//! common" and "most accessed" picks break ties toward the first entry in
//! store order, and every ratio is defined (as zero) on an empty vault.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::store::SecretEntry;

/// Strength classification for a single passphrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Medium,
    Strong,
}

impl Strength {
    const ALL: [Strength; 3] = [Strength::Weak, Strength::Medium, Strength::Strong];
}

/// Score a passphrase: length points plus character-class diversity.
///
/// +1 for length >= 8, a further +2 for length >= 12, and +1 per character
/// class beyond the first among lowercase/uppercase/digit/symbol.
pub fn score(passphrase: &str) -> u32 {
    let length = passphrase.chars().count();
    let mut points = 0;
    if length >= 8 {
        points += 1;
    }
    if length >= 12 {
        points += 2;
    }

    let classes = [
        passphrase.chars().any(|c| c.is_ascii_lowercase()),
        passphrase.chars().any(|c| c.is_ascii_uppercase()),
        passphrase.chars().any(|c| c.is_ascii_digit()),
        passphrase
            .chars()
            .any(|c| !c.is_ascii_alphanumeric() && !c.is_whitespace()),
    ]
    .iter()
    .filter(|present| **present)
    .count() as u32;
    points + classes.saturating_sub(1)
}

/// Classify a passphrase by its [`score`]: weak < 3, medium 3-4, strong >= 5.
pub fn classify(passphrase: &str) -> Strength {
    match score(passphrase) {
        0..=2 => Strength::Weak,
        3..=4 => Strength::Medium,
        _ => Strength::Strong,
    }
}

/// The entry fetched most often.
#[derive(Debug, Clone, Serialize)]
pub struct MostAccessed {
    pub id: Uuid,
    pub platform: String,
    pub total_accesses: u64,
}

/// Most common passphrase on one platform.
#[derive(Debug, Clone, Serialize)]
pub struct PlatformCommon {
    pub platform: String,
    pub passphrase: String,
    pub count: usize,
}

/// Strength classification of one entry.
#[derive(Debug, Clone, Serialize)]
pub struct EntryStrength {
    pub id: Uuid,
    pub platform: String,
    pub strength: Strength,
}

/// Aggregate figures for one strength bucket.
#[derive(Debug, Clone, Serialize)]
pub struct StrengthBucket {
    pub strength: Strength,
    pub count: usize,
    pub average_length: f64,
}

/// Distributional metrics over the whole vault.
#[derive(Debug, Clone, Serialize)]
pub struct VaultStats {
    pub total_entries: usize,
    pub platforms: Vec<String>,
    pub distinct_platforms: usize,
    pub distinct_passphrases: usize,
    pub most_accessed: Option<MostAccessed>,
    pub common_passphrase_by_platform: Vec<PlatformCommon>,
    pub average_passphrase_length: f64,
    pub most_common_passphrase: Option<String>,
    /// Percentage of entries sharing the most common passphrase.
    pub most_common_passphrase_share: f64,
    pub entries: Vec<EntryStrength>,
    pub strength_buckets: Vec<StrengthBucket>,
}

/// Pick the most frequent string, breaking ties toward earliest first
/// occurrence in `values`.
fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<(String, usize)> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(std::cmp::Ordering::Greater))
        .map(|(value, count)| (value.to_string(), count))
}

/// Compute statistics over a decoded entry snapshot.
pub fn compute(entries: &[SecretEntry]) -> VaultStats {
    let total_entries = entries.len();
    let passphrase_of = |entry: &SecretEntry| -> String {
        entry.passphrase.clone().unwrap_or_default()
    };

    let mut platforms: Vec<String> = Vec::new();
    for entry in entries {
        if !platforms.contains(&entry.platform) {
            platforms.push(entry.platform.clone());
        }
    }

    let passphrases: Vec<String> = entries.iter().map(passphrase_of).collect();
    let mut distinct_passphrases: Vec<&str> = Vec::new();
    for passphrase in &passphrases {
        if !distinct_passphrases.contains(&passphrase.as_str()) {
            distinct_passphrases.push(passphrase);
        }
    }

    let most_accessed = entries
        .iter()
        .max_by(|a, b| {
            a.total_accesses
                .cmp(&b.total_accesses)
                // On a tie, keep the earlier entry.
                .then(std::cmp::Ordering::Greater)
        })
        .map(|entry| MostAccessed {
            id: entry.id,
            platform: entry.platform.clone(),
            total_accesses: entry.total_accesses,
        });

    let common_passphrase_by_platform = platforms
        .iter()
        .filter_map(|platform| {
            most_common(
                entries
                    .iter()
                    .zip(&passphrases)
                    .filter(|(entry, _)| entry.platform == *platform)
                    .map(|(_, passphrase)| passphrase.as_str()),
            )
            .map(|(passphrase, count)| PlatformCommon {
                platform: platform.clone(),
                passphrase,
                count,
            })
        })
        .collect();

    let average_passphrase_length = if total_entries == 0 {
        0.0
    } else {
        passphrases
            .iter()
            .map(|p| p.chars().count())
            .sum::<usize>() as f64
            / total_entries as f64
    };

    let global_common = most_common(passphrases.iter().map(String::as_str));
    let most_common_passphrase_share = match &global_common {
        Some((_, count)) if total_entries > 0 => {
            *count as f64 / total_entries as f64 * 100.0
        }
        _ => 0.0,
    };

    let entry_strengths: Vec<EntryStrength> = entries
        .iter()
        .zip(&passphrases)
        .map(|(entry, passphrase)| EntryStrength {
            id: entry.id,
            platform: entry.platform.clone(),
            strength: classify(passphrase),
        })
        .collect();

    let mut lengths_by_strength: HashMap<Strength, Vec<usize>> = HashMap::new();
    for (entry_strength, passphrase) in entry_strengths.iter().zip(&passphrases) {
        lengths_by_strength
            .entry(entry_strength.strength)
            .or_default()
            .push(passphrase.chars().count());
    }
    let strength_buckets = Strength::ALL
        .iter()
        .map(|strength| {
            let lengths = lengths_by_strength.get(strength).cloned().unwrap_or_default();
            let average_length = if lengths.is_empty() {
                0.0
            } else {
                lengths.iter().sum::<usize>() as f64 / lengths.len() as f64
            };
            StrengthBucket {
                strength: *strength,
                count: lengths.len(),
                average_length,
            }
        })
        .collect();

    VaultStats {
        total_entries,
        distinct_platforms: platforms.len(),
        platforms,
        distinct_passphrases: distinct_passphrases.len(),
        most_accessed,
        common_passphrase_by_platform,
        average_passphrase_length,
        most_common_passphrase: global_common.map(|(passphrase, _)| passphrase),
        most_common_passphrase_share,
        entries: entry_strengths,
        strength_buckets,
    }
}
