//! JSON output rendering.
//!
//! Structured results are printed as pretty JSON with the vault's constant
//! substitutions applied to the rendered text.

use serde::Serialize;
use stash_core::VaultStore;

/// Serialize a value and print it with constant substitution applied.
pub fn print_json<T: Serialize>(store: &VaultStore, value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{}", store.substitute(&rendered));
    Ok(())
}
