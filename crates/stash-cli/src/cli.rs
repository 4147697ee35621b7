//! Command-line argument definitions.

use clap::{Parser, Subcommand};

use stash_core::VERSION;

/// Stash - a personal credential vault with token-gated access
#[derive(Parser)]
#[command(name = "stash")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the vault file
    #[arg(long, global = true, env = "STASH_VAULT")]
    pub vault: Option<String>,

    /// Deployment secret keying the transform and token signatures
    #[arg(long, global = true, env = "STASH_SECRET", hide_env_values = true)]
    pub secret: Option<String>,

    /// Access token obtained from `stash login`
    #[arg(long, global = true, env = "STASH_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register the vault owner (one-time)
    Register {
        /// Owner identity
        #[arg(value_name = "IDENTITY")]
        identity: String,
    },

    /// Log in and print an access token
    Login {
        /// Owner identity
        #[arg(value_name = "IDENTITY")]
        identity: String,
    },

    /// Add a new entry from a JSON payload (argument or stdin)
    Add {
        /// Entry payload, e.g. '{"platform":"mail","username":"a","passphrase":"p1"}'
        #[arg(value_name = "JSON")]
        json: Option<String>,
    },

    /// List all entries (passphrases omitted)
    List,

    /// Show one entry by ID with its passphrase decoded
    Show {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Search entries by keyword across platform/username/notes
    Search {
        /// Search keyword (case-insensitive substring)
        #[arg(value_name = "KEYWORD")]
        keyword: String,
    },

    /// Replace an entry's fields from a JSON payload (argument or stdin)
    Edit {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: String,

        /// Entry payload
        #[arg(value_name = "JSON")]
        json: Option<String>,
    },

    /// Delete an entry by ID
    Delete {
        /// Entry ID
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Manage constant substitution pairs
    Const {
        #[command(subcommand)]
        command: ConstCommands,
    },

    /// Generate a random passphrase
    Generate {
        /// Passphrase length
        #[arg(long, default_value_t = stash_core::generate::DEFAULT_LENGTH)]
        length: usize,
    },

    /// Perturb an existing passphrase while keeping it recognizable
    Manipulate {
        /// Passphrase to manipulate
        #[arg(value_name = "PASSPHRASE")]
        input: String,
    },

    /// Show aggregate statistics over the vault
    Stats,

    /// Reset the owner passphrase
    ResetPass,
}

#[derive(Subcommand)]
pub enum ConstCommands {
    /// Declare a constant (overwrites an existing key)
    Set {
        #[arg(value_name = "KEY")]
        key: String,

        #[arg(value_name = "VALUE")]
        value: String,
    },

    /// Forget a constant (no error if absent)
    Unset {
        #[arg(value_name = "KEY")]
        key: String,
    },

    /// List all constants
    List,
}
