//! Stash CLI - a personal credential vault with token-gated access
//!
//! This is the command-line interface for Stash. Every verb other than
//! `register` and `login` presents an access token, which is validated
//! before the vault is touched.

use std::io::{self, IsTerminal, Read};
use std::path::Path;

use clap::Parser;
use dialoguer::Password;
use uuid::Uuid;
use zeroize::Zeroizing;

use stash_core::{
    generate, stats, KeyedTransform, NewEntry, StashError, TokenAuthority, VaultStore,
};

mod cli;
mod errors;
mod output;

use cli::{Cli, Commands, ConstCommands};
use output::print_json;

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("Error: {:#}", err);
        std::process::exit(errors::exit_code(&err));
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let vault = cli
        .vault
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("No vault path provided. Use --vault or set STASH_VAULT."))?;
    let secret = cli.secret.as_deref().ok_or_else(|| {
        anyhow::anyhow!("No deployment secret provided. Use --secret or set STASH_SECRET.")
    })?;

    let mut store = VaultStore::open(Path::new(vault), Box::new(KeyedTransform::new(secret)))?;
    let authority = TokenAuthority::new(secret);

    match cli.command {
        Commands::Register { identity } => {
            let passphrase = prompt_register_passphrase()?;
            store.register(&identity, &passphrase)?;
            if !cli.quiet {
                println!("Registered owner {}", identity);
            }
        }
        Commands::Login { identity } => {
            let passphrase = prompt_passphrase()?;
            let token = authority.generate(&identity, &passphrase, &store)?;
            println!("{}", token);
        }
        Commands::Add { json } => {
            require_token(&cli.token, &authority)?;
            let entry = NewEntry::from_json(read_payload(json)?)?;
            let id = store.create(entry)?;
            println!("{}", id);
        }
        Commands::List => {
            require_token(&cli.token, &authority)?;
            print_json(&store, &store.fetch_all())?;
        }
        Commands::Show { id } => {
            require_token(&cli.token, &authority)?;
            let id = parse_entry_id(&id)?;
            let entry = store.fetch(&id)?;
            print_json(&store, &entry)?;
        }
        Commands::Search { keyword } => {
            require_token(&cli.token, &authority)?;
            print_json(&store, &store.query(&keyword))?;
        }
        Commands::Edit { id, json } => {
            require_token(&cli.token, &authority)?;
            let id = parse_entry_id(&id)?;
            let entry = NewEntry::from_json(read_payload(json)?)?;
            store.update(&id, entry, None)?;
            if !cli.quiet {
                println!("Updated entry {}", id);
            }
        }
        Commands::Delete { id } => {
            require_token(&cli.token, &authority)?;
            let id = parse_entry_id(&id)?;
            store.delete(&id)?;
            if !cli.quiet {
                println!("Deleted entry {}", id);
            }
        }
        Commands::Const { command } => {
            require_token(&cli.token, &authority)?;
            match command {
                ConstCommands::Set { key, value } => {
                    store.declare_constant(&key, &value)?;
                    if !cli.quiet {
                        println!("Declared constant {}", key);
                    }
                }
                ConstCommands::Unset { key } => {
                    store.forget_constant(&key)?;
                    if !cli.quiet {
                        println!("Forgot constant {}", key);
                    }
                }
                ConstCommands::List => {
                    // Substitution would rewrite the keys themselves here.
                    println!("{}", serde_json::to_string_pretty(&store.constants())?);
                }
            }
        }
        Commands::Generate { length } => {
            require_token(&cli.token, &authority)?;
            println!("{}", generate::generate(length)?);
        }
        Commands::Manipulate { input } => {
            require_token(&cli.token, &authority)?;
            println!("{}", generate::manipulate(&input)?);
        }
        Commands::Stats => {
            require_token(&cli.token, &authority)?;
            let report = stats::compute(&store.entries_decoded());
            print_json(&store, &report)?;
        }
        Commands::ResetPass => {
            require_token(&cli.token, &authority)?;
            let passphrase = prompt_register_passphrase()?;
            store.reset_passphrase(&passphrase)?;
            if !cli.quiet {
                println!("Passphrase reset");
            }
        }
    }

    Ok(())
}

fn require_token(token: &Option<String>, authority: &TokenAuthority) -> anyhow::Result<()> {
    let token = token.as_deref().ok_or(StashError::InvalidToken)?;
    authority.require(token)?;
    Ok(())
}

fn parse_entry_id(id: &str) -> anyhow::Result<Uuid> {
    Uuid::parse_str(id)
        .map_err(|e| StashError::Validation(format!("Invalid entry ID: {}", e)).into())
}

fn read_payload(json: Option<String>) -> anyhow::Result<serde_json::Value> {
    let raw = match json {
        Some(value) => value,
        None if !io::stdin().is_terminal() => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| anyhow::anyhow!("Failed to read stdin: {}", e))?;
            buffer
        }
        None => {
            return Err(StashError::Validation(
                "No JSON payload provided. Pass it as an argument or via stdin.".to_string(),
            )
            .into())
        }
    };

    if raw.trim().is_empty() {
        return Err(StashError::Validation("Entry payload is empty".to_string()).into());
    }
    serde_json::from_str(&raw)
        .map_err(|e| StashError::Validation(format!("Invalid entry payload: {}", e)).into())
}

fn prompt_passphrase() -> anyhow::Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var("STASH_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }
    Password::new()
        .with_prompt("Passphrase")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}

fn prompt_register_passphrase() -> anyhow::Result<Zeroizing<String>> {
    if let Ok(value) = std::env::var("STASH_PASSPHRASE") {
        if !value.trim().is_empty() {
            return Ok(Zeroizing::new(value));
        }
    }
    Password::new()
        .with_prompt("Enter passphrase")
        .with_confirmation("Confirm passphrase", "Passphrases do not match")
        .interact()
        .map(Zeroizing::new)
        .map_err(|e| anyhow::anyhow!("Failed to read passphrase: {}", e))
}
