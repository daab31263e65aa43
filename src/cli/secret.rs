//! Secret CLI commands
//!
//! `create` prints a token to hand to the recipient; `consume` prints the
//! message once. Both unavailable and wrong-passphrase outcomes print the
//! same message so the command cannot be used as an oracle.

use std::io::Read;

use clap::Args;

use crate::crypto::SecureString;
use crate::error::{SecretDropError, SecretDropResult};
use crate::services::{Clock, SecretService};
use crate::storage::SecretStorage;

/// Environment variable read for the passphrase when no flag is given
pub const PASSPHRASE_ENV: &str = "SECRETDROP_PASSPHRASE";

/// Message shown for every failed consume
pub const UNAVAILABLE_MESSAGE: &str =
    "This secret does not exist, has expired, or the passphrase was wrong.";

/// Arguments for `create`
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Secret text (read from stdin when omitted)
    #[arg(short, long)]
    pub message: Option<String>,

    /// Passphrase (prompted for when omitted)
    #[arg(short, long, env = PASSPHRASE_ENV, hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// Arguments for `consume`
#[derive(Args, Debug)]
pub struct ConsumeArgs {
    /// Token printed by `create`
    pub token: String,

    /// Passphrase (prompted for when omitted)
    #[arg(short, long, env = PASSPHRASE_ENV, hide_env_values = true)]
    pub passphrase: Option<String>,
}

/// Handle `create`
pub fn handle_create<S, C>(service: &SecretService<S, C>, args: CreateArgs) -> SecretDropResult<()>
where
    S: SecretStorage,
    C: Clock,
{
    let message = match args.message {
        Some(message) => SecureString::new(message),
        None => read_stdin_message()?,
    };
    let passphrase = match args.passphrase {
        Some(passphrase) => SecureString::new(passphrase),
        None => prompt_new_passphrase()?,
    };

    let created = service.create_detailed(&message, &passphrase)?;

    println!("Secret stored.");
    println!("  Token:   {}", created.token);
    println!("  Expires: {}", created.expires_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();
    println!("Share the token and the passphrase through different channels.");
    println!("The secret can be read once.");
    Ok(())
}

/// Handle `consume`
///
/// Returns `Ok(false)` when the secret could not be read.
pub fn handle_consume<S, C>(
    service: &SecretService<S, C>,
    args: ConsumeArgs,
) -> SecretDropResult<bool>
where
    S: SecretStorage,
    C: Clock,
{
    let passphrase = match args.passphrase {
        Some(passphrase) => SecureString::new(passphrase),
        None => prompt_passphrase("Passphrase: ")?,
    };

    match service.consume_token(&args.token, &passphrase) {
        Ok(plaintext) => {
            println!("{}", plaintext.as_str());
            Ok(true)
        }
        Err(SecretDropError::NotFound | SecretDropError::WrongPassphrase) => {
            eprintln!("{}", UNAVAILABLE_MESSAGE);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Handle `sweep`
pub fn handle_sweep<S, C>(service: &SecretService<S, C>) -> SecretDropResult<()>
where
    S: SecretStorage,
    C: Clock,
{
    let removed = service.sweep()?;
    println!("Removed {} expired secret(s).", removed);
    Ok(())
}

fn read_stdin_message() -> SecretDropResult<SecureString> {
    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| SecretDropError::Io(format!("Failed to read secret from stdin: {}", e)))?;

    let trimmed_len = buffer.trim_end_matches(&['\r', '\n'][..]).len();
    buffer.truncate(trimmed_len);
    Ok(SecureString::new(buffer))
}

fn prompt_new_passphrase() -> SecretDropResult<SecureString> {
    loop {
        let pass1 = prompt_passphrase("Passphrase: ")?;
        if pass1.is_empty() {
            eprintln!("Passphrase cannot be empty. Please try again.");
            continue;
        }

        let pass2 = prompt_passphrase("Confirm passphrase: ")?;
        if pass1.as_str() != pass2.as_str() {
            eprintln!("Passphrases do not match. Please try again.");
            continue;
        }

        return Ok(pass1);
    }
}

/// Prompt for a passphrase (hidden input)
fn prompt_passphrase(prompt: &str) -> SecretDropResult<SecureString> {
    rpassword::prompt_password(prompt)
        .map(SecureString::new)
        .map_err(|e| SecretDropError::Io(format!("Failed to read passphrase: {}", e)))
}
