use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};

const DEFAULT_SECRET: &str = "changeme";
const UPLOADER_SUBJECT: &str = "uploader";

#[derive(Parser, Debug)]
struct Cli {
    /// Signing secret. Falls back to `JWT_SECRET`, then a development default.
    #[arg(long)]
    secret: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a long-lived token accepted by the pack server's upload routes.
    MintToken {
        #[arg(long, default_value = UPLOADER_SUBJECT)]
        subject: String,
        #[arg(long, default_value_t = 10)]
        years: i64,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

fn mint_token(
    secret: &str,
    subject: &str,
    years: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let exp = now + Duration::days(365 * years);
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: exp.timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

fn resolve_secret(flag: Option<String>, env: Option<String>) -> String {
    flag.or(env)
        .filter(|secret| !secret.is_empty())
        .unwrap_or_else(|| DEFAULT_SECRET.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let secret = resolve_secret(cli.secret, std::env::var("JWT_SECRET").ok());

    match cli.command {
        Command::MintToken { subject, years } => {
            let token = mint_token(&secret, &subject, years).context("failed to sign token")?;
            println!("{token}");
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/token_tests.rs"]
mod tests;
