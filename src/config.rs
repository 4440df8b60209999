use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use dialoguer::{Confirm, Input, Password, Select};
use std::io::Write;
use std::time::Duration;

use crate::client::{Environment, TropipayClient};
use crate::models::MovementState;

/// Tropipay command line client
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// OAuth client id
    #[arg(long, env = "TROPIPAY_CLIENT_ID")]
    pub client_id: Option<String>,

    /// OAuth client secret
    #[arg(long, env = "TROPIPAY_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Target environment
    #[arg(short, long, env = "TROPIPAY_ENVIRONMENT", value_enum, default_value = "sandbox")]
    pub environment: Environment,

    /// Custom base URL, overrides --environment
    #[arg(long, env = "TROPIPAY_BASE_URL")]
    pub base_url: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, env = "TROPIPAY_TIMEOUT", default_value = "30")]
    pub timeout: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value = "compact")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human readable single-line output
    Compact,
    /// One JSON object per event
    Json,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Payment cards (payment links)
    #[command(subcommand)]
    Cards(CardsCommand),

    /// Account movements
    #[command(subcommand)]
    Movements(MovementsCommand),

    /// Show the profile of the authenticated user
    Profile,

    /// Obtain an access token and show its expiry
    Token,
}

#[derive(Subcommand, Debug, Clone)]
pub enum CardsCommand {
    List,
    Get { id: String },
    Delete { id: String },
    Create {
        #[arg(long)]
        number: String,
        #[arg(long)]
        cvc: String,
        #[arg(long)]
        holder_name: String,
        #[arg(long)]
        expiry_month: u32,
        #[arg(long)]
        expiry_year: u32,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum MovementsCommand {
    /// List movements through the REST endpoints
    List {
        /// Restrict to one account
        #[arg(long)]
        account: Option<String>,
        #[command(flatten)]
        page: PageArgs,
    },
    /// Search movements through the GraphQL endpoint
    Search {
        #[command(flatten)]
        page: PageArgs,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct PageArgs {
    #[arg(long, default_value = "20")]
    pub limit: u32,
    #[arg(long, default_value = "0")]
    pub offset: u32,
    /// Filter by state (repeatable)
    #[arg(long = "state", value_parser = parse_state)]
    pub states: Vec<MovementState>,
    #[arg(long)]
    pub currency: Option<String>,
    #[arg(long)]
    pub reference: Option<String>,
}

fn parse_state(s: &str) -> std::result::Result<MovementState, String> {
    MovementState::parse(s).ok_or_else(|| format!("unknown movement state: {}", s))
}

#[derive(Clone, Debug)]
pub struct Config {
    // Credentials
    pub client_id: String,
    pub client_secret: String,

    // Endpoint
    pub environment: Environment,
    pub base_url: String,

    // HTTP client
    pub request_timeout: u64,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,

    pub command: Command,
}

impl Config {
    /// Load configuration from all sources with priority: CLI > ENV > defaults
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(args: CliArgs) -> Result<Self> {
        let base_url = args
            .base_url
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| args.environment.base_url().to_string());

        Ok(Config {
            client_id: args.client_id.context(
                "TROPIPAY_CLIENT_ID is required (use --client-id or set TROPIPAY_CLIENT_ID env var)",
            )?,
            client_secret: args.client_secret.context(
                "TROPIPAY_CLIENT_SECRET is required (use --client-secret or set TROPIPAY_CLIENT_SECRET env var)",
            )?,
            environment: args.environment,
            base_url,
            request_timeout: args.timeout,
            log_level: args.log_level,
            log_format: args.log_format,
            command: args.command,
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.client_id.trim().is_empty() || self.client_secret.trim().is_empty() {
            anyhow::bail!("Client id and client secret must not be empty");
        }

        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            anyhow::bail!(
                "Base URL must start with http:// or https://: {}",
                self.base_url
            );
        }

        if self.request_timeout == 0 {
            anyhow::bail!("Request timeout must be at least one second");
        }

        Ok(())
    }

    /// Build an API client from this configuration
    pub fn build_client(&self) -> Result<TropipayClient> {
        TropipayClient::builder(&self.client_id, &self.client_secret)
            .base_url(&self.base_url)
            .timeout(Some(Duration::from_secs(self.request_timeout)))
            .build()
            .context("Failed to create Tropipay client")
    }
}

// === Interactive Setup ===

/// Check if interactive setup is needed (no .env file and missing credentials)
pub fn needs_interactive_setup() -> bool {
    let env_file_exists = std::path::Path::new(".env").exists();

    let has_client_id = std::env::var("TROPIPAY_CLIENT_ID").is_ok();
    let has_client_secret = std::env::var("TROPIPAY_CLIENT_SECRET").is_ok();

    !env_file_exists && (!has_client_id || !has_client_secret)
}

/// Configuration collected from interactive setup
#[derive(Debug, Clone)]
pub struct InteractiveConfig {
    pub client_id: String,
    pub client_secret: String,
    pub environment: Environment,
}

/// Prompt for credentials and environment, optionally saving them to `.env`
pub fn run_interactive_setup() -> Result<InteractiveConfig> {
    println!();
    println!("No Tropipay credentials found. Let's set them up.");
    println!("Create API credentials in your Tropipay account under Security > Credentials.");
    println!();

    let client_id: String = Input::new()
        .with_prompt("Client ID (TROPIPAY_CLIENT_ID)")
        .interact_text()
        .context("Failed to read TROPIPAY_CLIENT_ID")?;

    let client_secret: String = Password::new()
        .with_prompt("Client secret (TROPIPAY_CLIENT_SECRET)")
        .interact()
        .context("Failed to read TROPIPAY_CLIENT_SECRET")?;

    if client_id.trim().is_empty() || client_secret.is_empty() {
        anyhow::bail!("Client id and client secret cannot be empty");
    }

    let environments = [Environment::Sandbox, Environment::Production];
    let env_idx = Select::new()
        .with_prompt("Select environment")
        .items(&environments)
        .default(0)
        .interact()
        .context("Failed to read environment selection")?;

    let config = InteractiveConfig {
        client_id,
        client_secret,
        environment: environments[env_idx],
    };

    println!();
    let save_to_env = Confirm::new()
        .with_prompt("Save configuration to .env file?")
        .default(true)
        .interact()
        .context("Failed to read save confirmation")?;

    if save_to_env {
        save_env_file(&config)?;
        println!("Configuration saved to .env file");
    }
    println!();

    Ok(config)
}

fn env_file_contents(config: &InteractiveConfig) -> String {
    format!(
        r#"# Tropipay client configuration
# Generated by interactive setup

TROPIPAY_CLIENT_ID={}
TROPIPAY_CLIENT_SECRET={}

# sandbox or production
TROPIPAY_ENVIRONMENT={}

# Logging (trace, debug, info, warn, error)
LOG_LEVEL=info
"#,
        config.client_id, config.client_secret, config.environment,
    )
}

fn save_env_file(config: &InteractiveConfig) -> Result<()> {
    let mut file = std::fs::File::create(".env").context("Failed to create .env file")?;
    file.write_all(env_file_contents(config).as_bytes())
        .context("Failed to write .env file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_cli_explicit_values() {
        let args = parse(&[
            "tropipay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--environment",
            "production",
            "--timeout",
            "10",
            "profile",
        ]);
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.base_url, "https://www.tropipay.com/api/v3");
        assert_eq!(config.request_timeout, 10);
        assert!(matches!(config.command, Command::Profile));
        config.validate().unwrap();
    }

    #[test]
    fn test_base_url_overrides_environment() {
        let args = parse(&[
            "tropipay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--base-url",
            "http://localhost:3000/api/v3",
            "token",
        ]);
        let config = Config::from_args(args).unwrap();
        assert_eq!(config.base_url, "http://localhost:3000/api/v3");
    }

    #[test]
    fn test_movement_subcommand_parsing() {
        let args = parse(&[
            "tropipay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "movements",
            "list",
            "--account",
            "acc-1",
            "--limit",
            "5",
            "--state",
            "Completed",
            "--state",
            "pending",
        ]);
        match args.command {
            Command::Movements(MovementsCommand::List { account, page }) => {
                assert_eq!(account.as_deref(), Some("acc-1"));
                assert_eq!(page.limit, 5);
                assert_eq!(page.offset, 0);
                assert_eq!(
                    page.states,
                    vec![MovementState::Completed, MovementState::Pending]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_unknown_state_is_rejected() {
        let result = CliArgs::try_parse_from([
            "tropipay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "movements",
            "search",
            "--state",
            "bogus",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let args = parse(&[
            "tropipay",
            "--client-id",
            "id",
            "--client-secret",
            "secret",
            "--base-url",
            "ftp://example.com",
            "token",
        ]);
        let config = Config::from_args(args).unwrap();
        assert!(config.validate().is_err());

        let mut config = Config {
            base_url: "https://example.com".to_string(),
            ..config
        };
        config.validate().unwrap();

        config.client_secret = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_file_contents() {
        let contents = env_file_contents(&InteractiveConfig {
            client_id: "abc".to_string(),
            client_secret: "xyz".to_string(),
            environment: Environment::Sandbox,
        });
        assert!(contents.contains("TROPIPAY_CLIENT_ID=abc\n"));
        assert!(contents.contains("TROPIPAY_CLIENT_SECRET=xyz\n"));
        assert!(contents.contains("TROPIPAY_ENVIRONMENT=sandbox\n"));
    }
}
