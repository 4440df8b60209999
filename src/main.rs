use anyhow::{Context, Result};
use serde::Serialize;

use tropipay::auth::token_prefix;
use tropipay::config::{self, CardsCommand, Command, Config, LogFormat, MovementsCommand, PageArgs};
use tropipay::models::{CreatePaymentCardRequest, MovementFilter};
use tropipay::TropipayClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Check if interactive setup is needed (no .env and missing credentials)
    if config::needs_interactive_setup() {
        let interactive_config = config::run_interactive_setup()?;

        // Set environment variables from interactive config so Config::load() can use them
        std::env::set_var("TROPIPAY_CLIENT_ID", &interactive_config.client_id);
        std::env::set_var("TROPIPAY_CLIENT_SECRET", &interactive_config.client_secret);
        std::env::set_var(
            "TROPIPAY_ENVIRONMENT",
            interactive_config.environment.to_string(),
        );
    }

    let config = Config::load()?;
    config.validate()?;

    // Initialize logging with a configured level
    let log_level = config.log_level.to_lowercase();
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    // Logs go to stderr so stdout stays pipeable JSON
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr);

    match config.log_format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Compact => subscriber.compact().init(),
    }

    tracing::info!(
        environment = %config.environment,
        base_url = %config.base_url,
        "Tropipay client starting"
    );

    let client = config.build_client()?;
    run(&client, config.command.clone()).await
}

async fn run(client: &TropipayClient, command: Command) -> Result<()> {
    match command {
        Command::Cards(CardsCommand::List) => {
            let cards = client
                .list_payment_cards()
                .await
                .context("Failed to list payment cards")?;
            tracing::info!("Retrieved {} payment cards", cards.len());
            print_json(&cards)
        }
        Command::Cards(CardsCommand::Get { id }) => {
            let card = client
                .get_payment_card(&id)
                .await
                .with_context(|| format!("Failed to get payment card {}", id))?;
            print_json(&card)
        }
        Command::Cards(CardsCommand::Delete { id }) => {
            client
                .delete_payment_card(&id)
                .await
                .with_context(|| format!("Failed to delete payment card {}", id))?;
            tracing::info!("Deleted payment card {}", id);
            Ok(())
        }
        Command::Cards(CardsCommand::Create {
            number,
            cvc,
            holder_name,
            expiry_month,
            expiry_year,
        }) => {
            let request = CreatePaymentCardRequest {
                number,
                cvc,
                holder_name,
                expiry_month,
                expiry_year,
            };
            let card = client
                .create_payment_card(&request)
                .await
                .context("Failed to create payment card")?;
            print_json(&card)
        }
        Command::Movements(MovementsCommand::List { account, page }) => {
            let filter = filter_from(&page);
            let movements = match account {
                Some(account) => {
                    client
                        .list_account_movements(&account, page.limit, page.offset, filter.as_ref())
                        .await
                }
                None => {
                    client
                        .list_movements(page.limit, page.offset, filter.as_ref())
                        .await
                }
            }
            .context("Failed to list movements")?;
            print_json(&movements)
        }
        Command::Movements(MovementsCommand::Search { page }) => {
            let filter = filter_from(&page);
            let movements = client
                .search_movements(filter.as_ref(), page.limit, page.offset)
                .await
                .context("Failed to search movements")?;
            print_json(&movements)
        }
        Command::Profile => {
            let user = client
                .get_user_profile()
                .await
                .context("Failed to get user profile")?;
            print_json(&user)
        }
        Command::Token => {
            let token = client
                .access_token()
                .await
                .context("Authentication failed")?;
            let expires_at = client.token_expires_at().await;
            print_json(&serde_json::json!({
                "token_prefix": token_prefix(&token, 12),
                "expires_at": expires_at.map(|t| t.to_rfc3339()),
            }))
        }
    }
}

/// Filter built from CLI flags; `None` when no criteria were given
fn filter_from(page: &PageArgs) -> Option<MovementFilter> {
    let filter = MovementFilter {
        currency: page.currency.clone(),
        reference: page.reference.clone(),
        ..MovementFilter::with_states(&page.states)
    };
    (filter != MovementFilter::default()).then_some(filter)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render output")?;
    println!("{}", rendered);
    Ok(())
}
