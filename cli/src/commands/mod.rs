//! One module per command group.

pub mod dashboard;
pub mod logs;
pub mod organizations;
pub mod payments;
pub mod plans;
pub mod subscriptions;

use anyhow::{anyhow, Result};
use gymdesk_shared::ApiError;
use serde::Serialize;

use crate::{
    cli::{Cli, Commands},
    client::AdminApiClient,
    config::ClientConfig,
};

/// Dispatches a parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    let config = ClientConfig::from_env().with_overrides(cli.api_base, cli.token);
    if config.token.is_none() {
        tracing::warn!("no admin token configured; set GYMDESK_TOKEN or pass --token");
    }
    let client = AdminApiClient::new(&config)?;
    tracing::debug!(api_base = %config.api_base, "admin api client ready");

    match cli.command {
        Commands::Dashboard {
            format,
        } => dashboard::show(&client, format).await,
        Commands::Plans(command) => plans::run(&client, command).await,
        Commands::Orgs(command) => organizations::run(&client, command).await,
        Commands::Subs(command) => subscriptions::run(&client, command).await,
        Commands::Payments(command) => payments::run(&client, command).await,
        Commands::Logs {
            action,
            search,
            page,
            limit,
            format,
        } => {
            let query = gymdesk_shared::wire::LogQuery {
                action,
                search,
                page: page.saturating_sub(1),
                limit,
            };
            logs::list(&client, &query, format).await
        },
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Turns an API failure into a command error. Server refusals keep the
/// server's wording; an expired session gets a hint on how to recover.
pub(crate) fn api_failure(err: ApiError) -> anyhow::Error {
    match err {
        ApiError::SessionExpired(_) => {
            anyhow!("{}; log in again and pass a fresh --token", err.user_message())
        },
        ApiError::Rejected {
            message, ..
        } => anyhow!(message),
        other => anyhow::Error::new(other),
    }
}
