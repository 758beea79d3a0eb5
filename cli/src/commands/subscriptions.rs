//! `subs` commands.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use gymdesk_shared::{
    wire::{SubscriptionAction, SubscriptionQuery},
    SubscriptionRecord,
};

use super::{api_failure, print_json};
use crate::{
    cli::{OutputFormat, SubCommands},
    client::AdminApiClient,
    utils::{or_dash, render_table},
};

/// Runs a `subs` subcommand.
pub async fn run(client: &AdminApiClient, command: SubCommands) -> Result<()> {
    match command {
        SubCommands::List {
            status,
            page,
            limit,
            format,
        } => {
            let query = SubscriptionQuery {
                status,
                page: page.saturating_sub(1),
                limit,
            };
            let page = client
                .list_subscriptions(&query)
                .await
                .map_err(api_failure)?;
            match format {
                OutputFormat::Json => print_json(&page.items),
                OutputFormat::Table => {
                    println!("{}", subscriptions_table(&page.items));
                    println!("\n{} subscriptions", page.total);
                    Ok(())
                },
            }
        },
        SubCommands::Export {
            output,
        } => export(client, output.as_deref()).await,
        SubCommands::Renew {
            id,
            cycle,
        } => act(client, &id, SubscriptionAction::Renew(cycle.into())).await,
        SubCommands::Extend {
            id,
            days,
        } => {
            act(client, &id, SubscriptionAction::Extend {
                days,
            })
            .await
        },
        SubCommands::Suspend {
            id,
        } => act(client, &id, SubscriptionAction::Suspend).await,
        SubCommands::Cancel {
            id,
        } => act(client, &id, SubscriptionAction::Cancel).await,
    }
}

async fn export(client: &AdminApiClient, output: Option<&Path>) -> Result<()> {
    let csv = client
        .export_subscriptions_csv()
        .await
        .map_err(api_failure)?;
    match output {
        Some(path) => {
            fs::write(path, &csv).with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(rows = csv.lines().count().saturating_sub(1), "subscriptions exported to {}", path.display());
        },
        None => print!("{csv}"),
    }
    Ok(())
}

async fn act(client: &AdminApiClient, id: &str, action: SubscriptionAction) -> Result<()> {
    client
        .subscription_action(id, action)
        .await
        .map_err(api_failure)?;
    tracing::info!(subscription = id, ?action, "subscription updated");
    Ok(())
}

/// Subscriptions as a table.
pub fn subscriptions_table(items: &[SubscriptionRecord]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|sub| {
            let organization = sub.organization_name();
            vec![
                sub.id.clone(),
                or_dash(Some(organization.as_str())),
                or_dash(sub.plan.as_ref().map(|plan| plan.name.as_str())),
                or_dash(Some(sub.billing_cycle.as_str())),
                or_dash(Some(sub.status.as_str())),
                or_dash(sub.expiry_date.as_deref().and_then(|raw| raw.get(..10))),
                sub.amount
                    .map(|amount| format!("{amount:.2}"))
                    .unwrap_or_else(|| or_dash(None)),
            ]
        })
        .collect();
    render_table(&["ID", "ORGANIZATION", "PLAN", "CYCLE", "STATUS", "EXPIRES", "AMOUNT"], &rows)
}
