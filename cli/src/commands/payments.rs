//! `payments` commands.

use anyhow::{anyhow, Result};
use gymdesk_shared::{wire::PaymentQuery, NewPayment, PaymentRecord};

use super::{api_failure, print_json};
use crate::{
    cli::{OutputFormat, PaymentCommands},
    client::AdminApiClient,
    utils::{or_dash, render_table},
};

/// Runs a `payments` subcommand.
pub async fn run(client: &AdminApiClient, command: PaymentCommands) -> Result<()> {
    match command {
        PaymentCommands::List {
            page,
            limit,
            format,
        } => {
            let query = PaymentQuery {
                page: page.saturating_sub(1),
                limit,
            };
            let page = client.list_payments(&query).await.map_err(api_failure)?;
            match format {
                OutputFormat::Json => print_json(&page.items),
                OutputFormat::Table => {
                    println!("{}", payments_table(&page.items));
                    println!("\n{} payments", page.total);
                    Ok(())
                },
            }
        },
        PaymentCommands::Record {
            organization,
            subscription,
            amount,
            cycle,
            mode,
            reference,
            notes,
        } => {
            let payment = NewPayment {
                gym_organization: organization,
                subscription_id: subscription,
                amount,
                billing_cycle: cycle.into(),
                payment_mode: mode.into(),
                transaction_reference: reference,
                notes,
            };
            payment
                .validate()
                .map_err(|err| anyhow!(err.user_message()))?;
            client.record_payment(&payment).await.map_err(api_failure)?;
            println!("payment of {:.2} recorded", payment.amount);
            Ok(())
        },
    }
}

/// Payments ledger as a table.
pub fn payments_table(items: &[PaymentRecord]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|payment| {
            let organization = payment.organization_name();
            let entered_by = payment.entered_by_name();
            vec![
                payment.id.clone(),
                or_dash(Some(organization.as_str())),
                format!("{:.2}", payment.amount),
                or_dash(Some(payment.payment_mode.as_str())),
                or_dash(Some(payment.billing_cycle.as_str())),
                or_dash(Some(payment.transaction_reference.as_str())),
                or_dash(payment.payment_date.as_deref().and_then(|raw| raw.get(..10))),
                or_dash(Some(entered_by.as_str())),
            ]
        })
        .collect();
    render_table(&["ID", "ORGANIZATION", "AMOUNT", "MODE", "CYCLE", "REFERENCE", "DATE", "ENTERED BY"], &rows)
}
