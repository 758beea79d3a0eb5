//! `logs` command.

use anyhow::Result;
use gymdesk_shared::{wire::LogQuery, AuditLogEntry};

use super::{api_failure, print_json};
use crate::{
    cli::OutputFormat,
    client::AdminApiClient,
    utils::{or_dash, render_table},
};

const DETAILS_WIDTH: usize = 60;

/// Prints one page of the audit log.
pub async fn list(client: &AdminApiClient, query: &LogQuery, format: OutputFormat) -> Result<()> {
    let page = client.list_logs(query).await.map_err(api_failure)?;
    match format {
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Table => {
            println!("{}", logs_table(&page.items));
            println!("\n{} entries", page.total);
            Ok(())
        },
    }
}

/// Audit log as a table, with long details cut short.
pub fn logs_table(items: &[AuditLogEntry]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|entry| {
            let organization = entry.organization_name();
            let performed_by = entry.performed_by_name();
            let timestamp = entry
                .timestamp
                .as_deref()
                .map(|raw| raw.get(..19).unwrap_or(raw).replace('T', " "));
            vec![
                or_dash(Some(entry.action.as_str())),
                or_dash(Some(organization.as_str())),
                or_dash(Some(truncate(&entry.details_text(), DETAILS_WIDTH).as_str())),
                or_dash(Some(performed_by.as_str())),
                or_dash(timestamp.as_deref()),
            ]
        })
        .collect();
    render_table(&["ACTION", "ORGANIZATION", "DETAILS", "PERFORMED BY", "TIMESTAMP"], &rows)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}…")
}
