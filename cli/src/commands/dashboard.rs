//! `dashboard` command.

use anyhow::Result;
use gymdesk_shared::DashboardKpis;

use super::{api_failure, print_json};
use crate::{cli::OutputFormat, client::AdminApiClient, utils::render_table};

/// Prints the headline numbers.
pub async fn show(client: &AdminApiClient, format: OutputFormat) -> Result<()> {
    let kpis = client.dashboard_kpis().await.map_err(api_failure)?;
    match format {
        OutputFormat::Json => print_json(&kpis),
        OutputFormat::Table => {
            println!("{}", kpis_table(&kpis));
            Ok(())
        },
    }
}

/// One metric per row.
pub fn kpis_table(kpis: &DashboardKpis) -> String {
    let rows = vec![
        vec!["Total gyms".to_string(), kpis.total_gyms.to_string()],
        vec!["Active gyms".to_string(), kpis.active_gyms.to_string()],
        vec!["Suspended gyms".to_string(), kpis.suspended_gyms.to_string()],
        vec!["Total members".to_string(), kpis.total_members.to_string()],
        vec!["Revenue this month".to_string(), format!("{:.2}", kpis.monthly_revenue)],
        vec!["Revenue overall".to_string(), format!("{:.2}", kpis.total_revenue)],
        vec!["Expiring soon".to_string(), kpis.upcoming_expiry.to_string()],
    ];
    render_table(&["METRIC", "VALUE"], &rows)
}
