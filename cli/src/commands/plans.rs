//! `plans` commands.

use anyhow::{anyhow, Result};
use gymdesk_shared::{Plan, PlanInput, PlansApi};

use super::{api_failure, print_json};
use crate::{
    cli::{OutputFormat, PlanArgs, PlanCommands},
    client::AdminApiClient,
    utils::render_table,
};

/// Runs a `plans` subcommand.
pub async fn run(client: &AdminApiClient, command: PlanCommands) -> Result<()> {
    match command {
        PlanCommands::List {
            format,
        } => list(client, format).await,
        PlanCommands::Create {
            fields,
        } => {
            let input = plan_input(PlanInput::default(), fields)?;
            let saved = client.create_plan(&input).await.map_err(api_failure)?;
            report_saved("created", &input, saved.as_ref());
            Ok(())
        },
        PlanCommands::Update {
            id,
            fields,
        } => {
            let plans = client.list_plans().await.map_err(api_failure)?;
            let current = plans
                .iter()
                .find(|plan| plan.id == id)
                .ok_or_else(|| anyhow!("no plan with id {id}"))?;
            let input = plan_input(PlanInput::from(current), fields)?;
            let saved = client.update_plan(&id, &input).await.map_err(api_failure)?;
            report_saved("updated", &input, saved.as_ref());
            Ok(())
        },
        PlanCommands::Toggle {
            id,
        } => {
            let toggled = client.toggle_plan(&id).await.map_err(api_failure)?;
            match toggled {
                Some(plan) => println!(
                    "plan {} is now {}",
                    plan.name,
                    if plan.is_active { "active" } else { "inactive" }
                ),
                None => println!("plan {id} toggled"),
            }
            Ok(())
        },
    }
}

/// Lays `fields` over `base` and checks the result.
pub fn plan_input(mut base: PlanInput, fields: PlanArgs) -> Result<PlanInput> {
    let PlanArgs {
        name,
        description,
        branch_limit,
        member_limit,
        price_monthly,
        price_yearly,
        features,
    } = fields;
    if let Some(name) = name {
        base.name = name.trim().to_string();
    }
    if let Some(description) = description {
        base.description = description;
    }
    if let Some(limit) = branch_limit {
        base.branch_limit = limit;
    }
    if let Some(limit) = member_limit {
        base.member_limit_per_branch = limit;
    }
    if let Some(price) = price_monthly {
        base.price_monthly = price;
    }
    if let Some(price) = price_yearly {
        base.price_yearly = price;
    }
    base.features.extend(features);
    base.validate()
        .map_err(|err| anyhow!(err.user_message()))?;
    Ok(base)
}

fn report_saved(verb: &str, input: &PlanInput, saved: Option<&Plan>) {
    match saved {
        Some(plan) => println!("plan {verb}: {} ({})", plan.name, plan.id),
        None => println!("plan {verb}: {}", input.name),
    }
    tracing::info!(plan = %input.name, "plan {verb}");
}

async fn list(client: &AdminApiClient, format: OutputFormat) -> Result<()> {
    let plans = client.list_plans().await.map_err(api_failure)?;
    match format {
        OutputFormat::Json => print_json(&plans),
        OutputFormat::Table => {
            println!("{}", plans_table(&plans));
            Ok(())
        },
    }
}

/// Catalog as a table. Only the Enterprise plan shows unlimited branches.
pub fn plans_table(plans: &[Plan]) -> String {
    let rows: Vec<Vec<String>> = plans
        .iter()
        .map(|plan| {
            let branches = match plan.max_additional_branches() {
                None => "unlimited".to_string(),
                Some(_) => plan.branch_limit.to_string(),
            };
            vec![
                plan.id.clone(),
                plan.name.clone(),
                branches,
                plan.member_limit_per_branch.to_string(),
                format!("{:.2}", plan.price_monthly),
                format!("{:.2}", plan.price_yearly),
                if plan.is_active { "active" } else { "inactive" }.to_string(),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "BRANCHES", "MEMBERS/BRANCH", "MONTHLY", "YEARLY", "STATUS"], &rows)
}
