//! `orgs` commands.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use gymdesk_shared::{
    wire::{OrganizationAction, OrganizationQuery},
    CreationDialog, FieldUpdate, FormError, OrganizationSummary, PlansApi,
};

use super::{api_failure, print_json};
use crate::{
    cli::{OrgCommands, OutputFormat},
    client::AdminApiClient,
    utils::{or_dash, read_draft, read_logo, render_table},
};

/// Runs an `orgs` subcommand.
pub async fn run(client: &AdminApiClient, command: OrgCommands) -> Result<()> {
    match command {
        OrgCommands::List {
            search,
            status,
            page,
            limit,
            format,
        } => {
            let query = OrganizationQuery {
                search,
                status,
                page: page.saturating_sub(1),
                limit,
            };
            list(client, &query, format).await
        },
        OrgCommands::Create {
            draft,
            sets,
            main_logo,
            branch_logos,
        } => {
            let request = CreateRequest {
                draft,
                sets,
                main_logo,
                branch_logos,
            };
            create(client, request).await
        },
        OrgCommands::Suspend {
            id,
        } => act(client, &id, OrganizationAction::Suspend).await,
        OrgCommands::Reactivate {
            id,
        } => act(client, &id, OrganizationAction::Reactivate).await,
        OrgCommands::Delete {
            id,
        } => act(client, &id, OrganizationAction::Delete).await,
        OrgCommands::ResetPassword {
            id,
        } => act(client, &id, OrganizationAction::ResetPassword).await,
    }
}

async fn list(client: &AdminApiClient, query: &OrganizationQuery, format: OutputFormat) -> Result<()> {
    let page = client
        .list_organizations(query)
        .await
        .map_err(api_failure)?;
    match format {
        OutputFormat::Json => print_json(&page.items),
        OutputFormat::Table => {
            println!("{}", organizations_table(&page.items));
            let pages = page.total.div_ceil(query.limit.max(1)).max(1);
            println!("\npage {} of {} ({} organizations)", query.page + 1, pages, page.total);
            Ok(())
        },
    }
}

/// Organizations as a table.
pub fn organizations_table(items: &[OrganizationSummary]) -> String {
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|org| {
            vec![
                org.id.clone(),
                org.name.clone(),
                or_dash(Some(org.owner_name.as_str())),
                or_dash(Some(org.owner_email.as_str())),
                or_dash(org.plan_name()),
                or_dash(Some(org.status.as_str())),
                org.expiry_date()
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| or_dash(None)),
            ]
        })
        .collect();
    render_table(&["ID", "NAME", "OWNER", "EMAIL", "PLAN", "STATUS", "EXPIRES"], &rows)
}

async fn act(client: &AdminApiClient, id: &str, action: OrganizationAction) -> Result<()> {
    client
        .organization_action(id, action)
        .await
        .map_err(api_failure)?;
    tracing::info!(organization = id, "{} done", action.label());
    Ok(())
}

/// Inputs of `orgs create`, gathered from the command line.
#[derive(Debug, Default)]
pub struct CreateRequest {
    /// JSON draft file.
    pub draft: Option<PathBuf>,
    /// `--set` overrides in command-line order.
    pub sets: Vec<(String, String)>,
    /// Main branch logo file.
    pub main_logo: Option<PathBuf>,
    /// `(position, file)` per branch logo.
    pub branch_logos: Vec<(usize, PathBuf)>,
}

async fn create(client: &AdminApiClient, request: CreateRequest) -> Result<()> {
    let plans = client.list_plans().await.map_err(api_failure)?;
    let mut dialog = CreationDialog::new();
    dialog.open();
    fill_dialog(&mut dialog, &plans, request)?;

    match dialog.submit(client).await {
        Ok(created) => {
            if created.id.is_empty() {
                println!("organization created");
            } else {
                println!("organization created: {} ({})", created.name, created.id);
            }
            Ok(())
        },
        Err(FormError::Submission(err)) if err.is_session_expired() => Err(api_failure(err)),
        Err(err) => Err(anyhow!(err.user_message())),
    }
}

/// Loads the draft file, applies `--set` overrides and binds the logos.
pub fn fill_dialog(
    dialog: &mut CreationDialog,
    plans: &[gymdesk_shared::Plan],
    request: CreateRequest,
) -> Result<()> {
    let CreateRequest {
        draft,
        sets,
        main_logo,
        branch_logos,
    } = request;
    let form = dialog.form_mut().map_err(|err| anyhow!(err.user_message()))?;

    if let Some(path) = draft {
        let draft = read_draft(&path)?;
        form.load(draft, plans)
            .map_err(|err| anyhow!(err.user_message()))
            .with_context(|| format!("cannot load draft {}", path.display()))?;
    }

    for (path, value) in sets {
        let update = FieldUpdate::from_path(&path, &value).map_err(|err| anyhow!(err.user_message()))?;
        let had_branches = !form.draft().branches.is_empty();
        form.apply(update);
        if had_branches && form.draft().branches.is_empty() {
            tracing::warn!("changing the plan removed the additional branches");
        }
    }

    if let Some(path) = main_logo {
        form.set_main_logo(read_logo(&path)?);
    }
    for (position, path) in branch_logos {
        let logo = read_logo(&path)?;
        if !form.set_branch_logo(position, logo) {
            bail!("no branch at position {position} for logo {}", path.display());
        }
    }
    Ok(())
}
