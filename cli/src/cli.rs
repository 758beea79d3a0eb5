//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use gymdesk_shared::{
    models::PLAN_FEATURES, wire::DEFAULT_EXTEND_DAYS, BillingCycle, PaymentMode,
};

/// How listings are printed.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Aligned plain-text table.
    Table,
    /// Pretty-printed JSON.
    Json,
}

/// Billing cycle as a flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CycleArg {
    /// Every month.
    Monthly,
    /// Every twelve months.
    Yearly,
}

/// Payment mode as a flag value.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// Cash at the counter.
    Cash,
    /// Bank transfer.
    Bank,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
}

impl From<ModeArg> for PaymentMode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Cash => PaymentMode::Cash,
            ModeArg::Bank => PaymentMode::Bank,
            ModeArg::Upi => PaymentMode::Upi,
            ModeArg::Cheque => PaymentMode::Cheque,
        }
    }
}

impl From<CycleArg> for BillingCycle {
    fn from(value: CycleArg) -> Self {
        match value {
            CycleArg::Monthly => BillingCycle::Monthly,
            CycleArg::Yearly => BillingCycle::Yearly,
        }
    }
}

/// Top-level arguments.
#[derive(Parser)]
#[command(name = "gymdesk", version, about = "GymDesk super-admin CLI")]
pub struct Cli {
    /// Admin API base URL (overrides `GYMDESK_API_BASE`).
    #[arg(long, global = true)]
    pub api_base: Option<String>,
    /// Bearer token (overrides `GYMDESK_TOKEN`).
    #[arg(long, global = true)]
    pub token: Option<String>,
    /// What to do.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Show the dashboard headline numbers.
    Dashboard {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
    /// Manage subscription plans.
    #[command(subcommand)]
    Plans(PlanCommands),
    /// Manage tenant organizations.
    #[command(subcommand)]
    Orgs(OrgCommands),
    /// Manage subscriptions.
    #[command(subcommand)]
    Subs(SubCommands),
    /// List or record payments.
    #[command(subcommand)]
    Payments(PaymentCommands),
    /// Browse the audit log.
    Logs {
        /// Exact action name such as `Gym Created`; empty for all.
        #[arg(long, default_value = "")]
        action: String,
        /// Free-text search.
        #[arg(long, default_value = "")]
        search: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
}

/// `plans` subcommands.
#[derive(Subcommand)]
pub enum PlanCommands {
    /// List subscription plans.
    List {
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
    /// Add a plan to the catalog.
    Create {
        /// Plan fields; unset ones take the catalog defaults.
        #[command(flatten)]
        fields: PlanArgs,
    },
    /// Change an existing plan. Unset fields keep their current value.
    Update {
        /// Plan id.
        id: String,
        /// Fields to change.
        #[command(flatten)]
        fields: PlanArgs,
    },
    /// Flip a plan between active and inactive.
    Toggle {
        /// Plan id.
        id: String,
    },
}

/// Plan fields shared by `plans create` and `plans update`.
#[derive(Debug, Clone, Default, Args)]
pub struct PlanArgs {
    /// Display name.
    #[arg(long)]
    pub name: Option<String>,
    /// Description.
    #[arg(long)]
    pub description: Option<String>,
    /// Total branches, main branch included.
    #[arg(long)]
    pub branch_limit: Option<u32>,
    /// Members per branch, 0 for no cap.
    #[arg(long)]
    pub member_limit: Option<u32>,
    /// Monthly price.
    #[arg(long)]
    pub price_monthly: Option<f64>,
    /// Yearly price.
    #[arg(long)]
    pub price_yearly: Option<f64>,
    /// Feature flag as `KEY=true|false`, e.g. `qrCheckIn=true`. Repeatable.
    #[arg(long = "feature", value_parser = parse_feature)]
    pub features: Vec<(String, bool)>,
}

/// `orgs` subcommands.
#[derive(Subcommand)]
pub enum OrgCommands {
    /// List organizations, one page at a time.
    List {
        /// Name or email fragment.
        #[arg(long, default_value = "")]
        search: String,
        /// `active` or `suspended`; empty for all.
        #[arg(long, default_value = "")]
        status: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
    /// Create an organization with its owner, main branch and extra
    /// branches.
    Create {
        /// JSON draft (camelCase keys, same shape as the `data` part).
        #[arg(long)]
        draft: Option<PathBuf>,
        /// Field override such as `owner.email=dana@example.com` or
        /// `branches.0.name=North`. Repeatable, applied after `--draft`.
        #[arg(long = "set", value_parser = parse_key_value)]
        sets: Vec<(String, String)>,
        /// Logo for the main branch.
        #[arg(long)]
        main_logo: Option<PathBuf>,
        /// Logo for an additional branch, as `POSITION=PATH`. Repeatable.
        #[arg(long = "branch-logo", value_parser = parse_branch_logo)]
        branch_logos: Vec<(usize, PathBuf)>,
    },
    /// Suspend an organization.
    Suspend {
        /// Organization id.
        id: String,
    },
    /// Reactivate a suspended organization.
    Reactivate {
        /// Organization id.
        id: String,
    },
    /// Delete an organization.
    Delete {
        /// Organization id.
        id: String,
    },
    /// Send the owner a password reset.
    ResetPassword {
        /// Organization id.
        id: String,
    },
}

/// `subs` subcommands.
#[derive(Subcommand)]
pub enum SubCommands {
    /// List subscriptions.
    List {
        /// Subscription status; empty for all.
        #[arg(long, default_value = "")]
        status: String,
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
    /// Download every subscription as CSV.
    Export {
        /// Destination file; stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Renew for another billing cycle.
    Renew {
        /// Subscription id.
        id: String,
        /// Cycle of the new period.
        #[arg(long, value_enum, default_value_t = CycleArg::Monthly)]
        cycle: CycleArg,
    },
    /// Push the expiry date out by a number of days.
    Extend {
        /// Subscription id.
        id: String,
        /// Days to add.
        #[arg(long, default_value_t = DEFAULT_EXTEND_DAYS)]
        days: u32,
    },
    /// Suspend a subscription.
    Suspend {
        /// Subscription id.
        id: String,
    },
    /// Cancel a subscription.
    Cancel {
        /// Subscription id.
        id: String,
    },
}

/// `payments` subcommands.
#[derive(Subcommand)]
pub enum PaymentCommands {
    /// List recorded payments, newest first.
    List {
        /// 1-based page number.
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Rows per page.
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table, ignore_case = true)]
        format: OutputFormat,
    },
    /// Record a payment received from an organization.
    Record {
        /// Paying organization id.
        #[arg(long)]
        organization: String,
        /// Subscription the payment is credited to.
        #[arg(long)]
        subscription: String,
        /// Amount received.
        #[arg(long)]
        amount: f64,
        /// Cycle the payment covers.
        #[arg(long, value_enum, default_value_t = CycleArg::Monthly)]
        cycle: CycleArg,
        /// How it was paid.
        #[arg(long, value_enum, default_value_t = ModeArg::Cash)]
        mode: ModeArg,
        /// Bank or UPI reference.
        #[arg(long, default_value = "")]
        reference: String,
        /// Free-form notes.
        #[arg(long, default_value = "")]
        notes: String,
    },
}

/// Splits `KEY=VALUE` at the first `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got `{raw}`"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field path in `{raw}`"));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parses `POSITION=PATH` for `--branch-logo`.
pub fn parse_branch_logo(raw: &str) -> Result<(usize, PathBuf), String> {
    let (position, path) = parse_key_value(raw)?;
    let position = position
        .parse::<usize>()
        .map_err(|_| format!("branch position must be a number, got `{position}`"))?;
    if path.trim().is_empty() {
        return Err(format!("missing logo path in `{raw}`"));
    }
    Ok((position, PathBuf::from(path)))
}

/// Parses `KEY=true|false` for `--feature`. Only catalog feature keys are
/// accepted.
pub fn parse_feature(raw: &str) -> Result<(String, bool), String> {
    let (key, value) = parse_key_value(raw)?;
    if !PLAN_FEATURES.iter().any(|(known, _)| *known == key) {
        let known: Vec<&str> = PLAN_FEATURES.iter().map(|(key, _)| *key).collect();
        return Err(format!("unknown feature `{key}`, expected one of {}", known.join(", ")));
    }
    let enabled = value
        .trim()
        .parse::<bool>()
        .map_err(|_| format!("feature value must be true or false, got `{value}`"))?;
    Ok((key, enabled))
}
