//! Records read from the admin API, plus the request bodies for plan and
//! payment writes.

use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{draft::BillingCycle, error::FormError};

/// Plans with this exact name ignore `branch_limit`.
pub const UNLIMITED_PLAN_NAME: &str = "Enterprise";

/// Organization status while it can log in.
pub const ORG_STATUS_ACTIVE: &str = "active";
/// Organization status after a super-admin suspended it.
pub const ORG_STATUS_SUSPENDED: &str = "suspended";

/// Feature flag keys a plan can carry, with their display labels.
pub const PLAN_FEATURES: [(&str, &str); 5] = [
    ("vrEnabled", "VR Module"),
    ("analyticsAdvanced", "Advanced Analytics"),
    ("qrCheckIn", "QR Check-In"),
    ("multiCitySupport", "Multi-City Support"),
    ("publicWebsite", "Public Website"),
];

/// Actions the backend writes to the audit log.
pub const AUDIT_ACTIONS: [&str; 11] = [
    "Gym Created",
    "Gym Updated",
    "Gym Suspended",
    "Gym Reactivated",
    "Gym Deleted",
    "Plan Created",
    "Plan Updated",
    "Payment Recorded",
    "Subscription Renewed",
    "Plan Upgraded",
    "Owner Password Reset",
];

// 订阅方案目录
/// A subscription plan from the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Display name, also the key for the branch-limit exemption.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Total branches, main branch included.
    #[serde(default)]
    pub branch_limit: u32,
    /// Member cap per branch. `0` means no cap.
    #[serde(default)]
    pub member_limit_per_branch: u32,
    /// Monthly price.
    #[serde(default)]
    pub price_monthly: f64,
    /// Yearly price, `0` when the plan is not sold yearly.
    #[serde(default)]
    pub price_yearly: f64,
    /// Feature flags keyed as in [`PLAN_FEATURES`].
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
    /// Inactive plans stay listed but cannot be picked for new tenants.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Plan {
    /// True only for the plan named exactly [`UNLIMITED_PLAN_NAME`].
    pub fn is_exempt_from_branch_limit(&self) -> bool {
        self.name == UNLIMITED_PLAN_NAME
    }

    /// Additional branches allowed beside the main branch, `None` when the
    /// plan puts no bound on them. A `branch_limit` of `0` allows none.
    pub fn max_additional_branches(&self) -> Option<usize> {
        if self.is_exempt_from_branch_limit() {
            return None;
        }
        Some((self.branch_limit as usize).saturating_sub(1))
    }

    /// Whether one more branch fits when `current` additional branches exist.
    pub fn allows_additional_branch(&self, current: usize) -> bool {
        self.max_additional_branches()
            .map_or(true, |max| current < max)
    }
}

/// Populated reference to a plan inside another record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRef {
    /// Plan id.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    /// Plan name.
    #[serde(default)]
    pub name: String,
}

/// Subscription embedded in an organization list row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSubscription {
    /// Server id of the subscription, needed to record payments against it.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    /// Subscribed plan.
    #[serde(default)]
    pub plan: Option<PlanRef>,
    /// Subscription status as the backend reports it.
    #[serde(default)]
    pub status: Option<String>,
    /// ISO timestamp of the expiry.
    #[serde(default)]
    pub expiry_date: Option<String>,
}

// 组织列表行
/// One row of the organizations listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Gym name.
    #[serde(default)]
    pub name: String,
    /// Owner display name.
    #[serde(default)]
    pub owner_name: String,
    /// Owner login email.
    #[serde(default)]
    pub owner_email: String,
    /// `active` or `suspended`.
    #[serde(default)]
    pub status: String,
    /// Current subscription, when populated.
    #[serde(default)]
    pub subscription: Option<OrganizationSubscription>,
}

impl OrganizationSummary {
    /// Name of the subscribed plan, if any.
    pub fn plan_name(&self) -> Option<&str> {
        self.subscription
            .as_ref()
            .and_then(|sub| sub.plan.as_ref())
            .map(|plan| plan.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// Status of the current subscription, if any.
    pub fn subscription_status(&self) -> Option<&str> {
        self.subscription
            .as_ref()
            .and_then(|sub| sub.status.as_deref())
    }

    /// Id of the current subscription, if the server populated it.
    pub fn subscription_id(&self) -> Option<&str> {
        self.subscription
            .as_ref()
            .and_then(|sub| sub.id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Calendar date part of the subscription expiry, whatever precision the
    /// server sent.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let raw = self.subscription.as_ref()?.expiry_date.as_deref()?;
        let day = raw.get(..10)?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Pagination block of the organizations listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    /// Matching records across all pages.
    #[serde(default)]
    pub total: usize,
    /// 1-based page number as reported by the server.
    #[serde(default)]
    pub page: usize,
    /// Page count for the current limit.
    #[serde(default)]
    pub total_pages: usize,
}

/// One page of a server-side paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page.
    pub items: Vec<T>,
    /// Matching records across all pages.
    pub total: usize,
}

/// Name of a reference the server may or may not have populated: the
/// object's `name`, or the bare id string when it was left unpopulated.
pub fn populated_name(reference: Option<&Value>) -> String {
    match reference {
        Some(Value::Object(map)) => map
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        Some(Value::String(id)) => id.clone(),
        _ => String::new(),
    }
}

/// One row of the subscriptions listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Owning organization, populated or as a bare id.
    #[serde(default)]
    pub organization: Option<Value>,
    /// Subscribed plan.
    #[serde(default)]
    pub plan: Option<PlanRef>,
    /// `monthly` or `yearly`.
    #[serde(default)]
    pub billing_cycle: String,
    /// Lifecycle status as the backend reports it.
    #[serde(default)]
    pub status: String,
    /// ISO timestamp of the expiry.
    #[serde(default)]
    pub expiry_date: Option<String>,
    /// Amount charged per cycle.
    #[serde(default)]
    pub amount: Option<f64>,
}

impl SubscriptionRecord {
    /// Owning organization's name, or its id when unpopulated.
    pub fn organization_name(&self) -> String {
        populated_name(self.organization.as_ref())
    }
}

/// How a payment was made.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Cash at the counter.
    #[default]
    Cash,
    /// Bank transfer.
    Bank,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
}

impl PaymentMode {
    /// Every mode, in picker order.
    pub const ALL: [PaymentMode; 4] = [
        PaymentMode::Cash,
        PaymentMode::Bank,
        PaymentMode::Upi,
        PaymentMode::Cheque,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentMode::Cash => "cash",
            PaymentMode::Bank => "bank",
            PaymentMode::Upi => "upi",
            PaymentMode::Cheque => "cheque",
        }
    }

    /// Picker label.
    pub fn label(self) -> &'static str {
        match self {
            PaymentMode::Cash => "Cash",
            PaymentMode::Bank => "Bank Transfer",
            PaymentMode::Upi => "UPI",
            PaymentMode::Cheque => "Cheque",
        }
    }
}

impl fmt::Display for PaymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMode {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PaymentMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| FormError::InvalidValue {
                field: "paymentMode".to_string(),
                value: s.to_string(),
            })
    }
}

/// One row of the payments ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Paying organization, populated or as a bare id.
    #[serde(default)]
    pub gym_organization: Option<Value>,
    /// Amount received.
    #[serde(default)]
    pub amount: f64,
    /// Wire value of the [`PaymentMode`]. Kept raw so unknown modes still list.
    #[serde(default)]
    pub payment_mode: String,
    /// Cycle the payment covers.
    #[serde(default)]
    pub billing_cycle: String,
    /// Bank or UPI reference, empty for cash.
    #[serde(default)]
    pub transaction_reference: String,
    /// ISO timestamp of the payment.
    #[serde(default)]
    pub payment_date: Option<String>,
    /// Admin who recorded it.
    #[serde(default)]
    pub entered_by: Option<Value>,
}

impl PaymentRecord {
    /// Paying organization's name.
    pub fn organization_name(&self) -> String {
        populated_name(self.gym_organization.as_ref())
    }

    /// Name of the admin who recorded the payment.
    pub fn entered_by_name(&self) -> String {
        populated_name(self.entered_by.as_ref())
    }
}

/// Body of `POST /payments`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Paying organization id.
    pub gym_organization: String,
    /// Subscription the payment is credited to.
    pub subscription_id: String,
    /// Amount received, strictly positive.
    pub amount: f64,
    /// Cycle the payment covers.
    pub billing_cycle: BillingCycle,
    /// How it was paid.
    pub payment_mode: PaymentMode,
    /// Bank or UPI reference.
    #[serde(default)]
    pub transaction_reference: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl NewPayment {
    /// Local checks before the request goes out. The server re-validates.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.gym_organization.trim().is_empty() {
            return Err(FormError::InvalidValue {
                field: "gymOrganization".to_string(),
                value: self.gym_organization.clone(),
            });
        }
        if self.subscription_id.trim().is_empty() {
            return Err(FormError::InvalidValue {
                field: "subscriptionId".to_string(),
                value: self.subscription_id.clone(),
            });
        }
        if !(self.amount.is_finite() && self.amount > 0.0) {
            return Err(FormError::InvalidValue {
                field: "amount".to_string(),
                value: self.amount.to_string(),
            });
        }
        Ok(())
    }
}

/// Body of `POST /plans` and `PUT /plans/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Total branches, main branch included.
    pub branch_limit: u32,
    /// Member cap per branch, `0` for no cap.
    pub member_limit_per_branch: u32,
    /// Monthly price.
    pub price_monthly: f64,
    /// Yearly price.
    #[serde(default)]
    pub price_yearly: f64,
    /// Feature flags keyed as in [`PLAN_FEATURES`].
    #[serde(default)]
    pub features: BTreeMap<String, bool>,
}

impl Default for PlanInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: String::new(),
            branch_limit: 1,
            member_limit_per_branch: 300,
            price_monthly: 0.0,
            price_yearly: 0.0,
            features: PLAN_FEATURES
                .iter()
                .map(|(key, _)| (key.to_string(), false))
                .collect(),
        }
    }
}

impl From<&Plan> for PlanInput {
    fn from(plan: &Plan) -> Self {
        Self {
            name: plan.name.clone(),
            description: plan.description.clone(),
            branch_limit: plan.branch_limit,
            member_limit_per_branch: plan.member_limit_per_branch,
            price_monthly: plan.price_monthly,
            price_yearly: plan.price_yearly,
            features: plan.features.clone(),
        }
    }
}

impl PlanInput {
    /// Rejects a blank name or negative prices.
    pub fn validate(&self) -> Result<(), FormError> {
        if self.name.trim().is_empty() {
            return Err(FormError::InvalidValue {
                field: "name".to_string(),
                value: self.name.clone(),
            });
        }
        for (field, price) in [("priceMonthly", self.price_monthly), ("priceYearly", self.price_yearly)] {
            if !(price.is_finite() && price >= 0.0) {
                return Err(FormError::InvalidValue {
                    field: field.to_string(),
                    value: price.to_string(),
                });
            }
        }
        Ok(())
    }
}

/// One audit log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditLogEntry {
    /// Server id.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// One of [`AUDIT_ACTIONS`], usually.
    #[serde(default)]
    pub action: String,
    /// Organization the action touched, if any.
    #[serde(default)]
    pub gym_organization: Option<Value>,
    /// Either a message or a structured payload.
    #[serde(default)]
    pub details: Option<Value>,
    /// Admin who performed the action.
    #[serde(default)]
    pub performed_by: Option<Value>,
    /// ISO timestamp.
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl AuditLogEntry {
    /// Organization name, empty for platform-wide actions.
    pub fn organization_name(&self) -> String {
        populated_name(self.gym_organization.as_ref())
    }

    /// Name of the acting admin.
    pub fn performed_by_name(&self) -> String {
        populated_name(self.performed_by.as_ref())
    }

    /// Details as one line: strings verbatim, anything else as compact JSON.
    pub fn details_text(&self) -> String {
        match &self.details {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        }
    }
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardKpis {
    /// Every organization.
    pub total_gyms: u64,
    /// Organizations with status `active`.
    pub active_gyms: u64,
    /// Organizations with status `suspended`.
    pub suspended_gyms: u64,
    /// Members across all tenants.
    pub total_members: u64,
    /// Revenue recorded this month.
    pub monthly_revenue: f64,
    /// Revenue recorded overall.
    pub total_revenue: f64,
    /// Subscriptions expiring soon.
    pub upcoming_expiry: u64,
}

/// What the server hands back after creating an organization. Only the
/// identity is kept; the rest of the record is re-read through the list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreatedOrganization {
    /// Server id, empty when the response did not carry one.
    pub id: String,
    /// Gym name as stored.
    pub name: String,
}

impl CreatedOrganization {
    /// Finds the created record's id and name in whichever envelope the
    /// server used. Falls back to an empty identity.
    pub fn from_response(body: &Value) -> Self {
        let candidates = [
            body.pointer("/data/organization"),
            body.pointer("/data"),
            body.pointer("/result"),
            Some(body),
        ];
        for record in candidates.into_iter().flatten() {
            let id = record
                .get("_id")
                .or_else(|| record.get("id"))
                .and_then(Value::as_str);
            if let Some(id) = id {
                let name = record
                    .get("name")
                    .or_else(|| record.get("gymName"))
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                return Self {
                    id: id.to_string(),
                    name: name.to_string(),
                };
            }
        }
        Self::default()
    }
}
