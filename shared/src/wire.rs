//! Response envelopes, query strings and error classification shared by the
//! native client and the browser client.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    draft::BillingCycle,
    error::ApiError,
    models::{
        AuditLogEntry, OrganizationSummary, Page, Pagination, PaymentRecord, Plan, SubscriptionRecord,
    },
};

/// Admin API root used when nothing else is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000/api/admin";
/// Rows per page for every listing.
pub const DEFAULT_PAGE_SIZE: usize = 10;
/// Days added by a subscription extension.
pub const DEFAULT_EXTEND_DAYS: u32 = 30;

/// Plan catalog.
pub const PLANS_PATH: &str = "/plans";
/// Organizations collection.
pub const ORGANIZATIONS_PATH: &str = "/organizations";
/// Subscriptions collection.
pub const SUBSCRIPTIONS_PATH: &str = "/subscriptions";
/// CSV dump of every subscription.
pub const SUBSCRIPTIONS_EXPORT_PATH: &str = "/subscriptions/export-csv";
/// File name offered for the CSV dump.
pub const SUBSCRIPTIONS_CSV_FILE: &str = "subscriptions.csv";
/// Payments ledger.
pub const PAYMENTS_PATH: &str = "/payments";
/// Audit log.
pub const LOGS_PATH: &str = "/logs";
/// Dashboard headline numbers.
pub const DASHBOARD_KPIS_PATH: &str = "/dashboard/kpis";

/// 401 messages that mean the token itself is bad, as opposed to a
/// permission denial for a valid session.
const TOKEN_FAILURE_MARKERS: [&str; 3] = ["no token", "token failed", "not found or inactive"];

/// `{ "data": ... }`, the envelope most admin endpoints answer with.
#[derive(Debug, Deserialize)]
pub struct DataEnvelope<T> {
    /// The payload.
    pub data: T,
}

/// Answer of `GET /plans`.
pub type PlansResponse = DataEnvelope<PlansData>;

/// Payload of `GET /plans`.
#[derive(Debug, Deserialize)]
pub struct PlansData {
    /// The whole catalog, inactive plans included.
    #[serde(default)]
    pub plans: Vec<Plan>,
}

/// Answer of `GET /organizations`.
#[derive(Debug, Deserialize)]
pub struct OrganizationListResponse {
    /// Server-side success flag.
    #[serde(default)]
    pub success: bool,
    /// Rows on this page.
    #[serde(default)]
    pub result: Vec<OrganizationSummary>,
    /// Totals for the whole listing.
    #[serde(default)]
    pub pagination: Pagination,
}

impl OrganizationListResponse {
    /// Drops the envelope.
    pub fn into_page(self) -> Page<OrganizationSummary> {
        Page {
            total: self.pagination.total,
            items: self.result,
        }
    }
}

/// Answer of `GET /subscriptions`.
pub type SubscriptionListResponse = DataEnvelope<SubscriptionListData>;

/// Payload of `GET /subscriptions`.
#[derive(Debug, Deserialize)]
pub struct SubscriptionListData {
    /// Rows on this page.
    #[serde(default)]
    pub subscriptions: Vec<SubscriptionRecord>,
    /// Matching records across all pages.
    #[serde(default)]
    pub total: usize,
}

impl SubscriptionListResponse {
    /// Drops the envelope.
    pub fn into_page(self) -> Page<SubscriptionRecord> {
        Page {
            items: self.data.subscriptions,
            total: self.data.total,
        }
    }
}

/// Answer of `GET /payments`.
pub type PaymentListResponse = DataEnvelope<PaymentListData>;

/// Payload of `GET /payments`.
#[derive(Debug, Deserialize)]
pub struct PaymentListData {
    /// Rows on this page.
    #[serde(default)]
    pub payments: Vec<PaymentRecord>,
    /// Matching records across all pages.
    #[serde(default)]
    pub total: usize,
}

impl PaymentListResponse {
    /// Drops the envelope.
    pub fn into_page(self) -> Page<PaymentRecord> {
        Page {
            items: self.data.payments,
            total: self.data.total,
        }
    }
}

/// Answer of `GET /logs`.
pub type LogListResponse = DataEnvelope<LogListData>;

/// Payload of `GET /logs`.
#[derive(Debug, Deserialize)]
pub struct LogListData {
    /// Rows on this page.
    #[serde(default)]
    pub logs: Vec<AuditLogEntry>,
    /// Matching records across all pages.
    #[serde(default)]
    pub total: usize,
}

impl LogListResponse {
    /// Drops the envelope.
    pub fn into_page(self) -> Page<AuditLogEntry> {
        Page {
            items: self.data.logs,
            total: self.data.total,
        }
    }
}

/// The plan record inside a create or update answer, wherever the server put
/// it.
pub fn plan_from_response(body: &Value) -> Option<Plan> {
    ["/data/plan", "/data", "/plan"]
        .iter()
        .filter_map(|pointer| body.pointer(pointer))
        .find_map(|record| serde_json::from_value(record.clone()).ok())
}

/// `PUT` target for one plan.
pub fn plan_path(id: &str) -> String {
    format!("{PLANS_PATH}/{id}")
}

/// `PATCH` target that flips a plan between active and inactive.
pub fn plan_toggle_path(id: &str) -> String {
    format!("{PLANS_PATH}/{id}/toggle")
}

/// Filters for `GET /organizations`. `page` is 0-based here and 1-based on
/// the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationQuery {
    /// Name or email fragment.
    pub search: String,
    /// Organization status, empty for all.
    pub status: String,
    /// 0-based page.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
}

impl Default for OrganizationQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: String::new(),
            page: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl OrganizationQuery {
    /// Query-string pairs in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("search", self.search.trim().to_string()),
            ("status", self.status.clone()),
            ("page", (self.page + 1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ]
    }
}

/// Filters for `GET /subscriptions`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionQuery {
    /// Subscription status, empty for all.
    pub status: String,
    /// 0-based page.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
}

impl Default for SubscriptionQuery {
    fn default() -> Self {
        Self {
            status: String::new(),
            page: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl SubscriptionQuery {
    /// Query-string pairs in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("status", self.status.clone()),
            ("page", (self.page + 1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ]
    }
}

/// Paging for `GET /payments`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentQuery {
    /// 0-based page.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
}

impl Default for PaymentQuery {
    fn default() -> Self {
        Self {
            page: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaymentQuery {
    /// Query-string pairs in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("page", (self.page + 1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ]
    }
}

/// Filters for `GET /logs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogQuery {
    /// Exact action name, empty for all.
    pub action: String,
    /// Free-text search.
    pub search: String,
    /// 0-based page.
    pub page: usize,
    /// Rows per page.
    pub limit: usize,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            action: String::new(),
            search: String::new(),
            page: 0,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

impl LogQuery {
    /// Query-string pairs in wire form.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("action", self.action.clone()),
            ("search", self.search.trim().to_string()),
            ("page", (self.page + 1).to_string()),
            ("limit", self.limit.max(1).to_string()),
        ]
    }
}

/// Percent-encodes `pairs` into a query string (no leading `?`).
pub fn encode_query(pairs: &[(&str, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&")
}

/// HTTP verbs the admin API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `PATCH`
    Patch,
    /// `DELETE`
    Delete,
}

/// Row actions on the organizations table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrganizationAction {
    /// Block logins for the tenant.
    Suspend,
    /// Lift a suspension.
    Reactivate,
    /// Remove the tenant for good.
    Delete,
    /// Issue the owner a new password.
    ResetPassword,
}

impl OrganizationAction {
    /// Every action, in menu order.
    pub const ALL: [OrganizationAction; 4] = [
        OrganizationAction::Suspend,
        OrganizationAction::Reactivate,
        OrganizationAction::ResetPassword,
        OrganizationAction::Delete,
    ];

    /// Verb for the action's endpoint.
    pub fn method(self) -> HttpMethod {
        match self {
            OrganizationAction::Suspend | OrganizationAction::Reactivate => HttpMethod::Patch,
            OrganizationAction::Delete => HttpMethod::Delete,
            OrganizationAction::ResetPassword => HttpMethod::Post,
        }
    }

    /// Endpoint for organization `id`.
    pub fn path(self, id: &str) -> String {
        match self {
            OrganizationAction::Suspend => format!("/organizations/{id}/suspend"),
            OrganizationAction::Reactivate => format!("/organizations/{id}/reactivate"),
            OrganizationAction::Delete => format!("/organizations/{id}"),
            OrganizationAction::ResetPassword => format!("/organizations/{id}/reset-password"),
        }
    }

    /// Button text.
    pub fn label(self) -> &'static str {
        match self {
            OrganizationAction::Suspend => "Suspend",
            OrganizationAction::Reactivate => "Reactivate",
            OrganizationAction::Delete => "Delete",
            OrganizationAction::ResetPassword => "Reset Password",
        }
    }
}

/// Subscription lifecycle actions. The backend owns every rule behind them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionAction {
    /// Start a new period on the given cycle.
    Renew(BillingCycle),
    /// Push the expiry back.
    Extend {
        /// Days to add.
        days: u32,
    },
    /// Pause the subscription.
    Suspend,
    /// End the subscription.
    Cancel,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RenewBody {
    billing_cycle: BillingCycle,
}

#[derive(Debug, Serialize)]
struct ExtendBody {
    days: u32,
}

impl SubscriptionAction {
    /// Endpoint for subscription `id`.
    pub fn path(&self, id: &str) -> String {
        let verb = match self {
            SubscriptionAction::Renew(_) => "renew",
            SubscriptionAction::Extend {
                ..
            } => "extend",
            SubscriptionAction::Suspend => "suspend",
            SubscriptionAction::Cancel => "cancel",
        };
        format!("/subscriptions/{id}/{verb}")
    }

    /// JSON body, if the action carries one. Every action is a `PATCH`.
    pub fn body(&self) -> Option<Value> {
        match self {
            SubscriptionAction::Renew(cycle) => serde_json::to_value(RenewBody {
                billing_cycle: *cycle,
            })
            .ok(),
            SubscriptionAction::Extend {
                days,
            } => serde_json::to_value(ExtendBody {
                days: *days,
            })
            .ok(),
            SubscriptionAction::Suspend | SubscriptionAction::Cancel => None,
        }
    }
}

/// Extracts the human-readable error from a failed response body, falling
/// back to the raw text and then to the status code.
pub fn error_message_from_body(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = ["/message", "/error/message", "/error"]
            .iter()
            .filter_map(|pointer| value.pointer(pointer))
            .find_map(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty());
        if let Some(message) = message {
            return message.to_string();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && !trimmed.starts_with('{') && !trimmed.starts_with('<') {
        return trimmed.to_string();
    }
    format!("HTTP error: {status}")
}

/// Maps a non-success status and body to an [`ApiError`].
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    let message = error_message_from_body(status, body);
    if status == 401 && is_token_failure(&message) {
        return ApiError::SessionExpired(message);
    }
    ApiError::Rejected {
        status,
        message,
    }
}

/// Whether a 401 message blames the token rather than the role.
pub fn is_token_failure(message: &str) -> bool {
    TOKEN_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

/// 2xx.
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn server_message_is_preferred() {
        let body = r#"{"success":false,"message":"Contact email already exists"}"#;
        assert_eq!(error_message_from_body(400, body), "Contact email already exists");
        assert_eq!(error_message_from_body(422, r#"{"error":{"message":"owner.email is required"}}"#), "owner.email is required");
    }

    #[test]
    fn falls_back_to_text_then_status() {
        assert_eq!(error_message_from_body(502, "Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message_from_body(500, "<html>oops</html>"), "HTTP error: 500");
        assert_eq!(error_message_from_body(500, ""), "HTTP error: 500");
        assert_eq!(error_message_from_body(400, r#"{"success":false}"#), "HTTP error: 400");
    }

    #[test]
    fn only_token_failures_expire_the_session() {
        let expired = classify_failure(401, r#"{"message":"Not authorized, token failed"}"#);
        assert!(expired.is_session_expired());

        let denied = classify_failure(401, r#"{"message":"Role super-admin required"}"#);
        assert_eq!(
            denied,
            ApiError::Rejected {
                status: 401,
                message: "Role super-admin required".to_string()
            }
        );

        let forbidden = classify_failure(403, r#"{"message":"no token"}"#);
        assert!(!forbidden.is_session_expired());
    }

    #[test]
    fn organization_query_uses_one_based_pages() {
        let query = OrganizationQuery {
            search: "  iron temple ".to_string(),
            status: "active".to_string(),
            page: 2,
            limit: 25,
        };
        assert_eq!(encode_query(&query.to_pairs()), "search=iron%20temple&status=active&page=3&limit=25");
    }

    #[test]
    fn action_routes_match_the_admin_api() {
        assert_eq!(OrganizationAction::Suspend.path("o1"), "/organizations/o1/suspend");
        assert_eq!(OrganizationAction::ResetPassword.method(), HttpMethod::Post);
        assert_eq!(OrganizationAction::Delete.path("o1"), "/organizations/o1");

        let renew = SubscriptionAction::Renew(BillingCycle::Yearly);
        assert_eq!(renew.path("s1"), "/subscriptions/s1/renew");
        assert_eq!(renew.body(), Some(json!({ "billingCycle": "yearly" })));
        let extend = SubscriptionAction::Extend {
            days: DEFAULT_EXTEND_DAYS,
        };
        assert_eq!(extend.body(), Some(json!({ "days": 30 })));
        assert_eq!(SubscriptionAction::Cancel.body(), None);
    }

    #[test]
    fn list_envelopes_decode() {
        let orgs: OrganizationListResponse = serde_json::from_value(json!({
            "success": true,
            "result": [{ "_id": "o1", "name": "Iron Temple", "status": "active" }],
            "pagination": { "total": 11, "page": 1, "totalPages": 2 }
        }))
        .expect("organization list");
        let page = orgs.into_page();
        assert_eq!(page.total, 11);
        assert_eq!(page.items[0].name, "Iron Temple");

        let subs: SubscriptionListResponse = serde_json::from_value(json!({
            "data": { "subscriptions": [{ "_id": "s1", "billingCycle": "monthly", "status": "active" }], "total": 1 }
        }))
        .expect("subscription list");
        assert_eq!(subs.into_page().items[0].billing_cycle, "monthly");

        let plans: PlansResponse = serde_json::from_value(json!({ "data": { "plans": [] } })).expect("plans");
        assert!(plans.data.plans.is_empty());

        let payments: PaymentListResponse = serde_json::from_value(json!({
            "data": { "payments": [{ "_id": "pay1", "amount": 500.0, "paymentMode": "cash" }], "total": 21 }
        }))
        .expect("payment list");
        let page = payments.into_page();
        assert_eq!(page.total, 21);
        assert_eq!(page.items[0].amount, 500.0);

        let logs: LogListResponse = serde_json::from_value(json!({
            "data": { "logs": [{ "_id": "l1", "action": "Gym Created" }], "total": 1 }
        }))
        .expect("log list");
        assert_eq!(logs.into_page().items[0].action, "Gym Created");
    }

    #[test]
    fn log_and_payment_queries_page_from_one() {
        let logs = LogQuery {
            action: "Payment Recorded".to_string(),
            search: " iron ".to_string(),
            page: 1,
            limit: 10,
        };
        assert_eq!(encode_query(&logs.to_pairs()), "action=Payment%20Recorded&search=iron&page=2&limit=10");
        assert_eq!(encode_query(&PaymentQuery::default().to_pairs()), "page=1&limit=10");
    }

    #[test]
    fn plan_write_routes_and_answers() {
        assert_eq!(plan_path("p1"), "/plans/p1");
        assert_eq!(plan_toggle_path("p1"), "/plans/p1/toggle");

        let nested = json!({ "success": true, "data": { "plan": { "_id": "p9", "name": "Gold" } } });
        assert_eq!(plan_from_response(&nested).map(|plan| plan.id), Some("p9".to_string()));
        assert!(plan_from_response(&json!({ "success": true })).is_none());
    }
}
