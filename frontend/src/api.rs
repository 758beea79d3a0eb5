use gloo_net::http::{Request, RequestBuilder, Response};
use gymdesk_shared::{
    submission::DATA_FIELD,
    wire::{
        classify_failure, encode_query, is_success, plan_path, plan_toggle_path, DataEnvelope,
        HttpMethod, LogListResponse, LogQuery, OrganizationAction, OrganizationListResponse,
        OrganizationQuery, PaymentListResponse, PaymentQuery, PlansResponse, SubscriptionAction,
        SubscriptionListResponse, SubscriptionQuery, DASHBOARD_KPIS_PATH, LOGS_PATH,
        ORGANIZATIONS_PATH, PAYMENTS_PATH, PLANS_PATH, SUBSCRIPTIONS_EXPORT_PATH,
        SUBSCRIPTIONS_PATH,
    },
    ApiError, AuditLogEntry, CreatedOrganization, DashboardKpis, NewPayment,
    OrganizationSubmission, OrganizationSummary, Page, PaymentRecord, Plan, PlanInput,
    SubscriptionRecord,
};
use serde::{de::DeserializeOwned, Serialize};
use wasm_bindgen::JsValue;
use web_sys::{File, FormData};

// API base URL - 编译时从环境变量读取，默认本地开发地址
// 生产环境通过 workflow 设置 GYMDESK_API_BASE 环境变量
pub const API_BASE: &str = match option_env!("GYMDESK_API_BASE") {
    Some(url) => url,
    None => gymdesk_shared::wire::DEFAULT_API_BASE,
};

/// Every call takes the session's bearer token explicitly; `None` sends the
/// request unauthenticated and lets the server answer 401.
fn request(token: Option<&str>, method: HttpMethod, path: &str) -> RequestBuilder {
    let url = format!("{API_BASE}{path}");
    let builder = match method {
        HttpMethod::Get => Request::get(&url),
        HttpMethod::Post => Request::post(&url),
        HttpMethod::Put => Request::put(&url),
        HttpMethod::Patch => Request::patch(&url),
        HttpMethod::Delete => Request::delete(&url),
    };
    match token {
        Some(token) => builder.header("Authorization", &format!("Bearer {token}")),
        None => builder,
    }
}

fn js_error(context: &str) -> impl Fn(JsValue) -> ApiError + '_ {
    move |err| ApiError::Transport(format!("{context}: {err:?}"))
}

async fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if is_success(status) {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let err = classify_failure(status, &body);
    tracing::debug!(status, "admin api request failed: {err}");
    Err(err)
}

async fn send(builder: RequestBuilder) -> Result<Response, ApiError> {
    let response = builder
        .send()
        .await
        .map_err(|e| ApiError::Transport(format!("Network error: {:?}", e)))?;
    check(response).await
}

async fn send_body<T: Serialize>(builder: RequestBuilder, body: &T) -> Result<Response, ApiError> {
    let response = builder
        .json(body)
        .map_err(|e| ApiError::Transport(format!("Serialize error: {:?}", e)))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(format!("Network error: {:?}", e)))?;
    check(response).await
}

async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ApiError> {
    send(builder)
        .await?
        .json()
        .await
        .map_err(|e| ApiError::Decode(format!("Parse error: {:?}", e)))
}

pub async fn fetch_plans(token: Option<&str>) -> Result<Vec<Plan>, ApiError> {
    let response: PlansResponse = send_json(request(token, HttpMethod::Get, PLANS_PATH)).await?;
    Ok(response.data.plans)
}

/// `None` saves a new plan; `Some(id)` replaces that plan.
pub async fn save_plan(token: Option<&str>, id: Option<&str>, input: &PlanInput) -> Result<(), ApiError> {
    let builder = match id {
        Some(id) => request(token, HttpMethod::Put, &plan_path(&urlencoding::encode(id))),
        None => request(token, HttpMethod::Post, PLANS_PATH),
    };
    send_body(builder, input).await?;
    Ok(())
}

pub async fn toggle_plan(token: Option<&str>, id: &str) -> Result<(), ApiError> {
    let path = plan_toggle_path(&urlencoding::encode(id));
    send(request(token, HttpMethod::Patch, &path)).await?;
    Ok(())
}

pub async fn fetch_organizations(
    token: Option<&str>,
    query: &OrganizationQuery,
) -> Result<Page<OrganizationSummary>, ApiError> {
    let path = format!("{ORGANIZATIONS_PATH}?{}", encode_query(&query.to_pairs()));
    let response: OrganizationListResponse = send_json(request(token, HttpMethod::Get, &path)).await?;
    Ok(response.into_page())
}

pub async fn organization_action(
    token: Option<&str>,
    id: &str,
    action: OrganizationAction,
) -> Result<(), ApiError> {
    let path = action.path(&urlencoding::encode(id));
    send(request(token, action.method(), &path)).await?;
    Ok(())
}

pub async fn fetch_subscriptions(
    token: Option<&str>,
    query: &SubscriptionQuery,
) -> Result<Page<SubscriptionRecord>, ApiError> {
    let path = format!("{SUBSCRIPTIONS_PATH}?{}", encode_query(&query.to_pairs()));
    let response: SubscriptionListResponse = send_json(request(token, HttpMethod::Get, &path)).await?;
    Ok(response.into_page())
}

pub async fn subscription_action(
    token: Option<&str>,
    id: &str,
    action: SubscriptionAction,
) -> Result<(), ApiError> {
    let builder = request(token, HttpMethod::Patch, &action.path(&urlencoding::encode(id)));
    match action.body() {
        Some(body) => send_body(builder, &body).await?,
        None => send(builder).await?,
    };
    Ok(())
}

pub async fn export_subscriptions_csv(token: Option<&str>) -> Result<String, ApiError> {
    send(request(token, HttpMethod::Get, SUBSCRIPTIONS_EXPORT_PATH))
        .await?
        .text()
        .await
        .map_err(|e| ApiError::Decode(format!("Read error: {:?}", e)))
}

pub async fn fetch_payments(
    token: Option<&str>,
    query: &PaymentQuery,
) -> Result<Page<PaymentRecord>, ApiError> {
    let path = format!("{PAYMENTS_PATH}?{}", encode_query(&query.to_pairs()));
    let response: PaymentListResponse = send_json(request(token, HttpMethod::Get, &path)).await?;
    Ok(response.into_page())
}

pub async fn record_payment(token: Option<&str>, payment: &NewPayment) -> Result<(), ApiError> {
    send_body(request(token, HttpMethod::Post, PAYMENTS_PATH), payment).await?;
    Ok(())
}

pub async fn fetch_logs(token: Option<&str>, query: &LogQuery) -> Result<Page<AuditLogEntry>, ApiError> {
    let path = format!("{LOGS_PATH}?{}", encode_query(&query.to_pairs()));
    let response: LogListResponse = send_json(request(token, HttpMethod::Get, &path)).await?;
    Ok(response.into_page())
}

pub async fn fetch_kpis(token: Option<&str>) -> Result<DashboardKpis, ApiError> {
    let response: DataEnvelope<DashboardKpis> =
        send_json(request(token, HttpMethod::Get, DASHBOARD_KPIS_PATH)).await?;
    Ok(response.data)
}

/// Multipart body: `data` first, then the logo parts in submission order.
fn form_data(submission: &OrganizationSubmission<File>) -> Result<FormData, ApiError> {
    let form = FormData::new().map_err(js_error("FormData"))?;
    form.append_with_str(DATA_FIELD, &submission.data)
        .map_err(js_error(DATA_FIELD))?;
    for (field, file) in submission.file_parts() {
        form.append_with_blob_and_filename(field, file, &file.name())
            .map_err(js_error(field))?;
    }
    Ok(form)
}

pub async fn create_organization(
    token: Option<&str>,
    submission: &OrganizationSubmission<File>,
) -> Result<CreatedOrganization, ApiError> {
    // the browser sets the multipart boundary header itself
    let prepared = request(token, HttpMethod::Post, ORGANIZATIONS_PATH)
        .body(form_data(submission)?)
        .map_err(|e| ApiError::Transport(format!("Request error: {:?}", e)))?;
    let response = prepared
        .send()
        .await
        .map_err(|e| ApiError::Transport(format!("Network error: {:?}", e)))?;
    let response = check(response).await?;
    let text = response.text().await.unwrap_or_default();
    Ok(serde_json::from_str(&text)
        .map(|body| CreatedOrganization::from_response(&body))
        .unwrap_or_default())
}
