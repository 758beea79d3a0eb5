//! HTTP client for the admin API.

use anyhow::{Context, Result};
use async_trait::async_trait;
use gymdesk_shared::{
    wire::{
        classify_failure, is_success, plan_from_response, plan_path, plan_toggle_path,
        DataEnvelope, HttpMethod, LogListResponse, LogQuery, OrganizationAction,
        OrganizationListResponse, OrganizationQuery, PaymentListResponse, PaymentQuery,
        PlansResponse, SubscriptionAction, SubscriptionListResponse, SubscriptionQuery,
        DASHBOARD_KPIS_PATH, LOGS_PATH, ORGANIZATIONS_PATH, PAYMENTS_PATH, PLANS_PATH,
        SUBSCRIPTIONS_EXPORT_PATH, SUBSCRIPTIONS_PATH,
    },
    ApiError, AuditLogEntry, CreatedOrganization, DashboardKpis, LogoFile, NewPayment,
    OrganizationSubmission, OrganizationSummary, OrganizationsApi, Page, PaymentRecord, Plan,
    PlanInput, PlansApi, SubscriptionRecord,
};
use reqwest::{
    multipart::{Form, Part},
    RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;

/// reqwest client for the super-admin REST API.
#[derive(Clone)]
pub struct AdminApiClient {
    base: String,
    token: Option<String>,
    client: reqwest::Client,
}

impl AdminApiClient {
    /// Builds the client; fails only if the TLS backend cannot start.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build admin api http client")?;
        Ok(Self {
            base: config.api_base.clone(),
            token: config.token.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn request(&self, method: HttpMethod, path: &str) -> RequestBuilder {
        let url = self.url(path);
        let builder = match method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
            HttpMethod::Put => self.client.put(url),
            HttpMethod::Patch => self.client.patch(url),
            HttpMethod::Delete => self.client.delete(url),
        };
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status().as_u16();
        if is_success(status) {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = classify_failure(status, &body);
        tracing::debug!(status, "admin api request failed: {err}");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(builder).await?;
        response
            .json::<T>()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// Plan record echoed by a write, if the answer carried one.
    async fn send_plan_write(&self, builder: RequestBuilder) -> Result<Option<Plan>, ApiError> {
        let response = self.send(builder).await?;
        let text = response.text().await.unwrap_or_default();
        Ok(serde_json::from_str::<Value>(&text)
            .ok()
            .and_then(|body| plan_from_response(&body)))
    }

    /// `GET /organizations`.
    #[tracing::instrument(skip(self))]
    pub async fn list_organizations(
        &self,
        query: &OrganizationQuery,
    ) -> Result<Page<OrganizationSummary>, ApiError> {
        let builder = self
            .request(HttpMethod::Get, ORGANIZATIONS_PATH)
            .query(&query.to_pairs());
        let response: OrganizationListResponse = self.send_json(builder).await?;
        if !response.success {
            tracing::warn!("organization list returned success=false");
        }
        Ok(response.into_page())
    }

    /// Runs a row action on organization `id`.
    #[tracing::instrument(skip(self))]
    pub async fn organization_action(
        &self,
        id: &str,
        action: OrganizationAction,
    ) -> Result<(), ApiError> {
        self.send(self.request(action.method(), &action.path(id)))
            .await?;
        Ok(())
    }

    /// `GET /subscriptions`.
    #[tracing::instrument(skip(self))]
    pub async fn list_subscriptions(
        &self,
        query: &SubscriptionQuery,
    ) -> Result<Page<SubscriptionRecord>, ApiError> {
        let builder = self
            .request(HttpMethod::Get, SUBSCRIPTIONS_PATH)
            .query(&query.to_pairs());
        let response: SubscriptionListResponse = self.send_json(builder).await?;
        Ok(response.into_page())
    }

    /// Runs a lifecycle action on subscription `id`.
    #[tracing::instrument(skip(self))]
    pub async fn subscription_action(
        &self,
        id: &str,
        action: SubscriptionAction,
    ) -> Result<(), ApiError> {
        let mut builder = self.request(HttpMethod::Patch, &action.path(id));
        if let Some(body) = action.body() {
            builder = builder.json(&body);
        }
        self.send(builder).await?;
        Ok(())
    }

    /// Every subscription as CSV text, exactly as the server rendered it.
    #[tracing::instrument(skip(self))]
    pub async fn export_subscriptions_csv(&self) -> Result<String, ApiError> {
        let response = self
            .send(self.request(HttpMethod::Get, SUBSCRIPTIONS_EXPORT_PATH))
            .await?;
        response
            .text()
            .await
            .map_err(|err| ApiError::Decode(err.to_string()))
    }

    /// `POST /plans`.
    #[tracing::instrument(skip_all, fields(plan = %input.name))]
    pub async fn create_plan(&self, input: &PlanInput) -> Result<Option<Plan>, ApiError> {
        self.send_plan_write(self.request(HttpMethod::Post, PLANS_PATH).json(input))
            .await
    }

    /// `PUT /plans/{id}` with the whole plan.
    #[tracing::instrument(skip(self, input))]
    pub async fn update_plan(&self, id: &str, input: &PlanInput) -> Result<Option<Plan>, ApiError> {
        self.send_plan_write(self.request(HttpMethod::Put, &plan_path(id)).json(input))
            .await
    }

    /// Flips plan `id` between active and inactive.
    #[tracing::instrument(skip(self))]
    pub async fn toggle_plan(&self, id: &str) -> Result<Option<Plan>, ApiError> {
        self.send_plan_write(self.request(HttpMethod::Patch, &plan_toggle_path(id)))
            .await
    }

    /// `GET /payments`.
    #[tracing::instrument(skip(self))]
    pub async fn list_payments(&self, query: &PaymentQuery) -> Result<Page<PaymentRecord>, ApiError> {
        let builder = self
            .request(HttpMethod::Get, PAYMENTS_PATH)
            .query(&query.to_pairs());
        let response: PaymentListResponse = self.send_json(builder).await?;
        Ok(response.into_page())
    }

    /// `POST /payments`.
    #[tracing::instrument(skip_all, fields(organization = %payment.gym_organization))]
    pub async fn record_payment(&self, payment: &NewPayment) -> Result<(), ApiError> {
        self.send(self.request(HttpMethod::Post, PAYMENTS_PATH).json(payment))
            .await?;
        Ok(())
    }

    /// `GET /logs`.
    #[tracing::instrument(skip(self))]
    pub async fn list_logs(&self, query: &LogQuery) -> Result<Page<AuditLogEntry>, ApiError> {
        let builder = self
            .request(HttpMethod::Get, LOGS_PATH)
            .query(&query.to_pairs());
        let response: LogListResponse = self.send_json(builder).await?;
        Ok(response.into_page())
    }

    /// `GET /dashboard/kpis`.
    #[tracing::instrument(skip(self))]
    pub async fn dashboard_kpis(&self) -> Result<DashboardKpis, ApiError> {
        let response: DataEnvelope<DashboardKpis> = self
            .send_json(self.request(HttpMethod::Get, DASHBOARD_KPIS_PATH))
            .await?;
        Ok(response.data)
    }
}

fn file_part(file: &LogoFile) -> Result<Part, ApiError> {
    Part::bytes(file.bytes.clone())
        .file_name(file.file_name.clone())
        .mime_str(&file.content_type)
        .map_err(|err| ApiError::Transport(format!("invalid content type for {}: {err}", file.file_name)))
}

/// Builds the multipart body: `data` first, then file parts in the order the
/// submission lists them.
pub fn multipart_form(submission: &OrganizationSubmission<LogoFile>) -> Result<Form, ApiError> {
    let mut form = Form::new().text(gymdesk_shared::submission::DATA_FIELD, submission.data.clone());
    for (field, file) in submission.file_parts() {
        form = form.part(field, file_part(file)?);
    }
    Ok(form)
}

#[async_trait]
impl OrganizationsApi for AdminApiClient {
    #[tracing::instrument(skip_all)]
    async fn create_organization(
        &self,
        submission: &OrganizationSubmission<LogoFile>,
    ) -> Result<CreatedOrganization, ApiError> {
        let form = multipart_form(submission)?;
        let builder = self
            .request(HttpMethod::Post, ORGANIZATIONS_PATH)
            .multipart(form);
        let response = self.send(builder).await?;
        // a 2xx means the organization exists, whatever the body looks like
        let text = response.text().await.unwrap_or_default();
        match serde_json::from_str::<Value>(&text) {
            Ok(body) => Ok(CreatedOrganization::from_response(&body)),
            Err(err) => {
                tracing::debug!("create response body is not JSON: {err}");
                Ok(CreatedOrganization::default())
            },
        }
    }
}

#[async_trait]
impl PlansApi for AdminApiClient {
    #[tracing::instrument(skip(self))]
    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError> {
        let response: PlansResponse = self
            .send_json(self.request(HttpMethod::Get, PLANS_PATH))
            .await?;
        Ok(response.data.plans)
    }
}
