//! Seams between the form logic and whatever HTTP client the host uses.

use async_trait::async_trait;

use crate::{
    attachments::LogoFile,
    error::ApiError,
    models::{CreatedOrganization, Plan},
    submission::OrganizationSubmission,
};

/// Remote side of organization creation.
#[async_trait]
pub trait OrganizationsApi<F = LogoFile>
where
    F: Send + Sync,
{
    /// Sends the whole submission as one multipart request. Either the
    /// organization, its owner account and every branch are created, or
    /// nothing is.
    async fn create_organization(
        &self,
        submission: &OrganizationSubmission<F>,
    ) -> Result<CreatedOrganization, ApiError>;
}

/// Plan catalog, used to populate the plan selector and to cap branches.
#[async_trait]
pub trait PlansApi {
    /// The whole catalog, inactive plans included.
    async fn list_plans(&self) -> Result<Vec<Plan>, ApiError>;
}
