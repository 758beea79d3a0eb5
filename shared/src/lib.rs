//! Domain types and client-side state shared by the GymDesk admin CLI and
//! the browser console.
//!
//! The centrepiece is [`OrganizationForm`]: a typed, nested draft of a new
//! tenant organization with plan-bounded branches and logo attachments kept
//! outside the serializable record, plus [`CreationDialog`], which guards
//! the single in-flight submission.
//!
//! The remaining records and request bodies cover the rest of the console:
//! plan writes, the payments ledger, the audit log and the dashboard.

pub mod api;
pub mod attachments;
pub mod dialog;
pub mod draft;
pub mod error;
pub mod form;
pub mod models;
pub mod submission;
pub mod wire;

#[cfg(not(target_arch = "wasm32"))]
pub mod logging;

pub use api::{OrganizationsApi, PlansApi};
pub use attachments::{AttachmentTracker, BranchId, LogoFile};
pub use dialog::{CreationDialog, SubmissionState};
pub use draft::{
    Address, AddressField, BillingCycle, BranchDraft, BranchField, BranchUpdate, DraftOrganization,
    FieldPath, FieldUpdate, OrganizationField, OwnerField, OwnerInfo, SubscriptionChoice,
};
pub use error::{ApiError, FormError};
pub use form::OrganizationForm;
pub use models::{
    AuditLogEntry, CreatedOrganization, DashboardKpis, NewPayment, OrganizationSummary, Page,
    Pagination, PaymentMode, PaymentRecord, Plan, PlanInput, SubscriptionRecord,
};
pub use submission::{AttachmentPart, AttachmentSlot, OrganizationSubmission};
