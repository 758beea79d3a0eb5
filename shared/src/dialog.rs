//! Lifecycle of the "create organization" dialog.
//!
//! ```text
//! Editing --begin_submit--> Submitting --finish_submit(Ok)--> Succeeded (closed, draft reset)
//!                                      \-finish_submit(Err)-> Failed    (open, draft kept)
//! ```

use crate::{
    api::OrganizationsApi,
    attachments::LogoFile,
    error::{ApiError, FormError},
    form::OrganizationForm,
    models::CreatedOrganization,
    submission::OrganizationSubmission,
};

/// Where the dialog is in its submit cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Accepting edits.
    #[default]
    Editing,
    /// A request is outstanding. Edits and a second submit are refused.
    Submitting,
    /// The last submission created an organization.
    Succeeded,
    /// The last submission failed with this user-facing message.
    Failed(String),
}

/// The creation dialog: an open flag, the form, and the submission state.
#[derive(Debug, Clone)]
pub struct CreationDialog<F = LogoFile> {
    open: bool,
    form: OrganizationForm<F>,
    state: SubmissionState,
}

impl<F> Default for CreationDialog<F> {
    fn default() -> Self {
        Self {
            open: false,
            form: OrganizationForm::default(),
            state: SubmissionState::Editing,
        }
    }
}

impl<F> CreationDialog<F> {
    /// Closed dialog with an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the dialog is showing.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Opens the dialog on a fresh, empty draft.
    pub fn open(&mut self) {
        if self.open {
            return;
        }
        self.form.reset();
        self.state = SubmissionState::Editing;
        self.open = true;
    }

    /// Cancels the dialog, discarding the draft. Ignored while a submission
    /// is outstanding; its outcome still has to land.
    pub fn close(&mut self) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.open = false;
        self.form.reset();
        self.state = SubmissionState::Editing;
        true
    }

    /// Read access to the form.
    pub fn form(&self) -> &OrganizationForm<F> {
        &self.form
    }

    /// Write access to the form. Refused while a submission is outstanding,
    /// since its outcome decides whether the draft is kept or reset.
    pub fn form_mut(&mut self) -> Result<&mut OrganizationForm<F>, FormError> {
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        Ok(&mut self.form)
    }

    /// Current submission state.
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    /// Whether a request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Message of the last failed submission.
    pub fn last_error(&self) -> Option<&str> {
        match &self.state {
            SubmissionState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Records the outcome of the request started by
    /// [`CreationDialog::begin_submit`].
    pub fn finish_submit(
        &mut self,
        outcome: Result<CreatedOrganization, ApiError>,
    ) -> Result<CreatedOrganization, FormError> {
        match outcome {
            Ok(created) => {
                tracing::info!(organization = %created.id, "organization created");
                self.form.reset();
                self.state = SubmissionState::Succeeded;
                self.open = false;
                Ok(created)
            },
            Err(err) => {
                tracing::warn!("organization creation failed: {err}");
                self.state = SubmissionState::Failed(err.user_message());
                Err(FormError::Submission(err))
            },
        }
    }
}

impl<F: Clone> CreationDialog<F> {
    /// Moves to `Submitting` and returns the body to send. A second call
    /// before [`CreationDialog::finish_submit`] is rejected.
    pub fn begin_submit(&mut self) -> Result<OrganizationSubmission<F>, FormError> {
        if !self.open {
            return Err(FormError::DialogClosed);
        }
        if self.is_submitting() {
            return Err(FormError::SubmissionInFlight);
        }
        let submission = self.form.assemble()?;
        self.state = SubmissionState::Submitting;
        tracing::debug!(files = submission.attachments.len(), "submitting organization");
        Ok(submission)
    }
}

impl<F: Clone + Send + Sync> CreationDialog<F> {
    /// Runs a whole submission against `api`.
    pub async fn submit<A>(&mut self, api: &A) -> Result<CreatedOrganization, FormError>
    where
        A: OrganizationsApi<F> + ?Sized,
    {
        let submission = self.begin_submit()?;
        let outcome = api.create_organization(&submission).await;
        self.finish_submit(outcome)
    }
}
