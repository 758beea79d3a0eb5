//! Integration tests for the organization creation flow.

use std::{collections::BTreeMap, sync::Mutex};

use async_trait::async_trait;
use gymdesk_shared::{
    submission::{BRANCH_LOGOS_FIELD, DATA_FIELD, MAIN_BRANCH_LOGO_FIELD},
    ApiError, CreatedOrganization, CreationDialog, DraftOrganization, FieldUpdate, FormError,
    LogoFile, OrganizationSubmission, OrganizationsApi, Plan, SubmissionState,
};

/// Records what it was sent and answers with a canned outcome.
struct FakeOrganizationsApi {
    outcome: Result<CreatedOrganization, ApiError>,
    seen: Mutex<Vec<Vec<(String, String)>>>,
}

impl FakeOrganizationsApi {
    fn answering(outcome: Result<CreatedOrganization, ApiError>) -> Self {
        Self {
            outcome,
            seen: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<Vec<(String, String)>> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl OrganizationsApi for FakeOrganizationsApi {
    async fn create_organization(
        &self,
        submission: &OrganizationSubmission<LogoFile>,
    ) -> Result<CreatedOrganization, ApiError> {
        let mut parts = vec![(DATA_FIELD.to_string(), submission.data.clone())];
        parts.extend(
            submission
                .file_parts()
                .map(|(field, file)| (field.to_string(), file.file_name.clone())),
        );
        self.seen.lock().expect("lock").push(parts);
        self.outcome.clone()
    }
}

fn plans() -> Vec<Plan> {
    vec![Plan {
        id: "pro".to_string(),
        name: "Pro".to_string(),
        description: String::new(),
        branch_limit: 3,
        member_limit_per_branch: 300,
        price_monthly: 49.0,
        price_yearly: 490.0,
        features: BTreeMap::new(),
        is_active: true,
    }]
}

fn logo(name: &str) -> LogoFile {
    LogoFile::new(name, "image/png", vec![0x89, b'P', b'N', b'G'])
}

fn filled_dialog() -> CreationDialog {
    let plans = plans();
    let mut dialog: CreationDialog = CreationDialog::new();
    dialog.open();
    let form = dialog.form_mut().expect("fresh dialog is editable");
    for (path, value) in [
        ("gymName", "Iron Temple"),
        ("contactEmail", "hello@irontemple.fit"),
        ("owner.name", "Dana"),
        ("owner.email", "dana@irontemple.fit"),
        ("owner.password", "s3cret!"),
        ("subscription.planId", "pro"),
        ("subscription.billingCycle", "yearly"),
        ("mainBranch.name", "HQ"),
    ] {
        form.apply(FieldUpdate::from_path(path, value).expect("known path"));
    }
    form.add_branch(&plans).expect("first branch");
    form.add_branch(&plans).expect("second branch");
    form.apply(FieldUpdate::from_path("branches.0.name", "North").expect("known path"));
    form.apply(FieldUpdate::from_path("branches.1.name", "South").expect("known path"));
    form.set_main_logo(logo("hq.png"));
    form.set_branch_logo(1, logo("south.png"));
    form.set_branch_logo(0, logo("north.png"));
    dialog
}

#[tokio::test]
async fn successful_submission_sends_ordered_parts_and_resets() {
    let api = FakeOrganizationsApi::answering(Ok(CreatedOrganization {
        id: "o1".to_string(),
        name: "Iron Temple".to_string(),
    }));
    let mut dialog = filled_dialog();

    let created = dialog.submit(&api).await.expect("created");
    assert_eq!(created.id, "o1");

    let requests = api.requests();
    assert_eq!(requests.len(), 1);
    let fields: Vec<&str> = requests[0].iter().map(|(field, _)| field.as_str()).collect();
    assert_eq!(fields, vec![DATA_FIELD, MAIN_BRANCH_LOGO_FIELD, BRANCH_LOGOS_FIELD, BRANCH_LOGOS_FIELD]);
    let files: Vec<&str> = requests[0][1..].iter().map(|(_, name)| name.as_str()).collect();
    assert_eq!(files, vec!["hq.png", "north.png", "south.png"]);

    let data: serde_json::Value = serde_json::from_str(&requests[0][0].1).expect("data is JSON");
    assert_eq!(data["owner"]["email"], "dana@irontemple.fit");
    assert_eq!(data["branches"][1]["name"], "South");
    assert!(data["subscription"]["expiryDate"].is_string());

    assert_eq!(dialog.state(), &SubmissionState::Succeeded);
    assert!(!dialog.is_open());
    assert_eq!(dialog.form().draft(), &DraftOrganization::default());
    assert!(dialog.form().attachments().is_empty());
}

#[tokio::test]
async fn rejected_submission_preserves_everything() {
    let api = FakeOrganizationsApi::answering(Err(ApiError::Rejected {
        status: 400,
        message: "Contact email already exists".to_string(),
    }));
    let mut dialog = filled_dialog();
    let draft_before = dialog.form().draft().clone();
    let logos_before = dialog.form().attachments().len();

    let err = dialog.submit(&api).await.expect_err("server rejects");
    assert!(matches!(err, FormError::Submission(ApiError::Rejected { status: 400, .. })));
    assert_eq!(err.user_message(), "Contact email already exists");

    assert_eq!(dialog.form().draft(), &draft_before);
    assert_eq!(dialog.form().attachments().len(), logos_before);
    assert!(dialog.is_open());
    assert_eq!(dialog.last_error(), Some("Contact email already exists"));
}

#[tokio::test]
async fn transport_failure_reports_generic_message() {
    let api = FakeOrganizationsApi::answering(Err(ApiError::Transport("connection reset".to_string())));
    let mut dialog = filled_dialog();
    let draft_before = dialog.form().draft().clone();

    let err = dialog.submit(&api).await.expect_err("network down");
    assert_eq!(err.user_message(), gymdesk_shared::error::GENERIC_CREATE_FAILURE);
    assert_eq!(dialog.form().draft(), &draft_before);

    // resubmission is a manual action and goes through
    let retry = FakeOrganizationsApi::answering(Ok(CreatedOrganization::default()));
    dialog.submit(&retry).await.expect("retry succeeds");
    assert_eq!(retry.requests().len(), 1);
}
