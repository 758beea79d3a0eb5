//! The organization-creation form state.

use chrono::{Local, NaiveDate};

use crate::{
    attachments::{AttachmentTracker, BranchId, LogoFile},
    draft::{Applied, BranchDraft, DraftOrganization, FieldUpdate},
    error::FormError,
    models::Plan,
    submission::{self, OrganizationSubmission},
};

/// Client-side state of the organization-creation form: the serializable
/// draft, one stable id per additional branch, and the logo slots.
///
/// `branch_ids[i]` always identifies `draft.branches[i]`.
#[derive(Debug, Clone)]
pub struct OrganizationForm<F = LogoFile> {
    draft: DraftOrganization,
    branch_ids: Vec<BranchId>,
    next_branch_id: u64,
    attachments: AttachmentTracker<F>,
}

impl<F> Default for OrganizationForm<F> {
    fn default() -> Self {
        Self {
            draft: DraftOrganization::default(),
            branch_ids: Vec::new(),
            next_branch_id: 0,
            attachments: AttachmentTracker::default(),
        }
    }
}

impl<F> OrganizationForm<F> {
    /// Empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// The serializable draft.
    pub fn draft(&self) -> &DraftOrganization {
        &self.draft
    }

    /// Logo slots, keyed by main branch or [`BranchId`].
    pub fn attachments(&self) -> &AttachmentTracker<F> {
        &self.attachments
    }

    /// Ids of the additional branches, in draft order.
    pub fn branch_ids(&self) -> &[BranchId] {
        &self.branch_ids
    }

    /// Id of the additional branch at `index`.
    pub fn branch_id(&self, index: usize) -> Option<BranchId> {
        self.branch_ids.get(index).copied()
    }

    /// Current index of the branch with `id`.
    pub fn position_of(&self, id: BranchId) -> Option<usize> {
        self.branch_ids.iter().position(|candidate| *candidate == id)
    }

    /// Applies an edit using the local calendar date for expiry computation.
    pub fn apply(&mut self, update: FieldUpdate) {
        self.apply_at(update, Local::now().date_naive());
    }

    /// Applies an edit with an explicit "today". Never fails: an index that
    /// points past the branch list leaves the form unchanged.
    pub fn apply_at(&mut self, update: FieldUpdate, today: NaiveDate) {
        if self.draft.apply(update, today) == Applied::BranchesCleared {
            self.branch_ids.clear();
            self.attachments.clear_branches();
        }
    }

    /// The catalog entry matching the draft's plan id. An empty or unknown
    /// id selects nothing.
    pub fn selected_plan<'p>(&self, plans: &'p [Plan]) -> Option<&'p Plan> {
        let plan_id = self.draft.subscription.plan_id.as_str();
        if plan_id.is_empty() {
            return None;
        }
        plans.iter().find(|plan| plan.id == plan_id)
    }

    /// Appends an empty branch if the selected plan has room for it.
    pub fn add_branch(&mut self, plans: &[Plan]) -> Result<BranchId, FormError> {
        let plan = self.selected_plan(plans).ok_or(FormError::NoPlanSelected)?;
        let current = self.draft.branches.len();
        if !plan.allows_additional_branch(current) {
            return Err(FormError::BranchLimitReached {
                max_additional: plan.max_additional_branches().unwrap_or_default(),
            });
        }

        let id = BranchId(self.next_branch_id);
        self.next_branch_id += 1;
        self.draft.branches.push(BranchDraft::default());
        self.branch_ids.push(id);
        tracing::debug!(branch = id.get(), plan = %plan.name, "branch added");
        Ok(id)
    }

    /// Removes the branch at `index` together with its logo. Later branches
    /// shift down and keep their own logos.
    pub fn remove_branch(&mut self, index: usize) -> bool {
        if index >= self.draft.branches.len() {
            return false;
        }
        self.draft.branches.remove(index);
        let id = self.branch_ids.remove(index);
        self.attachments.remove_branch(id);
        true
    }

    /// [`Self::remove_branch`] addressed by id.
    pub fn remove_branch_by_id(&mut self, id: BranchId) -> bool {
        match self.position_of(id) {
            Some(index) => self.remove_branch(index),
            None => false,
        }
    }

    /// Attaches the main branch logo, replacing any previous one.
    pub fn set_main_logo(&mut self, file: F) {
        self.attachments.set_main(file);
    }

    /// Drops the main branch logo.
    pub fn clear_main_logo(&mut self) {
        self.attachments.clear_main();
    }

    /// Binds a logo to the branch currently at `index`. Returns `false` when
    /// there is no such branch.
    pub fn set_branch_logo(&mut self, index: usize, file: F) -> bool {
        match self.branch_id(index) {
            Some(id) => {
                self.attachments.set_branch(id, file);
                true
            },
            None => false,
        }
    }

    /// [`Self::set_branch_logo`] addressed by id.
    pub fn set_branch_logo_by_id(&mut self, id: BranchId, file: F) -> bool {
        if self.position_of(id).is_none() {
            return false;
        }
        self.attachments.set_branch(id, file);
        true
    }

    /// Logo of the branch currently at `index`.
    pub fn branch_logo(&self, index: usize) -> Option<&F> {
        self.branch_id(index)
            .and_then(|id| self.attachments.branch(id))
    }

    /// Back to the empty draft with no attachments.
    pub fn reset(&mut self) {
        self.draft = DraftOrganization::default();
        self.branch_ids.clear();
        self.attachments.clear();
    }

    /// Replaces the draft with `draft`, re-adding its branches one by one so
    /// the plan capacity check still applies. On error the form is left as it
    /// was.
    pub fn load(&mut self, mut draft: DraftOrganization, plans: &[Plan]) -> Result<(), FormError> {
        let branches = std::mem::take(&mut draft.branches);
        let mut next = OrganizationForm::<F> {
            draft,
            branch_ids: Vec::new(),
            next_branch_id: self.next_branch_id,
            attachments: AttachmentTracker::default(),
        };
        for mut branch in branches {
            next.add_branch(plans)?;
            branch.floor_count = branch.floor_count.max(1);
            if let Some(slot) = next.draft.branches.last_mut() {
                *slot = branch;
            }
        }
        // the main logo survives; branch logos belonged to the old branches
        next.attachments = std::mem::take(&mut self.attachments);
        next.attachments.clear_branches();
        *self = next;
        Ok(())
    }
}

impl<F: Clone> OrganizationForm<F> {
    /// Builds the outbound multipart body without touching the form.
    pub fn assemble(&self) -> Result<OrganizationSubmission<F>, FormError> {
        submission::assemble(&self.draft, &self.branch_ids, &self.attachments)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::{
        draft::BillingCycle,
        submission::{AttachmentSlot, BRANCH_LOGOS_FIELD, MAIN_BRANCH_LOGO_FIELD},
    };

    fn plan(id: &str, name: &str, branch_limit: u32) -> Plan {
        Plan {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            branch_limit,
            member_limit_per_branch: 300,
            price_monthly: 29.0,
            price_yearly: 290.0,
            features: BTreeMap::new(),
            is_active: true,
        }
    }

    fn catalog() -> Vec<Plan> {
        vec![plan("basic", "Basic", 1), plan("pro", "Pro", 3), plan("ent", "Enterprise", 1)]
    }

    fn form_with_plan(plan_id: &str) -> OrganizationForm<&'static str> {
        let mut form = OrganizationForm::new();
        form.apply(FieldUpdate::PlanId(plan_id.to_string()));
        form
    }

    #[test]
    fn capacity_is_limit_minus_main_branch() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.add_branch(&plans).expect("first branch");
        form.add_branch(&plans).expect("second branch");
        let err = form.add_branch(&plans).expect_err("third branch exceeds plan");
        assert!(matches!(err, FormError::BranchLimitReached { max_additional: 2 }));
        assert_eq!(form.draft().branches.len(), 2);
    }

    #[test]
    fn zero_limit_plan_rejects_every_branch() {
        let plans = vec![plan("starter", "Starter", 0)];
        let mut form = form_with_plan("starter");
        let err = form.add_branch(&plans).expect_err("no room beside the main branch");
        assert!(matches!(err, FormError::BranchLimitReached { max_additional: 0 }));
        assert!(form.draft().branches.is_empty());
        assert!(form.branch_ids().is_empty());
    }

    #[test]
    fn enterprise_plan_is_never_capped() {
        let plans = catalog();
        let mut form = form_with_plan("ent");
        for _ in 0..10 {
            form.add_branch(&plans).expect("enterprise ignores the limit");
        }
        assert_eq!(form.draft().branches.len(), 10);
    }

    #[test]
    fn adding_without_a_plan_never_mutates() {
        let plans = catalog();
        let mut form: OrganizationForm<&str> = OrganizationForm::new();
        for _ in 0..3 {
            let err = form.add_branch(&plans).expect_err("no plan selected");
            assert!(matches!(err, FormError::NoPlanSelected));
            assert_eq!(err.to_string(), "Please select a plan first");
        }
        assert!(form.draft().branches.is_empty());

        // a plan id that is not in the catalog counts as no plan
        let mut unknown = form_with_plan("gone");
        assert!(matches!(unknown.add_branch(&plans), Err(FormError::NoPlanSelected)));
    }

    #[test]
    fn new_branches_start_empty_with_one_floor() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.add_branch(&plans).expect("branch");
        assert_eq!(form.draft().branches[0], BranchDraft::default());
        assert_eq!(form.draft().branches[0].floor_count, 1);
        assert!(form.branch_logo(0).is_none());
    }

    #[test]
    fn plan_change_drops_branches_and_their_logos() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.add_branch(&plans).expect("branch");
        form.set_main_logo("main.png");
        assert!(form.set_branch_logo(0, "b0.png"));

        form.apply(FieldUpdate::PlanId("ent".to_string()));
        assert!(form.draft().branches.is_empty());
        assert!(form.branch_ids().is_empty());
        assert_eq!(form.attachments().len(), 1);
        assert_eq!(form.attachments().main(), Some(&"main.png"));
    }

    #[test]
    fn removal_keeps_logos_with_their_branches() {
        let plans = catalog();
        let mut form = form_with_plan("ent");
        for name in ["A", "B", "C"] {
            form.add_branch(&plans).expect("branch");
            let index = form.draft().branches.len() - 1;
            form.apply(FieldUpdate::Branch {
                index,
                update: crate::draft::BranchUpdate::Name(name.to_string()),
            });
        }
        assert!(form.set_branch_logo(1, "b.png"));
        assert!(form.set_branch_logo(2, "c.png"));

        assert!(form.remove_branch(1));
        assert_eq!(form.draft().branches[1].name, "C");
        // the logo that belonged to C followed it down to position 1,
        // and B's logo went away with B
        assert_eq!(form.branch_logo(1), Some(&"c.png"));
        assert_eq!(form.branch_logo(0), None);
        assert_eq!(form.attachments().len(), 1);

        let submission = form.assemble().expect("assemble");
        assert_eq!(submission.attachments.len(), 1);
        assert_eq!(
            submission.attachments[0].slot,
            AttachmentSlot::Branch {
                position: 1
            }
        );
    }

    #[test]
    fn removing_a_missing_branch_is_a_no_op() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.add_branch(&plans).expect("branch");
        let before = form.draft().clone();
        assert!(!form.remove_branch(4));
        assert_eq!(form.draft(), &before);
        assert!(!form.set_branch_logo(3, "x.png"));
    }

    #[test]
    fn branch_ids_are_not_reused() {
        let plans = catalog();
        let mut form = form_with_plan("ent");
        let first = form.add_branch(&plans).expect("branch");
        assert!(form.remove_branch_by_id(first));
        let second = form.add_branch(&plans).expect("branch");
        assert_ne!(first, second);
        assert!(!form.set_branch_logo_by_id(first, "stale.png"));
        assert!(form.set_branch_logo_by_id(second, "fresh.png"));
    }

    #[test]
    fn payload_carries_no_logo_keys() {
        let plans = catalog();
        let mut form = form_with_plan("ent");
        form.add_branch(&plans).expect("branch");
        form.add_branch(&plans).expect("branch");
        form.set_main_logo("main.png");
        form.set_branch_logo(0, "b0.png");

        let submission = form.assemble().expect("assemble");
        let data: serde_json::Value = serde_json::from_str(&submission.data).expect("data is JSON");
        let main = data["mainBranch"].as_object().expect("mainBranch object");
        assert!(!main.contains_key("logo") && !main.contains_key("branchLogo"));
        for branch in data["branches"].as_array().expect("branches array") {
            let branch = branch.as_object().expect("branch object");
            assert!(!branch.contains_key("logo") && !branch.contains_key("branchLogo"));
        }
        assert!(!submission.data.contains("png"));
    }

    #[test]
    fn parts_follow_main_then_ascending_branch_order() {
        let plans = catalog();
        let mut form = form_with_plan("ent");
        form.add_branch(&plans).expect("branch");
        form.add_branch(&plans).expect("branch");
        // set in reverse order; send order must not depend on it
        form.set_branch_logo(1, "b1.png");
        form.set_branch_logo(0, "b0.png");
        form.set_main_logo("main.png");

        let submission = form.assemble().expect("assemble");
        let parts: Vec<(&str, &str)> = submission
            .file_parts()
            .map(|(field, file)| (field, *file))
            .collect();
        assert_eq!(
            parts,
            vec![
                (MAIN_BRANCH_LOGO_FIELD, "main.png"),
                (BRANCH_LOGOS_FIELD, "b0.png"),
                (BRANCH_LOGOS_FIELD, "b1.png"),
            ]
        );
    }

    #[test]
    fn assembling_leaves_the_form_untouched() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.apply(FieldUpdate::BillingCycle(BillingCycle::Yearly));
        form.add_branch(&plans).expect("branch");
        form.set_main_logo("main.png");
        let draft_before = form.draft().clone();
        let _ = form.assemble().expect("assemble");
        assert_eq!(form.draft(), &draft_before);
        assert_eq!(form.attachments().main(), Some(&"main.png"));
    }

    #[test]
    fn load_enforces_capacity_and_keeps_previous_state_on_error() {
        let plans = catalog();
        let mut form: OrganizationForm<&str> = OrganizationForm::new();
        form.set_main_logo("main.png");

        let mut draft = DraftOrganization::default();
        draft.gym_name = "Flex".to_string();
        draft.subscription.plan_id = "pro".to_string();
        draft.branches = vec![BranchDraft::default(); 3];
        assert!(matches!(form.load(draft.clone(), &plans), Err(FormError::BranchLimitReached { .. })));
        assert_eq!(form.draft(), &DraftOrganization::default());
        assert_eq!(form.attachments().main(), Some(&"main.png"));

        draft.branches.truncate(2);
        draft.branches[1].floor_count = 0;
        form.load(draft, &plans).expect("fits the plan");
        assert_eq!(form.draft().gym_name, "Flex");
        assert_eq!(form.branch_ids().len(), 2);
        assert_eq!(form.draft().branches[1].floor_count, 1);
        assert_eq!(form.attachments().main(), Some(&"main.png"));
    }

    #[test]
    fn reset_returns_to_the_empty_draft() {
        let plans = catalog();
        let mut form = form_with_plan("pro");
        form.add_branch(&plans).expect("branch");
        form.set_main_logo("main.png");
        form.set_branch_logo(0, "b0.png");
        form.reset();
        assert_eq!(form.draft(), &DraftOrganization::default());
        assert!(form.attachments().is_empty());
        assert!(form.branch_ids().is_empty());
    }
}
