//! Multipart layout of `POST /organizations`.
//!
//! The receiving side binds repeated `branchLogos` parts to branches by
//! arrival order, so parts are emitted in ascending branch position.

use crate::{
    attachments::{AttachmentTracker, BranchId},
    draft::DraftOrganization,
    error::FormError,
};

/// Text part holding the serialized draft.
pub const DATA_FIELD: &str = "data";
/// File part for the main branch logo.
pub const MAIN_BRANCH_LOGO_FIELD: &str = "mainBranchLogo";
/// Repeated file part, one per additional branch that has a logo.
pub const BRANCH_LOGOS_FIELD: &str = "branchLogos";

/// Which slot a part came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentSlot {
    /// The main branch.
    MainBranch,
    /// An additional branch.
    Branch {
        /// Index in the submitted `branches` array.
        position: usize,
    },
}

/// One file part of the submission.
#[derive(Debug, Clone, PartialEq)]
pub struct AttachmentPart<F> {
    /// Slot the file was attached to.
    pub slot: AttachmentSlot,
    /// The file itself.
    pub file: F,
}

impl<F> AttachmentPart<F> {
    /// Multipart field name for the slot.
    pub fn field_name(&self) -> &'static str {
        match self.slot {
            AttachmentSlot::MainBranch => MAIN_BRANCH_LOGO_FIELD,
            AttachmentSlot::Branch {
                ..
            } => BRANCH_LOGOS_FIELD,
        }
    }
}

/// Transport-neutral multipart body: one JSON text part plus ordered file
/// parts.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationSubmission<F> {
    /// JSON text of the draft.
    pub data: String,
    /// File parts in send order.
    pub attachments: Vec<AttachmentPart<F>>,
}

impl<F> OrganizationSubmission<F> {
    /// `(field name, file)` pairs in send order.
    pub fn file_parts(&self) -> impl Iterator<Item = (&'static str, &F)> + '_ {
        self.attachments
            .iter()
            .map(|part| (part.field_name(), &part.file))
    }
}

pub(crate) fn assemble<F: Clone>(
    draft: &DraftOrganization,
    branch_ids: &[BranchId],
    attachments: &AttachmentTracker<F>,
) -> Result<OrganizationSubmission<F>, FormError> {
    let data = serde_json::to_string(draft)?;

    let mut parts = Vec::with_capacity(attachments.len());
    if let Some(file) = attachments.main() {
        parts.push(AttachmentPart {
            slot: AttachmentSlot::MainBranch,
            file: file.clone(),
        });
    }
    for (position, id) in branch_ids.iter().enumerate() {
        if let Some(file) = attachments.branch(*id) {
            parts.push(AttachmentPart {
                slot: AttachmentSlot::Branch {
                    position,
                },
                file: file.clone(),
            });
        }
    }

    Ok(OrganizationSubmission {
        data,
        attachments: parts,
    })
}
