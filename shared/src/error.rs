//! Error types for form handling and for the admin API.

use thiserror::Error;

/// Message shown when an organization could not be created for reasons the
/// admin cannot fix by editing the form.
pub const GENERIC_CREATE_FAILURE: &str = "Failed to create organization, please try again";

/// Local form failures. None of these involve the network except
/// [`FormError::Submission`], which wraps the remote outcome.
#[derive(Debug, Error)]
pub enum FormError {
    /// A branch was added before a plan was chosen.
    #[error("Please select a plan first")]
    NoPlanSelected,

    /// The selected plan has no room for another branch.
    #[error("You have reached the maximum number of branches allowed for this plan")]
    BranchLimitReached {
        /// Additional branches the selected plan allows.
        max_additional: usize,
    },

    /// A dotted field path that names nothing in the draft.
    #[error("unknown form field: {0}")]
    UnknownField(String),

    /// A raw value that does not convert to the field's type.
    #[error("invalid value for {field}: {value}")]
    InvalidValue {
        /// Dotted path or wire name of the field.
        field: String,
        /// The rejected input.
        value: String,
    },

    /// A request is already outstanding.
    #[error("a submission is already in progress")]
    SubmissionInFlight,

    /// Submit was called on a closed dialog.
    #[error("the creation dialog is not open")]
    DialogClosed,

    /// The draft could not be turned into JSON.
    #[error("failed to serialize draft: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The server or the network refused the submission.
    #[error("{}", .0.user_message())]
    Submission(#[from] ApiError),
}

impl FormError {
    /// Text suitable for a toast or banner.
    pub fn user_message(&self) -> String {
        match self {
            FormError::Submission(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}

/// Failures reported by the remote admin API or the transport underneath it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The server answered and refused the request. `message` is the server's
    /// own wording.
    #[error("request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status.
        status: u16,
        /// Server's message.
        message: String,
    },

    /// 401 caused by a missing, invalid or revoked token.
    #[error("session expired: {0}")]
    SessionExpired(String),

    /// The request never got an answer.
    #[error("network error: {0}")]
    Transport(String),

    /// A 2xx answer that did not parse.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Text suitable for a toast or banner.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected {
                message, ..
            } => message.clone(),
            ApiError::SessionExpired(_) => "Your session has expired, please log in again".to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_CREATE_FAILURE.to_string(),
        }
    }

    /// Whether the user has to sign in again.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_surfaces_server_message_verbatim() {
        let err = FormError::from(ApiError::Rejected {
            status: 400,
            message: "Contact email already registered".to_string(),
        });
        assert_eq!(err.user_message(), "Contact email already registered");
    }

    #[test]
    fn transport_failures_use_generic_message() {
        let err = FormError::from(ApiError::Transport("connection refused".to_string()));
        assert_eq!(err.user_message(), GENERIC_CREATE_FAILURE);
        assert_eq!(ApiError::Decode("eof".into()).user_message(), GENERIC_CREATE_FAILURE);
    }

    #[test]
    fn local_errors_render_their_display_text() {
        assert_eq!(FormError::NoPlanSelected.user_message(), "Please select a plan first");
        assert!(FormError::BranchLimitReached {
            max_additional: 2
        }
        .user_message()
        .contains("maximum number of branches"));
    }
}
