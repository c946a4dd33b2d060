use thiserror::Error;

use crate::form::EditRejection;
use crate::submission::SubmitError;

/// Editor-level error type. Every variant maps to one message for the user.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid command: {0}")]
    Command(String),

    #[error("Edit rejected: {0}")]
    Edit(#[from] EditRejection),

    #[error("Submission failed: {0}")]
    Submit(#[from] SubmitError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Command(_) => "INVALID_COMMAND",
            AppError::Edit(EditRejection::IndexOutOfRange { .. }) => "INDEX_OUT_OF_RANGE",
            AppError::Edit(EditRejection::BelowMinimumCount { .. }) => "BELOW_MINIMUM_COUNT",
            AppError::Edit(EditRejection::UnknownCollection(_)) => "UNKNOWN_COLLECTION",
            AppError::Edit(EditRejection::UnknownField { .. }) => "UNKNOWN_FIELD",
            AppError::Edit(EditRejection::UnknownCategory(_)) => "UNKNOWN_CATEGORY",
            AppError::Submit(e) => e.code(),
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            AppError::Command(msg) => format!("{msg} (type 'help' for commands)"),
            AppError::Edit(EditRejection::BelowMinimumCount { what }) => {
                format!("Can't remove that: {what} needs at least one item.")
            }
            AppError::Edit(e) => format!("Can't apply that edit: {e}."),
            AppError::Submit(e) => e.user_message(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                "Something went wrong inside the editor.".to_string()
            }
        }
    }
}
