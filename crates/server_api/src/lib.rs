use std::{collections::HashMap, sync::Arc};

use mailer::Mailer;
use shared::{
    domain::{NewVolunteer, VolunteerId},
    error::{ApiError, ErrorCode, ValidationError},
};
use storage::VolunteerStore;
use thiserror::Error;
use tracing::{error, info};

mod notifications;

pub use notifications::{organization_notification, volunteer_confirmation};

#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn VolunteerStore>,
    pub mailer: Arc<dyn Mailer>,
    pub organization: Organization,
}

/// Identity used as sender and notification recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    Organization,
    Confirmation,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Success {
        volunteer_id: VolunteerId,
    },
    /// The record is stored but at least one email did not go out.
    PartialSuccess {
        volunteer_id: VolunteerId,
        failed: Vec<Notification>,
    },
}

impl Outcome {
    pub fn volunteer_id(&self) -> VolunteerId {
        match self {
            Outcome::Success { volunteer_id } | Outcome::PartialSuccess { volunteer_id, .. } => {
                *volunteer_id
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("failed to persist volunteer: {0:#}")]
    Persistence(anyhow::Error),
}

impl SubmissionError {
    pub fn to_api_error(&self) -> ApiError {
        match self {
            SubmissionError::Validation(err) => err.clone().into(),
            SubmissionError::Persistence(_) => ApiError::new(
                ErrorCode::Internal,
                "We could not save your submission right now. Please try again later.",
            ),
        }
    }
}

/// Validates, stores, then notifies. Nothing is written when validation fails
/// and no mail is sent when the write fails.
pub async fn submit_volunteer(
    ctx: &ApiContext,
    form: &HashMap<String, String>,
) -> Result<Outcome, SubmissionError> {
    let volunteer = NewVolunteer::from_form(form)?;

    let volunteer_id = ctx.store.insert_volunteer(&volunteer).await.map_err(|e| {
        error!(error = ?e, "failed to store volunteer submission");
        SubmissionError::Persistence(e)
    })?;
    info!(volunteer_id = volunteer_id.0, "volunteer submission stored");

    let mut failures = Vec::new();
    let messages = [
        (
            Notification::Organization,
            organization_notification(&ctx.organization, &volunteer),
        ),
        (
            Notification::Confirmation,
            volunteer_confirmation(&ctx.organization, &volunteer),
        ),
    ];
    for (notification, email) in messages {
        if let Err(error) = ctx.mailer.send(&email).await {
            failures.push((notification, error));
        }
    }

    if failures.is_empty() {
        return Ok(Outcome::Success { volunteer_id });
    }

    let errors = failures
        .iter()
        .map(|(notification, error)| format!("{notification:?}: {error}"))
        .collect::<Vec<_>>()
        .join("; ");
    let failed: Vec<Notification> = failures.into_iter().map(|(n, _)| n).collect();
    error!(
        volunteer_id = volunteer_id.0,
        ?failed,
        %errors,
        "error sending volunteer emails"
    );
    Ok(Outcome::PartialSuccess {
        volunteer_id,
        failed,
    })
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
