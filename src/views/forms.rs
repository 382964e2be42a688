//! Client-side form checks. Each check runs before any request is built, so
//! a failing form never reaches the network.

use std::str::FromStr;

use rust_decimal::Decimal;
use time::Date;

use crate::error::{ClientError, ClientResult};
use crate::models::timestamp::parse_date;
use crate::models::{
    CreateProject, CreateTask, ProjectCategory, RegisterRequest, ReviewSubmission,
    SubmissionStatus, TaskStatus, UpdateProject, UpdateTask, UserRole,
};

fn invalid<T>(message: &str) -> ClientResult<T> {
    Err(ClientError::Validation(message.to_string()))
}

fn required(value: &str, message: &str) -> ClientResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return invalid(message);
    }
    Ok(trimmed.to_string())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Optional `YYYY-MM-DD` deadline; blank means none
fn deadline(value: &Option<String>) -> ClientResult<Option<Date>> {
    non_blank(value)
        .map(|raw| {
            parse_date(&raw).map_err(|_| {
                ClientError::Validation("Deadline must be a date like 2025-01-31".to_string())
            })
        })
        .transpose()
}

// ============ Uploads ============

/// Only `.zip` archives may be submitted for a task
pub fn ensure_zip(file_name: &str) -> ClientResult<()> {
    if file_name.to_ascii_lowercase().ends_with(".zip") && file_name.len() > ".zip".len() {
        Ok(())
    } else {
        invalid("Please upload a ZIP file")
    }
}

// ============ Reviews ============

/// A non-blank reason, required to reject a submission or a payment request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionReason(String);

impl RejectionReason {
    pub fn new(raw: &str) -> ClientResult<Self> {
        required(raw, "Please provide a rejection reason").map(Self)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RejectionReason {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Buyer decision on a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionReview {
    Accept,
    Reject(RejectionReason),
}

impl SubmissionReview {
    /// Build a review from the chosen status and the reason field.
    /// The reason is ignored on accept and required on reject.
    pub fn new(status: SubmissionStatus, reason: Option<&str>) -> ClientResult<Self> {
        match status {
            SubmissionStatus::Accepted => Ok(Self::Accept),
            SubmissionStatus::Rejected => {
                RejectionReason::new(reason.unwrap_or_default()).map(Self::Reject)
            }
            SubmissionStatus::Pending => invalid("Choose accept or reject"),
        }
    }

    pub fn status(&self) -> SubmissionStatus {
        match self {
            Self::Accept => SubmissionStatus::Accepted,
            Self::Reject(_) => SubmissionStatus::Rejected,
        }
    }

    pub fn to_request(&self) -> ReviewSubmission {
        ReviewSubmission {
            status: self.status(),
            rejection_reason: match self {
                Self::Accept => None,
                Self::Reject(reason) => Some(reason.as_str().to_string()),
            },
        }
    }
}

// ============ Accounts ============

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub password_confirm: String,
    pub role: UserRole,
}

impl RegisterForm {
    pub fn validate(&self) -> ClientResult<RegisterRequest> {
        let email = required(&self.email, "Email is required")?;
        if !email.contains('@') {
            return invalid("Enter a valid email address");
        }
        let full_name = required(&self.full_name, "Full name is required")?;
        if self.password.is_empty() {
            return invalid("Password is required");
        }
        if self.password != self.password_confirm {
            return invalid("Passwords do not match");
        }
        if self.role == UserRole::Admin {
            return invalid("Choose buyer or problem solver");
        }

        Ok(RegisterRequest {
            email,
            full_name,
            password: self.password.clone(),
            role: self.role,
        })
    }
}

// ============ Projects ============

fn parse_budget(raw: &str) -> ClientResult<Decimal> {
    let budget: Decimal = raw
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| ClientError::Validation("Budget must be a number".to_string()))?;
    if budget <= Decimal::ZERO {
        return invalid("Budget must be greater than zero");
    }
    Ok(budget)
}

/// New project form; budget is kept as typed text until validated
#[derive(Debug, Clone, Default)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    pub budget: String,
    pub category: ProjectCategory,
}

impl ProjectForm {
    pub fn validate(&self) -> ClientResult<CreateProject> {
        Ok(CreateProject {
            title: required(&self.title, "Title is required")?,
            description: required(&self.description, "Description is required")?,
            budget: parse_budget(&self.budget)?,
            category: self.category,
        })
    }
}

/// Edit form on the manage screen; blank fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct ProjectEditForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub budget: Option<String>,
    pub category: Option<ProjectCategory>,
}

impl ProjectEditForm {
    pub fn validate(&self) -> ClientResult<UpdateProject> {
        let update = UpdateProject {
            title: non_blank(&self.title),
            description: non_blank(&self.description),
            budget: non_blank(&self.budget).map(|b| parse_budget(&b)).transpose()?,
            category: self.category,
        };
        if update.is_empty() {
            return invalid("Nothing to update");
        }
        Ok(update)
    }
}

// ============ Tasks ============

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// `YYYY-MM-DD`, optional
    pub deadline: Option<String>,
}

impl TaskForm {
    pub fn validate(&self) -> ClientResult<CreateTask> {
        Ok(CreateTask {
            title: required(&self.title, "Title is required")?,
            description: required(&self.description, "Description is required")?,
            deadline: deadline(&self.deadline)?,
        })
    }
}

/// Task edit; blank fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct TaskEditForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deadline: Option<String>,
    pub status: Option<TaskStatus>,
}

impl TaskEditForm {
    pub fn validate(&self) -> ClientResult<UpdateTask> {
        let update = UpdateTask {
            title: non_blank(&self.title),
            description: non_blank(&self.description),
            deadline: deadline(&self.deadline)?,
            status: self.status,
        };
        if update.title.is_none()
            && update.description.is_none()
            && update.deadline.is_none()
            && update.status.is_none()
        {
            return invalid("Nothing to update");
        }
        Ok(update)
    }
}
