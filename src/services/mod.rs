//! Business services orchestrating repositories on behalf of the routes.
//!
//! Every service takes the authenticated user, checks the role it needs and
//! scopes all repository calls to the user's hub.

use chrono::NaiveDate;
use thiserror::Error;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::types::TypeConstraintError;
use crate::dto::NotifyOutcome;
use crate::export::ExportError;
use crate::forms::FormError;
use crate::models::auth::{AuthenticatedUser, check_role};
use crate::models::zmq::ZmqNotification;
use crate::notify::{Notifier, NotifyError};
use crate::repository::errors::RepositoryError;

pub mod api;
pub mod dashboard;
pub mod events;
pub mod owners;
pub mod personnel;
pub mod portal;
pub mod price_master;
pub mod properties;
pub mod quotes;
pub mod regions;
pub mod reports;
pub mod tickets;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User-facing validation message.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violated: {0}")]
    TypeConstraint(String),

    #[error("repository error: {0}")]
    Repository(RepositoryError),

    #[error("notification error: {0}")]
    Notification(#[from] NotifyError),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<TypeConstraintError> for ServiceError {
    fn from(val: TypeConstraintError) -> Self {
        ServiceError::TypeConstraint(val.to_string())
    }
}

impl From<RepositoryError> for ServiceError {
    fn from(val: RepositoryError) -> Self {
        match val {
            RepositoryError::NotFound => ServiceError::NotFound,
            other => ServiceError::Repository(other),
        }
    }
}

impl From<FormError> for ServiceError {
    fn from(val: FormError) -> Self {
        ServiceError::Form(val.to_string())
    }
}

impl From<ExportError> for ServiceError {
    fn from(val: ExportError) -> Self {
        ServiceError::Internal(val.to_string())
    }
}

/// Whether the user may use the service at all and also holds `role`.
pub fn has_role(user: &AuthenticatedUser, role: &str) -> bool {
    check_role(SERVICE_ACCESS_ROLE, &user.roles) && check_role(role, &user.roles)
}

/// Fails with [`ServiceError::Unauthorized`] unless [`has_role`] holds.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if has_role(user, role) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Publishes every message, logging failures instead of aborting.
pub(crate) fn deliver<N>(notifier: &N, messages: &[ZmqNotification]) -> NotifyOutcome
where
    N: Notifier + ?Sized,
{
    messages
        .iter()
        .fold(NotifyOutcome::default(), |mut outcome, message| {
            match notifier.notify(message) {
                Ok(()) => outcome.sent += 1,
                Err(err) => {
                    log::error!("Failed to notify {}: {err}", message.to);
                    outcome.failed += 1;
                }
            }
            outcome
        })
}

/// The given year and the two before it, newest first.
pub fn year_choices(current: i32) -> Vec<i32> {
    (current - 2..=current).rev().collect()
}

/// First and last day of `year`.
pub(crate) fn year_bounds(year: i32) -> ServiceResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, 1, 1);
    let last = NaiveDate::from_ymd_opt(year, 12, 31);
    first
        .zip(last)
        .ok_or_else(|| ServiceError::Form(format!("Unsupported year {year}")))
}
