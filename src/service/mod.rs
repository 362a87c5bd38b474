//! Complaint lifecycle service
//!
//! - **lifecycle**: Allowed status transitions
//! - **complaints**: `ComplaintService`, every lifecycle operation with its
//!   permission checks, timeline entries and notifications
//! - **notifier**: Notice delivery
//! - **escalation**: Periodic SLA sweep

pub mod complaints;
pub mod escalation;
pub mod lifecycle;
pub mod notifier;

pub use complaints::{ComplaintService, ServiceConfig, Upload};
pub use escalation::EscalationScheduler;
pub use lifecycle::{next_status, Action};
pub use notifier::{Notice, Notifier, StoreNotifier};

use crate::store::{Status, StoreError};
use thiserror::Error;

/// Errors from lifecycle operations
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("Cannot {action} a complaint that is {from}")]
    InvalidTransition { from: Status, action: Action },

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
