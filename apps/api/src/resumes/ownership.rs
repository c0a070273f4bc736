use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Owner, Resume, Role};

/// Who is acting on a resume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Caller {
    Account { id: Uuid, role: Role },
    Guest,
}

/// Why an access was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Owner,
    /// The resume is unclaimed and the caller is an account, which may claim it.
    Claimable(Uuid),
    /// The resume is unclaimed and the caller is a guest.
    GuestDraft,
    Admin,
}

impl Caller {
    pub fn account_id(&self) -> Option<Uuid> {
        match self {
            Caller::Account { id, .. } => Some(*id),
            Caller::Guest => None,
        }
    }
}

/// Checks that `caller` may act on `resume`.
pub fn authorize(resume: &Resume, caller: &Caller) -> Result<Access, AppError> {
    match (resume.owner, caller) {
        (Owner::Owned(owner), Caller::Account { id, .. }) if owner == *id => Ok(Access::Owner),
        (Owner::Unclaimed, Caller::Account { id, .. }) => Ok(Access::Claimable(*id)),
        (Owner::Unclaimed, Caller::Guest) => Ok(Access::GuestDraft),
        (Owner::Owned(_), Caller::Account { role: Role::Admin, .. }) => Ok(Access::Admin),
        _ => Err(AppError::Unauthorized(
            "You do not have access to this resume".to_string(),
        )),
    }
}
