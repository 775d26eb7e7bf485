use thiserror::Error;

use crate::{Role, Session};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("not signed in")]
    Unauthenticated,

    #[error("forbidden for role '{0}'")]
    Forbidden(Role),
}

/// Route guard: the session must exist and carry one of `allowed`.
///
/// An empty `allowed` list admits any signed-in user.
pub fn authorize(session: Option<&Session>, allowed: &[Role]) -> Result<(), AuthzError> {
    let session = session.ok_or(AuthzError::Unauthenticated)?;
    if allowed.is_empty() || allowed.contains(&session.role) {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(session.role))
    }
}
