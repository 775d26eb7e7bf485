//! Demo credential check.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Role;

/// Signed-in console user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: Uuid,
    pub username: String,
    pub role: Role,
    pub signed_in_at: DateTime<Utc>,
}

/// Demo credentials: `admin/admin` and `user/user`.
const CREDENTIALS: [(&str, &str, Role); 2] = [
    ("admin", "admin", Role::Admin),
    ("user", "user", Role::User),
];

/// Check a credential pair; returns the new session on success.
pub fn login(username: &str, password: &str, now: DateTime<Utc>) -> Option<Session> {
    CREDENTIALS
        .iter()
        .find(|(u, p, _)| *u == username && *p == password)
        .map(|(u, _, role)| Session {
            session_id: Uuid::now_v7(),
            username: (*u).to_string(),
            role: *role,
            signed_in_at: now,
        })
}
