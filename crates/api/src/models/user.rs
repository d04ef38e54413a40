//! User entity and sanitized view.

use chrono::{DateTime, Utc};
use serde::Serialize;

use lotus_core::{AccountStatus, Email, UserId, UserRole};

/// A registered user.
///
/// The password hash lives only in the repository layer; it is never part
/// of this struct, so it cannot accidentally reach a response body.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub role: UserRole,
    pub status: AccountStatus,
    pub created_at: DateTime<Utc>,
}

/// User as served to clients (login response, admin user list).
#[derive(Debug, Clone, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub phone: String,
    pub role: UserRole,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            role: user.role,
        }
    }
}
