use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Permission keys checked by the portal and the admin routes.
pub mod permissions {
    pub const APPOINTMENTS_CREATE: &str = "appointments.create";
    pub const APPOINTMENTS_VIEW: &str = "appointments.view";
    pub const CLIENTS_VIEW: &str = "clients.view";
}

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub role: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    pub company_id: Option<i64>,
}

/// Authentication state handed to handlers explicitly instead of living in
/// a global. Holds the bearer token forwarded to the backend and the user it
/// resolved to.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
    token: Option<String>,
    user: Option<User>,
    granted: HashSet<String>,
}

impl AuthContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    pub fn authenticated(token: impl Into<String>, user: User) -> Self {
        let granted = user.permissions.iter().cloned().collect();
        Self {
            token: Some(token.into()),
            user: Some(user),
            granted,
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .and_then(|u| u.role.as_deref())
            .map(|role| role.eq_ignore_ascii_case(ADMIN_ROLE))
            .unwrap_or(false)
    }

    /// Admins hold every permission.
    pub fn has_permission(&self, key: &str) -> bool {
        self.is_authenticated() && (self.is_admin() || self.granted.contains(key))
    }

    /// Drops the token and user, e.g. after the backend answered 401.
    pub fn clear(&mut self) {
        self.token = None;
        self.user = None;
        self.granted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, permissions: &[&str]) -> User {
        User {
            id: 1,
            name: "Carlos".to_string(),
            email: Some("carlos@example.com".to_string()),
            role: Some(role.to_string()),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            company_id: Some(10),
        }
    }

    #[test]
    fn test_permission_lookup() {
        let ctx = AuthContext::authenticated("token", user("barber", &[permissions::APPOINTMENTS_VIEW]));
        assert!(ctx.has_permission(permissions::APPOINTMENTS_VIEW));
        assert!(!ctx.has_permission(permissions::APPOINTMENTS_CREATE));
    }

    #[test]
    fn test_admin_has_every_permission() {
        let ctx = AuthContext::authenticated("token", user("ADMIN", &[]));
        assert!(ctx.has_permission(permissions::APPOINTMENTS_CREATE));
        assert!(ctx.has_permission(permissions::CLIENTS_VIEW));
    }

    #[test]
    fn test_clear_revokes_everything() {
        let mut ctx = AuthContext::authenticated("token", user("admin", &[]));
        ctx.clear();
        assert!(ctx.token().is_none());
        assert!(!ctx.is_authenticated());
        assert!(!ctx.has_permission(permissions::APPOINTMENTS_CREATE));
    }

    #[test]
    fn test_anonymous_context() {
        let ctx = AuthContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert!(!ctx.has_permission(permissions::APPOINTMENTS_VIEW));
    }
}
