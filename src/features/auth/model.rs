use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::CATALOG_MANAGER_ROLES;

/// Caller identity extracted from a verified access token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    pub sub: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    /// Check if user has a specific role
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r.eq_ignore_ascii_case(role))
    }

    pub fn has_any_role(&self, roles: &[&str]) -> bool {
        roles.iter().any(|role| self.has_role(role))
    }

    /// Admins and product managers may edit the category tree
    pub fn can_manage_catalog(&self) -> bool {
        self.has_any_role(CATALOG_MANAGER_ROLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::constants::{ROLE_ADMIN, ROLE_PRODUCT_MANAGER};

    fn user(roles: &[&str]) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: "user-1".to_string(),
            email: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
        }
    }

    #[test]
    fn test_catalog_access() {
        assert!(user(&[ROLE_ADMIN]).can_manage_catalog());
        assert!(user(&[ROLE_PRODUCT_MANAGER]).can_manage_catalog());
        assert!(user(&["SELLER", ROLE_PRODUCT_MANAGER]).can_manage_catalog());
        assert!(!user(&["SELLER"]).can_manage_catalog());
        assert!(!user(&[]).can_manage_catalog());
    }

    #[test]
    fn test_role_match_is_case_insensitive() {
        assert!(user(&["admin"]).has_role(ROLE_ADMIN));
        assert!(user(&["product_manager"]).can_manage_catalog());
        assert!(!user(&["product_manager"]).has_role(ROLE_ADMIN));
    }
}
