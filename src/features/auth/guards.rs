//! Role-based authorization guards.
//!
//! Guards run after `auth_middleware` has placed an [`AuthenticatedUser`] in the
//! request extensions. A missing user is a 401; a user without a permitted role
//! is a 403.

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;
use axum::{extract::FromRequestParts, http::request::Parts};

/// Guard for catalog write operations.
///
/// Allows users holding the "ADMIN" or "PRODUCT_MANAGER" role.
///
/// # Example
/// ```ignore
/// pub async fn handler(RequireCatalogManager(user): RequireCatalogManager) { ... }
/// ```
pub struct RequireCatalogManager(pub AuthenticatedUser);

impl<S> FromRequestParts<S> for RequireCatalogManager
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.can_manage_catalog() {
            tracing::warn!(sub = %user.sub, roles = ?user.roles, "Catalog write denied");
            return Err(AppError::Forbidden(
                "Admin or product manager role required".to_string(),
            ));
        }

        Ok(RequireCatalogManager(user))
    }
}
