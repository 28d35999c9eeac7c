use std::sync::Arc;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, patch, post},
    Router,
};

use crate::core::middleware::auth_middleware;
use crate::features::auth::JwtValidator;
use crate::features::categories::handlers;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
///
/// Reads are public. Writes go through `auth_middleware` and the handlers
/// additionally require the admin or product manager role.
pub fn routes(service: Arc<CategoryService>, validator: Arc<JwtValidator>) -> Router {
    let auth = from_fn_with_state(validator, auth_middleware);

    Router::new()
        .route(
            "/api/categories",
            get(handlers::list_categories)
                .merge(post(handlers::create_category).route_layer(auth.clone())),
        )
        .route(
            "/api/categories/{id}",
            get(handlers::get_category).merge(
                patch(handlers::update_category)
                    .delete(handlers::delete_category)
                    .route_layer(auth),
            ),
        )
        .with_state(service)
}
