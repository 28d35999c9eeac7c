use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::{AppJson, AppPath, AppQuery};
use crate::features::auth::guards::RequireCatalogManager;
use crate::features::categories::dtos::{
    CategoryDetailDto, CategoryListDto, CategoryResponseDto, CreateCategoryDto,
    ListCategoriesQuery, UpdateCategoryDto,
};
use crate::features::categories::services::CategoryService;
use crate::shared::types::ApiResponse;

/// Create a category (admin or product manager)
#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CreateCategoryDto,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error or unknown parent"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Forbidden - admin or product manager only"),
        (status = 409, description = "Slug already in use")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_category(
    RequireCatalogManager(user): RequireCatalogManager,
    State(service): State<Arc<CategoryService>>,
    AppJson(dto): AppJson<CreateCategoryDto>,
) -> Result<(StatusCode, Json<ApiResponse<CategoryResponseDto>>)> {
    tracing::debug!(sub = %user.sub, slug = %dto.slug, "Create category requested");
    let category = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(category)),
    ))
}

/// List all categories
///
/// Returns a flat list (each entry with its parent) or the nested tree,
/// depending on the `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "Flat list or nested tree of categories", body = ApiResponse<CategoryListDto>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    AppQuery(query): AppQuery<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListDto>>> {
    let list = if query.wants_tree() {
        CategoryListDto::Tree(service.list_tree().await?)
    } else {
        CategoryListDto::Flat(service.list().await?)
    };
    let total = list.total();

    Ok(Json(ApiResponse::listing(list, total)))
}

/// Get a category with its parent and direct children
#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryDetailDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<CategoryDetailDto>>> {
    let category = service.find_one(id).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// Partially update a category (admin or product manager)
#[utoipa::path(
    patch,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    request_body = UpdateCategoryDto,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<CategoryResponseDto>),
        (status = 400, description = "Validation error or unknown parent"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Forbidden - admin or product manager only"),
        (status = 404, description = "Category not found"),
        (status = 409, description = "Slug already in use"),
        (status = 422, description = "Re-parenting would create a cycle")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_category(
    RequireCatalogManager(_user): RequireCatalogManager,
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
    AppJson(dto): AppJson<UpdateCategoryDto>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.update(id, dto).await?;
    Ok(Json(ApiResponse::ok(category)))
}

/// Delete a category (admin or product manager)
///
/// Child categories are kept and still reference the deleted id.
#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = Uuid, Path, description = "Category ID")
    ),
    responses(
        (status = 200, description = "Category deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Forbidden - admin or product manager only"),
        (status = 404, description = "Category not found")
    ),
    tag = "categories",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_category(
    RequireCatalogManager(_user): RequireCatalogManager,
    State(service): State<Arc<CategoryService>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.delete(id).await?;
    Ok(Json(ApiResponse::message("Category deleted")))
}
