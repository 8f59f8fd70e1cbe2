//! Handlers for user endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::{ListResponse, PaginationParams, pagination_rejection};
use crate::api::dto::user::{
    CreateUserRequest, SyncCompaniesRequest, UpdateUserRequest, UserResource,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists live users with their companies.
///
/// # Endpoint
///
/// `GET /api/v1/users`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: `PAGE_SIZE`, max: 100)
///
/// # Errors
///
/// Returns 422 if pagination parameters are malformed or out of range.
pub async fn list_users_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ListResponse<UserResource>>, AppError> {
    let Query(params) = params.map_err(pagination_rejection)?;
    let page = params
        .resolve(state.page_size)
        .map_err(|e| AppError::validation(e, json!({})))?;
    let (offset, limit) = page.offset_limit();

    let (users, total_items) = state.user_service.list_users(offset, limit).await?;

    Ok(Json(ListResponse {
        pagination: page.meta(total_items),
        items: users.into_iter().map(UserResource::from).collect(),
    }))
}

/// Creates a user.
///
/// # Endpoint
///
/// `POST /api/v1/users`
///
/// # Request Body
///
/// ```json
/// { "name": "Ada", "companies": [1, 2] }
/// ```
///
/// `companies` is optional. When present the new user's memberships are set
/// to exactly this list and echoed back in the response.
///
/// # Errors
///
/// Returns 422 if the name is missing or blank, or a company does not exist.
pub async fn create_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResource>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let name = payload.name.unwrap_or_default().trim().to_string();
    let user = state
        .user_service
        .create_user(name, payload.companies)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Returns a live user with its companies.
///
/// # Endpoint
///
/// `GET /api/v1/users/{id}`
///
/// # Errors
///
/// Returns 404 if the user does not exist, is deleted, or `id` is not an integer.
pub async fn show_user_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<UserResource>, AppError> {
    let Path(id) = id?;
    let user = state.user_service.get_user(id).await?;
    Ok(Json(user.into()))
}

/// Updates a user.
///
/// # Endpoint
///
/// `PUT /api/v1/users/{id}` or `PATCH /api/v1/users/{id}`
///
/// Both verbs merge the provided fields. `companies`, when present, replaces
/// the membership set; when absent, memberships are left unchanged.
///
/// # Errors
///
/// Returns 422 if the body is malformed or a provided field is invalid.
/// Returns 404 if the user does not exist, is deleted, or `id` is not an integer.
pub async fn update_user_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResource>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let Path(id) = id?;

    let user = state
        .user_service
        .update_user(id, payload.into_patch())
        .await?;

    Ok(Json(user.into()))
}

/// Soft-deletes a user.
///
/// # Endpoint
///
/// `DELETE /api/v1/users/{id}`
///
/// Responds with the user as it was before deletion, without companies.
/// Membership rows are kept.
///
/// # Errors
///
/// Returns 404 if the user does not exist or is already deleted.
pub async fn delete_user_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<UserResource>, AppError> {
    let Path(id) = id?;
    let user = state.user_service.delete_user(id).await?;
    Ok(Json(user.into()))
}

/// Replaces the user's companies.
///
/// # Endpoint
///
/// `PUT /api/v1/users/{id}/companies`
///
/// # Request Body
///
/// ```json
/// { "companies": [1, 3] }
/// ```
///
/// An empty list removes every membership of the user.
///
/// # Errors
///
/// Returns 422 if `companies` is missing or references an unknown company.
/// Returns 404 if the user does not exist, is deleted, or `id` is not an integer.
pub async fn sync_user_companies_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<SyncCompaniesRequest>, JsonRejection>,
) -> Result<Json<UserResource>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let Path(id) = id?;

    let company_ids = payload.companies.unwrap_or_default();
    let user = state.user_service.sync_companies(id, company_ids).await?;

    Ok(Json(user.into()))
}
