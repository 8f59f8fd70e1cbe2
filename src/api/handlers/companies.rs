//! Handlers for company endpoints.

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
use crate::api::dto::company::{
    CompanyResource, CreateCompanyRequest, SyncUsersRequest, UpdateCompanyRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists live companies with their users.
///
/// # Endpoint
///
/// `GET /api/v1/companies`
///
/// # Query Parameters
///
/// - `page` (optional): Page number (default: 1)
/// - `page_size` (optional): Items per page (default: `PAGE_SIZE`, max: 100)
///
/// # Errors
///
/// Returns 422 if pagination parameters are malformed or out of range.
pub async fn list_companies_handler(
    State(state): State<AppState>,
    params: Result<Query<PaginationParams>, QueryRejection>,
) -> Result<Json<ListResponse<CompanyResource>>, AppError> {
    let Query(params) = params.map_err(pagination_rejection)?;
    let page = params
        .resolve(state.page_size)
        .map_err(|e| AppError::validation(e, json!({})))?;
    let (offset, limit) = page.offset_limit();

    let (companies, total_items) = state.company_service.list_companies(offset, limit).await?;

    Ok(Json(ListResponse {
        pagination: page.meta(total_items),
        items: companies.into_iter().map(CompanyResource::from).collect(),
    }))
}

/// Creates a company.
///
/// # Endpoint
///
/// `POST /api/v1/companies`
///
/// # Request Body
///
/// ```json
/// { "name": "Acme", "users": [7, 8] }
/// ```
///
/// `users` is optional. When present the new company's memberships are set
/// to exactly this list and echoed back in the response.
///
/// # Errors
///
/// Returns 422 if the name is missing or blank, or a user does not exist.
pub async fn create_company_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CompanyResource>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let name = payload.name.unwrap_or_default().trim().to_string();
    let company = state
        .company_service
        .create_company(name, payload.users)
        .await?;

    Ok((StatusCode::CREATED, Json(company.into())))
}

/// Returns a live company with its users.
///
/// # Endpoint
///
/// `GET /api/v1/companies/{id}`
///
/// # Errors
///
/// Returns 404 if the company does not exist, is deleted, or `id` is not an integer.
pub async fn show_company_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<CompanyResource>, AppError> {
    let Path(id) = id?;
    let company = state.company_service.get_company(id).await?;
    Ok(Json(company.into()))
}

/// Updates a company.
///
/// # Endpoint
///
/// `PUT /api/v1/companies/{id}` or `PATCH /api/v1/companies/{id}`
///
/// Both verbs merge the provided fields. `users`, when present, replaces
/// the membership set; when absent, memberships are left unchanged.
///
/// # Errors
///
/// Returns 422 if the body is malformed or a provided field is invalid.
/// Returns 404 if the company does not exist, is deleted, or `id` is not an integer.
pub async fn update_company_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<UpdateCompanyRequest>, JsonRejection>,
) -> Result<Json<CompanyResource>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let Path(id) = id?;

    let company = state
        .company_service
        .update_company(id, payload.into_patch())
        .await?;

    Ok(Json(company.into()))
}

/// Soft-deletes a company.
///
/// # Endpoint
///
/// `DELETE /api/v1/companies/{id}`
///
/// Responds with the company as it was before deletion, without users.
/// Membership rows are kept.
///
/// # Errors
///
/// Returns 404 if the company does not exist or is already deleted.
pub async fn delete_company_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<CompanyResource>, AppError> {
    let Path(id) = id?;
    let company = state.company_service.delete_company(id).await?;
    Ok(Json(company.into()))
}

/// Replaces the company's users.
///
/// # Endpoint
///
/// `PUT /api/v1/companies/{id}/users`
///
/// # Request Body
///
/// ```json
/// { "users": [7, 8] }
/// ```
///
/// An empty list removes every membership of the company.
///
/// # Errors
///
/// Returns 422 if `users` is missing or references an unknown user.
/// Returns 404 if the company does not exist, is deleted, or `id` is not an integer.
pub async fn sync_company_users_handler(
    id: Result<Path<i64>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<SyncUsersRequest>, JsonRejection>,
) -> Result<Json<CompanyResource>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;
    let Path(id) = id?;

    let user_ids = payload.users.unwrap_or_default();
    let company = state.company_service.sync_users(id, user_ids).await?;

    Ok(Json(company.into()))
}
