//! API route configuration.

use crate::api::handlers::{
    create_company_handler, create_user_handler, delete_company_handler, delete_user_handler,
    list_companies_handler, list_users_handler, show_company_handler, show_user_handler,
    sync_company_users_handler, sync_user_companies_handler, update_company_handler,
    update_user_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, put},
};

/// Version 1 of the REST API, mounted under `/api/v1`.
///
/// # Endpoints
///
/// - `GET    /users`                  - List users (paginated)
/// - `POST   /users`                  - Create a user
/// - `GET    /users/{id}`             - Show a user with its companies
/// - `PUT    /users/{id}`             - Update a user
/// - `PATCH  /users/{id}`             - Update a user
/// - `DELETE /users/{id}`             - Soft-delete a user
/// - `PUT    /users/{id}/companies`   - Replace the user's companies
/// - `GET    /companies`              - List companies (paginated)
/// - `POST   /companies`              - Create a company
/// - `GET    /companies/{id}`         - Show a company with its users
/// - `PUT    /companies/{id}`         - Update a company
/// - `PATCH  /companies/{id}`         - Update a company
/// - `DELETE /companies/{id}`         - Soft-delete a company
/// - `PUT    /companies/{id}/users`   - Replace the company's users
pub fn v1_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users_handler).post(create_user_handler))
        .route(
            "/users/{id}",
            get(show_user_handler)
                .put(update_user_handler)
                .patch(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/users/{id}/companies", put(sync_user_companies_handler))
        .route(
            "/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route(
            "/companies/{id}",
            get(show_company_handler)
                .put(update_company_handler)
                .patch(update_company_handler)
                .delete(delete_company_handler),
        )
        .route("/companies/{id}/users", put(sync_company_users_handler))
}
