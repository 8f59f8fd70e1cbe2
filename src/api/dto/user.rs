//! DTOs for user endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::related::{RelatedItem, related_items};
use super::validation::not_blank;
use crate::domain::entities::{User, UserDetails, UserPatch};

/// Request body for `POST /api/v1/users`.
///
/// `companies` absent → memberships untouched; `[]` → no memberships.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "The name field is required"),
        length(max = 255, message = "The name may not be greater than 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub companies: Option<Vec<i64>>,
}

/// Request body for `PUT|PATCH /api/v1/users/{id}`.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(
        length(max = 255, message = "The name may not be greater than 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub companies: Option<Vec<i64>>,
}

impl UpdateUserRequest {
    pub fn into_patch(self) -> UserPatch {
        UserPatch {
            name: self.name.map(|n| n.trim().to_string()),
            company_ids: self.companies,
        }
    }
}

/// Request body for `PUT /api/v1/users/{id}/companies`.
#[derive(Debug, Deserialize, Validate)]
pub struct SyncCompaniesRequest {
    #[validate(required(message = "The companies field is required"))]
    pub companies: Option<Vec<i64>>,
}

/// External representation of a user.
///
/// `companies` is omitted from the JSON when it was not loaded.
#[derive(Debug, Serialize)]
pub struct UserResource {
    pub id: i64,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub companies: Option<Vec<RelatedItem>>,
}

impl From<UserDetails> for UserResource {
    fn from(details: UserDetails) -> Self {
        Self {
            id: details.user.id,
            name: details.user.name,
            companies: related_items(details.companies),
        }
    }
}

impl From<User> for UserResource {
    fn from(user: User) -> Self {
        UserDetails::bare(user).into()
    }
}
