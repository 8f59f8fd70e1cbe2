//! DTOs for company endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::related::{RelatedItem, related_items};
use super::validation::not_blank;
use crate::domain::entities::{Company, CompanyDetails, CompanyPatch};

/// Request body for `POST /api/v1/companies`.
///
/// `users` absent → memberships untouched; `[]` → no memberships.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCompanyRequest {
    #[validate(
        required(message = "The name field is required"),
        length(max = 255, message = "The name may not be greater than 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub users: Option<Vec<i64>>,
}

/// Request body for `PUT|PATCH /api/v1/companies/{id}`.
///
/// All fields are optional; only provided fields are changed.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCompanyRequest {
    #[validate(
        length(max = 255, message = "The name may not be greater than 255 characters"),
        custom(function = "not_blank")
    )]
    pub name: Option<String>,

    pub users: Option<Vec<i64>>,
}

impl UpdateCompanyRequest {
    pub fn into_patch(self) -> CompanyPatch {
        CompanyPatch {
            name: self.name.map(|n| n.trim().to_string()),
            user_ids: self.users,
        }
    }
}

/// Request body for `PUT /api/v1/companies/{id}/users`.
#[derive(Debug, Deserialize, Validate)]
pub struct SyncUsersRequest {
    #[validate(required(message = "The users field is required"))]
    pub users: Option<Vec<i64>>,
}

/// External representation of a company.
///
/// `users` is omitted from the JSON when it was not loaded.
#[derive(Debug, Serialize)]
pub struct CompanyResource {
    pub id: i64,
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<RelatedItem>>,
}

impl From<CompanyDetails> for CompanyResource {
    fn from(details: CompanyDetails) -> Self {
        Self {
            id: details.company.id,
            name: details.company.name,
            users: related_items(details.users),
        }
    }
}

impl From<Company> for CompanyResource {
    fn from(company: Company) -> Self {
        CompanyDetails::bare(company).into()
    }
}
