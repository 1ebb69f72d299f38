use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::role::StaffRole;

/// Stored staff account. `password` holds an argon2 PHC string and is never
/// rendered; handlers answer with [`StaffProfile`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaffAccount {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub doc_id: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct StaffProfile {
    #[serde(rename = "_id")]
    #[schema(example = "0b6f4c1e-2f55-4f57-9a3e-5d1c7c1a9f10")]
    pub doc_id: String,
    #[schema(example = "csc_advisor")]
    pub id: String,
    #[schema(example = "Dr. Ravi Kumar")]
    pub name: Option<String>,
    #[schema(example = "CSC")]
    pub dept: Option<String>,
    pub role: StaffRole,
}

impl StaffProfile {
    pub fn from_account(account: StaffAccount, role: StaffRole) -> Self {
        Self {
            doc_id: account.doc_id,
            id: account.id,
            name: account.name,
            dept: account.dept,
            role,
        }
    }
}

/// Request body for creating a staff account.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStaff {
    pub role: StaffRole,
    #[schema(example = "mech_advisor")]
    pub id: String,
    #[schema(example = "advisor123")]
    pub password: String,
    #[schema(example = "Dr. Lakshmi Rao")]
    pub name: Option<String>,
    /// Required for advisors and HODs
    #[schema(example = "CSC")]
    pub dept: Option<String>,
}
