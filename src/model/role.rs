use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::store::Collection;

/// Staff account kinds. Each lives in its own collection.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StaffRole {
    Advisor,
    Hod,
    Management,
}

impl StaffRole {
    pub const ALL: [StaffRole; 3] = [StaffRole::Advisor, StaffRole::Hod, StaffRole::Management];

    pub fn collection(self) -> Collection {
        match self {
            StaffRole::Advisor => Collection::Advisors,
            StaffRole::Hod => Collection::Hods,
            StaffRole::Management => Collection::Management,
        }
    }

    /// Advisors and HODs only see their own department; management is global.
    pub fn is_department_scoped(self) -> bool {
        !matches!(self, StaffRole::Management)
    }
}

/// Role named by whoever changes a leave status. Only advisor and HOD
/// actions are stamped on the record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ActingRole {
    Advisor,
    Hod,
    Management,
    Admin,
    #[serde(other)]
    Other,
}
