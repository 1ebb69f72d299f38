use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};

/// Approval stage of a leave application.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
pub enum LeaveStatus {
    #[serde(rename = "Pending")]
    #[strum(serialize = "Pending")]
    Pending,
    #[serde(rename = "Advisor Approved")]
    #[strum(serialize = "Advisor Approved")]
    AdvisorApproved,
    #[serde(rename = "HOD Approved")]
    #[strum(serialize = "HOD Approved")]
    HodApproved,
    #[serde(rename = "Rejected")]
    #[strum(serialize = "Rejected")]
    Rejected,
}

impl LeaveStatus {
    pub const ALL: [LeaveStatus; 4] = [
        LeaveStatus::Pending,
        LeaveStatus::AdvisorApproved,
        LeaveStatus::HodApproved,
        LeaveStatus::Rejected,
    ];

    /// Value stored in the `status` field.
    pub fn label(self) -> &'static str {
        match self {
            LeaveStatus::Pending => "Pending",
            LeaveStatus::AdvisorApproved => "Advisor Approved",
            LeaveStatus::HodApproved => "HOD Approved",
            LeaveStatus::Rejected => "Rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, LeaveStatus::HodApproved | LeaveStatus::Rejected)
    }
}

/// Stored leave application.
///
/// Dates are ISO `YYYY-MM-DD` on the wire and in the store. Fields a client
/// sent that the service does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
    #[serde(rename = "_id", default, skip_serializing_if = "String::is_empty")]
    pub id: String,
    pub reg_no: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dept: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub leave_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub student_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_mobile: Option<String>,
    pub applied_date: NaiveDate,
    pub status: LeaveStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisor_action: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hod_action: Option<NaiveDate>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LeaveApplication {
    /// Inclusive on both ends.
    pub fn covers(&self, day: NaiveDate) -> bool {
        self.from_date <= day && day <= self.to_date
    }
}

/// Payload a student submits to apply for leave.
///
/// Any further fields the client sends (year, section, day count, ...) land
/// in `extra` and are stored with the application.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveSubmission {
    pub reg_no: Option<String>,
    pub name: Option<String>,
    pub dept: Option<String>,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub reason: Option<String>,
    pub leave_type: Option<String>,
    pub student_email: Option<String>,
    pub parent_mobile: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query parameters for listing leave applications. Every key is optional.
#[derive(Debug, Clone, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LeaveFilter {
    /// Filter by student registration number
    #[schema(example = "21CS001")]
    pub reg_no: Option<String>,
    /// Filter by department code; the literal `null` means no filter
    #[schema(example = "CSC")]
    pub dept: Option<String>,
    /// Filter by status
    #[schema(example = "Pending")]
    pub status: Option<LeaveStatus>,
}

impl LeaveFilter {
    /// Department constraint, ignoring the `"null"` some clients send for "all".
    pub fn effective_dept(&self) -> Option<&str> {
        self.dept
            .as_deref()
            .map(str::trim)
            .filter(|dept| !dept.is_empty() && *dept != "null")
    }

    pub fn effective_reg_no(&self) -> Option<&str> {
        self.reg_no
            .as_deref()
            .map(str::trim)
            .filter(|reg_no| !reg_no.is_empty())
    }
}
