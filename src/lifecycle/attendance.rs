use chrono::NaiveDate;
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use super::LeaveLifecycle;
use crate::model::department;
use crate::model::leave_application::{LeaveApplication, LeaveStatus};
use crate::store::{Collection, Filter};

/// Head-count for one day.
///
/// `on_leave` counts approved leave records, not distinct students, so two
/// overlapping approved leaves for one student count twice and `present` can
/// go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceStats {
    #[schema(example = "2024-01-11", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 60)]
    pub total: u64,
    #[schema(example = 3)]
    pub on_leave: u64,
    #[schema(example = 57)]
    pub present: i64,
}

impl AttendanceStats {
    pub fn new(date: NaiveDate, total: u64, on_leave: u64) -> Self {
        Self {
            date,
            total,
            on_leave,
            present: total as i64 - on_leave as i64,
        }
    }
}

impl LeaveLifecycle {
    /// Students versus HOD-approved leaves covering today, optionally scoped
    /// to one department. Store failures count as zero.
    pub async fn attendance_stats(&self, dept: Option<&str>) -> AttendanceStats {
        let today = self.clock.today();
        let dept = dept
            .map(str::trim)
            .filter(|dept| !dept.is_empty() && *dept != "null")
            .map(department::filter_value);

        let total = self
            .store
            .count(Collection::Students, &Filter::all().eq_opt("dept", dept.clone()))
            .await
            .unwrap_or_else(|e| {
                warn!(error = %e, "Student count unavailable");
                0
            });

        let approved = Filter::all()
            .eq("status", LeaveStatus::HodApproved.label())
            .eq_opt("dept", dept);
        let on_leave = match self
            .store
            .find(Collection::LeaveApplications, &approved)
            .await
        {
            Ok(documents) => documents
                .into_iter()
                .filter_map(|document| document.decode::<LeaveApplication>().ok())
                .filter(|leave| leave.covers(today))
                .count() as u64,
            Err(e) => {
                warn!(error = %e, "Approved leaves unavailable");
                0
            }
        };

        AttendanceStats::new(today, total, on_leave)
    }
}
