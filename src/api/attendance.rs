use actix_web::{HttpResponse, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::LeaveError;
use crate::lifecycle::AttendanceStats;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeptQuery {
    /// Department code; omitted or `null` means the whole college
    pub dept: Option<String>,
}

/// Today's head count for a department
#[utoipa::path(
    get,
    path = "/api/attendance/stats",
    params(DeptQuery),
    responses(
        (status = 200, description = "Students on HOD-approved leave today", body = AttendanceStats),
    ),
    tag = "Attendance"
)]
pub async fn stats(
    state: web::Data<AppState>,
    query: web::Query<DeptQuery>,
) -> Result<HttpResponse, LeaveError> {
    let stats = state.leaves.attendance_stats(query.dept.as_deref()).await;
    Ok(HttpResponse::Ok().json(stats))
}
