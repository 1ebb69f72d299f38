use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use utoipa::ToSchema;

use crate::error::LeaveError;
use crate::model::leave_application::{LeaveFilter, LeaveStatus, LeaveSubmission};
use crate::model::role::ActingRole;
use crate::state::AppState;

/// Body of a status change. `role` decides which action date is stamped.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: LeaveStatus,
    #[schema(example = "advisor", value_type = Option<String>)]
    pub role: Option<ActingRole>,
}

#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = Object,
        description = "Leave application payload; fields beyond the listed ones are stored as sent",
        content_type = "application/json",
        example = json!({
            "regNo": "21CS001",
            "name": "Asha Nair",
            "dept": "CSC",
            "fromDate": "2024-01-10",
            "toDate": "2024-01-12",
            "reason": "Family function",
            "leaveType": "casual",
            "studentEmail": "asha@example.edu",
            "parentMobile": "+919876543210",
            "days": 3
        })
    ),
    responses(
        (status = 201, description = "Leave application recorded as Pending",
         body = Object,
         example = json!({
            "message": "Leave applied",
            "id": "0b6f4c1e-2f55-4f57-9a3e-5d1c7c1a9f10"
         })
        ),
        (status = 400, description = "Missing regNo, bad date or unknown department"),
    ),
    tag = "Leave"
)]
#[instrument(name = "api_leave_create", skip(state, payload))]
pub async fn create_leave(
    state: web::Data<AppState>,
    payload: web::Json<LeaveSubmission>,
) -> Result<HttpResponse, LeaveError> {
    let id = state.leaves.submit(payload.into_inner()).await?;

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave applied",
        "id": id
    })))
}

#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Matching applications, newest first", body = Object,
         example = json!([{
            "_id": "0b6f4c1e-2f55-4f57-9a3e-5d1c7c1a9f10",
            "regNo": "21CS001",
            "name": "Asha Nair",
            "dept": "CSC",
            "fromDate": "2024-01-10",
            "toDate": "2024-01-12",
            "reason": "Family function",
            "appliedDate": "2024-01-09",
            "status": "Advisor Approved",
            "advisorAction": "2024-01-09"
         }])
        ),
        (status = 400, description = "Unknown status value"),
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    state: web::Data<AppState>,
    filter: web::Query<LeaveFilter>,
) -> Result<HttpResponse, LeaveError> {
    Ok(HttpResponse::Ok().json(state.leaves.list(&filter).await))
}

#[utoipa::path(
    get,
    path = "/api/leaves/{id}",
    params(
        ("id" = String, Path, description = "Id of the leave application")
    ),
    responses(
        (status = 200, description = "Leave application", body = Object),
        (status = 404, description = "No application with that id", body = Object, example = json!({
            "error": "Leave application not found"
        })),
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, LeaveError> {
    let leave = state.leaves.get(&path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(leave))
}

#[utoipa::path(
    put,
    path = "/api/leaves/{id}/status",
    params(
        ("id" = String, Path, description = "Id of the leave application")
    ),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed; the student is notified", body = Object, example = json!({
            "message": "Status updated",
            "leave": {
                "_id": "0b6f4c1e-2f55-4f57-9a3e-5d1c7c1a9f10",
                "regNo": "21CS001",
                "status": "HOD Approved",
                "hodAction": "2024-01-09"
            }
        })),
        (status = 400, description = "Transition not allowed under the strict policy"),
        (status = 404, description = "No application with that id"),
    ),
    tag = "Leave"
)]
#[instrument(name = "api_leave_status", skip(state, path, payload), fields(leave_id = %path.as_str()))]
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<StatusUpdate>,
) -> Result<HttpResponse, LeaveError> {
    let StatusUpdate { status, role } = payload.into_inner();
    let leave = state.leaves.set_status(&path, status, role).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Status updated",
        "leave": leave
    })))
}
