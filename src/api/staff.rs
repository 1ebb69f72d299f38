use actix_web::{HttpResponse, web};
use tracing::instrument;

use super::attendance::DeptQuery;
use crate::error::LeaveError;
use crate::model::role::StaffRole;
use crate::model::staff::{NewStaff, StaffProfile};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/api/advisors",
    params(DeptQuery),
    responses(
        (status = 200, description = "Class advisors", body = [StaffProfile]),
    ),
    tag = "Staff"
)]
pub async fn list_advisors(
    state: web::Data<AppState>,
    query: web::Query<DeptQuery>,
) -> Result<HttpResponse, LeaveError> {
    let advisors = state
        .directory
        .list_staff(StaffRole::Advisor, query.dept.as_deref())
        .await;
    Ok(HttpResponse::Ok().json(advisors))
}

#[utoipa::path(
    get,
    path = "/api/hods",
    params(DeptQuery),
    responses(
        (status = 200, description = "Heads of department", body = [StaffProfile]),
    ),
    tag = "Staff"
)]
pub async fn list_hods(
    state: web::Data<AppState>,
    query: web::Query<DeptQuery>,
) -> Result<HttpResponse, LeaveError> {
    let hods = state
        .directory
        .list_staff(StaffRole::Hod, query.dept.as_deref())
        .await;
    Ok(HttpResponse::Ok().json(hods))
}

#[utoipa::path(
    post,
    path = "/api/staff",
    request_body = NewStaff,
    responses(
        (status = 201, description = "Account created; the password is stored hashed", body = StaffProfile),
        (status = 400, description = "Missing field or unknown department"),
        (status = 409, description = "Id already used for that role"),
    ),
    tag = "Staff"
)]
#[instrument(name = "api_staff_create", skip(state, payload), fields(role = %payload.role, id = %payload.id))]
pub async fn create_staff(
    state: web::Data<AppState>,
    payload: web::Json<NewStaff>,
) -> Result<HttpResponse, LeaveError> {
    let profile = state.directory.create_staff(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(profile))
}
