use actix_web::{HttpResponse, web};
use tracing::{info, instrument};

use super::login::{AdminLogin, AdminProfile, StaffLogin, StudentLogin};
use crate::model::staff::StaffProfile;
use crate::error::LeaveError;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/login/student",
    request_body = StudentLogin,
    responses(
        (status = 200, description = "Student record", body = Object, example = json!({
            "_id": "6f1a0a52-63a4-4d39-a2e4-3f0f6c2f0b11",
            "regNo": "21CS001",
            "name": "Asha Nair",
            "dept": "CSC",
            "dob": "2003-05-14"
        })),
        (status = 401, description = "Invalid credentials", body = Object, example = json!({
            "error": "Invalid credentials"
        })),
        (status = 429, description = "Too many login attempts"),
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login_student", skip(state, login), fields(reg_no = %login.reg_no))]
pub async fn login_student(
    state: web::Data<AppState>,
    login: web::Json<StudentLogin>,
) -> Result<HttpResponse, LeaveError> {
    info!("Login request received");
    let student = state.directory.login_student(&login).await?;
    Ok(HttpResponse::Ok().json(student))
}

#[utoipa::path(
    post,
    path = "/api/login/staff",
    request_body = StaffLogin,
    responses(
        (status = 200, description = "Staff profile, without the password", body = StaffProfile),
        (status = 401, description = "Invalid credentials or department mismatch"),
        (status = 429, description = "Too many login attempts"),
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login_staff", skip(state, login), fields(role = %login.role, id = %login.id))]
pub async fn login_staff(
    state: web::Data<AppState>,
    login: web::Json<StaffLogin>,
) -> Result<HttpResponse, LeaveError> {
    info!("Login request received");
    let profile = state.directory.login_staff(&login).await?;
    Ok(HttpResponse::Ok().json(profile))
}

#[utoipa::path(
    post,
    path = "/api/login/admin",
    request_body = AdminLogin,
    responses(
        (status = 200, description = "Administrator", body = AdminProfile),
        (status = 401, description = "Invalid credentials"),
        (status = 429, description = "Too many login attempts"),
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_login_admin", skip(state, login))]
pub async fn login_admin(
    state: web::Data<AppState>,
    login: web::Json<AdminLogin>,
) -> Result<HttpResponse, LeaveError> {
    info!("Login request received");
    let admin = state.directory.login_admin(&login)?;
    Ok(HttpResponse::Ok().json(admin))
}
