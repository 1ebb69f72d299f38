use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use super::attendance::DeptQuery;
use crate::error::LeaveError;
use crate::model::student::StudentPayload;
use crate::state::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RegNoQuery {
    /// Registration number of the student
    pub reg_no: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FcmToken {
    #[schema(example = "dGVzdC1kZXZpY2UtdG9rZW4")]
    pub token: String,
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(DeptQuery),
    responses(
        (status = 200, description = "Student records", body = Object, example = json!([{
            "_id": "6f1a0a52-63a4-4d39-a2e4-3f0f6c2f0b11",
            "regNo": "21CS001",
            "name": "Asha Nair",
            "dept": "CSC",
            "dob": "2003-05-14"
        }])),
    ),
    tag = "Student"
)]
pub async fn list_students(
    state: web::Data<AppState>,
    query: web::Query<DeptQuery>,
) -> Result<HttpResponse, LeaveError> {
    Ok(HttpResponse::Ok().json(state.directory.list_students(query.dept.as_deref()).await))
}

/// Create one student, or import an array of them
#[utoipa::path(
    post,
    path = "/api/students",
    request_body(
        content = Object,
        description = "A student object, or an array of them for bulk import",
        example = json!([
            {"regNo": "21CS001", "name": "Asha Nair", "dept": "CSC", "dob": "2003-05-14"},
            {"regNo": "21EC004", "name": "Vikram Das", "dept": "ECE", "dob": "2003-11-02"}
        ])
    ),
    responses(
        (status = 201, description = "Student created or batch imported", body = Object, example = json!({
            "message": "Imported 2 students",
            "inserted": 2,
            "skipped": 0
        })),
        (status = 400, description = "Empty array, missing regNo or unknown department"),
        (status = 409, description = "Single student whose regNo already exists", body = Object, example = json!({
            "error": "Student already exists"
        })),
    ),
    tag = "Student"
)]
#[instrument(name = "api_student_create", skip(state, payload))]
pub async fn create_students(
    state: web::Data<AppState>,
    payload: web::Json<StudentPayload>,
) -> Result<HttpResponse, LeaveError> {
    match payload.into_inner() {
        StudentPayload::One(student) => {
            let id = state.directory.add_student(*student).await?;
            Ok(HttpResponse::Created().json(json!({
                "message": "Student created",
                "id": id
            })))
        }
        StudentPayload::Many(students) => {
            let summary = state.directory.import_students(students).await?;
            Ok(HttpResponse::Created().json(json!({
                "message": format!("Imported {} students", summary.inserted),
                "inserted": summary.inserted,
                "skipped": summary.skipped
            })))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/api/students",
    params(RegNoQuery),
    responses(
        (status = 200, description = "Student removed", body = Object, example = json!({
            "message": "Student deleted",
            "deleted": 1
        })),
        (status = 400, description = "regNo missing"),
    ),
    tag = "Student"
)]
#[instrument(name = "api_student_delete", skip(state, query), fields(reg_no = %query.reg_no))]
pub async fn delete_student(
    state: web::Data<AppState>,
    query: web::Query<RegNoQuery>,
) -> Result<HttpResponse, LeaveError> {
    let deleted = state.directory.delete_student(&query.reg_no).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Student deleted",
        "deleted": deleted
    })))
}

/// Register the device token used for push notifications
#[utoipa::path(
    put,
    path = "/api/students/{regNo}/fcm-token",
    params(
        ("regNo" = String, Path, description = "Registration number of the student")
    ),
    request_body = FcmToken,
    responses(
        (status = 200, description = "Token saved", body = Object, example = json!({
            "message": "Token saved"
        })),
        (status = 404, description = "Unknown student"),
    ),
    tag = "Student"
)]
pub async fn register_fcm_token(
    state: web::Data<AppState>,
    path: web::Path<String>,
    payload: web::Json<FcmToken>,
) -> Result<HttpResponse, LeaveError> {
    state
        .directory
        .register_fcm_token(&path, &payload.token)
        .await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Token saved" })))
}
