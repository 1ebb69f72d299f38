use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::instrument;

use crate::error::LeaveError;
use crate::reconcile::reconcile;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/api/seed",
    responses(
        (status = 200, description = "Default staff inserted into empty collections", body = Object, example = json!({
            "message": "Seed complete",
            "seeded": { "advisors": 4, "hods": 4, "management": 1 }
        })),
    ),
    tag = "Admin"
)]
#[instrument(name = "api_seed", skip(state))]
pub async fn seed(state: web::Data<AppState>) -> Result<HttpResponse, LeaveError> {
    let seeded = state.directory.seed().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Seed complete",
        "seeded": seeded
    })))
}

#[utoipa::path(
    post,
    path = "/api/reset",
    responses(
        (status = 200, description = "All collections cleared and default staff re-seeded", body = Object, example = json!({
            "message": "Database reset",
            "seeded": { "advisors": 4, "hods": 4, "management": 1 }
        })),
    ),
    tag = "Admin"
)]
#[instrument(name = "api_reset", skip(state))]
pub async fn reset(state: web::Data<AppState>) -> Result<HttpResponse, LeaveError> {
    let seeded = state.directory.reset().await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Database reset",
        "seeded": seeded
    })))
}

/// Rewrite legacy department names to their codes
#[utoipa::path(
    post,
    path = "/api/fix-departments",
    responses(
        (status = 200, description = "Records rewritten per collection", body = Object, example = json!({
            "message": "Departments fixed",
            "total": 3,
            "perCollection": { "students": 2, "advisors": 0, "hods": 0, "leave_applications": 1 }
        })),
    ),
    tag = "Admin"
)]
#[instrument(name = "api_fix_departments", skip(state))]
pub async fn fix_departments(state: web::Data<AppState>) -> Result<HttpResponse, LeaveError> {
    let report = reconcile(state.store.as_ref()).await?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Departments fixed",
        "total": report.total,
        "perCollection": report.per_collection
    })))
}
