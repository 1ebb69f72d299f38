use crate::accounts::{ImportSummary, SeedSummary};
use crate::api::leave_request::StatusUpdate;
use crate::api::student::FcmToken;
use crate::auth::login::{AdminLogin, AdminProfile, StaffLogin, StudentLogin};
use crate::lifecycle::AttendanceStats;
use crate::model::leave_application::{LeaveFilter, LeaveStatus};
use crate::model::role::StaffRole;
use crate::model::staff::{NewStaff, StaffProfile};
use crate::reconcile::ReconcileReport;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Portal API",
        version = "1.0.0",
        description = r#"
## College Leave Portal

Backend for student leave applications and their two-step approval.

### Key Features
- **Leave Applications**
  - Students apply; advisors then HODs approve or reject
  - Students are notified by push message on every status change
- **Attendance**
  - Daily head count per department from HOD-approved leave
- **Accounts**
  - Student import, staff accounts, and logins for students, staff and admin
- **Maintenance**
  - Seeding, reset, and rewriting legacy department names to codes

### Departments
Department values are the codes `CSC`, `ECE`, `AI&ML` and `CYBER`. Legacy
names such as `Computer Science` are accepted on input and stored as codes.

### Response Format
JSON throughout. Stored records carry their id under `_id`; errors are
`{"error": "..."}`.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::create_leave,
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::update_status,

        crate::api::attendance::stats,

        crate::api::student::list_students,
        crate::api::student::create_students,
        crate::api::student::delete_student,
        crate::api::student::register_fcm_token,

        crate::api::staff::list_advisors,
        crate::api::staff::list_hods,
        crate::api::staff::create_staff,

        crate::auth::handlers::login_student,
        crate::auth::handlers::login_staff,
        crate::auth::handlers::login_admin,

        crate::api::admin::seed,
        crate::api::admin::reset,
        crate::api::admin::fix_departments
    ),
    components(
        schemas(
            LeaveStatus,
            LeaveFilter,
            StatusUpdate,
            AttendanceStats,
            FcmToken,
            ImportSummary,
            StaffRole,
            StaffProfile,
            NewStaff,
            StudentLogin,
            StaffLogin,
            AdminLogin,
            AdminProfile,
            SeedSummary,
            ReconcileReport
        )
    ),
    tags(
        (name = "Leave", description = "Leave application APIs"),
        (name = "Attendance", description = "Attendance statistics APIs"),
        (name = "Student", description = "Student record APIs"),
        (name = "Staff", description = "Advisor, HOD and management account APIs"),
        (name = "Auth", description = "Login APIs"),
        (name = "Admin", description = "Seeding and maintenance APIs"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/leaves",
            "/api/leaves/{id}",
            "/api/leaves/{id}/status",
            "/api/attendance/stats",
            "/api/students",
            "/api/students/{regNo}/fcm-token",
            "/api/advisors",
            "/api/hods",
            "/api/staff",
            "/api/login/student",
            "/api/login/staff",
            "/api/login/admin",
            "/api/seed",
            "/api/reset",
            "/api/fix-departments",
        ] {
            assert!(doc.paths.paths.contains_key(path), "{path} missing from OpenAPI");
        }
    }

    #[test]
    fn responses_reference_their_schemas() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("serializable");
        for (path, method, schema) in [
            ("/api/attendance/stats", "get", "AttendanceStats"),
            ("/api/advisors", "get", "StaffProfile"),
            ("/api/staff", "post", "StaffProfile"),
            ("/api/login/staff", "post", "StaffProfile"),
            ("/api/login/admin", "post", "AdminProfile"),
        ] {
            let response = doc["paths"][path][method]["responses"].to_string();
            let reference = format!("#/components/schemas/{schema}");
            assert!(response.contains(&reference), "{method} {path} should return {schema}");
        }
    }
}
