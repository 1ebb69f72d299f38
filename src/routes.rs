use crate::{
    api::{admin, attendance, leave_request, staff, student},
    auth::handlers,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{HttpResponse, error::InternalError, web};
use serde_json::json;

/// Rate-limiter state for the login routes. Build it once and hand the same
/// value to every worker's `configure`; each `Governor` made from it shares
/// the per-IP counters.
pub type LoginLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

// Per-peer-IP limiter allowing `requests_per_min`, bursting up to the same amount
pub fn build_limiter(requests_per_min: u32) -> LoginLimiter {
    let requests_per_min = requests_per_min.max(1);
    let per_ms = 60_000 / u64::from(requests_per_min);
    GovernorConfigBuilder::default()
        .per_millisecond(per_ms.max(1))
        .burst_size(requests_per_min)
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .expect("period and burst size are non-zero")
}

// Malformed bodies and query strings answer with the same JSON shape as LeaveError
fn bad_request<E>(err: E) -> actix_web::Error
where
    E: std::fmt::Debug + std::fmt::Display + 'static,
{
    let response = HttpResponse::BadRequest().json(json!({ "error": err.to_string() }));
    InternalError::from_response(err, response).into()
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, login_limiter: &LoginLimiter) {
    cfg.service(
        web::scope(&config.api_prefix)
            .app_data(web::JsonConfig::default().error_handler(|err, _| bad_request(err)))
            .app_data(web::QueryConfig::default().error_handler(|err, _| bad_request(err)))
            .service(web::resource("/seed").route(web::post().to(admin::seed)))
            .service(web::resource("/reset").route(web::post().to(admin::reset)))
            .service(
                web::resource("/fix-departments").route(web::post().to(admin::fix_departments)),
            )
            .service(
                web::scope("/login")
                    .wrap(Governor::new(login_limiter))
                    .service(web::resource("/student").route(web::post().to(handlers::login_student)))
                    .service(web::resource("/staff").route(web::post().to(handlers::login_staff)))
                    .service(web::resource("/admin").route(web::post().to(handlers::login_admin))),
            )
            .service(
                web::scope("/students")
                    // /students
                    .service(
                        web::resource("")
                            .route(web::get().to(student::list_students))
                            .route(web::post().to(student::create_students))
                            .route(web::delete().to(student::delete_student)),
                    )
                    // /students/{regNo}/fcm-token
                    .service(
                        web::resource("/{reg_no}/fcm-token")
                            .route(web::put().to(student::register_fcm_token)),
                    ),
            )
            .service(web::resource("/advisors").route(web::get().to(staff::list_advisors)))
            .service(web::resource("/hods").route(web::get().to(staff::list_hods)))
            .service(web::resource("/staff").route(web::post().to(staff::create_staff)))
            .service(
                web::scope("/leaves")
                    // /leaves
                    .service(
                        web::resource("")
                            .route(web::get().to(leave_request::leave_list))
                            .route(web::post().to(leave_request::create_leave)),
                    )
                    // /leaves/{id}
                    .service(web::resource("/{id}").route(web::get().to(leave_request::get_leave)))
                    // /leaves/{id}/status
                    .service(
                        web::resource("/{id}/status")
                            .route(web::put().to(leave_request::update_status)),
                    ),
            )
            .service(web::resource("/attendance/stats").route(web::get().to(attendance::stats))),
    );
}
