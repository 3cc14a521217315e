pub mod backgrounds;
pub mod pages;
pub mod status;

use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages::index))
        .route("/mini", web::get().to(pages::mini))
        .route("/miniDashboard", web::get().to(pages::mini_legacy))
        .route("/api/status", web::get().to(status::api_status))
        .route("/api/refresh", web::get().to(status::api_refresh))
        .route("/api/backgrounds", web::get().to(backgrounds::api_backgrounds))
        .route("/images/backgrounds", web::get().to(backgrounds::list_backgrounds))
        .route(
            "/images/backgrounds/{file}",
            web::get().to(backgrounds::background_image),
        );
}
