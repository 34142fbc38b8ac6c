//! HTTP handlers and route configuration.

mod admin;
mod health;
pub mod pages;
mod postcards;

use actix_web::{guard, web};

use postcard_infra::rate_limit::XMAS_POSTCARD_SUBMISSIONS;

use crate::middleware::rate_limit::RateLimitMiddleware;

/// Configure all application routes.
///
/// Order matters: `/xmas/stats` must be registered before `/xmas/{asset}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg
        // Public pages
        .route("/xmas", web::get().to(pages::index))
        // Admin routes
        .route("/xmas/stats", web::get().to(admin::stats))
        .route("/xmas/stats/visits", web::get().to(admin::visits))
        .route(
            "/api/xmas/reset-rate-limit",
            web::get().to(admin::reset_rate_limit),
        )
        // Static assets
        .route("/xmas/{asset}", web::get().to(pages::asset))
        // Submissions
        .service(
            web::resource("/api/xmas-cards")
                .guard(guard::Post())
                .wrap(RateLimitMiddleware::new(XMAS_POSTCARD_SUBMISSIONS))
                .to(postcards::submit),
        )
        .route("/api/health", web::get().to(health::health_check));
}
