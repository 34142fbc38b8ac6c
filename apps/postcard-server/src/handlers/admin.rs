//! Admin handlers. Every handler takes [`Admin`], which runs the gate first.

use actix_web::{HttpResponse, web};

use postcard_shared::{SubmissionTotals, VisitTotals};

use crate::handlers::pages::XMAS_PAGE;
use crate::middleware::admin::Admin;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// GET /xmas/stats
pub async fn stats(_admin: Admin, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let total_submissions = state.stats.total_submissions().await?;
    Ok(HttpResponse::Ok().json(SubmissionTotals { total_submissions }))
}

/// GET /xmas/stats/visits
pub async fn visits(_admin: Admin, state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let visits = state.stats.page_visits(XMAS_PAGE).await?;
    Ok(HttpResponse::Ok().json(VisitTotals { visits }))
}

/// GET /api/xmas/reset-rate-limit
pub async fn reset_rate_limit(
    admin: Admin,
    state: web::Data<AppState>,
) -> AppResult<HttpResponse> {
    let removed = state.rate_limiter.reset_all().await?;
    tracing::info!(admin = %admin.0.username, removed, "Rate limits reset by admin");

    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body("Rate limits for all IPs have been reset."))
}
