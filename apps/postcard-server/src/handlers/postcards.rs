//! Postcard submission handler.

use actix_web::{HttpResponse, web};

use postcard_shared::SubmissionTotals;

use crate::middleware::client_ip::ClientIp;
use crate::middleware::error::AppResult;
use crate::state::AppState;

/// POST /api/xmas-cards - rate limited by the wrapping middleware.
///
/// The body is read raw so a malformed payload surfaces as a 500 like any
/// other failure.
pub async fn submit(
    state: web::Data<AppState>,
    client: ClientIp,
    body: web::Bytes,
) -> AppResult<HttpResponse> {
    let total_submissions = state.submissions.submit(&body, client.as_str()).await?;

    Ok(HttpResponse::Ok().json(SubmissionTotals { total_submissions }))
}
