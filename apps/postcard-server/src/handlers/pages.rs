//! Static page and asset handlers.

use actix_web::{HttpResponse, web};
use std::io::ErrorKind;
use std::path::Path;

use postcard_core::domain::StoreKey;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Visit counter key of the postcard page.
pub const XMAS_PAGE: &str = "xmas_page";

const INDEX_FILE: &str = "index.html";
const NOT_FOUND_FILE: &str = "404.html";

/// Read a file from the static directory. `Ok(None)` if it does not exist.
async fn read_static(dir: &Path, name: &str) -> AppResult<Option<Vec<u8>>> {
    match tokio::fs::read(dir.join(name)).await {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(AppError::Internal(format!("Failed to read {}: {}", name, e))),
    }
}

/// A single file name: no separators, no `..`, no dotfiles.
fn is_servable_name(name: &str) -> bool {
    !name.is_empty() && !name.starts_with('.') && !name.contains(['/', '\\'])
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" => "text/javascript; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        _ => "application/octet-stream",
    }
}

/// 404 response, using `404.html` from the static directory when present.
async fn not_found_response(dir: &Path) -> HttpResponse {
    match read_static(dir, NOT_FOUND_FILE).await {
        Ok(Some(page)) => HttpResponse::NotFound()
            .content_type("text/html; charset=utf-8")
            .body(page),
        Ok(None) => HttpResponse::NotFound()
            .content_type("text/plain; charset=utf-8")
            .body("Not Found"),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read custom 404 page");
            HttpResponse::NotFound()
                .content_type("text/plain; charset=utf-8")
                .body("Not Found")
        }
    }
}

/// GET /xmas
pub async fn index(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    // Counting is best effort; the page is served regardless
    if let Err(e) = state.counter.increment(&StoreKey::visits(XMAS_PAGE)).await {
        tracing::warn!(error = %e, "Failed to record page visit");
    }

    match read_static(&state.static_dir, INDEX_FILE).await? {
        Some(html) => Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html)),
        None => {
            tracing::error!(dir = %state.static_dir.display(), "index.html missing from static directory");
            Ok(not_found_response(&state.static_dir).await)
        }
    }
}

/// GET /xmas/{asset}
pub async fn asset(
    state: web::Data<AppState>,
    name: web::Path<String>,
) -> AppResult<HttpResponse> {
    let name = name.into_inner();
    if !is_servable_name(&name) {
        return Ok(not_found_response(&state.static_dir).await);
    }

    match read_static(&state.static_dir, &name).await? {
        Some(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(&name))
            .body(bytes)),
        None => Ok(not_found_response(&state.static_dir).await),
    }
}

/// Fallback for every unmatched route.
pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    not_found_response(&state.static_dir).await
}
