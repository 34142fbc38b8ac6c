//! Admin gate extractor.

use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header, web};
use std::future::{Ready, ready};

use postcard_core::ports::{AdminIdentity, AuthError};

use crate::middleware::error::AppError;
use crate::state::AppState;

/// Authenticated admin. Taking this as a handler argument guards the route:
/// ```ignore
/// async fn stats(_admin: Admin) -> impl Responder { ... }
/// ```
#[derive(Debug, Clone)]
pub struct Admin(pub AdminIdentity);

impl FromRequest for Admin {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => {
                return ready(Err(AppError::Internal(
                    "AppState not found in app data".to_string(),
                )));
            }
        };

        // A header that is not valid ASCII counts as absent
        let authorization = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        match state.admin.authenticate(authorization) {
            Ok(identity) => ready(Ok(Admin(identity))),
            Err(AuthError::NotConfigured) => ready(Err(AppError::Internal(
                "Admin credentials are not configured".to_string(),
            ))),
            Err(e) => {
                tracing::debug!(error = %e, path = %req.path(), "Admin authentication failed");
                ready(Err(AppError::Unauthorized {
                    realm: state.admin.realm().to_string(),
                }))
            }
        }
    }
}
