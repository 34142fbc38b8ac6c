//! Rate limiting middleware.
//!
//! Wrapped on a single resource; the action key names which ceiling applies.

use actix_web::{
    Error, ResponseError,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{HeaderName, HeaderValue},
    web,
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;

use crate::middleware::error::AppError;
use crate::state::AppState;

const LIMIT_HEADER: &str = "x-ratelimit-limit";
const REMAINING_HEADER: &str = "x-ratelimit-remaining";

/// Rate limiting middleware factory.
pub struct RateLimitMiddleware {
    action: &'static str,
}

impl RateLimitMiddleware {
    pub fn new(action: &'static str) -> Self {
        Self { action }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimitMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = RateLimitMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddlewareService {
            service: Rc::new(service),
            action: self.action,
        }))
    }
}

pub struct RateLimitMiddlewareService<S> {
    service: Rc<S>,
    action: &'static str,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let action = self.action;

        Box::pin(async move {
            let state = req.app_data::<web::Data<AppState>>().cloned();
            let Some(state) = state else {
                let error = AppError::Internal("AppState not found in app data".to_string());
                return Ok(req.into_response(error.error_response()).map_into_right_body());
            };

            let client = state.client_ip.identify(req.request());

            let result = match state.rate_limiter.check(action, &client).await {
                Ok(result) => result,
                Err(e) => {
                    let error = AppError::from(e);
                    return Ok(req.into_response(error.error_response()).map_into_right_body());
                }
            };

            if !result.allowed {
                tracing::warn!(action = %action, client = %client, "Rate limit exceeded");

                let mut response = AppError::TooManyRequests.error_response();
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(result.limit));
                response
                    .headers_mut()
                    .insert(HeaderName::from_static(REMAINING_HEADER), HeaderValue::from(0u32));
                return Ok(req.into_response(response).map_into_right_body());
            }

            let mut res = service.call(req).await?;
            res.headers_mut()
                .insert(HeaderName::from_static(LIMIT_HEADER), HeaderValue::from(result.limit));
            res.headers_mut()
                .insert(HeaderName::from_static(REMAINING_HEADER), HeaderValue::from(result.remaining));

            Ok(res.map_into_left_body())
        })
    }
}
