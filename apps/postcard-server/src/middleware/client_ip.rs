//! Client identification for rate limiting and submission records.

use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use std::future::{Ready, ready};
use std::net::{IpAddr, SocketAddr};

use postcard_core::domain::UNKNOWN_CLIENT;

use crate::state::AppState;

/// How the client address is derived from a request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientIpPolicy {
    /// Honour `Forwarded` / `X-Forwarded-For`. Only safe behind a proxy that
    /// overwrites them.
    pub trust_proxy_headers: bool,
}

impl ClientIpPolicy {
    pub fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }

    /// Best-effort client address, `"unknown"` when none is available.
    pub fn identify(&self, req: &HttpRequest) -> String {
        if self.trust_proxy_headers {
            if let Some(addr) = req.connection_info().realip_remote_addr() {
                return strip_port(addr);
            }
        }

        req.peer_addr()
            .map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
    }
}

/// `1.2.3.4:80` and `[::1]:80` become bare addresses; anything else is kept.
fn strip_port(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(socket) = raw.parse::<SocketAddr>() {
        return socket.ip().to_string();
    }
    if let Ok(ip) = raw.trim_matches(|c| c == '[' || c == ']').parse::<IpAddr>() {
        return ip.to_string();
    }
    raw.to_string()
}

/// Client address extractor for handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromRequest for ClientIp {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let policy = req
            .app_data::<web::Data<AppState>>()
            .map(|state| state.client_ip)
            .unwrap_or_default();

        ready(Ok(ClientIp(policy.identify(req))))
    }
}
