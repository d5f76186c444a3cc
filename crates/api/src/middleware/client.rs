//! Caller metadata recorded on refresh-token sessions.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::header::USER_AGENT;
use axum::http::request::Parts;
use axum::http::HeaderMap;

/// Longest user agent stored on a session row.
const MAX_USER_AGENT_LEN: usize = 512;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// The user agent and client address of a request.
///
/// The address is the first hop of `X-Forwarded-For` when the app runs
/// behind a proxy, otherwise the peer address of the TCP connection.
/// Both are `None` when unavailable; extraction never fails.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    pub user_agent: Option<String>,
    pub ip_address: Option<String>,
}

impl ClientInfo {
    fn from_parts(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        let user_agent = headers
            .get(USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|ua| !ua.is_empty())
            .map(|ua| ua.chars().take(MAX_USER_AGENT_LEN).collect());

        let forwarded = headers
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        Self {
            user_agent,
            ip_address: forwarded.or_else(|| peer.map(|addr| addr.ip().to_string())),
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for ClientInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        Ok(Self::from_parts(&parts.headers, peer))
    }
}
