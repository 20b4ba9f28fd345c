//! Plaintext-to-HTTPS redirect for deployments behind a TLS proxy.
//!
//! The proxy terminates TLS and reports the original scheme in
//! `x-forwarded-proto`. When `force_https` is on, anything not marked `https`
//! gets a 302 to the same host and URI over HTTPS.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, StatusCode, Uri, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::TlsRedirectConfig;
use crate::error::AppError;

/// Header set by the TLS-terminating proxy.
pub const FORWARDED_PROTO_HEADER: &str = "x-forwarded-proto";

/// Redirect requests that did not arrive over HTTPS.
pub async fn https_redirect_middleware(
    State(tls): State<TlsRedirectConfig>,
    request: Request,
    next: Next,
) -> Response {
    if !tls.force_https || is_forwarded_https(request.headers()) {
        return next.run(request).await;
    }

    let Some(host) = request
        .headers()
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
    else {
        return AppError::BadRequest("Missing Host header".to_owned()).into_response();
    };

    let location = redirect_target(host, tls.https_port, request.uri());
    tracing::debug!(%location, "Redirecting to HTTPS");
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

fn is_forwarded_https(headers: &HeaderMap) -> bool {
    headers
        .get(FORWARDED_PROTO_HEADER)
        .and_then(|h| h.to_str().ok())
        // Chained proxies append; the first entry is the client-facing scheme.
        .and_then(|proto| proto.split(',').next())
        .is_some_and(|proto| proto.trim().eq_ignore_ascii_case("https"))
}

/// Build `https://host[:port]/path?query`, replacing the request port with
/// `https_port` when one is configured.
fn redirect_target(host: &str, https_port: Option<u16>, uri: &Uri) -> String {
    let path = uri.path_and_query().map_or("/", |pq| pq.as_str());
    match https_port {
        Some(port) => format!("https://{}:{port}{path}", strip_port(host)),
        None => format!("https://{host}{path}"),
    }
}

fn strip_port(host: &str) -> &str {
    if host.starts_with('[') {
        // IPv6 literal: keep everything up to the closing bracket.
        return host
            .find(']')
            .and_then(|end| host.get(..=end))
            .unwrap_or(host);
    }
    host.rsplit_once(':').map_or(host, |(name, _)| name)
}
