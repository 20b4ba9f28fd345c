//! HTTP middleware stack.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record on span, echo on response)
//! 4. HTTPS redirect (only when `GARDEN_FORCE_HTTPS` is on)
//! 5. CORS (permissive)

pub mod https_redirect;
pub mod request_id;

pub use https_redirect::https_redirect_middleware;
pub use request_id::request_id_middleware;
