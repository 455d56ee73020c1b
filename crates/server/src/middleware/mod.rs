//! HTTP middleware stack for the task store service.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, outermost)
//! 2. CORS (the planner UI may be served from another origin)
//! 3. `TraceLayer` (request tracing, `http_request` span)
//! 4. Request ID (add unique ID to each request, recorded on the span)

pub mod cors;
pub mod request_id;

pub use cors::cors_layer;
pub use request_id::request_id_middleware;
