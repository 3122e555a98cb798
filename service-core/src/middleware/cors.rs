use tower_http::cors::{Any, CorsLayer};

/// Development CORS posture: any origin, any method, any header.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}
