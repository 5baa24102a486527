//! Router configuration.
//!
//! ```text
//! POST /scan              check-in submission (JSON)
//! GET  /results           HTML report, ?event_id= (default "default")
//! GET  /health            liveness probe
//! GET  /doc               static/doc.html
//! GET  /static/*          files under the static directory
//! *                       static/index.html (scanner page)
//! ```

use crate::handlers::{health_check, results, scan};
use crate::state::AppState;
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use checkin_core::RegistrationStore;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

/// Build the complete Axum router.
///
/// Every response carries an `x-request-id` header (taken from the request
/// or generated), and every request runs inside an HTTP trace span.
pub fn build_router<S: RegistrationStore + 'static>(state: AppState<S>) -> Router {
    let static_dir = state.static_dir().to_path_buf();

    // The scanner is served from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/scan", post(scan::<S>))
        .route("/results", get(results::<S>))
        .route("/health", get(health_check))
        .route_service("/doc", ServeFile::new(static_dir.join("doc.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .fallback_service(ServeFile::new(static_dir.join("index.html")))
        .with_state(state)
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}
