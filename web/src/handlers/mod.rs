//! HTTP request handlers.
//!
//! - [`scan`]: check-in submissions from the QR scanner (`POST /scan`)
//! - [`results`]: the per-event HTML report (`GET /results`)
//! - [`health`]: liveness probe (`GET /health`)
//!
//! Static pages are served by `tower-http` services wired in the router.

pub mod health;
pub mod results;
pub mod scan;

pub use health::health_check;
pub use results::results;
pub use scan::scan;
