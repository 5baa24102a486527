//! Axum HTTP boundary for the event check-in tracker.
//!
//! This crate is the imperative shell around [`checkin_core`]: it parses
//! requests, calls a [`RegistrationStore`], aggregates rows into a report
//! and maps every outcome to a response.
//!
//! # Request Flow
//!
//! 1. **HTTP Request** arrives at an Axum handler
//! 2. **Extract data** from the request (JSON body, query string)
//! 3. **Call the store** (`insert` or `query_by_event`)
//! 4. **Aggregate** rows with [`checkin_core::summarize`] (reports only)
//! 5. **Map result** to a JSON message or a rendered HTML page
//!
//! Store errors never escape as panics: `/scan` turns them into a message,
//! `/results` into an [`AppError`] response.
//!
//! # Example
//!
//! ```ignore
//! use checkin_web::{build_router, AppState};
//!
//! let app = build_router(AppState::new(store, "./static"));
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`RegistrationStore`]: checkin_core::RegistrationStore

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod state;

// Re-export key types for convenience
pub use error::AppError;
pub use router::build_router;
pub use state::AppState;

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
