//! # Check-in Core
//!
//! Domain types and contracts for the event check-in tracker.
//!
//! A QR scanner posts a user identifier (and optionally the manager who
//! brought that user) for an event. The server records one registration per
//! `(event_id, user_id)` pair and renders a report grouped by manager.
//!
//! This crate holds the parts of that system that do no I/O:
//!
//! - [`registration`]: the [`Registration`] record, the [`RegistrationStore`]
//!   trait every storage backend implements, and the [`StoreError`] taxonomy
//! - [`report`]: the pure aggregation from a list of registrations to a
//!   per-manager [`Report`]
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  insert / query  ┌─────────────────────┐
//! │  HTTP layer  │ ───────────────→ │  RegistrationStore  │ ← sqlite, in-memory
//! └──────┬───────┘                  └─────────────────────┘
//!        │ rows
//!        ▼
//! ┌──────────────┐
//! │  summarize   │ → Report { total_count, manager_stats }
//! └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use checkin_core::{NewRegistration, RegistrationStore, summarize};
//!
//! store.initialize().await?;
//! store.insert(&NewRegistration::new("ev1", "u1", "Alice")).await?;
//!
//! let rows = store.query_by_event("ev1").await?;
//! let report = summarize(&rows);
//! assert_eq!(report.total_count, 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod registration;
pub mod report;

// Re-export commonly used types
pub use chrono::{DateTime, Utc};
pub use registration::{
    NewRegistration, Registration, RegistrationStore, Result, SchemaStatus, StoreError,
};
pub use report::{manager_label, summarize, ManagerStat, Report, NO_MANAGER_LABEL};
