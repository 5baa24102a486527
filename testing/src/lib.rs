//! # Check-in Testing
//!
//! Testing utilities for the event check-in tracker.
//!
//! This crate provides:
//! - [`InMemoryRegistrationStore`]: a [`RegistrationStore`] with no I/O and
//!   switchable failures, for driving the HTTP layer in tests
//! - [`registration`]: a builder for `Registration` fixtures
//!
//! ## Example
//!
//! ```ignore
//! use checkin_testing::InMemoryRegistrationStore;
//!
//! #[tokio::test]
//! async fn test_report_failure() {
//!     let store = InMemoryRegistrationStore::new();
//!     store.fail_reads(true);
//!     let app = build_router(AppState::new(store, static_dir));
//!     // ... expect a 500 without a partial page
//! }
//! ```
//!
//! [`RegistrationStore`]: checkin_core::RegistrationStore

pub mod store_mocks;

pub use store_mocks::InMemoryRegistrationStore;

use checkin_core::Registration;
use chrono::Utc;

/// Build a registration fixture recorded now.
#[must_use]
pub fn registration(event_id: &str, user_id: &str, manager_name: &str) -> Registration {
    Registration {
        event_id: event_id.to_string(),
        user_id: user_id.to_string(),
        manager_name: manager_name.to_string(),
        recorded_at: Utc::now(),
    }
}
