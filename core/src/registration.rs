//! Registrations and the store contract.
//!
//! A [`Registration`] is the fact that a user checked in for an event. It is
//! created exactly once, never mutated and never deleted. The pair
//! `(event_id, user_id)` is unique for the lifetime of a store: a second
//! insert of the same pair is rejected with
//! [`StoreError::DuplicateRegistration`], not overwritten.
//!
//! Backends implement [`RegistrationStore`]. The durable one lives in
//! `checkin-sqlite`; `checkin-testing` provides an in-memory one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Error taxonomy for registration store operations.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A required field was empty. Raised before any storage call.
    #[error("Invalid argument: {0} must not be empty")]
    InvalidArgument(&'static str),

    /// The `(event_id, user_id)` pair is already registered.
    #[error("User {user_id} is already registered for event {event_id}")]
    DuplicateRegistration {
        /// Event the insert targeted
        event_id: String,
        /// User that was already present
        user_id: String,
    },

    /// The storage location could not be opened.
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Table creation failed for a reason other than the table existing.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Any other storage failure. The message comes from the driver and is
    /// not stable across engines.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl StoreError {
    /// Whether this error must stop the process at startup.
    #[must_use]
    pub const fn is_fatal_at_startup(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_) | Self::Schema(_))
    }
}

/// Result type for registration store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Outcome of [`RegistrationStore::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaStatus {
    /// The table was missing and has been created.
    Created,
    /// The table was already there; nothing was changed.
    AlreadyExisted,
}

impl fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "created"),
            Self::AlreadyExisted => write!(f, "already existed"),
        }
    }
}

/// A check-in submitted by a scanner, before the store has recorded it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRegistration {
    /// Event (partition key)
    pub event_id: String,
    /// Registrant, unique within the event
    pub user_id: String,
    /// Attributed manager; empty means none
    pub manager_name: String,
}

impl NewRegistration {
    /// Build a new registration request.
    #[must_use]
    pub fn new(
        event_id: impl Into<String>,
        user_id: impl Into<String>,
        manager_name: impl Into<String>,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            user_id: user_id.into(),
            manager_name: manager_name.into(),
        }
    }

    /// Check the required fields.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidArgument`] naming the first empty field.
    pub fn validate(&self) -> Result<()> {
        if self.event_id.is_empty() {
            return Err(StoreError::InvalidArgument("event_id"));
        }
        if self.user_id.is_empty() {
            return Err(StoreError::InvalidArgument("user_id"));
        }
        Ok(())
    }

    /// Manager name as it should be persisted (`None` when empty).
    #[must_use]
    pub fn manager(&self) -> Option<&str> {
        if self.manager_name.is_empty() {
            None
        } else {
            Some(&self.manager_name)
        }
    }

    /// The duplicate error for this request's key.
    #[must_use]
    pub fn duplicate_error(&self) -> StoreError {
        StoreError::DuplicateRegistration {
            event_id: self.event_id.clone(),
            user_id: self.user_id.clone(),
        }
    }
}

/// A recorded check-in as returned by [`RegistrationStore::query_by_event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Event (partition key)
    pub event_id: String,
    /// Registrant
    pub user_id: String,
    /// Attributed manager, `""` when none was given
    pub manager_name: String,
    /// Assigned by the store at insert time
    pub recorded_at: DateTime<Utc>,
}

/// Persistent storage for registrations.
///
/// Implementations hold no request state of their own; every call is a
/// self-contained request to the backing engine, which serializes writes.
///
/// # Example
///
/// ```ignore
/// let status = store.initialize().await?;
/// tracing::info!(%status, "registrations table ready");
///
/// match store.insert(&NewRegistration::new("ev1", "u1", "")).await {
///     Ok(()) => {}
///     Err(StoreError::DuplicateRegistration { .. }) => {}
///     Err(e) => return Err(e),
/// }
/// ```
pub trait RegistrationStore: Send + Sync {
    /// Ensure the registrations table exists.
    ///
    /// Idempotent: running it against storage that already has the table
    /// succeeds with [`SchemaStatus::AlreadyExisted`] and changes nothing.
    ///
    /// # Errors
    ///
    /// - [`StoreError::StorageUnavailable`] if storage cannot be reached
    /// - [`StoreError::Schema`] if creation fails
    fn initialize(&self) -> impl Future<Output = Result<SchemaStatus>> + Send;

    /// Record a registration.
    ///
    /// # Errors
    ///
    /// - [`StoreError::InvalidArgument`] if `event_id` or `user_id` is empty;
    ///   no write is attempted
    /// - [`StoreError::DuplicateRegistration`] if the pair already exists;
    ///   the stored row is left untouched
    /// - [`StoreError::Storage`] for any other failure
    fn insert(&self, registration: &NewRegistration) -> impl Future<Output = Result<()>> + Send;

    /// All registrations for an event, newest first.
    ///
    /// Ties on `recorded_at` are broken by reverse insertion order. An
    /// unknown event yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Storage`] if the read fails. No partial results
    /// are returned.
    fn query_by_event(
        &self,
        event_id: &str,
    ) -> impl Future<Output = Result<Vec<Registration>>> + Send;
}
