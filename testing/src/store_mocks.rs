//! In-memory registration store for fast, deterministic tests.
//!
//! [`InMemoryRegistrationStore`] honours the same contract as the `SQLite`
//! store (uniqueness, ordering, validation) and can be told to fail reads or
//! writes so the HTTP layer's error paths can be exercised.

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Locks only panic if a holder panicked

use checkin_core::{
    NewRegistration, Registration, RegistrationStore, Result, SchemaStatus, StoreError,
};
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
struct Inner {
    initialized: bool,
    rows: Vec<Registration>,
    last_recorded_at: Option<DateTime<Utc>>,
}

/// In-memory registration store.
///
/// Clones share the same data, like clones of a connection pool.
///
/// # Example
///
/// ```
/// use checkin_core::{NewRegistration, RegistrationStore};
/// use checkin_testing::InMemoryRegistrationStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryRegistrationStore::new();
/// store.initialize().await?;
/// store.insert(&NewRegistration::new("ev1", "u1", "Alice")).await?;
/// assert_eq!(store.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistrationStore {
    inner: Arc<RwLock<Inner>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRegistrationStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent query fail with [`StoreError::Storage`].
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent insert of a valid, new pair fail with
    /// [`StoreError::Storage`].
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored registrations across all events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().unwrap().rows.len()
    }

    /// Check if nothing is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.read().unwrap().rows.is_empty()
    }
}

impl RegistrationStore for InMemoryRegistrationStore {
    async fn initialize(&self) -> Result<SchemaStatus> {
        let mut inner = self.inner.write().unwrap();
        if inner.initialized {
            Ok(SchemaStatus::AlreadyExisted)
        } else {
            inner.initialized = true;
            Ok(SchemaStatus::Created)
        }
    }

    async fn insert(&self, registration: &NewRegistration) -> Result<()> {
        registration.validate()?;

        let mut inner = self.inner.write().unwrap();
        let exists = inner.rows.iter().any(|r| {
            r.event_id == registration.event_id && r.user_id == registration.user_id
        });
        if exists {
            return Err(registration.duplicate_error());
        }
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("simulated write failure".to_string()));
        }

        // Keep timestamps non-decreasing even if the wall clock steps back
        let now = Utc::now();
        let recorded_at = inner.last_recorded_at.map_or(now, |last| last.max(now));
        inner.last_recorded_at = Some(recorded_at);

        inner.rows.push(Registration {
            event_id: registration.event_id.clone(),
            user_id: registration.user_id.clone(),
            manager_name: registration.manager_name.clone(),
            recorded_at,
        });
        Ok(())
    }

    async fn query_by_event(&self, event_id: &str) -> Result<Vec<Registration>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StoreError::Storage("simulated read failure".to_string()));
        }

        // Rows are kept in insertion order, so reversing gives newest first
        // with ties broken by reverse insertion order.
        Ok(self
            .inner
            .read()
            .unwrap()
            .rows
            .iter()
            .rev()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect())
    }
}
