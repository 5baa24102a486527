//! Check-in submissions from the QR scanner.
//!
//! `POST /scan` always answers `200 OK` with a JSON `{"message": ...}` body.
//! The scanner app shows the message to the operator, so failures are
//! reported in the body rather than through the status code.

use crate::metrics::record_registration;
use crate::state::AppState;
use axum::{body::Bytes, extract::State, Json};
use checkin_core::{NewRegistration, RegistrationStore, StoreError};
use serde::{de::Error as _, Deserialize, Serialize};

/// Message for a newly recorded check-in.
pub const MESSAGE_OK: &str = "ok";
/// Message when `event_id` or `user_id` is missing or empty.
pub const MESSAGE_INCORRECT_PARAMS: &str = "incorrect params";
/// Message when the user is already registered for the event.
pub const MESSAGE_DUPLICATE: &str = "duplicate key value violates unique constraint";
/// Message when the body is not a JSON object of the expected shape.
pub const MESSAGE_INVALID_JSON: &str = "Invalid JSON";

/// Check-in request body.
///
/// Absent or `null` fields are treated as empty strings.
#[derive(Debug, Default, Deserialize)]
pub struct ScanRequest {
    /// Event the user checks in to
    #[serde(default)]
    pub event_id: Option<String>,
    /// Scanned user identifier
    #[serde(default)]
    pub user_id: Option<String>,
    /// Manager who brought the user, if any
    #[serde(default)]
    pub manager_name: Option<String>,
}

impl From<ScanRequest> for NewRegistration {
    fn from(request: ScanRequest) -> Self {
        Self::new(
            request.event_id.unwrap_or_default(),
            request.user_id.unwrap_or_default(),
            request.manager_name.unwrap_or_default(),
        )
    }
}

impl ScanRequest {
    /// Decode the first JSON value in `body`.
    ///
    /// Bytes after that value are ignored and a `null` value is an empty
    /// request, so both reach field validation instead of failing here.
    ///
    /// # Errors
    ///
    /// Returns the decoder error if the body is empty or its first value is
    /// not an object of the expected shape.
    pub fn decode(body: &[u8]) -> Result<Self, serde_json::Error> {
        let mut values = serde_json::Deserializer::from_slice(body).into_iter::<Option<Self>>();
        match values.next() {
            Some(value) => Ok(value?.unwrap_or_default()),
            None => Err(serde_json::Error::custom("empty request body")),
        }
    }
}

/// Check-in response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResponse {
    /// Outcome shown to the scanner operator
    pub message: String,
}

impl ScanResponse {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Record a check-in.
///
/// The body is parsed leniently: the first JSON value is used regardless of
/// the `Content-Type` header, see [`ScanRequest::decode`].
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/scan \
///   -H "Content-Type: application/json" \
///   -d '{"event_id": "meetup-42", "user_id": "u-1001", "manager_name": "Alice"}'
/// # {"message":"ok"}
/// ```
pub async fn scan<S: RegistrationStore>(
    State(state): State<AppState<S>>,
    body: Bytes,
) -> Json<ScanResponse> {
    let request = match ScanRequest::decode(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "Rejected undecodable check-in body");
            record_registration("invalid_json");
            return Json(ScanResponse::new(MESSAGE_INVALID_JSON));
        }
    };

    let registration = NewRegistration::from(request);
    let result = state.store().insert(&registration).await;

    let message = match result {
        Ok(()) => {
            tracing::info!(
                event_id = %registration.event_id,
                user_id = %registration.user_id,
                manager = %registration.manager_name,
                "Check-in recorded"
            );
            record_registration("ok");
            MESSAGE_OK.to_string()
        }
        Err(StoreError::InvalidArgument(field)) => {
            tracing::debug!(field, "Check-in missing required field");
            record_registration("invalid_argument");
            MESSAGE_INCORRECT_PARAMS.to_string()
        }
        Err(StoreError::DuplicateRegistration { event_id, user_id }) => {
            tracing::info!(%event_id, %user_id, "Duplicate check-in ignored");
            record_registration("duplicate");
            MESSAGE_DUPLICATE.to_string()
        }
        Err(e) => {
            tracing::warn!(
                event_id = %registration.event_id,
                user_id = %registration.user_id,
                error = %e,
                "Check-in failed"
            );
            record_registration("error");
            e.to_string()
        }
    };

    Json(ScanResponse::new(message))
}
