//! Per-event HTML report.
//!
//! `GET /results?event_id=...` lists every registration of the event,
//! newest first, together with the total and a per-manager breakdown. A
//! failed read produces an error response, never a partially filled page.

use crate::error::AppError;
use crate::metrics::record_report;
use crate::state::AppState;
use crate::WebResult;
use askama::Template;
use axum::{
    extract::{Query, State},
    response::Html,
};
use checkin_core::{summarize, ManagerStat, Registration, RegistrationStore, Report};
use chrono::Local;
use serde::Deserialize;

/// Event shown when the request names none.
pub const DEFAULT_EVENT_ID: &str = "default";

/// Display format for registration timestamps (server local time).
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Query parameters for the report.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    /// Event to report on; empty or absent means [`DEFAULT_EVENT_ID`]
    pub event_id: Option<String>,
}

impl ResultsQuery {
    /// The event id after applying the default.
    #[must_use]
    pub fn event_id(&self) -> &str {
        match self.event_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_EVENT_ID,
        }
    }
}

/// One line of the registrations table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Check-in time in server local time
    pub date: String,
    /// Registered user
    pub user_id: String,
    /// Attributed manager, empty when none
    pub manager_name: String,
}

impl From<&Registration> for ResultRow {
    fn from(registration: &Registration) -> Self {
        Self {
            date: registration
                .recorded_at
                .with_timezone(&Local)
                .format(DATE_FORMAT)
                .to_string(),
            user_id: registration.user_id.clone(),
            manager_name: registration.manager_name.clone(),
        }
    }
}

/// The rendered report page.
#[derive(Template)]
#[template(path = "results.html")]
pub struct ResultsPage {
    /// Event the report is for
    pub event_id: String,
    /// Number of registrations
    pub total_count: usize,
    /// Per-manager counts in display order
    pub manager_stats: Vec<ManagerStat>,
    /// Registrations, newest first
    pub rows: Vec<ResultRow>,
}

impl ResultsPage {
    /// Assemble the page from the store rows and their summary.
    #[must_use]
    pub fn new(event_id: impl Into<String>, registrations: &[Registration], report: &Report) -> Self {
        Self {
            event_id: event_id.into(),
            total_count: report.total_count,
            manager_stats: report.sorted_stats(),
            rows: registrations.iter().map(ResultRow::from).collect(),
        }
    }
}

/// Render the report for an event.
///
/// # Errors
///
/// Returns an [`AppError`] (500/503) if the store read or template
/// rendering fails.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:8080/results?event_id=meetup-42"
/// ```
pub async fn results<S: RegistrationStore>(
    State(state): State<AppState<S>>,
    Query(query): Query<ResultsQuery>,
) -> WebResult<Html<String>> {
    let event_id = query.event_id();

    let registrations = state.store().query_by_event(event_id).await.map_err(|e| {
        record_report("error");
        AppError::from(e)
    })?;

    let report = summarize(&registrations);
    let page = ResultsPage::new(event_id, &registrations, &report);
    let html = page.render().map_err(|e| {
        record_report("error");
        AppError::internal("Failed to render report").with_source(e.into())
    })?;

    tracing::debug!(event_id, total = report.total_count, "Report rendered");
    record_report("ok");
    Ok(Html(html))
}
