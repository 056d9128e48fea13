//! Event Entity

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Descriptive fields of an event. Opaque to the authorization rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub name: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
}

/// An event and its owner.
///
/// `owner_id` is fixed at creation; no update path writes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: i64,
    pub owner_id: i64,
    #[serde(flatten)]
    pub details: EventDetails,
}
