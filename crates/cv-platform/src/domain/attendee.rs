//! Attendee Entity
//!
//! Membership of one user in one event. Rows are only ever inserted or
//! deleted, never updated.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    pub id: i64,
    pub event_id: i64,
    pub user_id: i64,
}
