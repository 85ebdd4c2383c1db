//! Reservation Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::ReservationStatus;
use surrealdb::RecordId;

/// Reservation model matching the store schema
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<RecordId>,
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_time: String,
    pub guests: i64,
    pub status: ReservationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// Create reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationCreate {
    pub table_id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub reservation_time: String,
    pub guests: i64,
    #[serde(default = "default_status")]
    pub status: ReservationStatus,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

fn default_status() -> ReservationStatus {
    ReservationStatus::Confirmed
}

/// Update reservation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservation_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guests: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ReservationStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}
