//! Reservation status

use serde::{Deserialize, Serialize};

/// 预订状态 / Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Arrived,
    Cancelled,
}
