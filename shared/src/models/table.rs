//! Dining table status

use serde::{Deserialize, Serialize};

/// 餐桌状态 / Table occupancy status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableStatus {
    Available,
    Scanned,
    Unpaid,
    Paid,
}

impl Default for TableStatus {
    fn default() -> Self {
        TableStatus::Available
    }
}
