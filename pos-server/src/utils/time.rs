//! 时间工具函数: UTC 时间戳与日期桶
//!
//! 系统内所有时间戳统一为 Unix epoch 秒 (UTC)，
//! repository 层只接收 `i64`，日期标签按 UTC 日历日计算。

use chrono::{DateTime, Utc};

/// 当前 Unix 时间戳 (秒, UTC)
pub fn now_secs() -> i64 {
    Utc::now().timestamp()
}

/// 时间戳 → UTC 日历日标签 (YYYY-MM-DD)
///
/// 销售汇总按这个标签分桶；落在同一 UTC 日的时间戳得到同一标签。
pub fn utc_date_label(timestamp: i64) -> String {
    DateTime::<Utc>::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "1970-01-01".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamps_bucket_by_utc_calendar_day() {
        // 2024-03-15 00:00:00 UTC and 23:59:59 UTC share a bucket
        assert_eq!(utc_date_label(1_710_460_800), "2024-03-15");
        assert_eq!(utc_date_label(1_710_547_199), "2024-03-15");
        // one second later rolls over
        assert_eq!(utc_date_label(1_710_547_200), "2024-03-16");
    }

    #[test]
    fn now_is_positive_epoch_seconds() {
        assert!(now_secs() > 1_700_000_000);
    }
}
