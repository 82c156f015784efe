use crate::types::Timestamp;

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> Timestamp {
    chrono::Utc::now().timestamp_millis()
}

/// Render an epoch-millisecond timestamp as RFC 3339 (UTC) for logs.
///
/// Returns `None` when the value is outside chrono's representable range.
pub fn millis_to_rfc3339(millis: Timestamp) -> Option<String> {
    chrono::DateTime::from_timestamp_millis(millis).map(|dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_millis_is_recent() {
        // 2024-01-01 00:00:00 UTC
        assert!(now_millis() > 1_704_067_200_000);
    }

    #[test]
    fn test_millis_to_rfc3339() {
        assert_eq!(
            millis_to_rfc3339(1_704_067_200_000).as_deref(),
            Some("2024-01-01T00:00:00+00:00")
        );
        assert!(millis_to_rfc3339(i64::MAX).is_none());
    }
}
