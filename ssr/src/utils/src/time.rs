use chrono::DateTime;
use web_time::{SystemTime, UNIX_EPOCH};

/// Wall clock in epoch seconds, 0 if the clock sits before 1970.
pub fn current_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

pub fn format_start_time(epoch_secs: u64) -> String {
    i64::try_from(epoch_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| epoch_secs.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_time_is_rendered_in_utc() {
        assert_eq!(format_start_time(1_700_000_000), "2023-11-14 22:13:20 UTC");
    }

    #[test]
    fn clock_is_past_2023() {
        assert!(current_epoch_secs() > 1_700_000_000);
    }
}
