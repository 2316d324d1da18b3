use chrono::Utc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

pub fn millis_to_system_time(millis: i64) -> SystemTime {
    UNIX_EPOCH + Duration::from_millis(millis.max(0) as u64)
}

pub fn request_id(counter: u32) -> String {
    format!("REQ-{}-{:04}", Utc::now().format("%Y%m%d%H%M%S"), counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_id_carries_timestamp_and_padded_counter() {
        let id = request_id(7);
        let parts: Vec<&str> = id.split('-').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "REQ");
        assert_eq!(parts[1].len(), 14);
        assert!(parts[1].chars().all(|c| c.is_ascii_digit()));
        assert_eq!(parts[2], "0007");
    }

    #[test]
    fn negative_millis_clamp_to_epoch() {
        assert_eq!(millis_to_system_time(-5), UNIX_EPOCH);
    }
}
