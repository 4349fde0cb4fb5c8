/// Current UTC time in Unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Format a Unix-millis timestamp as local wall-clock `HH:MM`
///
/// Used for the human-readable parts of table history ("10:30 - 12:05").
pub fn format_clock(millis: i64) -> String {
    use chrono::{Local, TimeZone};
    match Local.timestamp_millis_opt(millis).single() {
        Some(dt) => dt.format("%H:%M").to_string(),
        None => "--:--".to_string(),
    }
}
