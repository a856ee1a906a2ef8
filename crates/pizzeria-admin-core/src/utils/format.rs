use chrono::{DateTime, Local, Timelike};

/// Greeting for the given hour of the day (0-23)
pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good Morning"
    } else if hour < 17 {
        "Good Afternoon"
    } else if hour < 20 {
        "Good Evening"
    } else {
        "Good Night"
    }
}

/// Greeting for the current local time
pub fn greeting_now() -> &'static str {
    greeting(Local::now().hour())
}

/// Format an API timestamp as e.g. `Sat 02 Mar, 2024`.
/// Unparseable input is returned unchanged.
pub fn format_date(date: &str) -> String {
    match DateTime::parse_from_rfc3339(date) {
        Ok(dt) => dt.format("%a %d %b, %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
