use chrono::{DateTime, Local};
use rand::Rng;
use rand::distr::Alphanumeric;

/// Short alphanumeric identifier, good enough for entry identity within a
/// single user's lists (not a real UUID).
pub fn uuid_5() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(5)
        .map(char::from)
        .collect()
}

/// Returns the trimmed string if it contains anything other than whitespace.
pub fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() { None } else { Some(trimmed) }
}

/// `HH:MM • YYYY-MM-DD`, the clock readout format.
pub fn clock_display(now: DateTime<Local>) -> String {
    format!("{} • {}", now.format("%H:%M"), now.format("%Y-%m-%d"))
}

pub fn formatted_now() -> String {
    clock_display(Local::now())
}
