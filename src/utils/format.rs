// src/utils/format.rs
use chrono::{DateTime, Utc};

// Format a duration for display
pub fn format_time_ago(time: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(time);
    let seconds = duration.num_seconds().max(0);

    if seconds < 60 {
        format!("{} seconds ago", seconds)
    } else if seconds < 3600 {
        format!("{} minutes ago", duration.num_minutes())
    } else if seconds < 86400 {
        format!("{} hours ago", duration.num_hours())
    } else if seconds < 2592000 {
        format!("{} days ago", duration.num_days())
    } else if seconds < 31536000 {
        format!("{} months ago", duration.num_days() / 30)
    } else {
        format!("{} years ago", duration.num_days() / 365)
    }
}

// Truncate a string to at most `max_len` characters
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Fixed-width table row used by the list views.
pub fn format_entry_row(id: &str, site: &str, username: &str, updated: &str) -> String {
    format!(
        "{:<36}  {:<24}  {:<20}  {}",
        id,
        truncate_string(site, 24),
        truncate_string(username, 20),
        updated
    )
}
