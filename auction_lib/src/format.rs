//! Display helpers shared by every listing renderer.

use chrono::{DateTime, Utc};

pub const CURRENCY: &str = "CZK";

/// Whole-unit price with thousands separators, e.g. `65,500 CZK`.
pub fn format_price(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{} {}", grouped, CURRENCY)
}

/// Coarse countdown: `Ended`, `2d 4h`, `5h 12m` or `42m`.
pub fn format_time_remaining(end_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = end_time - now;
    if remaining <= chrono::Duration::zero() {
        return "Ended".to_string();
    }
    let days = remaining.num_days();
    let hours = remaining.num_hours() % 24;
    let minutes = remaining.num_minutes() % 60;
    if days > 0 {
        format!("{}d {}h", days, hours)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Less than an hour left and not yet ended.
pub fn is_ending_soon(end_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    let remaining = end_time - now;
    remaining > chrono::Duration::zero() && remaining < chrono::Duration::hours(1)
}
