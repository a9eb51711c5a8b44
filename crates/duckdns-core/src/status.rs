//! Tooltip-style status text
//!
//! One short, multi-line string summarizing the last attempt and when the
//! next one is due. Rendered after every attempt and whenever a forced
//! update resets the countdown.

use chrono::{DateTime, Duration, Local};

use crate::config::Configuration;
use crate::engine::ReconciliationState;

/// Product line shown as notification title and first status line
pub const PRODUCT_NAME: &str = concat!("DuckDNS Updater (v", env!("CARGO_PKG_VERSION"), ")");

const NEXT_UPDATE_FORMAT: &str = "%b %d, %Y %I:%M:%S %p";

/// When the next attempt is due, given the seconds already counted
pub fn next_update_at(now: DateTime<Local>, config: &Configuration, elapsed_secs: u64) -> DateTime<Local> {
    let remaining = config.refresh_secs().saturating_sub(elapsed_secs);
    now + Duration::seconds(remaining as i64)
}

/// Render the status text for `state` at `now`
pub fn render(state: &ReconciliationState, config: &Configuration, now: DateTime<Local>) -> String {
    let mut text = String::from(PRODUCT_NAME);

    if !state.last_status_message.is_empty() {
        text.push('\n');
        text.push_str(&state.last_status_message);
    }

    let next = next_update_at(now, config, state.elapsed_seconds);
    text.push_str(&format!(
        "\nNext Update: {}\nRefresh: {} minutes.",
        next.format(NEXT_UPDATE_FORMAT),
        config.refresh_interval.as_minutes()
    ));

    text
}

/// Human-friendly rendering of a possibly-empty IP
pub fn display_ip(ip: &str) -> &str {
    if ip.is_empty() { "(unknown)" } else { ip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RefreshInterval;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 3, 9, 14, 0, 0).unwrap()
    }

    #[test]
    fn test_next_update_subtracts_elapsed() {
        let config = Configuration::new("alice", "tok");
        let next = next_update_at(fixed_now(), &config, 100);
        assert_eq!(next - fixed_now(), Duration::seconds(200));

        let forced = next_update_at(fixed_now(), &config, 10_000);
        assert_eq!(forced, fixed_now());
    }

    #[test]
    fn test_render_includes_message_and_interval() {
        let config = Configuration::new("alice", "tok")
            .with_refresh_interval(RefreshInterval::FifteenMinutes);
        let state = ReconciliationState {
            last_status_message: "IP unchanged: 1.2.3.4".to_string(),
            ..ReconciliationState::default()
        };

        let text = render(&state, &config, fixed_now());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], PRODUCT_NAME);
        assert_eq!(lines[1], "IP unchanged: 1.2.3.4");
        assert_eq!(lines[2], "Next Update: Mar 09, 2024 02:15:00 PM");
        assert_eq!(lines[3], "Refresh: 15 minutes.");
    }

    #[test]
    fn test_render_without_message() {
        let config = Configuration::default();
        let text = render(&ReconciliationState::default(), &config, fixed_now());
        assert_eq!(text.lines().count(), 3);
    }

    #[test]
    fn test_display_ip() {
        assert_eq!(display_ip(""), "(unknown)");
        assert_eq!(display_ip("1.2.3.4"), "1.2.3.4");
    }
}
