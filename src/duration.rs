//! ISO-8601 duration tokens (`PT10M59S`) to `minutes:seconds` display strings

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

/// Returned when a duration token can't be parsed
pub const NOT_AVAILABLE: &str = "N/A";

// Weeks, days and the time part. Years/months have no fixed length and are rejected.
static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^P(?:(\d+)W)?(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)(?:[.,]\d+)?S)?)?$")
        .unwrap()
});

/// Convert a duration token into `M:SS`, folding hours and days into minutes.
///
/// Malformed tokens log a warning and yield [`NOT_AVAILABLE`].
pub fn parse_duration(token: &str) -> String {
    match total_seconds(token) {
        Some(secs) => format!("{}:{:02}", secs / 60, secs % 60),
        None => {
            warn!("Failed to parse duration {:?}", token);
            NOT_AVAILABLE.to_string()
        }
    }
}

fn total_seconds(token: &str) -> Option<u64> {
    let token = token.trim();
    let caps = DURATION_PATTERN.captures(token)?;

    // "P" and "PT" match the pattern but carry no components
    if caps.iter().skip(1).all(|m| m.is_none()) {
        return None;
    }
    // A dangling "T" with nothing after it is invalid too
    if token.ends_with('T') {
        return None;
    }

    const UNITS: [u64; 5] = [7 * 86_400, 86_400, 3_600, 60, 1];
    let mut total: u64 = 0;
    for (idx, unit) in UNITS.iter().enumerate() {
        if let Some(m) = caps.get(idx + 1) {
            let n: u64 = m.as_str().parse().ok()?;
            total = total.checked_add(n.checked_mul(*unit)?)?;
        }
    }
    Some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minutes_and_seconds() {
        assert_eq!(parse_duration("PT10M59S"), "10:59");
        assert_eq!(parse_duration("PT45S"), "0:45");
        assert_eq!(parse_duration("PT3M"), "3:00");
    }

    #[test]
    fn test_hours_fold_into_minutes() {
        assert_eq!(parse_duration("PT1H5M"), "65:00");
        assert_eq!(parse_duration("PT2H0M7S"), "120:07");
        assert_eq!(parse_duration("P1DT1M"), "1441:00");
    }

    #[test]
    fn test_fractional_seconds_truncate() {
        assert_eq!(parse_duration("PT1M1.9S"), "1:01");
    }

    #[test]
    fn test_malformed() {
        assert_eq!(parse_duration("garbage"), NOT_AVAILABLE);
        assert_eq!(parse_duration(""), NOT_AVAILABLE);
        assert_eq!(parse_duration("P"), NOT_AVAILABLE);
        assert_eq!(parse_duration("PT"), NOT_AVAILABLE);
        assert_eq!(parse_duration("P1Y2M"), NOT_AVAILABLE);
        assert_eq!(parse_duration("10:59"), NOT_AVAILABLE);
    }

    #[test]
    fn test_zero_length() {
        assert_eq!(parse_duration("P0D"), "0:00");
        assert_eq!(parse_duration("PT0S"), "0:00");
    }
}
