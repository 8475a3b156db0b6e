//! Engagement rate derived from raw counters

/// `100 * (shares + comments + likes - dislikes) / views`, rounded to two decimals.
///
/// Zero views yields 0. Dislikes subtract, so the rate can go negative.
pub fn engagement_rate(shares: u64, comments: u64, likes: u64, dislikes: u64, views: u64) -> f64 {
    if views == 0 {
        return 0.0;
    }
    let interactions = shares as i128 + comments as i128 + likes as i128 - dislikes as i128;
    let rate = interactions as f64 / views as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_views() {
        assert_eq!(engagement_rate(0, 0, 0, 0, 0), 0.0);
        assert_eq!(engagement_rate(10, 5, 20, 3, 0), 0.0);
        assert_eq!(engagement_rate(0, 0, 0, 50, 0), 0.0);
    }

    #[test]
    fn test_known_value() {
        assert_eq!(engagement_rate(10, 5, 20, 3, 100), 32.0);
    }

    #[test]
    fn test_rounding() {
        // 1 / 3 * 100 = 33.333...
        assert_eq!(engagement_rate(0, 0, 1, 0, 3), 33.33);
        // 2 / 3 * 100 = 66.666...
        assert_eq!(engagement_rate(1, 1, 0, 0, 3), 66.67);
    }

    #[test]
    fn test_negative_when_dislikes_dominate() {
        assert_eq!(engagement_rate(0, 0, 1, 11, 100), -10.0);
    }
}
