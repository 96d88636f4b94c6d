//! Dataset-wide metrics.

use super::{parse_float, ratio};
use crate::types::{OverallMetrics, SessionRecord};

/// Compute overall metrics across every record in a single pass.
///
/// The engagement rate is weighted by sessions, unlike the per-group mean.
pub fn calculate_overall(records: &[SessionRecord]) -> OverallMetrics {
    let mut weighted_engagement = 0.0;
    let mut engagement_duration: i64 = 0;
    let mut single_page_sessions: i64 = 0;
    let mut sessions: i64 = 0;
    let mut page_views: i64 = 0;
    let mut new_users: i64 = 0;
    let mut users: i64 = 0;

    for record in records {
        weighted_engagement += parse_float(&record.engagement_rate) * record.sessions as f64;
        engagement_duration += record.user_engagement_duration;
        if record.sessions > 0 && record.screen_page_views == 1 {
            single_page_sessions += record.sessions;
        }
        sessions += record.sessions;
        page_views += record.screen_page_views;
        new_users += record.new_users;
        users += record.total_users;
    }

    let sessions = sessions as f64;
    let users = users as f64;

    OverallMetrics {
        overall_engagement_rate: ratio(weighted_engagement, sessions),
        average_session_duration: ratio(engagement_duration as f64, sessions),
        bounce_rate: ratio(single_page_sessions as f64, sessions) * 100.0,
        pages_per_session: ratio(page_views as f64, sessions),
        new_user_percentage: ratio(new_users as f64, users) * 100.0,
        session_per_user: ratio(sessions, users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(sessions: i64, views: i64, rate: &str, new_users: i64, users: i64) -> SessionRecord {
        SessionRecord {
            engagement_rate: rate.to_string(),
            sessions,
            screen_page_views: views,
            new_users,
            total_users: users,
            user_engagement_duration: 60,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        assert_eq!(calculate_overall(&[]), OverallMetrics::default());
    }

    #[test]
    fn test_weighted_metrics() {
        let records = vec![record(3, 1, "1.0", 1, 2), record(1, 4, "0.0", 1, 2)];
        let overall = calculate_overall(&records);

        assert!((overall.overall_engagement_rate - 0.75).abs() < 1e-12);
        assert!((overall.average_session_duration - 30.0).abs() < 1e-12);
        assert!((overall.bounce_rate - 75.0).abs() < 1e-12);
        assert!((overall.pages_per_session - 1.25).abs() < 1e-12);
        assert!((overall.new_user_percentage - 50.0).abs() < 1e-12);
        assert!((overall.session_per_user - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_users_guarded_independently() {
        let overall = calculate_overall(&[record(2, 2, "0.5", 0, 0)]);
        assert_eq!(overall.new_user_percentage, 0.0);
        assert_eq!(overall.session_per_user, 0.0);
        assert!((overall.overall_engagement_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_zero_sessions_guarded() {
        let overall = calculate_overall(&[record(0, 1, "0.9", 1, 1)]);
        assert_eq!(overall.overall_engagement_rate, 0.0);
        assert_eq!(overall.bounce_rate, 0.0);
        assert_eq!(overall.pages_per_session, 0.0);
        assert!((overall.new_user_percentage - 100.0).abs() < 1e-12);
    }
}
