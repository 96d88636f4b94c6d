//! Key-metrics report assembly.

use super::{
    aggregate_by_breakdown, bottom_elements, calculate_overall, sort_by_field, top_elements,
};
use crate::config::MetricsConfig;
use crate::types::{Breakdown, SessionRecord, SortField, SortOrder, UserMetrics};

/// Build the full report for one file's records.
///
/// | Section | Breakdown | Sorted by (descending) | Slice |
/// |---------|-----------|------------------------|-------|
/// | countries | Country | AverageEngagementRate | top and bottom N |
/// | devices | DeviceCategory | BounceRate | all |
/// | pages | LandingPage | TotalSessions | top and bottom N |
/// | mediums | SessionMedium | AverageSessionDuration | all |
pub fn build_report(records: &[SessionRecord], config: &MetricsConfig) -> UserMetrics {
    let threshold = config.threshold;
    let n = config.top_bottom_count;

    let overall_metrics = calculate_overall(records);

    let mut by_country = aggregate_by_breakdown(records, Breakdown::Country, threshold);
    sort_by_field(&mut by_country, SortField::AverageEngagementRate, SortOrder::Desc);

    let mut by_device = aggregate_by_breakdown(records, Breakdown::DeviceCategory, threshold);
    sort_by_field(&mut by_device, SortField::BounceRate, SortOrder::Desc);

    let mut by_page = aggregate_by_breakdown(records, Breakdown::LandingPage, threshold);
    sort_by_field(&mut by_page, SortField::TotalSessions, SortOrder::Desc);

    let mut by_medium = aggregate_by_breakdown(records, Breakdown::SessionMedium, threshold);
    sort_by_field(&mut by_medium, SortField::AverageSessionDuration, SortOrder::Desc);

    tracing::info!(
        records = records.len(),
        countries = by_country.len(),
        devices = by_device.len(),
        pages = by_page.len(),
        mediums = by_medium.len(),
        "Built metrics report"
    );

    UserMetrics {
        overall_metrics,
        top_countries_by_engagement_rate: top_elements(&by_country, n),
        bottom_countries_by_engagement_rate: bottom_elements(&by_country, n),
        bounce_rates_by_device: by_device,
        top_pages_by_sessions: top_elements(&by_page, n),
        bottom_pages_by_sessions: bottom_elements(&by_page, n),
        session_durations_by_medium: by_medium,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records(
        country: &str,
        device: &str,
        page: &str,
        medium: &str,
        count: usize,
        sessions: i64,
        rate: &str,
    ) -> Vec<SessionRecord> {
        (0..count)
            .map(|_| SessionRecord {
                country: country.to_string(),
                device_category: device.to_string(),
                engagement_rate: rate.to_string(),
                landing_page: page.to_string(),
                new_users: 1,
                screen_page_views: 2,
                session_medium: medium.to_string(),
                sessions,
                total_users: 1,
                user_engagement_duration: sessions * 10,
                date: "20240101".to_string(),
            })
            .collect()
    }

    fn small_config() -> MetricsConfig {
        MetricsConfig {
            threshold: 2,
            top_bottom_count: 2,
        }
    }

    #[test]
    fn test_report_sections_sorted_and_sliced() {
        let mut data = Vec::new();
        data.extend(records("US", "desktop", "/a", "organic", 3, 1, "0.9"));
        data.extend(records("FR", "mobile", "/b", "cpc", 3, 2, "0.7"));
        data.extend(records("DE", "tablet", "/c", "email", 3, 3, "0.5"));
        data.extend(records("IT", "desktop", "/d", "organic", 3, 4, "0.3"));
        // below threshold everywhere except shared device/medium keys
        data.extend(records("ES", "mobile", "/e", "cpc", 1, 9, "1.0"));

        let report = build_report(&data, &small_config());

        let names = |m: &[crate::types::AggregatedMetrics]| {
            m.iter().map(|g| g.name.clone()).collect::<Vec<_>>()
        };

        assert_eq!(names(&report.top_countries_by_engagement_rate), ["US", "FR"]);
        assert_eq!(names(&report.bottom_countries_by_engagement_rate), ["DE", "IT"]);
        assert_eq!(names(&report.top_pages_by_sessions), ["/d", "/c"]);
        assert_eq!(names(&report.bottom_pages_by_sessions), ["/b", "/a"]);
        assert_eq!(report.bounce_rates_by_device.len(), 3);
        assert_eq!(report.session_durations_by_medium.len(), 3);
        assert!(report
            .session_durations_by_medium
            .windows(2)
            .all(|w| w[0].average_session_duration >= w[1].average_session_duration));
    }

    #[test]
    fn test_default_threshold_on_small_dataset_is_empty() {
        let data = records("US", "desktop", "/", "organic", 10, 1, "0.5");
        let report = build_report(&data, &MetricsConfig::default());

        assert!(report.top_countries_by_engagement_rate.is_empty());
        assert!(report.bounce_rates_by_device.is_empty());
        assert!((report.overall_metrics.overall_engagement_rate - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_records_build_empty_report() {
        assert_eq!(build_report(&[], &small_config()), UserMetrics::default());
    }
}
