//! Prompt rendering for the insights request.

use std::fmt::Write;

use crate::format;
use crate::types::{AggregatedMetrics, UserMetrics};

const NO_DATA: &str = "  - No data available\n";

const INSTRUCTIONS: &str = "Analyze the following metrics and provide insights for each group of metrics as a whole. The insights should be included in the 'ai_insight' field for each metric group.";

const RESPONSE_SCHEMA: &str = r#"Please provide insights for each group of metrics as a whole in the 'ai_insight' field. The output should be in the following JSON structure without any additional words:
{
  "overall_metrics": {
    "overall_engagement_rate": "value",
    "average_session_duration": "value",
    "bounce_rate": "value",
    "pages_per_session": "value",
    "new_user_percentage": "value",
    "session_per_user": "value",
    "ai_insight": "insight"
  },
  "top_5_countries_with_highest_engagement_rate": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "country_name", "average_engagement_rate": "value" }
    ]
  },
  "top_5_countries_with_lowest_engagement_rate": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "country_name", "average_engagement_rate": "value" }
    ]
  },
  "bounce_rates_by_devices": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "device_category", "bounce_rate": "value" }
    ]
  },
  "top_5_pages_with_highest_no_of_sessions": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "page_name", "total_sessions": "value" }
    ]
  },
  "top_5_pages_with_lowest_no_of_sessions": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "page_name", "total_sessions": "value" }
    ]
  },
  "average_session_durations_by_devices": {
    "ai_insight": "insight",
    "aggregated_metrics": [
      { "name": "device_category", "average_session_duration": "value" }
    ]
  }
}"#;

/// Render the full prompt for a report.
pub fn build_prompt(metrics: &UserMetrics) -> String {
    let overall = &metrics.overall_metrics;
    let mut prompt = String::new();

    let _ = writeln!(prompt, "{}\n", INSTRUCTIONS);
    let _ = writeln!(prompt, "Overall Metrics:");
    let _ = writeln!(
        prompt,
        "  - Overall Engagement Rate: {}",
        format::rate_as_percent(overall.overall_engagement_rate)
    );
    let _ = writeln!(
        prompt,
        "  - Average Session Duration: {}",
        format::seconds(overall.average_session_duration)
    );
    let _ = writeln!(prompt, "  - Bounce Rate: {}", format::percent(overall.bounce_rate));
    let _ = writeln!(
        prompt,
        "  - Pages Per Session: {}",
        format::decimal(overall.pages_per_session)
    );
    let _ = writeln!(
        prompt,
        "  - New User Percentage: {}",
        format::percent(overall.new_user_percentage)
    );
    let _ = writeln!(
        prompt,
        "  - Session Per User: {}\n",
        format::decimal(overall.session_per_user)
    );

    push_section(
        &mut prompt,
        "Top Countries with Highest Engagement Rate",
        &metrics.top_countries_by_engagement_rate,
        |m| format!("{} engagement rate", format::rate_as_percent(m.average_engagement_rate)),
    );
    push_section(
        &mut prompt,
        "Top Countries with Lowest Engagement Rate",
        &metrics.bottom_countries_by_engagement_rate,
        |m| format!("{} engagement rate", format::rate_as_percent(m.average_engagement_rate)),
    );
    push_section(
        &mut prompt,
        "Bounce Rates by Devices",
        &metrics.bounce_rates_by_device,
        |m| format!("{} bounce rate", format::percent(m.bounce_rate)),
    );
    push_section(
        &mut prompt,
        "Top Pages with Highest Number of Sessions",
        &metrics.top_pages_by_sessions,
        |m| format!("{} sessions", m.total_sessions),
    );
    push_section(
        &mut prompt,
        "Top Pages with Lowest Number of Sessions",
        &metrics.bottom_pages_by_sessions,
        |m| format!("{} sessions", m.total_sessions),
    );
    push_section(
        &mut prompt,
        "Average Session Durations by Session Medium",
        &metrics.session_durations_by_medium,
        |m| format!("{} average session duration", format::seconds(m.average_session_duration)),
    );

    prompt.push_str(RESPONSE_SCHEMA);
    prompt.push('\n');
    prompt
}

fn push_section<F>(prompt: &mut String, title: &str, metrics: &[AggregatedMetrics], value: F)
where
    F: Fn(&AggregatedMetrics) -> String,
{
    let _ = writeln!(prompt, "{}:", title);
    if metrics.is_empty() {
        prompt.push_str(NO_DATA);
    } else {
        for m in metrics {
            let _ = writeln!(prompt, "  - {}: {}", m.name, value(m));
        }
    }
    prompt.push('\n');
}
