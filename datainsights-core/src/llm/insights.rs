//! Decoding of the LLM's insights reply.
//!
//! The reply mirrors [`UserMetrics`](crate::types::UserMetrics): the same
//! seven groupings, values rendered as text, plus an `ai_insight` string per
//! group. Fields the model leaves out decode as empty.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// Overall figures with the model's commentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverallMetricsWithInsight {
    pub overall_engagement_rate: String,
    pub average_session_duration: String,
    pub bounce_rate: String,
    pub pages_per_session: String,
    pub new_user_percentage: String,
    pub session_per_user: String,
    pub ai_insight: String,
}

/// One row of a grouped section; only the section's own metric is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatedMetric {
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub average_engagement_rate: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub bounce_rate: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub total_sessions: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub average_session_duration: String,
}

impl AggregatedMetric {
    /// The populated metric value of this row, if any.
    pub fn value(&self) -> &str {
        [
            &self.average_engagement_rate,
            &self.bounce_rate,
            &self.total_sessions,
            &self.average_session_duration,
        ]
        .into_iter()
        .find(|v| !v.is_empty())
        .map(String::as_str)
        .unwrap_or("")
    }
}

/// A grouped section with the model's commentary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregatedMetricsWithInsight {
    pub ai_insight: String,
    pub aggregated_metrics: Vec<AggregatedMetric>,
}

/// The full reply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserMetricsWithInsights {
    pub overall_metrics: OverallMetricsWithInsight,
    #[serde(rename = "top_5_countries_with_highest_engagement_rate")]
    pub top_countries_by_engagement_rate: AggregatedMetricsWithInsight,
    #[serde(rename = "top_5_countries_with_lowest_engagement_rate")]
    pub bottom_countries_by_engagement_rate: AggregatedMetricsWithInsight,
    #[serde(rename = "bounce_rates_by_devices")]
    pub bounce_rates_by_device: AggregatedMetricsWithInsight,
    #[serde(rename = "top_5_pages_with_highest_no_of_sessions")]
    pub top_pages_by_sessions: AggregatedMetricsWithInsight,
    #[serde(rename = "top_5_pages_with_lowest_no_of_sessions")]
    pub bottom_pages_by_sessions: AggregatedMetricsWithInsight,
    #[serde(rename = "average_session_durations_by_devices")]
    pub session_durations_by_medium: AggregatedMetricsWithInsight,
}

impl UserMetricsWithInsights {
    /// Grouped sections with their display titles, in report order.
    pub fn sections(&self) -> [(&'static str, &AggregatedMetricsWithInsight); 6] {
        [
            (
                "Countries with the Highest Engagement Rate",
                &self.top_countries_by_engagement_rate,
            ),
            (
                "Countries with the Lowest Engagement Rate",
                &self.bottom_countries_by_engagement_rate,
            ),
            ("Bounce Rates by Device", &self.bounce_rates_by_device),
            ("Pages with the Most Sessions", &self.top_pages_by_sessions),
            (
                "Pages with the Fewest Sessions",
                &self.bottom_pages_by_sessions,
            ),
            (
                "Average Session Duration by Medium",
                &self.session_durations_by_medium,
            ),
        ]
    }
}

/// Reply keys holding a grouped section.
const SECTION_KEYS: [&str; 6] = [
    "top_5_countries_with_highest_engagement_rate",
    "top_5_countries_with_lowest_engagement_rate",
    "bounce_rates_by_devices",
    "top_5_pages_with_highest_no_of_sessions",
    "top_5_pages_with_lowest_no_of_sessions",
    "average_session_durations_by_devices",
];

/// Decode the model's reply.
///
/// Accepts a bare JSON object, or one wrapped in prose or a fenced code block.
/// Every group present in the reply must be a JSON object; serde would
/// otherwise accept an array in its place.
pub fn parse_insights(raw: &str) -> Result<UserMetricsWithInsights> {
    let value = match serde_json::from_str::<Value>(raw.trim()) {
        Ok(value) if value.is_object() => value,
        direct => {
            if let Err(e) = direct {
                tracing::debug!(error = %e, "Reply was not bare JSON");
            }
            let extracted = extract_json_object(raw)?;
            serde_json::from_str(extracted)
                .map_err(|e| Error::Llm(format!("failed to decode insights reply: {}", e)))?
        }
    };

    check_shape(&value)?;
    serde_json::from_value(value)
        .map_err(|e| Error::Llm(format!("failed to decode insights reply: {}", e)))
}

fn check_shape(value: &Value) -> Result<()> {
    let reply = value
        .as_object()
        .ok_or_else(|| Error::Llm("insights reply is not a JSON object".to_string()))?;

    if let Some(overall) = reply.get("overall_metrics") {
        if !overall.is_object() {
            return Err(Error::Llm("overall_metrics must be an object".to_string()));
        }
    }

    for key in SECTION_KEYS {
        let Some(section) = reply.get(key) else {
            continue;
        };
        let section = section
            .as_object()
            .ok_or_else(|| Error::Llm(format!("{} must be an object", key)))?;
        if let Some(rows) = section.get("aggregated_metrics") {
            let rows = rows.as_array().ok_or_else(|| {
                Error::Llm(format!("{}.aggregated_metrics must be an array", key))
            })?;
            if !rows.iter().all(Value::is_object) {
                return Err(Error::Llm(format!(
                    "{}.aggregated_metrics rows must be objects",
                    key
                )));
            }
        }
    }
    Ok(())
}

fn extract_json_object(raw: &str) -> Result<&str> {
    let start = raw
        .find('{')
        .ok_or_else(|| Error::Llm("insights reply did not contain a JSON object".to_string()))?;
    let end = raw
        .rfind('}')
        .ok_or_else(|| Error::Llm("insights reply did not contain a JSON object".to_string()))?;
    if end <= start {
        return Err(Error::Llm("insights reply JSON bounds are invalid".to_string()));
    }
    Ok(&raw[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "overall_metrics": {
            "overall_engagement_rate": "61.2%",
            "average_session_duration": "48.1 seconds",
            "bounce_rate": "35%",
            "pages_per_session": "2.4",
            "new_user_percentage": "70%",
            "session_per_user": "1.1",
            "ai_insight": "Engagement is healthy."
        },
        "top_5_countries_with_highest_engagement_rate": {
            "ai_insight": "Turkey leads.",
            "aggregated_metrics": [
                {"name": "Turkey", "average_engagement_rate": "72%"}
            ]
        },
        "bounce_rates_by_devices": {
            "ai_insight": "Mobile bounces more.",
            "aggregated_metrics": [
                {"name": "mobile", "bounce_rate": "44%"},
                {"name": "desktop", "bounce_rate": "21%"}
            ]
        }
    }"#;

    #[test]
    fn test_parse_bare_reply() {
        let insights = parse_insights(REPLY).unwrap();
        assert_eq!(insights.overall_metrics.bounce_rate, "35%");
        assert_eq!(insights.top_countries_by_engagement_rate.ai_insight, "Turkey leads.");
        assert_eq!(insights.bounce_rates_by_device.aggregated_metrics.len(), 2);
        assert_eq!(insights.bounce_rates_by_device.aggregated_metrics[0].value(), "44%");
        // sections the model skipped decode as empty
        assert!(insights.top_pages_by_sessions.aggregated_metrics.is_empty());
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = format!("Here you go:\n```json\n{}\n```", REPLY);
        let insights = parse_insights(&raw).unwrap();
        assert_eq!(insights.overall_metrics.ai_insight, "Engagement is healthy.");
    }

    #[test]
    fn test_parse_rejects_text_without_json() {
        assert!(matches!(
            parse_insights("I cannot help with that."),
            Err(Error::Llm(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_shape() {
        let raw = r#"{"overall_metrics": ["not", "an", "object"]}"#;
        assert!(matches!(parse_insights(raw), Err(Error::Llm(_))));
    }

    #[test]
    fn test_parse_rejects_section_rows_as_arrays() {
        let raw = r#"{"bounce_rates_by_devices": {"aggregated_metrics": [["mobile", "44%"]]}}"#;
        assert!(matches!(parse_insights(raw), Err(Error::Llm(_))));

        let raw = r#"{"bounce_rates_by_devices": ["Mobile lags.", []]}"#;
        assert!(matches!(parse_insights(raw), Err(Error::Llm(_))));
    }

    #[test]
    fn test_parse_wrong_shape_inside_prose() {
        let raw = "Sure! {\"overall_metrics\": [\"a\"]} Hope that helps.";
        assert!(matches!(parse_insights(raw), Err(Error::Llm(_))));
    }

    #[test]
    fn test_sections_order() {
        let insights = UserMetricsWithInsights::default();
        let titles: Vec<_> = insights.sections().iter().map(|(t, _)| *t).collect();
        assert_eq!(titles.len(), 6);
        assert_eq!(titles[2], "Bounce Rates by Device");
    }

    #[test]
    fn test_row_value_empty_when_unset() {
        assert_eq!(AggregatedMetric::default().value(), "");
    }
}
