//! HTML and plain-text report bodies.

use std::fmt::Write;

use super::EmailData;
use crate::format::escape_html;
use crate::llm::AggregatedMetricsWithInsight;

const STYLE: &str = "body{font-family:Arial,Helvetica,sans-serif;color:#222;max-width:720px;margin:0 auto;padding:16px}\
h1{font-size:22px}h2{font-size:17px;margin-top:28px;border-bottom:1px solid #ddd;padding-bottom:4px}\
table{border-collapse:collapse;width:100%}td,th{border:1px solid #ddd;padding:6px 8px;text-align:left}\
th{background:#f4f4f4}p.insight{background:#f7f9fc;border-left:3px solid #4a7bd0;padding:8px 12px}";

/// Render the HTML body. All model-provided text is escaped.
pub fn render_html(data: &EmailData) -> String {
    let overall = &data.insights.overall_metrics;
    let mut html = String::new();

    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>Website Metrics Insights</title>\n<style>{}</style>\n</head>\n<body>\n",
        STYLE
    );
    let _ = writeln!(html, "<p>Hello {},</p>", escape_html(&data.recipient_name));
    html.push_str("<h1>Website Metrics Insights</h1>\n");
    if let Some(period) = &data.period {
        let _ = writeln!(
            html,
            "<p>Reporting period: {}</p>",
            escape_html(&period.display())
        );
    }

    html.push_str("<h2>Overall Metrics</h2>\n");
    push_insight_html(&mut html, &overall.ai_insight);
    html.push_str("<table>\n<tr><th>Metric</th><th>Value</th></tr>\n");
    for (label, value) in [
        ("Overall Engagement Rate", &overall.overall_engagement_rate),
        ("Average Session Duration", &overall.average_session_duration),
        ("Bounce Rate", &overall.bounce_rate),
        ("Pages Per Session", &overall.pages_per_session),
        ("New User Percentage", &overall.new_user_percentage),
        ("Sessions Per User", &overall.session_per_user),
    ] {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            label,
            escape_html(value)
        );
    }
    html.push_str("</table>\n");

    for (title, section) in data.insights.sections() {
        push_section_html(&mut html, title, section);
    }

    html.push_str("<p>These insights were generated automatically from your analytics export.</p>\n");
    html.push_str("</body>\n</html>\n");
    html
}

fn push_insight_html(html: &mut String, insight: &str) {
    if !insight.trim().is_empty() {
        let _ = writeln!(html, "<p class=\"insight\">{}</p>", escape_html(insight));
    }
}

fn push_section_html(html: &mut String, title: &str, section: &AggregatedMetricsWithInsight) {
    let _ = writeln!(html, "<h2>{}</h2>", title);
    push_insight_html(html, &section.ai_insight);
    if section.aggregated_metrics.is_empty() {
        html.push_str("<p>No data available.</p>\n");
        return;
    }
    html.push_str("<table>\n<tr><th>Name</th><th>Value</th></tr>\n");
    for row in &section.aggregated_metrics {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td>{}</td></tr>",
            escape_html(&row.name),
            escape_html(row.value())
        );
    }
    html.push_str("</table>\n");
}

/// Render the plain-text alternative body.
pub fn render_text(data: &EmailData) -> String {
    let overall = &data.insights.overall_metrics;
    let mut text = String::new();

    let _ = writeln!(text, "Hello {},\n", data.recipient_name);
    text.push_str("Website Metrics Insights\n");
    if let Some(period) = &data.period {
        let _ = writeln!(text, "Reporting period: {}", period.display());
    }

    text.push_str("\nOverall Metrics\n");
    push_insight_text(&mut text, &overall.ai_insight);
    for (label, value) in [
        ("Overall Engagement Rate", &overall.overall_engagement_rate),
        ("Average Session Duration", &overall.average_session_duration),
        ("Bounce Rate", &overall.bounce_rate),
        ("Pages Per Session", &overall.pages_per_session),
        ("New User Percentage", &overall.new_user_percentage),
        ("Sessions Per User", &overall.session_per_user),
    ] {
        let _ = writeln!(text, "  - {}: {}", label, value);
    }

    for (title, section) in data.insights.sections() {
        let _ = writeln!(text, "\n{}", title);
        push_insight_text(&mut text, &section.ai_insight);
        if section.aggregated_metrics.is_empty() {
            text.push_str("  - No data available\n");
        }
        for row in &section.aggregated_metrics {
            let _ = writeln!(text, "  - {}: {}", row.name, row.value());
        }
    }

    text
}

fn push_insight_text(text: &mut String, insight: &str) {
    if !insight.trim().is_empty() {
        let _ = writeln!(text, "{}", insight.trim());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{AggregatedMetric, UserMetricsWithInsights};

    fn data() -> EmailData {
        let mut insights = UserMetricsWithInsights::default();
        insights.overall_metrics.bounce_rate = "35%".to_string();
        insights.overall_metrics.ai_insight = "Bounce <b>down</b> & engagement up".to_string();
        insights.bounce_rates_by_device = AggregatedMetricsWithInsight {
            ai_insight: "Mobile lags.".to_string(),
            aggregated_metrics: vec![AggregatedMetric {
                name: "mobile".to_string(),
                bounce_rate: "44%".to_string(),
                ..Default::default()
            }],
        };
        EmailData {
            recipient_name: "Sam".to_string(),
            period: None,
            insights,
        }
    }

    #[test]
    fn test_html_escapes_model_text() {
        let html = render_html(&data());
        assert!(html.contains("<p>Hello Sam,</p>"));
        assert!(html.contains("Bounce &lt;b&gt;down&lt;/b&gt; &amp; engagement up"));
        assert!(!html.contains("<b>down</b>"));
        assert!(html.contains("<tr><td>mobile</td><td>44%</td></tr>"));
        assert!(html.contains("<tr><td>Bounce Rate</td><td>35%</td></tr>"));
    }

    #[test]
    fn test_html_marks_empty_sections() {
        let html = render_html(&data());
        // every grouped section except devices is empty
        assert_eq!(html.matches("No data available.").count(), 5);
    }

    #[test]
    fn test_text_body() {
        let text = render_text(&data());
        assert!(text.starts_with("Hello Sam,"));
        assert!(text.contains("Bounce Rates by Device\nMobile lags.\n  - mobile: 44%"));
        assert!(text.contains("  - Bounce Rate: 35%"));
    }
}
