//! Terminal output for previews and run summaries.

use datainsights_core::format::{decimal, percent, rate_as_percent, seconds};
use datainsights_core::{AggregatedMetrics, FilePreview, RunSummary};

pub fn print_preview(preview: &FilePreview) {
    let metrics = &preview.metrics;
    let overall = &metrics.overall_metrics;

    println!("File: {}", preview.path.display());
    match &preview.period {
        Some(period) => println!("  Period: {}", period.display()),
        None => println!("  Period: (undated)"),
    }
    println!("  Records: {}", preview.record_count);

    println!("  Overall:");
    println!("      engagement rate: {}", rate_as_percent(overall.overall_engagement_rate));
    println!("      session duration: {}", seconds(overall.average_session_duration));
    println!("      bounce rate: {}", percent(overall.bounce_rate));
    println!("      pages per session: {}", decimal(overall.pages_per_session));
    println!("      new users: {}", percent(overall.new_user_percentage));
    println!("      sessions per user: {}", decimal(overall.session_per_user));

    print_group(
        "Top countries by engagement rate",
        &metrics.top_countries_by_engagement_rate,
        |m| rate_as_percent(m.average_engagement_rate),
    );
    print_group(
        "Bottom countries by engagement rate",
        &metrics.bottom_countries_by_engagement_rate,
        |m| rate_as_percent(m.average_engagement_rate),
    );
    print_group("Bounce rate by device", &metrics.bounce_rates_by_device, |m| {
        percent(m.bounce_rate)
    });
    print_group("Top pages by sessions", &metrics.top_pages_by_sessions, |m| {
        m.total_sessions.to_string()
    });
    print_group(
        "Bottom pages by sessions",
        &metrics.bottom_pages_by_sessions,
        |m| m.total_sessions.to_string(),
    );
    print_group(
        "Session duration by medium",
        &metrics.session_durations_by_medium,
        |m| seconds(m.average_session_duration),
    );
    println!();
}

fn print_group<F>(title: &str, rows: &[AggregatedMetrics], value: F)
where
    F: Fn(&AggregatedMetrics) -> String,
{
    println!("  {}:", title);
    if rows.is_empty() {
        println!("      (none above threshold)");
    }
    for row in rows {
        println!(
            "      {}: {} ({} records)",
            row.name,
            value(row),
            row.data_point_count
        );
    }
}

pub fn print_summary(summary: &RunSummary) {
    println!("Run complete:");
    println!("  Files discovered: {}", summary.files_discovered);
    println!("  Reports sent: {}", summary.reports_sent);
    if !summary.errors.is_empty() {
        println!("  Failed: {}", summary.errors.len());
        for (path, error) in &summary.errors {
            println!("    {}: {}", path.display(), error);
        }
    }
}
