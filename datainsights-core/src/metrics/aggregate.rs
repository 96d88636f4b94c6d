//! Per-group aggregation.

use std::collections::BTreeMap;

use super::{parse_float, ratio};
use crate::types::{AggregatedMetrics, Breakdown, SessionRecord, NOT_SET};

/// Page view count that marks a session as a bounce.
const SINGLE_PAGE_VIEW: i64 = 1;

/// Group `records` by `breakdown` and compute statistics for every group
/// holding at least `threshold` records.
///
/// Groups keyed by [`NOT_SET`] are always dropped. The returned order is not
/// meaningful; sort with [`super::sort_by_field`] before slicing.
pub fn aggregate_by_breakdown(
    records: &[SessionRecord],
    breakdown: Breakdown,
    threshold: usize,
) -> Vec<AggregatedMetrics> {
    let mut groups: BTreeMap<&str, Vec<&SessionRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(breakdown.key(record)).or_default().push(record);
    }

    let total_groups = groups.len();
    let aggregated: Vec<AggregatedMetrics> = groups
        .into_iter()
        .filter(|(name, members)| members.len() >= threshold && *name != NOT_SET)
        .map(|(name, members)| fold_group(name, &members))
        .collect();

    tracing::debug!(
        breakdown = %breakdown,
        threshold,
        groups = total_groups,
        kept = aggregated.len(),
        "Aggregated records"
    );

    aggregated
}

fn fold_group(name: &str, members: &[&SessionRecord]) -> AggregatedMetrics {
    let mut engagement_rate_sum = 0.0;
    let mut engagement_duration: i64 = 0;
    let mut bounce_sessions: i64 = 0;
    let mut sessions: i64 = 0;
    let mut page_views: i64 = 0;
    let mut new_users: i64 = 0;
    let mut users: i64 = 0;

    for record in members {
        engagement_rate_sum += parse_float(&record.engagement_rate);
        engagement_duration += record.user_engagement_duration;
        if record.sessions > 0 && record.screen_page_views == SINGLE_PAGE_VIEW {
            bounce_sessions += record.sessions;
        }
        sessions += record.sessions;
        page_views += record.screen_page_views;
        new_users += record.new_users;
        users += record.total_users;
    }

    AggregatedMetrics {
        name: name.to_string(),
        average_engagement_rate: ratio(engagement_rate_sum, members.len() as f64),
        total_sessions: sessions,
        total_page_views: page_views,
        average_session_duration: ratio(engagement_duration as f64, sessions as f64),
        bounce_rate: ratio(bounce_sessions as f64, sessions as f64) * 100.0,
        total_new_users: new_users,
        total_users: users,
        average_engagement_duration: ratio(engagement_duration as f64, page_views as f64),
        data_point_count: members.len(),
    }
}
