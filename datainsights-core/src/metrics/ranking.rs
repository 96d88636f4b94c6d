//! Sorting and top/bottom slicing of aggregated groups.

use std::cmp::Ordering;

use crate::types::{AggregatedMetrics, SortField, SortOrder};

/// Sort `metrics` in place by `field`.
///
/// The sort is stable: groups with equal values keep their relative order.
pub fn sort_by_field(metrics: &mut [AggregatedMetrics], field: SortField, order: SortOrder) {
    metrics.sort_by(|a, b| {
        let ordering = compare(a, b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Sort by textual field and order names (`"BounceRate"`, `"DESC"`).
///
/// An unknown field or order leaves `metrics` untouched.
pub fn sort_by_field_name(metrics: &mut [AggregatedMetrics], field: &str, order: &str) {
    match (field.parse::<SortField>(), order.parse::<SortOrder>()) {
        (Ok(field), Ok(order)) => sort_by_field(metrics, field, order),
        (field, order) => {
            tracing::debug!(
                field_ok = field.is_ok(),
                order_ok = order.is_ok(),
                "Ignoring sort with unknown field or order"
            );
        }
    }
}

fn compare(a: &AggregatedMetrics, b: &AggregatedMetrics, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::AverageEngagementRate => {
            a.average_engagement_rate.total_cmp(&b.average_engagement_rate)
        }
        SortField::TotalSessions => a.total_sessions.cmp(&b.total_sessions),
        SortField::TotalPageViews => a.total_page_views.cmp(&b.total_page_views),
        SortField::AverageSessionDuration => a
            .average_session_duration
            .total_cmp(&b.average_session_duration),
        SortField::BounceRate => a.bounce_rate.total_cmp(&b.bounce_rate),
        SortField::TotalNewUsers => a.total_new_users.cmp(&b.total_new_users),
        SortField::TotalUsers => a.total_users.cmp(&b.total_users),
        SortField::AverageEngagementDuration => a
            .average_engagement_duration
            .total_cmp(&b.average_engagement_duration),
        SortField::DataPointCount => a.data_point_count.cmp(&b.data_point_count),
    }
}

/// First `n` elements of an already sorted slice (fewer if the slice is shorter).
pub fn top_elements<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[..n.min(items.len())].to_vec()
}

/// Last `n` elements of an already sorted slice, in slice order.
///
/// For a descending list the tail stays descending: `[A, B, C, D, E]` with
/// `n = 2` yields `[D, E]`.
pub fn bottom_elements<T: Clone>(items: &[T], n: usize) -> Vec<T> {
    items[items.len().saturating_sub(n)..].to_vec()
}
