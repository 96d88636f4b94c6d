//! Core domain types for datainsights
//!
//! These types form the single data model shared by ingestion, the metrics
//! engine and the report pipeline.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **Session record** | One row of a web-analytics export (one JSON array element) |
//! | **Breakdown** | The record field used as the grouping key |
//! | **Group** | All records sharing one breakdown key value |
//! | **Data point** | A single session record folded into a group |
//! | **Bounce** | Sessions of a record that viewed exactly one page |

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Group key reported by analytics exports when a dimension has no value.
///
/// Groups keyed by this value are never reported.
pub const NOT_SET: &str = "(not set)";

// ============================================
// Session records
// ============================================

/// One per-session row from an analytics export file.
///
/// Field names follow the export's JSON keys. Absent keys decode to empty
/// strings or zero so one sparse row does not reject the whole file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRecord {
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "DeviceCategory")]
    pub device_category: String,
    /// Engagement rate as exported (a decimal number encoded as text)
    #[serde(rename = "EngagementRate")]
    pub engagement_rate: String,
    #[serde(rename = "LandingPage")]
    pub landing_page: String,
    #[serde(rename = "NewUsers")]
    pub new_users: i64,
    #[serde(rename = "ScreenPageViews")]
    pub screen_page_views: i64,
    #[serde(rename = "SessionMedium")]
    pub session_medium: String,
    #[serde(rename = "Sessions")]
    pub sessions: i64,
    #[serde(rename = "TotalUsers")]
    pub total_users: i64,
    /// Engagement duration in seconds
    #[serde(rename = "UserEngagementDuration")]
    pub user_engagement_duration: i64,
    #[serde(rename = "date")]
    pub date: String,
}

// ============================================
// Breakdowns
// ============================================

/// Record field used to group session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Breakdown {
    Country,
    DeviceCategory,
    LandingPage,
    SessionMedium,
}

impl Breakdown {
    /// Returns the grouping key this breakdown selects from a record.
    pub fn key<'a>(&self, record: &'a SessionRecord) -> &'a str {
        match self {
            Breakdown::Country => &record.country,
            Breakdown::DeviceCategory => &record.device_category,
            Breakdown::LandingPage => &record.landing_page,
            Breakdown::SessionMedium => &record.session_medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Breakdown::Country => "Country",
            Breakdown::DeviceCategory => "DeviceCategory",
            Breakdown::LandingPage => "LandingPage",
            Breakdown::SessionMedium => "SessionMedium",
        }
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================
// Sorting
// ============================================

/// Field of [`AggregatedMetrics`] a list can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    Name,
    AverageEngagementRate,
    TotalSessions,
    TotalPageViews,
    AverageSessionDuration,
    BounceRate,
    TotalNewUsers,
    TotalUsers,
    AverageEngagementDuration,
    DataPointCount,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::Name => "Name",
            SortField::AverageEngagementRate => "AverageEngagementRate",
            SortField::TotalSessions => "TotalSessions",
            SortField::TotalPageViews => "TotalPageViews",
            SortField::AverageSessionDuration => "AverageSessionDuration",
            SortField::BounceRate => "BounceRate",
            SortField::TotalNewUsers => "TotalNewUsers",
            SortField::TotalUsers => "TotalUsers",
            SortField::AverageEngagementDuration => "AverageEngagementDuration",
            SortField::DataPointCount => "DataPointCount",
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Name" => Ok(SortField::Name),
            "AverageEngagementRate" => Ok(SortField::AverageEngagementRate),
            "TotalSessions" => Ok(SortField::TotalSessions),
            "TotalPageViews" => Ok(SortField::TotalPageViews),
            "AverageSessionDuration" => Ok(SortField::AverageSessionDuration),
            "BounceRate" => Ok(SortField::BounceRate),
            "TotalNewUsers" => Ok(SortField::TotalNewUsers),
            "TotalUsers" => Ok(SortField::TotalUsers),
            "AverageEngagementDuration" => Ok(SortField::AverageEngagementDuration),
            "DataPointCount" => Ok(SortField::DataPointCount),
            _ => Err(format!("unknown sort field: {}", s)),
        }
    }
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ASC" | "asc" => Ok(SortOrder::Asc),
            "DESC" | "desc" => Ok(SortOrder::Desc),
            _ => Err(format!("unknown sort order: {}", s)),
        }
    }
}

// ============================================
// Metrics
// ============================================

/// Statistics for one group of records sharing a breakdown key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregatedMetrics {
    /// The group key (a country, device category, page or medium)
    pub name: String,
    /// Mean of the per-record engagement rates (not session-weighted)
    pub average_engagement_rate: f64,
    pub total_sessions: i64,
    pub total_page_views: i64,
    /// Engagement seconds per session
    pub average_session_duration: f64,
    /// Percentage (0-100) of sessions that viewed a single page
    pub bounce_rate: f64,
    pub total_new_users: i64,
    pub total_users: i64,
    /// Engagement seconds per page view
    pub average_engagement_duration: f64,
    /// Number of records folded into this group
    pub data_point_count: usize,
}

/// Dataset-wide statistics with no grouping.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverallMetrics {
    /// Session-weighted mean engagement rate (0.0-1.0)
    pub overall_engagement_rate: f64,
    pub average_session_duration: f64,
    pub bounce_rate: f64,
    pub pages_per_session: f64,
    pub new_user_percentage: f64,
    pub session_per_user: f64,
}

/// Everything computed from one export file, ready for prompting.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserMetrics {
    pub overall_metrics: OverallMetrics,
    pub top_countries_by_engagement_rate: Vec<AggregatedMetrics>,
    pub bottom_countries_by_engagement_rate: Vec<AggregatedMetrics>,
    /// Every device category, highest bounce rate first
    pub bounce_rates_by_device: Vec<AggregatedMetrics>,
    pub top_pages_by_sessions: Vec<AggregatedMetrics>,
    pub bottom_pages_by_sessions: Vec<AggregatedMetrics>,
    /// Every session medium, longest average session first
    pub session_durations_by_medium: Vec<AggregatedMetrics>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_record_deserializes_export_keys() {
        let json = r#"{
            "Country": "Turkey",
            "DeviceCategory": "mobile",
            "EngagementRate": "0.61",
            "LandingPage": "/pricing",
            "NewUsers": 3,
            "ScreenPageViews": 7,
            "SessionMedium": "organic",
            "Sessions": 4,
            "TotalUsers": 4,
            "UserEngagementDuration": 120,
            "date": "20240115"
        }"#;
        let record: SessionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.country, "Turkey");
        assert_eq!(record.engagement_rate, "0.61");
        assert_eq!(record.screen_page_views, 7);
        assert_eq!(record.user_engagement_duration, 120);
        assert_eq!(record.date, "20240115");
    }

    #[test]
    fn test_session_record_missing_keys_default() {
        let record: SessionRecord = serde_json::from_str(r#"{"Country": "US"}"#).unwrap();
        assert_eq!(record.country, "US");
        assert_eq!(record.sessions, 0);
        assert!(record.engagement_rate.is_empty());
    }

    #[test]
    fn test_breakdown_selects_key() {
        let record = SessionRecord {
            country: "FR".to_string(),
            device_category: "desktop".to_string(),
            landing_page: "/".to_string(),
            session_medium: "referral".to_string(),
            ..Default::default()
        };
        assert_eq!(Breakdown::Country.key(&record), "FR");
        assert_eq!(Breakdown::DeviceCategory.key(&record), "desktop");
        assert_eq!(Breakdown::LandingPage.key(&record), "/");
        assert_eq!(Breakdown::SessionMedium.key(&record), "referral");
    }

    #[test]
    fn test_sort_field_round_trips_names() {
        for field in [
            SortField::Name,
            SortField::BounceRate,
            SortField::DataPointCount,
            SortField::AverageEngagementDuration,
        ] {
            assert_eq!(field.as_str().parse::<SortField>(), Ok(field));
        }
        assert!("Bogus".parse::<SortField>().is_err());
    }

    #[test]
    fn test_sort_order_parse() {
        assert_eq!("DESC".parse::<SortOrder>(), Ok(SortOrder::Desc));
        assert_eq!("asc".parse::<SortOrder>(), Ok(SortOrder::Asc));
        assert!("sideways".parse::<SortOrder>().is_err());
    }
}
