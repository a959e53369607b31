use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::marketplace::domain::{CategoryId, UserId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderGrowthPoint {
    pub date: NaiveDate,
    pub new_providers: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenuePoint {
    pub year: i32,
    pub month: u32,
    pub total_earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryDistributionItem {
    pub category_id: CategoryId,
    pub category_name: Option<String>,
    pub bookings_count: u64,
    pub earnings: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardItem {
    pub provider_id: UserId,
    pub provider_name: Option<String>,
    pub avg_rating: f64,
    pub rating_count: u32,
    pub total_earnings: f64,
    pub completed_bookings: u64,
    /// Hybrid score used for ranking.
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeatmapPoint {
    /// ISO weekday, 1 = Monday through 7 = Sunday.
    pub weekday: u32,
    pub hour: u32,
    pub bookings: u64,
}

/// Composite admin dashboard payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminAdvancedResponse {
    pub total_users: u64,
    pub total_providers: u64,
    pub total_services: u64,
    pub total_bookings: u64,
    pub provider_growth_last_30_days: Vec<ProviderGrowthPoint>,
    pub monthly_revenue_last_12_months: Vec<MonthlyRevenuePoint>,
    pub category_distribution: Vec<CategoryDistributionItem>,
    pub provider_leaderboard: Vec<LeaderboardItem>,
    pub bookings_heatmap: Vec<HeatmapPoint>,
    pub cancellation_rate_percent: f64,
}
