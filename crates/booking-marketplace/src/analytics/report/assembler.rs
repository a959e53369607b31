use std::collections::HashSet;

use super::views::{
    AdminAdvancedResponse, CategoryDistributionItem, HeatmapPoint, LeaderboardItem,
    MonthlyRevenuePoint, ProviderGrowthPoint,
};
use crate::marketplace::store::EntityCounts;

pub const GROWTH_DAYS: usize = 30;
pub const REVENUE_MONTHS: usize = 12;
pub const CATEGORY_LIMIT: usize = 20;
pub const LEADERBOARD_LIMIT: usize = 20;

/// Raw engine output before ordering and truncation.
#[derive(Debug, Clone, Default)]
pub struct DashboardComputation {
    pub counts: EntityCounts,
    pub provider_growth: Vec<ProviderGrowthPoint>,
    pub monthly_revenue: Vec<MonthlyRevenuePoint>,
    pub categories: Vec<CategoryDistributionItem>,
    pub leaderboard_candidates: Vec<LeaderboardItem>,
    pub heatmap: Vec<HeatmapPoint>,
    pub cancellation_rate: f64,
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ReportShapeError {
    #[error("{series} series has {actual} points, expected {expected}")]
    SeriesLength {
        series: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("{series} series is not in consecutive order")]
    SeriesOrder { series: &'static str },
    #[error("heatmap bucket ({weekday}, {hour}) is out of range or repeated")]
    HeatmapBucket { weekday: u32, hour: u32 },
}

/// Shape engine output into the dashboard payload without recomputing any figure.
pub fn assemble(
    computation: DashboardComputation,
) -> Result<AdminAdvancedResponse, ReportShapeError> {
    let DashboardComputation {
        counts,
        provider_growth,
        monthly_revenue,
        mut categories,
        leaderboard_candidates,
        heatmap,
        cancellation_rate,
    } = computation;

    check_length("provider_growth", &provider_growth, GROWTH_DAYS)?;
    if provider_growth
        .windows(2)
        .any(|pair| pair[0].date.succ_opt() != Some(pair[1].date))
    {
        return Err(ReportShapeError::SeriesOrder {
            series: "provider_growth",
        });
    }

    check_length("monthly_revenue", &monthly_revenue, REVENUE_MONTHS)?;
    if monthly_revenue.windows(2).any(|pair| {
        let (prev, next) = (&pair[0], &pair[1]);
        let expected = if prev.month == 12 {
            (prev.year + 1, 1)
        } else {
            (prev.year, prev.month + 1)
        };
        (next.year, next.month) != expected
    }) {
        return Err(ReportShapeError::SeriesOrder {
            series: "monthly_revenue",
        });
    }

    categories.sort_by(|a, b| {
        b.bookings_count
            .cmp(&a.bookings_count)
            .then(a.category_id.cmp(&b.category_id))
    });
    categories.truncate(CATEGORY_LIMIT);

    let provider_leaderboard = rank_leaderboard(leaderboard_candidates);
    let bookings_heatmap = sparse_heatmap(heatmap)?;

    Ok(AdminAdvancedResponse {
        total_users: counts.users,
        total_providers: counts.providers,
        total_services: counts.services,
        total_bookings: counts.bookings,
        provider_growth_last_30_days: provider_growth,
        monthly_revenue_last_12_months: monthly_revenue,
        category_distribution: categories,
        provider_leaderboard,
        bookings_heatmap,
        cancellation_rate_percent: round_to_cents(cancellation_rate),
    })
}

fn check_length<T>(
    series: &'static str,
    points: &[T],
    expected: usize,
) -> Result<(), ReportShapeError> {
    if points.len() == expected {
        Ok(())
    } else {
        Err(ReportShapeError::SeriesLength {
            series,
            expected,
            actual: points.len(),
        })
    }
}

/// Stable sort keeps earnings order among equal scores.
fn rank_leaderboard(mut candidates: Vec<LeaderboardItem>) -> Vec<LeaderboardItem> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(LEADERBOARD_LIMIT);
    candidates
}

fn sparse_heatmap(points: Vec<HeatmapPoint>) -> Result<Vec<HeatmapPoint>, ReportShapeError> {
    let mut seen = HashSet::new();
    let mut sparse = Vec::with_capacity(points.len());
    for point in points {
        if point.bookings == 0 {
            continue;
        }
        let in_range = (1..=7).contains(&point.weekday) && point.hour < 24;
        if !in_range || !seen.insert((point.weekday, point.hour)) {
            return Err(ReportShapeError::HeatmapBucket {
                weekday: point.weekday,
                hour: point.hour,
            });
        }
        sparse.push(point);
    }
    Ok(sparse)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
