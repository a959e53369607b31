use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use super::calendar::{ReportWindow, YearMonth};
use super::report::{
    CategoryDistributionItem, DashboardComputation, HeatmapPoint, LeaderboardItem,
    MonthlyRevenuePoint, ProviderGrowthPoint, CATEGORY_LIMIT, GROWTH_DAYS, REVENUE_MONTHS,
};
use super::scoring::hybrid_score;
use crate::marketplace::store::{MarketplaceStore, StatusTally, StoreError};

/// Providers considered for the leaderboard, taken by completed earnings.
pub const LEADERBOARD_CANDIDATES: usize = 50;

/// Runs the dashboard queries against a store as of an explicit `now`.
pub struct AggregationEngine<S> {
    store: Arc<S>,
}

impl<S> AggregationEngine<S>
where
    S: MarketplaceStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn compute(&self, now: DateTime<Utc>) -> Result<DashboardComputation, StoreError> {
        let counts = self.store.entity_counts()?;
        debug!(?counts, "entity counts loaded");

        let window = ReportWindow::trailing_days(now, GROWTH_DAYS as u32);
        let provider_growth = self.provider_growth(&window)?;
        let monthly_revenue = self.monthly_revenue(now)?;
        let categories = self.category_distribution()?;
        let leaderboard_candidates = self.leaderboard_candidates()?;
        let heatmap = self.heatmap(&window)?;
        let cancellation_rate = cancellation_rate(self.store.booking_status_tally()?);

        debug!(
            categories = categories.len(),
            candidates = leaderboard_candidates.len(),
            heatmap_buckets = heatmap.len(),
            cancellation_rate,
            "dashboard views computed"
        );

        Ok(DashboardComputation {
            counts,
            provider_growth,
            monthly_revenue,
            categories,
            leaderboard_candidates,
            heatmap,
            cancellation_rate,
        })
    }

    fn provider_growth(&self, window: &ReportWindow) -> Result<Vec<ProviderGrowthPoint>, StoreError> {
        let per_day: HashMap<_, _> = self
            .store
            .provider_signups_by_day(window.start, window.end)?
            .into_iter()
            .map(|row| (row.day, row.count))
            .collect();

        Ok(window
            .days()
            .into_iter()
            .map(|date| ProviderGrowthPoint {
                date,
                new_providers: per_day.get(&date).copied().unwrap_or(0),
            })
            .collect())
    }

    fn monthly_revenue(&self, now: DateTime<Utc>) -> Result<Vec<MonthlyRevenuePoint>, StoreError> {
        YearMonth::trailing(now, REVENUE_MONTHS as u32)
            .into_iter()
            .map(|month| {
                let total_earnings = self
                    .store
                    .completed_revenue_between(month.first_instant(), month.next().first_instant())?;
                Ok(MonthlyRevenuePoint {
                    year: month.year,
                    month: month.month,
                    total_earnings,
                })
            })
            .collect()
    }

    fn category_distribution(&self) -> Result<Vec<CategoryDistributionItem>, StoreError> {
        self.store
            .completed_bookings_by_category(CATEGORY_LIMIT)?
            .into_iter()
            .map(|row| {
                let category_name = self.store.category(row.category_id)?.map(|c| c.name);
                if category_name.is_none() {
                    warn!(category_id = %row.category_id, "category lookup failed; reporting without name");
                }
                Ok(CategoryDistributionItem {
                    category_id: row.category_id,
                    category_name,
                    bookings_count: row.bookings_count,
                    earnings: row.earnings,
                })
            })
            .collect()
    }

    /// Scores the earnings-ranked candidate set. Providers outside it are never ranked.
    fn leaderboard_candidates(&self) -> Result<Vec<LeaderboardItem>, StoreError> {
        let rows = self
            .store
            .top_providers_by_earnings(LEADERBOARD_CANDIDATES)?;
        let max_earnings = rows.iter().map(|row| row.earnings).fold(0.0, f64::max);

        rows.into_iter()
            .map(|row| {
                let provider = self.store.user(row.provider_id)?;
                if provider.is_none() {
                    warn!(provider_id = %row.provider_id, "provider lookup failed; scoring without ratings");
                }
                let avg_rating = provider.as_ref().map(|p| p.rating()).unwrap_or(0.0);
                let rating_count = provider.as_ref().map(|p| p.ratings()).unwrap_or(0);

                Ok(LeaderboardItem {
                    provider_id: row.provider_id,
                    provider_name: provider.map(|p| p.name),
                    avg_rating,
                    rating_count,
                    total_earnings: row.earnings,
                    completed_bookings: row.completed_bookings,
                    score: hybrid_score(avg_rating, rating_count, row.earnings, max_earnings),
                })
            })
            .collect()
    }

    fn heatmap(&self, window: &ReportWindow) -> Result<Vec<HeatmapPoint>, StoreError> {
        Ok(self
            .store
            .bookings_by_weekday_hour(window.start, window.end)?
            .into_iter()
            .map(|bucket| HeatmapPoint {
                weekday: bucket.weekday,
                hour: bucket.hour,
                bookings: bucket.bookings,
            })
            .collect())
    }
}

/// Canceled share of completed-or-canceled bookings, in percent. Zero when
/// neither status has been recorded.
pub fn cancellation_rate(tally: StatusTally) -> f64 {
    let decided = tally.completed + tally.canceled;
    if decided == 0 {
        0.0
    } else {
        tally.canceled as f64 / decided as f64 * 100.0
    }
}
