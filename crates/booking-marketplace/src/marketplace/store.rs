use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::domain::{Category, CategoryId, User, UserId};

/// Headline totals, unfiltered by time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub users: u64,
    pub providers: u64,
    pub services: u64,
    pub bookings: u64,
}

/// Provider sign-ups bucketed by the calendar day of `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyCount {
    pub day: NaiveDate,
    pub count: u64,
}

/// Completed bookings grouped by the category of their service.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotals {
    pub category_id: CategoryId,
    pub bookings_count: u64,
    pub earnings: f64,
}

/// Completed-booking earnings for a single provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderEarnings {
    pub provider_id: UserId,
    pub earnings: f64,
    pub completed_bookings: u64,
}

/// Booking count for one ISO weekday (1 = Monday) and hour-of-day bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayHourCount {
    pub weekday: u32,
    pub hour: u32,
    pub bookings: u64,
}

/// Bookings in the two terminal statuses the cancellation rate looks at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusTally {
    pub completed: u64,
    pub canceled: u64,
}

/// Read-only query surface over users, bookings, services, and categories.
///
/// Each method maps to one grouped query; implementations own the grouping,
/// filtering, and aggregation so a relational backend can push them down.
/// Windows passed as `since`/`until` are inclusive on both ends.
pub trait MarketplaceStore: Send + Sync {
    fn entity_counts(&self) -> Result<EntityCounts, StoreError>;

    /// Provider sign-ups per day, only for days with at least one sign-up.
    fn provider_signups_by_day(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, StoreError>;

    /// Sum of completed booking amounts created in `[start, end)`.
    fn completed_revenue_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<f64, StoreError>;

    /// Categories ranked by completed booking count descending, ties by id ascending.
    fn completed_bookings_by_category(
        &self,
        limit: usize,
    ) -> Result<Vec<CategoryTotals>, StoreError>;

    fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError>;

    /// Providers ranked by completed earnings descending, ties by id ascending.
    fn top_providers_by_earnings(&self, limit: usize)
        -> Result<Vec<ProviderEarnings>, StoreError>;

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Non-empty weekday/hour buckets for bookings of any status.
    fn bookings_by_weekday_hour(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<WeekdayHourCount>, StoreError>;

    fn booking_status_tally(&self) -> Result<StatusTally, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("data store unavailable: {0}")]
    Unavailable(String),
}
