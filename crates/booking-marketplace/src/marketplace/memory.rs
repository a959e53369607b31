use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard};

use super::domain::{Booking, BookingStatus, Category, CategoryId, Service, User, UserId};
use super::store::{
    CategoryTotals, DailyCount, EntityCounts, MarketplaceStore, ProviderEarnings, StatusTally,
    StoreError, WeekdayHourCount,
};

/// Snapshot of every table the analytics read.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceDataset {
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub services: Vec<Service>,
    pub bookings: Vec<Booking>,
}

/// Store backed by an in-process dataset, shared across request handlers.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMarketplaceStore {
    dataset: Arc<RwLock<MarketplaceDataset>>,
}

impl InMemoryMarketplaceStore {
    pub fn new(dataset: MarketplaceDataset) -> Self {
        Self {
            dataset: Arc::new(RwLock::new(dataset)),
        }
    }

    pub fn insert_user(&self, user: User) -> Result<(), StoreError> {
        self.mutate(|dataset| dataset.users.push(user))
    }

    fn mutate(&self, apply: impl FnOnce(&mut MarketplaceDataset)) -> Result<(), StoreError> {
        let mut guard = self
            .dataset
            .write()
            .map_err(|_| StoreError::Unavailable("dataset lock poisoned".to_string()))?;
        apply(&mut guard);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MarketplaceDataset>, StoreError> {
        self.dataset
            .read()
            .map_err(|_| StoreError::Unavailable("dataset lock poisoned".to_string()))
    }
}

fn within(ts: DateTime<Utc>, since: DateTime<Utc>, until: DateTime<Utc>) -> bool {
    ts >= since && ts <= until
}

impl MarketplaceStore for InMemoryMarketplaceStore {
    fn entity_counts(&self) -> Result<EntityCounts, StoreError> {
        let data = self.read()?;
        Ok(EntityCounts {
            users: data.users.len() as u64,
            providers: data.users.iter().filter(|user| user.is_provider()).count() as u64,
            services: data.services.len() as u64,
            bookings: data.bookings.len() as u64,
        })
    }

    fn provider_signups_by_day(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, StoreError> {
        let data = self.read()?;
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for user in data
            .users
            .iter()
            .filter(|user| user.is_provider() && within(user.created_at, since, until))
        {
            *per_day.entry(user.created_at.date_naive()).or_default() += 1;
        }

        Ok(per_day
            .into_iter()
            .map(|(day, count)| DailyCount { day, count })
            .collect())
    }

    fn completed_revenue_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<f64, StoreError> {
        let data = self.read()?;
        Ok(data
            .bookings
            .iter()
            .filter(|booking| booking.created_at >= start && booking.created_at < end)
            .map(Booking::earned)
            .sum())
    }

    fn completed_bookings_by_category(
        &self,
        limit: usize,
    ) -> Result<Vec<CategoryTotals>, StoreError> {
        let data = self.read()?;
        let category_of: HashMap<_, _> = data
            .services
            .iter()
            .map(|service| (service.id, service.category_id))
            .collect();

        let mut totals: HashMap<CategoryId, CategoryTotals> = HashMap::new();
        for booking in data.bookings.iter().filter(|b| b.status.is_completed()) {
            let Some(category_id) = category_of.get(&booking.service_id).copied() else {
                continue;
            };
            let entry = totals.entry(category_id).or_insert(CategoryTotals {
                category_id,
                bookings_count: 0,
                earnings: 0.0,
            });
            entry.bookings_count += 1;
            entry.earnings += booking.earned();
        }

        let mut rows: Vec<CategoryTotals> = totals.into_values().collect();
        rows.sort_by(|a, b| {
            b.bookings_count
                .cmp(&a.bookings_count)
                .then(a.category_id.cmp(&b.category_id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn category(&self, id: CategoryId) -> Result<Option<Category>, StoreError> {
        let data = self.read()?;
        Ok(data.categories.iter().find(|c| c.id == id).cloned())
    }

    fn top_providers_by_earnings(
        &self,
        limit: usize,
    ) -> Result<Vec<ProviderEarnings>, StoreError> {
        let data = self.read()?;
        let mut totals: HashMap<UserId, ProviderEarnings> = HashMap::new();
        for booking in data.bookings.iter().filter(|b| b.status.is_completed()) {
            let entry = totals
                .entry(booking.provider_id)
                .or_insert(ProviderEarnings {
                    provider_id: booking.provider_id,
                    earnings: 0.0,
                    completed_bookings: 0,
                });
            entry.earnings += booking.earned();
            entry.completed_bookings += 1;
        }

        let mut rows: Vec<ProviderEarnings> = totals.into_values().collect();
        rows.sort_by(|a, b| {
            b.earnings
                .total_cmp(&a.earnings)
                .then(a.provider_id.cmp(&b.provider_id))
        });
        rows.truncate(limit);
        Ok(rows)
    }

    fn user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let data = self.read()?;
        Ok(data.users.iter().find(|user| user.id == id).cloned())
    }

    fn bookings_by_weekday_hour(
        &self,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<WeekdayHourCount>, StoreError> {
        let data = self.read()?;
        let mut buckets: BTreeMap<(u32, u32), u64> = BTreeMap::new();
        for booking in data
            .bookings
            .iter()
            .filter(|booking| within(booking.created_at, since, until))
        {
            let key = (
                booking.created_at.weekday().number_from_monday(),
                booking.created_at.hour(),
            );
            *buckets.entry(key).or_default() += 1;
        }

        Ok(buckets
            .into_iter()
            .map(|((weekday, hour), bookings)| WeekdayHourCount {
                weekday,
                hour,
                bookings,
            })
            .collect())
    }

    fn booking_status_tally(&self) -> Result<StatusTally, StoreError> {
        let data = self.read()?;
        let mut tally = StatusTally::default();
        for booking in &data.bookings {
            match booking.status {
                BookingStatus::Completed => tally.completed += 1,
                BookingStatus::Canceled => tally.canceled += 1,
                _ => {}
            }
        }
        Ok(tally)
    }
}
