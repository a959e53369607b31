use std::sync::Arc;

use axum::response::Response;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

use crate::analytics::service::AdminDashboardService;
use crate::marketplace::domain::{
    Booking, BookingId, BookingStatus, Category, CategoryId, Service, ServiceId, User, UserId,
    UserRole,
};
use crate::marketplace::memory::{InMemoryMarketplaceStore, MarketplaceDataset};
use crate::marketplace::store::{
    CategoryTotals, DailyCount, EntityCounts, MarketplaceStore, ProviderEarnings, StatusTally,
    StoreError, WeekdayHourCount,
};

/// Friday, 2024-03-15 12:00 UTC.
pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
        .single()
        .expect("valid reference time")
}

pub(super) fn days_ago(days: i64) -> DateTime<Utc> {
    now() - Duration::days(days)
}

pub(super) fn user(id: i64, role: UserRole, created_at: DateTime<Utc>) -> User {
    User {
        id: UserId(id),
        name: format!("User {id}"),
        email: format!("user{id}@example.com"),
        role,
        created_at,
        avg_rating: None,
        rating_count: None,
    }
}

pub(super) fn rated_provider(id: i64, avg_rating: f64, rating_count: u32) -> User {
    User {
        avg_rating: Some(avg_rating),
        rating_count: Some(rating_count),
        ..user(id, UserRole::Provider, days_ago(200))
    }
}

pub(super) fn booking(
    id: i64,
    status: BookingStatus,
    amount: f64,
    created_at: DateTime<Utc>,
    provider: i64,
    service: i64,
) -> Booking {
    Booking {
        id: BookingId(id),
        status,
        amount: Some(amount),
        created_at,
        provider_id: UserId(provider),
        service_id: ServiceId(service),
    }
}

/// Two categories, three services (one pointing at a deleted category).
pub(super) fn catalog() -> (Vec<Category>, Vec<Service>) {
    let categories = vec![
        Category {
            id: CategoryId(1),
            name: "Cleaning".to_string(),
        },
        Category {
            id: CategoryId(2),
            name: "Plumbing".to_string(),
        },
    ];
    let services = vec![
        Service {
            id: ServiceId(10),
            name: "Deep clean".to_string(),
            category_id: CategoryId(1),
        },
        Service {
            id: ServiceId(20),
            name: "Leak repair".to_string(),
            category_id: CategoryId(2),
        },
        Service {
            id: ServiceId(30),
            name: "Legacy offering".to_string(),
            category_id: CategoryId(99),
        },
    ];
    (categories, services)
}

pub(super) fn store_with(dataset: MarketplaceDataset) -> Arc<InMemoryMarketplaceStore> {
    Arc::new(InMemoryMarketplaceStore::new(dataset))
}

pub(super) fn service_with(
    dataset: MarketplaceDataset,
) -> Arc<AdminDashboardService<InMemoryMarketplaceStore>> {
    Arc::new(AdminDashboardService::new(store_with(dataset)))
}

/// Store whose backend is always down.
pub(super) struct UnavailableStore;

impl UnavailableStore {
    fn down<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

impl MarketplaceStore for UnavailableStore {
    fn entity_counts(&self) -> Result<EntityCounts, StoreError> {
        Self::down()
    }

    fn provider_signups_by_day(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, StoreError> {
        Self::down()
    }

    fn completed_revenue_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<f64, StoreError> {
        Self::down()
    }

    fn completed_bookings_by_category(
        &self,
        _limit: usize,
    ) -> Result<Vec<CategoryTotals>, StoreError> {
        Self::down()
    }

    fn category(&self, _id: CategoryId) -> Result<Option<Category>, StoreError> {
        Self::down()
    }

    fn top_providers_by_earnings(
        &self,
        _limit: usize,
    ) -> Result<Vec<ProviderEarnings>, StoreError> {
        Self::down()
    }

    fn user(&self, _id: UserId) -> Result<Option<User>, StoreError> {
        Self::down()
    }

    fn bookings_by_weekday_hour(
        &self,
        _since: DateTime<Utc>,
        _until: DateTime<Utc>,
    ) -> Result<Vec<WeekdayHourCount>, StoreError> {
        Self::down()
    }

    fn booking_status_tally(&self) -> Result<StatusTally, StoreError> {
        Self::down()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
