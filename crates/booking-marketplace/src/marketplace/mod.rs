//! Marketplace entities and the read-side data store the analytics run against.

pub mod domain;
pub mod import;
pub mod memory;
pub mod store;

pub use domain::{
    Booking, BookingId, BookingStatus, Category, CategoryId, Service, ServiceId, User, UserId,
    UserRole,
};
pub use import::{DatasetImportError, DatasetImporter, DatasetSources};
pub use memory::{InMemoryMarketplaceStore, MarketplaceDataset};
pub use store::{
    CategoryTotals, DailyCount, EntityCounts, MarketplaceStore, ProviderEarnings, StatusTally,
    StoreError, WeekdayHourCount,
};
