use booking_marketplace::error::AppError;
use booking_marketplace::marketplace::{
    DatasetImporter, InMemoryMarketplaceStore, MarketplaceDataset,
};
use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Where the in-memory store gets its rows from at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DatasetSource {
    Directory,
    Demo,
    Empty,
}

pub(crate) fn load_store(
    data_dir: Option<&Path>,
    demo_data: bool,
    now: DateTime<Utc>,
) -> Result<(InMemoryMarketplaceStore, DatasetSource), AppError> {
    let (dataset, source) = match data_dir {
        Some(dir) => (DatasetImporter::from_dir(dir)?, DatasetSource::Directory),
        None if demo_data => (crate::demo::synthetic_marketplace(now), DatasetSource::Demo),
        None => (MarketplaceDataset::default(), DatasetSource::Empty),
    };

    info!(
        ?source,
        users = dataset.users.len(),
        bookings = dataset.bookings.len(),
        "marketplace store seeded"
    );

    Ok((InMemoryMarketplaceStore::new(dataset), source))
}
