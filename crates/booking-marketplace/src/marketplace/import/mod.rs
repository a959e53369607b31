mod parser;

use std::fs::File;
use std::io::Read;
use std::path::Path;

use tracing::info;

use super::memory::MarketplaceDataset;
use parser::{BookingRow, CategoryRow, IntoEntity, ParseFailure, ServiceRow, UserRow};

pub const USERS_FILE: &str = "users.csv";
pub const CATEGORIES_FILE: &str = "categories.csv";
pub const SERVICES_FILE: &str = "services.csv";
pub const BOOKINGS_FILE: &str = "bookings.csv";

#[derive(Debug)]
pub enum DatasetImportError {
    Io {
        file: String,
        source: std::io::Error,
    },
    Csv {
        file: String,
        source: csv::Error,
    },
    InvalidRow {
        file: String,
        line: u64,
        reason: String,
    },
}

impl std::fmt::Display for DatasetImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetImportError::Io { file, source } => {
                write!(f, "failed to read {}: {}", file, source)
            }
            DatasetImportError::Csv { file, source } => {
                write!(f, "invalid CSV data in {}: {}", file, source)
            }
            DatasetImportError::InvalidRow { file, line, reason } => {
                write!(f, "{} line {}: {}", file, line, reason)
            }
        }
    }
}

impl std::error::Error for DatasetImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetImportError::Io { source, .. } => Some(source),
            DatasetImportError::Csv { source, .. } => Some(source),
            DatasetImportError::InvalidRow { .. } => None,
        }
    }
}

/// Raw CSV sources for each table.
pub struct DatasetSources<U, C, S, B> {
    pub users: U,
    pub categories: C,
    pub services: S,
    pub bookings: B,
}

pub struct DatasetImporter;

impl DatasetImporter {
    /// Load `users.csv`, `categories.csv`, `services.csv`, and `bookings.csv` from `dir`.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<MarketplaceDataset, DatasetImportError> {
        let dir = dir.as_ref();
        let open = |name: &str| {
            File::open(dir.join(name)).map_err(|source| DatasetImportError::Io {
                file: name.to_string(),
                source,
            })
        };

        let dataset = Self::from_readers(DatasetSources {
            users: open(USERS_FILE)?,
            categories: open(CATEGORIES_FILE)?,
            services: open(SERVICES_FILE)?,
            bookings: open(BOOKINGS_FILE)?,
        })?;

        info!(
            dir = %dir.display(),
            users = dataset.users.len(),
            categories = dataset.categories.len(),
            services = dataset.services.len(),
            bookings = dataset.bookings.len(),
            "marketplace dataset imported"
        );

        Ok(dataset)
    }

    pub fn from_readers<U, C, S, B>(
        sources: DatasetSources<U, C, S, B>,
    ) -> Result<MarketplaceDataset, DatasetImportError>
    where
        U: Read,
        C: Read,
        S: Read,
        B: Read,
    {
        Ok(MarketplaceDataset {
            users: load::<_, UserRow>(USERS_FILE, sources.users)?,
            categories: load::<_, CategoryRow>(CATEGORIES_FILE, sources.categories)?,
            services: load::<_, ServiceRow>(SERVICES_FILE, sources.services)?,
            bookings: load::<_, BookingRow>(BOOKINGS_FILE, sources.bookings)?,
        })
    }
}

fn load<R, Row>(file: &str, reader: R) -> Result<Vec<Row::Entity>, DatasetImportError>
where
    R: Read,
    Row: IntoEntity,
{
    parser::parse_rows::<R, Row>(reader).map_err(|failure| match failure {
        ParseFailure::Csv(source) => DatasetImportError::Csv {
            file: file.to_string(),
            source,
        },
        ParseFailure::Row(row) => DatasetImportError::InvalidRow {
            file: file.to_string(),
            line: row.line,
            reason: row.reason,
        },
    })
}
