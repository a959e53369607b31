use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use std::io::Read;

use crate::marketplace::domain::{
    Booking, BookingId, BookingStatus, Category, CategoryId, Service, ServiceId, User, UserId,
    UserRole,
};

/// A row that parsed as CSV but does not describe a valid entity.
#[derive(Debug)]
pub(crate) struct RowError {
    pub(crate) line: u64,
    pub(crate) reason: String,
}

pub(crate) enum ParseFailure {
    Csv(csv::Error),
    Row(RowError),
}

impl From<csv::Error> for ParseFailure {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

pub(crate) trait IntoEntity: DeserializeOwned {
    type Entity;

    fn into_entity(self) -> Result<Self::Entity, String>;
}

pub(crate) fn parse_rows<R, Row>(reader: R) -> Result<Vec<Row::Entity>, ParseFailure>
where
    R: Read,
    Row: IntoEntity,
{
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = csv_reader.headers()?.clone();
    let mut record = csv::StringRecord::new();
    let mut entities = Vec::new();

    while csv_reader.read_record(&mut record)? {
        let line = record.position().map(|pos| pos.line()).unwrap_or_default();
        let row: Row = record.deserialize(Some(&headers))?;
        let entity = row
            .into_entity()
            .map_err(|reason| ParseFailure::Row(RowError { line, reason }))?;
        entities.push(entity);
    }

    Ok(entities)
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRow {
    id: i64,
    name: String,
    #[serde(default)]
    email: String,
    role: String,
    created_at: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    avg_rating: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    rating_count: Option<String>,
}

impl IntoEntity for UserRow {
    type Entity = User;

    fn into_entity(self) -> Result<User, String> {
        let role = UserRole::parse(&self.role)
            .ok_or_else(|| format!("unknown role '{}' for user {}", self.role, self.id))?;
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("invalid created_at '{}'", self.created_at))?;
        let avg_rating = self
            .avg_rating
            .map(|raw| {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("invalid avg_rating '{raw}'"))?;
                if value < 0.0 || !value.is_finite() {
                    return Err(format!(
                        "avg_rating must be a finite, non-negative number, got {value}"
                    ));
                }
                Ok(value)
            })
            .transpose()?;
        let rating_count = self
            .rating_count
            .map(|raw| {
                raw.parse::<u32>()
                    .map_err(|_| format!("invalid rating_count '{raw}'"))
            })
            .transpose()?;

        Ok(User {
            id: UserId(self.id),
            name: self.name,
            email: self.email,
            role,
            created_at,
            avg_rating,
            rating_count,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRow {
    id: i64,
    name: String,
}

impl IntoEntity for CategoryRow {
    type Entity = Category;

    fn into_entity(self) -> Result<Category, String> {
        Ok(Category {
            id: CategoryId(self.id),
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceRow {
    id: i64,
    #[serde(default)]
    name: String,
    category_id: i64,
}

impl IntoEntity for ServiceRow {
    type Entity = Service;

    fn into_entity(self) -> Result<Service, String> {
        Ok(Service {
            id: ServiceId(self.id),
            name: self.name,
            category_id: CategoryId(self.category_id),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BookingRow {
    id: i64,
    status: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    amount: Option<String>,
    created_at: String,
    provider_id: i64,
    service_id: i64,
}

impl IntoEntity for BookingRow {
    type Entity = Booking;

    fn into_entity(self) -> Result<Booking, String> {
        let created_at = parse_timestamp(&self.created_at)
            .ok_or_else(|| format!("invalid created_at '{}'", self.created_at))?;
        let amount = match self.amount {
            Some(raw) => {
                let value = raw
                    .parse::<f64>()
                    .map_err(|_| format!("invalid amount '{raw}'"))?;
                if value < 0.0 || !value.is_finite() {
                    return Err(format!("amount must be non-negative, got {value}"));
                }
                Some(value)
            }
            None => None,
        };

        Ok(Booking {
            id: BookingId(self.id),
            status: BookingStatus::parse(&self.status),
            amount,
            created_at,
            provider_id: UserId(self.provider_id),
            service_id: ServiceId(self.service_id),
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (UTC), or a bare date (midnight UTC).
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
