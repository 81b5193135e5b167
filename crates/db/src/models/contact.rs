use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};
use thiserror::Error;
use ts_rs::TS;

/// Text layout of `created_at` / `updated_at` in the contacts table.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

pub const DEFAULT_PAGE_LIMIT: i64 = 50;
pub const MAX_PAGE_LIMIT: i64 = 100;

#[derive(Debug, Error)]
pub enum RecordMapError {
    #[error("invalid {field} timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum ContactDbError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Mapping(#[from] RecordMapError),
}

/// A contact exactly as stored: flat columns, timestamps as text.
#[derive(Debug, Clone, FromRow, PartialEq, Eq)]
pub struct ContactRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A contact submission as exposed over the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a submission that has already passed validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, TS)]
pub struct CreateContact {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Parse a stored timestamp. Accepts SQLite `datetime` text with or
/// without fractional seconds (space or `T` separated, assumed UTC) and
/// RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|ts| ts.with_timezone(&Utc))
        })
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

impl TryFrom<ContactRow> for Contact {
    type Error = RecordMapError;

    fn try_from(row: ContactRow) -> Result<Self, Self::Error> {
        let created_at =
            parse_timestamp(&row.created_at).ok_or(RecordMapError::InvalidTimestamp {
                field: "created_at",
                value: row.created_at.clone(),
            })?;
        let updated_at =
            parse_timestamp(&row.updated_at).ok_or(RecordMapError::InvalidTimestamp {
                field: "updated_at",
                value: row.updated_at.clone(),
            })?;

        Ok(Contact {
            id: row.id,
            name: row.name,
            email: row.email,
            message: row.message,
            created_at,
            updated_at,
        })
    }
}

impl From<&Contact> for ContactRow {
    fn from(contact: &Contact) -> Self {
        ContactRow {
            id: contact.id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            message: contact.message.clone(),
            created_at: format_timestamp(&contact.created_at),
            updated_at: format_timestamp(&contact.updated_at),
        }
    }
}

/// Limit/offset window over the contact listing, already clamped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    limit: i64,
    offset: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            offset: 0,
        }
    }
}

impl Pagination {
    /// Missing or non-positive limits fall back to the default, oversized
    /// ones are capped; missing or negative offsets become zero.
    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        let limit = match limit {
            Some(limit) if limit > MAX_PAGE_LIMIT => MAX_PAGE_LIMIT,
            Some(limit) if limit > 0 => limit,
            _ => DEFAULT_PAGE_LIMIT,
        };
        let offset = offset.filter(|offset| *offset >= 0).unwrap_or(0);
        Self { limit, offset }
    }

    /// Same rules as [`Pagination::new`], with unparsable values treated as absent.
    pub fn from_query(limit: Option<&str>, offset: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|value| value.trim().parse::<i64>().ok());
        Self::new(parse(limit), parse(offset))
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Contact {
    pub async fn create(
        pool: &SqlitePool,
        data: &CreateContact,
        now: DateTime<Utc>,
    ) -> Result<Self, ContactDbError> {
        let timestamp = format_timestamp(&now);
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            INSERT INTO contacts (name, email, message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, message, created_at, updated_at
            "#,
        )
        .bind(&data.name)
        .bind(&data.email)
        .bind(&data.message)
        .bind(&timestamp)
        .bind(&timestamp)
        .fetch_one(pool)
        .await?;

        Ok(Contact::try_from(row)?)
    }

    /// Most recent first; rows sharing a `created_at` are ordered by id.
    pub async fn find_page<'e, E>(
        executor: E,
        pagination: Pagination,
    ) -> Result<Vec<Self>, ContactDbError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, message, created_at, updated_at
            FROM contacts
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(executor)
        .await?;

        rows.into_iter()
            .map(|row| Contact::try_from(row).map_err(ContactDbError::from))
            .collect()
    }

    pub async fn count<'e, E>(executor: E) -> Result<i64, ContactDbError>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM contacts")
            .fetch_one(executor)
            .await?;
        Ok(total)
    }

    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, ContactDbError> {
        let row = sqlx::query_as::<_, ContactRow>(
            r#"
            SELECT id, name, email, message, created_at, updated_at
            FROM contacts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Contact::try_from).transpose()?)
    }

    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, ContactDbError> {
        let result = sqlx::query("DELETE FROM contacts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
