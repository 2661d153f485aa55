use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    database_id::DatabaseId,
    db::{list_from_json_column, list_to_json},
};

/// Database identifier for an insurance provider.
pub type ProviderId = DatabaseId;

/// An insurer. Providers are shared by every user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceProvider {
    /// The ID of the provider.
    pub id: ProviderId,
    /// The provider's trading name.
    pub name: String,
    /// Average review score out of five, if rated.
    pub rating: Option<f64>,
    /// How many reviews the rating is based on.
    pub reviews_count: i64,
    /// The kinds of cover offered, e.g. "lifetime".
    pub coverage_types: Vec<String>,
    /// Whether the provider is currently offering quotes.
    pub is_active: bool,
}

/// The columns selected for a provider, in the order [map_provider_row] expects.
pub const PROVIDER_COLUMNS: &str = "id, name, rating, reviews_count, coverage_types, is_active";

/// Add a provider. `provider.id` is ignored.
pub fn create_provider(
    provider: &InsuranceProvider,
    connection: &Connection,
) -> Result<InsuranceProvider, Error> {
    let coverage_types = list_to_json(&provider.coverage_types)?;

    let created = connection
        .prepare(&format!(
            "INSERT INTO insurance_provider (name, rating, reviews_count, coverage_types, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5)
             RETURNING {PROVIDER_COLUMNS}"
        ))?
        .query_row(
            (
                &provider.name,
                provider.rating,
                provider.reviews_count,
                coverage_types,
                provider.is_active,
            ),
            map_provider_row,
        )?;

    Ok(created)
}

/// Initialize the insurance provider table.
pub fn create_provider_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS insurance_provider (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            rating REAL,
            reviews_count INTEGER NOT NULL DEFAULT 0,
            coverage_types TEXT NOT NULL DEFAULT '[]',
            is_active INTEGER NOT NULL DEFAULT 1
        );",
    )?;

    Ok(())
}

/// Map a database row to an [InsuranceProvider].
pub fn map_provider_row(row: &Row) -> Result<InsuranceProvider, rusqlite::Error> {
    Ok(InsuranceProvider {
        id: row.get(0)?,
        name: row.get(1)?,
        rating: row.get(2)?,
        reviews_count: row.get(3)?,
        coverage_types: list_from_json_column(row, 4)?,
        is_active: row.get(5)?,
    })
}
