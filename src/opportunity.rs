//! Suggested ways to spend less on a pet.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};

use crate::{
    Error, category::CategoryId, database_id::DatabaseId, pet::PetId, user::UserId,
};

/// Database identifier for a savings opportunity.
pub type OpportunityId = DatabaseId;

/// What the user did with a savings opportunity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityStatus {
    /// Not acted on yet.
    Pending,
    /// The user took up the suggestion.
    Applied,
    /// The user is not interested.
    Dismissed,
}

impl OpportunityStatus {
    fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Applied => "applied",
            Self::Dismissed => "dismissed",
        }
    }

    fn from_stored(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "applied" => Some(Self::Applied),
            "dismissed" => Some(Self::Dismissed),
            _ => None,
        }
    }
}

/// A suggestion such as switching pet food supplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsOpportunity {
    /// The ID of the opportunity.
    pub id: OpportunityId,
    /// The pet the suggestion is for.
    pub pet_id: Option<PetId>,
    /// The category of spend the suggestion affects.
    pub category_id: Option<CategoryId>,
    /// A short headline.
    pub title: String,
    /// How much could be saved, if known.
    pub potential_savings: Option<f64>,
    /// What the user did with it.
    pub status: OpportunityStatus,
}

/// The columns selected for an opportunity, in the order [map_opportunity_row] expects.
pub const OPPORTUNITY_COLUMNS: &str = "id, pet_id, category_id, title, potential_savings, status";

/// Create a savings opportunity for `owner`.
///
/// Opportunities are generated outside of the dashboard, this is used for seeding.
pub fn create_opportunity(
    opportunity: &SavingsOpportunity,
    owner: UserId,
    connection: &Connection,
) -> Result<SavingsOpportunity, Error> {
    let created = connection
        .prepare(&format!(
            "INSERT INTO savings_opportunity (user_id, pet_id, category_id, title, potential_savings, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {OPPORTUNITY_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                opportunity.pet_id,
                opportunity.category_id,
                &opportunity.title,
                opportunity.potential_savings,
                opportunity.status.as_str(),
            ),
            map_opportunity_row,
        )?;

    Ok(created)
}

/// Initialize the savings opportunity table.
pub fn create_opportunity_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS savings_opportunity (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            pet_id INTEGER,
            category_id INTEGER,
            title TEXT NOT NULL,
            potential_savings REAL,
            status TEXT NOT NULL DEFAULT 'pending',
            FOREIGN KEY(pet_id) REFERENCES pet(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL
        );",
    )?;

    Ok(())
}

/// Map a database row to a [SavingsOpportunity].
pub fn map_opportunity_row(row: &Row) -> Result<SavingsOpportunity, rusqlite::Error> {
    let raw_status: String = row.get(5)?;
    let status = OpportunityStatus::from_stored(&raw_status).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("unknown opportunity status \"{raw_status}\"").into(),
        )
    })?;

    Ok(SavingsOpportunity {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        category_id: row.get(2)?,
        title: row.get(3)?,
        potential_savings: row.get(4)?,
        status,
    })
}
