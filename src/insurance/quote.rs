use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error, database_id::DatabaseId, insurance::ProviderId, pet::PetId, user::UserId,
};

/// Database identifier for an insurance quote.
pub type QuoteId = DatabaseId;

/// A price offered by a provider to cover one pet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsuranceQuote {
    /// The ID of the quote.
    pub id: QuoteId,
    /// The pet the quote covers.
    pub pet_id: PetId,
    /// The provider that gave the quote.
    pub provider_id: ProviderId,
    /// The kind of cover, e.g. "accident-only".
    pub coverage_type: String,
    /// The monthly price. Missing premiums fall in the cheapest price bucket.
    pub monthly_premium: Option<f64>,
    /// The yearly price.
    pub annual_premium: Option<f64>,
    /// The excess paid per claim.
    pub deductible: Option<f64>,
    /// The most the policy pays out.
    pub coverage_limit: Option<f64>,
    /// e.g. "active" or "expired".
    pub status: String,
}

/// The columns selected for a quote, in the order [map_quote_row] expects.
pub const QUOTE_COLUMNS: &str = "id, pet_id, provider_id, coverage_type, monthly_premium, \
    annual_premium, deductible, coverage_limit, status";

/// Store a quote for `owner`. `quote.id` is ignored.
///
/// # Errors
/// Returns [Error::InvalidReference] if the pet or provider does not exist.
pub fn create_quote(
    quote: &InsuranceQuote,
    owner: UserId,
    connection: &Connection,
) -> Result<InsuranceQuote, Error> {
    let created = connection
        .prepare(&format!(
            "INSERT INTO insurance_quote
                (user_id, pet_id, provider_id, coverage_type, monthly_premium, annual_premium,
                 deductible, coverage_limit, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {QUOTE_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                quote.pet_id,
                quote.provider_id,
                &quote.coverage_type,
                quote.monthly_premium,
                quote.annual_premium,
                quote.deductible,
                quote.coverage_limit,
                &quote.status,
            ),
            map_quote_row,
        )?;

    Ok(created)
}

/// Initialize the insurance quote table.
pub fn create_quote_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS insurance_quote (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            pet_id INTEGER NOT NULL,
            provider_id INTEGER NOT NULL,
            coverage_type TEXT NOT NULL,
            monthly_premium REAL,
            annual_premium REAL,
            deductible REAL,
            coverage_limit REAL,
            status TEXT NOT NULL DEFAULT 'active',
            FOREIGN KEY(pet_id) REFERENCES pet(id) ON UPDATE CASCADE ON DELETE CASCADE,
            FOREIGN KEY(provider_id) REFERENCES insurance_provider(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_quote_user ON insurance_quote(user_id);",
    )?;

    Ok(())
}

/// Map a database row to an [InsuranceQuote].
pub fn map_quote_row(row: &Row) -> Result<InsuranceQuote, rusqlite::Error> {
    Ok(InsuranceQuote {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        provider_id: row.get(2)?,
        coverage_type: row.get(3)?,
        monthly_premium: row.get(4)?,
        annual_premium: row.get(5)?,
        deductible: row.get(6)?,
        coverage_limit: row.get(7)?,
        status: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        insurance::{InsuranceProvider, InsuranceQuote, create_provider, create_quote},
        pet::{Pet, PetName, create_pet},
        test_utils::get_test_connection,
        user::UserId,
    };

    fn quote(pet_id: i64, provider_id: i64) -> InsuranceQuote {
        InsuranceQuote {
            id: 0,
            pet_id,
            provider_id,
            coverage_type: "lifetime".to_owned(),
            monthly_premium: None,
            annual_premium: Some(420.0),
            deductible: Some(99.0),
            coverage_limit: Some(7000.0),
            status: "active".to_owned(),
        }
    }

    #[test]
    fn create_quote_keeps_missing_premium() {
        let connection = get_test_connection();
        let pet = create_pet(
            Pet::build(PetName::new_unchecked("Max"), "dog"),
            UserId::new(1),
            &connection,
        )
        .unwrap();
        let provider = create_provider(
            &InsuranceProvider {
                id: 0,
                name: "Paws Protect".to_owned(),
                rating: Some(4.6),
                reviews_count: 1200,
                coverage_types: vec!["lifetime".to_owned(), "accident-only".to_owned()],
                is_active: true,
            },
            &connection,
        )
        .unwrap();

        let created = create_quote(&quote(pet.id, provider.id), UserId::new(1), &connection)
            .expect("Could not create quote");

        assert_eq!(created.monthly_premium, None);
        assert_eq!(provider.coverage_types.len(), 2);
    }

    #[test]
    fn create_quote_for_unknown_pet_fails() {
        let connection = get_test_connection();

        let result = create_quote(&quote(5, 5), UserId::new(1), &connection);

        assert_eq!(result, Err(Error::InvalidReference));
    }
}
