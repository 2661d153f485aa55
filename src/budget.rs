//! Spending budgets for a category, a pet or everything.

use rusqlite::{Connection, Row, types::Type};
use serde::{Deserialize, Serialize};

use crate::{
    Error, category::CategoryId, database_id::DatabaseId, period::BudgetPeriod, pet::PetId,
    user::UserId,
};

/// Database identifier for a budget.
pub type BudgetId = DatabaseId;

/// A limit on how much may be spent per period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// What the budget is for, e.g. "Monthly vet fund".
    pub name: String,
    /// The category the budget covers. `None` covers all spend.
    pub category_id: Option<CategoryId>,
    /// The pet the budget covers. `None` covers every pet.
    pub pet_id: Option<PetId>,
    /// The most that should be spent per period.
    pub limit: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
    /// Inactive budgets are kept for history but not shown.
    pub is_active: bool,
}

impl Budget {
    /// Create a new, active budget.
    ///
    /// Shortcut for [BudgetBuilder] for discoverability.
    pub fn build(name: &str, limit: f64, period: BudgetPeriod) -> BudgetBuilder {
        BudgetBuilder {
            name: name.trim().to_owned(),
            category_id: None,
            pet_id: None,
            limit,
            period,
        }
    }
}

/// A budget that has not been saved yet.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetBuilder {
    /// What the budget is for.
    pub name: String,
    /// The category the budget covers.
    pub category_id: Option<CategoryId>,
    /// The pet the budget covers.
    pub pet_id: Option<PetId>,
    /// The most that should be spent per period.
    pub limit: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
}

impl BudgetBuilder {
    /// Restrict the budget to a category.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Restrict the budget to a pet.
    pub fn pet_id(mut self, pet_id: Option<PetId>) -> Self {
        self.pet_id = pet_id;
        self
    }
}

/// The columns selected for a budget, in the order [map_budget_row] expects.
pub const BUDGET_COLUMNS: &str = "id, name, category_id, pet_id, limit_amount, period, is_active";

/// Create a budget owned by `owner`.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidReference] if the category or pet does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_budget(
    builder: BudgetBuilder,
    owner: UserId,
    connection: &Connection,
) -> Result<Budget, Error> {
    let budget = connection
        .prepare(&format!(
            "INSERT INTO budget (user_id, name, category_id, pet_id, limit_amount, period)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                builder.name,
                builder.category_id,
                builder.pet_id,
                builder.limit,
                builder.period.as_str(),
            ),
            map_budget_row,
        )?;

    Ok(budget)
}

/// Overwrite the stored fields of `budget`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecord] if the budget does not exist or belongs to another user,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_budget(budget: &Budget, owner: UserId, connection: &Connection) -> Result<Budget, Error> {
    connection
        .prepare(&format!(
            "UPDATE budget
             SET name = ?1, category_id = ?2, pet_id = ?3, limit_amount = ?4, period = ?5,
                 is_active = ?6
             WHERE id = ?7 AND user_id = ?8
             RETURNING {BUDGET_COLUMNS}"
        ))?
        .query_row(
            (
                &budget.name,
                budget.category_id,
                budget.pet_id,
                budget.limit,
                budget.period.as_str(),
                budget.is_active,
                budget.id,
                owner.as_i64(),
            ),
            map_budget_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRecord,
            error => error.into(),
        })
}

/// Initialize the budget table.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            category_id INTEGER,
            pet_id INTEGER,
            limit_amount REAL NOT NULL,
            period TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(pet_id) REFERENCES pet(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user ON budget(user_id, is_active);",
    )?;

    Ok(())
}

/// Map a database row to a [Budget].
pub fn map_budget_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let raw_period: String = row.get(5)?;
    let period = BudgetPeriod::from_stored(&raw_period).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            5,
            Type::Text,
            format!("unknown budget period \"{raw_period}\"").into(),
        )
    })?;

    Ok(Budget {
        id: row.get(0)?,
        name: row.get(1)?,
        category_id: row.get(2)?,
        pet_id: row.get(3)?,
        limit: row.get(4)?,
        period,
        is_active: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        budget::{Budget, create_budget, update_budget},
        period::BudgetPeriod,
        test_utils::get_test_connection,
        user::UserId,
    };

    #[test]
    fn create_budget_is_active() {
        let connection = get_test_connection();

        let budget = create_budget(
            Budget::build(" Vet fund ", 100.0, BudgetPeriod::Monthly),
            UserId::new(1),
            &connection,
        )
        .expect("Could not create budget");

        assert_eq!(budget.name, "Vet fund");
        assert!(budget.is_active);
        assert_eq!(budget.period, BudgetPeriod::Monthly);
    }

    #[test]
    fn create_budget_with_unknown_pet_fails() {
        let connection = get_test_connection();

        let result = create_budget(
            Budget::build("Vet fund", 100.0, BudgetPeriod::Monthly).pet_id(Some(99)),
            UserId::new(1),
            &connection,
        );

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn update_budget_changes_limit() {
        let connection = get_test_connection();
        let mut budget = create_budget(
            Budget::build("Toys", 30.0, BudgetPeriod::Weekly),
            UserId::new(1),
            &connection,
        )
        .unwrap();
        budget.limit = 45.0;

        let updated = update_budget(&budget, UserId::new(1), &connection).unwrap();

        assert_eq!(updated.limit, 45.0);
    }
}
