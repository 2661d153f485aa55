//! Defines the core data models and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error, bank_account::BankAccountId, category::CategoryId, database_id::DatabaseId,
    pet::PetId, user::UserId,
};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = DatabaseId;

/// An expense or credit, i.e. an event where money was either spent or refunded.
///
/// To create a new `Transaction`, use [Transaction::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The pet the money was spent on, if any.
    pub pet_id: Option<PetId>,
    /// The category of the transaction, e.g. "Veterinary Care".
    pub category_id: Option<CategoryId>,
    /// The amount of money. Negative amounts are expenses.
    pub amount: f64,
    /// When the transaction happened.
    pub date: Date,
    /// A text description of what the transaction was for.
    pub description: String,
    /// Where the money was spent, e.g. "City Vets".
    pub merchant_name: Option<String>,
    /// Whether the transaction was for a pet.
    pub is_pet_expense: bool,
    /// The linked bank account the transaction came from, if any.
    pub bank_account_id: Option<BankAccountId>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(amount: f64, date: Date, description: &str) -> TransactionBuilder {
        TransactionBuilder {
            pet_id: None,
            category_id: None,
            amount,
            date,
            description: description.to_owned(),
            merchant_name: None,
            is_pet_expense: true,
            bank_account_id: None,
        }
    }

    /// The amount of money spent, ignoring the sign.
    pub fn spend(&self) -> f64 {
        self.amount.abs()
    }
}

/// A builder for creating [Transaction] instances.
///
/// Transactions entered by hand are pet expenses unless stated otherwise.
///
/// # Examples
///
/// ```ignore
/// use time::macros::date;
///
/// use crate::transaction::Transaction;
///
/// let builder = Transaction::build(-45.99, date!(2025 - 01 - 15), "Premium Pet Food")
///     .merchant_name(Some("Pets at Home".to_owned()))
///     .category_id(Some(1));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// The pet the money was spent on.
    pub pet_id: Option<PetId>,

    /// The category of the transaction.
    pub category_id: Option<CategoryId>,

    /// The monetary amount of the transaction.
    ///
    /// Negative values are expenses, positive values are refunds or credits.
    ///
    /// # Examples
    /// - `-45.99` - Pet food
    /// - `-120.00` - Vet consultation
    pub amount: f64,

    /// The date when the transaction occurred.
    pub date: Date,

    /// A human-readable description of the transaction.
    pub description: String,

    /// The merchant, e.g. "Pets at Home".
    pub merchant_name: Option<String>,

    /// Whether the transaction was for a pet.
    pub is_pet_expense: bool,

    /// The linked bank account the transaction came from.
    pub bank_account_id: Option<BankAccountId>,
}

impl TransactionBuilder {
    /// Set the pet for the transaction.
    pub fn pet_id(mut self, pet_id: Option<PetId>) -> Self {
        self.pet_id = pet_id;
        self
    }

    /// Set the category for the transaction.
    pub fn category_id(mut self, category_id: Option<CategoryId>) -> Self {
        self.category_id = category_id;
        self
    }

    /// Set the merchant for the transaction.
    pub fn merchant_name(mut self, merchant_name: Option<String>) -> Self {
        self.merchant_name = merchant_name;
        self
    }

    /// Mark whether the transaction was for a pet.
    pub fn is_pet_expense(mut self, is_pet_expense: bool) -> Self {
        self.is_pet_expense = is_pet_expense;
        self
    }

    /// Set the bank account the transaction came from.
    pub fn bank_account_id(mut self, bank_account_id: Option<BankAccountId>) -> Self {
        self.bank_account_id = bank_account_id;
        self
    }
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// The columns selected for a transaction, in the order [map_transaction_row] expects.
pub const TRANSACTION_COLUMNS: &str = "id, pet_id, category_id, amount, date, description, \
    merchant_name, is_pet_expense, bank_account_id";

/// Create a new transaction owned by `owner` from a builder.
///
/// # Errors
/// This function will return a:
/// - [Error::InvalidReference] if the pet, category or bank account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn create_transaction(
    builder: TransactionBuilder,
    owner: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    let transaction = connection
        .prepare(&format!(
            "INSERT INTO \"transaction\"
                (user_id, pet_id, category_id, amount, date, description, merchant_name,
                 is_pet_expense, bank_account_id)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                builder.pet_id,
                builder.category_id,
                builder.amount,
                builder.date,
                builder.description,
                builder.merchant_name,
                builder.is_pet_expense,
                builder.bank_account_id,
            ),
            map_transaction_row,
        )?;

    Ok(transaction)
}

/// Overwrite the stored fields of `transaction`.
///
/// # Errors
/// This function will return a:
/// - [Error::UpdateMissingRecord] if the transaction does not exist or belongs to another user,
/// - [Error::InvalidReference] if the pet, category or bank account does not exist,
/// - or [Error::SqlError] if there is some other SQL error.
pub fn update_transaction(
    transaction: &Transaction,
    owner: UserId,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(&format!(
            "UPDATE \"transaction\"
             SET pet_id = ?1, category_id = ?2, amount = ?3, date = ?4, description = ?5,
                 merchant_name = ?6, is_pet_expense = ?7, bank_account_id = ?8
             WHERE id = ?9 AND user_id = ?10
             RETURNING {TRANSACTION_COLUMNS}"
        ))?
        .query_row(
            (
                transaction.pet_id,
                transaction.category_id,
                transaction.amount,
                transaction.date,
                &transaction.description,
                &transaction.merchant_name,
                transaction.is_pet_expense,
                transaction.bank_account_id,
                transaction.id,
                owner.as_i64(),
            ),
            map_transaction_row,
        )
        .map_err(|error| match error {
            rusqlite::Error::QueryReturnedNoRows => Error::UpdateMissingRecord,
            error => error.into(),
        })
}

/// Get the number of transactions owned by `owner`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(owner: UserId, connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
            [owner.as_i64()],
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            pet_id INTEGER,
            category_id INTEGER,
            amount REAL NOT NULL,
            date TEXT NOT NULL,
            description TEXT NOT NULL,
            merchant_name TEXT,
            is_pet_expense INTEGER NOT NULL DEFAULT 1,
            bank_account_id INTEGER,
            FOREIGN KEY(pet_id) REFERENCES pet(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE SET NULL,
            FOREIGN KEY(bank_account_id) REFERENCES bank_account(id) ON UPDATE CASCADE ON DELETE SET NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_date ON \"transaction\"(user_id, date);",
    )?;

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        pet_id: row.get(1)?,
        category_id: row.get(2)?,
        amount: row.get(3)?,
        date: row.get(4)?,
        description: row.get(5)?,
        merchant_name: row.get(6)?,
        is_pet_expense: row.get(7)?,
        bank_account_id: row.get(8)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod database_tests {
    use time::macros::date;

    use crate::{
        Error,
        test_utils::get_test_connection,
        transaction::{Transaction, count_transactions, create_transaction, update_transaction},
        user::UserId,
    };

    #[test]
    fn create_succeeds() {
        let conn = get_test_connection();
        let amount = -12.3;

        let result = create_transaction(
            Transaction::build(amount, date!(2025 - 10 - 05), "Chew toy"),
            UserId::new(1),
            &conn,
        );

        match result {
            Ok(transaction) => {
                assert_eq!(transaction.amount, amount);
                assert!(transaction.is_pet_expense);
            }
            Err(error) => panic!("Unexpected error: {error}"),
        }
    }

    #[test]
    fn create_fails_on_invalid_category_id() {
        let conn = get_test_connection();

        let result = create_transaction(
            Transaction::build(-10.0, date!(2025 - 10 - 04), "Treats").category_id(Some(42)),
            UserId::new(1),
            &conn,
        );

        assert_eq!(result, Err(Error::InvalidReference));
    }

    #[test]
    fn update_of_other_users_transaction_fails() {
        let conn = get_test_connection();
        let mut transaction = create_transaction(
            Transaction::build(-10.0, date!(2025 - 10 - 04), "Treats"),
            UserId::new(1),
            &conn,
        )
        .unwrap();
        transaction.amount = -20.0;

        let result = update_transaction(&transaction, UserId::new(2), &conn);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
    }

    #[test]
    fn get_count_only_counts_owner() {
        let conn = get_test_connection();
        let today = date!(2025 - 10 - 05);
        let want_count = 20;
        for i in 1..=want_count {
            create_transaction(
                Transaction::build(-(i as f64), today, ""),
                UserId::new(1),
                &conn,
            )
            .expect("Could not create transaction");
        }
        create_transaction(Transaction::build(-1.0, today, ""), UserId::new(2), &conn).unwrap();

        let got_count = count_transactions(UserId::new(1), &conn).expect("Could not get count");

        assert_eq!(want_count, got_count);
    }
}
