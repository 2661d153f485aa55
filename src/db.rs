//! Schema setup and helpers shared by the per-entity database modules.

use rusqlite::{Connection, Row, Transaction as SqlTransaction, types::Type};

use crate::{
    Error,
    bank_account::create_bank_account_table,
    budget::create_budget_table,
    category::create_category_table,
    database_id::DatabaseId,
    insurance::{create_provider_table, create_quote_table},
    opportunity::create_opportunity_table,
    pet::create_pet_table,
    transaction::create_transaction_table,
    user::UserId,
};

/// Create every table used by the dashboard if it does not exist yet.
///
/// # Errors
/// Returns an error if a table cannot be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction)?;
    create_pet_table(&transaction)?;
    create_bank_account_table(&transaction)?;
    create_transaction_table(&transaction)?;
    create_budget_table(&transaction)?;
    create_opportunity_table(&transaction)?;
    create_provider_table(&transaction)?;
    create_quote_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Clear the active flag of the row `id` in `table`.
///
/// # Errors
/// Returns [Error::UpdateMissingRecord] if no row owned by `owner` has that ID.
pub fn deactivate_row(
    table: &str,
    id: DatabaseId,
    owner: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("UPDATE {table} SET is_active = 0 WHERE id = ?1 AND user_id = ?2"),
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingRecord);
    }

    Ok(())
}

/// Delete the row `id` from `table`.
///
/// # Errors
/// Returns [Error::DeleteMissingRecord] if no row owned by `owner` has that ID.
pub fn delete_row(
    table: &str,
    id: DatabaseId,
    owner: UserId,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        &format!("DELETE FROM {table} WHERE id = ?1 AND user_id = ?2"),
        (id, owner.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingRecord);
    }

    Ok(())
}

/// Encode a list column as a JSON array.
pub fn list_to_json(items: &[String]) -> Result<String, Error> {
    serde_json::to_string(items).map_err(Error::from)
}

/// Decode the JSON array stored in column `index`.
pub fn list_from_json_column(row: &Row, index: usize) -> Result<Vec<String>, rusqlite::Error> {
    let raw: String = row.get(index)?;

    serde_json::from_str(&raw)
        .map_err(|error| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(error)))
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        db::{deactivate_row, delete_row, initialize},
        test_utils::get_test_connection,
        user::UserId,
    };

    #[test]
    fn initialize_twice_succeeds() {
        let connection = get_test_connection();

        assert_eq!(initialize(&connection), Ok(()));
    }

    #[test]
    fn foreign_keys_are_enforced() {
        let connection = get_test_connection();

        let enabled: i64 = connection
            .query_row("PRAGMA foreign_keys", [], |row| row.get(0))
            .unwrap();

        assert_eq!(enabled, 1);
    }

    #[test]
    fn deactivate_missing_row_fails() {
        let connection = get_test_connection();

        let result = deactivate_row("budget", 1, UserId::new(1), &connection);

        assert_eq!(result, Err(Error::UpdateMissingRecord));
    }

    #[test]
    fn delete_missing_row_fails() {
        let connection = get_test_connection();

        let result = delete_row("pet", 1, UserId::new(1), &connection);

        assert_eq!(result, Err(Error::DeleteMissingRecord));
    }
}
