//! Bank accounts linked through the external bank aggregator.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{Error, database_id::DatabaseId, user::UserId};

/// Database identifier for a linked bank account.
pub type BankAccountId = DatabaseId;

/// The account details handed back by the bank aggregator after a successful link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// The aggregator's identifier for the account.
    pub account_id: String,
    /// The display name of the account, may be blank.
    pub account_label: String,
    /// The account subtype, e.g. "checking", may be blank.
    pub account_subtype: String,
}

impl LinkedAccount {
    /// Replace a blank label or subtype with "Bank account" and "checking".
    pub fn with_defaults(&self) -> Self {
        let or_default = |value: &str, default: &str| {
            let value = value.trim();
            if value.is_empty() {
                default.to_owned()
            } else {
                value.to_owned()
            }
        };

        Self {
            account_id: self.account_id.trim().to_owned(),
            account_label: or_default(&self.account_label, "Bank account"),
            account_subtype: or_default(&self.account_subtype, "checking"),
        }
    }
}

/// A bank account the user has linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// The ID of the account.
    pub id: BankAccountId,
    /// The aggregator's identifier for the account.
    pub external_account_id: String,
    /// The display name of the account.
    pub name: String,
    /// The account subtype, e.g. "checking".
    pub subtype: String,
    /// Unlinked accounts are kept for history but not shown.
    pub is_active: bool,
}

/// The columns selected for a bank account, in the order [map_bank_account_row] expects.
pub const BANK_ACCOUNT_COLUMNS: &str = "id, external_account_id, name, subtype, is_active";

/// Store a linked account for `owner`.
///
/// `account` must already have its blank fields replaced with defaults.
pub fn create_bank_account(
    account: &LinkedAccount,
    owner: UserId,
    connection: &Connection,
) -> Result<BankAccount, Error> {
    let created = connection
        .prepare(&format!(
            "INSERT INTO bank_account (user_id, external_account_id, name, subtype)
             VALUES (?1, ?2, ?3, ?4)
             RETURNING {BANK_ACCOUNT_COLUMNS}"
        ))?
        .query_row(
            (
                owner.as_i64(),
                &account.account_id,
                &account.account_label,
                &account.account_subtype,
            ),
            map_bank_account_row,
        )?;

    Ok(created)
}

/// Initialize the bank account table.
pub fn create_bank_account_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS bank_account (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            external_account_id TEXT NOT NULL,
            name TEXT NOT NULL,
            subtype TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1
        );",
    )?;

    Ok(())
}

/// Map a database row to a [BankAccount].
pub fn map_bank_account_row(row: &Row) -> Result<BankAccount, rusqlite::Error> {
    Ok(BankAccount {
        id: row.get(0)?,
        external_account_id: row.get(1)?,
        name: row.get(2)?,
        subtype: row.get(3)?,
        is_active: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use crate::{
        bank_account::{LinkedAccount, create_bank_account},
        test_utils::get_test_connection,
        user::UserId,
    };

    #[test]
    fn blank_label_and_subtype_get_defaults() {
        let account = LinkedAccount {
            account_id: " acc_9 ".to_owned(),
            account_label: "  ".to_owned(),
            account_subtype: String::new(),
        };

        assert_eq!(
            account.with_defaults(),
            LinkedAccount {
                account_id: "acc_9".to_owned(),
                account_label: "Bank account".to_owned(),
                account_subtype: "checking".to_owned(),
            }
        );
    }

    #[test]
    fn linked_account_is_active() {
        let connection = get_test_connection();

        let account = create_bank_account(
            &LinkedAccount {
                account_id: "acc_123".to_owned(),
                account_label: "Joint".to_owned(),
                account_subtype: "savings".to_owned(),
            },
            UserId::new(1),
            &connection,
        )
        .unwrap();

        assert_eq!(account.external_account_id, "acc_123");
        assert!(account.is_active);
    }
}
