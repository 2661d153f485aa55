//! Implements a struct that holds the shared state of the dashboard.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use time::Date;

use crate::{
    Error, db::initialize, mutation::MutationGateway, query::QueryContext,
    store::SqliteRecordStore, timezone::local_today, user::UserId,
};

/// The database connection and settings shared by every view.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The local timezone as a canonical timezone name, e.g. "Europe/London".
    pub local_timezone: String,

    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    /// `local_timezone` should be a valid, canonical timezone name, e.g. "Europe/London".
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, local_timezone: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            local_timezone: local_timezone.to_owned(),
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// A record store over the shared connection.
    pub fn store(&self) -> SqliteRecordStore {
        SqliteRecordStore::new(self.db_connection.clone())
    }

    /// A mutation gateway that writes to [AppState::store].
    pub fn gateway(&self) -> MutationGateway<SqliteRecordStore> {
        MutationGateway::new(self.store())
    }

    /// Today's date in the local timezone.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not recognised.
    pub fn today(&self) -> Result<Date, Error> {
        local_today(&self.local_timezone)
    }

    /// The context for building queries on behalf of `owner`.
    ///
    /// # Errors
    /// Returns [Error::InvalidTimezoneError] if the timezone is not recognised.
    pub fn query_context(&self, owner: Option<UserId>) -> Result<QueryContext, Error> {
        Ok(QueryContext {
            today: self.today()?,
            owner,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;

    use crate::{AppState, Error, user::UserId};

    #[test]
    fn new_initializes_database() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        let connection = state.db_connection.lock().unwrap();
        let tables: i64 = connection
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'budget'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 1);
    }

    #[test]
    fn invalid_timezone_fails_context() {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Nowhere/Special").unwrap();

        assert_eq!(
            state.query_context(Some(UserId::new(1))),
            Err(Error::InvalidTimezoneError("Nowhere/Special".to_owned()))
        );
    }
}
