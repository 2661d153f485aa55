//! Defines the crate level error type and its conversion to user-facing alerts.

use crate::{alert::Alert, budget::BudgetId};

/// The errors that may occur while reading, aggregating or writing records.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A write was attempted without a resolvable user identity.
    ///
    /// Every record written through the mutation gateway is owned by a user,
    /// so the caller must pass the identity of the signed in user.
    #[error("you must be signed in to do that")]
    NotAuthenticated,

    /// A required field was missing or invalid.
    ///
    /// These errors are raised locally, before anything is sent to the record
    /// store.
    #[error("{0}")]
    ValidationFailed(String),

    /// The record store rejected a query or could not be reached.
    #[error("could not load records: {0}")]
    StoreReadFailed(String),

    /// The record store rejected a write or could not be reached.
    #[error("could not save changes: {0}")]
    StoreWriteFailed(String),

    /// A budget has a limit of zero or less.
    ///
    /// This is a data-quality problem with the stored budget, it does not stop
    /// the rest of the dashboard from being computed.
    #[error("budget {0} has a limit of zero or less")]
    MisconfiguredBudget(BudgetId),

    /// A name (e.g., of a pet or category) was empty.
    #[error("name cannot be empty")]
    EmptyName,

    /// The requested record was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested record could not be found")]
    NotFound,

    /// Tried to update a record that does not exist or belongs to another user.
    #[error("tried to update a record that is not in the database")]
    UpdateMissingRecord,

    /// Tried to delete a record that does not exist or belongs to another user.
    #[error("tried to delete a record that is not in the database")]
    DeleteMissingRecord,

    /// A pet, category or bank account ID does not refer to an existing row.
    #[error("a referenced pet, category or account does not exist")]
    InvalidReference,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A list column could not be converted to or from JSON.
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error {
                    code: _,
                    extended_code: rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY,
                },
                _,
            ) => Error::InvalidReference,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl Error {
    /// Convert the error into an alert that can be shown to the user.
    pub fn into_alert(self) -> Alert {
        match self {
            Error::NotAuthenticated => Alert::Error {
                message: "Not signed in".to_owned(),
                details: "Sign in again and retry.".to_owned(),
            },
            Error::ValidationFailed(reason) => Alert::Error {
                message: "Please fix the highlighted fields".to_owned(),
                details: reason,
            },
            Error::StoreReadFailed(cause) => Alert::Error {
                message: "Could not load your data".to_owned(),
                details: format!("{cause}. Try refreshing the page."),
            },
            Error::StoreWriteFailed(cause) => Alert::Error {
                message: "Could not save your changes".to_owned(),
                details: cause,
            },
            Error::MisconfiguredBudget(budget_id) => Alert::Error {
                message: "Budget needs attention".to_owned(),
                details: format!(
                    "Budget {budget_id} has a limit of zero. Edit the budget and set a limit \
                    greater than zero."
                ),
            },
            Error::InvalidTimezoneError(timezone) => Alert::Error {
                message: "Invalid Timezone Settings".to_owned(),
                details: format!(
                    "Could not get local timezone \"{timezone}\". Check your settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            },
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the logs for more details."
                        .to_owned(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, alert::Alert};

    #[test]
    fn validation_error_keeps_reason_in_alert() {
        let alert = Error::ValidationFailed("Description is required".to_owned()).into_alert();

        assert_eq!(
            alert,
            Alert::Error {
                message: "Please fix the highlighted fields".to_owned(),
                details: "Description is required".to_owned(),
            }
        );
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        let error: Error = rusqlite::Error::QueryReturnedNoRows.into();

        assert_eq!(error, Error::NotFound);
    }

    #[test]
    fn unexpected_errors_hide_details() {
        let alert = Error::DatabaseLockError.into_alert();

        assert!(matches!(alert, Alert::Error { message, .. } if message == "Something went wrong"));
    }
}
