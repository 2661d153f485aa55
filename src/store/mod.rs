//! The data-access boundary between the dashboard core and persistence.

mod sqlite;

use std::future::Future;

use crate::{Error, mutation::Mutation, query::QuerySpec, record::Record, user::UserId};

pub use sqlite::SqliteRecordStore;

/// Filterable, sortable collections of dashboard records.
///
/// Implementations must not retry. Failed reads are reported as
/// [Error::StoreReadFailed] and failed writes as [Error::StoreWriteFailed],
/// each carrying a human-readable cause.
pub trait RecordStore: Send + Sync {
    /// Return the rows matching every predicate in `query`, sorted and capped as requested.
    fn select(&self, query: &QuerySpec) -> impl Future<Output = Result<Vec<Record>, Error>> + Send;

    /// Apply `mutation` on behalf of `owner` and return the affected record.
    ///
    /// Deleted records are returned as they were before deletion.
    fn write(
        &self,
        owner: UserId,
        mutation: &Mutation,
    ) -> impl Future<Output = Result<Record, Error>> + Send;
}
