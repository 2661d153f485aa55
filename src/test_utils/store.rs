use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    Error, mutation::Mutation, query::QuerySpec, record::Record, store::RecordStore,
    user::UserId,
};

/// Wraps a store and counts the calls made to it.
pub(crate) struct CountingStore<S> {
    inner: S,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl<S> CountingStore<S> {
    pub(crate) fn new(inner: S) -> Self {
        Self {
            inner,
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn read_count(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub(crate) fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl<S: RecordStore> RecordStore for CountingStore<S> {
    async fn select(&self, query: &QuerySpec) -> Result<Vec<Record>, Error> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.inner.select(query).await
    }

    async fn write(&self, owner: UserId, mutation: &Mutation) -> Result<Record, Error> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.write(owner, mutation).await
    }
}

/// A store that is always unreachable.
pub(crate) struct FailingStore;

impl RecordStore for FailingStore {
    async fn select(&self, _query: &QuerySpec) -> Result<Vec<Record>, Error> {
        Err(Error::StoreReadFailed("connection refused".to_owned()))
    }

    async fn write(&self, _owner: UserId, _mutation: &Mutation) -> Result<Record, Error> {
        Err(Error::StoreWriteFailed("connection refused".to_owned()))
    }
}
