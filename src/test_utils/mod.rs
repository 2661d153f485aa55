#![allow(missing_docs)]

pub(crate) mod fixtures;
pub(crate) mod store;

pub(crate) use fixtures::{
    get_test_connection, seed_categories, seed_pets, seed_quotes, transaction,
};
pub(crate) use store::{CountingStore, FailingStore};
