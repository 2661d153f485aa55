//! Financial records: pet expenses and credits.
//!
//! This module contains:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and updating transactions

mod core;

pub use core::{
    TRANSACTION_COLUMNS, Transaction, TransactionBuilder, TransactionId, count_transactions,
    create_transaction, create_transaction_table, map_transaction_row, update_transaction,
};
