//! Expense categories, e.g. "Food & Treats" or "Veterinary Care".
//!
//! Categories are shared by every user and are only read by the core.

mod db;
mod domain;

pub use db::{CATEGORY_COLUMNS, create_category, create_category_table, map_category_row};
pub use domain::{Category, CategoryBuilder, CategoryId, CategoryName};
