//! Pawfolio is the filtered-aggregation core of a personal finance dashboard
//! for pet owners.
//!
//! A [ViewModel] holds the user's filter selections (pet, category, date
//! window, free text and price bucket), turns them into [QuerySpec]s with
//! [build_query], runs them against a [RecordStore] and reduces the results
//! into an [Aggregate] of totals, category splits and budget progress. Writes
//! go through the [MutationGateway], which validates input locally before
//! touching the store.

#![warn(missing_docs)]

mod aggregate;
mod alert;
mod app_state;
mod bank_account;
mod budget;
mod category;
mod charts;
mod currency;
mod database_id;
mod db;
mod error;
mod filter;
mod insurance;
mod mutation;
mod opportunity;
mod period;
mod pet;
mod query;
mod record;
mod store;
mod timezone;
mod transaction;
mod user;
mod view;

#[cfg(test)]
mod test_utils;

pub use aggregate::{
    Aggregate, BudgetProgress, BudgetStatus, CategoryTotal, OTHER_LABEL, SavingsSummary,
    aggregate, budget_progress, monthly_expenses, savings_summary,
};
pub use alert::Alert;
pub use app_state::AppState;
pub use bank_account::{BankAccount, BankAccountId, LinkedAccount, create_bank_account};
pub use budget::{Budget, BudgetBuilder, BudgetId, create_budget};
pub use category::{Category, CategoryBuilder, CategoryId, CategoryName, create_category};
pub use charts::{DashboardChart, category_chart, dashboard_charts, monthly_expenses_chart};
pub use currency::format_currency;
pub use database_id::DatabaseId;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use filter::{DateWindow, FilterState, PriceBucket, Selector};
pub use insurance::{
    InsuranceProvider, InsuranceQuote, ProviderId, QuoteId, create_provider, create_quote,
};
pub use mutation::{
    BudgetForm, ExpenseForm, Mutation, MutationGateway, NewRecord, PetForm, SubmitContext,
    validate,
};
pub use opportunity::{OpportunityId, OpportunityStatus, SavingsOpportunity, create_opportunity};
pub use period::{BudgetPeriod, DateRange};
pub use pet::{Pet, PetBuilder, PetId, PetName, create_pet};
pub use query::{
    OrderBy, Predicate, QueryContext, QueryScope, QuerySpec, budget_spend_query, build_query,
};
pub use record::{Collection, Record, RecordRef};
pub use store::{RecordStore, SqliteRecordStore};
pub use timezone::local_today;
pub use transaction::{
    Transaction, TransactionBuilder, TransactionId, count_transactions, create_transaction,
};
pub use user::{UserId, require_identity};
pub use view::{
    Dataset, LoadRequest, LoadResponse, LoadState, Resolution, ViewModel, fetch, load_all,
};
