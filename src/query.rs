//! Turns filter selections into store queries.
//!
//! [build_query] is pure: the same filters, scope and context always give
//! the same [QuerySpec].

use serde::Serialize;
use time::Date;

use crate::{
    budget::Budget,
    category::CategoryId,
    filter::FilterState,
    pet::PetId,
    record::Collection,
    user::UserId,
};

/// A single condition on the rows of a collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Predicate {
    /// Rows owned by this user.
    OwnedBy(UserId),
    /// Rows for this pet.
    Pet(PetId),
    /// Rows in this category.
    Category(CategoryId),
    /// Rows dated on or after this day.
    OnOrAfter(Date),
    /// Rows dated on or before this day.
    OnOrBefore(Date),
    /// Rows whose text fields contain this text, ignoring case.
    TextContains(String),
    /// Rows with the active flag set.
    Active,
    /// Quotes whose monthly premium is above `above` and at most `at_most`.
    ///
    /// Missing premiums count as zero.
    PremiumRange {
        /// Exclusive lower bound.
        above: Option<f64>,
        /// Inclusive upper bound.
        at_most: Option<f64>,
    },
}

/// How rows are sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderBy {
    /// Most recent date first, ties broken by newest ID.
    DateDesc,
    /// Newest ID first.
    NewestFirst,
    /// Alphabetical by name.
    NameAsc,
    /// Highest rating first, unrated last.
    RatingDesc,
}

/// A complete read against one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuerySpec {
    /// The collection to read.
    pub collection: Collection,
    /// Conditions that every returned row must meet.
    pub predicates: Vec<Predicate>,
    /// How rows are sorted.
    pub order_by: OrderBy,
    /// The most rows to return, `None` for all of them.
    pub limit: Option<i64>,
}

/// What a view reads before any filters are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryScope {
    /// The collection to read.
    pub collection: Collection,
    /// The default sort order.
    pub order_by: OrderBy,
    /// The most rows to return.
    pub limit: Option<i64>,
    /// Hide rows whose active flag is cleared.
    pub active_only: bool,
}

impl QueryScope {
    const fn new(collection: Collection, order_by: OrderBy) -> Self {
        Self {
            collection,
            order_by,
            limit: None,
            active_only: false,
        }
    }

    /// Every transaction, most recent first.
    pub const fn transactions() -> Self {
        Self::new(Collection::Transactions, OrderBy::DateDesc)
    }

    /// The ten most recent transactions.
    pub const fn recent_transactions() -> Self {
        Self {
            limit: Some(10),
            ..Self::transactions()
        }
    }

    /// Pets by name.
    pub const fn pets() -> Self {
        Self::new(Collection::Pets, OrderBy::NameAsc)
    }

    /// Categories by name.
    pub const fn categories() -> Self {
        Self::new(Collection::Categories, OrderBy::NameAsc)
    }

    /// Active budgets by name.
    pub const fn budgets() -> Self {
        Self {
            active_only: true,
            ..Self::new(Collection::Budgets, OrderBy::NameAsc)
        }
    }

    /// Savings opportunities, newest first.
    pub const fn opportunities() -> Self {
        Self::new(Collection::Opportunities, OrderBy::NewestFirst)
    }

    /// Linked bank accounts, newest first.
    pub const fn bank_accounts() -> Self {
        Self {
            active_only: true,
            ..Self::new(Collection::BankAccounts, OrderBy::NewestFirst)
        }
    }

    /// Active insurers, best rated first.
    pub const fn providers() -> Self {
        Self {
            active_only: true,
            ..Self::new(Collection::Providers, OrderBy::RatingDesc)
        }
    }

    /// Insurance quotes, newest first.
    pub const fn quotes() -> Self {
        Self::new(Collection::Quotes, OrderBy::NewestFirst)
    }
}

/// The values a query depends on besides the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryContext {
    /// Today's date in the user's timezone.
    pub today: Date,
    /// The signed in user, if any.
    pub owner: Option<UserId>,
}

/// Build the read for `scope` narrowed by `filters`.
///
/// Filter dimensions that do not apply to the scope's collection are ignored.
pub fn build_query(filters: &FilterState, scope: &QueryScope, context: &QueryContext) -> QuerySpec {
    let mut candidates = Vec::new();

    if let Some(owner) = context.owner {
        candidates.push(Predicate::OwnedBy(owner));
    }

    if scope.active_only {
        candidates.push(Predicate::Active);
    }

    if let Some(pet_id) = filters.pet.value() {
        candidates.push(Predicate::Pet(pet_id));
    }

    if let Some(category_id) = filters.category.value() {
        candidates.push(Predicate::Category(category_id));
    }

    if let Some(lower_bound) = filters.date_window.lower_bound(context.today) {
        candidates.push(Predicate::OnOrAfter(lower_bound));
    }

    let search = filters.search.trim();
    if !search.is_empty() {
        candidates.push(Predicate::TextContains(search.to_owned()));
    }

    if let Some((above, at_most)) = filters.price_bucket.premium_bounds() {
        candidates.push(Predicate::PremiumRange { above, at_most });
    }

    let predicates = candidates
        .into_iter()
        .filter(|predicate| scope.collection.supports(predicate))
        .collect();

    QuerySpec {
        collection: scope.collection,
        predicates,
        order_by: scope.order_by,
        limit: scope.limit,
    }
}

/// Build the read for the spend counted against `budget` in its current period.
pub fn budget_spend_query(budget: &Budget, context: &QueryContext) -> QuerySpec {
    let range = budget.period.current_range(context.today);
    let mut predicates = Vec::new();

    if let Some(owner) = context.owner {
        predicates.push(Predicate::OwnedBy(owner));
    }
    if let Some(category_id) = budget.category_id {
        predicates.push(Predicate::Category(category_id));
    }
    if let Some(pet_id) = budget.pet_id {
        predicates.push(Predicate::Pet(pet_id));
    }
    predicates.push(Predicate::OnOrAfter(range.start));
    predicates.push(Predicate::OnOrBefore(range.end));

    QuerySpec {
        collection: Collection::Transactions,
        predicates,
        order_by: OrderBy::DateDesc,
        limit: None,
    }
}
