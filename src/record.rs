//! The collections held by the record store and the rows they return.

use serde::Serialize;

use crate::{
    bank_account::BankAccount,
    budget::Budget,
    category::Category,
    database_id::DatabaseId,
    insurance::{InsuranceProvider, InsuranceQuote},
    opportunity::SavingsOpportunity,
    pet::Pet,
    query::Predicate,
    transaction::Transaction,
};

/// A named collection of records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Pet profiles.
    Pets,
    /// Expense categories, shared by every user.
    Categories,
    /// Expenses and credits.
    Transactions,
    /// Spending budgets.
    Budgets,
    /// Savings suggestions.
    Opportunities,
    /// Linked bank accounts.
    BankAccounts,
    /// Insurers, shared by every user.
    Providers,
    /// Insurance quotes.
    Quotes,
}

impl Collection {
    /// The SQL table that backs the collection.
    pub fn table(self) -> &'static str {
        match self {
            Self::Pets => "pet",
            Self::Categories => "category",
            Self::Transactions => "\"transaction\"",
            Self::Budgets => "budget",
            Self::Opportunities => "savings_opportunity",
            Self::BankAccounts => "bank_account",
            Self::Providers => "insurance_provider",
            Self::Quotes => "insurance_quote",
        }
    }

    /// Whether rows belong to a single user.
    pub fn is_user_owned(self) -> bool {
        !matches!(self, Self::Categories | Self::Providers)
    }

    /// Whether rows have an active flag that can be cleared instead of deleting them.
    pub fn supports_soft_delete(self) -> bool {
        matches!(self, Self::Budgets | Self::BankAccounts)
    }

    /// Whether the dashboard may write to the collection.
    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Self::Pets | Self::Transactions | Self::Budgets | Self::BankAccounts
        )
    }

    /// The text columns searched by free text, empty when free text does not apply.
    pub fn text_columns(self) -> &'static [&'static str] {
        match self {
            Self::Transactions => &["description", "merchant_name"],
            Self::Pets => &["name", "breed"],
            Self::Providers => &["name"],
            _ => &[],
        }
    }

    /// Whether `predicate` can be applied to the collection.
    pub fn supports(self, predicate: &Predicate) -> bool {
        match predicate {
            Predicate::OwnedBy(_) => self.is_user_owned(),
            Predicate::Pet(_) => matches!(
                self,
                Self::Transactions | Self::Budgets | Self::Opportunities | Self::Quotes
            ),
            Predicate::Category(_) => matches!(
                self,
                Self::Transactions | Self::Budgets | Self::Opportunities
            ),
            Predicate::OnOrAfter(_) | Predicate::OnOrBefore(_) => self == Self::Transactions,
            Predicate::TextContains(_) => !self.text_columns().is_empty(),
            Predicate::Active => matches!(
                self,
                Self::Budgets | Self::BankAccounts | Self::Providers
            ),
            Predicate::PremiumRange { .. } => self == Self::Quotes,
        }
    }
}

/// A reference to a single stored row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct RecordRef {
    /// The collection the row lives in.
    pub collection: Collection,
    /// The row's ID.
    pub id: DatabaseId,
}

/// A row from any collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "collection", content = "record", rename_all = "snake_case")]
pub enum Record {
    /// A pet profile.
    Pet(Pet),
    /// An expense category.
    Category(Category),
    /// An expense or credit.
    Transaction(Transaction),
    /// A spending budget.
    Budget(Budget),
    /// A savings suggestion.
    Opportunity(SavingsOpportunity),
    /// A linked bank account.
    BankAccount(BankAccount),
    /// An insurer.
    Provider(InsuranceProvider),
    /// An insurance quote.
    Quote(InsuranceQuote),
}

impl Record {
    /// The collection the record belongs to.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Pet(_) => Collection::Pets,
            Self::Category(_) => Collection::Categories,
            Self::Transaction(_) => Collection::Transactions,
            Self::Budget(_) => Collection::Budgets,
            Self::Opportunity(_) => Collection::Opportunities,
            Self::BankAccount(_) => Collection::BankAccounts,
            Self::Provider(_) => Collection::Providers,
            Self::Quote(_) => Collection::Quotes,
        }
    }

    /// The row ID of the record.
    pub fn id(&self) -> DatabaseId {
        match self {
            Self::Pet(pet) => pet.id,
            Self::Category(category) => category.id,
            Self::Transaction(transaction) => transaction.id,
            Self::Budget(budget) => budget.id,
            Self::Opportunity(opportunity) => opportunity.id,
            Self::BankAccount(account) => account.id,
            Self::Provider(provider) => provider.id,
            Self::Quote(quote) => quote.id,
        }
    }

    /// A reference to the record.
    pub fn reference(&self) -> RecordRef {
        RecordRef {
            collection: self.collection(),
            id: self.id(),
        }
    }
}

macro_rules! record_conversions {
    ($($variant:ident($model:ty) => $getter:ident, $collect:ident;)*) => {
        $(
            impl From<$model> for Record {
                fn from(value: $model) -> Self {
                    Self::$variant(value)
                }
            }

            impl Record {
                #[doc = concat!("The inner value if this is a `", stringify!($variant), "` record.")]
                pub fn $getter(self) -> Option<$model> {
                    match self {
                        Self::$variant(value) => Some(value),
                        _ => None,
                    }
                }

                #[doc = concat!("Keep only the `", stringify!($variant), "` records.")]
                pub fn $collect(records: Vec<Record>) -> Vec<$model> {
                    records.into_iter().filter_map(Self::$getter).collect()
                }
            }
        )*
    };
}

record_conversions! {
    Pet(Pet) => into_pet, pets;
    Category(Category) => into_category, categories;
    Transaction(Transaction) => into_transaction, transactions;
    Budget(Budget) => into_budget, budgets;
    Opportunity(SavingsOpportunity) => into_opportunity, opportunities;
    BankAccount(BankAccount) => into_bank_account, bank_accounts;
    Provider(InsuranceProvider) => into_provider, providers;
    Quote(InsuranceQuote) => into_quote, quotes;
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        query::Predicate,
        record::{Collection, Record},
        transaction::Transaction,
        user::UserId,
    };

    #[test]
    fn shared_collections_ignore_owner() {
        let owned_by = Predicate::OwnedBy(UserId::new(1));

        assert!(!Collection::Categories.supports(&owned_by));
        assert!(!Collection::Providers.supports(&owned_by));
        assert!(Collection::Transactions.supports(&owned_by));
    }

    #[test]
    fn only_budgets_and_accounts_soft_delete() {
        let soft: Vec<Collection> = [
            Collection::Pets,
            Collection::Categories,
            Collection::Transactions,
            Collection::Budgets,
            Collection::Opportunities,
            Collection::BankAccounts,
            Collection::Providers,
            Collection::Quotes,
        ]
        .into_iter()
        .filter(|collection| collection.supports_soft_delete())
        .collect();

        assert_eq!(soft, vec![Collection::Budgets, Collection::BankAccounts]);
    }

    #[test]
    fn transactions_filters_keep_only_transactions() {
        let transaction = Transaction {
            id: 3,
            pet_id: None,
            category_id: None,
            amount: -5.0,
            date: date!(2025 - 01 - 01),
            description: "Treats".to_owned(),
            merchant_name: None,
            is_pet_expense: true,
            bank_account_id: None,
        };
        let records = vec![Record::from(transaction.clone())];

        assert_eq!(Record::transactions(records.clone()), vec![transaction]);
        assert!(Record::pets(records).is_empty());
    }
}
