//! Validated, single-record writes.
//!
//! Every write goes through [MutationGateway::submit]. Input is checked
//! locally first, then the caller's identity is required, and only then is
//! the record store called, exactly once. Nothing is retried.

use time::Date;

use crate::{
    Error,
    bank_account::{BankAccountId, LinkedAccount},
    budget::{Budget, BudgetBuilder},
    category::{Category, CategoryId},
    period::BudgetPeriod,
    pet::{Pet, PetBuilder, PetId, PetName, parse_list},
    record::{Collection, Record, RecordRef},
    store::RecordStore,
    transaction::{Transaction, TransactionBuilder},
    user::{UserId, require_identity},
};

/// An expense entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseForm {
    /// How much was spent. The sign is ignored and the expense is stored as a negative amount.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// What the money was spent on.
    pub description: String,
    /// Where the money was spent, may be blank.
    pub merchant_name: String,
    /// The expense category, required.
    pub category_id: Option<CategoryId>,
    /// The pet the money was spent on.
    pub pet_id: Option<PetId>,
    /// The account the money came from.
    pub bank_account_id: Option<BankAccountId>,
    /// Whether the money was spent on a pet rather than the household.
    pub is_pet_expense: bool,
}

impl ExpenseForm {
    /// The transaction this form describes.
    pub fn to_builder(&self) -> TransactionBuilder {
        let merchant_name = self.merchant_name.trim();

        Transaction::build(-self.amount.abs(), self.date, self.description.trim())
            .merchant_name((!merchant_name.is_empty()).then(|| merchant_name.to_owned()))
            .category_id(self.category_id)
            .pet_id(self.pet_id)
            .bank_account_id(self.bank_account_id)
            .is_pet_expense(self.is_pet_expense)
    }
}

/// A pet profile entered by the user.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PetForm {
    /// What the pet is called.
    pub name: String,
    /// The kind of animal.
    pub species: String,
    /// The breed, may be blank.
    pub breed: String,
    /// Age in years.
    pub age: Option<f64>,
    /// Weight in kilograms.
    pub weight: Option<f64>,
    /// Comma separated medical conditions.
    pub medical_conditions: String,
    /// Comma separated dietary requirements.
    pub dietary_requirements: String,
}

impl PetForm {
    /// The pet this form describes.
    ///
    /// # Errors
    /// Returns [Error::EmptyName] if the name is blank.
    pub fn to_builder(&self) -> Result<PetBuilder, Error> {
        let breed = self.breed.trim();

        Ok(Pet::build(PetName::new(&self.name)?, &self.species)
            .breed((!breed.is_empty()).then(|| breed.to_owned()))
            .age(self.age)
            .weight(self.weight)
            .medical_conditions(parse_list(&self.medical_conditions))
            .dietary_requirements(parse_list(&self.dietary_requirements)))
    }
}

/// A budget entered by the user.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetForm {
    /// What the budget is for.
    pub name: String,
    /// The most that should be spent per period.
    pub limit: f64,
    /// How often the budget resets.
    pub period: BudgetPeriod,
    /// The category to limit, `None` for all spend.
    pub category_id: Option<CategoryId>,
    /// The pet to limit, `None` for every pet.
    pub pet_id: Option<PetId>,
}

impl BudgetForm {
    /// The budget this form describes.
    pub fn to_builder(&self) -> BudgetBuilder {
        Budget::build(&self.name, self.limit, self.period)
            .category_id(self.category_id)
            .pet_id(self.pet_id)
    }
}

/// A record to create.
#[derive(Debug, Clone, PartialEq)]
pub enum NewRecord {
    /// Log an expense.
    Expense(ExpenseForm),
    /// Add a pet.
    Pet(PetForm),
    /// Set up a budget.
    Budget(BudgetForm),
    /// Store an account returned by the bank aggregator.
    BankAccount(LinkedAccount),
}

/// A single-record write.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Create a record.
    Create(NewRecord),
    /// Overwrite a record with new field values.
    Update(Record),
    /// Clear a record's active flag.
    Deactivate(RecordRef),
    /// Remove a record.
    Delete(RecordRef),
}

impl Mutation {
    /// The collection the mutation writes to.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Create(NewRecord::Expense(_)) => Collection::Transactions,
            Self::Create(NewRecord::Pet(_)) => Collection::Pets,
            Self::Create(NewRecord::Budget(_)) => Collection::Budgets,
            Self::Create(NewRecord::BankAccount(_)) => Collection::BankAccounts,
            Self::Update(record) => record.collection(),
            Self::Deactivate(reference) | Self::Delete(reference) => reference.collection,
        }
    }
}

/// What the gateway needs to know about the caller and their data.
#[derive(Debug, Clone, Copy)]
pub struct SubmitContext<'a> {
    /// The signed in user, if any.
    pub identity: Option<UserId>,
    /// The categories a record may refer to.
    pub categories: &'a [Category],
    /// The user's pets.
    pub pets: &'a [Pet],
    /// Today's date in the user's timezone.
    pub today: Date,
}

impl SubmitContext<'_> {
    fn require_category(&self, category_id: Option<CategoryId>) -> Result<(), Error> {
        match category_id {
            None => Err(invalid("Category is required")),
            Some(_) => self.check_category(category_id),
        }
    }

    fn check_category(&self, category_id: Option<CategoryId>) -> Result<(), Error> {
        match category_id {
            Some(id) if !self.categories.iter().any(|category| category.id == id) => {
                Err(invalid(&format!("Category {id} does not exist")))
            }
            _ => Ok(()),
        }
    }

    fn check_pet(&self, pet_id: Option<PetId>) -> Result<(), Error> {
        match pet_id {
            Some(id) if !self.pets.iter().any(|pet| pet.id == id) => {
                Err(invalid(&format!("Pet {id} does not exist")))
            }
            _ => Ok(()),
        }
    }
}

fn invalid(reason: &str) -> Error {
    Error::ValidationFailed(reason.to_owned())
}

fn require_text(value: &str, field: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        Err(invalid(&format!("{field} is required")))
    } else {
        Ok(())
    }
}

fn check_non_negative(value: Option<f64>, field: &str) -> Result<(), Error> {
    match value {
        Some(value) if !value.is_finite() || value < 0.0 => {
            Err(invalid(&format!("{field} cannot be negative")))
        }
        _ => Ok(()),
    }
}

fn check_amount(amount: f64) -> Result<(), Error> {
    if !amount.is_finite() || amount == 0.0 {
        Err(invalid("Amount must be a number other than zero"))
    } else {
        Ok(())
    }
}

fn check_budget(
    name: &str,
    limit: f64,
    category_id: Option<CategoryId>,
    pet_id: Option<PetId>,
    context: &SubmitContext,
) -> Result<(), Error> {
    require_text(name, "Budget name")?;

    if !limit.is_finite() || limit <= 0.0 {
        return Err(invalid("Budget limit must be greater than zero"));
    }

    context.check_category(category_id)?;
    context.check_pet(pet_id)
}

/// Check `mutation` without touching the record store.
///
/// # Errors
/// Returns [Error::ValidationFailed] describing the first problem found.
pub fn validate(mutation: &Mutation, context: &SubmitContext) -> Result<(), Error> {
    match mutation {
        Mutation::Create(NewRecord::Expense(form)) => {
            check_amount(form.amount)?;
            require_text(&form.description, "Description")?;
            context.require_category(form.category_id)?;
            context.check_pet(form.pet_id)?;

            if form.date > context.today {
                return Err(invalid("Date cannot be in the future"));
            }

            Ok(())
        }
        Mutation::Create(NewRecord::Pet(form)) => {
            require_text(&form.name, "Name")?;
            require_text(&form.species, "Species")?;
            check_non_negative(form.age, "Age")?;
            check_non_negative(form.weight, "Weight")
        }
        Mutation::Create(NewRecord::Budget(form)) => check_budget(
            &form.name,
            form.limit,
            form.category_id,
            form.pet_id,
            context,
        ),
        Mutation::Create(NewRecord::BankAccount(account)) => {
            require_text(&account.account_id, "Account ID")
        }
        Mutation::Update(Record::Transaction(transaction)) => {
            check_amount(transaction.amount)?;
            require_text(&transaction.description, "Description")?;
            context.check_category(transaction.category_id)?;
            context.check_pet(transaction.pet_id)
        }
        Mutation::Update(Record::Pet(pet)) => {
            require_text(pet.name.as_ref(), "Name")?;
            require_text(&pet.species, "Species")?;
            check_non_negative(pet.age, "Age")?;
            check_non_negative(pet.weight, "Weight")
        }
        Mutation::Update(Record::Budget(budget)) => check_budget(
            &budget.name,
            budget.limit,
            budget.category_id,
            budget.pet_id,
            context,
        ),
        Mutation::Update(record) => Err(invalid(&format!(
            "{:?} cannot be edited",
            record.collection()
        ))),
        Mutation::Deactivate(reference) if !reference.collection.supports_soft_delete() => Err(
            invalid(&format!("{:?} cannot be deactivated", reference.collection)),
        ),
        Mutation::Delete(reference) if !reference.collection.is_writable() => Err(invalid(
            &format!("{:?} cannot be deleted", reference.collection),
        )),
        Mutation::Deactivate(_) | Mutation::Delete(_) => Ok(()),
    }
}

/// Sends validated writes to a [RecordStore].
#[derive(Debug, Clone)]
pub struct MutationGateway<S> {
    store: S,
}

impl<S: RecordStore> MutationGateway<S> {
    /// Create a gateway that writes to `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The store writes are sent to.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate `mutation` and, if it is valid and the caller is signed in, write it.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::ValidationFailed] if the input is invalid, without calling the store,
    /// - [Error::NotAuthenticated] if `context` has no identity, without calling the store,
    /// - or [Error::StoreWriteFailed] if the store rejected the write.
    pub async fn submit(
        &self,
        context: &SubmitContext<'_>,
        mutation: Mutation,
    ) -> Result<Record, Error> {
        validate(&mutation, context).inspect_err(|error| {
            tracing::debug!("rejected {:?}: {}", mutation.collection(), error);
        })?;

        let owner = require_identity(context.identity)?;

        self.store.write(owner, &mutation).await
    }
}
