//! Pure reductions over the records a view has loaded.
//!
//! Nothing here touches the store or mutates its inputs, and the same inputs
//! always produce bit-identical output.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::{
    Error,
    budget::{Budget, BudgetId},
    category::{Category, CategoryId},
    opportunity::{OpportunityStatus, SavingsOpportunity},
    period::month_label,
    transaction::Transaction,
};

/// The label for spend without a known category.
pub const OTHER_LABEL: &str = "Other";

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    /// The category, `None` for the "Other" bucket.
    pub category_id: Option<CategoryId>,
    /// The category name.
    pub label: String,
    /// The summed absolute amount.
    pub total: f64,
}

/// Where a budget stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Spend is at or below the limit.
    WithinLimit,
    /// Spend is above the limit.
    OverBudget,
    /// The limit is zero or less, so progress cannot be measured.
    Misconfigured,
}

/// Spend against one budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetProgress {
    /// The budget.
    pub budget_id: BudgetId,
    /// The budget's name.
    pub name: String,
    /// The summed absolute amount of matching records.
    pub spent: f64,
    /// The budget's limit.
    pub limit: f64,
    /// `spent / limit`, unclamped. Zero when the limit is zero or less.
    pub ratio: f64,
    /// The ratio as a percentage, clamped to 0..=100 for progress bars.
    pub display_percent: f64,
    /// Whether more than the limit has been spent.
    pub is_over_budget: bool,
    /// How much is left before the limit is reached, never negative.
    pub remaining: f64,
    /// Where the budget stands.
    pub status: BudgetStatus,
}

/// Everything the dashboard derives from one set of records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregate {
    /// The summed absolute amount of every record.
    pub total_amount: f64,
    /// Spend per category in the order categories were first seen.
    pub by_category: Vec<CategoryTotal>,
    /// Spend against each budget, in the order the budgets were given.
    pub budget_progress: Vec<BudgetProgress>,
    /// The fraction of spend that was for pets, between 0 and 1.
    pub pet_expense_share: f64,
}

impl Aggregate {
    /// The fraction of the total spent in `category_id`, `None` for "Other".
    ///
    /// Zero when nothing was spent at all.
    pub fn percent_of_total(&self, category_id: Option<CategoryId>) -> f64 {
        if self.total_amount == 0.0 {
            return 0.0;
        }

        self.by_category
            .iter()
            .find(|total| total.category_id == category_id)
            .map_or(0.0, |total| total.total / self.total_amount)
    }

    /// Category name and spend pairs, ready for a chart.
    pub fn chart_data(&self) -> Vec<(String, f64)> {
        self.by_category
            .iter()
            .map(|total| (total.label.clone(), total.total))
            .collect()
    }

    /// A [Error::MisconfiguredBudget] for each budget with a limit of zero or less.
    pub fn budget_warnings(&self) -> Vec<Error> {
        self.budget_progress
            .iter()
            .filter(|progress| progress.status == BudgetStatus::Misconfigured)
            .map(|progress| Error::MisconfiguredBudget(progress.budget_id))
            .collect()
    }
}

/// Reduce `records` to totals, category splits and budget progress.
///
/// Records whose category is missing or not in `categories` are counted under [OTHER_LABEL].
pub fn aggregate(records: &[Transaction], categories: &[Category], budgets: &[Budget]) -> Aggregate {
    let names: HashMap<CategoryId, &str> = categories
        .iter()
        .map(|category| (category.id, category.name.as_ref()))
        .collect();

    let mut total_amount = 0.0;
    let mut pet_amount = 0.0;
    let mut by_category: Vec<CategoryTotal> = Vec::new();
    let mut positions: HashMap<Option<CategoryId>, usize> = HashMap::new();

    for record in records {
        let spend = record.spend();
        total_amount += spend;

        if record.is_pet_expense {
            pet_amount += spend;
        }

        let category_id = record.category_id.filter(|id| names.contains_key(id));
        let position = *positions.entry(category_id).or_insert_with(|| {
            let label = category_id
                .and_then(|id| names.get(&id).copied())
                .unwrap_or(OTHER_LABEL);
            by_category.push(CategoryTotal {
                category_id,
                label: label.to_owned(),
                total: 0.0,
            });
            by_category.len() - 1
        });
        by_category[position].total += spend;
    }

    let budget_progress = budgets
        .iter()
        .map(|budget| budget_progress(budget, records))
        .collect();

    let pet_expense_share = if total_amount == 0.0 {
        0.0
    } else {
        pet_amount / total_amount
    };

    Aggregate {
        total_amount,
        by_category,
        budget_progress,
        pet_expense_share,
    }
}

/// Spend against `budget` from the matching `records`.
///
/// A budget without a category counts every category, and a budget with a
/// pet only counts that pet's records.
pub fn budget_progress(budget: &Budget, records: &[Transaction]) -> BudgetProgress {
    let spent: f64 = records
        .iter()
        .filter(|record| budget.category_id.is_none() || record.category_id == budget.category_id)
        .filter(|record| budget.pet_id.is_none() || record.pet_id == budget.pet_id)
        .map(Transaction::spend)
        .fold(0.0, |sum, spend| sum + spend);

    if budget.limit <= 0.0 {
        tracing::warn!("budget {} has a limit of {}", budget.id, budget.limit);

        return BudgetProgress {
            budget_id: budget.id,
            name: budget.name.clone(),
            spent,
            limit: budget.limit,
            ratio: 0.0,
            display_percent: 0.0,
            is_over_budget: false,
            remaining: 0.0,
            status: BudgetStatus::Misconfigured,
        };
    }

    let ratio = spent / budget.limit;
    let is_over_budget = spent > budget.limit;

    BudgetProgress {
        budget_id: budget.id,
        name: budget.name.clone(),
        spent,
        limit: budget.limit,
        ratio,
        display_percent: (ratio * 100.0).clamp(0.0, 100.0),
        is_over_budget,
        remaining: (budget.limit - spent).max(0.0),
        status: if is_over_budget {
            BudgetStatus::OverBudget
        } else {
            BudgetStatus::WithinLimit
        },
    }
}

/// Spend per calendar month in chronological order, labelled like "Mar 2025".
pub fn monthly_expenses(records: &[Transaction]) -> Vec<(String, f64)> {
    let mut totals = BTreeMap::new();

    for record in records {
        let month = (record.date.year(), record.date.month() as u8);
        let entry = totals.entry(month).or_insert((record.date, 0.0));
        entry.1 += record.spend();
    }

    totals
        .into_values()
        .map(|(date, total)| (month_label(date), total))
        .collect()
}

/// Totals over a user's savings opportunities.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SavingsSummary {
    /// Potential savings not yet acted on.
    pub pending_total: f64,
    /// How many opportunities are waiting.
    pub pending_count: usize,
    /// Savings the user has taken up.
    pub applied_total: f64,
}

/// Sum potential savings by status. Unknown savings count as zero.
pub fn savings_summary(opportunities: &[SavingsOpportunity]) -> SavingsSummary {
    let mut summary = SavingsSummary::default();

    for opportunity in opportunities {
        let savings = opportunity.potential_savings.unwrap_or(0.0);

        match opportunity.status {
            OpportunityStatus::Pending => {
                summary.pending_total += savings;
                summary.pending_count += 1;
            }
            OpportunityStatus::Applied => summary.applied_total += savings,
            OpportunityStatus::Dismissed => {}
        }
    }

    summary
}
