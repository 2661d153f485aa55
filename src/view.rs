//! The filtered-aggregation view model.
//!
//! A [ViewModel] owns one [FilterState]. Every change to the filters or to a
//! collection the view reads produces [LoadRequest]s. The caller runs them
//! with [fetch], in any order and concurrently if it likes, then hands each
//! [LoadResponse] back to [ViewModel::resolve]. Responses built from filters
//! that are no longer current, or older than data already shown, are
//! discarded. Applying the budgets produces one more read per budget for its
//! spend in the current period, returned from [ViewModel::resolve].

use std::collections::HashMap;

use serde::Serialize;

use crate::{
    Error,
    aggregate::{Aggregate, aggregate, budget_progress},
    alert::Alert,
    budget::{Budget, BudgetId},
    category::{Category, CategoryId},
    filter::{DateWindow, FilterState, PriceBucket, Selector},
    pet::{Pet, PetId},
    query::{QueryContext, QueryScope, QuerySpec, budget_spend_query, build_query},
    record::{Collection, Record},
    store::RecordStore,
    transaction::Transaction,
};

/// A set of records a view depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dataset {
    /// The view's primary, filtered records.
    Records,
    /// Every category, for labels.
    Categories,
    /// The user's active budgets.
    Budgets,
    /// The user's pets, for the pet picker.
    Pets,
    /// The transactions counted against one budget in its current period,
    /// regardless of the view's filters.
    BudgetSpend(BudgetId),
}

/// Whether a dataset can be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// A read is in flight, show a placeholder.
    Loading,
    /// The latest read succeeded.
    Ready,
    /// The latest read failed, the dataset is shown as empty.
    Failed,
}

/// A read the caller should run against the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadRequest {
    /// The dataset the read fills.
    pub dataset: Dataset,
    /// The filters in force when the read was issued.
    pub snapshot: FilterState,
    /// Increases with every request the view issues.
    pub generation: u64,
    /// The read itself.
    pub query: QuerySpec,
}

/// The outcome of a [LoadRequest].
#[derive(Debug, PartialEq)]
pub struct LoadResponse {
    /// The request that was run.
    pub request: LoadRequest,
    /// The rows returned, or why the read failed.
    pub result: Result<Vec<Record>, Error>,
}

/// What [ViewModel::resolve] did with a response.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The response replaced the dataset.
    ///
    /// Holds the reads that depend on the new rows, e.g. the spend for each
    /// budget once the budgets are known. The caller runs these like any
    /// other request.
    Applied(Vec<LoadRequest>),
    /// The response was stale and ignored.
    Discarded,
}

#[derive(Debug, Clone)]
struct DatasetSlot {
    state: LoadState,
    records: Vec<Record>,
    applied_generation: Option<u64>,
}

impl DatasetSlot {
    fn loading() -> Self {
        Self {
            state: LoadState::Loading,
            records: Vec::new(),
            applied_generation: None,
        }
    }
}

/// Filter state, loaded datasets and pending alerts for one view.
#[derive(Debug, Clone)]
pub struct ViewModel {
    scope: QueryScope,
    context: QueryContext,
    filters: FilterState,
    datasets: Vec<Dataset>,
    slots: HashMap<Dataset, DatasetSlot>,
    next_generation: u64,
    alerts: Vec<Alert>,
}

impl ViewModel {
    /// Create a view for `scope` with default filters.
    ///
    /// Returns the view and the reads needed to show it. Views of transactions
    /// also load categories, budgets and pets.
    pub fn mount(scope: QueryScope, context: QueryContext) -> (Self, Vec<LoadRequest>) {
        let datasets = if scope.collection == Collection::Transactions {
            vec![
                Dataset::Records,
                Dataset::Categories,
                Dataset::Budgets,
                Dataset::Pets,
            ]
        } else {
            vec![Dataset::Records]
        };

        let mut view = Self {
            scope,
            context,
            filters: FilterState::default(),
            slots: datasets
                .iter()
                .map(|dataset| (*dataset, DatasetSlot::loading()))
                .collect(),
            datasets,
            next_generation: 0,
            alerts: Vec::new(),
        };

        let requests = view
            .datasets
            .clone()
            .into_iter()
            .filter_map(|dataset| view.reissue(dataset))
            .collect();

        (view, requests)
    }

    fn query_for(&self, dataset: Dataset) -> Option<QuerySpec> {
        let defaults = FilterState::default();

        let query = match dataset {
            Dataset::Records => build_query(&self.filters, &self.scope, &self.context),
            Dataset::Categories => {
                build_query(&defaults, &QueryScope::categories(), &self.context)
            }
            Dataset::Budgets => build_query(&defaults, &QueryScope::budgets(), &self.context),
            Dataset::Pets => build_query(&defaults, &QueryScope::pets(), &self.context),
            Dataset::BudgetSpend(budget_id) => {
                budget_spend_query(self.loaded_budget(budget_id)?, &self.context)
            }
        };

        Some(query)
    }

    fn loaded_budget(&self, budget_id: BudgetId) -> Option<&Budget> {
        self.records(Dataset::Budgets)
            .iter()
            .find_map(|record| match record {
                Record::Budget(budget) if budget.id == budget_id => Some(budget),
                _ => None,
            })
    }

    fn issue(&mut self, dataset: Dataset, query: QuerySpec) -> LoadRequest {
        self.next_generation += 1;

        let request = LoadRequest {
            dataset,
            snapshot: self.filters.clone(),
            generation: self.next_generation,
            query,
        };

        if let Some(slot) = self.slots.get_mut(&dataset) {
            slot.state = LoadState::Loading;
        }

        tracing::debug!(
            "issuing {:?} read, generation {}",
            dataset,
            request.generation
        );

        request
    }

    fn reissue(&mut self, dataset: Dataset) -> Option<LoadRequest> {
        let query = self.query_for(dataset)?;

        Some(self.issue(dataset, query))
    }

    fn reload_records(&mut self) -> LoadRequest {
        let query = build_query(&self.filters, &self.scope, &self.context);

        self.issue(Dataset::Records, query)
    }

    /// Show records for `pet`.
    pub fn set_pet(&mut self, pet: Selector<PetId>) -> LoadRequest {
        self.filters.set_pet(pet);
        self.reload_records()
    }

    /// Show records in `category`.
    pub fn set_category(&mut self, category: Selector<CategoryId>) -> LoadRequest {
        self.filters.set_category(category);
        self.reload_records()
    }

    /// Show records inside `window`.
    pub fn set_date_window(&mut self, window: DateWindow) -> LoadRequest {
        self.filters.set_date_window(window);
        self.reload_records()
    }

    /// Show records containing `text`.
    pub fn set_search(&mut self, text: &str) -> LoadRequest {
        self.filters.set_search(text);
        self.reload_records()
    }

    /// Show quotes in `bucket`.
    pub fn set_price_bucket(&mut self, bucket: PriceBucket) -> LoadRequest {
        self.filters.set_price_bucket(bucket);
        self.reload_records()
    }

    /// Replace all filters at once, e.g. from a query string.
    pub fn set_filters(&mut self, filters: FilterState) -> LoadRequest {
        self.filters = filters;
        self.reload_records()
    }

    /// Re-read every dataset backed by `collection`, e.g. after a write to it.
    pub fn invalidate(&mut self, collection: Collection) -> Vec<LoadRequest> {
        let stale: Vec<Dataset> = self
            .datasets
            .iter()
            .copied()
            .filter(|dataset| self.collection_of(*dataset) == collection)
            .collect();

        stale
            .into_iter()
            .filter_map(|dataset| self.reissue(dataset))
            .collect()
    }

    /// Report the outcome of a write made through the mutation gateway.
    ///
    /// Success re-reads the written collection. Either way an alert is queued.
    pub fn apply_write(&mut self, result: Result<Record, Error>) -> Vec<LoadRequest> {
        match result {
            Ok(record) => {
                self.alerts
                    .push(Alert::success("Saved", "Your changes have been saved."));
                self.invalidate(record.collection())
            }
            Err(error) => {
                self.alerts.push(error.into_alert());
                Vec::new()
            }
        }
    }

    fn collection_of(&self, dataset: Dataset) -> Collection {
        match dataset {
            Dataset::Records => self.scope.collection,
            Dataset::Categories => Collection::Categories,
            Dataset::Budgets => Collection::Budgets,
            Dataset::Pets => Collection::Pets,
            Dataset::BudgetSpend(_) => Collection::Transactions,
        }
    }

    /// Apply `response` unless it is stale.
    ///
    /// A response for the primary records is stale if the filters have changed
    /// since it was requested. Any response is stale if a newer one for the
    /// same dataset has already been applied. A failed read empties the dataset
    /// and queues an error alert.
    pub fn resolve(&mut self, response: LoadResponse) -> Resolution {
        let LoadResponse { request, result } = response;

        if request.dataset == Dataset::Records && request.snapshot != self.filters {
            tracing::warn!(
                "discarding records for filters {:?}, current filters are {:?}",
                request.snapshot,
                self.filters
            );
            return Resolution::Discarded;
        }

        let Some(slot) = self.slots.get_mut(&request.dataset) else {
            tracing::warn!("discarding response for unused dataset {:?}", request.dataset);
            return Resolution::Discarded;
        };

        if slot
            .applied_generation
            .is_some_and(|applied| request.generation < applied)
        {
            tracing::warn!(
                "discarding {:?} generation {}, generation {:?} already applied",
                request.dataset,
                request.generation,
                slot.applied_generation
            );
            return Resolution::Discarded;
        }

        slot.applied_generation = Some(request.generation);

        match result {
            Ok(records) => {
                slot.state = LoadState::Ready;
                slot.records = records;
            }
            Err(error) => {
                slot.state = LoadState::Failed;
                slot.records = Vec::new();
                self.alerts.push(error.into_alert());
            }
        }

        if request.dataset == Dataset::Budgets {
            Resolution::Applied(self.track_budget_spend())
        } else {
            Resolution::Applied(Vec::new())
        }
    }

    /// Replace the per-budget spend datasets with one for each loaded budget.
    fn track_budget_spend(&mut self) -> Vec<LoadRequest> {
        self.slots
            .retain(|dataset, _| !matches!(dataset, Dataset::BudgetSpend(_)));
        self.datasets
            .retain(|dataset| !matches!(dataset, Dataset::BudgetSpend(_)));

        let spend: Vec<Dataset> = self
            .budgets()
            .iter()
            .map(|budget| Dataset::BudgetSpend(budget.id))
            .collect();

        for dataset in &spend {
            self.slots.insert(*dataset, DatasetSlot::loading());
        }
        self.datasets.extend(spend.iter().copied());

        spend
            .into_iter()
            .filter_map(|dataset| self.reissue(dataset))
            .collect()
    }

    /// The aggregate over the loaded records, `None` while an input is loading.
    ///
    /// Totals and category splits cover the filtered records. Each budget is
    /// measured against its own spend in its current period. Failed inputs
    /// count as empty.
    pub fn aggregate(&self) -> Option<Aggregate> {
        let waiting = self
            .slots
            .iter()
            .any(|(dataset, slot)| *dataset != Dataset::Pets && slot.state == LoadState::Loading);

        if waiting {
            return None;
        }

        let mut summary = aggregate(&self.transactions(), &self.categories(), &[]);
        summary.budget_progress = self
            .budgets()
            .iter()
            .map(|budget| budget_progress(budget, &self.budget_spend(budget.id)))
            .collect();

        Some(summary)
    }

    /// The load state of `dataset`, `None` if the view does not use it.
    pub fn state(&self, dataset: Dataset) -> Option<LoadState> {
        self.slots.get(&dataset).map(|slot| slot.state)
    }

    /// The rows loaded for `dataset`.
    pub fn records(&self, dataset: Dataset) -> &[Record] {
        self.slots
            .get(&dataset)
            .map_or(&[], |slot| slot.records.as_slice())
    }

    /// The loaded primary records that are transactions.
    pub fn transactions(&self) -> Vec<Transaction> {
        Record::transactions(self.records(Dataset::Records).to_vec())
    }

    /// The transactions counted against `budget_id` in its current period.
    pub fn budget_spend(&self, budget_id: BudgetId) -> Vec<Transaction> {
        Record::transactions(self.records(Dataset::BudgetSpend(budget_id)).to_vec())
    }

    /// The loaded categories.
    pub fn categories(&self) -> Vec<Category> {
        Record::categories(self.records(Dataset::Categories).to_vec())
    }

    /// The loaded budgets.
    pub fn budgets(&self) -> Vec<Budget> {
        Record::budgets(self.records(Dataset::Budgets).to_vec())
    }

    /// The loaded pets.
    pub fn pets(&self) -> Vec<Pet> {
        Record::pets(self.records(Dataset::Pets).to_vec())
    }

    /// The current filters.
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The values queries are built with.
    pub fn context(&self) -> &QueryContext {
        &self.context
    }

    /// Queue an alert for the user.
    pub fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    /// Alerts that have not been shown yet.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Remove and return the queued alerts.
    pub fn take_alerts(&mut self) -> Vec<Alert> {
        std::mem::take(&mut self.alerts)
    }
}

/// Run `request` against `store`.
pub async fn fetch<S: RecordStore>(store: &S, request: LoadRequest) -> LoadResponse {
    let result = store.select(&request.query).await;

    LoadResponse { request, result }
}

/// Run `requests` and everything they lead to until the view has nothing left to load.
pub async fn load_all<S: RecordStore>(
    view: &mut ViewModel,
    store: &S,
    requests: Vec<LoadRequest>,
) {
    let mut pending = requests;

    while let Some(request) = pending.pop() {
        if let Resolution::Applied(follow_ups) = view.resolve(fetch(store, request).await) {
            pending.extend(follow_ups);
        }
    }
}
