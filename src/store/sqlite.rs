//! A [RecordStore] backed by the app's SQLite database.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Row, ToSql, params_from_iter};

use crate::{
    Error,
    bank_account::{BANK_ACCOUNT_COLUMNS, create_bank_account, map_bank_account_row},
    budget::{BUDGET_COLUMNS, create_budget, map_budget_row, update_budget},
    category::{CATEGORY_COLUMNS, map_category_row},
    db::{deactivate_row, delete_row},
    insurance::{PROVIDER_COLUMNS, QUOTE_COLUMNS, map_provider_row, map_quote_row},
    mutation::{Mutation, NewRecord},
    opportunity::{OPPORTUNITY_COLUMNS, map_opportunity_row},
    pet::{PET_COLUMNS, create_pet, map_pet_row, update_pet},
    query::{OrderBy, Predicate, QuerySpec},
    record::{Collection, Record, RecordRef},
    store::RecordStore,
    transaction::{TRANSACTION_COLUMNS, create_transaction, map_transaction_row, update_transaction},
    user::UserId,
};

/// Reads and writes records through a shared SQLite connection.
#[derive(Debug, Clone)]
pub struct SqliteRecordStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteRecordStore {
    /// Create a store over a connection whose schema has been initialized.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl RecordStore for SqliteRecordStore {
    async fn select(&self, query: &QuerySpec) -> Result<Vec<Record>, Error> {
        tracing::debug!("selecting {:?}", query);

        let connection = self.connection.lock().map_err(|_| {
            tracing::error!("could not acquire the database lock for a read");
            Error::StoreReadFailed(Error::DatabaseLockError.to_string())
        })?;

        select_records(query, &connection).map_err(|error| {
            tracing::error!("could not select {:?}: {}", query.collection, error);
            Error::StoreReadFailed(error.to_string())
        })
    }

    async fn write(&self, owner: UserId, mutation: &Mutation) -> Result<Record, Error> {
        tracing::debug!("user {} writing {:?}", owner, mutation);

        let connection = self.connection.lock().map_err(|_| {
            tracing::error!("could not acquire the database lock for a write");
            Error::StoreWriteFailed(Error::DatabaseLockError.to_string())
        })?;

        write_record(owner, mutation, &connection).map_err(|error| {
            tracing::error!("could not write {:?}: {}", mutation, error);
            Error::StoreWriteFailed(error.to_string())
        })
    }
}

fn columns(collection: Collection) -> &'static str {
    match collection {
        Collection::Pets => PET_COLUMNS,
        Collection::Categories => CATEGORY_COLUMNS,
        Collection::Transactions => TRANSACTION_COLUMNS,
        Collection::Budgets => BUDGET_COLUMNS,
        Collection::Opportunities => OPPORTUNITY_COLUMNS,
        Collection::BankAccounts => BANK_ACCOUNT_COLUMNS,
        Collection::Providers => PROVIDER_COLUMNS,
        Collection::Quotes => QUOTE_COLUMNS,
    }
}

fn map_record_row(collection: Collection, row: &Row) -> Result<Record, rusqlite::Error> {
    let record = match collection {
        Collection::Pets => map_pet_row(row)?.into(),
        Collection::Categories => map_category_row(row)?.into(),
        Collection::Transactions => map_transaction_row(row)?.into(),
        Collection::Budgets => map_budget_row(row)?.into(),
        Collection::Opportunities => map_opportunity_row(row)?.into(),
        Collection::BankAccounts => map_bank_account_row(row)?.into(),
        Collection::Providers => map_provider_row(row)?.into(),
        Collection::Quotes => map_quote_row(row)?.into(),
    };

    Ok(record)
}

fn order_clause(order_by: OrderBy) -> &'static str {
    match order_by {
        OrderBy::DateDesc => "date DESC, id DESC",
        OrderBy::NewestFirst => "id DESC",
        OrderBy::NameAsc => "name COLLATE NOCASE ASC, id ASC",
        OrderBy::RatingDesc => "rating DESC, id ASC",
    }
}

/// Escape the LIKE wildcards in `text` so it is matched literally.
fn like_pattern(text: &str) -> String {
    let escaped = text
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");

    format!("%{escaped}%")
}

fn where_clause(query: &QuerySpec) -> (String, Vec<Box<dyn ToSql>>) {
    let mut conditions: Vec<String> = Vec::new();
    let mut params: Vec<Box<dyn ToSql>> = Vec::new();

    for predicate in &query.predicates {
        match predicate {
            Predicate::OwnedBy(owner) => {
                conditions.push("user_id = ?".to_owned());
                params.push(Box::new(owner.as_i64()));
            }
            Predicate::Pet(pet_id) => {
                conditions.push("pet_id = ?".to_owned());
                params.push(Box::new(*pet_id));
            }
            Predicate::Category(category_id) => {
                conditions.push("category_id = ?".to_owned());
                params.push(Box::new(*category_id));
            }
            Predicate::OnOrAfter(date) => {
                conditions.push("date >= ?".to_owned());
                params.push(Box::new(*date));
            }
            Predicate::OnOrBefore(date) => {
                conditions.push("date <= ?".to_owned());
                params.push(Box::new(*date));
            }
            Predicate::TextContains(text) => {
                let pattern = like_pattern(text);
                let matches: Vec<String> = query
                    .collection
                    .text_columns()
                    .iter()
                    .map(|column| {
                        params.push(Box::new(pattern.clone()));
                        format!("LOWER(COALESCE({column}, '')) LIKE ? ESCAPE '\\'")
                    })
                    .collect();
                conditions.push(format!("({})", matches.join(" OR ")));
            }
            Predicate::Active => conditions.push("is_active = 1".to_owned()),
            Predicate::PremiumRange { above, at_most } => {
                if let Some(above) = above {
                    conditions.push("COALESCE(monthly_premium, 0) > ?".to_owned());
                    params.push(Box::new(*above));
                }
                if let Some(at_most) = at_most {
                    conditions.push("COALESCE(monthly_premium, 0) <= ?".to_owned());
                    params.push(Box::new(*at_most));
                }
            }
        }
    }

    if conditions.is_empty() {
        (String::new(), params)
    } else {
        (format!(" WHERE {}", conditions.join(" AND ")), params)
    }
}

fn select_records(query: &QuerySpec, connection: &Connection) -> Result<Vec<Record>, Error> {
    let (where_sql, params) = where_clause(query);
    let limit_sql = match query.limit {
        Some(limit) => format!(" LIMIT {limit}"),
        None => String::new(),
    };
    let sql = format!(
        "SELECT {} FROM {}{where_sql} ORDER BY {}{limit_sql}",
        columns(query.collection),
        query.collection.table(),
        order_clause(query.order_by),
    );

    let collection = query.collection;
    connection
        .prepare(&sql)?
        .query_map(params_from_iter(params.iter()), |row| {
            map_record_row(collection, row)
        })?
        .map(|maybe_record| maybe_record.map_err(Error::from))
        .collect()
}

fn get_record(
    reference: RecordRef,
    owner: UserId,
    connection: &Connection,
) -> Result<Record, Error> {
    let collection = reference.collection;
    let owner_sql = if collection.is_user_owned() {
        " AND user_id = ?2"
    } else {
        ""
    };
    let sql = format!(
        "SELECT {} FROM {} WHERE id = ?1{owner_sql}",
        columns(collection),
        collection.table(),
    );

    let mut statement = connection.prepare(&sql)?;
    let record = if collection.is_user_owned() {
        statement.query_row((reference.id, owner.as_i64()), |row| {
            map_record_row(collection, row)
        })?
    } else {
        statement.query_row([reference.id], |row| map_record_row(collection, row))?
    };

    Ok(record)
}

fn write_record(owner: UserId, mutation: &Mutation, connection: &Connection) -> Result<Record, Error> {
    match mutation {
        Mutation::Create(NewRecord::Expense(form)) => {
            create_transaction(form.to_builder(), owner, connection).map(Record::from)
        }
        Mutation::Create(NewRecord::Pet(form)) => {
            create_pet(form.to_builder()?, owner, connection).map(Record::from)
        }
        Mutation::Create(NewRecord::Budget(form)) => {
            create_budget(form.to_builder(), owner, connection).map(Record::from)
        }
        Mutation::Create(NewRecord::BankAccount(account)) => {
            create_bank_account(&account.with_defaults(), owner, connection).map(Record::from)
        }
        Mutation::Update(Record::Transaction(transaction)) => {
            update_transaction(transaction, owner, connection).map(Record::from)
        }
        Mutation::Update(Record::Pet(pet)) => update_pet(pet, owner, connection).map(Record::from),
        Mutation::Update(Record::Budget(budget)) => {
            update_budget(budget, owner, connection).map(Record::from)
        }
        Mutation::Update(record) => Err(read_only(record.collection())),
        Mutation::Deactivate(reference) => {
            if !reference.collection.supports_soft_delete() {
                return Err(Error::ValidationFailed(format!(
                    "{:?} cannot be deactivated",
                    reference.collection
                )));
            }

            deactivate_row(reference.collection.table(), reference.id, owner, connection)?;
            get_record(*reference, owner, connection)
        }
        Mutation::Delete(reference) => {
            if !reference.collection.is_writable() {
                return Err(read_only(reference.collection));
            }

            let record = get_record(*reference, owner, connection).map_err(|error| match error {
                Error::NotFound => Error::DeleteMissingRecord,
                error => error,
            })?;
            delete_row(reference.collection.table(), record.id(), owner, connection)?;

            Ok(record)
        }
    }
}

fn read_only(collection: Collection) -> Error {
    Error::ValidationFailed(format!("{collection:?} are read-only"))
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use time::{Duration, macros::date};

    use crate::{
        Error,
        budget::Budget,
        filter::{DateWindow, FilterState, PriceBucket},
        mutation::{BudgetForm, Mutation, NewRecord},
        period::BudgetPeriod,
        pet::{Pet, PetName, create_pet},
        query::{OrderBy, Predicate, QueryContext, QueryScope, QuerySpec, build_query},
        record::{Collection, Record, RecordRef},
        store::{RecordStore, SqliteRecordStore},
        test_utils::{get_test_connection, seed_quotes},
        transaction::{Transaction, create_transaction},
        user::UserId,
    };

    fn store_with(setup: impl FnOnce(&rusqlite::Connection)) -> SqliteRecordStore {
        let connection = get_test_connection();
        setup(&connection);
        SqliteRecordStore::new(Arc::new(Mutex::new(connection)))
    }

    #[tokio::test]
    async fn week_window_excludes_older_records() {
        let today = date!(2025 - 03 - 10);
        let owner = UserId::new(1);
        let store = store_with(|connection| {
            for (days_ago, description) in [(7, "edge"), (8, "too old"), (0, "today")] {
                create_transaction(
                    Transaction::build(-10.0, today - Duration::days(days_ago), description),
                    owner,
                    connection,
                )
                .unwrap();
            }
        });
        let filters = FilterState {
            date_window: DateWindow::Week,
            ..Default::default()
        };
        let query = build_query(
            &filters,
            &QueryScope::transactions(),
            &QueryContext {
                today,
                owner: Some(owner),
            },
        );

        let records = Record::transactions(store.select(&query).await.unwrap());

        let descriptions: Vec<&str> = records.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, vec!["today", "edge"]);
    }

    #[tokio::test]
    async fn text_search_matches_merchant_ignoring_case() {
        let owner = UserId::new(1);
        let store = store_with(|connection| {
            create_transaction(
                Transaction::build(-120.0, date!(2025 - 03 - 01), "Consultation")
                    .merchant_name(Some("City Vets".to_owned())),
                owner,
                connection,
            )
            .unwrap();
            create_transaction(
                Transaction::build(-45.99, date!(2025 - 03 - 02), "Premium Pet Food"),
                owner,
                connection,
            )
            .unwrap();
        });
        let query = QuerySpec {
            collection: Collection::Transactions,
            predicates: vec![Predicate::TextContains("VETS".to_owned())],
            order_by: OrderBy::DateDesc,
            limit: None,
        };

        let records = Record::transactions(store.select(&query).await.unwrap());

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].description, "Consultation");
    }

    #[tokio::test]
    async fn wildcards_in_search_are_literal() {
        let owner = UserId::new(1);
        let store = store_with(|connection| {
            create_transaction(
                Transaction::build(-5.0, date!(2025 - 03 - 01), "Treats"),
                owner,
                connection,
            )
            .unwrap();
        });
        let query = QuerySpec {
            collection: Collection::Transactions,
            predicates: vec![Predicate::TextContains("%".to_owned())],
            order_by: OrderBy::DateDesc,
            limit: None,
        };

        assert!(store.select(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn owner_predicate_hides_other_users() {
        let store = store_with(|connection| {
            create_pet(
                Pet::build(PetName::new_unchecked("Max"), "dog"),
                UserId::new(1),
                connection,
            )
            .unwrap();
            create_pet(
                Pet::build(PetName::new_unchecked("Rex"), "dog"),
                UserId::new(2),
                connection,
            )
            .unwrap();
        });
        let query = build_query(
            &FilterState::default(),
            &QueryScope::pets(),
            &QueryContext {
                today: date!(2025 - 03 - 10),
                owner: Some(UserId::new(2)),
            },
        );

        let pets = Record::pets(store.select(&query).await.unwrap());

        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].name.as_ref(), "Rex");
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let owner = UserId::new(1);
        let store = store_with(|connection| {
            for day in 1..=12 {
                create_transaction(
                    Transaction::build(-1.0, date!(2025 - 03 - 01) + Duration::days(day), ""),
                    owner,
                    connection,
                )
                .unwrap();
            }
        });
        let query = build_query(
            &FilterState::default(),
            &QueryScope::recent_transactions(),
            &QueryContext {
                today: date!(2025 - 03 - 31),
                owner: Some(owner),
            },
        );

        let records = Record::transactions(store.select(&query).await.unwrap());

        assert_eq!(records.len(), 10);
        assert_eq!(records[0].date, date!(2025 - 03 - 13));
    }

    #[tokio::test]
    async fn price_bucket_counts_missing_premium_as_low() {
        let owner = UserId::new(1);
        let store = store_with(|connection| seed_quotes(owner, connection));
        let context = QueryContext {
            today: date!(2025 - 03 - 10),
            owner: Some(owner),
        };
        let premiums_for = |bucket: PriceBucket| {
            let filters = FilterState {
                price_bucket: bucket,
                ..Default::default()
            };
            build_query(&filters, &QueryScope::quotes(), &context)
        };

        let low = Record::quotes(store.select(&premiums_for(PriceBucket::Low)).await.unwrap());
        let medium =
            Record::quotes(store.select(&premiums_for(PriceBucket::Medium)).await.unwrap());
        let high = Record::quotes(store.select(&premiums_for(PriceBucket::High)).await.unwrap());

        let mut low_premiums: Vec<Option<f64>> = low.iter().map(|q| q.monthly_premium).collect();
        low_premiums.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(low_premiums, vec![None, Some(30.0)]);
        assert_eq!(medium.len(), 1);
        assert_eq!(medium[0].monthly_premium, Some(60.0));
        assert_eq!(high.len(), 1);
        assert_eq!(high[0].monthly_premium, Some(60.01));
    }

    #[tokio::test]
    async fn deactivated_budget_is_hidden() {
        let owner = UserId::new(1);
        let store = store_with(|_| {});
        let created = store
            .write(
                owner,
                &Mutation::Create(NewRecord::Budget(BudgetForm {
                    name: "Toys".to_owned(),
                    limit: 50.0,
                    period: BudgetPeriod::Monthly,
                    category_id: None,
                    pet_id: None,
                })),
            )
            .await
            .unwrap();

        let deactivated = store
            .write(owner, &Mutation::Deactivate(created.reference()))
            .await
            .unwrap();
        let query = build_query(
            &FilterState::default(),
            &QueryScope::budgets(),
            &QueryContext {
                today: date!(2025 - 03 - 10),
                owner: Some(owner),
            },
        );

        assert!(matches!(deactivated, Record::Budget(Budget { is_active: false, .. })));
        assert!(store.select(&query).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_returns_removed_record() {
        let owner = UserId::new(1);
        let store = store_with(|connection| {
            create_pet(
                Pet::build(PetName::new_unchecked("Max"), "dog"),
                owner,
                connection,
            )
            .unwrap();
        });
        let reference = RecordRef {
            collection: Collection::Pets,
            id: 1,
        };

        let deleted = store.write(owner, &Mutation::Delete(reference)).await.unwrap();
        let again = store.write(owner, &Mutation::Delete(reference)).await;

        assert_eq!(deleted.reference(), reference);
        assert_eq!(
            again,
            Err(Error::StoreWriteFailed(Error::DeleteMissingRecord.to_string()))
        );
    }

    #[tokio::test]
    async fn delete_of_other_users_record_fails() {
        let store = store_with(|connection| {
            create_pet(
                Pet::build(PetName::new_unchecked("Max"), "dog"),
                UserId::new(1),
                connection,
            )
            .unwrap();
        });

        let result = store
            .write(
                UserId::new(2),
                &Mutation::Delete(RecordRef {
                    collection: Collection::Pets,
                    id: 1,
                }),
            )
            .await;

        assert!(matches!(result, Err(Error::StoreWriteFailed(_))));
    }
}
