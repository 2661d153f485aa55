use std::error::Error;

use clap::Parser;
use rusqlite::Connection;
use serde::Serialize;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use pawfolio::{
    Aggregate, Alert, AppState, Dataset, FilterState, QueryScope, Record, RecordStore,
    SavingsSummary, UserId, ViewModel, build_query, dashboard_charts, format_currency, load_all,
    savings_summary,
};

/// Loads the dashboard for a user and prints what it would show.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long)]
    db_path: String,

    /// The signed in user.
    #[arg(long, default_value_t = 1)]
    user_id: i64,

    /// The canonical name of the local timezone, e.g. "Europe/London".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Filters as a URL query string, e.g. "pet=1&window=month&search=vet".
    #[arg(long, default_value = "")]
    filter: String,

    /// Print the ECharts options instead of the aggregate.
    #[arg(long)]
    charts: bool,
}

#[derive(Serialize)]
struct Summary {
    filters: String,
    window: &'static str,
    total: String,
    aggregate: Aggregate,
    pets: Vec<PetSummary>,
    savings: SavingsSummary,
    alerts: Vec<Alert>,
}

#[derive(Serialize)]
struct PetSummary {
    name: String,
    species: String,
    age: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    setup_logging();

    let args = Args::parse();

    let state = AppState::new(Connection::open(&args.db_path)?, &args.timezone)?;
    let store = state.store();
    let context = state.query_context(Some(UserId::new(args.user_id)))?;
    let filters = FilterState::from_query_string(&args.filter)?;

    let (mut view, mut requests) = ViewModel::mount(QueryScope::transactions(), context);
    if filters != FilterState::default() {
        requests.retain(|request| request.dataset != Dataset::Records);
        requests.push(view.set_filters(filters));
    }

    load_all(&mut view, &store, requests).await;

    let Some(aggregate) = view.aggregate() else {
        return Err("the dashboard did not finish loading".into());
    };

    for warning in aggregate.budget_warnings() {
        view.push_alert(warning.into_alert());
    }

    let opportunities = build_query(&FilterState::default(), &QueryScope::opportunities(), &context);
    let savings = match store.select(&opportunities).await {
        Ok(records) => savings_summary(&Record::opportunities(records)),
        Err(error) => {
            view.push_alert(error.into_alert());
            SavingsSummary::default()
        }
    };

    let output = if args.charts {
        serde_json::to_string_pretty(&dashboard_charts(&aggregate, &view.transactions()))?
    } else {
        serde_json::to_string_pretty(&Summary {
            filters: view.filters().to_query_string(),
            window: view.filters().date_window.label(),
            total: format_currency(aggregate.total_amount),
            aggregate,
            pets: view
                .pets()
                .iter()
                .map(|pet| PetSummary {
                    name: pet.name.to_string(),
                    species: pet.species.clone(),
                    age: pet.age_label(),
                })
                .collect(),
            savings,
            alerts: view.take_alerts(),
        })?
    };

    println!("{output}");

    Ok(())
}

fn setup_logging() {
    let stderr_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(stderr_log)
        .init();
}
