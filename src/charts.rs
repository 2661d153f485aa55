//! ECharts options for the dashboard charts.
//!
//! - **Spending by category**: doughnut of the aggregate's category split
//! - **Monthly expenses**: bar chart of spend per calendar month
//!
//! The options serialise to JSON with `to_string()`, rendering is up to the caller.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger,
    },
    series::{Pie, bar::Bar},
};
use serde::Serialize;

use crate::{
    aggregate::{Aggregate, monthly_expenses},
    transaction::Transaction,
};

/// A chart with the ID of the element it should be drawn in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Both dashboard charts for a loaded view.
pub fn dashboard_charts(aggregate: &Aggregate, records: &[Transaction]) -> Vec<DashboardChart> {
    vec![
        DashboardChart {
            id: "category-chart",
            options: category_chart(aggregate).to_string(),
        },
        DashboardChart {
            id: "monthly-expenses-chart",
            options: monthly_expenses_chart(records).to_string(),
        },
    ]
}

/// A doughnut chart of spend per category.
pub fn category_chart(aggregate: &Aggregate) -> Chart {
    let data: Vec<(f64, &str)> = aggregate
        .by_category
        .iter()
        .map(|total| (total.total, total.label.as_str()))
        .collect();

    Chart::new()
        .title(Title::new().text("Spending by category").left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().bottom("1%"))
        .series(
            Pie::new()
                .name("Spending")
                .radius(vec!["40%", "70%"])
                .data(data),
        )
}

/// A bar chart of spend per calendar month.
pub fn monthly_expenses_chart(records: &[Transaction]) -> Chart {
    let (labels, values): (Vec<String>, Vec<f64>) = monthly_expenses(records).into_iter().unzip();

    Chart::new()
        .title(Title::new().text("Monthly Expenses").left(20).top("1%"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Expenses").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-GB', {
              style: 'currency',
              currency: 'GBP'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}
