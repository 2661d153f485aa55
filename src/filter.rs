//! The user's current filter selections.
//!
//! A [FilterState] is a plain value. It is created with defaults when a view
//! mounts, changed one dimension at a time and never persisted.

use serde::{Deserialize, Serialize};
use time::{Date, Duration};

use crate::{Error, category::CategoryId, pet::PetId};

/// Either every value of a dimension or one specific value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Selector<T> {
    /// Do not filter on this dimension.
    #[default]
    All,
    /// Only include records matching this value.
    Only(T),
}

impl<T: Copy> Selector<T> {
    /// The selected value, `None` for [Selector::All].
    pub fn value(&self) -> Option<T> {
        match self {
            Self::All => None,
            Self::Only(value) => Some(*value),
        }
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Only(value),
            None => Self::All,
        }
    }
}

/// How far back to look for records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DateWindow {
    /// No date restriction.
    #[default]
    All,
    /// The last seven days.
    Week,
    /// The last thirty days.
    Month,
    /// The last ninety days.
    Quarter,
}

impl DateWindow {
    /// The earliest date included in the window, counting back from `today`.
    pub fn lower_bound(self, today: Date) -> Option<Date> {
        match self {
            Self::All => None,
            Self::Week => Some(today - Duration::days(7)),
            Self::Month => Some(today - Duration::days(30)),
            Self::Quarter => Some(today - Duration::days(90)),
        }
    }

    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
        }
    }

    /// The label shown in the window picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All time",
            Self::Week => "Last 7 days",
            Self::Month => "Last 30 days",
            Self::Quarter => "Last 90 days",
        }
    }
}

/// Monthly premium bands for insurance quotes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PriceBucket {
    /// Any price.
    #[default]
    All,
    /// £30 or less per month.
    Low,
    /// More than £30, up to £60 per month.
    Medium,
    /// More than £60 per month.
    High,
}

impl PriceBucket {
    /// The exclusive lower and inclusive upper premium bounds, `None` for [PriceBucket::All].
    pub fn premium_bounds(self) -> Option<(Option<f64>, Option<f64>)> {
        match self {
            Self::All => None,
            Self::Low => Some((None, Some(30.0))),
            Self::Medium => Some((Some(30.0), Some(60.0))),
            Self::High => Some((Some(60.0), None)),
        }
    }

    /// Whether a quote with `monthly_premium` falls in the bucket.
    pub fn contains(self, monthly_premium: Option<f64>) -> bool {
        let premium = monthly_premium.unwrap_or(0.0);

        match self.premium_bounds() {
            None => true,
            Some((above, at_most)) => {
                above.is_none_or(|above| premium > above)
                    && at_most.is_none_or(|at_most| premium <= at_most)
            }
        }
    }

    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

/// The active filter values of a view.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct FilterState {
    /// Which pet to show.
    pub pet: Selector<PetId>,
    /// Which category to show.
    pub category: Selector<CategoryId>,
    /// How far back to look.
    pub date_window: DateWindow,
    /// Free text to match against names and descriptions.
    pub search: String,
    /// Which premium band to show, used by the quote list only.
    pub price_bucket: PriceBucket,
}

impl FilterState {
    /// Show records for `pet`.
    pub fn set_pet(&mut self, pet: Selector<PetId>) {
        self.pet = pet;
    }

    /// Show records in `category`.
    pub fn set_category(&mut self, category: Selector<CategoryId>) {
        self.category = category;
    }

    /// Show records inside `window`.
    pub fn set_date_window(&mut self, window: DateWindow) {
        self.date_window = window;
    }

    /// Show records that contain `text`.
    pub fn set_search(&mut self, text: &str) {
        self.search = text.to_owned();
    }

    /// Show quotes in `bucket`.
    pub fn set_price_bucket(&mut self, bucket: PriceBucket) {
        self.price_bucket = bucket;
    }

    /// Parse filters from a URL query string such as `pet=3&window=week&search=vet`.
    ///
    /// Missing keys keep their defaults and "all" selects every value.
    ///
    /// # Errors
    /// Returns [Error::ValidationFailed] if a value cannot be parsed.
    pub fn from_query_string(query: &str) -> Result<Self, Error> {
        let query: FilterQuery = serde_urlencoded::from_str(query)
            .map_err(|error| Error::ValidationFailed(format!("invalid filter: {error}")))?;

        Ok(Self {
            pet: parse_selector("pet", query.pet.as_deref())?,
            category: parse_selector("category", query.category.as_deref())?,
            date_window: query.window.unwrap_or_default(),
            search: query.search.unwrap_or_default(),
            price_bucket: query.price.unwrap_or_default(),
        })
    }

    /// Render the filters as a URL query string, omitting defaults.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = Vec::new();

        if let Selector::Only(pet_id) = self.pet {
            pairs.push(("pet", pet_id.to_string()));
        }
        if let Selector::Only(category_id) = self.category {
            pairs.push(("category", category_id.to_string()));
        }
        if self.date_window != DateWindow::All {
            pairs.push(("window", self.date_window.as_query_value().to_owned()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if self.price_bucket != PriceBucket::All {
            pairs.push(("price", self.price_bucket.as_query_value().to_owned()));
        }

        serde_urlencoded::to_string(pairs).unwrap_or_default()
    }
}

#[derive(Deserialize)]
struct FilterQuery {
    pet: Option<String>,
    category: Option<String>,
    window: Option<DateWindow>,
    search: Option<String>,
    price: Option<PriceBucket>,
}

fn parse_selector(key: &str, value: Option<&str>) -> Result<Selector<i64>, Error> {
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(Selector::All),
        Some(raw) => raw
            .parse()
            .map(Selector::Only)
            .map_err(|_| Error::ValidationFailed(format!("invalid {key} \"{raw}\""))),
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        filter::{DateWindow, FilterState, PriceBucket, Selector},
    };

    #[test]
    fn window_labels_name_the_span() {
        assert_eq!(DateWindow::All.label(), "All time");
        assert_eq!(DateWindow::Quarter.label(), "Last 90 days");
    }

    #[test]
    fn week_window_starts_seven_days_back() {
        assert_eq!(
            DateWindow::Week.lower_bound(date!(2025 - 03 - 10)),
            Some(date!(2025 - 03 - 03))
        );
        assert_eq!(DateWindow::All.lower_bound(date!(2025 - 03 - 10)), None);
    }

    #[test]
    fn quarter_window_starts_ninety_days_back() {
        assert_eq!(
            DateWindow::Quarter.lower_bound(date!(2025 - 03 - 31)),
            Some(date!(2024 - 12 - 31))
        );
    }

    #[test]
    fn parses_query_string() {
        let filters = FilterState::from_query_string("pet=3&window=week&search=vet&price=low")
            .expect("Could not parse filters");

        assert_eq!(
            filters,
            FilterState {
                pet: Selector::Only(3),
                category: Selector::All,
                date_window: DateWindow::Week,
                search: "vet".to_owned(),
                price_bucket: PriceBucket::Low,
            }
        );
    }

    #[test]
    fn all_and_empty_select_everything() {
        let filters = FilterState::from_query_string("pet=all&category=").unwrap();

        assert_eq!(filters, FilterState::default());
    }

    #[test]
    fn invalid_pet_is_rejected() {
        let result = FilterState::from_query_string("pet=max");

        assert!(matches!(result, Err(Error::ValidationFailed(_))));
    }

    #[test]
    fn query_string_omits_defaults() {
        let mut filters = FilterState::default();
        filters.set_category(Selector::Only(2));
        filters.set_search("city vets");

        assert_eq!(filters.to_query_string(), "category=2&search=city+vets");
    }
}
