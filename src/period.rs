//! Calendar period helpers for budgets and monthly charts.

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month};

/// An inclusive range of dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls inside the range.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// How often a budget resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BudgetPeriod {
    /// Monday to Sunday.
    Weekly,
    /// A calendar month.
    Monthly,
    /// A calendar quarter.
    Quarterly,
    /// A calendar year.
    Yearly,
}

impl BudgetPeriod {
    /// The period that contains `today`.
    pub fn current_range(self, today: Date) -> DateRange {
        match self {
            Self::Weekly => week_bounds(today),
            Self::Monthly => month_bounds(today.year(), today.month()),
            Self::Quarterly => quarter_bounds(today.year(), today.month()),
            Self::Yearly => year_bounds(today.year()),
        }
    }

    /// The value stored in the database.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Parse the value stored in the database.
    pub fn from_stored(value: &str) -> Option<Self> {
        match value {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "quarterly" => Some(Self::Quarterly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

fn week_bounds(anchor_date: Date) -> DateRange {
    let weekday_number = anchor_date.weekday().number_from_monday() as i64;
    let start = anchor_date - Duration::days(weekday_number - 1);
    let end = start + Duration::days(6);

    DateRange { start, end }
}

fn month_bounds(year: i32, month: Month) -> DateRange {
    let start = first_of(year, month);
    let end = start + Duration::days(last_day_of_month(year, month) as i64 - 1);

    DateRange { start, end }
}

fn quarter_bounds(year: i32, month: Month) -> DateRange {
    let quarter_start = ((month as u8 - 1) / 3) * 3 + 1;
    let start_month = Month::try_from(quarter_start).unwrap_or(Month::January);
    let end_month = start_month.next().next();

    DateRange {
        start: first_of(year, start_month),
        end: month_bounds(year, end_month).end,
    }
}

fn year_bounds(year: i32) -> DateRange {
    DateRange {
        start: first_of(year, Month::January),
        end: month_bounds(year, Month::December).end,
    }
}

fn first_of(year: i32, month: Month) -> Date {
    // Day one exists in every month of every year `time` can represent.
    Date::from_calendar_date(year, month, 1).unwrap_or(Date::MIN)
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Label a month for chart axes, e.g. "Mar 2025".
pub fn month_label(date: Date) -> String {
    format!("{} {}", month_abbrev(date.month()), date.year())
}

fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::{BudgetPeriod, DateRange, month_label};

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2025-10-15 is a Wednesday.
        let range = BudgetPeriod::Weekly.current_range(date!(2025 - 10 - 15));

        assert_eq!(
            range,
            DateRange {
                start: date!(2025 - 10 - 13),
                end: date!(2025 - 10 - 19),
            }
        );
    }

    #[test]
    fn february_in_leap_year_has_29_days() {
        let range = BudgetPeriod::Monthly.current_range(date!(2024 - 02 - 10));

        assert_eq!(range.end, date!(2024 - 02 - 29));
    }

    #[test]
    fn quarter_covers_three_months() {
        let range = BudgetPeriod::Quarterly.current_range(date!(2025 - 08 - 20));

        assert_eq!(range.start, date!(2025 - 07 - 01));
        assert_eq!(range.end, date!(2025 - 09 - 30));
    }

    #[test]
    fn year_covers_calendar_year() {
        let range = BudgetPeriod::Yearly.current_range(date!(2025 - 08 - 20));

        assert!(range.contains(date!(2025 - 01 - 01)));
        assert!(range.contains(date!(2025 - 12 - 31)));
        assert!(!range.contains(date!(2026 - 01 - 01)));
    }

    #[test]
    fn stored_value_parses_back() {
        assert_eq!(
            BudgetPeriod::from_stored(BudgetPeriod::Quarterly.as_str()),
            Some(BudgetPeriod::Quarterly)
        );
        assert_eq!(BudgetPeriod::from_stored("fortnightly"), None);
    }

    #[test]
    fn month_label_is_short() {
        assert_eq!(month_label(date!(2025 - 03 - 09)), "Mar 2025");
    }
}
