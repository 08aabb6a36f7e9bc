//! Generates the months and years offered by the month filter and report links.

use time::{Date, Month};

use crate::endpoints::format_monthly_pdf_endpoint;

/// Which months [month_options] produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthOptionPolicy {
    /// January to December of the reference year.
    AllMonths,
    /// The twelve months ending with the reference month, newest first.
    YearBounded,
}

/// A selectable month of a specific year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthOption {
    pub month: Month,
    pub year: i32,
}

impl MonthOption {
    /// The month number, 1 for January up to 12 for December.
    pub fn number(&self) -> u8 {
        u8::from(self.month)
    }

    /// A human readable label, e.g. "January 2024".
    pub fn label(&self) -> String {
        format!("{} {}", self.month, self.year)
    }

    /// The URL of the monthly PDF report for this month.
    pub fn export_url(&self) -> String {
        format_monthly_pdf_endpoint(self.number(), self.year)
    }
}

/// The months to offer relative to `reference`, usually today.
pub fn month_options(reference: Date, policy: MonthOptionPolicy) -> Vec<MonthOption> {
    match policy {
        MonthOptionPolicy::AllMonths => {
            let mut month = Month::January;
            let mut options = Vec::with_capacity(12);

            for _ in 0..12 {
                options.push(MonthOption {
                    month,
                    year: reference.year(),
                });
                month = month.next();
            }

            options
        }
        MonthOptionPolicy::YearBounded => {
            let mut option = MonthOption {
                month: reference.month(),
                year: reference.year(),
            };
            let mut options = Vec::with_capacity(12);

            for _ in 0..12 {
                options.push(option);
                option = MonthOption {
                    month: option.month.previous(),
                    year: if option.month == Month::January {
                        option.year - 1
                    } else {
                        option.year
                    },
                };
            }

            options
        }
    }
}

/// The years from the reference year back to the year of `earliest`, newest
/// first.
///
/// Only the reference year is returned when there is no earliest date or it
/// is not before the reference year.
pub fn year_options(reference: Date, earliest: Option<Date>) -> Vec<i32> {
    let newest = reference.year();
    let oldest = earliest.map_or(newest, |date| date.year().min(newest));

    (oldest..=newest).rev().collect()
}
