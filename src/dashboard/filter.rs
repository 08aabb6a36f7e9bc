//! The month and year filter for the dashboard's transaction table.
//!
//! Filtering happens in the browser (`static/month_filter.js`) by matching
//! the `data-month` attribute of each table row. The same script points the
//! monthly export link at the selected month.

use maud::{Markup, html};
use time::Date;

use crate::{
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE},
    month_options::{MonthOption, MonthOptionPolicy, month_options, year_options},
};

/// The path of the script that applies the filter.
pub(super) const MONTH_FILTER_SCRIPT: &str = "/static/month_filter.js";

pub(super) fn month_filter(today: Date, earliest: Option<Date>) -> Markup {
    let months = month_options(today, MonthOptionPolicy::AllMonths);
    let years = year_options(today, earliest);
    let current_month = MonthOption {
        month: today.month(),
        year: today.year(),
    };
    let current_month_url = current_month.export_url();

    html! {
        section id="month-filter-section" class="flex flex-wrap items-end gap-4 w-full mb-4"
        {
            div
            {
                label for="month-filter" class=(FORM_LABEL_STYLE) { "Month" }

                select id="month-filter" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected { "All months" }

                    @for option in &months {
                        option value=(format!("{:02}", option.number())) { (option.month) }
                    }
                }
            }

            div
            {
                label for="year-filter" class=(FORM_LABEL_STYLE) { "Year" }

                select id="year-filter" class=(FORM_TEXT_INPUT_STYLE)
                {
                    option value="" selected { "All years" }

                    @for year in &years {
                        option value=(year) { (year) }
                    }
                }
            }

            a
                id="export-month-link"
                href=(current_month_url)
                data-default-href=(current_month_url)
                data-default-label=(current_month.label())
                class=(LINK_STYLE)
            {
                "Export " (current_month.label()) " (PDF)"
            }
        }
    }
}
