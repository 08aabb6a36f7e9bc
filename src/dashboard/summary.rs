//! The headline figures shown at the top of the dashboard.

use maud::{Markup, html};
use rust_decimal::Decimal;

use crate::html::format_currency;

/// Totals over every recorded transaction.
///
/// Only expenses are recorded, so income and balance are always `None`. They
/// are rendered whenever they are present.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpenseSummary {
    pub total_expense: Decimal,
    pub total_income: Option<Decimal>,
    pub balance: Option<Decimal>,
}

impl ExpenseSummary {
    /// A summary with only the total expense known.
    pub fn from_total_expense(total_expense: Decimal) -> Self {
        Self {
            total_expense,
            total_income: None,
            balance: None,
        }
    }
}

fn summary_card(id: &str, label: &str, amount: Decimal) -> Markup {
    html! {
        div
            id=(id)
            class="flex-1 p-4 bg-white border border-gray-200 rounded-lg shadow-sm
                dark:bg-gray-800 dark:border-gray-700"
        {
            p class="text-sm text-gray-500 dark:text-gray-400" { (label) }
            p class="text-2xl font-bold" { (format_currency(amount)) }
        }
    }
}

/// One card per known figure.
pub(super) fn summary_cards(summary: &ExpenseSummary) -> Markup {
    html! {
        section class="flex flex-col sm:flex-row gap-4 w-full mb-8"
        {
            (summary_card("total-expense", "Total Expense", summary.total_expense))

            @if let Some(total_income) = summary.total_income {
                (summary_card("total-income", "Total Income", total_income))
            }

            @if let Some(balance) = summary.balance {
                (summary_card("balance", "Balance", balance))
            }
        }
    }
}
