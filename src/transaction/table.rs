//! The HTML table of transactions shown on the dashboard and the transactions page.

use maud::{Markup, html};

use crate::{
    endpoints::{self, format_endpoint, format_media_url},
    html::{
        BUTTON_DELETE_STYLE, CATEGORY_BADGE_STYLE, LINK_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency, link,
    },
    transaction::Transaction,
};

/// The value of the `data-month` attribute on each row, e.g. "2024-01".
pub fn month_key(transaction: &Transaction) -> String {
    format!(
        "{:04}-{:02}",
        transaction.date.year(),
        u8::from(transaction.date.month())
    )
}

fn transaction_row(transaction: &Transaction) -> Markup {
    let delete_url = format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);

    html! {
        tr class=(TABLE_ROW_STYLE) data-month=(month_key(transaction))
        {
            td class=(TABLE_CELL_STYLE) { time datetime=(transaction.date) { (transaction.date) } }
            td class=(TABLE_CELL_STYLE) { (transaction.title) }
            td class=(TABLE_CELL_STYLE)
            {
                span class=(CATEGORY_BADGE_STYLE) { (transaction.category) }
            }
            td class={(TABLE_CELL_STYLE) " text-right"} { (format_currency(transaction.amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(image) = &transaction.image {
                    a href=(format_media_url(image)) class=(LINK_STYLE) target="_blank" { "View" }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                form action=(delete_url) method="post"
                {
                    button type="submit" class=(BUTTON_DELETE_STYLE) { "Delete" }
                }
            }
        }
    }
}

/// A table with one row per transaction in the order given.
pub fn transactions_table(transactions: &[Transaction]) -> Markup {
    html! {
        div class="relative overflow-x-auto shadow-md rounded-lg w-full"
        {
            table id="transactions-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
            {
                thead class=(TABLE_HEADER_STYLE)
                {
                    tr
                    {
                        th scope="col" class=(TABLE_CELL_STYLE) { "Date" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Title" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                        th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Amount" }
                        th scope="col" class=(TABLE_CELL_STYLE) { "Receipt" }
                        th scope="col" class=(TABLE_CELL_STYLE) { span class="sr-only" { "Actions" } }
                    }
                }

                tbody
                {
                    @for transaction in transactions {
                        (transaction_row(transaction))
                    }

                    @if transactions.is_empty() {
                        tr class=(TABLE_ROW_STYLE)
                        {
                            td colspan="6" class={(TABLE_CELL_STYLE) " text-center"}
                            {
                                "No transactions yet. "
                                (link(endpoints::ADD_TRANSACTION_VIEW, "Add one"))
                                "."
                            }
                        }
                    }
                }
            }
        }
    }
}
