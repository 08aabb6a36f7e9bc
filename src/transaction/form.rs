//! The form for entering a new transaction, shared by the dashboard and the
//! add transaction page.

use maud::{Markup, html};
use time::Date;

use crate::html::{
    BUTTON_PRIMARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
};

/// The accepted types for receipt uploads.
pub const IMAGE_ACCEPT: &str = "image/*";

/// The text of each field as it was submitted, used to refill the form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionFormValues {
    pub title: String,
    pub amount: String,
    pub category: String,
    pub date: String,
}

impl TransactionFormValues {
    /// Empty values with the date set to `today`.
    pub fn new(today: Date) -> Self {
        Self {
            date: today.to_string(),
            ..Default::default()
        }
    }
}

/// Validation messages keyed by form field.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormErrors {
    pub title: Option<String>,
    pub amount: Option<String>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
}

impl FormErrors {
    /// Whether no field has an error.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.image.is_none()
    }
}

fn field_error(field: &str, message: Option<&str>) -> Markup {
    html! {
        @if let Some(message) = message {
            p data-error-for=(field) class=(FORM_ERROR_STYLE) { (message) }
        }
    }
}

/// A multipart form that posts a new transaction to `action`.
pub fn transaction_form(action: &str, values: &TransactionFormValues, errors: &FormErrors) -> Markup {
    html! {
        form
            action=(action)
            method="post"
            enctype="multipart/form-data"
            class="w-full space-y-4 md:space-y-6"
        {
            div
            {
                label for="title" class=(FORM_LABEL_STYLE) { "Title" }

                input
                    name="title"
                    id="title"
                    type="text"
                    maxlength="255"
                    placeholder="Coffee"
                    required
                    value=(values.title)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("title", errors.title.as_deref()))
            }

            div
            {
                label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                // w-full needed to ensure input takes the full width when prefilled with a value
                div class="input-wrapper w-full"
                {
                    input
                        name="amount"
                        id="amount"
                        type="number"
                        step="0.01"
                        placeholder="0.00"
                        required
                        value=(values.amount)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                (field_error("amount", errors.amount.as_deref()))
            }

            div
            {
                label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                input
                    name="category"
                    id="category"
                    type="text"
                    maxlength="255"
                    placeholder="Food"
                    required
                    value=(values.category)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("category", errors.category.as_deref()))
            }

            div
            {
                label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                input
                    name="date"
                    id="date"
                    type="date"
                    required
                    value=(values.date)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("date", errors.date.as_deref()))
            }

            div
            {
                label for="image" class=(FORM_LABEL_STYLE) { "Receipt (optional)" }

                input
                    name="image"
                    id="image"
                    type="file"
                    accept=(IMAGE_ACCEPT)
                    class=(FORM_TEXT_INPUT_STYLE);

                (field_error("image", errors.image.as_deref()))
            }

            button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
            {
                "Add Transaction"
            }
        }
    }
}
