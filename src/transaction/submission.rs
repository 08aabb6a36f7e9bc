//! Reads, validates and stores a new transaction submitted as a multipart form.

use std::str::FromStr;

use axum::{body::Bytes, extract::Multipart};
use rusqlite::Connection;
use rust_decimal::Decimal;
use time::{Date, macros::format_description};

use crate::{
    Error,
    transaction::{
        Transaction, TransactionBuilder, create_transaction,
        form::{FormErrors, TransactionFormValues},
    },
    upload::{UploadStore, image_extension},
};

/// The longest title or category that will be accepted, in characters.
pub const MAX_TEXT_LENGTH: usize = 255;
/// The most digits an amount may have.
pub const MAX_DIGITS: u32 = 10;
/// The most digits an amount may have after the decimal point.
pub const MAX_DECIMAL_PLACES: u32 = 2;

const REQUIRED_MESSAGE: &str = "This field is required.";

/// A file sent in the image field of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

/// The raw contents of a submitted transaction form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TransactionSubmission {
    pub values: TransactionFormValues,
    pub image: Option<ImageUpload>,
}

/// The result of trying to store a submission.
#[derive(Debug, PartialEq)]
pub enum SaveOutcome {
    /// The transaction passed validation and was stored.
    Saved(Transaction),
    /// The submission failed validation and nothing was stored.
    Invalid {
        values: TransactionFormValues,
        errors: FormErrors,
    },
}

impl TransactionSubmission {
    /// Read the form fields from a multipart request body.
    ///
    /// Unknown fields are ignored. An image field with no file name and no
    /// content, which is what browsers send when no file was chosen, counts
    /// as no image.
    ///
    /// # Errors
    /// Returns an [Error::MultipartError] if the body is not a valid multipart form.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut submission = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|error| Error::MultipartError(error.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_owned();

            match name.as_str() {
                "image" => {
                    let file_name = field.file_name().unwrap_or_default().to_owned();
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|error| Error::MultipartError(error.to_string()))?;

                    if !file_name.is_empty() || !bytes.is_empty() {
                        submission.image = Some(ImageUpload { file_name, bytes });
                    }
                }
                "title" | "amount" | "category" | "date" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|error| Error::MultipartError(error.to_string()))?;

                    let values = &mut submission.values;
                    match name.as_str() {
                        "title" => values.title = text,
                        "amount" => values.amount = text,
                        "category" => values.category = text,
                        _ => values.date = text,
                    }
                }
                other => tracing::debug!("Ignoring unexpected form field {other:?}"),
            }
        }

        Ok(submission)
    }

    /// Check every field and build the transaction if they are all valid.
    ///
    /// # Errors
    /// Returns the error message for each invalid field.
    pub fn validate(&self) -> Result<TransactionBuilder, FormErrors> {
        let title = validate_text(&self.values.title);
        let amount = validate_amount(&self.values.amount);
        let category = validate_text(&self.values.category);
        let date = validate_date(&self.values.date);
        let image = self.image.as_ref().map(validate_image).transpose();

        match (title, amount, category, date, image) {
            (Ok(title), Ok(amount), Ok(category), Ok(date), Ok(_)) => {
                Ok(Transaction::build(title, amount, category, date))
            }
            (title, amount, category, date, image) => Err(FormErrors {
                title: title.err(),
                amount: amount.err(),
                category: category.err(),
                date: date.err(),
                image: image.err(),
            }),
        }
    }
}

/// Validate `submission` and store it along with its image.
///
/// The image is only written to disk once the fields are valid and it is
/// removed again if the transaction cannot be stored.
///
/// # Errors
/// Returns an [Error::UploadError] if the image cannot be written or an
/// [Error::SqlError] if the transaction cannot be stored.
pub fn save_submission(
    submission: TransactionSubmission,
    connection: &Connection,
    upload_store: &UploadStore,
) -> Result<SaveOutcome, Error> {
    let builder = match submission.validate() {
        Ok(builder) => builder,
        Err(errors) => {
            return Ok(SaveOutcome::Invalid {
                values: submission.values,
                errors,
            });
        }
    };

    let image_path = submission
        .image
        .map(|image| upload_store.save_image(&image.file_name, &image.bytes))
        .transpose()?;

    match create_transaction(builder.image(image_path.clone()), connection) {
        Ok(transaction) => Ok(SaveOutcome::Saved(transaction)),
        Err(error) => {
            if let Some(path) = image_path
                && let Err(remove_error) = upload_store.remove(&path)
            {
                tracing::warn!("Could not clean up upload {path} after failed insert: {remove_error}");
            }

            Err(error)
        }
    }
}

fn validate_text(text: &str) -> Result<&str, String> {
    let text = text.trim();
    let length = text.chars().count();

    if text.is_empty() {
        Err(REQUIRED_MESSAGE.to_owned())
    } else if length > MAX_TEXT_LENGTH {
        Err(format!(
            "Ensure this value has at most {MAX_TEXT_LENGTH} characters (it has {length})."
        ))
    } else {
        Ok(text)
    }
}

fn validate_amount(text: &str) -> Result<Decimal, String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(REQUIRED_MESSAGE.to_owned());
    }

    let amount = Decimal::from_str(text).map_err(|_| "Enter a number.".to_owned())?;

    let decimal_places = amount.scale();
    let significant_digits = amount.mantissa().unsigned_abs().to_string().len() as u32;
    let digits = significant_digits.max(decimal_places);
    let whole_digits = digits - decimal_places;

    if digits > MAX_DIGITS {
        Err(format!(
            "Ensure that there are no more than {MAX_DIGITS} digits in total."
        ))
    } else if decimal_places > MAX_DECIMAL_PLACES {
        Err(format!(
            "Ensure that there are no more than {MAX_DECIMAL_PLACES} decimal places."
        ))
    } else if whole_digits > MAX_DIGITS - MAX_DECIMAL_PLACES {
        Err(format!(
            "Ensure that there are no more than {} digits before the decimal point.",
            MAX_DIGITS - MAX_DECIMAL_PLACES
        ))
    } else {
        Ok(amount)
    }
}

fn validate_date(text: &str) -> Result<Date, String> {
    let text = text.trim();

    if text.is_empty() {
        return Err(REQUIRED_MESSAGE.to_owned());
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .map_err(|_| "Enter a valid date.".to_owned())
}

/// The declared content type is ignored, only the file's leading bytes decide
/// whether it is an image.
fn validate_image(image: &ImageUpload) -> Result<(), String> {
    if image.file_name.is_empty() {
        Err("No file was submitted. Check the encoding type on the form.".to_owned())
    } else if image.bytes.is_empty() {
        Err("The submitted file is empty.".to_owned())
    } else if image_extension(&image.bytes).is_none() {
        Err("Upload a valid image. The file you uploaded was either not an image or a corrupted image.".to_owned())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod validation_tests {
    use axum::body::Bytes;
    use rust_decimal::Decimal;
    use time::macros::date;

    use crate::{
        test_utils::PNG_BYTES,
        transaction::{Transaction, form::TransactionFormValues},
    };

    use super::{ImageUpload, TransactionSubmission, validate_amount, validate_text};

    fn submission(title: &str, amount: &str, category: &str, date: &str) -> TransactionSubmission {
        TransactionSubmission {
            values: TransactionFormValues {
                title: title.to_owned(),
                amount: amount.to_owned(),
                category: category.to_owned(),
                date: date.to_owned(),
            },
            image: None,
        }
    }

    fn png(file_name: &str) -> ImageUpload {
        ImageUpload {
            file_name: file_name.to_owned(),
            bytes: Bytes::from_static(PNG_BYTES),
        }
    }

    #[test]
    fn valid_submission_builds_transaction() {
        let got = submission(" Coffee ", "3.50", "Food", "2024-01-05").validate();

        assert_eq!(
            got,
            Ok(Transaction::build(
                "Coffee",
                Decimal::new(350, 2),
                "Food",
                date!(2024 - 01 - 05)
            ))
        );
    }

    #[test]
    fn empty_fields_are_required() {
        let errors = submission("", " ", "", "").validate().unwrap_err();

        assert_eq!(errors.title.as_deref(), Some("This field is required."));
        assert_eq!(errors.amount.as_deref(), Some("This field is required."));
        assert_eq!(errors.category.as_deref(), Some("This field is required."));
        assert_eq!(errors.date.as_deref(), Some("This field is required."));
        assert_eq!(errors.image, None);
    }

    #[test]
    fn only_invalid_fields_have_errors() {
        let errors = submission("Coffee", "abc", "Food", "2024-01-05")
            .validate()
            .unwrap_err();

        assert_eq!(errors.amount.as_deref(), Some("Enter a number."));
        assert_eq!(errors.title, None);
        assert_eq!(errors.category, None);
        assert_eq!(errors.date, None);
    }

    #[test]
    fn text_length_is_counted_in_characters() {
        let longest = "é".repeat(255);
        let too_long = "a".repeat(256);

        assert_eq!(validate_text(&longest), Ok(longest.as_str()));
        assert_eq!(
            validate_text(&too_long),
            Err("Ensure this value has at most 255 characters (it has 256).".to_owned())
        );
    }

    #[test]
    fn amount_accepts_up_to_two_decimal_places() {
        assert_eq!(validate_amount("12"), Ok(Decimal::new(12, 0)));
        assert_eq!(validate_amount("0.05"), Ok(Decimal::new(5, 2)));
        assert_eq!(validate_amount("-4.5"), Ok(Decimal::new(-45, 1)));
        assert_eq!(
            validate_amount("1.005"),
            Err("Ensure that there are no more than 2 decimal places.".to_owned())
        );
    }

    #[test]
    fn amount_digits_are_limited() {
        assert_eq!(
            validate_amount("99999999.99"),
            Ok(Decimal::new(9_999_999_999, 2))
        );
        assert_eq!(
            validate_amount("123456789"),
            Err("Ensure that there are no more than 8 digits before the decimal point.".to_owned())
        );
        assert_eq!(
            validate_amount("123456789.12"),
            Err("Ensure that there are no more than 10 digits in total.".to_owned())
        );
    }

    #[test]
    fn invalid_dates_are_rejected() {
        for date in ["2024-02-30", "05/01/2024", "yesterday"] {
            let errors = submission("a", "1", "b", date).validate().unwrap_err();

            assert_eq!(
                errors.date.as_deref(),
                Some("Enter a valid date."),
                "want {date:?} to be rejected"
            );
        }
    }

    #[test]
    fn image_must_be_an_image() {
        for (file_name, bytes) in [
            ("notes.txt", b"just some notes".as_slice()),
            ("receipt.png", b"<script>alert(1)</script>".as_slice()),
        ] {
            let mut with_bad_file = submission("a", "1", "b", "2024-01-05");
            with_bad_file.image = Some(ImageUpload {
                file_name: file_name.to_owned(),
                bytes: Bytes::copy_from_slice(bytes),
            });

            let errors = with_bad_file.validate().unwrap_err();

            assert_eq!(
                errors.image.as_deref(),
                Some(
                    "Upload a valid image. The file you uploaded was either not an image or a corrupted image."
                ),
                "want {file_name:?} to be rejected"
            );
        }
    }

    #[test]
    fn empty_image_is_rejected() {
        let mut with_empty_file = submission("a", "1", "b", "2024-01-05");
        with_empty_file.image = Some(ImageUpload {
            bytes: Bytes::new(),
            ..png("receipt.png")
        });

        let errors = with_empty_file.validate().unwrap_err();

        assert_eq!(errors.image.as_deref(), Some("The submitted file is empty."));
    }

    #[test]
    fn image_is_optional_and_accepted_when_valid() {
        let mut with_image = submission("a", "1", "b", "2024-01-05");
        with_image.image = Some(png("receipt.png"));

        assert!(with_image.validate().is_ok());
    }
}
