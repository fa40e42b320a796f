//! Field validation for expense input.
//!
//! Errors are collected per field instead of failing on the first problem, so
//! a client gets every complaint about a submission in one response. Messages
//! use the same wording the dashboard already knows how to display.

use std::{collections::BTreeMap, fmt};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::expenses::{DEFAULT_CATEGORY, ExpensePatch, NewExpense};

pub const MAX_TEXT_LEN: usize = 100;
pub const MIN_AMOUNT: f64 = 0.01;

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";
pub(crate) const TOO_LONG: &str = "Ensure this field has no more than 100 characters.";
pub(crate) const NOT_A_STRING: &str = "Not a valid string.";
pub(crate) const NOT_A_NUMBER: &str = "A valid number is required.";
pub(crate) const BELOW_MINIMUM: &str = "Ensure this value is greater than or equal to 0.01.";
pub(crate) const EMPTY_PATCH: &str = "No fields to update.";
pub(crate) const BAD_DATETIME: &str = "Datetime has wrong format. Use one of these formats instead: YYYY-MM-DDThh:mm[:ss[.uuuuuu]][+HH:MM|-HH:MM|Z].";
pub(crate) const BAD_MONTH: &str = "Enter a month as YYYY-MM.";

/// Key used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Validation errors keyed by field name.
///
/// Serializes as `{"field": ["message", ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    fn into_result<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{field}: {}", messages.join(" "))?;
        }
        Ok(())
    }
}

/// A submitted field before it has been given a type.
///
/// Clients send numbers as strings and strings as numbers; each field decides
/// what it accepts and reports the rest under its own name.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Number(f64),
    Timestamp(DateTime<Utc>),
    /// A boolean, list or object.
    Unsupported,
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Unvalidated input for creating or patching an expense. `None` means the
/// field was not sent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpenseDraft {
    pub product_name: Option<FieldValue>,
    pub amount: Option<FieldValue>,
    pub category: Option<FieldValue>,
    pub date: Option<FieldValue>,
}

impl ExpenseDraft {
    pub fn is_empty(&self) -> bool {
        self.product_name.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}

/// Read a timestamp in any of the accepted spellings.
///
/// RFC 3339 (`2025-03-14T09:30:00+01:00`), a date-time without offset
/// (`2025-03-14T09:30:00.123456`, read as UTC) and a bare date (`2025-03-14`,
/// midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn check_text(errors: &mut FieldErrors, field: &str, value: FieldValue) -> Option<String> {
    let value = match value {
        FieldValue::Text(text) => text,
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Timestamp(_) | FieldValue::Unsupported => {
            errors.add(field, NOT_A_STRING);
            return None;
        }
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, BLANK);
        return None;
    }
    if trimmed.chars().count() > MAX_TEXT_LEN {
        errors.add(field, TOO_LONG);
        return None;
    }
    Some(trimmed.to_string())
}

fn check_amount(errors: &mut FieldErrors, value: FieldValue) -> Option<f64> {
    let amount = match value {
        FieldValue::Number(number) => Some(number),
        FieldValue::Text(text) => text.trim().parse::<f64>().ok(),
        FieldValue::Timestamp(_) | FieldValue::Unsupported => None,
    };
    let Some(amount) = amount.filter(|amount| amount.is_finite()) else {
        errors.add("amount", NOT_A_NUMBER);
        return None;
    };
    if amount < MIN_AMOUNT {
        errors.add("amount", BELOW_MINIMUM);
        return None;
    }
    Some(amount)
}

fn check_date(errors: &mut FieldErrors, value: FieldValue) -> Option<DateTime<Utc>> {
    let date = match value {
        FieldValue::Timestamp(date) => Some(date),
        FieldValue::Text(text) => parse_timestamp(&text),
        FieldValue::Number(_) | FieldValue::Unsupported => None,
    };
    if date.is_none() {
        errors.add("date", BAD_DATETIME);
    }
    date
}

/// Validate a draft and fill in defaults. `now` becomes the date when none is given.
pub fn validate_new(draft: ExpenseDraft, now: DateTime<Utc>) -> Result<NewExpense, FieldErrors> {
    let mut errors = FieldErrors::new();

    let product_name = match draft.product_name {
        Some(value) => check_text(&mut errors, "product_name", value),
        None => {
            errors.add("product_name", REQUIRED);
            None
        }
    };

    let amount = match draft.amount {
        Some(value) => check_amount(&mut errors, value),
        None => {
            errors.add("amount", REQUIRED);
            None
        }
    };

    let category = match draft.category {
        Some(value) => check_text(&mut errors, "category", value),
        None => Some(DEFAULT_CATEGORY.to_string()),
    };

    let date = match draft.date {
        Some(value) => check_date(&mut errors, value),
        None => Some(now),
    };

    match (product_name, amount, category, date) {
        (Some(product_name), Some(amount), Some(category), Some(date)) if errors.is_empty() => {
            Ok(NewExpense {
                product_name,
                amount,
                category,
                date,
            })
        }
        _ => Err(errors),
    }
}

/// Validate the supplied fields of a partial update with the same rules as
/// [`validate_new`]. A draft with no fields at all is rejected.
pub fn validate_patch(draft: ExpenseDraft) -> Result<ExpensePatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    if draft.is_empty() {
        errors.add(NON_FIELD_ERRORS, EMPTY_PATCH);
        return Err(errors);
    }

    let product_name = draft
        .product_name
        .and_then(|value| check_text(&mut errors, "product_name", value));
    let amount = draft
        .amount
        .and_then(|value| check_amount(&mut errors, value));
    let category = draft
        .category
        .and_then(|value| check_text(&mut errors, "category", value));
    let date = draft
        .date
        .and_then(|value| check_date(&mut errors, value));

    errors.into_result(ExpensePatch {
        product_name,
        amount,
        category,
        date,
    })
}

/// Parse a `YYYY-MM` month key.
pub fn validate_month(value: &str) -> Result<String, FieldErrors> {
    let trimmed = value.trim();
    let valid = trimmed.len() == 7
        && NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").is_ok();
    if valid {
        return Ok(trimmed.to_string());
    }
    let mut errors = FieldErrors::new();
    errors.add("month", BAD_MONTH);
    Err(errors)
}
