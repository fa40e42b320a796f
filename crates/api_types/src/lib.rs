//! JSON bodies exchanged with the expense API.

use serde::{Deserialize, Serialize};

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        /// Always `"ok"` when the process answers.
        pub status: String,
        /// `"durable"` or `"fallback"`.
        pub backend: String,
    }
}

/// Confirmation body for mutations that return no record.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub mod expense {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};

    use super::*;

    /// A stored expense.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    pub struct ExpenseView {
        /// Hex UUID with the durable store, a small integer with the fallback.
        #[serde(rename = "_id")]
        pub id: String,
        pub product_name: String,
        pub amount: f64,
        pub category: String,
        /// ISO-8601 timestamp in UTC.
        pub date: DateTime<Utc>,
    }

    /// A request field exactly as the client sent it.
    ///
    /// Typing happens during validation, so `"amount": "3.50"` is accepted and
    /// `"amount": true` is reported against `amount` rather than failing the
    /// whole body.
    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    #[serde(untagged)]
    pub enum RawField {
        Number(f64),
        Text(String),
        Other(serde_json::Value),
    }

    /// Request body for creating an expense.
    ///
    /// Every field is optional here so missing fields can be reported per
    /// field instead of failing deserialization.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub product_name: Option<RawField>,
        pub amount: Option<RawField>,
        /// Defaults to `"Others"`.
        pub category: Option<RawField>,
        /// ISO-8601 timestamp. Defaults to the time of creation.
        pub date: Option<RawField>,
    }

    /// Request body for a partial update. Absent fields are left unchanged;
    /// unknown keys are ignored.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseUpdate {
        pub product_name: Option<RawField>,
        pub amount: Option<RawField>,
        pub category: Option<RawField>,
        pub date: Option<RawField>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ExpenseListQuery {
        /// `YYYY-MM`
        pub month: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Total {
        pub total: f64,
    }

    /// Categories the dashboard offers in its pickers.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Categories {
        pub categories: Vec<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlySummaryView {
        /// `YYYY-MM`
        pub month: String,
        pub total: f64,
        pub count: usize,
        pub categories: BTreeMap<String, f64>,
    }
}
