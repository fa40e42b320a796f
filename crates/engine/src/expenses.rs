//! Expense records.
//!
//! An `Expense` is a flat, independent record: no expense references another.
//! The id is assigned by the record store on insert and never changes.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

use crate::StoreError;

/// Category used when the client does not pick one.
pub const DEFAULT_CATEGORY: &str = "Others";

/// Categories the dashboard offers. Any other non-blank category is accepted.
pub const SUGGESTED_CATEGORIES: [&str; 5] = ["Food", "Travel", "Bills", "Shopping", "Others"];

#[derive(Clone, Debug, PartialEq)]
pub struct Expense {
    pub id: String,
    pub product_name: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl Expense {
    /// Calendar month of the record's date as `YYYY-MM`.
    pub fn month(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }
}

/// A validated expense that has not been given an id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct NewExpense {
    pub product_name: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl NewExpense {
    pub(crate) fn with_id(self, id: String) -> Expense {
        Expense {
            id,
            product_name: self.product_name,
            amount: self.amount,
            category: self.category,
            date: self.date,
        }
    }
}

/// Fields to change on an existing expense. `None` leaves a field untouched.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExpensePatch {
    pub product_name: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Apply the patch in place. Returns `true` when at least one field changed.
    pub(crate) fn apply(&self, expense: &mut Expense) -> bool {
        let mut changed = false;
        if let Some(name) = &self.product_name
            && *name != expense.product_name
        {
            expense.product_name = name.clone();
            changed = true;
        }
        if let Some(amount) = self.amount
            && amount != expense.amount
        {
            expense.amount = amount;
            changed = true;
        }
        if let Some(category) = &self.category
            && *category != expense.category
        {
            expense.category = category.clone();
            changed = true;
        }
        if let Some(date) = self.date
            && date != expense.date
        {
            expense.date = date;
            changed = true;
        }
        changed
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_name: String,
    pub amount: f64,
    pub category: String,
    pub date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.clone()),
            product_name: ActiveValue::Set(expense.product_name.clone()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.clone()),
            date: ActiveValue::Set(expense.date),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        if !model.amount.is_finite() || model.amount <= 0.0 {
            return Err(StoreError::Corrupt(format!(
                "expense {} has non-positive amount {}",
                model.id, model.amount
            )));
        }
        Ok(Self {
            id: model.id,
            product_name: model.product_name,
            amount: model.amount,
            category: model.category,
            date: model.date,
        })
    }
}
