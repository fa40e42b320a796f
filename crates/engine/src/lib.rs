//! Expense tracking core: the record store and the expense service on top of it.

pub use error::{EngineError, StoreError};
pub use expenses::{
    DEFAULT_CATEGORY, Expense, ExpensePatch, NewExpense, SUGGESTED_CATEGORIES,
};
pub use ops::{Engine, EngineBuilder, ExpenseFilter, MonthlySummary};
pub use store::{Backend, RecordStore, StoreSettings};
pub use validation::{ExpenseDraft, FieldErrors, FieldValue, NON_FIELD_ERRORS};

mod error;
mod expenses;
mod ops;
pub mod store;
mod validation;

type ResultEngine<T> = Result<T, EngineError>;
