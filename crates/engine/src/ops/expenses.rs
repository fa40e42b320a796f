use chrono::Utc;

use crate::{
    EngineError, ResultEngine,
    expenses::Expense,
    validation::{self, ExpenseDraft},
};

use super::{EXPENSE_NOT_FOUND, EXPENSE_NOT_UPDATED, Engine};

/// Narrows `list_expenses`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    /// Calendar month as `YYYY-MM`.
    pub month: Option<String>,
}

impl Engine {
    /// All expenses, optionally restricted to one month.
    pub async fn list_expenses(&self, filter: &ExpenseFilter) -> ResultEngine<Vec<Expense>> {
        let month = filter
            .month
            .as_deref()
            .map(validation::validate_month)
            .transpose()?;

        let expenses = self.store.list_all().await?;
        Ok(match month {
            Some(month) => expenses
                .into_iter()
                .filter(|expense| expense.month() == month)
                .collect(),
            None => expenses,
        })
    }

    /// Validate and persist a new expense. Returns it with its assigned id.
    pub async fn add_expense(&self, draft: ExpenseDraft) -> ResultEngine<Expense> {
        let expense = validation::validate_new(draft, Utc::now())?;
        let outcome = self.store.insert(expense.clone()).await?;
        tracing::debug!(id = %outcome.inserted_id, "expense added");
        Ok(expense.with_id(outcome.inserted_id))
    }

    /// Change the supplied fields of one expense.
    ///
    /// A missing record and a patch that changes nothing are reported the same
    /// way, as [`EngineError::NotFound`].
    pub async fn update_expense(&self, id: &str, draft: ExpenseDraft) -> ResultEngine<()> {
        let patch = validation::validate_patch(draft)?;
        let outcome = self.store.update_one(id, &patch).await?;
        if outcome.modified_count == 1 {
            tracing::debug!(id, "expense updated");
            Ok(())
        } else {
            Err(EngineError::NotFound(EXPENSE_NOT_UPDATED.to_string()))
        }
    }

    /// Sum of every amount; `0.0` with no records.
    pub async fn get_total(&self) -> ResultEngine<f64> {
        Ok(self.store.sum_amounts().await?)
    }

    pub async fn delete_expense(&self, id: &str) -> ResultEngine<()> {
        let outcome = self.store.delete_one(id).await?;
        if outcome.deleted_count == 1 {
            tracing::debug!(id, "expense deleted");
            Ok(())
        } else {
            Err(EngineError::NotFound(EXPENSE_NOT_FOUND.to_string()))
        }
    }

    /// Remove every expense.
    pub async fn reset_expenses(&self) -> ResultEngine<()> {
        self.store.delete_all().await?;
        tracing::info!("all expenses deleted");
        Ok(())
    }
}
