//! In-process fallback backend.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Backend, DeleteOutcome, InsertOutcome, RecordStore, ResultStore, UpdateOutcome};
use crate::{
    StoreError,
    expenses::{Expense, ExpensePatch, NewExpense},
};

#[derive(Debug, Default)]
struct Collection {
    expenses: Vec<Expense>,
    /// Last id handed out. Never rewinds, not even on `delete_all`.
    counter: u64,
}

/// Ordered in-memory list of expenses.
///
/// Ids are decimal renderings of a counter starting at 1. Every
/// read-modify-write runs under one write guard, so the counts returned always
/// match the records that changed.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collection: RwLock<Collection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Canonical form of a fallback id: `"007"` and `" 7 "` both name record `7`.
fn canonical_id(raw: &str) -> ResultStore<String> {
    raw.trim()
        .parse::<u64>()
        .map(|id| id.to_string())
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend(&self) -> Backend {
        Backend::Fallback
    }

    async fn insert(&self, expense: NewExpense) -> ResultStore<InsertOutcome> {
        let mut collection = self.collection.write().await;
        collection.counter += 1;
        let id = collection.counter.to_string();
        collection.expenses.push(expense.with_id(id.clone()));
        Ok(InsertOutcome { inserted_id: id })
    }

    async fn list_all(&self) -> ResultStore<Vec<Expense>> {
        Ok(self.collection.read().await.expenses.clone())
    }

    async fn sum_amounts(&self) -> ResultStore<f64> {
        let collection = self.collection.read().await;
        Ok(collection.expenses.iter().map(|expense| expense.amount).sum())
    }

    async fn delete_one(&self, id: &str) -> ResultStore<DeleteOutcome> {
        let id = canonical_id(id)?;
        let mut collection = self.collection.write().await;
        let before = collection.expenses.len();
        collection.expenses.retain(|expense| expense.id != id);
        let deleted_count = (before - collection.expenses.len()) as u64;
        Ok(DeleteOutcome { deleted_count })
    }

    async fn delete_all(&self) -> ResultStore<()> {
        self.collection.write().await.expenses.clear();
        Ok(())
    }

    async fn update_one(&self, id: &str, patch: &ExpensePatch) -> ResultStore<UpdateOutcome> {
        let id = canonical_id(id)?;
        let mut collection = self.collection.write().await;
        let Some(expense) = collection
            .expenses
            .iter_mut()
            .find(|expense| expense.id == id)
        else {
            return Ok(UpdateOutcome::NONE);
        };

        let modified = patch.apply(expense);
        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: u64::from(modified),
        })
    }
}
