use std::sync::Arc;

use crate::store::{Backend, MemoryStore, RecordStore};

mod expenses;
mod summary;

pub use expenses::ExpenseFilter;
pub use summary::MonthlySummary;

pub(crate) const EXPENSE_NOT_FOUND: &str = "Expense not found";
pub(crate) const EXPENSE_NOT_UPDATED: &str = "Expense not found or no changes made";

/// The expense service. Validates input and delegates to the record store.
///
/// Cheap to share behind an `Arc`: every operation takes `&self` and the
/// store handles its own synchronization.
#[derive(Clone)]
pub struct Engine {
    store: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &self.store.backend())
            .finish()
    }
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Which backend holds the records.
    pub fn backend(&self) -> Backend {
        self.store.backend()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    store: Option<Arc<dyn RecordStore>>,
}

impl EngineBuilder {
    /// Pass the record store. Defaults to an empty in-memory store.
    pub fn store(mut self, store: Arc<dyn RecordStore>) -> EngineBuilder {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
        }
    }
}
