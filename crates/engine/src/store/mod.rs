//! Record store: persistence of the expense collection.
//!
//! Two interchangeable backends implement [`RecordStore`]:
//!
//! - [`DatabaseStore`], durable, backed by a sea-orm connection.
//! - [`MemoryStore`], an in-process list used when the database is unreachable.
//!   Nothing survives a restart.
//!
//! The backend is picked once by [`connect`] at startup and never switched.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;

use crate::{
    StoreError,
    expenses::{Expense, ExpensePatch, NewExpense},
};

mod database;
mod memory;

pub use database::DatabaseStore;
pub use memory::MemoryStore;

pub type ResultStore<T> = Result<T, StoreError>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    Durable,
    Fallback,
}

impl Backend {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertOutcome {
    pub inserted_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    pub(crate) const NONE: Self = Self {
        matched_count: 0,
        modified_count: 0,
    };
}

/// Operations every backend provides over the expense collection.
///
/// Ids are opaque strings. Each backend parses them into its own identifier
/// format and answers [`StoreError::InvalidId`] when that fails.
#[async_trait]
pub trait RecordStore: Send + Sync {
    fn backend(&self) -> Backend;

    async fn insert(&self, expense: NewExpense) -> ResultStore<InsertOutcome>;

    async fn list_all(&self) -> ResultStore<Vec<Expense>>;

    /// Sum of all amounts, `0.0` when the collection is empty.
    async fn sum_amounts(&self) -> ResultStore<f64>;

    async fn delete_one(&self, id: &str) -> ResultStore<DeleteOutcome>;

    async fn delete_all(&self) -> ResultStore<()>;

    /// A record counts as modified only when a supplied field differs from the
    /// stored value.
    async fn update_one(&self, id: &str, patch: &ExpensePatch) -> ResultStore<UpdateOutcome>;
}

/// How to reach the durable backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoreSettings {
    pub database_url: Option<String>,
    pub connect_timeout: Duration,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: None,
            connect_timeout: Duration::from_secs(3),
        }
    }
}

/// Select the record store for this process.
///
/// Falls back to [`MemoryStore`] when no database is configured or when it
/// cannot be reached. A failed probe is not fatal.
pub async fn connect(settings: &StoreSettings) -> Arc<dyn RecordStore> {
    let Some(url) = settings.database_url.as_deref() else {
        tracing::info!("no database configured, using in-memory store");
        return Arc::new(MemoryStore::new());
    };

    match DatabaseStore::connect(url, settings.connect_timeout).await {
        Ok(store) => {
            tracing::info!("connected to database store");
            Arc::new(store)
        }
        Err(err) => {
            tracing::warn!(
                "database not available ({err}), using in-memory store; records will not survive a restart"
            );
            Arc::new(MemoryStore::new())
        }
    }
}
