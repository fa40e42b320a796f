//! Durable backend on top of sea-orm.

use std::time::Duration;

use async_trait::async_trait;
use migration::MigratorTrait;
use sea_orm::{
    ConnectOptions, Database, DatabaseConnection, QueryOrder, QuerySelect, TransactionTrait,
    prelude::*,
};
use uuid::Uuid;

use super::{Backend, DeleteOutcome, InsertOutcome, RecordStore, ResultStore, UpdateOutcome};
use crate::{
    StoreError,
    expenses::{self, Expense, ExpensePatch, NewExpense},
};

/// Expenses persisted in the `expenses` table.
///
/// Ids are random UUIDs stored as 32 lowercase hex digits.
#[derive(Debug, Clone)]
pub struct DatabaseStore {
    database: DatabaseConnection,
}

/// Canonical form of a durable id. Hyphenated, braced and plain hex spellings
/// of the same UUID all map to the stored key.
fn canonical_id(raw: &str) -> ResultStore<String> {
    Uuid::parse_str(raw.trim())
        .map(|id| id.simple().to_string())
        .map_err(|_| StoreError::InvalidId(raw.to_string()))
}

impl DatabaseStore {
    /// Wrap a connection whose schema is already migrated.
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Connect, check the server answers, and bring the schema up to date.
    pub async fn connect(url: &str, timeout: Duration) -> ResultStore<Self> {
        let mut options = ConnectOptions::new(url.to_owned());
        options
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .sqlx_logging(false);

        let database = tokio::time::timeout(timeout, Database::connect(options))
            .await
            .map_err(|_| {
                StoreError::Unreachable(format!("no answer within {}ms", timeout.as_millis()))
            })??;
        database.ping().await?;
        migration::Migrator::up(&database, None).await?;

        Ok(Self::new(database))
    }
}

#[async_trait]
impl RecordStore for DatabaseStore {
    fn backend(&self) -> Backend {
        Backend::Durable
    }

    async fn insert(&self, expense: NewExpense) -> ResultStore<InsertOutcome> {
        let id = Uuid::new_v4().simple().to_string();
        let expense = expense.with_id(id.clone());
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(InsertOutcome { inserted_id: id })
    }

    async fn list_all(&self) -> ResultStore<Vec<Expense>> {
        expenses::Entity::find()
            .order_by_asc(expenses::Column::Date)
            .order_by_asc(expenses::Column::Id)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    async fn sum_amounts(&self) -> ResultStore<f64> {
        let total: Option<Option<f64>> = expenses::Entity::find()
            .select_only()
            .column_as(expenses::Column::Amount.sum(), "total")
            .into_tuple()
            .one(&self.database)
            .await?;
        Ok(total.flatten().unwrap_or(0.0))
    }

    async fn delete_one(&self, id: &str) -> ResultStore<DeleteOutcome> {
        let id = canonical_id(id)?;
        let result = expenses::Entity::delete_by_id(id)
            .exec(&self.database)
            .await?;
        Ok(DeleteOutcome {
            deleted_count: result.rows_affected,
        })
    }

    async fn delete_all(&self) -> ResultStore<()> {
        let result = expenses::Entity::delete_many()
            .exec(&self.database)
            .await?;
        tracing::debug!(deleted = result.rows_affected, "expenses reset");
        Ok(())
    }

    async fn update_one(&self, id: &str, patch: &ExpensePatch) -> ResultStore<UpdateOutcome> {
        let id = canonical_id(id)?;
        let db_tx = self.database.begin().await?;

        let Some(model) = expenses::Entity::find_by_id(id).one(&db_tx).await? else {
            return Ok(UpdateOutcome::NONE);
        };
        let mut expense = Expense::try_from(model)?;
        if !patch.apply(&mut expense) {
            return Ok(UpdateOutcome {
                matched_count: 1,
                modified_count: 0,
            });
        }

        expenses::ActiveModel::from(&expense).update(&db_tx).await?;
        db_tx.commit().await?;

        Ok(UpdateOutcome {
            matched_count: 1,
            modified_count: 1,
        })
    }
}
