//! PostgreSQL versioned record store.

use std::marker::PhantomData;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DbBackend, DbConn, EntityName, EntityTrait,
    FromQueryResult, PrimaryKeyTrait, QueryFilter, QueryOrder, QuerySelect, Related, Statement,
    TransactionTrait, Value,
};

use quill_core::domain::{Page, Versioned};
use quill_core::error::RepoError;
use quill_core::ports::VersionedStore;

use super::entity::user;
use super::{db_err, tx_err};

type ColumnOf<T> = <<T as VersionedTable>::Entity as EntityTrait>::Column;
type ModelOf<T> = <<T as VersionedTable>::Entity as EntityTrait>::Model;
type ActiveModelOf<T> = <<T as VersionedTable>::Entity as EntityTrait>::ActiveModel;

/// Table layout of a versioned entity.
///
/// Every versioned table has `id`, `user_id`, `created_at`, `updated_at`
/// and a nullable `deleted_at` tombstone.
pub trait VersionedTable: Versioned {
    type Entity: EntityTrait + Related<user::Entity>;

    /// Columns copied verbatim into every successor row.
    const CARRIED: &'static [&'static str];

    /// Columns a patch may replace, in the order of `patch_values`.
    const MUTABLE: &'static [&'static str];

    fn id_column() -> ColumnOf<Self>;

    fn owner_column() -> ColumnOf<Self>;

    fn created_at_column() -> ColumnOf<Self>;

    fn deleted_at_column() -> ColumnOf<Self>;

    /// Listing order by creation time.
    fn list_order() -> Order;

    fn scope_condition(scope: &Self::Scope) -> Condition;

    fn active_model(draft: Self::Draft) -> ActiveModelOf<Self>;

    /// One value per `MUTABLE` column; NULL carries the old value forward.
    fn patch_values(patch: Self::Patch) -> Vec<Value>;

    fn from_row(model: ModelOf<Self>, author: Option<user::Model>) -> Self;
}

/// Single statement that locks the current row, tombstones it and inserts
/// the merged successor. `$1` is the id, `$2..` the patch values.
///
/// Under concurrent updates the second `FOR UPDATE` waits for the first
/// transaction, then re-checks `deleted_at IS NULL` against the committed
/// tombstone and selects nothing, so no successor is inserted.
pub(crate) fn soft_update_sql<T: VersionedTable>() -> String {
    let table = T::Entity::default().table_name().to_owned();
    let carried = T::CARRIED.join(", ");
    let mutable = T::MUTABLE.join(", ");
    let merged = T::MUTABLE
        .iter()
        .enumerate()
        .map(|(i, col)| format!("COALESCE(${}, {col})", i + 2))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "WITH old AS (\
            SELECT * FROM {table} WHERE id = $1 AND deleted_at IS NULL FOR UPDATE\
        ), tombstone AS (\
            UPDATE {table} SET deleted_at = CURRENT_TIMESTAMP WHERE id IN (SELECT id FROM old)\
        ) \
        INSERT INTO {table} ({carried}, {mutable}, created_at, updated_at) \
        SELECT {carried}, {merged}, created_at, CURRENT_TIMESTAMP FROM old \
        RETURNING id"
    )
}

#[derive(Debug, FromQueryResult)]
struct OwnerRow {
    owner_id: i32,
}

/// Generic PostgreSQL implementation of [`VersionedStore`].
pub struct PostgresVersionedStore<T: VersionedTable> {
    db: DbConn,
    _entity: PhantomData<T>,
}

impl<T: VersionedTable> PostgresVersionedStore<T> {
    pub fn new(db: DbConn) -> Self {
        Self {
            db,
            _entity: PhantomData,
        }
    }
}

#[async_trait]
impl<T> VersionedStore<T> for PostgresVersionedStore<T>
where
    T: VersionedTable,
    ModelOf<T>: Send + Sync,
    ActiveModelOf<T>: Send + Sync,
    <T::Entity as EntityTrait>::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
{
    async fn fetch_current(&self, id: i32) -> Result<Option<T>, RepoError> {
        tracing::debug!(entity = T::KIND, id, "Fetching current row");

        let row = T::Entity::find()
            .filter(T::id_column().eq(id))
            .filter(T::deleted_at_column().is_null())
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(|(model, author)| T::from_row(model, author)))
    }

    async fn fetch_owner(&self, id: i32) -> Result<Option<i32>, RepoError> {
        let row = T::Entity::find()
            .select_only()
            .column_as(T::owner_column(), "owner_id")
            .filter(T::id_column().eq(id))
            .filter(T::deleted_at_column().is_null())
            .into_model::<OwnerRow>()
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(row.map(|r| r.owner_id))
    }

    async fn list(&self, scope: &T::Scope, page: Page) -> Result<Vec<T>, RepoError> {
        let rows = T::Entity::find()
            .filter(T::deleted_at_column().is_null())
            .filter(T::scope_condition(scope))
            .order_by(T::created_at_column(), T::list_order())
            .order_by(T::id_column(), T::list_order())
            .find_also_related(user::Entity)
            .limit(page.limit)
            .offset(page.offset())
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .map(|(model, author)| T::from_row(model, author))
            .collect())
    }

    async fn insert(&self, draft: T::Draft) -> Result<i32, RepoError> {
        let txn = self.db.begin().await.map_err(tx_err)?;

        let result = T::Entity::insert(T::active_model(draft))
            .exec(&txn)
            .await
            .map_err(db_err)?;

        txn.commit().await.map_err(tx_err)?;
        Ok(result.last_insert_id)
    }

    async fn soft_update(&self, id: i32, patch: T::Patch) -> Result<i32, RepoError> {
        let mut values = vec![Value::from(id)];
        values.extend(T::patch_values(patch));
        let stmt =
            Statement::from_sql_and_values(DbBackend::Postgres, soft_update_sql::<T>(), values);

        // Dropping an uncommitted transaction rolls it back.
        let txn = self.db.begin().await.map_err(tx_err)?;

        let Some(row) = txn.query_one(stmt).await.map_err(db_err)? else {
            txn.rollback().await.map_err(tx_err)?;
            return Err(RepoError::NotFound);
        };
        let new_id: i32 = row.try_get("", "id").map_err(db_err)?;

        txn.commit().await.map_err(tx_err)?;
        Ok(new_id)
    }

    async fn soft_delete(&self, id: i32) -> Result<(), RepoError> {
        let txn = self.db.begin().await.map_err(tx_err)?;

        let result = T::Entity::update_many()
            .col_expr(T::deleted_at_column(), Expr::current_timestamp().into())
            .filter(T::id_column().eq(id))
            .filter(T::deleted_at_column().is_null())
            .exec(&txn)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            txn.rollback().await.map_err(tx_err)?;
            return Err(RepoError::NotFound);
        }

        txn.commit().await.map_err(tx_err)?;
        Ok(())
    }
}
