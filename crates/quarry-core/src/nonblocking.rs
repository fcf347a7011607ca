//! Async wrapper running store operations on tokio's blocking pool.

use std::sync::Arc;

use tokio::task;

use crate::{
    error::{Result, StoreError},
    row::Row,
    store::Store,
    value::Value,
};

/// Cloneable async handle over a shared [`Store`].
///
/// Each call moves its statement and parameters onto a blocking task; the
/// store's own lock still serialises access to the connection.
#[derive(Clone)]
pub struct AsyncStore {
    inner: Arc<Store>,
}

impl AsyncStore {
    pub fn new(store: Store) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// The wrapped synchronous store.
    pub fn blocking(&self) -> &Store {
        &self.inner
    }

    async fn spawn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Store) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| StoreError::TaskJoin {
                message: e.to_string(),
            })?
    }

    pub async fn ensure_ready(&self) -> Result<()> {
        self.spawn(|store| store.ensure_ready()).await
    }

    pub async fn schema_version(&self) -> Result<usize> {
        self.spawn(|store| store.schema_version()).await
    }

    pub async fn query_many(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<Vec<Row>> {
        let sql = sql.into();
        self.spawn(move |store| store.query_many(&sql, &params))
            .await
    }

    /// Transforms run on the blocking task, next to the query.
    pub async fn query_many_with<T, F>(
        &self,
        sql: impl Into<String>,
        params: Vec<Value>,
        transform: F,
    ) -> Result<Vec<T>>
    where
        T: Send + 'static,
        F: FnMut(Row) -> Result<T> + Send + 'static,
    {
        let sql = sql.into();
        self.spawn(move |store| store.query_many_with(&sql, &params, transform))
            .await
    }

    pub async fn query_one(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<Option<Row>> {
        let sql = sql.into();
        self.spawn(move |store| store.query_one(&sql, &params))
            .await
    }

    pub async fn query_one_with<T, F>(
        &self,
        sql: impl Into<String>,
        params: Vec<Value>,
        transform: F,
    ) -> Result<Option<T>>
    where
        T: Send + 'static,
        F: FnOnce(Row) -> Result<T> + Send + 'static,
    {
        let sql = sql.into();
        self.spawn(move |store| store.query_one_with(&sql, &params, transform))
            .await
    }

    pub async fn execute(&self, sql: impl Into<String>, params: Vec<Value>) -> Result<()> {
        let sql = sql.into();
        self.spawn(move |store| store.execute(&sql, &params))
            .await
    }
}

impl From<Store> for AsyncStore {
    fn from(store: Store) -> Self {
        Self::new(store)
    }
}
