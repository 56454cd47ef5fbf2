use sea_orm::{
    ConnectOptions, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait,
};
use std::ops::Deref;

/// A handle to the backing store.
///
/// Cheap to clone; all clones share the same connection pool.
#[derive(Clone, Debug)]
pub struct Database {
    db: DatabaseConnection,
}

impl Database {
    /// Connect using default pool settings.
    pub async fn connect(url: &str) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(url);
        options.sqlx_logging_level(log::LevelFilter::Trace);
        Self::connect_with(options).await
    }

    pub async fn connect_with(options: ConnectOptions) -> Result<Self, DbErr> {
        let db = sea_orm::Database::connect(options).await?;
        Ok(Self { db })
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    pub async fn begin(&self) -> Result<DatabaseTransaction, DbErr> {
        self.db.begin().await
    }

    /// Run `f` inside a transaction, committing on `Ok` and rolling back on `Err`.
    pub async fn transaction<F, T, E>(&self, f: F) -> Result<T, E>
    where
        F: AsyncFnOnce(&DatabaseTransaction) -> Result<T, E>,
        E: From<DbErr>,
    {
        let tx = self.db.begin().await?;

        match f(&tx).await {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(err) = tx.rollback().await {
                    log::warn!("failed to roll back transaction: {err}");
                }
                Err(err)
            }
        }
    }
}

impl Deref for Database {
    type Target = DatabaseConnection;

    fn deref(&self) -> &Self::Target {
        &self.db
    }
}
