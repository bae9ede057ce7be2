//! Database connection and initialization.

use std::future::Future;
use std::pin::Pin;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr,
    EntityName, EntityTrait, ExecResult, Schema, Statement,
};

use crate::session::Session;
use common::{AppResult, DatabaseConfig};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
}

impl Database {
    /// Connect using the configured connection string and pool bounds.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbErr> {
        let mut options = ConnectOptions::new(config.url.clone());
        options
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .sqlx_logging(config.sqlx_logging);

        let connection = SeaDatabase::connect(options).await?;
        tracing::info!(
            backend = ?connection.get_database_backend(),
            "Database connected"
        );

        Ok(Self { connection })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Get a clone of the database connection.
    pub fn get_connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Open a new unit of work.
    pub fn session(&self) -> Session {
        Session::open(self)
    }

    /// Run `f` in a fresh session.
    ///
    /// Staged writes are committed when `f` succeeds and discarded when it
    /// fails. The session is closed either way.
    pub async fn with_session<F, T>(&self, f: F) -> AppResult<T>
    where
        F: for<'s> FnOnce(&'s Session) -> Pin<Box<dyn Future<Output = AppResult<T>> + Send + 's>>
            + Send,
        T: Send,
    {
        let session = self.session();
        let outcome = match f(&session).await {
            Ok(value) => session.commit().await.map(|()| value),
            Err(err) => {
                session.rollback();
                Err(err)
            }
        };
        session.close();
        outcome
    }

    /// Create the table declared by `entity` unless it already exists.
    pub async fn ensure_table<E: EntityTrait>(&self, entity: E) -> Result<(), DbErr> {
        let backend = self.connection.get_database_backend();
        let mut statement = Schema::new(backend).create_table_from_entity(entity);
        statement.if_not_exists();

        self.connection.execute(backend.build(&statement)).await?;
        tracing::debug!(table = %entity.table_name(), "Table ensured");
        Ok(())
    }

    /// Execute raw SQL without parameters.
    pub async fn execute_unprepared(&self, sql: &str) -> Result<ExecResult, DbErr> {
        self.connection.execute_unprepared(sql).await
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
