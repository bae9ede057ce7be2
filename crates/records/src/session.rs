//! Session: the unit of work every read and write goes through.
//!
//! A session never autocommits and never autoflushes: staged writes stay in
//! memory, invisible to reads, until [`Session::commit`] applies them in one
//! transaction. Models returned by a commit stay usable afterwards.

use std::sync::{Mutex, PoisonError};

use futures::future::BoxFuture;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, IntoActiveModel, TransactionTrait,
};

use crate::infra::Database;
use common::{AppError, AppResult};

/// A write queued in the session, replayed inside the commit transaction.
type PendingWrite =
    Box<dyn for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<(), DbErr>> + Send>;

fn pending_write<F>(write: F) -> PendingWrite
where
    F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<(), DbErr>> + Send + 'static,
{
    Box::new(write)
}

/// Unit of work over a pooled connection.
pub struct Session {
    db: DatabaseConnection,
    pending: Mutex<Vec<PendingWrite>>,
}

impl Session {
    /// Open a session on the given database.
    pub fn open(database: &Database) -> Self {
        Self::from_connection(database.get_connection())
    }

    /// Open a session on an existing connection.
    pub fn from_connection(db: DatabaseConnection) -> Self {
        Self {
            db,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Connection used for reads. Reads do not see staged writes.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Number of staged writes waiting for commit.
    pub fn pending(&self) -> usize {
        self.queue().len()
    }

    /// Stage an insert-or-update of `model`.
    pub fn add<A>(&self, model: A)
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
        <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
    {
        tracing::debug!(entity = %entity_name::<A>(), "Staging save");
        self.push(pending_write(move |txn| {
            Box::pin(async move { model.save(txn).await.map(|_| ()) })
        }));
    }

    /// Stage removal of `model`.
    pub fn remove<A>(&self, model: A)
    where
        A: ActiveModelTrait + ActiveModelBehavior + Send + 'static,
    {
        tracing::debug!(entity = %entity_name::<A>(), "Staging delete");
        self.push(pending_write(move |txn| {
            Box::pin(async move { model.delete(txn).await.map(|_| ()) })
        }));
    }

    /// Apply every staged write in one transaction.
    ///
    /// On failure the transaction is rolled back, the staged writes are
    /// discarded and the database error is returned as raised.
    pub async fn commit(&self) -> AppResult<()> {
        self.commit_with(|_| Box::pin(async { Ok(()) })).await
    }

    /// Apply staged writes, then `last`, in one transaction and commit.
    pub(crate) async fn commit_with<T, F>(&self, last: F) -> AppResult<T>
    where
        F: for<'t> FnOnce(&'t DatabaseTransaction) -> BoxFuture<'t, Result<T, DbErr>> + Send,
        T: Send,
    {
        let writes = std::mem::take(&mut *self.queue());
        let count = writes.len();

        let txn = self.db.begin().await?;
        let outcome = async {
            for write in writes {
                write(&txn).await?;
            }
            last(&txn).await
        }
        .await;

        match outcome {
            Ok(value) => {
                if let Err(err) = txn.commit().await {
                    tracing::warn!("Commit failed, transaction rolled back: {}", err);
                    return Err(AppError::from(err));
                }
                tracing::debug!(writes = count, "Session committed");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!("Write failed, rolling back transaction: {}", err);
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::error!("Transaction rollback failed: {}", rollback_err);
                }
                Err(AppError::from(err))
            }
        }
    }

    /// Discard every staged write.
    pub fn rollback(&self) {
        let discarded = std::mem::take(&mut *self.queue()).len();
        if discarded > 0 {
            tracing::debug!(writes = discarded, "Session rolled back");
        }
    }

    /// End the unit of work. Anything still staged is discarded.
    pub fn close(self) {
        let left = self.pending();
        if left > 0 {
            tracing::warn!(writes = left, "Closing session with uncommitted writes");
        }
    }

    fn push(&self, write: PendingWrite) {
        self.queue().push(write);
    }

    fn queue(&self) -> std::sync::MutexGuard<'_, Vec<PendingWrite>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("pending", &self.pending())
            .finish()
    }
}

fn entity_name<A: ActiveModelTrait>() -> String {
    use sea_orm::EntityName;
    A::Entity::default().table_name().to_string()
}

/// Run a session-scoped block against a [`Database`].
///
/// ```ignore
/// let account = with_session!(database, |session| {
///     Repository::<user_account::Entity, user_account::ActiveModel>::new(session)
///         .create(new_account)
///         .await
/// })?;
/// ```
#[macro_export]
macro_rules! with_session {
    ($database:expr, |$session:ident| $body:expr) => {
        $database
            .with_session(|$session| Box::pin(async move { $body }))
            .await
    };
}
