//! CRUD capability.
//!
//! All reads and writes go through the repository's [`Session`]. Writes are
//! either committed on the spot ([`WriteMode::Commit`]) or left staged in the
//! session ([`WriteMode::Stage`]) for a later commit or rollback.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, Condition, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, Select, TryIntoModel, Value,
};

use crate::session::Session;
use common::{AppError, AppResult};

/// Field filters for `get_by` / `get_or_create`, combined with AND.
#[derive(Debug, Clone)]
pub struct Criteria<E: EntityTrait> {
    filters: Vec<Filter<E>>,
}

#[derive(Debug, Clone)]
enum Filter<E: EntityTrait> {
    Eq(E::Column, Value),
    IsNull(E::Column),
}

impl<E: EntityTrait> Criteria<E> {
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Require `column = value`.
    pub fn eq(mut self, column: E::Column, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(column, value.into()));
        self
    }

    /// Require `column IS NULL`.
    pub fn is_null(mut self, column: E::Column) -> Self {
        self.filters.push(Filter::IsNull(column));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// SQL condition matching every filter.
    pub fn condition(&self) -> Condition {
        self.filters
            .iter()
            .fold(Condition::all(), |condition, filter| match filter {
                Filter::Eq(column, value) => condition.add(column.eq(value.clone())),
                Filter::IsNull(column) => condition.add(column.is_null()),
            })
    }
}

impl<E: EntityTrait> Default for Criteria<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// An explicit set of field assignments applied to an active model.
///
/// Fails with `DbErr::Type` when a value does not fit its column.
pub trait Changes<A>: Send {
    fn apply_to(self, model: &mut A) -> Result<(), DbErr>;
}

/// Equality filters double as assignments; null tests leave the field unset.
impl<E, A> Changes<A> for Criteria<E>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
{
    fn apply_to(self, model: &mut A) -> Result<(), DbErr> {
        for filter in self.filters {
            if let Filter::Eq(column, value) = filter {
                model.try_set(column, value)?;
            }
        }
        Ok(())
    }
}

/// Whether a write is committed immediately or left staged in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteMode {
    #[default]
    Commit,
    Stage,
}

/// A record as seen after a CRUD call.
#[derive(Debug, Clone)]
pub enum Tracked<A: ActiveModelTrait> {
    /// Stored (and committed) row
    Persisted(<A::Entity as EntityTrait>::Model),
    /// In-memory record staged in the session, not yet committed
    Pending(A),
}

impl<A: ActiveModelTrait> Tracked<A> {
    pub fn is_persisted(&self) -> bool {
        matches!(self, Tracked::Persisted(_))
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Tracked::Pending(_))
    }

    pub fn persisted(&self) -> Option<&<A::Entity as EntityTrait>::Model> {
        match self {
            Tracked::Persisted(model) => Some(model),
            Tracked::Pending(_) => None,
        }
    }

    /// Take the stored row, or `NotFound` when the record is only staged.
    pub fn into_persisted(self) -> AppResult<<A::Entity as EntityTrait>::Model> {
        match self {
            Tracked::Persisted(model) => Ok(model),
            Tracked::Pending(_) => Err(AppError::NotFound),
        }
    }
}

/// Create/read/update/delete helpers delegating to the session.
#[async_trait]
pub trait CrudRepository<E, A>: Send + Sync
where
    E: EntityTrait,
    E::Model: IntoActiveModel<A> + Send + Sync,
    A: ActiveModelTrait<Entity = E>
        + ActiveModelBehavior
        + TryIntoModel<E::Model>
        + Clone
        + Send
        + Sync
        + 'static,
{
    /// Session all reads and writes go through
    fn session(&self) -> &Session;

    /// Base query for this entity
    fn query(&self) -> Select<E> {
        E::find()
    }

    /// First record matching `criteria`
    async fn get_by(&self, criteria: Criteria<E>) -> AppResult<Option<E::Model>> {
        self.query()
            .filter(criteria.condition())
            .one(self.session().connection())
            .await
            .map_err(AppError::from)
    }

    /// Every record matching `criteria`
    async fn filter_by(&self, criteria: Criteria<E>) -> AppResult<Vec<E::Model>> {
        self.query()
            .filter(criteria.condition())
            .all(self.session().connection())
            .await
            .map_err(AppError::from)
    }

    /// Existing record matching `criteria`, or a new one carrying the
    /// criteria fields, staged but not committed.
    async fn get_or_create(&self, criteria: Criteria<E>) -> AppResult<Tracked<A>> {
        if let Some(found) = self.get_by(criteria.clone()).await? {
            return Ok(Tracked::Persisted(found));
        }

        let mut model = <A as ActiveModelBehavior>::new();
        criteria.apply_to(&mut model)?;
        self.session().add(model.clone());
        Ok(Tracked::Pending(model))
    }

    /// Insert `model` and commit, returning the stored row.
    async fn create(&self, model: A) -> AppResult<E::Model> {
        self.session()
            .commit_with(move |txn| Box::pin(async move { model.insert(txn).await }))
            .await
    }

    /// Apply `changes` to `model` and save it.
    async fn update<C>(&self, model: E::Model, changes: C, mode: WriteMode) -> AppResult<Tracked<A>>
    where
        C: Changes<A>,
    {
        let mut active = model.into_active_model();
        changes.apply_to(&mut active)?;
        self.save(active, mode).await
    }

    /// Stage `model` for persistence, committing when asked to.
    async fn save(&self, model: A, mode: WriteMode) -> AppResult<Tracked<A>> {
        match mode {
            WriteMode::Stage => {
                self.session().add(model.clone());
                Ok(Tracked::Pending(model))
            }
            WriteMode::Commit => {
                let stored = self
                    .session()
                    .commit_with(move |txn| {
                        Box::pin(async move { model.save(txn).await?.try_into_model() })
                    })
                    .await?;
                Ok(Tracked::Persisted(stored))
            }
        }
    }

    /// Stage removal of `model`, committing when asked to.
    async fn delete(&self, model: E::Model, mode: WriteMode) -> AppResult<()> {
        self.session().remove(model.into_active_model());
        if mode == WriteMode::Commit {
            self.session().commit().await?;
        }
        Ok(())
    }
}
