//! Base record aggregation: storage name, labels and a generic repository.

use std::fmt;
use std::marker::PhantomData;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityName, EntityTrait, IntoActiveModel, ModelTrait,
    TryIntoModel,
};

use crate::crud::CrudRepository;
use crate::identity::{IdentityRepository, PrimaryKeyOf};
use crate::session::Session;

/// Common behavior of persisted models and their in-memory drafts.
pub trait Record {
    /// Type name shown in labels
    const TYPE_NAME: &'static str;

    /// Surrogate key, `None` until the storage engine assigns one.
    fn identity(&self) -> Option<i64>;

    /// Table name declared by the entity.
    fn storage_name() -> String
    where
        Self: ModelTrait,
    {
        <Self as ModelTrait>::Entity::default().table_name().to_string()
    }

    /// `<TypeName 42>`, or `<TypeName #>` without an identity.
    fn label(&self) -> RecordLabel<'_, Self>
    where
        Self: Sized,
    {
        RecordLabel(self)
    }
}

/// Display adapter returned by [`Record::label`].
pub struct RecordLabel<'a, R: Record>(&'a R);

impl<R: Record> fmt::Display for RecordLabel<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.identity() {
            Some(id) => write!(f, "<{} {}>", R::TYPE_NAME, id),
            None => write!(f, "<{} #>", R::TYPE_NAME),
        }
    }
}

/// Repository combining the identity and CRUD capabilities for one entity.
pub struct Repository<'s, E, A> {
    session: &'s Session,
    _marker: PhantomData<fn() -> (E, A)>,
}

impl<'s, E, A> Repository<'s, E, A> {
    pub fn new(session: &'s Session) -> Self {
        Self {
            session,
            _marker: PhantomData,
        }
    }
}

impl<E, A> IdentityRepository<E> for Repository<'_, E, A>
where
    E: EntityTrait,
    i64: Into<PrimaryKeyOf<E>>,
{
    fn session(&self) -> &Session {
        self.session
    }
}

impl<E, A> CrudRepository<E, A> for Repository<'_, E, A>
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
    fn session(&self) -> &Session {
        self.session
    }
}
