//! Audit-timestamp capability.
//!
//! Entities carrying `created_at` / `updated_at` implement [`AuditTimestamps`]
//! on their active model and call the helpers from `ActiveModelBehavior`:
//!
//! ```ignore
//! #[async_trait]
//! impl ActiveModelBehavior for ActiveModel {
//!     fn new() -> Self {
//!         audit::stamp_new(<Self as ActiveModelTrait>::default())
//!     }
//!
//!     async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
//!     where
//!         C: ConnectionTrait,
//!     {
//!         audit::stamp_on_save(self, insert)
//!     }
//! }
//! ```

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, DbErr, EntityTrait};

/// Column type of the entity behind an active model.
pub type ColumnOf<A> = <<A as ActiveModelTrait>::Entity as EntityTrait>::Column;

/// Active models with creation and last-update timestamps.
///
/// Both columns must be `DateTimeUtc` and non-null; any other column type is
/// rejected with a `DbErr` when the row is saved.
pub trait AuditTimestamps: ActiveModelTrait {
    fn created_at_column() -> ColumnOf<Self>;

    fn updated_at_column() -> ColumnOf<Self>;
}

/// Stamp both timestamps with the current time. Call on construction.
///
/// Columns that do not accept a UTC timestamp are left unset.
pub fn stamp_new<A: AuditTimestamps>(model: A) -> A {
    stamp_new_at(model, Utc::now())
}

/// Maintain timestamps right before a row is written.
///
/// Inserts fill any timestamp still unset. Updates refresh `updated_at` and
/// drop pending changes to `created_at`, which never changes after the
/// first write.
pub fn stamp_on_save<A: AuditTimestamps>(model: A, insert: bool) -> Result<A, DbErr> {
    stamp_on_save_at(model, insert, Utc::now())
}

pub fn stamp_new_at<A: AuditTimestamps>(mut model: A, now: DateTime<Utc>) -> A {
    for column in [A::created_at_column(), A::updated_at_column()] {
        if let Err(err) = model.try_set(column, now.into()) {
            tracing::warn!("Audit column left unset: {}", err);
        }
    }
    model
}

pub fn stamp_on_save_at<A: AuditTimestamps>(
    mut model: A,
    insert: bool,
    now: DateTime<Utc>,
) -> Result<A, DbErr> {
    if insert {
        if model.is_not_set(A::created_at_column()) {
            model.try_set(A::created_at_column(), now.into())?;
        }
        if model.is_not_set(A::updated_at_column()) {
            model.try_set(A::updated_at_column(), now.into())?;
        }
    } else {
        if let sea_orm::ActiveValue::Set(_) = model.get(A::created_at_column()) {
            tracing::debug!("Ignoring change to creation timestamp on update");
            model.not_set(A::created_at_column());
        }
        model.try_set(A::updated_at_column(), now.into())?;
    }
    Ok(model)
}
