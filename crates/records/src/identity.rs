//! Identity capability: surrogate-key lookup.

use async_trait::async_trait;
use sea_orm::{EntityTrait, PrimaryKeyTrait};

use crate::session::Session;
use common::{AppError, AppResult};

/// Primary key value type of an entity.
pub type PrimaryKeyOf<E> = <<E as EntityTrait>::PrimaryKey as PrimaryKeyTrait>::ValueType;

/// Loosely typed record identifier, as received from callers.
///
/// Only values that denote a non-negative integer resolve to a key; see
/// [`Identifier::as_key`].
#[derive(Debug, Clone, PartialEq)]
pub enum Identifier {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Identifier {
    /// Resolve the identifier to a storage key.
    ///
    /// - integers are used as-is
    /// - finite floats are truncated toward zero
    /// - strings must be made of ASCII digits only (no sign, no whitespace)
    /// - everything else resolves to `None`
    pub fn as_key(&self) -> Option<i64> {
        match self {
            Identifier::Int(value) => Some(*value),
            Identifier::Float(value) => {
                let truncated = value.trunc();
                if truncated.is_finite()
                    && truncated >= i64::MIN as f64
                    && truncated < i64::MAX as f64
                {
                    Some(truncated as i64)
                } else {
                    None
                }
            }
            Identifier::Text(text) => {
                if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
                    text.parse().ok()
                } else {
                    None
                }
            }
            Identifier::Null => None,
        }
    }
}

impl From<i64> for Identifier {
    fn from(value: i64) -> Self {
        Identifier::Int(value)
    }
}

impl From<i32> for Identifier {
    fn from(value: i32) -> Self {
        Identifier::Int(value.into())
    }
}

impl From<u32> for Identifier {
    fn from(value: u32) -> Self {
        Identifier::Int(value.into())
    }
}

impl From<f64> for Identifier {
    fn from(value: f64) -> Self {
        Identifier::Float(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

impl From<&String> for Identifier {
    fn from(value: &String) -> Self {
        Identifier::Text(value.clone())
    }
}

impl<T: Into<Identifier>> From<Option<T>> for Identifier {
    fn from(value: Option<T>) -> Self {
        value.map_or(Identifier::Null, Into::into)
    }
}

/// Primary-key lookup for entities keyed by an `i64` surrogate.
#[async_trait]
pub trait IdentityRepository<E>: Send + Sync
where
    E: EntityTrait,
    i64: Into<PrimaryKeyOf<E>>,
{
    /// Session all reads go through
    fn session(&self) -> &Session;

    /// Find a record by identifier.
    ///
    /// Returns `Ok(None)` without querying when the identifier does not
    /// resolve to an integer key.
    async fn get<I>(&self, id: I) -> AppResult<Option<E::Model>>
    where
        I: Into<Identifier> + Send,
    {
        let Some(key) = id.into().as_key() else {
            return Ok(None);
        };

        E::find_by_id(key)
            .one(self.session().connection())
            .await
            .map_err(AppError::from)
    }
}
