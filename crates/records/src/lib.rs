//! Building blocks for persistent records on SeaORM.
//!
//! Each capability is a separate piece, combined per entity:
//!
//! - **identity**: primary-key lookup from loosely typed identifiers
//! - **audit**: `created_at` / `updated_at` maintenance
//! - **crud**: fetch, get-or-create, create, update, save and delete
//! - **record**: labels, storage names and a generic repository
//! - **naming**: the table naming convention
//! - **session**: the unit of work all of the above go through
//!
//! ```ignore
//! let database = Database::connect(&config.database).await?;
//! let session = database.session();
//! let accounts = Repository::<user_account::Entity, user_account::ActiveModel>::new(&session);
//!
//! let account = accounts.create(new_account).await?;
//! let same = accounts.get(account.id.to_string()).await?;
//! session.close();
//! ```

pub mod audit;
pub mod cli;
pub mod commands;
pub mod config;
pub mod crud;
pub mod identity;
pub mod infra;
pub mod naming;
pub mod record;
pub mod session;

// Re-export commonly used types at crate root
pub use audit::AuditTimestamps;
pub use common::{AppError, AppResult};
pub use crud::{Changes, Criteria, CrudRepository, Tracked, WriteMode};
pub use identity::{Identifier, IdentityRepository};
pub use infra::Database;
pub use naming::TableNamer;
pub use record::{Record, RecordLabel, Repository};
pub use session::Session;
