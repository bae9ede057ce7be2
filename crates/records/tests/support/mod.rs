//! Shared fixtures for integration tests: entities and an in-memory database.

#![allow(dead_code)]

use common::DatabaseConfig;
use records::Database;

pub mod user_account {
    use records::audit::{self, AuditTimestamps};
    use records::{Changes, Record};
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "user_accounts")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub email: String,
        pub display_name: String,
        pub created_at: DateTimeUtc,
        pub updated_at: DateTimeUtc,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    #[async_trait::async_trait]
    impl ActiveModelBehavior for ActiveModel {
        fn new() -> Self {
            audit::stamp_new(<Self as ActiveModelTrait>::default())
        }

        async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
        where
            C: ConnectionTrait,
        {
            audit::stamp_on_save(self, insert)
        }
    }

    impl AuditTimestamps for ActiveModel {
        fn created_at_column() -> Column {
            Column::CreatedAt
        }

        fn updated_at_column() -> Column {
            Column::UpdatedAt
        }
    }

    impl Record for Model {
        const TYPE_NAME: &'static str = "UserAccount";

        fn identity(&self) -> Option<i64> {
            Some(self.id)
        }
    }

    impl Record for ActiveModel {
        const TYPE_NAME: &'static str = "UserAccount";

        fn identity(&self) -> Option<i64> {
            match &self.id {
                sea_orm::ActiveValue::Set(id) | sea_orm::ActiveValue::Unchanged(id) => Some(*id),
                sea_orm::ActiveValue::NotSet => None,
            }
        }
    }

    impl std::fmt::Display for Model {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            std::fmt::Display::fmt(&self.label(), f)
        }
    }

    /// Field updates for an account
    #[derive(Debug, Default)]
    pub struct AccountChanges {
        pub email: Option<String>,
        pub display_name: Option<String>,
    }

    impl Changes<ActiveModel> for AccountChanges {
        fn apply_to(self, model: &mut ActiveModel) -> Result<(), DbErr> {
            if let Some(email) = self.email {
                model.email = Set(email);
            }
            if let Some(display_name) = self.display_name {
                model.display_name = Set(display_name);
            }
            Ok(())
        }
    }

    /// New, unsaved account
    pub fn draft(email: &str, display_name: &str) -> ActiveModel {
        ActiveModel {
            email: Set(email.to_string()),
            display_name: Set(display_name.to_string()),
            ..<ActiveModel as ActiveModelBehavior>::new()
        }
    }
}

pub mod tag {
    use records::Record;
    use sea_orm::entity::prelude::*;
    use sea_orm::Set;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "tags")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i64,
        #[sea_orm(unique)]
        pub label: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Record for Model {
        const TYPE_NAME: &'static str = "Tag";

        fn identity(&self) -> Option<i64> {
            Some(self.id)
        }
    }

    pub fn draft(label: &str) -> ActiveModel {
        ActiveModel {
            label: Set(label.to_string()),
            ..<ActiveModel as ActiveModelBehavior>::new()
        }
    }
}

pub mod note {
    use sea_orm::entity::prelude::*;

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "notes")]
    pub struct Model {
        #[sea_orm(primary_key)]
        pub id: i32,
        pub body: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub type Accounts<'s> = records::Repository<'s, user_account::Entity, user_account::ActiveModel>;
pub type Tags<'s> = records::Repository<'s, tag::Entity, tag::ActiveModel>;
pub type Notes<'s> = records::Repository<'s, note::Entity, note::ActiveModel>;

/// In-memory SQLite database with the fixture tables created.
///
/// A single pooled connection keeps the in-memory database alive and shared.
pub async fn setup() -> Database {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        sqlx_logging: false,
    };
    let db = Database::connect(&config)
        .await
        .expect("Failed to connect to in-memory database");

    db.ensure_table(user_account::Entity)
        .await
        .expect("Failed to create user_accounts");
    db.ensure_table(tag::Entity)
        .await
        .expect("Failed to create tags");

    db
}
