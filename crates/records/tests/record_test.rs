//! Record labels and declared storage names.

mod support;

use records::{CrudRepository, Record, TableNamer};
use sea_orm::ActiveModelBehavior;
use support::{setup, tag, user_account, Accounts};

#[test]
fn test_declared_names_follow_naming_convention() {
    let namer = TableNamer::default();

    assert_eq!(
        user_account::Model::storage_name(),
        namer.derive("palvin::models::user", "UserAccount")
    );
    assert_eq!(
        tag::Model::storage_name(),
        namer.derive("palvin::models::tag", "Tag")
    );
}

#[test]
fn test_unsaved_record_label_uses_placeholder() {
    let draft = <user_account::ActiveModel as ActiveModelBehavior>::new();
    assert_eq!(draft.label().to_string(), "<UserAccount #>");
}

#[tokio::test]
async fn test_saved_record_label_shows_identity() {
    let db = setup().await;
    let session = db.session();

    let created = Accounts::new(&session)
        .create(user_account::draft("ada@example.com", "Ada"))
        .await
        .unwrap();

    assert_eq!(created.to_string(), format!("<UserAccount {}>", created.id));
    assert_eq!(created.label().to_string(), created.to_string());
}
