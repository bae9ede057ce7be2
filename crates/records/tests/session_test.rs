//! Session lifecycle tests.

mod support;

use records::{with_session, AppError, Criteria, CrudRepository, WriteMode};
use sea_orm::{EntityTrait, PaginatorTrait};
use support::{note, setup, tag, user_account, Accounts, Notes, Tags};

#[tokio::test]
async fn test_with_session_commits_on_success() {
    let db = setup().await;

    let staged = db
        .with_session(|session| {
            Box::pin(async move {
                let tags = Tags::new(session);
                tags.save(tag::draft("rust"), WriteMode::Stage).await?;
                tags.save(tag::draft("sql"), WriteMode::Stage).await?;
                Ok(session.pending())
            })
        })
        .await
        .unwrap();

    assert_eq!(staged, 2);
    assert_eq!(tag::Entity::find().count(db.connection()).await.unwrap(), 2);
}

#[tokio::test]
async fn test_with_session_discards_on_error() {
    let db = setup().await;

    let result: Result<(), AppError> = with_session!(db, |session| {
        Tags::new(session)
            .save(tag::draft("rust"), WriteMode::Stage)
            .await?;
        Err(AppError::validation("abandon unit of work"))
    });

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(tag::Entity::find().count(db.connection()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_separate_sessions_share_committed_state() {
    let db = setup().await;

    let writer = db.session();
    let created = Accounts::new(&writer)
        .create(user_account::draft("ada@example.com", "Ada"))
        .await
        .unwrap();
    writer.close();

    let reader = db.session();
    let found = Accounts::new(&reader)
        .get_by(Criteria::new().eq(user_account::Column::Email, "ada@example.com"))
        .await
        .unwrap();
    assert_eq!(found, Some(created));
}

#[tokio::test]
async fn test_close_discards_uncommitted_writes() {
    let db = setup().await;

    let session = db.session();
    Tags::new(&session)
        .save(tag::draft("rust"), WriteMode::Stage)
        .await
        .unwrap();
    assert_eq!(session.pending(), 1);
    session.close();

    assert_eq!(tag::Entity::find().count(db.connection()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_empty_commit_is_a_no_op() {
    let db = setup().await;
    let session = db.session();

    session.commit().await.unwrap();
    session.rollback();
    assert_eq!(session.pending(), 0);
}

#[tokio::test]
async fn test_ensure_table_creates_declared_table() {
    let db = setup().await;
    db.ensure_table(note::Entity).await.unwrap();
    // Idempotent
    db.ensure_table(note::Entity).await.unwrap();

    let session = db.session();
    let notes = Notes::new(&session);
    let stored = notes
        .create(note::ActiveModel {
            body: sea_orm::Set("remember the milk".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let found = notes
        .get_by(Criteria::new().eq(note::Column::Body, "remember the milk"))
        .await
        .unwrap();
    assert_eq!(found, Some(stored));
}

#[tokio::test]
async fn test_ping() {
    let db = setup().await;
    db.ping().await.unwrap();
}
