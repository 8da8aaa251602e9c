//! Transaction atomicity and error propagation.

use garnet_db::{Database, DbError, Execute, ToSqlValue};

async fn setup() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute(
        "CREATE TABLE accounts (\
            id INTEGER PRIMARY KEY, \
            balance INTEGER NOT NULL)",
        &[],
    )
    .await
    .unwrap();
    db
}

#[tokio::test]
async fn commit_on_ok_persists_writes() {
    let db = setup().await;

    let id = db
        .transaction(async {
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 1.to_sql_value()), ("balance", 100.to_sql_value())]],
                )
                .await
        })
        .await
        .unwrap();
    assert_eq!(id, Some(1));

    let count = db.table("accounts").unwrap().count(&db).await.unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn rollback_on_err_undoes_partial_writes() {
    let db = setup().await;

    let result = db
        .transaction(async {
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 1.to_sql_value()), ("balance", 100.to_sql_value())]],
                )
                .await?;
            // Duplicate primary key: the driver rejects this statement,
            // and the whole transaction must unwind.
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 1.to_sql_value()), ("balance", 200.to_sql_value())]],
                )
                .await?;
            Ok(())
        })
        .await;

    // The original driver error reaches the caller unchanged.
    assert!(matches!(result, Err(DbError::Database(_))));

    // Zero net writes after rollback.
    let count = db.table("accounts").unwrap().count(&db).await.unwrap();
    assert_eq!(count, 0);
}

#[tokio::test]
async fn transaction_returns_the_work_value() {
    let db = setup().await;

    let value = db
        .transaction(async {
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 7.to_sql_value()), ("balance", 0.to_sql_value())]],
                )
                .await?;
            db.table("accounts").unwrap().count(&db).await
        })
        .await
        .unwrap();
    assert_eq!(value, 1);
}

#[tokio::test]
async fn fresh_builder_after_failed_transaction_has_no_stale_state() {
    let db = setup().await;

    let _ = db
        .transaction(async {
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 1.to_sql_value()), ("balance", 1.to_sql_value())]],
                )
                .await?;
            db.table("accounts")
                .unwrap()
                .insert(
                    &db,
                    &[&[("id", 1.to_sql_value()), ("balance", 2.to_sql_value())]],
                )
                .await?;
            Ok(())
        })
        .await;

    // A new builder carries no parameter state from the failed insert.
    let id = db
        .table("accounts")
        .unwrap()
        .insert(
            &db,
            &[&[("id", 2.to_sql_value()), ("balance", 3.to_sql_value())]],
        )
        .await
        .unwrap();
    assert_eq!(id, Some(2));
}
