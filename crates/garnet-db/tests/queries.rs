//! End-to-end query execution against an in-memory database.

use garnet_db::{Database, DbError, Execute, QueryError, SqlValue, ToSqlValue};

#[derive(Debug, PartialEq, sqlx::FromRow)]
struct User {
    id: i64,
    name: String,
    age: i64,
}

async fn setup() -> Database {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    db.execute(
        "CREATE TABLE users (\
            id INTEGER PRIMARY KEY AUTOINCREMENT, \
            name TEXT NOT NULL, \
            age INTEGER NOT NULL)",
        &[],
    )
    .await
    .unwrap();
    db
}

async fn seed(db: &Database) {
    let inserted = db
        .table("users")
        .unwrap()
        .insert(
            db,
            &[
                &[("name", "alice".to_sql_value()), ("age", 30.to_sql_value())],
                &[("name", "bob".to_sql_value()), ("age", 17.to_sql_value())],
                &[("name", "carol".to_sql_value()), ("age", 45.to_sql_value())],
            ],
        )
        .await
        .unwrap();
    assert_eq!(inserted, Some(3));
}

#[tokio::test]
async fn insert_returns_last_insert_id() {
    let db = setup().await;
    let id = db
        .table("users")
        .unwrap()
        .insert(
            &db,
            &[&[("name", "alice".to_sql_value()), ("age", 30.to_sql_value())]],
        )
        .await
        .unwrap();
    assert_eq!(id, Some(1));
}

#[tokio::test]
async fn insert_empty_is_an_error() {
    let db = setup().await;
    let result = db.table("users").unwrap().insert(&db, &[]).await;
    assert!(matches!(
        result,
        Err(DbError::Query(QueryError::EmptyInsert))
    ));
}

#[tokio::test]
async fn select_with_filter_order_and_limit() {
    let db = setup().await;
    seed(&db).await;

    let adults: Vec<User> = db
        .table("users")
        .unwrap()
        .select(&["id", "name", "age"])
        .filter("age", ">", 18)
        .order_by(&["age"], "desc")
        .limit(10)
        .get(&db)
        .await
        .unwrap();

    let names: Vec<&str> = adults.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, vec!["carol", "alice"]);
}

#[tokio::test]
async fn repeated_fields_bind_their_own_values() {
    let db = setup().await;
    seed(&db).await;

    let in_range: Vec<User> = db
        .table("users")
        .unwrap()
        .filter("age", ">", 18)
        .filter("age", "<", 40)
        .get(&db)
        .await
        .unwrap();

    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].name, "alice");
}

#[tokio::test]
async fn or_filter_batch_selects_by_ids() {
    let db = setup().await;
    seed(&db).await;

    let picked: Vec<User> = db
        .table("users")
        .unwrap()
        .or_filter_all(vec![
            ("id", "=", SqlValue::Int(1)),
            ("id", "=", SqlValue::Int(3)),
        ])
        .get(&db)
        .await
        .unwrap();

    assert_eq!(picked.len(), 2);
}

#[tokio::test]
async fn first_returns_none_on_zero_rows() {
    let db = setup().await;

    let found: Option<User> = db
        .table("users")
        .unwrap()
        .filter_eq("name", "nobody")
        .first(&db)
        .await
        .unwrap();

    assert_eq!(found, None);
}

#[tokio::test]
async fn first_forces_limit_one() {
    let db = setup().await;
    seed(&db).await;

    let youngest: Option<User> = db
        .table("users")
        .unwrap()
        .order_by(&["age"], "asc")
        .limit(100)
        .first(&db)
        .await
        .unwrap();

    assert_eq!(youngest.unwrap().name, "bob");
}

#[tokio::test]
async fn count_applies_filters() {
    let db = setup().await;
    seed(&db).await;

    let total = db.table("users").unwrap().count(&db).await.unwrap();
    assert_eq!(total, 3);

    let adults = db
        .table("users")
        .unwrap()
        .filter("age", ">", 18)
        .count(&db)
        .await
        .unwrap();
    assert_eq!(adults, 2);
}

#[tokio::test]
async fn update_is_bounded_by_where() {
    let db = setup().await;
    seed(&db).await;

    let affected = db
        .table("users")
        .unwrap()
        .filter_eq("name", "bob")
        .update(&db, &[("age", 18.to_sql_value())])
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let bob: Option<User> = db
        .table("users")
        .unwrap()
        .filter_eq("name", "bob")
        .first(&db)
        .await
        .unwrap();
    assert_eq!(bob.unwrap().age, 18);
}

#[tokio::test]
async fn update_same_field_in_set_and_where() {
    let db = setup().await;
    seed(&db).await;

    let affected = db
        .table("users")
        .unwrap()
        .filter_eq("name", "alice")
        .update(&db, &[("name", "alicia".to_sql_value())])
        .await
        .unwrap();
    assert_eq!(affected, 1);

    let renamed = db
        .table("users")
        .unwrap()
        .filter_eq("name", "alicia")
        .count(&db)
        .await
        .unwrap();
    assert_eq!(renamed, 1);
}

#[tokio::test]
async fn delete_removes_matching_rows() {
    let db = setup().await;
    seed(&db).await;

    let deleted = db
        .table("users")
        .unwrap()
        .filter("age", "<", 18)
        .delete(&db)
        .await
        .unwrap();
    assert_eq!(deleted, 1);

    let remaining = db.table("users").unwrap().count(&db).await.unwrap();
    assert_eq!(remaining, 2);
}

#[tokio::test]
async fn joins_execute_across_tables() {
    let db = setup().await;
    seed(&db).await;
    db.execute(
        "CREATE TABLE orders (\
            id INTEGER PRIMARY KEY AUTOINCREMENT, \
            user_id INTEGER NOT NULL, \
            amount INTEGER NOT NULL)",
        &[],
    )
    .await
    .unwrap();
    db.table("orders")
        .unwrap()
        .insert(
            &db,
            &[
                &[("user_id", 1.to_sql_value()), ("amount", 50.to_sql_value())],
                &[("user_id", 1.to_sql_value()), ("amount", 70.to_sql_value())],
                &[("user_id", 3.to_sql_value()), ("amount", 10.to_sql_value())],
            ],
        )
        .await
        .unwrap();

    #[derive(Debug, sqlx::FromRow)]
    struct OrderLine {
        name: String,
        amount: i64,
    }

    let lines: Vec<OrderLine> = db
        .table("users")
        .unwrap()
        .select(&["users.name", "orders.amount"])
        .join("orders", "users.id", "=", "orders.user_id")
        .filter("orders.amount", ">", 20)
        .order_by(&["orders.amount"], "asc")
        .get(&db)
        .await
        .unwrap();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].name, "alice");
    assert_eq!(lines[0].amount, 50);
    assert_eq!(lines[1].amount, 70);
}

#[tokio::test]
async fn rejected_clauses_shrink_the_query_instead_of_failing() {
    let db = setup().await;
    seed(&db).await;

    // The malformed operator drops the clause, so the query matches
    // everything rather than executing an injectable fragment.
    let builder = db
        .table("users")
        .unwrap()
        .filter("name", "= '' OR 1=1 --", "x");
    assert_eq!(builder.rejected().len(), 1);

    let all: Vec<User> = builder.get(&db).await.unwrap();
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn raw_query_escape_hatch_binds_positionally() {
    let db = setup().await;
    seed(&db).await;

    let rows = db
        .query(
            "SELECT name FROM users WHERE age > ? ORDER BY name",
            &[SqlValue::Int(18)],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);

    use sqlx::Row;
    let first: String = rows[0].get("name");
    assert_eq!(first, "alice");
}
