//! Postgres-backed checks of the `employees` schema. They run only when
//! `DATABASE_URL` is set and `SKIP_DB_TESTS` is not.

use anyhow::Result;
use migration::MigratorTrait;
use sea_orm::{EntityTrait, ColumnTrait, QueryFilter, PaginatorTrait};
use uuid::Uuid;

use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;

use crate::db::connect;
use crate::employee::{self, NewEmployee};
use crate::errors::ModelError;

fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

// Migrations run once per test process; each test then opens its own pool
// because every #[tokio::test] has its own runtime.
static MIGRATED: OnceCell<()> = OnceCell::const_new();

async fn migrated_db() -> Result<DatabaseConnection> {
    MIGRATED
        .get_or_try_init(|| async {
            let db = connect().await?;
            migration::Migrator::up(&db, None).await?;
            db.close().await?;
            Ok::<(), anyhow::Error>(())
        })
        .await?;
    connect().await
}

fn new_employee(email: &str) -> NewEmployee {
    NewEmployee {
        first_name: "Db".into(),
        last_name: "Test".into(),
        phone: "+15550000000".into(),
        email: email.into(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
        active_status: 1,
        role: "employee".into(),
    }
}

#[tokio::test]
async fn unique_email_is_enforced_by_schema() -> Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let db = migrated_db().await?;

    let email = format!("db_{}@example.com", Uuid::new_v4().simple());
    let first = employee::create(&db, new_employee(&email)).await?;
    assert!(first.id > 0);

    let second = employee::create(&db, new_employee(&email)).await;
    assert!(matches!(second, Err(ModelError::UniqueViolation(_))), "got {second:?}");

    let count = employee::Entity::find()
        .filter(employee::Column::Email.eq(email.clone()))
        .count(&db)
        .await?;
    assert_eq!(count, 1);

    employee::Entity::delete_by_id(first.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn ids_are_assigned_by_storage() -> Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let db = migrated_db().await?;

    let a = employee::create(&db, new_employee(&format!("a_{}@example.com", Uuid::new_v4().simple()))).await?;
    let b = employee::create(&db, new_employee(&format!("b_{}@example.com", Uuid::new_v4().simple()))).await?;
    assert_ne!(a.id, b.id);

    let found = employee::find_by_email(&db, &b.email).await?;
    assert_eq!(found.map(|m| m.id), Some(b.id));

    employee::Entity::delete_by_id(a.id).exec(&db).await?;
    employee::Entity::delete_by_id(b.id).exec(&db).await?;
    Ok(())
}
