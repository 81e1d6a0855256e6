use sea_orm::{entity::prelude::*, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, Set};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub active_status: i16,
    pub role: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for a new row. Callers pass already sanitized values.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub active_status: i16,
    pub role: String,
}

pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, ModelError> {
    let found = Entity::find()
        .filter(Column::Email.eq(email))
        .one(db)
        .await?;
    Ok(found)
}

/// Insert a row; the id is assigned by the database. A duplicate email
/// surfaces as [`ModelError::UniqueViolation`].
pub async fn create(db: &DatabaseConnection, new: NewEmployee) -> Result<Model, ModelError> {
    if !new.email.contains('@') { return Err(ModelError::Validation("invalid email".into())); }
    if new.password_hash.trim().is_empty() { return Err(ModelError::Validation("password hash required".into())); }
    if !(0..=1).contains(&new.active_status) { return Err(ModelError::Validation("active_status must be 0 or 1".into())); }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: NotSet,
        first_name: Set(new.first_name),
        last_name: Set(new.last_name),
        phone: Set(new.phone),
        email: Set(new.email),
        password_hash: Set(new.password_hash),
        active_status: Set(new.active_status),
        role: Set(new.role),
        created_at: Set(now),
        updated_at: Set(now),
    };
    Ok(am.insert(db).await?)
}
