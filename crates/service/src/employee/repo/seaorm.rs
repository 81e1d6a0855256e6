use sea_orm::DatabaseConnection;

use crate::employee::domain::{Employee, NewEmployeeRecord};
use crate::employee::errors::EmployeeError;
use crate::employee::repository::EmployeeRepository;

/// SeaORM-backed repository. The connection is a pool handle; each call
/// checks out a connection for one statement.
pub struct SeaOrmEmployeeRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmEmployeeRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait::async_trait]
impl EmployeeRepository for SeaOrmEmployeeRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, EmployeeError> {
        let found = models::employee::find_by_email(&self.db, email).await?;
        Ok(found.map(Employee::from))
    }

    async fn insert(&self, record: NewEmployeeRecord) -> Result<Employee, EmployeeError> {
        let created = models::employee::create(
            &self.db,
            models::employee::NewEmployee {
                first_name: record.first_name,
                last_name: record.last_name,
                phone: record.phone,
                email: record.email,
                password_hash: record.password_hash,
                active_status: record.active_status,
                role: record.role,
            },
        )
        .await?;
        Ok(Employee::from(created))
    }
}
