use async_trait::async_trait;

use super::domain::{Employee, NewEmployeeRecord};
use super::errors::EmployeeError;

/// Repository abstraction for employee persistence.
///
/// `insert` must be backed by a uniqueness guarantee on `email` and report a
/// duplicate as [`EmployeeError::Conflict`], whatever `find_by_email` said
/// earlier.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, EmployeeError>;
    async fn insert(&self, record: NewEmployeeRecord) -> Result<Employee, EmployeeError>;
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
    use std::sync::{Mutex, MutexGuard};

    struct Row {
        employee: Employee,
        password_hash: String,
    }

    #[derive(Default)]
    pub struct MockEmployeeRepository {
        rows: Mutex<HashMap<String, Row>>, // key: normalized email
        last_id: AtomicI64,
        reads: AtomicUsize,
        writes: AtomicUsize,
    }

    impl MockEmployeeRepository {
        fn rows(&self) -> Result<MutexGuard<'_, HashMap<String, Row>>, EmployeeError> {
            self.rows.lock().map_err(|_| EmployeeError::Persistence("mock repository lock poisoned".into()))
        }

        /// Number of stored rows.
        pub fn len(&self) -> usize {
            self.rows().map(|r| r.len()).unwrap_or_default()
        }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        /// Stored employee by normalized email, without counting a read.
        pub fn stored(&self, email: &str) -> Option<Employee> {
            self.rows().ok()?.get(email).map(|r| r.employee.clone())
        }

        pub fn stored_password_hash(&self, email: &str) -> Option<String> {
            self.rows().ok()?.get(email).map(|r| r.password_hash.clone())
        }

        /// Completed `find_by_email` calls.
        pub fn reads(&self) -> usize { self.reads.load(Ordering::SeqCst) }

        /// Attempted `insert` calls, including rejected duplicates.
        pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl EmployeeRepository for MockEmployeeRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<Employee>, EmployeeError> {
            self.reads.fetch_add(1, Ordering::SeqCst);
            Ok(self.rows()?.get(email).map(|r| r.employee.clone()))
        }

        async fn insert(&self, record: NewEmployeeRecord) -> Result<Employee, EmployeeError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            let mut rows = self.rows()?;
            // Same guarantee as the unique index on employees.email.
            if rows.contains_key(&record.email) {
                return Err(EmployeeError::Conflict);
            }
            let employee = Employee {
                id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
                first_name: record.first_name,
                last_name: record.last_name,
                phone: record.phone,
                email: record.email,
                active_status: record.active_status,
                role: record.role,
            };
            rows.insert(employee.email.clone(), Row { employee: employee.clone(), password_hash: record.password_hash });
            Ok(employee)
        }
    }
}
