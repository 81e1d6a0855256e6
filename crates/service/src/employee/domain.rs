use std::fmt;

use serde::{Deserialize, Serialize};

/// Role written for every registered employee. Client input never changes it.
pub const DEFAULT_ROLE: &str = "employee";

/// Active status used when the request omits `active_employee`.
pub const DEFAULT_ACTIVE_STATUS: i16 = 1;

/// Raw registration payload as received from the client.
///
/// Every field is optional so that missing values become field-level
/// validation errors instead of deserialization failures.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RegisterEmployeeInput {
    #[serde(default)]
    pub employee_first_name: Option<String>,
    #[serde(default)]
    pub employee_last_name: Option<String>,
    #[serde(default)]
    pub employee_phone: Option<String>,
    #[serde(default)]
    pub employee_email: Option<String>,
    #[serde(default)]
    pub employee_password: Option<String>,
    /// `0`/`1` as a number or a numeric string.
    #[serde(default)]
    pub active_employee: Option<serde_json::Value>,
    /// Accepted for compatibility with older clients; never persisted.
    #[serde(default)]
    pub employee_role: Option<serde_json::Value>,
}

impl fmt::Debug for RegisterEmployeeInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterEmployeeInput")
            .field("employee_first_name", &self.employee_first_name)
            .field("employee_last_name", &self.employee_last_name)
            .field("employee_phone", &self.employee_phone)
            .field("employee_email", &self.employee_email)
            .field("employee_password", &self.employee_password.as_ref().map(|_| "<redacted>"))
            .field("active_employee", &self.active_employee)
            .field("employee_role", &self.employee_role)
            .finish()
    }
}

/// Validated and sanitized registration data. There is no role field:
/// the role is decided by the service, not by the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct NewEmployee {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    /// Raw password, only ever handed to the hasher.
    pub password: String,
    pub active_status: i16,
}

impl fmt::Debug for NewEmployee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewEmployee")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .field("phone", &self.phone)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("active_status", &self.active_status)
            .finish()
    }
}

/// Row to be written by a repository.
#[derive(Clone)]
pub struct NewEmployeeRecord {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub password_hash: String,
    pub active_status: i16,
    pub role: String,
}

impl fmt::Debug for NewEmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewEmployeeRecord")
            .field("email", &self.email)
            .field("active_status", &self.active_status)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Domain employee (business view). Carries no secret material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub active_status: i16,
    pub role: String,
}

impl From<models::employee::Model> for Employee {
    fn from(m: models::employee::Model) -> Self {
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            phone: m.phone,
            email: m.email,
            active_status: m.active_status,
            role: m.role,
        }
    }
}
