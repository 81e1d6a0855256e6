//! Employee module: validation/sanitization, repository and registration service.
//!
//! The HTTP layer only deserializes [`domain::RegisterEmployeeInput`] and maps
//! [`errors::EmployeeError`] to responses; everything else lives here.

pub mod domain;
pub mod errors;
pub mod hashing;
pub mod repo;
pub mod repository;
pub mod sanitize;
pub mod service;
pub mod validation;

pub use service::EmployeeService;
