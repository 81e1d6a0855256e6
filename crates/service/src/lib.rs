//! Service layer for employee registration on top of `models`.
//! - Separates business logic (validation, hashing, conflict policy) from data access.
//! - Repository trait with a SeaORM implementation and an in-memory mock.
//! - Typed errors that the HTTP layer maps to status codes.

pub mod employee;
#[cfg(test)]
pub mod test_support;
