use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use service::employee::{
    domain::{Employee, RegisterEmployeeInput},
    repository::EmployeeRepository,
    EmployeeService,
};

use crate::errors::JsonApiError;

pub const MSG_CREATED: &str = "Employee created successfully";

#[derive(Clone)]
pub struct ServerState {
    pub employees: Arc<EmployeeService<dyn EmployeeRepository>>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn EmployeeRepository>, cfg: service::employee::service::RegistrationConfig) -> Self {
        Self { employees: Arc::new(EmployeeService::new(repo, cfg)) }
    }
}

#[derive(Serialize)]
pub struct EmployeeCreated {
    pub message: &'static str,
    pub success: bool,
    pub data: Employee,
}

#[utoipa::path(
    post,
    path = "/api/employee",
    tag = "employee",
    request_body = crate::openapi::RegisterEmployeeRequest,
    responses(
        (status = 201, description = "Created", body = crate::openapi::EmployeeCreatedDoc),
        (status = 400, description = "Bad Request", body = crate::openapi::ErrorResponseDoc),
        (status = 409, description = "Conflict", body = crate::openapi::ErrorResponseDoc),
        (status = 500, description = "Internal Server Error", body = crate::openapi::ErrorResponseDoc)
    )
)]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterEmployeeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<EmployeeCreated>), JsonApiError> {
    let Json(input) = payload?;
    let employee = state.employees.register(input).await?;
    Ok((
        StatusCode::CREATED,
        Json(EmployeeCreated { message: MSG_CREATED, success: true, data: employee }),
    ))
}
