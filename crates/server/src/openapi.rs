use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterEmployeeRequest {
    pub employee_first_name: String,
    pub employee_last_name: String,
    pub employee_phone: String,
    pub employee_email: String,
    pub employee_password: String,
    /// 0 or 1, defaults to 1
    pub active_employee: Option<i16>,
    /// Ignored; every employee gets the `employee` role
    pub employee_role: Option<String>,
}

#[derive(ToSchema)]
pub struct EmployeeDoc {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub active_status: i16,
    pub role: String,
}

#[derive(ToSchema)]
pub struct EmployeeCreatedDoc {
    pub message: String,
    pub success: bool,
    pub data: EmployeeDoc,
}

#[derive(ToSchema)]
pub struct FieldErrorDoc { pub field: String, pub message: String }

#[derive(ToSchema)]
pub struct ErrorResponseDoc {
    pub success: bool,
    pub error: String,
    pub message: String,
    pub errors: Option<Vec<FieldErrorDoc>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::employee::register,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterEmployeeRequest,
            EmployeeDoc,
            EmployeeCreatedDoc,
            FieldErrorDoc,
            ErrorResponseDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "employee")
    )
)]
pub struct ApiDoc;
