use std::sync::Arc;

use tracing::{debug, error, info, instrument, warn, Span};

use super::domain::{Employee, NewEmployee, NewEmployeeRecord, RegisterEmployeeInput, DEFAULT_ROLE};
use super::errors::EmployeeError;
use super::hashing::{self, HashingParams};
use super::repository::EmployeeRepository;
use super::validation;

/// Registration service configuration
#[derive(Debug, Clone, Default)]
pub struct RegistrationConfig {
    pub hashing: HashingParams,
}

impl From<&configs::AppConfig> for RegistrationConfig {
    fn from(cfg: &configs::AppConfig) -> Self {
        Self { hashing: cfg.security.clone().into() }
    }
}

/// Employee registration service independent of web framework
pub struct EmployeeService<R: EmployeeRepository + ?Sized> {
    repo: Arc<R>,
    cfg: RegistrationConfig,
}

impl<R: EmployeeRepository + ?Sized> EmployeeService<R> {
    pub fn new(repo: Arc<R>, cfg: RegistrationConfig) -> Self { Self { repo, cfg } }

    /// Register a new employee.
    ///
    /// Validates and sanitizes the input, rejects an already registered
    /// (normalized) email, hashes the password and inserts one row. The role is
    /// always [`DEFAULT_ROLE`]. A duplicate that slips past the lookup is caught
    /// by the repository's uniqueness guarantee and reported as
    /// [`EmployeeError::Conflict`] as well.
    ///
    /// # Examples
    /// ```
    /// use service::employee::{service::{EmployeeService, RegistrationConfig}, repository::mock::MockEmployeeRepository};
    /// use service::employee::domain::RegisterEmployeeInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockEmployeeRepository::default());
    /// let svc = EmployeeService::new(repo, RegistrationConfig::default());
    /// let input = RegisterEmployeeInput {
    ///     employee_first_name: Some("Ann".into()),
    ///     employee_last_name: Some("Lee".into()),
    ///     employee_phone: Some("+15551234567".into()),
    ///     employee_email: Some("Ann.Lee+test@gmail.com".into()),
    ///     employee_password: Some("secret1".into()),
    ///     ..Default::default()
    /// };
    /// let employee = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(employee.email, "annlee@gmail.com");
    /// assert_eq!(employee.role, "employee");
    /// ```
    #[instrument(skip(self, input), fields(email = tracing::field::Empty))]
    pub async fn register(&self, input: RegisterEmployeeInput) -> Result<Employee, EmployeeError> {
        let NewEmployee { first_name, last_name, phone, email, password, active_status } =
            validation::validate(&input).map_err(|errs| {
                debug!(errors = %errs, "employee_validation_failed");
                EmployeeError::Validation(errs)
            })?;
        Span::current().record("email", email.as_str());

        if let Some(existing) = self.repo.find_by_email(&email).await? {
            info!(existing_id = existing.id, stage = "precheck", "employee_conflict");
            return Err(EmployeeError::Conflict);
        }

        let password_hash = hashing::hash_password(password, self.cfg.hashing).await?;

        let record = NewEmployeeRecord {
            first_name,
            last_name,
            phone,
            email,
            password_hash,
            active_status,
            role: DEFAULT_ROLE.to_string(),
        };

        match self.repo.insert(record).await {
            Ok(employee) => {
                info!(employee_id = employee.id, email = %employee.email, "employee_registered");
                Ok(employee)
            }
            Err(EmployeeError::Conflict) => {
                warn!(stage = "insert", "employee_conflict");
                Err(EmployeeError::Conflict)
            }
            Err(e) => {
                error!(code = e.code(), error = %e, "employee_register_failed");
                Err(e)
            }
        }
    }
}
