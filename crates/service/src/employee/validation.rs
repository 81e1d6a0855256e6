use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;
use validator::ValidateEmail;

use super::domain::{NewEmployee, RegisterEmployeeInput, DEFAULT_ACTIVE_STATUS};
use super::errors::ValidationErrors;
use super::sanitize::{escape, normalize_email};

pub const MIN_PASSWORD_LENGTH: usize = 6;

// Optional leading `+`, digits grouped by spaces, dashes, dots or parentheses.
static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+?\(?[0-9]{1,4}\)?(?:[ .\-]?\(?[0-9]{1,5}\)?)*$").expect("phone regex compiles")
});

/// Phone-shaped string with 7 to 15 digits (the E.164 maximum).
pub fn is_phone_number(phone: &str) -> bool {
    let digits = phone.chars().filter(char::is_ascii_digit).count();
    (7..=15).contains(&digits) && PHONE_RE.is_match(phone)
}

/// Trim, escape and drop the field when nothing is left.
fn sanitized(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(escape)
}

fn parse_active_status(value: Option<&Value>) -> Option<i16> {
    match value {
        None | Some(Value::Null) => Some(DEFAULT_ACTIVE_STATUS),
        // Integral floats such as `1.0` count as integers.
        Some(Value::Number(n)) => match n.as_i64().or_else(|| n.as_f64().filter(|f| *f == 0.0 || *f == 1.0).map(|f| f as i64)) {
            Some(v @ (0 | 1)) => Some(v as i16),
            _ => None,
        },
        Some(Value::String(s)) => match s.trim() {
            "0" => Some(0),
            "1" => Some(1),
            _ => None,
        },
        Some(_) => None,
    }
}

/// Require a top-level domain of two or more letters (or an IDN `xn--` label).
fn has_tld(email: &str) -> bool {
    email
        .rsplit_once('@')
        .and_then(|(_, domain)| domain.rsplit_once('.'))
        .is_some_and(|(_, tld)| {
            tld.chars().count() >= 2 && (tld.chars().all(char::is_alphabetic) || tld.starts_with("xn--"))
        })
}

/// Syntax check shared by the raw and the normalized address.
pub fn is_email(email: &str) -> bool {
    email.to_string().validate_email() && has_tld(email)
}

/// Sanitize and validate a registration payload.
///
/// Every field is checked; the returned [`ValidationErrors`] lists all
/// violations in field order. Never touches storage.
pub fn validate(input: &RegisterEmployeeInput) -> Result<NewEmployee, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let first_name = sanitized(input.employee_first_name.as_deref());
    if first_name.is_none() {
        errors.missing("employee_first_name", "First name is required");
    }

    let last_name = sanitized(input.employee_last_name.as_deref());
    if last_name.is_none() {
        errors.missing("employee_last_name", "Last name is required");
    }

    let phone = sanitized(input.employee_phone.as_deref());
    match phone.as_deref() {
        None => errors.missing("employee_phone", "Phone number is required"),
        Some(p) if !is_phone_number(p) => errors.invalid("employee_phone", "Please enter a valid phone number"),
        Some(_) => {}
    }

    let raw_email = input.employee_email.as_deref().map(str::trim).filter(|e| !e.is_empty());
    let email = match raw_email {
        None => {
            errors.missing("employee_email", "Email is required");
            None
        }
        Some(raw) => {
            let normalized = if is_email(raw) { normalize_email(raw) } else { None };
            match normalized {
                Some(n) if is_email(&n) => Some(n),
                _ => {
                    errors.invalid("employee_email", "Please enter a valid email");
                    None
                }
            }
        }
    };

    let password = input.employee_password.as_deref().filter(|p| !p.is_empty());
    match password {
        None => errors.missing("employee_password", "Password is required"),
        Some(p) if p.chars().count() < MIN_PASSWORD_LENGTH => {
            errors.invalid("employee_password", "Password must be at least 6 characters long")
        }
        Some(_) => {}
    }

    let active_status = parse_active_status(input.active_employee.as_ref());
    if active_status.is_none() {
        errors.invalid("active_employee", "Active status must be 0 or 1");
    }

    if input.employee_role.is_some() {
        debug!("client-supplied employee_role ignored");
    }

    match (first_name, last_name, phone, email, password, active_status) {
        (Some(first_name), Some(last_name), Some(phone), Some(email), Some(password), Some(active_status))
            if errors.is_empty() =>
        {
            Ok(NewEmployee { first_name, last_name, phone, email, password: password.to_string(), active_status })
        }
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_input() -> RegisterEmployeeInput {
        RegisterEmployeeInput {
            employee_first_name: Some("Ann".into()),
            employee_last_name: Some("Lee".into()),
            employee_phone: Some("+15551234567".into()),
            employee_email: Some("Ann.Lee+test@gmail.com".into()),
            employee_password: Some("secret1".into()),
            active_employee: None,
            employee_role: None,
        }
    }

    fn fields(errs: &ValidationErrors) -> Vec<&'static str> {
        errs.errors().iter().map(|e| e.field).collect()
    }

    #[test]
    fn valid_input_is_normalized() {
        let out = validate(&valid_input()).unwrap();
        assert_eq!(out.first_name, "Ann");
        assert_eq!(out.email, "annlee@gmail.com");
        assert_eq!(out.phone, "+15551234567");
        assert_eq!(out.password, "secret1");
        assert_eq!(out.active_status, 1);
    }

    #[test]
    fn names_are_escaped_and_password_is_not() {
        let mut input = valid_input();
        input.employee_first_name = Some("<b>Ann</b>".into());
        input.employee_last_name = Some("O'Neil".into());
        input.employee_password = Some("<&pass'>".into());
        let out = validate(&input).unwrap();
        assert_eq!(out.first_name, "&lt;b&gt;Ann&lt;&#x2F;b&gt;");
        assert_eq!(out.last_name, "O&#x27;Neil");
        assert_eq!(out.password, "<&pass'>");
    }

    #[test]
    fn short_password_is_rejected() {
        let mut input = valid_input();
        input.employee_password = Some("abc12".into());
        let errs = validate(&input).unwrap_err();
        assert_eq!(fields(&errs), vec!["employee_password"]);
        assert_eq!(errs.errors()[0].message, "Password must be at least 6 characters long");
        assert!(!errs.has_missing());
    }

    #[test]
    fn password_length_counts_characters() {
        let mut input = valid_input();
        input.employee_password = Some("ééééé".into());
        assert!(validate(&input).is_err());
        input.employee_password = Some("éééééé".into());
        assert!(validate(&input).is_ok());
    }

    #[test]
    fn missing_phone_is_reported_as_required() {
        let mut input = valid_input();
        input.employee_phone = None;
        let errs = validate(&input).unwrap_err();
        assert_eq!(fields(&errs), vec!["employee_phone"]);
        assert_eq!(errs.errors()[0].message, "Phone number is required");
        assert!(errs.has_missing());
    }

    #[test]
    fn whitespace_only_counts_as_missing() {
        let mut input = valid_input();
        input.employee_first_name = Some("   ".into());
        let errs = validate(&input).unwrap_err();
        assert_eq!(fields(&errs), vec!["employee_first_name"]);
    }

    #[test]
    fn all_violations_are_reported_in_field_order() {
        let input = RegisterEmployeeInput {
            employee_phone: Some("call me".into()),
            employee_email: Some("not-an-email".into()),
            employee_password: Some("123".into()),
            active_employee: Some(json!(7)),
            ..Default::default()
        };
        let errs = validate(&input).unwrap_err();
        assert_eq!(
            fields(&errs),
            vec![
                "employee_first_name",
                "employee_last_name",
                "employee_phone",
                "employee_email",
                "employee_password",
                "active_employee",
            ]
        );
    }

    #[test]
    fn phone_patterns() {
        for ok in ["+15551234567", "555-123-4567", "(555) 123 4567", "+44 20 7946 0958", "0612345678"] {
            assert!(is_phone_number(ok), "{ok} should be accepted");
        }
        for bad in ["12345", "phone", "+1 555 CALL NOW", "1234567890123456", "++15551234567", "555--1234567"] {
            assert!(!is_phone_number(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn invalid_emails_are_rejected() {
        for bad in ["plainaddress", "a@b", "@example.com", "+tag@gmail.com", "a b@example.com"] {
            let mut input = valid_input();
            input.employee_email = Some(bad.into());
            let errs = validate(&input).unwrap_err();
            assert_eq!(fields(&errs), vec!["employee_email"], "{bad}");
            assert_eq!(errs.errors()[0].message, "Please enter a valid email");
        }
    }

    #[test]
    fn email_requires_tld() {
        assert!(is_email("ann@example.co.uk"));
        assert!(is_email("ann@xn--80ak6aa92e.xn--p1ai"));
        assert!(!is_email("ann@localhost"));
        assert!(!is_email("ann@example.c"));
    }

    #[test]
    fn active_status_accepts_only_zero_or_one() {
        let cases = [
            (None, Some(1)),
            (Some(json!(null)), Some(1)),
            (Some(json!(0)), Some(0)),
            (Some(json!(1)), Some(1)),
            (Some(json!("0")), Some(0)),
            (Some(json!("1")), Some(1)),
            (Some(json!(2)), None),
            (Some(json!(-1)), None),
            (Some(json!(1.0)), Some(1)),
            (Some(json!(0.0)), Some(0)),
            (Some(json!(1.5)), None),
            (Some(json!(2.0)), None),
            (Some(json!("1.0")), None),
            (Some(json!(true)), None),
            (Some(json!("yes")), None),
        ];
        for (value, expected) in cases {
            let mut input = valid_input();
            input.active_employee = value.clone();
            match (validate(&input), expected) {
                (Ok(out), Some(status)) => assert_eq!(out.active_status, status, "{value:?}"),
                (Err(errs), None) => assert_eq!(fields(&errs), vec!["active_employee"], "{value:?}"),
                (other, _) => panic!("unexpected result {other:?} for {value:?}"),
            }
        }
    }

    #[test]
    fn client_role_never_reaches_output() {
        for role in [None, Some(json!("admin")), Some(json!({"name": "root"})), Some(json!(null))] {
            let mut input = valid_input();
            input.employee_role = role;
            let out = validate(&input).unwrap();
            // NewEmployee has no role field; only the service assigns one.
            assert_eq!(out, validate(&valid_input()).unwrap());
        }
    }
}
