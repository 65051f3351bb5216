use crate::AppError;
use validator::Validate;

#[test]
fn test_app_error_status_codes() {
    assert_eq!(AppError::Unauthorized("test".into()).status_code(), 401);
    assert_eq!(AppError::Forbidden("test".into()).status_code(), 403);
    assert_eq!(AppError::NotFound("test".into()).status_code(), 404);
    assert_eq!(AppError::Validation("test".into()).status_code(), 400);
    assert_eq!(AppError::Conflict("test".into()).status_code(), 400);
    assert_eq!(AppError::Database("test".into()).status_code(), 500);
    assert_eq!(AppError::Internal("test".into()).status_code(), 500);
}

#[test]
fn test_app_error_error_codes() {
    assert_eq!(
        AppError::Unauthorized("test".into()).error_code(),
        "UNAUTHORIZED"
    );
    assert_eq!(AppError::Forbidden("test".into()).error_code(), "FORBIDDEN");
    assert_eq!(AppError::NotFound("test".into()).error_code(), "NOT_FOUND");
    assert_eq!(
        AppError::Validation("test".into()).error_code(),
        "VALIDATION_ERROR"
    );
    assert_eq!(AppError::Conflict("test".into()).error_code(), "CONFLICT");
    assert_eq!(
        AppError::Database("test".into()).error_code(),
        "DATABASE_ERROR"
    );
    assert_eq!(
        AppError::Internal("test".into()).error_code(),
        "INTERNAL_ERROR"
    );
}

#[test]
fn test_app_error_display() {
    assert_eq!(
        format!("{}", AppError::Unauthorized("msg".into())),
        "Authentication failed: msg"
    );
    assert_eq!(
        format!("{}", AppError::NotFound("msg".into())),
        "Not found: msg"
    );
    assert_eq!(
        format!("{}", AppError::Conflict("msg".into())),
        "Conflict: msg"
    );
    assert_eq!(AppError::Conflict("msg".into()).message(), "msg");
}

#[test]
fn test_server_errors_are_flagged() {
    assert!(AppError::Database("x".into()).is_server_error());
    assert!(AppError::Internal("x".into()).is_server_error());
    assert!(!AppError::Validation("x".into()).is_server_error());
}

#[derive(Validate)]
struct Probe {
    #[validate(email(message = "must be a valid email"))]
    email: String,
    #[validate(length(min = 6, message = "must have at least 6 characters"))]
    password: String,
}

#[test]
fn test_validation_errors_convert_to_validation() {
    let probe = Probe {
        email: "not-an-email".into(),
        password: "123".into(),
    };
    let err: AppError = probe.validate().unwrap_err().into();

    assert_eq!(err.status_code(), 400);
    assert_eq!(
        err.message(),
        "email must be a valid email, password must have at least 6 characters"
    );
}

#[test]
fn test_money_errors_are_validation_errors() {
    let err: AppError = crate::types::to_minor_units(rust_decimal_macros::dec!(1.005))
        .unwrap_err()
        .into();

    assert_eq!(err.error_code(), "VALIDATION_ERROR");
}
