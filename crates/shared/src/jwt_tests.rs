//! Unit tests for JWT functionality.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use crate::{AppError, Claims, JwtConfig, JwtError, JwtService, UserRole};

fn create_test_service() -> JwtService {
    JwtService::new(JwtConfig {
        secret: "test-secret-key-for-testing".to_string(),
        expires_days: 7,
    })
}

#[test]
fn test_generate_and_validate_token() {
    let service = create_test_service();
    let user_id = Uuid::new_v4();

    let token = service
        .generate_token(user_id, "ana@example.com", UserRole::Admin)
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.user_id(), user_id);
    assert_eq!(claims.email, "ana@example.com");
    assert_eq!(claims.role, UserRole::Admin);
    assert!(claims.is_admin());
}

#[test]
fn test_token_expires_after_seven_days() {
    let service = create_test_service();
    let token = service
        .generate_token(Uuid::new_v4(), "a@b.com", UserRole::User)
        .unwrap();
    let claims = service.validate_token(&token).unwrap();

    assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    assert_eq!(service.expires_days(), 7);
}

#[test]
fn test_invalid_token() {
    let service = create_test_service();
    let result = service.validate_token("invalid.token.here");
    assert!(matches!(result, Err(JwtError::DecodingError(_))));
}

#[test]
fn test_wrong_secret_is_rejected() {
    let service = create_test_service();
    let other = JwtService::new(JwtConfig {
        secret: "different-secret".into(),
        expires_days: 7,
    });

    let token = service
        .generate_token(Uuid::new_v4(), "a@b.com", UserRole::User)
        .unwrap();

    assert!(matches!(
        other.validate_token(&token),
        Err(JwtError::DecodingError(_))
    ));
}

#[test]
fn test_expired_token() {
    let service = create_test_service();
    let expired = Claims::new(
        Uuid::new_v4(),
        "a@b.com",
        UserRole::User,
        Utc::now() - Duration::days(1),
    );
    let token = encode(
        &Header::default(),
        &expired,
        &EncodingKey::from_secret(b"test-secret-key-for-testing"),
    )
    .unwrap();

    assert!(matches!(
        service.validate_token(&token),
        Err(JwtError::Expired)
    ));
}

#[test]
fn test_role_round_trips_through_strings() {
    assert_eq!("ADMIN".parse::<UserRole>().unwrap(), UserRole::Admin);
    assert_eq!("user".parse::<UserRole>().unwrap(), UserRole::User);
    assert!("owner".parse::<UserRole>().is_err());
    assert_eq!(UserRole::Admin.to_string(), "admin");
}

#[test]
fn test_debug_hides_secret() {
    let rendered = format!("{:?}", create_test_service());
    assert!(!rendered.contains("test-secret-key-for-testing"));
}

#[test]
fn test_jwt_errors_map_to_status() {
    assert_eq!(AppError::from(JwtError::Expired).status_code(), 401);
    assert_eq!(
        AppError::from(JwtError::DecodingError("bad".into())).status_code(),
        401
    );
    assert_eq!(
        AppError::from(JwtError::EncodingError("bad".into())).status_code(),
        500
    );
}
