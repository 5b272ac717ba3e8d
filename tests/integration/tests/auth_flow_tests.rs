//! Token lifecycle tests: login, refresh rotation, revocation, access tokens
//!
//! Run with: cargo test -p integration-tests --test auth_flow_tests

use std::sync::Arc;
use std::time::Instant;

use chrono::Duration;
use cms_common::AppError;
use cms_core::value_objects::AdminRole;
use cms_service::dto::{RefreshTokenRequest, RevokeTokenRequest};
use cms_service::{AuthService, ServiceError};
use integration_tests::{fixtures::*, TestContext};
use tokio::sync::Barrier;

fn is_app(err: &ServiceError, expected: &AppError) -> bool {
    matches!(err.as_app(), Some(actual) if actual.error_code() == expected.error_code())
}

// ============================================================================
// Authentication
// ============================================================================

#[tokio::test]
async fn test_login_persists_live_refresh_token() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();

    assert_eq!(auth.tokens.token_type, "Bearer");
    assert_eq!(auth.tokens.expires_in, ACCESS_TOKEN_EXPIRY_SECS);
    assert_eq!(auth.tokens.refresh_token.len(), 43);
    assert_eq!(auth.user.username, "admin");
    assert_eq!(auth.user.role, AdminRole::Admin);

    let row = tc.token_row(&auth.tokens.refresh_token).await.unwrap().unwrap();
    assert!(!row.revoked);
    assert!(row.revoked_at.is_none());
    assert_eq!(row.expires_at, t0() + Duration::days(REFRESH_TOKEN_TTL_DAYS));
}

#[tokio::test]
async fn test_login_stamps_last_login() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();
    tc.clock.advance(Duration::minutes(5));

    let auth = tc.login("admin", "admin").await.unwrap();
    assert_eq!(auth.user.last_login, Some(t0() + Duration::minutes(5)));

    let stored = tc
        .ctx
        .admin_user_repo()
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.last_login, Some(t0() + Duration::minutes(5)));
}

#[tokio::test]
async fn test_wrong_password_and_unknown_user_look_the_same() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();

    let wrong = tc.login("admin", "wrong").await.unwrap_err();
    let unknown = tc.login("nobody", "admin").await.unwrap_err();

    assert!(is_app(&wrong, &AppError::InvalidCredentials));
    assert!(is_app(&unknown, &AppError::InvalidCredentials));
    assert_eq!(wrong.to_string(), unknown.to_string());
    assert_eq!(tc.token_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_user_pays_for_a_hash() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();

    let mut wrong = std::time::Duration::ZERO;
    let mut unknown = std::time::Duration::ZERO;
    for _ in 0..5 {
        let started = Instant::now();
        tc.login("admin", "wrong").await.unwrap_err();
        wrong += started.elapsed();

        let started = Instant::now();
        tc.login("nobody", "wrong").await.unwrap_err();
        unknown += started.elapsed();
    }

    // both paths run one Argon2 evaluation, so neither is an order of magnitude cheaper
    assert!(
        unknown * 4 >= wrong,
        "unknown user took {unknown:?}, wrong password took {wrong:?}"
    );
}

// ============================================================================
// Refresh
// ============================================================================

#[tokio::test]
async fn test_refresh_rotates_token() {
    let tc = TestContext::new().await.unwrap();
    let first = tc.bootstrap_and_login().await.unwrap();
    tc.clock.advance(Duration::minutes(10));

    let second = tc
        .auth()
        .refresh(RefreshTokenRequest::new(&first.tokens.refresh_token))
        .await
        .unwrap();

    assert_ne!(second.tokens.refresh_token, first.tokens.refresh_token);
    assert_eq!(
        second.tokens.refresh_expires_at,
        t0() + Duration::minutes(10) + Duration::days(REFRESH_TOKEN_TTL_DAYS)
    );

    let old = tc.token_row(&first.tokens.refresh_token).await.unwrap().unwrap();
    assert!(old.revoked);
    assert_eq!(old.revoked_at, Some(t0() + Duration::minutes(10)));

    let new = tc.token_row(&second.tokens.refresh_token).await.unwrap().unwrap();
    assert!(!new.revoked);

    let who = tc.auth().validate_access(&second.tokens.access_token).unwrap();
    assert_eq!(who.username, "admin");
}

#[tokio::test]
async fn test_refresh_is_single_use() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    let request = RefreshTokenRequest::new(&auth.tokens.refresh_token);

    tc.auth().refresh(request.clone()).await.unwrap();
    let err = tc.auth().refresh(request).await.unwrap_err();

    assert!(is_app(&err, &AppError::TokenRevoked));
    assert_eq!(tc.token_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_refresh_expired_token() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    let request = RefreshTokenRequest::new(&auth.tokens.refresh_token);

    tc.clock
        .set(t0() + Duration::days(REFRESH_TOKEN_TTL_DAYS) - Duration::seconds(1));
    let still_live = tc.auth().list_sessions(auth.user.id).await.unwrap();
    assert_eq!(still_live.len(), 1);

    tc.clock.set(t0() + Duration::days(REFRESH_TOKEN_TTL_DAYS));
    let err = tc.auth().refresh(request).await.unwrap_err();
    assert!(is_app(&err, &AppError::TokenExpired));

    // expiry does not revoke the row
    let row = tc.token_row(&auth.tokens.refresh_token).await.unwrap().unwrap();
    assert!(!row.revoked);
}

#[tokio::test]
async fn test_refresh_unknown_token() {
    let tc = TestContext::new().await.unwrap();
    tc.bootstrap_and_login().await.unwrap();

    let err = tc
        .auth()
        .refresh(RefreshTokenRequest::new("never-issued"))
        .await
        .unwrap_err();
    assert!(is_app(&err, &AppError::TokenNotFound));

    let err = tc
        .auth()
        .refresh(RefreshTokenRequest::new(""))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_refresh_has_one_winner() {
    const CALLERS: usize = 8;
    const ROUNDS: usize = 10;

    let tc = TestContext::on_disk(CALLERS as u32).await.unwrap();
    tc.admins().bootstrap().await.unwrap();

    for round in 0..ROUNDS {
        let auth = tc.login("admin", "admin").await.unwrap();
        let start = Arc::new(Barrier::new(CALLERS));

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let ctx = tc.ctx.clone();
                let start = start.clone();
                let request = RefreshTokenRequest::new(&auth.tokens.refresh_token);
                tokio::spawn(async move {
                    start.wait().await;
                    AuthService::new(&ctx).refresh(request).await
                })
            })
            .collect();

        let mut winners = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => winners += 1,
                Err(err) => assert!(
                    is_app(&err, &AppError::TokenRevoked),
                    "round {round}: unexpected error {err}"
                ),
            }
        }
        assert_eq!(winners, 1, "round {round}");
    }

    // every round leaves the login token plus exactly one replacement
    assert_eq!(tc.token_count().await.unwrap(), (2 * ROUNDS) as i64);
}

// ============================================================================
// Revoke
// ============================================================================

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    let request = RevokeTokenRequest::new(&auth.tokens.refresh_token);

    tc.clock.advance(Duration::minutes(1));
    tc.auth().revoke(request.clone()).await.unwrap();
    let first = tc.token_row(&auth.tokens.refresh_token).await.unwrap().unwrap();
    assert!(first.revoked);
    assert_eq!(first.revoked_at, Some(t0() + Duration::minutes(1)));

    tc.clock.advance(Duration::hours(1));
    tc.auth().revoke(request).await.unwrap();
    let second = tc.token_row(&auth.tokens.refresh_token).await.unwrap().unwrap();
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_revoked_token_cannot_refresh() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();

    tc.auth()
        .revoke(RevokeTokenRequest::new(&auth.tokens.refresh_token))
        .await
        .unwrap();

    let err = tc
        .auth()
        .refresh(RefreshTokenRequest::new(&auth.tokens.refresh_token))
        .await
        .unwrap_err();
    assert!(is_app(&err, &AppError::TokenRevoked));
}

#[tokio::test]
async fn test_revoke_unknown_token() {
    let tc = TestContext::new().await.unwrap();

    let err = tc
        .auth()
        .revoke(RevokeTokenRequest::new("never-issued"))
        .await
        .unwrap_err();
    assert!(is_app(&err, &AppError::TokenNotFound));
}

// ============================================================================
// Access tokens
// ============================================================================

#[tokio::test]
async fn test_access_token_expires_on_injected_clock() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    let token = auth.tokens.access_token;

    tc.clock
        .advance(Duration::seconds(ACCESS_TOKEN_EXPIRY_SECS - 1));
    assert!(tc.auth().validate_access(&token).is_ok());

    tc.clock.advance(Duration::seconds(1));
    let err = tc.auth().validate_access(&token).unwrap_err();
    assert!(is_app(&err, &AppError::TokenExpired));
}

#[tokio::test]
async fn test_tampered_access_token_rejected() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    let token = auth.tokens.access_token;

    let signature_start = token.rfind('.').unwrap() + 1;
    let mut bytes = token.into_bytes();
    let target = signature_start + 5;
    bytes[target] = if bytes[target] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(bytes).unwrap();

    let err = tc.auth().validate_access(&tampered).unwrap_err();
    assert!(is_app(&err, &AppError::InvalidToken));

    let err = tc.auth().validate_access("not-a-jwt").unwrap_err();
    assert!(is_app(&err, &AppError::InvalidToken));
}

#[tokio::test]
async fn test_current_user_from_access_token() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();

    let me = tc.auth().current_user(&auth.tokens.access_token).await.unwrap();
    assert_eq!(me.id, auth.user.id);
    assert_eq!(me.username, "admin");
    assert_eq!(me.role, AdminRole::Admin);
}
