//! Session management: listing, log-out-everywhere, revoking by id
//!
//! Run with: cargo test -p integration-tests --test session_tests

use chrono::Duration;
use cms_common::AppError;
use cms_core::value_objects::{AdminRole, RefreshTokenId, MAX_DEVICE_INFO_LEN};
use cms_service::dto::{LoginRequest, RefreshTokenRequest};
use cms_service::ServiceError;
use integration_tests::{fixtures::*, TestContext};

#[tokio::test]
async fn test_list_sessions_shows_only_active() {
    let tc = TestContext::new().await.unwrap();
    let user = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();

    let first = tc.login("writer", STRONG_PASSWORD).await.unwrap();
    tc.clock.advance(Duration::days(1));
    let second = tc.login("writer", STRONG_PASSWORD).await.unwrap();
    tc.clock.advance(Duration::hours(1));
    let third = tc.login("writer", STRONG_PASSWORD).await.unwrap();

    // rotate the third: its row is revoked, the replacement is live
    tc.auth()
        .refresh(RefreshTokenRequest::new(&third.tokens.refresh_token))
        .await
        .unwrap();

    let sessions = tc.auth().list_sessions(user.id).await.unwrap();
    assert_eq!(sessions.len(), 3);
    assert!(sessions.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    // the first login expires one day before the second
    tc.clock
        .set(t0() + Duration::days(REFRESH_TOKEN_TTL_DAYS));
    let sessions = tc.auth().list_sessions(user.id).await.unwrap();
    assert_eq!(sessions.len(), 2);
    assert!(sessions.iter().all(|s| s.expires_at > tc.ctx.now()));

    let first_row = tc.token_row(&first.tokens.refresh_token).await.unwrap().unwrap();
    assert!(!first_row.revoked);
    assert!(tc.token_row(&second.tokens.refresh_token).await.unwrap().is_some());
}

#[tokio::test]
async fn test_sessions_show_client_metadata() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();

    let long_agent = format!("Mozilla/5.0 {}", "x".repeat(MAX_DEVICE_INFO_LEN));
    let login = tc
        .auth()
        .authenticate(
            LoginRequest::new("admin", "admin").with_client(&long_agent, "198.51.100.2"),
        )
        .await
        .unwrap();

    let sessions = tc.auth().list_sessions(login.user.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    let device = sessions[0].device_info.as_deref().unwrap();
    assert_eq!(device.chars().count(), MAX_DEVICE_INFO_LEN);
    assert!(long_agent.starts_with(device));
    assert_eq!(sessions[0].ip_address.as_deref(), Some("198.51.100.2"));

    // the replacement records whoever refreshed
    tc.clock.advance(Duration::minutes(1));
    tc.auth()
        .refresh(
            RefreshTokenRequest::new(&login.tokens.refresh_token)
                .with_client("curl/8.5", "203.0.113.40"),
        )
        .await
        .unwrap();

    let sessions = tc.auth().list_sessions(login.user.id).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].device_info.as_deref(), Some("curl/8.5"));
    assert_eq!(sessions[0].ip_address.as_deref(), Some("203.0.113.40"));

    // no metadata, no guesses
    tc.clock.advance(Duration::minutes(1));
    let bare = tc.login("admin", "admin").await.unwrap();
    let sessions = tc.auth().list_sessions(bare.user.id).await.unwrap();
    assert!(sessions[0].device_info.is_none());
    assert!(sessions[0].ip_address.is_none());
}

#[tokio::test]
async fn test_refresh_tokens_stored_as_digests() {
    let tc = TestContext::new().await.unwrap();
    let first = tc.bootstrap_and_login().await.unwrap();
    let second = tc
        .auth()
        .refresh(RefreshTokenRequest::new(&first.tokens.refresh_token))
        .await
        .unwrap();

    let stored = tc.stored_token_hashes().await.unwrap();
    assert_eq!(stored.len(), 2);
    for plain in [&first.tokens.refresh_token, &second.tokens.refresh_token] {
        assert!(!stored.contains(plain));
        assert!(stored.contains(&cms_common::hash_refresh_token(plain)));
    }

    // a stored digest is not itself a usable token
    let err = tc
        .auth()
        .refresh(RefreshTokenRequest::new(&stored[0]))
        .await
        .unwrap_err();
    assert!(matches!(err.as_app(), Some(AppError::TokenNotFound)));
}

#[tokio::test]
async fn test_revoke_all_logs_out_everywhere() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    tc.login("admin", "admin").await.unwrap();
    tc.login("admin", "admin").await.unwrap();

    let other = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();
    tc.login("writer", STRONG_PASSWORD).await.unwrap();

    assert_eq!(tc.auth().revoke_all(auth.user.id).await.unwrap(), 3);
    assert!(tc.auth().list_sessions(auth.user.id).await.unwrap().is_empty());
    assert_eq!(tc.auth().revoke_all(auth.user.id).await.unwrap(), 0);

    // other accounts are untouched
    assert_eq!(tc.auth().list_sessions(other.id).await.unwrap().len(), 1);

    let err = tc
        .auth()
        .refresh(RefreshTokenRequest::new(&auth.tokens.refresh_token))
        .await
        .unwrap_err();
    assert!(matches!(err.as_app(), Some(AppError::TokenRevoked)));
}

#[tokio::test]
async fn test_owner_can_revoke_own_session() {
    let tc = TestContext::new().await.unwrap();
    let user = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();
    tc.login("writer", STRONG_PASSWORD).await.unwrap();

    let session = tc.auth().list_sessions(user.id).await.unwrap()[0].clone();
    tc.auth()
        .revoke_session(&identity_of(&user), session.id)
        .await
        .unwrap();

    assert!(tc.auth().list_sessions(user.id).await.unwrap().is_empty());

    // second revoke is a no-op
    tc.auth()
        .revoke_session(&identity_of(&user), session.id)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_editor_cannot_revoke_foreign_session() {
    let tc = TestContext::new().await.unwrap();
    let admin = tc.bootstrap_and_login().await.unwrap();
    let editor = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();

    let admin_session = tc.auth().list_sessions(admin.user.id).await.unwrap()[0].clone();
    let err = tc
        .auth()
        .revoke_session(&identity_of(&editor), admin_session.id)
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::PermissionDenied { ref required } if required == "admin"));
    assert_eq!(err.status_code(), 403);
    assert_eq!(err.error_code(), "INSUFFICIENT_PERMISSIONS");
    assert_eq!(tc.auth().list_sessions(admin.user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_admin_can_revoke_any_session() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();
    let admin = tc
        .ctx
        .admin_user_repo()
        .find_by_username("admin")
        .await
        .unwrap()
        .unwrap();

    let editor = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();
    tc.login("writer", STRONG_PASSWORD).await.unwrap();
    let session = tc.auth().list_sessions(editor.id).await.unwrap()[0].clone();

    tc.auth()
        .revoke_session(&identity_of(&admin), session.id)
        .await
        .unwrap();
    assert!(tc.auth().list_sessions(editor.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_revoke_unknown_session() {
    let tc = TestContext::new().await.unwrap();
    let user = seed_user(&tc, &unique_username(), STRONG_PASSWORD, AdminRole::Admin)
        .await
        .unwrap();

    let err = tc
        .auth()
        .revoke_session(&identity_of(&user), RefreshTokenId::new(9999))
        .await
        .unwrap_err();
    assert!(matches!(err.as_app(), Some(AppError::TokenNotFound)));
}
