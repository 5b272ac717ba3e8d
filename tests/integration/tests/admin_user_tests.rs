//! Admin account management: bootstrap, creation, password reset
//!
//! Run with: cargo test -p integration-tests --test admin_user_tests

use cms_common::{AppError, BootstrapConfig};
use cms_core::value_objects::AdminRole;
use cms_service::dto::CreateAdminUserRequest;
use cms_service::{BootstrapOutcome, ServiceError};
use integration_tests::{fixtures::*, TestContext};

fn create_request(username: &str, role: AdminRole) -> CreateAdminUserRequest {
    CreateAdminUserRequest {
        username: username.to_string(),
        password: STRONG_PASSWORD.to_string(),
        role,
    }
}

// ============================================================================
// Bootstrap
// ============================================================================

#[tokio::test]
async fn test_bootstrap_then_default_login() {
    let tc = TestContext::new().await.unwrap();

    let outcome = tc.admins().bootstrap().await.unwrap();
    assert!(outcome.was_created());
    assert_eq!(outcome.user().username, "admin");
    assert_eq!(outcome.user().role, AdminRole::Admin);

    assert!(tc.login("admin", "admin").await.is_ok());

    let err = tc.login("admin", "wrong").await.unwrap_err();
    assert!(matches!(err.as_app(), Some(AppError::InvalidCredentials)));
}

#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let tc = TestContext::new().await.unwrap();

    let created = tc.admins().bootstrap().await.unwrap();
    let again = tc.admins().bootstrap().await.unwrap();

    assert!(matches!(again, BootstrapOutcome::AlreadyPresent(_)));
    assert_eq!(again.user().id, created.user().id);
}

#[tokio::test]
async fn test_bootstrap_keeps_existing_password() {
    let tc = TestContext::new().await.unwrap();
    seed_user(&tc, "admin", STRONG_PASSWORD, AdminRole::Admin)
        .await
        .unwrap();

    let outcome = tc.admins().bootstrap().await.unwrap();
    assert!(!outcome.was_created());

    assert!(tc.login("admin", STRONG_PASSWORD).await.is_ok());
    assert!(tc.login("admin", "admin").await.is_err());
}

#[tokio::test]
async fn test_bootstrap_uses_configured_account() {
    let tc = TestContext::with_bootstrap(BootstrapConfig {
        username: "siteowner".to_string(),
        password: "initial1".to_string(),
    })
    .await
    .unwrap();

    let outcome = tc.admins().bootstrap().await.unwrap();
    assert_eq!(outcome.user().username, "siteowner");
    assert!(tc.login("siteowner", "initial1").await.is_ok());
}

// ============================================================================
// Account creation
// ============================================================================

#[tokio::test]
async fn test_admin_creates_editor() {
    let tc = TestContext::new().await.unwrap();
    let admin = tc.admins().bootstrap().await.unwrap();
    let actor = identity_of(admin.user());

    let created = tc
        .admins()
        .create_user(&actor, create_request("writer", AdminRole::Editor))
        .await
        .unwrap();
    assert_eq!(created.username, "writer");
    assert_eq!(created.role, AdminRole::Editor);
    assert!(created.last_login.is_none());

    let auth = tc.login("writer", STRONG_PASSWORD).await.unwrap();
    assert_eq!(auth.user.role, AdminRole::Editor);
}

#[tokio::test]
async fn test_editor_cannot_create_accounts() {
    let tc = TestContext::new().await.unwrap();
    let editor = seed_user(&tc, "writer", STRONG_PASSWORD, AdminRole::Editor)
        .await
        .unwrap();

    let err = tc
        .admins()
        .create_user(&identity_of(&editor), create_request("another", AdminRole::Editor))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::PermissionDenied { ref required } if required == "admin"));
    assert_eq!(err.status_code(), 403);
    assert!(!tc
        .ctx
        .admin_user_repo()
        .username_exists("another")
        .await
        .unwrap());
}

#[tokio::test]
async fn test_duplicate_username_conflicts() {
    let tc = TestContext::new().await.unwrap();
    let admin = tc.admins().bootstrap().await.unwrap();
    let actor = identity_of(admin.user());

    tc.admins()
        .create_user(&actor, create_request("writer", AdminRole::Editor))
        .await
        .unwrap();
    let err = tc
        .admins()
        .create_user(&actor, create_request("writer", AdminRole::Admin))
        .await
        .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));
    assert_eq!(err.status_code(), 409);
}

#[tokio::test]
async fn test_create_user_validates_input() {
    let tc = TestContext::new().await.unwrap();
    let admin = tc.admins().bootstrap().await.unwrap();
    let actor = identity_of(admin.user());

    let err = tc
        .admins()
        .create_user(&actor, create_request("ab", AdminRole::Editor))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let weak = CreateAdminUserRequest {
        password: "onlyletters".to_string(),
        ..create_request("writer", AdminRole::Editor)
    };
    let err = tc.admins().create_user(&actor, weak).await.unwrap_err();
    assert_eq!(err.status_code(), 400);
}

// ============================================================================
// Password reset
// ============================================================================

#[tokio::test]
async fn test_reset_password_revokes_sessions() {
    let tc = TestContext::new().await.unwrap();
    let auth = tc.bootstrap_and_login().await.unwrap();
    tc.login("admin", "admin").await.unwrap();

    let revoked = tc
        .admins()
        .reset_password("admin", STRONG_PASSWORD)
        .await
        .unwrap();
    assert_eq!(revoked, 2);
    assert!(tc.auth().list_sessions(auth.user.id).await.unwrap().is_empty());

    assert!(tc.login("admin", "admin").await.is_err());
    assert!(tc.login("admin", STRONG_PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_reset_password_rules() {
    let tc = TestContext::new().await.unwrap();
    tc.admins().bootstrap().await.unwrap();

    let err = tc.admins().reset_password("admin", "short1").await.unwrap_err();
    assert_eq!(err.status_code(), 400);

    let err = tc
        .admins()
        .reset_password("ghost", STRONG_PASSWORD)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound { .. }));
}
