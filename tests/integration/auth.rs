use serde_json::json;

use crate::common::{ADMIN_IDENTIFIER, ADMIN_PASSWORD, TestApp, routes};

#[tokio::test]
async fn admin_can_log_in_with_username_or_email() {
    let app = TestApp::spawn().await;

    for identifier in [ADMIN_IDENTIFIER, "admin@civicast.local"] {
        let res = app
            .post_without_token(
                routes::LOGIN,
                &json!({"role": "admin", "identifier": identifier, "password": ADMIN_PASSWORD}),
            )
            .await;
        assert_eq!(res.status, 200, "Login as {identifier} failed: {}", res.text);
        assert_eq!(res.body["success"], true);
        assert_eq!(res.data()["user"]["role"], "admin");
        assert!(res.data()["token"].is_string());
    }
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"role": "admin", "identifier": ADMIN_IDENTIFIER, "password": "nope"}),
        )
        .await;

    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "INVALID_CREDENTIALS");
}

#[tokio::test]
async fn operator_can_log_in_with_generated_credentials() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn deactivated_operator_cannot_log_in() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let (id, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let res = app
        .post_with_token(&routes::operator_toggle(id), &json!({}), &admin)
        .await;
    assert_eq!(res.status, 200, "toggle failed: {}", res.text);

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"role": "operator", "identifier": login_id, "password": password}),
        )
        .await;

    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn unknown_role_fails_validation() {
    let app = TestApp::spawn().await;

    let res = app
        .post_without_token(
            routes::LOGIN,
            &json!({"role": "root", "identifier": "x", "password": "y"}),
        )
        .await;

    assert_eq!(res.status, 422);
    assert!(res.body["errors"]["role"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::ADMIN_DASHBOARD).await;
    assert_eq!(res.status, 401);
    assert_eq!(res.body["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn operator_token_cannot_reach_admin_routes() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;

    let res = app.get_with_token(routes::ADMIN_DASHBOARD, &token).await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "PERMISSION_DENIED");
}
