use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn created_operator_gets_derived_login_id_and_one_time_password() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ADMIN_OPERATORS,
            &json!({"name": "Ravi Kumar", "area": "Chennai", "post": "Reporter"}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    let login_id = res.data()["login_id"].as_str().unwrap();
    assert!(login_id.starts_with("ravikumche"));
    assert_eq!(res.data()["password"].as_str().unwrap().len(), 10);
    assert_eq!(res.data()["is_active"], true);

    // The password never shows up again.
    let fetched = app
        .get_with_token(&routes::admin_operator(res.id()), &admin)
        .await;
    assert!(fetched.data()["password"].is_null());

    let list = app.get_with_token(routes::ADMIN_OPERATORS, &admin).await;
    assert!(list.data()[0]["password"].is_null());
}

#[tokio::test]
async fn operator_profile_can_be_updated() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (id, login_id, _) = app.create_operator(&admin, "Mira Joshi").await;

    let res = app
        .put_with_token(
            &routes::admin_operator(id),
            &json!({"post": "Senior Reporter"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "update failed: {}", res.text);
    assert_eq!(res.data()["post"], "Senior Reporter");
    // The login id is fixed at creation.
    assert_eq!(res.data()["login_id"], login_id);
}

#[tokio::test]
async fn toggle_active_flips_both_ways() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (id, _, _) = app.create_operator(&admin, "Mira Joshi").await;

    let off = app
        .post_with_token(&routes::operator_toggle(id), &json!({}), &admin)
        .await;
    assert_eq!(off.data()["is_active"], false);

    let on = app
        .post_with_token(&routes::operator_toggle(id), &json!({}), &admin)
        .await;
    assert_eq!(on.data()["is_active"], true);
}

#[tokio::test]
async fn operator_with_news_cannot_be_deleted() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (id, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    app.create_news(&token, "Their story").await;

    let res = app
        .delete_with_token(&routes::admin_operator(id), &admin)
        .await;
    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn operator_without_news_can_be_deleted() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (id, _, _) = app.create_operator(&admin, "Mira Joshi").await;

    let res = app
        .delete_with_token(&routes::admin_operator(id), &admin)
        .await;
    assert_eq!(res.status, 200, "delete failed: {}", res.text);

    let gone = app.get_with_token(&routes::admin_operator(id), &admin).await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn missing_fields_yield_a_field_error_map() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let res = app
        .post_with_token(
            routes::ADMIN_OPERATORS,
            &json!({"name": "", "area": "", "post": ""}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 422);
    for field in ["name", "area", "post"] {
        assert!(res.body["errors"][field].is_string(), "missing {field}");
    }
}
