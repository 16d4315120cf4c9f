use serde_json::json;

use crate::common::{TestApp, routes};

/// Submit `n` operator stories, which raises `n` pending notifications.
async fn submit_stories(app: &TestApp, admin: &str, n: usize) {
    let (_, login_id, password) = app.create_operator(admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    for i in 0..n {
        app.create_news(&token, &format!("Story {i}")).await;
    }
}

#[tokio::test]
async fn unread_filter_and_mark_read() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    submit_stories(&app, &admin, 2).await;

    let inbox = app.get_with_token(routes::ADMIN_NOTIFICATIONS, &admin).await;
    let items = inbox.data().as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert!(items.iter().all(|n| n["is_read"] == false));

    let first_id = items[0]["id"].as_i64().unwrap();
    let res = app
        .post_with_token(routes::MARK_READ, &json!({"id": first_id}), &admin)
        .await;
    assert_eq!(res.status, 200, "mark-read failed: {}", res.text);
    assert_eq!(res.data()["is_read"], true);

    let unread = app
        .get_with_token(
            &format!("{}?unread=true", routes::ADMIN_NOTIFICATIONS),
            &admin,
        )
        .await;
    assert_eq!(unread.data().as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn mark_all_read_reports_the_affected_count() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    submit_stories(&app, &admin, 3).await;

    let res = app
        .post_with_token(routes::MARK_ALL_READ, &json!({}), &admin)
        .await;
    assert_eq!(res.status, 200, "mark-all-read failed: {}", res.text);
    assert_eq!(res.data()["updated"], 3);

    // A second pass finds nothing left to flip.
    let res = app
        .post_with_token(routes::MARK_ALL_READ, &json!({}), &admin)
        .await;
    assert_eq!(res.data()["updated"], 0);
}

#[tokio::test]
async fn marking_an_unknown_notification_is_a_404() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let res = app
        .post_with_token(routes::MARK_READ, &json!({"id": 9999}), &admin)
        .await;
    assert_eq!(res.status, 404);
}

#[tokio::test]
async fn dashboard_reflects_the_workflow() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;

    let pending_id = app.create_news(&token, "Waiting").await;
    app.create_news(&token, "Also waiting").await;
    app.create_news(&admin, "Live").await;
    app.post_with_token(&routes::approve(pending_id), &json!({}), &admin)
        .await;

    let category_id = app.create_category(&admin, "Civic").await;
    app.create_sub_category(&admin, category_id, "Roads").await;

    let res = app.get_with_token(routes::ADMIN_DASHBOARD, &admin).await;
    assert_eq!(res.status, 200, "dashboard failed: {}", res.text);
    let stats = res.data();
    assert_eq!(stats["total_news"], 3);
    assert_eq!(stats["pending_news"], 1);
    assert_eq!(stats["approved_news"], 2);
    assert_eq!(stats["rejected_news"], 0);
    assert_eq!(stats["total_operators"], 1);
    assert_eq!(stats["active_operators"], 1);
    assert_eq!(stats["total_categories"], 1);
    assert_eq!(stats["total_sub_categories"], 1);
    // Two submissions raised notifications; approval raised one more,
    // all still unread.
    assert_eq!(stats["unread_notifications"], 3);
}
