use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn operator_created_news_is_pending_and_notifies() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (op_id, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;

    let res = app
        .post_with_token(
            routes::NEWS,
            &json!({"title": "Bridge closure on Main St", "content": "Details inside."}),
            &token,
        )
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.data()["status"], "pending");
    assert_eq!(res.data()["operator_id"], op_id);
    assert_eq!(res.data()["slug"], "bridge-closure-on-main-st");

    let inbox = app.get_with_token(routes::ADMIN_NOTIFICATIONS, &admin).await;
    let items = inbox.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["kind"], "news_pending");
    assert_eq!(items[0]["related_id"], res.id());
}

#[tokio::test]
async fn admin_created_news_is_approved_without_notification() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (op_id, _, _) = app.create_operator(&admin, "Mira Joshi").await;

    let res = app
        .post_with_token(
            routes::NEWS,
            &json!({"title": "Council vote results", "content": "Approved unanimously."}),
            &admin,
        )
        .await;

    assert_eq!(res.status, 201, "create failed: {}", res.text);
    assert_eq!(res.data()["status"], "approved");
    // Admin-authored items are attributed to the first active operator.
    assert_eq!(res.data()["operator_id"], op_id);

    let inbox = app.get_with_token(routes::ADMIN_NOTIFICATIONS, &admin).await;
    assert_eq!(inbox.data().as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn duplicate_titles_get_suffixed_slugs() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    let first = app
        .post_with_token(
            routes::NEWS,
            &json!({"title": "Weekly market report", "content": "a"}),
            &admin,
        )
        .await;
    let second = app
        .post_with_token(
            routes::NEWS,
            &json!({"title": "Weekly market report", "content": "b"}),
            &admin,
        )
        .await;

    assert_eq!(first.data()["slug"], "weekly-market-report");
    assert_eq!(second.data()["slug"], "weekly-market-report-1");
}

#[tokio::test]
async fn only_the_first_transition_wins() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    let id = app.create_news(&token, "Storm warning issued").await;

    let approve = app
        .post_with_token(&routes::approve(id), &json!({}), &admin)
        .await;
    assert_eq!(approve.status, 200, "approve failed: {}", approve.text);
    assert_eq!(approve.data()["status"], "approved");
    assert!(approve.data()["approved_at"].is_string());

    let reject = app
        .post_with_token(&routes::reject(id), &json!({}), &admin)
        .await;
    assert_eq!(reject.status, 409);
    assert_eq!(reject.body["code"], "CONFLICT");

    let current = app.get_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(current.data()["status"], "approved");
}

#[tokio::test]
async fn reject_records_the_reason_and_notifies() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    let id = app.create_news(&token, "Unverified rumor").await;

    let res = app
        .post_with_token(&routes::reject(id), &json!({"reason": "No sources"}), &admin)
        .await;
    assert_eq!(res.status, 200, "reject failed: {}", res.text);
    assert_eq!(res.data()["status"], "rejected");
    assert_eq!(res.data()["rejected_reason"], "No sources");

    let inbox = app
        .get_with_token(
            &format!("{}?unread=true", routes::ADMIN_NOTIFICATIONS),
            &admin,
        )
        .await;
    let items = inbox.data().as_array().unwrap();
    let rejected: Vec<_> = items
        .iter()
        .filter(|n| n["kind"] == "news_rejected")
        .collect();
    assert_eq!(rejected.len(), 1);
    assert!(rejected[0]["message"].as_str().unwrap().contains("No sources"));
}

#[tokio::test]
async fn approving_non_pending_news_conflicts() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;

    // Admin creations start approved.
    let id = app.create_news(&admin, "Already live").await;

    let res = app
        .post_with_token(&routes::approve(id), &json!({}), &admin)
        .await;
    assert_eq!(res.status, 409);
}

#[tokio::test]
async fn operator_cannot_edit_foreign_or_non_pending_news() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_a, pass_a) = app.create_operator(&admin, "Mira Joshi").await;
    let (_, login_b, pass_b) = app.create_operator(&admin, "Dev Patel").await;
    let token_a = app.operator_token(&login_a, &pass_a).await;
    let token_b = app.operator_token(&login_b, &pass_b).await;

    let id = app.create_news(&token_a, "Ward 4 water outage").await;

    let foreign = app
        .put_with_token(&routes::news(id), &json!({"content": "hijack"}), &token_b)
        .await;
    assert_eq!(foreign.status, 403);

    let approve = app
        .post_with_token(&routes::approve(id), &json!({}), &admin)
        .await;
    assert_eq!(approve.status, 200, "approve failed: {}", approve.text);

    let own_but_approved = app
        .put_with_token(&routes::news(id), &json!({"content": "edit"}), &token_a)
        .await;
    assert_eq!(own_but_approved.status, 403);
}

#[tokio::test]
async fn admin_can_edit_any_status_and_empty_updates_fail() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Typo in headline").await;

    let empty = app
        .put_with_token(&routes::news(id), &json!({}), &admin)
        .await;
    assert_eq!(empty.status, 400);

    let res = app
        .put_with_token(
            &routes::news(id),
            &json!({"title": "Fixed headline"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 200, "update failed: {}", res.text);
    assert_eq!(res.data()["title"], "Fixed headline");
    assert_eq!(res.data()["slug"], "fixed-headline");
}

#[tokio::test]
async fn public_surface_shows_only_approved_news() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;

    let pending_id = app.create_news(&token, "Pending story").await;
    let approved_id = app.create_news(&admin, "Published story").await;

    let list = app.get_without_token(routes::NEWS).await;
    let items = list.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], approved_id);

    let hidden = app.get_without_token(&routes::news(pending_id)).await;
    assert_eq!(hidden.status, 404);

    let visible = app.get_without_token(&routes::news(approved_id)).await;
    assert_eq!(visible.status, 200);
}

#[tokio::test]
async fn public_list_filters_by_sub_category() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let category_id = app.create_category(&admin, "Civic").await;
    let sub_id = app.create_sub_category(&admin, category_id, "Roads").await;

    let tagged = app
        .post_with_token(
            routes::NEWS,
            &json!({"title": "Pothole repairs", "content": "x", "sub_category_id": sub_id}),
            &admin,
        )
        .await;
    assert_eq!(tagged.status, 201, "create failed: {}", tagged.text);
    app.create_news(&admin, "Untagged story").await;

    let by_sub = app
        .get_without_token(&format!("{}?sub_category_id={sub_id}", routes::NEWS))
        .await;
    assert_eq!(by_sub.data().as_array().unwrap().len(), 1);

    let by_category = app
        .get_without_token(&format!("{}?category_id={category_id}", routes::NEWS))
        .await;
    assert_eq!(by_category.data().as_array().unwrap().len(), 1);
    assert_eq!(by_category.data()[0]["sub_category_name"], "Roads");
}

#[tokio::test]
async fn view_counter_increments() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Most read story").await;

    for expected in 1..=3 {
        let res = app.post_without_token(&routes::news_views(id), &json!({})).await;
        assert_eq!(res.status, 200, "views failed: {}", res.text);
        assert_eq!(res.data()["views"], expected);
    }
}

#[tokio::test]
async fn deleted_news_disappears() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Retracted story").await;

    let res = app.delete_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(res.status, 200, "delete failed: {}", res.text);

    let gone = app.get_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn operator_news_listing_is_scoped_to_the_caller() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_a, pass_a) = app.create_operator(&admin, "Mira Joshi").await;
    let (_, login_b, pass_b) = app.create_operator(&admin, "Dev Patel").await;
    let token_a = app.operator_token(&login_a, &pass_a).await;
    let token_b = app.operator_token(&login_b, &pass_b).await;

    app.create_news(&token_a, "Story A").await;
    app.create_news(&token_b, "Story B").await;

    let mine = app.get_with_token(routes::OPERATOR_NEWS, &token_a).await;
    let items = mine.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Story A");
}

#[tokio::test]
async fn admin_list_filters_by_status() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;

    app.create_news(&token, "Waiting one").await;
    app.create_news(&admin, "Live one").await;

    let pending = app
        .get_with_token(&format!("{}?status=pending", routes::ADMIN_NEWS), &admin)
        .await;
    let items = pending.data().as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Waiting one");
}

#[tokio::test]
async fn title_update_onto_a_taken_slug_is_a_409() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    app.create_news(&admin, "Harbor Works").await;
    let second = app.create_news(&admin, "Bridge Repairs").await;

    // Updates regenerate the slug without the collision probe, so the
    // clash surfaces from the unique index.
    let res = app
        .put_with_token(
            &routes::news(second),
            &json!({"title": "Harbor Works"}),
            &admin,
        )
        .await;
    assert_eq!(res.status, 409, "expected conflict: {}", res.text);
    assert_eq!(res.body["code"], "CONFLICT");

    // The item keeps its previous title and slug.
    let item = app.get_with_token(&routes::admin_news(second), &admin).await;
    assert_eq!(item.data()["title"], "Bridge Repairs");
    assert_eq!(item.data()["slug"], "bridge-repairs");
}
