use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use civicast::entity::news_image;

use crate::common::{TestApp, png_bytes, routes};

#[tokio::test]
async fn batch_upload_collects_per_file_errors() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Photo essay").await;

    let res = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![
                ("images", "one.png", png_bytes(8, 8), "image/png"),
                ("images", "malware.php", b"<?php".to_vec(), "text/plain"),
                ("images", "two.jpg", png_bytes(8, 8), "image/jpeg"),
            ],
            vec![],
            &admin,
        )
        .await;

    assert_eq!(res.status, 201, "upload failed: {}", res.text);
    let attached = res.data()["attached"].as_array().unwrap();
    let errors = res.data()["errors"].as_array().unwrap();
    assert_eq!(attached.len(), 2);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].as_str().unwrap().contains("malware.php"));

    assert_eq!(attached[0]["display_order"], 0);
    assert_eq!(attached[1]["display_order"], 1);
}

#[tokio::test]
async fn display_order_continues_across_batches() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Photo essay").await;

    let first = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![("images", "a.png", png_bytes(8, 8), "image/png")],
            vec![],
            &admin,
        )
        .await;
    assert_eq!(first.status, 201);

    let second = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![("images", "b.png", png_bytes(8, 8), "image/png")],
            vec![],
            &admin,
        )
        .await;
    assert_eq!(second.data()["attached"][0]["display_order"], 1);
}

#[tokio::test]
async fn operator_cannot_attach_to_foreign_news() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let (_, login_id, password) = app.create_operator(&admin, "Mira Joshi").await;
    let token = app.operator_token(&login_id, &password).await;
    let id = app.create_news(&admin, "Not yours").await;

    let res = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![("images", "a.png", png_bytes(8, 8), "image/png")],
            vec![],
            &token,
        )
        .await;

    assert_eq!(res.status, 403);
}

#[tokio::test]
async fn detach_is_permanent_and_idempotent_at_the_file_level() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Photo essay").await;

    let upload = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![("images", "a.png", png_bytes(8, 8), "image/png")],
            vec![],
            &admin,
        )
        .await;
    let image_id = upload.data()["attached"][0]["id"].as_i64().unwrap();

    let res = app
        .delete_with_token(&routes::news_image(id, image_id), &admin)
        .await;
    assert_eq!(res.status, 200, "detach failed: {}", res.text);

    let again = app
        .delete_with_token(&routes::news_image(id, image_id), &admin)
        .await;
    assert_eq!(again.status, 404);

    let item = app.get_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(item.data()["images"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn deleting_news_cascades_to_image_rows() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Photo essay").await;

    let upload = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![
                ("images", "a.png", png_bytes(8, 8), "image/png"),
                ("images", "b.png", png_bytes(8, 8), "image/png"),
            ],
            vec![],
            &admin,
        )
        .await;
    assert_eq!(upload.data()["attached"].as_array().unwrap().len(), 2);

    let res = app.delete_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(res.status, 200, "delete failed: {}", res.text);

    let remaining = news_image::Entity::find()
        .filter(news_image::Column::NewsId.eq(id as i32))
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(remaining, 0);

    let gone = app.get_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(gone.status, 404);
}

#[tokio::test]
async fn deleting_news_removes_the_backing_files() {
    let app = TestApp::spawn().await;
    let admin = app.admin_token().await;
    let id = app.create_news(&admin, "Photo essay").await;

    let upload = app
        .multipart_with_token(
            &routes::news_images(id),
            vec![
                ("images", "a.png", png_bytes(8, 8), "image/png"),
                ("images", "b.png", png_bytes(8, 8), "image/png"),
            ],
            vec![],
            &admin,
        )
        .await;
    let paths: Vec<String> = upload.data()["attached"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["image_path"].as_str().unwrap().to_string())
        .collect();
    for path in &paths {
        assert!(app.upload_dir().join(path).exists(), "not stored: {path}");
    }

    let res = app.delete_with_token(&routes::admin_news(id), &admin).await;
    assert_eq!(res.status, 200, "delete failed: {}", res.text);

    for path in &paths {
        assert!(!app.upload_dir().join(path).exists(), "file survived: {path}");
    }
}
