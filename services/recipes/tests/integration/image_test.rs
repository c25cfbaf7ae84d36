use std::path::PathBuf;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use serde_json::{Value, json};

use recipe_testing::fixture::{sample_jpeg, sample_png};

use crate::helpers::{TestApp, auth, detail_url, image_upload_url, spawn_app};

fn image_form(bytes: Vec<u8>, file_name: &str, mime: &str) -> MultipartForm {
    MultipartForm::new().add_part(
        "image",
        Part::bytes(bytes).file_name(file_name).mime_type(mime),
    )
}

/// Location on disk of a file served under `/media/`.
fn media_file(app: &TestApp, url: &str) -> PathBuf {
    app.media
        .path()
        .join(url.strip_prefix("/media/").unwrap())
}

fn uploaded_files(app: &TestApp) -> usize {
    std::fs::read_dir(app.media.path().join("uploads/recipe"))
        .map(|dir| dir.count())
        .unwrap_or(0)
}

// ── POST /api/recipe/recipes/{id}/upload-image/ ──────────────────────────────

#[tokio::test]
async fn should_upload_image_to_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name.clone(), value.clone())
        .multipart(image_form(sample_jpeg(), "photo.jpg", "image/jpeg"))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["id"], id);
    let url = body["image"].as_str().unwrap().to_owned();
    assert!(url.starts_with("/media/uploads/recipe/"));
    assert!(url.ends_with(".jpg"));
    assert!(media_file(&app, &url).exists());

    let detail = app
        .server
        .get(&detail_url(id))
        .add_header(name, value)
        .await;
    assert_eq!(detail.json::<Value>()["image"], url.as_str());
}

#[tokio::test]
async fn should_serve_uploaded_image() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;
    let bytes = sample_jpeg();

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(image_form(bytes.clone(), "photo.jpg", "image/jpeg"))
        .await;
    let url = response.json::<Value>()["image"]
        .as_str()
        .unwrap()
        .to_owned();

    let served = app.server.get(&url).await;

    served.assert_status_ok();
    assert_eq!(served.as_bytes().as_ref(), bytes.as_slice());
}

#[tokio::test]
async fn should_reject_non_image_upload() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(image_form(
            b"notanimage".to_vec(),
            "photo.jpg",
            "image/jpeg",
        ))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["errors"]["image"].is_array());
    assert_eq!(uploaded_files(&app), 0);
}

#[tokio::test]
async fn should_require_image_field() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(MultipartForm::new().add_text("title", "no image here"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["image"][0],
        "No file was submitted."
    );
}

#[tokio::test]
async fn should_reject_non_image_extension() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name.clone(), value.clone())
        .multipart(image_form(sample_jpeg(), "evil.html", "text/html"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let errors = &response.json::<Value>()["errors"];
    assert!(errors["image"][0].as_str().unwrap().contains("\"html\""));
    assert_eq!(uploaded_files(&app), 0);

    let detail = app
        .server
        .get(&detail_url(id))
        .add_header(name, value)
        .await;
    assert_eq!(detail.json::<Value>()["image"], Value::Null);
}

#[tokio::test]
async fn should_reject_overlong_filename() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;
    let file_name = format!("a.{}", "j".repeat(240));

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(image_form(sample_jpeg(), &file_name, "image/jpeg"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["errors"]["image"][0],
        "Ensure this filename has at most 100 characters (it has 242)."
    );
    assert_eq!(uploaded_files(&app), 0);
}

#[tokio::test]
async fn should_check_ownership_before_missing_image() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app.create_recipe(&other, json!({})).await;
    let id = theirs["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(MultipartForm::new().add_text("title", "no image here"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "RECIPE_NOT_FOUND");
}

#[tokio::test]
async fn should_replace_previous_image_file() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let first = app
        .server
        .post(&image_upload_url(id))
        .add_header(name.clone(), value.clone())
        .multipart(image_form(sample_jpeg(), "first.jpg", "image/jpeg"))
        .await;
    let first_url = first.json::<Value>()["image"]
        .as_str()
        .unwrap()
        .to_owned();

    let second = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(image_form(sample_png(), "second.png", "image/png"))
        .await;

    second.assert_status_ok();
    let second_url = second.json::<Value>()["image"]
        .as_str()
        .unwrap()
        .to_owned();
    assert_ne!(first_url, second_url);
    assert!(!media_file(&app, &first_url).exists());
    assert!(media_file(&app, &second_url).exists());
    assert_eq!(uploaded_files(&app), 1);
}

#[tokio::test]
async fn should_not_upload_to_other_users_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app.create_recipe(&other, json!({})).await;
    let id = theirs["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(&image_upload_url(id))
        .add_header(name, value)
        .multipart(image_form(sample_jpeg(), "photo.jpg", "image/jpeg"))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(uploaded_files(&app), 0);
}

#[tokio::test]
async fn should_remove_image_when_recipe_deleted() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app.create_recipe(&user, json!({})).await;
    let id = recipe["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let upload = app
        .server
        .post(&image_upload_url(id))
        .add_header(name.clone(), value.clone())
        .multipart(image_form(sample_jpeg(), "photo.jpg", "image/jpeg"))
        .await;
    let url = upload.json::<Value>()["image"]
        .as_str()
        .unwrap()
        .to_owned();

    let response = app
        .server
        .delete(&detail_url(id))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(!media_file(&app, &url).exists());
}
