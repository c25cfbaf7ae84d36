use axum::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use recipe_service_schema::{ingredients, recipe_ingredients};

use crate::helpers::{INGREDIENTS_URL, auth, detail_url, ingredient_url, names, spawn_app};

// ── GET /api/recipe/ingredients/ ─────────────────────────────────────────────

#[tokio::test]
async fn should_require_auth_for_ingredient_list() {
    let app = spawn_app().await;

    let response = app.server.get(INGREDIENTS_URL).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn should_list_ingredients_by_name_descending() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    app.create_recipe(
        &user,
        json!({"ingredients": [{"name": "Kale"}, {"name": "Vanilla"}, {"name": "Apple"}]}),
    )
    .await;

    let (name, value) = auth(&user);
    let response = app.server.get(INGREDIENTS_URL).add_header(name, value).await;

    response.assert_status_ok();
    assert_eq!(
        names(&response.json::<Value>()),
        ["Vanilla", "Kale", "Apple"]
    );
}

#[tokio::test]
async fn should_limit_ingredients_to_authenticated_user() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    app.create_recipe(&other, json!({"ingredients": [{"name": "Salt"}]}))
        .await;
    let own = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Pepper"}]}))
        .await;

    let (name, value) = auth(&user);
    let response = app.server.get(INGREDIENTS_URL).add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(names(&body), ["Pepper"]);
    assert_eq!(body[0]["id"], own["ingredients"][0]["id"]);
}

// ── PUT / PATCH /api/recipe/ingredients/{id}/ ────────────────────────────────

#[tokio::test]
async fn should_rename_ingredient() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Lettuce"}]}))
        .await;
    let id = recipe["ingredients"][0]["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .patch(&ingredient_url(id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"name": "Coriander"}))
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"id": id, "name": "Coriander"}));

    let detail = app
        .server
        .get(&detail_url(recipe["id"].as_i64().unwrap() as i32))
        .add_header(name, value)
        .await;
    assert_eq!(names(&detail.json::<Value>()["ingredients"]), ["Coriander"]);
}

#[tokio::test]
async fn should_require_name_on_put() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Lettuce"}]}))
        .await;
    let id = recipe["ingredients"][0]["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let missing = app
        .server
        .put(&ingredient_url(id))
        .add_header(name.clone(), value.clone())
        .json(&json!({}))
        .await;
    missing.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        missing.json::<Value>()["errors"]["name"][0],
        "This field is required."
    );

    let blank = app
        .server
        .put(&ingredient_url(id))
        .add_header(name, value)
        .json(&json!({"name": "  "}))
        .await;
    blank.assert_status(StatusCode::BAD_REQUEST);
    assert!(blank.json::<Value>()["errors"]["name"].is_array());
}

#[tokio::test]
async fn should_not_rename_other_users_ingredient() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app
        .create_recipe(&other, json!({"ingredients": [{"name": "Salt"}]}))
        .await;
    let id = theirs["ingredients"][0]["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .put(&ingredient_url(id))
        .add_header(name, value)
        .json(&json!({"name": "Sugar"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "INGREDIENT_NOT_FOUND");
    let stored = ingredients::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.name, "Salt");
}

// ── DELETE /api/recipe/ingredients/{id}/ ─────────────────────────────────────

#[tokio::test]
async fn should_delete_ingredient_and_unlink_recipes() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let recipe = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Lettuce"}]}))
        .await;
    let id = recipe["ingredients"][0]["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .delete(&ingredient_url(id))
        .add_header(name.clone(), value.clone())
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(
        ingredients::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .is_none()
    );
    let links = recipe_ingredients::Entity::find()
        .count(&app.db)
        .await
        .unwrap();
    assert_eq!(links, 0);

    let detail = app
        .server
        .get(&detail_url(recipe["id"].as_i64().unwrap() as i32))
        .add_header(name, value)
        .await;
    detail.assert_status_ok();
    assert_eq!(detail.json::<Value>()["ingredients"], json!([]));
}

#[tokio::test]
async fn should_not_delete_other_users_ingredient() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app
        .create_recipe(&other, json!({"ingredients": [{"name": "Salt"}]}))
        .await;
    let id = theirs["ingredients"][0]["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .delete(&ingredient_url(id))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let count = ingredients::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 1);
}
