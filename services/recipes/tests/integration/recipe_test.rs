use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{Value, json};

use recipe_service_schema::{ingredients, recipes};

use crate::helpers::{RECIPES_URL, auth, detail_url, ids, names, price, spawn_app};

// ── GET /api/recipe/recipes/ ─────────────────────────────────────────────────

#[tokio::test]
async fn should_require_auth_for_recipe_list() {
    let app = spawn_app().await;

    let response = app.server.get(RECIPES_URL).await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_list_recipes_newest_first() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let first = app.create_recipe(&user, json!({})).await;
    let second = app.create_recipe(&user, json!({"title": "Second"})).await;

    let (name, value) = auth(&user);
    let response = app.server.get(RECIPES_URL).add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(
        ids(&body),
        [second["id"].as_i64().unwrap(), first["id"].as_i64().unwrap()]
    );
    let item = &body[0];
    assert_eq!(item["title"], "Second");
    assert_eq!(item["time_minutes"], 22);
    assert_eq!(price(&item["price"]), Decimal::new(525, 2));
    assert_eq!(item["link"], "http://example.com/recipe.pdf");
    assert!(item.get("description").is_none());
    assert!(item.get("image").is_none());
}

#[tokio::test]
async fn should_limit_list_to_authenticated_user() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    app.create_recipe(&other, json!({})).await;
    let own = app.create_recipe(&user, json!({})).await;

    let (name, value) = auth(&user);
    let response = app.server.get(RECIPES_URL).add_header(name, value).await;

    response.assert_status_ok();
    assert_eq!(ids(&response.json::<Value>()), [own["id"].as_i64().unwrap()]);
}

#[tokio::test]
async fn should_filter_by_ingredient_ids() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let r1 = app
        .create_recipe(
            &user,
            json!({"title": "Thai Vegetable Curry", "ingredients": [{"name": "Tofu"}]}),
        )
        .await;
    let r2 = app
        .create_recipe(
            &user,
            json!({"title": "Aubergine with Tahini", "ingredients": [{"name": "Aubergine"}, {"name": "Tofu"}]}),
        )
        .await;
    let r3 = app
        .create_recipe(&user, json!({"title": "Fish and chips"}))
        .await;
    let tofu = r1["ingredients"][0]["id"].as_i64().unwrap();
    let aubergine = r2["ingredients"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["name"] == "Aubergine")
        .unwrap()["id"]
        .as_i64()
        .unwrap();

    let (name, value) = auth(&user);
    let response = app
        .server
        .get(RECIPES_URL)
        .add_query_param("ingredients", format!("{tofu},{aubergine}"))
        .add_header(name, value)
        .await;

    response.assert_status_ok();
    let listed = ids(&response.json::<Value>());
    // r2 matches both ids but is listed once.
    assert_eq!(
        listed,
        [r2["id"].as_i64().unwrap(), r1["id"].as_i64().unwrap()]
    );
    assert!(!listed.contains(&r3["id"].as_i64().unwrap()));
}

#[tokio::test]
async fn should_reject_non_numeric_ingredient_filter() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;

    let (name, value) = auth(&user);
    let response = app
        .server
        .get(RECIPES_URL)
        .add_query_param("ingredients", "1,abc")
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["kind"], "INVALID_FILTER");
}

// ── GET /api/recipe/recipes/{id}/ ────────────────────────────────────────────

#[tokio::test]
async fn should_get_recipe_detail() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Salt"}]}))
        .await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app.server.get(&detail_url(id)).add_header(name, value).await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["description"], "Sample description");
    assert_eq!(body["image"], Value::Null);
    assert_eq!(names(&body["ingredients"]), ["Salt"]);
}

#[tokio::test]
async fn should_hide_other_users_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app.create_recipe(&other, json!({})).await;
    let id = theirs["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app.server.get(&detail_url(id)).add_header(name, value).await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "RECIPE_NOT_FOUND");
}

// ── POST /api/recipe/recipes/ ────────────────────────────────────────────────

#[tokio::test]
async fn should_create_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;

    let body = app
        .create_recipe(
            &user,
            json!({"title": "Sample recipe", "time_minutes": 30, "price": "5.99"}),
        )
        .await;

    assert_eq!(body["title"], "Sample recipe");
    assert_eq!(body["time_minutes"], 30);
    assert_eq!(price(&body["price"]), Decimal::new(599, 2));
    let stored = recipes::Entity::find_by_id(body["id"].as_i64().unwrap() as i32)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.user_id, user.id);
    assert_eq!(stored.title, "Sample recipe");
}

#[tokio::test]
async fn should_reuse_existing_ingredients() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let first = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Lemon"}]}))
        .await;

    let second = app
        .create_recipe(
            &user,
            json!({"title": "Pongal", "ingredients": [{"name": "Lemon"}, {"name": "Breakfast"}]}),
        )
        .await;

    assert_eq!(names(&second["ingredients"]), ["Lemon", "Breakfast"]);
    assert_eq!(second["ingredients"][0]["id"], first["ingredients"][0]["id"]);
    let count = ingredients::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn should_reject_invalid_recipe_payload() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;

    let (name, value) = auth(&user);
    let response = app
        .server
        .post(RECIPES_URL)
        .add_header(name, value)
        .json(&json!({"title": "", "time_minutes": -1, "price": "1234.567"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let errors = &response.json::<Value>()["errors"];
    assert!(errors["title"].is_array());
    assert!(errors["time_minutes"].is_array());
    assert!(errors["price"].is_array());
}

// ── PUT / PATCH /api/recipe/recipes/{id}/ ────────────────────────────────────

#[tokio::test]
async fn should_partially_update_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app
        .create_recipe(&user, json!({"title": "Sample recipe title"}))
        .await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .patch(&detail_url(id))
        .add_header(name, value)
        .json(&json!({"title": "New recipe title"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "New recipe title");
    assert_eq!(body["link"], "http://example.com/recipe.pdf");
    assert_eq!(body["description"], "Sample description");
}

#[tokio::test]
async fn should_fully_update_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app.create_recipe(&user, json!({})).await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .put(&detail_url(id))
        .add_header(name, value)
        .json(&json!({
            "title": "New recipe title",
            "link": "https://example.com/new-recipe.pdf",
            "description": "New recipe description",
            "time_minutes": 10,
            "price": "2.50",
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["title"], "New recipe title");
    assert_eq!(body["link"], "https://example.com/new-recipe.pdf");
    assert_eq!(body["time_minutes"], 10);
    assert_eq!(price(&body["price"]), Decimal::new(250, 2));
}

#[tokio::test]
async fn should_require_fields_on_put() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app.create_recipe(&user, json!({})).await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .put(&detail_url(id))
        .add_header(name, value)
        .json(&json!({"title": "Only title"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let errors = &response.json::<Value>()["errors"];
    assert!(errors["time_minutes"].is_array());
    assert!(errors["price"].is_array());
}

#[tokio::test]
async fn should_replace_and_clear_ingredients() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Pepper"}]}))
        .await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let replaced = app
        .server
        .patch(&detail_url(id))
        .add_header(name.clone(), value.clone())
        .json(&json!({"ingredients": [{"name": "Limes"}]}))
        .await;
    replaced.assert_status_ok();
    assert_eq!(names(&replaced.json::<Value>()["ingredients"]), ["Limes"]);

    let cleared = app
        .server
        .patch(&detail_url(id))
        .add_header(name, value)
        .json(&json!({"ingredients": []}))
        .await;
    cleared.assert_status_ok();
    assert_eq!(cleared.json::<Value>()["ingredients"], json!([]));
    // Replaced ingredients stay in the user's ingredient list.
    let count = ingredients::Entity::find().count(&app.db).await.unwrap();
    assert_eq!(count, 2);
}

#[tokio::test]
async fn should_not_update_other_users_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app.create_recipe(&other, json!({})).await;
    let id = theirs["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .patch(&detail_url(id))
        .add_header(name, value)
        .json(&json!({"title": "Hijacked"}))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let stored = recipes::Entity::find_by_id(id)
        .one(&app.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Sample recipe title");
    assert_eq!(stored.user_id, other.id);
}

// ── DELETE /api/recipe/recipes/{id}/ ─────────────────────────────────────────

#[tokio::test]
async fn should_delete_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let created = app
        .create_recipe(&user, json!({"ingredients": [{"name": "Salt"}]}))
        .await;
    let id = created["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .delete(&detail_url(id))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NO_CONTENT);
    assert!(
        recipes::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn should_not_delete_other_users_recipe() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let other = app.create_user("other@example.com", "password123").await;
    let theirs = app.create_recipe(&other, json!({})).await;
    let id = theirs["id"].as_i64().unwrap() as i32;

    let (name, value) = auth(&user);
    let response = app
        .server
        .delete(&detail_url(id))
        .add_header(name, value)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert!(
        recipes::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .is_some()
    );
}

#[tokio::test]
async fn should_return_json_404_for_non_numeric_id() {
    let app = spawn_app().await;
    let user = app.create_user("user@example.com", "testpass123").await;
    let (name, value) = auth(&user);

    let recipe = app
        .server
        .get("/api/recipe/recipes/abc/")
        .add_header(name.clone(), value.clone())
        .await;
    recipe.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(recipe.json::<Value>()["kind"], "NOT_FOUND");

    let upload = app
        .server
        .post("/api/recipe/recipes/abc/upload-image/")
        .add_header(name.clone(), value.clone())
        .multipart(MultipartForm::new().add_text("title", "no image here"))
        .await;
    upload.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(upload.json::<Value>()["kind"], "NOT_FOUND");

    let ingredient = app
        .server
        .patch("/api/recipe/ingredients/abc/")
        .add_header(name, value)
        .json(&json!({"name": "Salt"}))
        .await;
    ingredient.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(ingredient.json::<Value>()["kind"], "NOT_FOUND");
}

#[tokio::test]
async fn should_return_json_404_for_unknown_route() {
    let app = spawn_app().await;

    let response = app.server.get("/api/unknown/").await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["kind"], "NOT_FOUND");
}
