use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post, put},
};
use tower_http::services::ServeDir;

use recipe_core::error::AppError;
use recipe_core::health::{healthz, readyz};
use recipe_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    ingredient::{delete_ingredient, list_ingredients, replace_ingredient, update_ingredient},
    recipe::{
        create_recipe, delete_recipe, get_recipe, list_recipes, replace_recipe, update_recipe,
        upload_recipe_image,
    },
    user::{create_token, create_user, get_me, replace_me, update_me},
};
use crate::state::AppState;

pub fn build_router(state: AppState, max_upload_bytes: usize) -> Router {
    let router = Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Users
        .route("/api/user/create/", post(create_user))
        .route("/api/user/token/", post(create_token))
        .route("/api/user/me/", get(get_me).put(replace_me).patch(update_me))
        // Recipes
        .route("/api/recipe/recipes/", get(list_recipes).post(create_recipe))
        .route(
            "/api/recipe/recipes/{id}/",
            get(get_recipe)
                .put(replace_recipe)
                .patch(update_recipe)
                .delete(delete_recipe),
        )
        .route(
            "/api/recipe/recipes/{id}/upload-image/",
            post(upload_recipe_image),
        )
        // Ingredients
        .route("/api/recipe/ingredients/", get(list_ingredients))
        .route(
            "/api/recipe/ingredients/{id}/",
            put(replace_ingredient)
                .patch(update_ingredient)
                .delete(delete_ingredient),
        );

    // Uploaded files
    let media_prefix = state.media_url.trim_end_matches('/');
    let router = if media_prefix.is_empty() {
        tracing::warn!("MEDIA_URL is the site root; uploads are not served");
        router
    } else {
        router.nest_service(media_prefix, ServeDir::new(&state.storage.root))
    };

    router
        .fallback(|| async { AppError::NotFound })
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(trace_layer())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
