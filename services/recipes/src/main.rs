use sea_orm::Database;
use tracing::info;

use recipe_auth_types::identity::TokenSecret;
use recipe_core::tracing::init_tracing;

use recipe_service::config::RecipesConfig;
use recipe_service::infra::storage::FsImageStorage;
use recipe_service::router::build_router;
use recipe_service::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = RecipesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .expect("failed to create MEDIA_ROOT");

    let state = AppState {
        db,
        storage: FsImageStorage::new(&config.media_root),
        token_secret: TokenSecret::new(config.token_secret.as_str()),
        token_ttl_secs: config.token_ttl_secs,
        media_url: config.media_url.clone(),
    };

    let router = build_router(state, config.max_upload_bytes);
    let http_addr = format!("0.0.0.0:{}", config.recipes_port);
    let listener = tokio::net::TcpListener::bind(&http_addr)
        .await
        .expect("failed to bind");
    info!(
        media_root = %config.media_root.display(),
        "recipes HTTP server listening on {http_addr}"
    );
    axum::serve(listener, router).await.expect("server error");
}
