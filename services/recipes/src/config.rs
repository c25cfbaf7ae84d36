use std::path::PathBuf;

/// Default token lifetime: 30 days.
const DEFAULT_TOKEN_TTL_SECS: u64 = 30 * 24 * 60 * 60;
/// Default upload limit: 10 MiB.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Recipe service configuration loaded from environment variables.
#[derive(Debug)]
pub struct RecipesConfig {
    /// Database connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for signing API tokens. Env var: `TOKEN_SECRET`.
    pub token_secret: String,
    /// Token lifetime in seconds (default 30 days). Env var: `TOKEN_TTL_SECS`.
    pub token_ttl_secs: u64,
    /// TCP port for the HTTP server (default 8000). Env var: `RECIPES_PORT`.
    pub recipes_port: u16,
    /// Directory holding uploaded files (default `./media`). Env var: `MEDIA_ROOT`.
    pub media_root: PathBuf,
    /// URL prefix under which uploads are served (default `/media/`). Env var: `MEDIA_URL`.
    pub media_url: String,
    /// Request body limit for uploads (default 10 MiB). Env var: `MAX_UPLOAD_BYTES`.
    pub max_upload_bytes: usize,
}

impl RecipesConfig {
    /// Panics if a required variable is missing.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            token_secret: std::env::var("TOKEN_SECRET").expect("TOKEN_SECRET"),
            token_ttl_secs: parsed_var("TOKEN_TTL_SECS").unwrap_or(DEFAULT_TOKEN_TTL_SECS),
            recipes_port: parsed_var("RECIPES_PORT").unwrap_or(8000),
            media_root: std::env::var("MEDIA_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./media")),
            media_url: normalize_media_url(
                &std::env::var("MEDIA_URL").unwrap_or_else(|_| "/media/".to_owned()),
            ),
            max_upload_bytes: parsed_var("MAX_UPLOAD_BYTES").unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        }
    }
}

fn parsed_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}

/// Ensure the media URL starts and ends with `/`.
pub fn normalize_media_url(url: &str) -> String {
    let trimmed = url.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else {
        format!("/{trimmed}/")
    }
}
