//! API Routes
//!
//! Configures the Axum router with all admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let admin = Router::new()
        .route("/site", get(site_handler))
        .route("/cache/stats", get(stats_handler))
        .route("/user", get(get_user_handler))
        .route("/user/update", put(update_user_handler))
        .route("/meta", get(get_meta_handler))
        .route("/meta/update", put(update_meta_handler))
        .route("/theme", get(get_themes_handler))
        .route("/theme/update", put(update_theme_handler))
        .route("/projects", get(list_projects_handler))
        .route("/project/create", post(create_project_handler))
        .route("/project/:slug", get(get_project_handler))
        .route("/project/:slug/update", put(update_project_handler))
        .route("/project/:slug/delete", delete(delete_project_handler))
        .route("/contents", get(list_contents_handler))
        .route("/content/create", post(create_content_handler))
        .route("/content/:slug", get(get_content_handler))
        .route("/content/:slug/update", put(update_content_handler))
        .route("/content/:slug/delete", delete(delete_content_handler))
        .route("/menu", get(get_menu_handler))
        .route("/menu/add", put(add_menu_handler))
        .route("/menu/remove", put(remove_menu_handler));

    Router::new()
        .route("/health", get(health_handler))
        .nest("/admin", admin)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
