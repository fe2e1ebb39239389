//! API Handlers
//!
//! HTTP request handlers for the admin API. Every data-layer call runs on the
//! blocking thread pool, since store transactions block.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use tracing::debug;

use crate::db::CachedDatabase;
use crate::error::{AppError, Result};
use crate::models::{
    Content, ContentRequest, ContentSummary, HealthResponse, MenuOverview, MenuRequest, Meta,
    MutationResponse, Project, ProjectRequest, ProjectSummary, Route, SiteResponse,
    StatsResponse, ThemeSummary, ThemesResponse, UpdateMetaRequest, UpdateThemeRequest,
    UpdateUserRequest, User,
};
use crate::slug::generate_slug;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: CachedDatabase,
}

impl AppState {
    /// Creates a new AppState around the data layer.
    pub fn new(db: CachedDatabase) -> Self {
        Self { db }
    }
}

/// Runs `f` against the data layer on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> Result<T>
where
    F: FnOnce(&CachedDatabase) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || f(&db))
        .await
        .map_err(|e| AppError::Internal(format!("Blocking task failed: {}", e)))?
}

fn validated(error: Option<String>) -> Result<()> {
    match error {
        Some(msg) => {
            debug!(reason = %msg, "Rejected request");
            Err(AppError::Validation(msg))
        }
        None => Ok(()),
    }
}

// == Site ==
/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /admin/site
pub async fn site_handler(State(state): State<AppState>) -> Result<Json<SiteResponse>> {
    let configuration = blocking(&state, |db| db.get_configuration()).await?;
    Ok(Json(SiteResponse {
        site: configuration.meta.site,
    }))
}

/// Handler for GET /admin/cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.db.cache().stats()))
}

// == User ==
/// Handler for GET /admin/user
pub async fn get_user_handler(State(state): State<AppState>) -> Result<Json<User>> {
    blocking(&state, |db| db.get_user()).await.map(Json)
}

/// Handler for PUT /admin/user/update
///
/// Replaces the profile fields; the join date is kept.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<MutationResponse>> {
    blocking(&state, move |db| {
        let mut user = db.get_user()?;
        req.apply_to(&mut user);
        db.put_user(&user)
    })
    .await?;

    Ok(Json(MutationResponse::saved("User")))
}

// == Meta ==
/// Handler for GET /admin/meta
pub async fn get_meta_handler(State(state): State<AppState>) -> Result<Json<Meta>> {
    let configuration = blocking(&state, |db| db.get_configuration()).await?;
    Ok(Json(configuration.meta))
}

/// Handler for PUT /admin/meta/update
pub async fn update_meta_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateMetaRequest>,
) -> Result<Json<MutationResponse>> {
    validated(req.validate())?;

    let meta = req.into_meta();
    blocking(&state, move |db| db.update_meta(meta)).await?;

    Ok(Json(MutationResponse::saved("Meta")))
}

// == Theme ==
/// Handler for GET /admin/theme
pub async fn get_themes_handler(State(state): State<AppState>) -> Result<Json<ThemesResponse>> {
    let (configuration, themes) = blocking(&state, |db| {
        Ok((db.get_configuration()?, db.get_themes()?))
    })
    .await?;

    let site = &configuration.meta.site;
    let themes = themes
        .iter()
        .map(|(path, theme)| ThemeSummary::new(path, theme, site))
        .collect();

    Ok(Json(ThemesResponse {
        selected: configuration.current_theme_path,
        themes,
    }))
}

/// Handler for PUT /admin/theme/update
pub async fn update_theme_handler(
    State(state): State<AppState>,
    Json(req): Json<UpdateThemeRequest>,
) -> Result<Json<MutationResponse>> {
    let path = req.path;
    let configuration = blocking(&state, move |db| db.set_theme(&path)).await?;

    Ok(Json(MutationResponse::updated(
        "Theme",
        configuration.current_theme_path,
    )))
}

// == Projects ==
/// Handler for GET /admin/projects
pub async fn list_projects_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectSummary>>> {
    let projects = blocking(&state, |db| db.get_projects()).await?;
    Ok(Json(projects.iter().map(ProjectSummary::from).collect()))
}

/// Handler for GET /admin/project/:slug
pub async fn get_project_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Project>> {
    blocking(&state, move |db| db.get_project(&slug))
        .await
        .map(Json)
}

/// Handler for POST /admin/project/create
///
/// The slug is derived from the title.
pub async fn create_project_handler(
    State(state): State<AppState>,
    Json(req): Json<ProjectRequest>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    validated(req.validate())?;

    let slug = generate_slug(&req.title)?;
    let project = req.into_project(slug.clone(), Utc::now());
    blocking(&state, move |db| db.create_project(&project)).await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Project", slug)),
    ))
}

/// Handler for PUT /admin/project/:slug/update
pub async fn update_project_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<ProjectRequest>,
) -> Result<Json<MutationResponse>> {
    validated(req.validate())?;

    let key = slug.clone();
    blocking(&state, move |db| {
        let mut project = db.get_project(&key)?;
        req.apply_to(&mut project);
        db.put_project(&project)
    })
    .await?;

    Ok(Json(MutationResponse::updated("Project", slug)))
}

/// Handler for DELETE /admin/project/:slug/delete
pub async fn delete_project_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MutationResponse>> {
    let key = slug.clone();
    blocking(&state, move |db| db.delete_project(&key)).await?;

    Ok(Json(MutationResponse::deleted("Project", slug)))
}

// == Content ==
/// Handler for GET /admin/contents
pub async fn list_contents_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentSummary>>> {
    let contents = blocking(&state, |db| db.get_contents()).await?;
    Ok(Json(contents.iter().map(ContentSummary::from).collect()))
}

/// Handler for GET /admin/content/:slug
pub async fn get_content_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Content>> {
    blocking(&state, move |db| db.get_content(&slug))
        .await
        .map(Json)
}

/// Handler for POST /admin/content/create
///
/// Also registers a route for the page so it can be added to the menu.
pub async fn create_content_handler(
    State(state): State<AppState>,
    Json(req): Json<ContentRequest>,
) -> Result<(StatusCode, Json<MutationResponse>)> {
    validated(req.validate())?;

    let slug = generate_slug(&req.title)?;
    let content = req.into_content(slug.clone(), Utc::now());
    blocking(&state, move |db| {
        db.create_content(&content)?;
        db.put_route(&Route::new(content.slug.as_str(), content.title.as_str()))
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MutationResponse::created("Content", slug)),
    ))
}

/// Handler for PUT /admin/content/:slug/update
pub async fn update_content_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(req): Json<ContentRequest>,
) -> Result<Json<MutationResponse>> {
    validated(req.validate())?;

    let key = slug.clone();
    blocking(&state, move |db| {
        let mut content = db.get_content(&key)?;
        req.apply_to(&mut content);
        db.put_content(&content)
    })
    .await?;

    Ok(Json(MutationResponse::updated("Content", slug)))
}

/// Handler for DELETE /admin/content/:slug/delete
///
/// The page's route and any menu entry for it are left in place.
pub async fn delete_content_handler(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<MutationResponse>> {
    let key = slug.clone();
    blocking(&state, move |db| db.delete_content(&key)).await?;

    Ok(Json(MutationResponse::deleted("Content", slug)))
}

// == Menu ==
/// Handler for GET /admin/menu
pub async fn get_menu_handler(State(state): State<AppState>) -> Result<Json<MenuOverview>> {
    let (menu, routes) =
        blocking(&state, |db| Ok((db.get_menu()?, db.get_routes()?))).await?;

    let routes = routes
        .into_keys()
        .filter(|slug| !menu.contains(slug))
        .collect();

    Ok(Json(MenuOverview {
        added: menu.slugs(),
        routes,
    }))
}

/// Handler for PUT /admin/menu/add
pub async fn add_menu_handler(
    State(state): State<AppState>,
    Json(req): Json<MenuRequest>,
) -> Result<Json<MutationResponse>> {
    validated(req.validate())?;

    let slug = req.slug;
    let key = slug.clone();
    blocking(&state, move |db| db.add_to_menu(&key)).await?;

    Ok(Json(MutationResponse::created("Menu entry", slug)))
}

/// Handler for PUT /admin/menu/remove
pub async fn remove_menu_handler(
    State(state): State<AppState>,
    Json(req): Json<MenuRequest>,
) -> Result<Json<MutationResponse>> {
    validated(req.validate())?;

    let slug = req.slug;
    let key = slug.clone();
    blocking(&state, move |db| db.remove_from_menu(&key)).await?;

    Ok(Json(MutationResponse::deleted("Menu entry", slug)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn state() -> AppState {
        AppState::new(testing::seeded())
    }

    fn project_request(title: &str) -> ProjectRequest {
        ProjectRequest {
            title: title.to_string(),
            ..ProjectRequest::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let state = state();

        let (status, Json(created)) =
            create_project_handler(State(state.clone()), Json(project_request("My Demo")))
                .await
                .unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.slug.as_deref(), Some("my-demo"));

        let Json(project) = get_project_handler(State(state), Path("my-demo".to_string()))
            .await
            .unwrap();
        assert_eq!(project.title, "My Demo");
    }

    #[tokio::test]
    async fn test_create_duplicate_project_conflicts() {
        let state = state();

        create_project_handler(State(state.clone()), Json(project_request("Demo")))
            .await
            .unwrap();
        let result =
            create_project_handler(State(state.clone()), Json(project_request("demo"))).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_create_project_requires_title() {
        let result = create_project_handler(State(state()), Json(project_request(""))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        let result = create_project_handler(State(state()), Json(project_request("???"))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_project_keeps_slug() {
        let state = state();
        create_project_handler(State(state.clone()), Json(project_request("Demo")))
            .await
            .unwrap();

        update_project_handler(
            State(state.clone()),
            Path("demo".to_string()),
            Json(project_request("A new title")),
        )
        .await
        .unwrap();

        let Json(list) = list_projects_handler(State(state)).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].slug, "demo");
        assert_eq!(list[0].title, "A new title");
    }

    #[tokio::test]
    async fn test_update_missing_project_is_not_found() {
        let result = update_project_handler(
            State(state()),
            Path("ghost".to_string()),
            Json(project_request("Ghost")),
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_content_registers_route() {
        let state = state();
        let req = ContentRequest {
            title: "About me".to_string(),
            ..ContentRequest::default()
        };

        create_content_handler(State(state.clone()), Json(req))
            .await
            .unwrap();

        let Json(overview) = get_menu_handler(State(state)).await.unwrap();
        assert_eq!(overview.added, vec!["home", "contact"]);
        assert_eq!(overview.routes, vec!["about-me", "notfound"]);
    }

    #[tokio::test]
    async fn test_menu_add_and_remove() {
        let state = state();

        add_menu_handler(
            State(state.clone()),
            Json(MenuRequest {
                slug: "notfound".to_string(),
            }),
        )
        .await
        .unwrap();
        remove_menu_handler(
            State(state.clone()),
            Json(MenuRequest {
                slug: "home".to_string(),
            }),
        )
        .await
        .unwrap();

        let Json(overview) = get_menu_handler(State(state)).await.unwrap();
        assert_eq!(overview.added, vec!["contact", "notfound"]);
        assert_eq!(overview.routes, vec!["home"]);
    }

    #[tokio::test]
    async fn test_themes_listing() {
        let Json(themes) = get_themes_handler(State(state())).await.unwrap();

        assert_eq!(themes.selected, "peaches");
        assert_eq!(themes.themes.len(), 2);
        assert_eq!(themes.themes[0].path, "peaches");
    }

    #[tokio::test]
    async fn test_update_meta_then_site() {
        let state = state();
        let req = UpdateMetaRequest {
            site: "https://example.com".to_string(),
            ..UpdateMetaRequest::default()
        };

        update_meta_handler(State(state.clone()), Json(req))
            .await
            .unwrap();

        let Json(site) = site_handler(State(state)).await.unwrap();
        assert_eq!(site.site, "https://example.com/");
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let state = state();
        get_user_handler(State(state.clone())).await.unwrap();
        get_user_handler(State(state.clone())).await.unwrap();

        let Json(stats) = stats_handler(State(state)).await;
        assert!(stats.hits >= 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler().await;
        assert_eq!(response.status, "healthy");
    }
}
