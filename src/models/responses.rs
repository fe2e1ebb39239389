//! Response DTOs for the admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use super::{Content, Project, Theme};
use crate::cache::CacheStats;

/// Listing entry for GET /admin/projects
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    /// Absolute path of the cover image, empty when there is none
    pub image: String,
}

impl From<&Project> for ProjectSummary {
    fn from(project: &Project) -> Self {
        let image = if project.image.is_empty() {
            String::new()
        } else {
            format!("/{}", project.image.path.trim_start_matches('/'))
        };

        Self {
            slug: project.slug.clone(),
            title: project.title.clone(),
            subtitle: project.subtitle.clone(),
            image,
        }
    }
}

/// Listing entry for GET /admin/contents
#[derive(Debug, Clone, Serialize)]
pub struct ContentSummary {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
}

impl From<&Content> for ContentSummary {
    fn from(content: &Content) -> Self {
        Self {
            slug: content.slug.clone(),
            title: content.title.clone(),
            subtitle: content.subtitle.clone(),
        }
    }
}

/// Response body for GET /admin/menu
#[derive(Debug, Clone, Serialize)]
pub struct MenuOverview {
    /// Slugs in the menu, in display order
    pub added: Vec<String>,
    /// Known routes that are not in the menu
    pub routes: Vec<String>,
}

/// One installed theme in GET /admin/theme
#[derive(Debug, Clone, Serialize)]
pub struct ThemeSummary {
    pub name: String,
    pub author: String,
    pub image: String,
    pub path: String,
}

impl ThemeSummary {
    /// `site` is the public base URL, used to make the preview image absolute.
    pub fn new(path: &str, theme: &Theme, site: &str) -> Self {
        Self {
            name: theme.name.clone(),
            author: theme.author.clone(),
            image: format!("{}themes/{}/{}", site, path, theme.image),
            path: path.to_string(),
        }
    }
}

/// Response body for GET /admin/theme
#[derive(Debug, Clone, Serialize)]
pub struct ThemesResponse {
    pub selected: String,
    pub themes: Vec<ThemeSummary>,
}

/// Response body for GET /admin/site
#[derive(Debug, Clone, Serialize)]
pub struct SiteResponse {
    pub site: String,
}

/// Response body for successful writes
#[derive(Debug, Clone, Serialize)]
pub struct MutationResponse {
    /// Success message
    pub message: String,
    /// Slug of the affected record, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl MutationResponse {
    pub fn created(kind: &str, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            message: format!("{} '{}' created successfully", kind, slug),
            slug: Some(slug),
        }
    }

    pub fn updated(kind: &str, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            message: format!("{} '{}' updated successfully", kind, slug),
            slug: Some(slug),
        }
    }

    pub fn deleted(kind: &str, slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            message: format!("{} '{}' deleted successfully", kind, slug),
            slug: Some(slug),
        }
    }

    /// For singleton records such as the user profile or the menu.
    pub fn saved(what: &str) -> Self {
        Self {
            message: format!("{} saved successfully", what),
            slug: None,
        }
    }
}

/// Response body for GET /admin/cache/stats
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of expired entries removed by sweeps
    pub swept: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hit_rate: stats.hit_rate(),
            hits: stats.hits,
            misses: stats.misses,
            swept: stats.swept,
            total_entries: stats.total_entries,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
