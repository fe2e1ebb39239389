//! Project records.

use tracing::{info, warn};

use super::buckets::PROJECTS;
use super::{keys, require_slug, CachedDatabase};
use crate::error::{AppError, Result};
use crate::models::Project;

impl CachedDatabase {
    /// All projects in slug order.
    pub fn get_projects(&self) -> Result<Vec<Project>> {
        self.load_collection(&keys::PROJECTS, PROJECTS)
    }

    pub fn get_project(&self, slug: &str) -> Result<Project> {
        self.load(&keys::project(slug), PROJECTS, slug)
    }

    /// Writes `project`, overwriting any record with the same slug.
    ///
    /// A menu entry pointing at the project picks up its new title.
    pub fn put_project(&self, project: &Project) -> Result<()> {
        require_slug("Project", &project.slug)?;
        self.save("put_project", PROJECTS, &project.slug, project, || {
            self.cache_project(project)
        })?;
        self.sync_menu_title(&project.slug, &project.title)
    }

    /// Writes `project` only if no project uses its slug yet.
    pub fn create_project(&self, project: &Project) -> Result<()> {
        require_slug("Project", &project.slug)?;

        let inserted = self.insert_new("create_project", PROJECTS, &project.slug, project, || {
            self.cache_project(project)
        })?;
        if !inserted {
            warn!(slug = %project.slug, "Project already exists");
            return Err(AppError::Conflict(format!(
                "Project '{}' already exists",
                project.slug
            )));
        }

        info!(slug = %project.slug, "Project created");
        self.sync_menu_title(&project.slug, &project.title)
    }

    /// Deletes the project. Menu entries pointing at it are left in place.
    pub fn delete_project(&self, slug: &str) -> Result<()> {
        let removed = self.remove("delete_project", PROJECTS, slug, || {
            self.cache.invalidate(&keys::project(slug));
            self.cache.invalidate(&keys::PROJECTS);
            self.cache.invalidate(&keys::ROUTES);
        })?;

        if !removed {
            return Err(AppError::NotFound(format!("Project '{}' not found", slug)));
        }

        info!(slug, "Project deleted");
        Ok(())
    }

    /// Write-through after `project` was committed.
    fn cache_project(&self, project: &Project) {
        self.cache
            .set_record(&keys::project(&project.slug), project.clone());
        self.cache.invalidate(&keys::PROJECTS);
        self.cache.invalidate(&keys::ROUTES);
    }
}
