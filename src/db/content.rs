//! Content pages.

use tracing::{info, warn};

use super::buckets::CONTENT;
use super::{keys, require_slug, CachedDatabase};
use crate::error::{AppError, Result};
use crate::models::Content;

impl CachedDatabase {
    /// All content pages in slug order.
    pub fn get_contents(&self) -> Result<Vec<Content>> {
        self.load_collection(&keys::CONTENTS, CONTENT)
    }

    pub fn get_content(&self, slug: &str) -> Result<Content> {
        self.load(&keys::content(slug), CONTENT, slug)
    }

    /// Writes `content`, overwriting any page with the same slug.
    ///
    /// A menu entry pointing at the page picks up its new title.
    pub fn put_content(&self, content: &Content) -> Result<()> {
        require_slug("Content", &content.slug)?;
        self.save("put_content", CONTENT, &content.slug, content, || {
            self.cache_content(content)
        })?;
        self.sync_menu_title(&content.slug, &content.title)
    }

    /// Writes `content` only if no page uses its slug yet.
    pub fn create_content(&self, content: &Content) -> Result<()> {
        require_slug("Content", &content.slug)?;

        let inserted = self.insert_new("create_content", CONTENT, &content.slug, content, || {
            self.cache_content(content)
        })?;
        if !inserted {
            warn!(slug = %content.slug, "Content already exists");
            return Err(AppError::Conflict(format!(
                "Content '{}' already exists",
                content.slug
            )));
        }

        info!(slug = %content.slug, "Content created");
        self.sync_menu_title(&content.slug, &content.title)
    }

    /// Deletes the page. Menu entries pointing at it are left in place.
    pub fn delete_content(&self, slug: &str) -> Result<()> {
        let removed = self.remove("delete_content", CONTENT, slug, || {
            self.cache.invalidate(&keys::content(slug));
            self.cache.invalidate(&keys::CONTENTS);
            self.cache.invalidate(&keys::ROUTES);
        })?;

        if !removed {
            return Err(AppError::NotFound(format!("Content '{}' not found", slug)));
        }

        info!(slug, "Content deleted");
        Ok(())
    }

    /// Write-through after `content` was committed.
    fn cache_content(&self, content: &Content) {
        self.cache
            .set_record(&keys::content(&content.slug), content.clone());
        self.cache.invalidate(&keys::CONTENTS);
        self.cache.invalidate(&keys::ROUTES);
    }
}
