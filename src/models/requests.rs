//! Request DTOs for the admin API
//!
//! Defines the structure of incoming HTTP request bodies and how they are
//! applied to stored records.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{Client, Contact, Content, Map, Media, Meta, Paragraph, Project, User};

/// Request body for creating or updating a project
/// (POST /admin/project/create, PUT /admin/project/:slug/update)
///
/// The slug is derived from the title on creation and never changes afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProjectRequest {
    pub title: String,
    pub subtitle: String,
    pub about: String,
    pub image: Media,
    pub logo: Media,
    pub images: Vec<Media>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub references: Map,
    pub client: Client,
}

impl ProjectRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Project title cannot be empty".to_string());
        }
        None
    }

    /// Builds a new project published at `published`.
    pub fn into_project(self, slug: String, published: DateTime<Utc>) -> Project {
        let mut project = Project {
            slug,
            published,
            ..Project::default()
        };
        self.apply_to(&mut project);
        project
    }

    /// Overwrites the editable fields of `project`, leaving slug and dates.
    pub fn apply_to(self, project: &mut Project) {
        project.title = self.title;
        project.subtitle = self.subtitle;
        project.about = self.about;
        project.image = self.image;
        project.logo = self.logo;
        project.images = self.images;
        project.tags = self.tags;
        project.technologies = self.technologies;
        project.references = self.references;
        project.client = self.client;
    }
}

/// Request body for creating or updating a content page
/// (POST /admin/content/create, PUT /admin/content/:slug/update)
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContentRequest {
    pub title: String,
    pub subtitle: String,
    pub paragraphs: Vec<Paragraph>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub references: Map,
}

impl ContentRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("Content title cannot be empty".to_string());
        }
        None
    }

    pub fn into_content(self, slug: String, published: DateTime<Utc>) -> Content {
        let mut content = Content {
            slug,
            published,
            ..Content::default()
        };
        self.apply_to(&mut content);
        content
    }

    pub fn apply_to(self, content: &mut Content) {
        content.title = self.title;
        content.subtitle = self.subtitle;
        content.paragraphs = self.paragraphs;
        content.tags = self.tags;
        content.technologies = self.technologies;
        content.references = self.references;
    }
}

/// Request body for PUT /admin/user/update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateUserRequest {
    pub name: String,
    pub title: String,
    pub about: String,
    pub image: Media,
    pub logo: Media,
    pub references: Map,
    pub networks: Map,
    pub experiences: Map,
    pub interests: Vec<String>,
    pub contact: Contact,
}

impl UpdateUserRequest {
    /// Overwrites the profile fields; `joined` is kept.
    pub fn apply_to(self, user: &mut User) {
        user.name = self.name;
        user.title = self.title;
        user.about = self.about;
        user.image = self.image;
        user.logo = self.logo;
        user.references = self.references;
        user.networks = self.networks;
        user.experiences = self.experiences;
        user.interests = self.interests;
        user.contact = self.contact;
    }
}

/// Request body for PUT /admin/theme/update
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateThemeRequest {
    /// Directory name of the theme under the themes root
    pub path: String,
}

/// Request body for PUT /admin/meta/update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMetaRequest {
    pub title: String,
    pub site: String,
    pub tags: Map,
    pub og_tags: Map,
}

impl UpdateMetaRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.site.trim().is_empty() {
            return Some("Site address cannot be empty".to_string());
        }
        None
    }

    /// Converts into a [`Meta`], normalising the site to end with `/`.
    pub fn into_meta(self) -> Meta {
        let mut site = self.site.trim().to_string();
        if !site.ends_with('/') {
            site.push('/');
        }

        Meta {
            title: self.title,
            site,
            tags: self.tags,
            og_tags: self.og_tags,
        }
    }
}

/// Request body for PUT /admin/menu/add and PUT /admin/menu/remove
#[derive(Debug, Clone, Deserialize)]
pub struct MenuRequest {
    pub slug: String,
}

impl MenuRequest {
    pub fn validate(&self) -> Option<String> {
        if self.slug.trim().is_empty() {
            return Some("Slug cannot be empty".to_string());
        }
        None
    }
}
