//! Persisted record types
//!
//! Every record serializes to JSON with named fields. Missing fields fall back
//! to their defaults so older rows keep decoding after a field is added.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Free-form label → value pairs (references, networks, meta tags, ...).
pub type Map = BTreeMap<String, String>;

// == Media ==
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Other,
    Image,
    Video,
}

/// Reference to an uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Media {
    pub kind: MediaType,
    pub name: String,
    pub caption: String,
    pub path: String,
    pub mime: String,
}

impl Media {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }
}

// == User ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub country: String,
    pub city: String,
    pub street: String,
    pub email: String,
    pub phone: String,
}

/// The site owner's profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub name: String,
    pub title: String,
    pub about: String,
    pub image: Media,
    pub logo: Media,
    pub joined: DateTime<Utc>,
    pub references: Map,
    pub networks: Map,
    pub experiences: Map,
    pub interests: Vec<String>,
    pub contact: Contact,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub email: String,
    pub hash: String,
}

// == Projects ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Client {
    pub name: String,
    pub about: String,
    pub image: Media,
}

/// Where a project was imported from, if anywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Imported {
    pub external_id: i64,
    pub external_service: String,
    pub date: Option<DateTime<Utc>>,
}

/// A portfolio project, keyed by its slug in the `projects` bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Project {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub about: String,
    pub image: Media,
    pub logo: Media,
    pub published: DateTime<Utc>,
    pub images: Vec<Media>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub references: Map,
    pub client: Client,
    pub imported: Imported,
}

// == Content ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Paragraph {
    pub slug: String,
    pub title: String,
    pub content: String,
    pub media: Media,
}

/// A free-standing page, keyed by its slug in the `content` bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Content {
    pub slug: String,
    pub title: String,
    pub subtitle: String,
    pub published: DateTime<Utc>,
    pub paragraphs: Vec<Paragraph>,
    pub tags: Vec<String>,
    pub technologies: Vec<String>,
    pub references: Map,
}

// == Routing ==
/// A routable identity: something that can be linked to from the menu.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Route {
    pub slug: String,
    pub title: String,
}

impl Route {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }
}

// == Configuration ==
/// Theme manifest, read from `<theme>/theme.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub name: String,
    pub description: String,
    pub author: String,
    pub image: String,
    pub css: Vec<String>,
    pub js: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub title: String,
    pub site: String,
    pub tags: Map,
    pub og_tags: Map,
}

impl Meta {
    /// Meta block written on first start.
    pub fn initial() -> Self {
        let tags = [
            ("description", ""),
            ("keywords", ""),
            ("author", ""),
            ("viewport", "width=device-width, initial-scale=1.0"),
        ];
        let og_tags = [("title", ""), ("type", "website"), ("url", ""), ("image", "")];

        Self {
            title: String::new(),
            site: String::new(),
            tags: to_map(&tags),
            og_tags: to_map(&og_tags),
        }
    }
}

fn to_map(pairs: &[(&str, &str)]) -> Map {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Site-wide settings stored under `configuration`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub setup_completed: bool,
    pub jwt_secret: String,
    pub current_theme_path: String,
    pub current_theme: Theme,
    pub meta: Meta,
}
