//! Site navigation menu
//!
//! The menu is the administrator-curated, ordered subset of routes. Position in
//! the sequence is the sort key; there are no gaps to maintain.

use serde::{Deserialize, Serialize};

use super::Route;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Menu {
    entries: Vec<Route>,
}

impl Menu {
    pub fn new(entries: Vec<Route>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[Route] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.position(slug).is_some()
    }

    pub fn position(&self, slug: &str) -> Option<usize> {
        self.entries.iter().position(|route| route.slug == slug)
    }

    /// Menu slugs in display order.
    pub fn slugs(&self) -> Vec<String> {
        self.entries.iter().map(|route| route.slug.clone()).collect()
    }

    /// Appends a route at the end. Returns false if its slug is already listed.
    pub fn push(&mut self, route: Route) -> bool {
        if self.contains(&route.slug) {
            return false;
        }
        self.entries.push(route);
        true
    }

    /// Removes the entry for `slug`, shifting later entries up by one.
    pub fn remove(&mut self, slug: &str) -> Option<Route> {
        self.position(slug).map(|index| self.entries.remove(index))
    }

    /// Replaces the title of the entry for `slug`.
    ///
    /// Returns true only if an entry was found and its title actually changed.
    pub fn retitle(&mut self, slug: &str, title: &str) -> bool {
        match self.entries.iter_mut().find(|route| route.slug == slug) {
            Some(route) if route.title != title => {
                route.title = title.to_string();
                true
            }
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a Menu {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
