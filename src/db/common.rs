//! Singleton records, routes, themes and menu administration.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::buckets::{COMMON, ROUTES, THEMES};
use super::{keys, require_slug, CachedDatabase};
use crate::error::{AppError, Result};
use crate::models::{Configuration, Credentials, Menu, Meta, Route, Theme, User};

// Keys of the singleton records inside the common bucket.
pub(super) const USER: &str = "user";
pub(super) const MENU: &str = "menu";
pub(super) const CONFIGURATION: &str = "configuration";
pub(super) const CREDENTIALS: &str = "credentials";

impl CachedDatabase {
    // == Singletons ==
    pub fn get_user(&self) -> Result<User> {
        self.load(&keys::USER, COMMON, USER)
    }

    pub fn put_user(&self, user: &User) -> Result<()> {
        self.save("put_user", COMMON, USER, user, || {
            self.cache.set_record(&keys::USER, user.clone())
        })
    }

    pub fn get_menu(&self) -> Result<Menu> {
        self.load(&keys::MENU, COMMON, MENU)
    }

    pub fn put_menu(&self, menu: &Menu) -> Result<()> {
        self.save("put_menu", COMMON, MENU, menu, || {
            self.cache.set_record(&keys::MENU, menu.clone())
        })
    }

    pub fn get_configuration(&self) -> Result<Configuration> {
        self.load(&keys::CONFIGURATION, COMMON, CONFIGURATION)
    }

    pub fn put_configuration(&self, configuration: &Configuration) -> Result<()> {
        self.save("put_configuration", COMMON, CONFIGURATION, configuration, || {
            self.cache.set_record(&keys::CONFIGURATION, configuration.clone())
        })
    }

    pub fn get_credentials(&self) -> Result<Credentials> {
        self.load(&keys::CREDENTIALS, COMMON, CREDENTIALS)
    }

    pub fn put_credentials(&self, credentials: &Credentials) -> Result<()> {
        self.save("put_credentials", COMMON, CREDENTIALS, credentials, || {
            self.cache.set_record(&keys::CREDENTIALS, credentials.clone())
        })
    }

    // == Routes ==
    /// Every registered route, keyed by slug.
    pub fn get_routes(&self) -> Result<BTreeMap<String, Route>> {
        self.load_collection(&keys::ROUTES, ROUTES)
    }

    pub fn put_route(&self, route: &Route) -> Result<()> {
        require_slug("Route", &route.slug)?;
        self.save("put_route", ROUTES, &route.slug, route, || {
            self.cache.invalidate(&keys::ROUTES)
        })
    }

    // == Themes ==
    /// Installed themes, keyed by directory name.
    pub fn get_themes(&self) -> Result<BTreeMap<String, Theme>> {
        self.load_collection(&keys::THEMES, THEMES)
    }

    // == Menu administration ==
    /// Appends the route registered under `slug` to the end of the menu.
    pub fn add_to_menu(&self, slug: &str) -> Result<Menu> {
        let route = self
            .get_routes()?
            .remove(slug)
            .ok_or_else(|| AppError::NotFound(format!("No route '{}'", slug)))?;

        let menu = self.modify("add_to_menu", &keys::MENU, COMMON, MENU, |menu: &mut Menu| {
            if menu.push(route) {
                Ok(true)
            } else {
                Err(AppError::Conflict(format!("'{}' is already in the menu", slug)))
            }
        })?;

        info!(slug, "Added to menu");
        Ok(menu)
    }

    /// Removes `slug` from the menu, shifting later entries up.
    pub fn remove_from_menu(&self, slug: &str) -> Result<Menu> {
        let menu = self.modify("remove_from_menu", &keys::MENU, COMMON, MENU, |menu: &mut Menu| {
            match menu.remove(slug) {
                Some(_) => Ok(true),
                None => Err(AppError::NotFound(format!("'{}' is not in the menu", slug))),
            }
        })?;

        info!(slug, "Removed from menu");
        Ok(menu)
    }

    /// Replaces the title of the menu entry for `slug`, if there is one.
    ///
    /// Entries are never added here; that is [`CachedDatabase::add_to_menu`].
    pub(super) fn sync_menu_title(&self, slug: &str, title: &str) -> Result<()> {
        let synced = self.modify("sync_menu", &keys::MENU, COMMON, MENU, |menu: &mut Menu| {
            Ok(menu.retitle(slug, title))
        });

        match synced {
            Ok(_) => Ok(()),
            Err(AppError::NotFound(_)) => {
                debug!(slug, "No menu to sync");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    // == Configuration administration ==
    /// Switches the active theme to the one installed under `path`.
    pub fn set_theme(&self, path: &str) -> Result<Configuration> {
        let theme = self
            .get_themes()?
            .remove(path)
            .ok_or_else(|| AppError::Validation(format!("Unknown theme '{}'", path)))?;

        let configuration = self.modify(
            "set_theme",
            &keys::CONFIGURATION,
            COMMON,
            CONFIGURATION,
            |configuration: &mut Configuration| {
                configuration.current_theme_path = path.to_string();
                configuration.current_theme = theme;
                Ok(true)
            },
        )?;

        info!(theme = path, "Theme changed");
        Ok(configuration)
    }

    pub fn update_meta(&self, meta: Meta) -> Result<Configuration> {
        self.modify(
            "update_meta",
            &keys::CONFIGURATION,
            COMMON,
            CONFIGURATION,
            |configuration: &mut Configuration| {
                configuration.meta = meta;
                Ok(true)
            },
        )
    }
}
