//! First-start bootstrap.

use std::collections::BTreeMap;

use chrono::Utc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::buckets::{self, COMMON, ROUTES, THEMES};
use super::common::{CONFIGURATION, CREDENTIALS, MENU, USER};
use super::{keys, put_json, storage_error, CachedDatabase};
use crate::error::{AppError, Result};
use crate::models::{Configuration, Credentials, Menu, Meta, Route, Theme, User};
use crate::store::StoreError;

/// Theme selected on first start when it is installed.
pub const DEFAULT_THEME: &str = "peaches";

impl CachedDatabase {
    /// Prepares the store and returns the site configuration.
    ///
    /// Creates missing buckets and replaces the recorded themes with
    /// `themes`. On first start it also seeds the configuration, user,
    /// credentials, route table and menu. Later starts load the existing
    /// configuration, switching it to the default theme if its own is no
    /// longer installed. All of it happens in one write transaction.
    pub fn setup(&self, themes: &BTreeMap<String, Theme>) -> Result<Configuration> {
        let (path, theme) = themes
            .get_key_value(DEFAULT_THEME)
            .or_else(|| themes.iter().next())
            .ok_or_else(|| {
                error!("No themes found");
                AppError::Setup("No themes found".to_string())
            })?;

        let (configuration, seeded) = self
            .store
            .update_then(
                |tx| -> std::result::Result<(Configuration, bool), StoreError> {
                    for name in buckets::ALL {
                        tx.create_bucket_if_not_exists(name)?;
                    }

                    let installed = tx.bucket(THEMES)?;
                    installed.clear()?;
                    for (dir, manifest) in themes {
                        put_json(&installed, dir, manifest)?;
                    }

                    let common = tx.bucket(COMMON)?;
                    if let Some(raw) = common.get(CONFIGURATION)? {
                        let mut configuration: Configuration = serde_json::from_slice(&raw)?;
                        if !themes.contains_key(&configuration.current_theme_path) {
                            warn!(
                                missing = %configuration.current_theme_path,
                                fallback = %path,
                                "Configured theme is no longer installed"
                            );
                            configuration.current_theme_path = path.clone();
                            configuration.current_theme = theme.clone();
                            put_json(&common, CONFIGURATION, &configuration)?;
                        }
                        return Ok((configuration, false));
                    }

                    let configuration = Configuration {
                        setup_completed: false,
                        jwt_secret: Uuid::new_v4().to_string(),
                        current_theme_path: path.clone(),
                        current_theme: theme.clone(),
                        meta: Meta::initial(),
                    };
                    put_json(&common, CONFIGURATION, &configuration)?;
                    put_json(&common, USER, &initial_user())?;
                    put_json(&common, CREDENTIALS, &Credentials::default())?;

                    let routes = tx.bucket(ROUTES)?;
                    let seeded_routes = initial_routes();
                    for route in &seeded_routes {
                        put_json(&routes, &route.slug, route)?;
                    }

                    let menu = Menu::new(seeded_routes.into_iter().take(2).collect());
                    put_json(&common, MENU, &menu)?;

                    Ok((configuration, true))
                },
                |(configuration, seeded)| {
                    self.cache.invalidate(&keys::THEMES);
                    if *seeded {
                        self.cache.invalidate(&keys::USER);
                        self.cache.invalidate(&keys::CREDENTIALS);
                        self.cache.invalidate(&keys::ROUTES);
                        self.cache.invalidate(&keys::MENU);
                    }
                    self.cache
                        .set_record(&keys::CONFIGURATION, configuration.clone());
                },
            )
            .map_err(|e| storage_error("setup", COMMON, CONFIGURATION, e))?;

        if seeded {
            info!(theme = %configuration.current_theme_path, "Generated initial configuration");
        } else {
            info!(theme = %configuration.current_theme_path, "Loaded existing configuration");
        }

        Ok(configuration)
    }
}

fn initial_user() -> User {
    User {
        name: "User".to_string(),
        title: "Title".to_string(),
        joined: Utc::now(),
        ..User::default()
    }
}

/// Home and contact go into the menu, in that order.
fn initial_routes() -> [Route; 3] {
    [
        Route::new("home", "Home"),
        Route::new("contact", "Contact"),
        Route::new("notfound", "Not Found"),
    ]
}
