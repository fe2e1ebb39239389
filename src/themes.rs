//! Theme discovery
//!
//! Each theme lives in its own directory under the themes root and is
//! described by a `theme.json` manifest. The directory name is the theme's
//! path, which is what the configuration stores.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::models::Theme;

pub const MANIFEST: &str = "theme.json";

/// Scans `root` for `<path>/theme.json` manifests, keyed by directory name.
///
/// Directories without a readable, valid manifest are skipped. A missing or
/// unreadable root yields an empty map; the caller decides whether that is fatal.
pub fn scan_themes(root: &Path) -> BTreeMap<String, Theme> {
    let mut themes = BTreeMap::new();

    let dir = match fs::read_dir(root) {
        Ok(dir) => dir,
        Err(e) => {
            warn!(path = %root.display(), error = %e, "Cannot read themes directory");
            return themes;
        }
    };

    for entry in dir.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };

        match read_manifest(&path.join(MANIFEST)) {
            Ok(theme) => {
                themes.insert(name.to_string(), theme);
            }
            Err(e) => debug!(theme = name, error = %e, "Skipping theme"),
        }
    }

    themes
}

fn read_manifest(path: &Path) -> Result<Theme, Box<dyn std::error::Error>> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
