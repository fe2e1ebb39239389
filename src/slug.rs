//! Slug derivation for new records

use crate::error::{AppError, Result};

/// Derives a URL-safe slug from a human-readable title.
///
/// Titles with nothing slug-worthy in them (only punctuation, say) are rejected.
pub fn generate_slug(title: &str) -> Result<String> {
    let slug = ::slug::slugify(title);
    if slug.is_empty() {
        return Err(AppError::Validation(format!(
            "Cannot derive a slug from title '{}'",
            title
        )));
    }
    Ok(slug)
}
