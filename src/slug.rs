use validator::ValidationError;

pub const MAX_SLUG_LEN: usize = 250;

/// Slug derived from a post title, cut to the column limit.
pub fn slugify_title(title: &str) -> String {
    let mut slug = ::slug::slugify(title);
    if slug.len() > MAX_SLUG_LEN {
        slug.truncate(MAX_SLUG_LEN);
        while slug.ends_with('-') {
            slug.pop();
        }
    }
    slug
}

/// Letters, digits, underscores and hyphens only.
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        let mut error = ValidationError::new("slug");
        error.message = Some("Enter a valid slug consisting of letters, numbers, underscores or hyphens.".into());
        Err(error)
    }
}
