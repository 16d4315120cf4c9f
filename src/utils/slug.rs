/// Maximum `-N` suffixes tried before giving up on a unique slug.
pub const MAX_SLUG_ATTEMPTS: u32 = 100;

/// Derive a URL slug from free text: lowercase, alphanumeric runs
/// joined by single hyphens, everything else dropped.
pub fn derive_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    if slug.is_empty() {
        slug.push('n');
        slug.push('a');
    }
    slug
}

/// Candidate slugs in probe order: the base itself, then `base-1`,
/// `base-2`, ... up to [`MAX_SLUG_ATTEMPTS`] candidates in total.
pub fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    (0..MAX_SLUG_ATTEMPTS).map(move |n| {
        if n == 0 {
            base.to_string()
        } else {
            format!("{base}-{n}")
        }
    })
}
