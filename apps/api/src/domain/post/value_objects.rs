use validator::ValidationError;

pub const MAX_TAGS: usize = 10;
pub const MAX_TAG_LENGTH: usize = 32;

/// Trim, drop empties and de-duplicate tags case-insensitively, keeping the first
/// spelling seen.
pub fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(ValidationError::new("too_many_tags"));
    }
    if tags.iter().any(|t| t.trim().chars().count() > MAX_TAG_LENGTH) {
        return Err(ValidationError::new("tag_too_long"));
    }
    Ok(())
}
