//! Knowledge-base article validation and slug generation.
//!
//! Category and difficulty values are closed sets; the database enforces the
//! same sets with CHECK constraints so both layers agree.

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Category constants
// ---------------------------------------------------------------------------

pub const CATEGORY_ATTACK: &str = "attack";
pub const CATEGORY_DEFENSE: &str = "defense";
pub const CATEGORY_CLOUD: &str = "cloud";
pub const CATEGORY_TOOLS: &str = "tools";
pub const CATEGORY_FUNDAMENTALS: &str = "fundamentals";

/// All valid article categories.
pub const VALID_CATEGORIES: &[&str] = &[
    CATEGORY_ATTACK,
    CATEGORY_DEFENSE,
    CATEGORY_CLOUD,
    CATEGORY_TOOLS,
    CATEGORY_FUNDAMENTALS,
];

// ---------------------------------------------------------------------------
// Difficulty constants
// ---------------------------------------------------------------------------

pub const DIFFICULTY_BEGINNER: &str = "beginner";
pub const DIFFICULTY_INTERMEDIATE: &str = "intermediate";
pub const DIFFICULTY_ADVANCED: &str = "advanced";

/// All valid article difficulties.
pub const VALID_DIFFICULTIES: &[&str] = &[
    DIFFICULTY_BEGINNER,
    DIFFICULTY_INTERMEDIATE,
    DIFFICULTY_ADVANCED,
];

/// Difficulty applied when a create request omits it.
pub const DEFAULT_DIFFICULTY: &str = DIFFICULTY_BEGINNER;

/// Estimated reading time (minutes) applied when a create request omits it.
pub const DEFAULT_READ_TIME: i32 = 5;

/// Byline applied when a create request omits the author.
pub const DEFAULT_AUTHOR: &str = "CyberSim Team";

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

/// Clamp a user-provided limit into `[1, max]`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

// ---------------------------------------------------------------------------
// Slug generation
// ---------------------------------------------------------------------------

/// Generate a URL-safe slug from an article title.
///
/// Lowercases, replaces anything that is not ASCII alphanumeric with a
/// hyphen, collapses runs of hyphens and trims them from both ends.
pub fn generate_slug(title: &str) -> String {
    let mut result = String::with_capacity(title.len());
    let mut prev_hyphen = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            result.push(c);
            prev_hyphen = false;
        } else if !prev_hyphen {
            result.push('-');
            prev_hyphen = true;
        }
    }
    result.trim_matches('-').to_string()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate an article title (non-empty, <= 200 chars).
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".into()));
    }
    if title.len() > 200 {
        return Err(CoreError::Validation(
            "Title must be at most 200 characters".into(),
        ));
    }
    Ok(())
}

/// Validate an article slug (non-empty, only lowercase alphanumeric + hyphens).
pub fn validate_slug(slug: &str) -> Result<(), CoreError> {
    if slug.is_empty() {
        return Err(CoreError::Validation("Slug must not be empty".into()));
    }
    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(CoreError::Validation(
            "Slug must contain only lowercase alphanumeric characters and hyphens".into(),
        ));
    }
    Ok(())
}

/// Validate an article category against the known set.
pub fn validate_category(cat: &str) -> Result<(), CoreError> {
    if !VALID_CATEGORIES.contains(&cat) {
        return Err(CoreError::Validation(format!(
            "Invalid category '{}'. Valid categories: {}",
            cat,
            VALID_CATEGORIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate an article difficulty against the known set.
pub fn validate_difficulty(difficulty: &str) -> Result<(), CoreError> {
    if !VALID_DIFFICULTIES.contains(&difficulty) {
        return Err(CoreError::Validation(format!(
            "Invalid difficulty '{}'. Valid difficulties: {}",
            difficulty,
            VALID_DIFFICULTIES.join(", ")
        )));
    }
    Ok(())
}

/// Validate the short description shown in article listings.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation(
            "Description must not be empty".into(),
        ));
    }
    if description.len() > 500 {
        return Err(CoreError::Validation(
            "Description must be at most 500 characters".into(),
        ));
    }
    Ok(())
}

/// Validate article content (non-empty, max 100 000 chars).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation("Content must not be empty".into()));
    }
    if content.len() > 100_000 {
        return Err(CoreError::Validation(
            "Content must be at most 100000 characters".into(),
        ));
    }
    Ok(())
}

/// Validate article tags (each non-empty, <= 50 chars, max 20 tags).
pub fn validate_tags(tags: &[String]) -> Result<(), CoreError> {
    if tags.len() > 20 {
        return Err(CoreError::Validation(
            "A maximum of 20 tags is allowed".into(),
        ));
    }
    for tag in tags {
        if tag.trim().is_empty() {
            return Err(CoreError::Validation("Tags must not be empty".into()));
        }
        if tag.len() > 50 {
            return Err(CoreError::Validation(
                "Each tag must be at most 50 characters".into(),
            ));
        }
    }
    Ok(())
}

/// Validate the estimated reading time in minutes (1..=240).
pub fn validate_read_time(minutes: i32) -> Result<(), CoreError> {
    if !(1..=240).contains(&minutes) {
        return Err(CoreError::Validation(
            "Read time must be between 1 and 240 minutes".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
