use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::utils::markdown::{safe_markdown_to_html, sanitize_markdown_content};

const MIN_TITLE_LENGTH: u64 = 3;
const MAX_TITLE_LENGTH: u64 = 120;
const MIN_SLUG_LENGTH: u64 = 3;
const MAX_SLUG_LENGTH: u64 = 80;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BlogPost {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub author: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Validate)]
pub struct BlogPostInsert {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: String,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    pub author: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlogPostDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub content_html: String,
    pub author: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BlogPostCreatedResponse {
    pub id: Uuid,
    pub slug: String,
}

// ───── Input & Validation Requests ──────────────────────────────────

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct NewBlogPostRequest {
    #[validate(
        length(min = MIN_TITLE_LENGTH, max = MAX_TITLE_LENGTH),
        custom(function = "validate_title")
    )]
    pub title: String,

    #[validate(
        length(min = MIN_SLUG_LENGTH, max = MAX_SLUG_LENGTH),
        custom(function = "validate_slug")
    )]
    pub slug: Option<String>,

    #[validate(length(min = 1, message = "Content cannot be empty"))]
    pub content: String,

    pub author: Option<String>,
    pub image: Option<String>,
}

// ───── Validation Helpers ───────────────────────────────────────────

pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if slug.is_empty() {
        return Err(new_validation_error("slug_empty", "Slug cannot be empty"));
    }
    if !slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(new_validation_error("slug_invalid_chars", "Slug must contain only lowercase letters, digits, or hyphens"));
    }
    if slug.starts_with('-') || slug.ends_with('-') {
        return Err(new_validation_error("slug_edge_hyphen", "Slug must not start or end with a hyphen"));
    }
    if slug.contains("--") {
        return Err(new_validation_error("slug_double_hyphen", "Slug must not contain consecutive hyphens"));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().len() != title.len() {
        return Err(new_validation_error("title_whitespace", "Title must not have leading or trailing whitespace"));
    }
    Ok(())
}

fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

// ───── Conversions ──────────────────────────────────────────────────

impl TryFrom<NewBlogPostRequest> for BlogPostInsert {
    type Error = ValidationErrors;

    fn try_from(value: NewBlogPostRequest) -> Result<Self, Self::Error> {
        value.validate()?;
        let sanitized_content = sanitize_markdown_content(&value.content);

        // Generate slug if not provided
        let slug = match value.slug {
            Some(s) => s,
            None => {
                let generated = slug::slugify(&value.title);
                if generated.len() < MIN_SLUG_LENGTH as usize {
                    return Err({
                        let mut errors = ValidationErrors::new();
                        errors.add("slug", new_validation_error("slug_too_short", "Generated slug is too short; please provide a custom slug"));
                        errors
                    });
                }
                generated
            }
        };

        let insert = BlogPostInsert {
            title: value.title,
            slug,
            content: sanitized_content,
            author: value.author,
            image: value.image,
            created_at: Utc::now(),
        };

        insert.validate()?;
        Ok(insert)
    }
}

impl BlogPost {
    pub fn to_detail_response(&self) -> BlogPostDetailResponse {
        BlogPostDetailResponse {
            id: self.id,
            title: self.title.clone(),
            slug: self.slug.clone(),
            content: self.content.clone(),
            content_html: safe_markdown_to_html(&self.content),
            author: self.author.clone(),
            image: self.image.clone(),
            created_at: self.created_at,
        }
    }
}
