use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    pub id: Uuid,
    pub title: String,
    pub departments: Option<String>,
    pub project_type: Option<String>,
    pub description: Option<String>,
    pub partners: Option<String>,
    pub responsible_person: Option<String>,
    pub responsible_email: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
    pub location: Option<String>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Validate)]
pub struct ProjectInsert {
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: String,
    pub departments: Option<String>,
    pub project_type: Option<String>,
    pub description: Option<String>,
    pub partners: Option<String>,
    pub responsible_person: Option<String>,
    #[validate(email(message = "Invalid responsible email"))]
    pub responsible_email: Option<String>,
    pub year: Option<i32>,
    pub status: Option<String>,
    pub location: Option<String>,
    /// Generated filename under the uploads directory, never a path.
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ───── Multipart Input ──────────────────────────────────────────────

/// The add-project form. Field names follow the public contract:
/// `responsible` and `email` land on `responsible_person` and
/// `responsible_email`, `type` on `project_type`.
#[derive(Debug, MultipartForm)]
pub struct NewProjectForm {
    pub title: Text<String>,
    pub departments: Option<Text<String>>,
    #[multipart(rename = "type")]
    pub project_type: Option<Text<String>>,
    pub description: Option<Text<String>>,
    pub partners: Option<Text<String>>,
    pub responsible: Option<Text<String>>,
    pub email: Option<Text<String>>,
    pub year: Option<Text<i32>>,
    pub status: Option<Text<String>>,
    pub location: Option<Text<String>>,
    #[multipart(limit = "10MB")]
    pub image: Option<TempFile>,
}

impl NewProjectForm {
    /// Builds the insert row; `image` is the already-stored generated
    /// filename (or None when no file was attached).
    pub fn into_insert(self, image: Option<String>) -> ProjectInsert {
        ProjectInsert {
            title: self.title.into_inner(),
            departments: self.departments.map(Text::into_inner),
            project_type: self.project_type.map(Text::into_inner),
            description: self.description.map(Text::into_inner),
            partners: self.partners.map(Text::into_inner),
            responsible_person: self.responsible.map(Text::into_inner),
            responsible_email: self.email.map(Text::into_inner),
            year: self.year.map(Text::into_inner),
            status: self.status.map(Text::into_inner),
            location: self.location.map(Text::into_inner),
            image,
            created_at: Utc::now(),
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ProjectCreatedResponse {
    pub id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub total: i64,
    pub page: u32,
    pub per_page: u32,
}
