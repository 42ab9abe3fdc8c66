use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::entities::project::{
    NewProjectForm, Project, ProjectCreatedResponse, ProjectListResponse,
};
use crate::errors::AppError;
use crate::interfaces::repositories::project::ProjectRepository;

pub struct ProjectHandler {
    pub project_repo: Arc<dyn ProjectRepository>,
}

impl ProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepository>) -> Self {
        ProjectHandler { project_repo }
    }

    /// Persists one project row. `image` is the filename the upload
    /// handler already wrote, or None when the form carried no file.
    pub async fn create_project(
        &self,
        form: NewProjectForm,
        image: Option<String>,
    ) -> Result<ProjectCreatedResponse, AppError> {
        let insert = form.into_insert(image);
        insert.validate()?;

        let id = self.project_repo.create_project(&insert).await?;

        tracing::info!(project_id = %id, "Project created");
        Ok(ProjectCreatedResponse {
            id,
            message: "Project created successfully".to_string(),
        })
    }

    pub async fn get_all_projects(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<ProjectListResponse, AppError> {
        let (projects, total) = futures::try_join!(
            self.project_repo.get_all_projects(page, per_page),
            self.project_repo.count_projects(),
        )?;

        Ok(ProjectListResponse {
            projects,
            total,
            page,
            per_page,
        })
    }

    pub async fn get_project_by_id(&self, id: &Uuid) -> Result<Project, AppError> {
        self.project_repo.get_project_by_id(id).await
    }
}
