use crate::repositories::sqlx_repo::{SqlxBlogPostRepo, SqlxProjectRepo, SqlxUserRepo};

#[derive(Clone)]
pub struct SharedRepositories {
    pub user_repo: SqlxUserRepo,
    pub project_repo: SqlxProjectRepo,
    pub blog_post_repo: SqlxBlogPostRepo,
}

impl SharedRepositories {
    pub fn new(pool: sqlx::PgPool) -> Self {
        let user_repo = SqlxUserRepo::new(pool.clone());
        let project_repo = SqlxProjectRepo::new(pool.clone());
        let blog_post_repo = SqlxBlogPostRepo::new(pool);

        SharedRepositories {
            user_repo,
            project_repo,
            blog_post_repo,
        }
    }
}
