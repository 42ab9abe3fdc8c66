use async_trait::async_trait;
use std::borrow::Cow;
use uuid::Uuid;

use crate::{
    entities::blog_post::{BlogPost, BlogPostInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxBlogPostRepo,
};

fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

#[async_trait]
pub trait BlogPostRepository: Send + Sync {
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError>;
    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError>;
    async fn get_all_blog_posts(&self, page: u32, per_page: u32) -> Result<Vec<BlogPost>, AppError>;
    async fn count_blog_posts(&self) -> Result<i64, AppError>;
}

impl SqlxBlogPostRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxBlogPostRepo { pool }
    }
}

#[async_trait]
impl BlogPostRepository for SqlxBlogPostRepo {
    async fn create_blog_post(&self, post: &BlogPostInsert) -> Result<Uuid, AppError> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO blog_posts (title, slug, content, author, image, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&post.title)
        .bind(&post.slug)
        .bind(&post.content)
        .bind(&post.author)
        .bind(&post.image)
        .bind(post.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict("Slug already exists".to_string())
                }
                _ => AppError::from(e),
            }
        })
    }

    async fn get_blog_post_by_slug(&self, slug: &str) -> Result<BlogPost, AppError> {
        sqlx::query_as::<_, BlogPost>("SELECT * FROM blog_posts WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_all_blog_posts(&self, page: u32, per_page: u32) -> Result<Vec<BlogPost>, AppError> {
        sqlx::query_as::<_, BlogPost>(
            "SELECT * FROM blog_posts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(per_page as i64)
        .bind(page_offset(page, per_page))
        .fetch_all(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn count_blog_posts(&self) -> Result<i64, AppError> {
        sqlx::query_scalar("SELECT COUNT(*) FROM blog_posts")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)
    }
}
