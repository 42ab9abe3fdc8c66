use std::sync::Arc;

use crate::entities::blog_post::{
    BlogPost, BlogPostCreatedResponse, BlogPostDetailResponse, BlogPostInsert, NewBlogPostRequest,
};
use crate::errors::AppError;
use crate::interfaces::repositories::blog_post::BlogPostRepository;

pub struct BlogHandler {
    pub blog_post_repo: Arc<dyn BlogPostRepository>,
}

impl BlogHandler {
    pub fn new(blog_post_repo: Arc<dyn BlogPostRepository>) -> Self {
        BlogHandler { blog_post_repo }
    }

    pub async fn create_blog_post(
        &self,
        request: NewBlogPostRequest,
    ) -> Result<BlogPostCreatedResponse, AppError> {
        let insert = BlogPostInsert::try_from(request)?;
        let id = self.blog_post_repo.create_blog_post(&insert).await?;

        tracing::info!(post_id = %id, slug = %insert.slug, "Blog post created");
        Ok(BlogPostCreatedResponse {
            id,
            slug: insert.slug,
        })
    }

    pub async fn get_all_blog_posts(
        &self,
        page: u32,
        per_page: u32,
    ) -> Result<(Vec<BlogPost>, i64), AppError> {
        futures::try_join!(
            self.blog_post_repo.get_all_blog_posts(page, per_page),
            self.blog_post_repo.count_blog_posts(),
        )
    }

    pub async fn get_blog_post_by_slug(
        &self,
        slug: &str,
    ) -> Result<BlogPostDetailResponse, AppError> {
        let post = self.blog_post_repo.get_blog_post_by_slug(slug).await?;
        Ok(post.to_detail_response())
    }
}
