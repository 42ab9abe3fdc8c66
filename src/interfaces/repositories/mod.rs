pub mod blog_post;
pub mod project;
pub mod sqlx_repo;
pub mod user;
