use std::sync::Arc;
use std::time::Duration;

mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod background_task;
pub mod shared_repos;

pub use domain::{entities, password, route_guard, use_cases};
pub use interfaces::{handlers, middlewares, repositories, routes};
pub use infrastructure::{auth, db, limiter, session, storage, utils};

use limiter::LoginThrottle;
use repositories::blog_post::BlogPostRepository;
use repositories::project::ProjectRepository;
use repositories::user::UserRepository;
use session::{MemorySessionStore, RedisSessionStore, SessionStore};
use shared_repos::SharedRepositories;
use storage::ImageStore;
use use_cases::auth::AuthHandler;
use use_cases::blog::BlogHandler;
use use_cases::projects::ProjectHandler;

const LOGIN_MAX_ATTEMPTS: u64 = 10;
const LOGIN_ATTEMPT_WINDOW: Duration = Duration::from_secs(60);
const THROTTLE_IDLE_TTL: Duration = Duration::from_secs(15 * 60);

pub struct AppState {
    pub auth_handler: AuthHandler,
    pub project_handler: ProjectHandler,
    pub blog_handler: BlogHandler,
    pub session_store: Arc<dyn SessionStore>,
    pub image_store: ImageStore,
    pub login_throttle: LoginThrottle,
    pub cookie_secure: bool,
}

impl AppState {
    pub fn new(config: &settings::AppConfig, pool: sqlx::PgPool) -> Self {
        let repos = SharedRepositories::new(pool);
        let session_store = build_session_store(config);

        Self::from_parts(
            Arc::new(repos.user_repo),
            Arc::new(repos.project_repo),
            Arc::new(repos.blog_post_repo),
            session_store,
            ImageStore::new(config.upload_dir.clone(), config.upload_max_bytes),
            config.session_lifetime(),
            config.is_production(),
        )
    }

    /// Wires handlers from explicit store handles. Tests use this to
    /// swap in in-memory repositories.
    pub fn from_parts(
        user_repo: Arc<dyn UserRepository>,
        project_repo: Arc<dyn ProjectRepository>,
        blog_post_repo: Arc<dyn BlogPostRepository>,
        session_store: Arc<dyn SessionStore>,
        image_store: ImageStore,
        session_ttl: Duration,
        cookie_secure: bool,
    ) -> Self {
        let auth_handler = AuthHandler::new(user_repo, session_store.clone(), session_ttl);
        let project_handler = ProjectHandler::new(project_repo);
        let blog_handler = BlogHandler::new(blog_post_repo);

        AppState {
            auth_handler,
            project_handler,
            blog_handler,
            session_store,
            image_store,
            login_throttle: LoginThrottle::new(
                LOGIN_MAX_ATTEMPTS,
                LOGIN_ATTEMPT_WINDOW,
                THROTTLE_IDLE_TTL,
            ),
            cookie_secure,
        }
    }
}

fn build_session_store(config: &settings::AppConfig) -> Arc<dyn SessionStore> {
    if let Some(url) = config.redis_url.as_deref() {
        let cfg = deadpool_redis::Config::from_url(url);
        match cfg.create_pool(Some(deadpool_redis::Runtime::Tokio1)) {
            Ok(pool) => {
                tracing::info!("Using Redis-backed session store");
                return Arc::new(RedisSessionStore::new(pool));
            }
            Err(e) => {
                tracing::error!("Redis pool creation error: {}; using in-memory sessions", e);
            }
        }
    }
    Arc::new(MemorySessionStore::new())
}
