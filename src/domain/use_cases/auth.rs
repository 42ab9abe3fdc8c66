use std::sync::Arc;

use validator::Validate;
use zeroize::Zeroizing;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::token::generate_session_token;
use crate::entities::session::SessionRecord;
use crate::entities::user::{LoginRequest, RegisterRequest, SessionUser};
use crate::errors::{AppError, AuthError};
use crate::interfaces::repositories::user::UserRepository;
use crate::session::SessionStore;

pub struct AuthHandler {
    pub user_repo: Arc<dyn UserRepository>,
    pub sessions: Arc<dyn SessionStore>,
    session_ttl: chrono::Duration,
}

impl AuthHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        sessions: Arc<dyn SessionStore>,
        session_ttl: std::time::Duration,
    ) -> Self {
        let session_ttl = chrono::Duration::from_std(session_ttl)
            .unwrap_or_else(|_| chrono::Duration::hours(24));
        AuthHandler {
            user_repo,
            sessions,
            session_ttl,
        }
    }

    /// Registers a new user after validation and password hashing.
    /// A duplicate email surfaces as `AppError::Conflict`.
    pub async fn register(&self, request: RegisterRequest) -> Result<(), AppError> {
        request.validate()?;

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        self.user_repo.create_user(&user_insert).await?;

        tracing::info!("User registered");
        Ok(())
    }

    /// Verifies credentials and opens a session. The caller turns the
    /// returned token into the session cookie.
    pub async fn login(&self, request: LoginRequest) -> Result<(SessionUser, String), AuthError> {
        request.validate()?;
        let password = Zeroizing::new(request.password);

        let user = self.user_repo.get_user_by_email(&request.email)
            .await
            .map_err(|_e| AuthError::WrongCredentials)?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&password, &user.password_hash)
            .map_err(|_| AuthError::WrongCredentials)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        let token = generate_session_token();
        let record = SessionRecord::new(user.id, user.email.clone(), user.role, self.session_ttl);
        self.sessions.insert(&token, record).await?;

        tracing::info!("User logged in successfully");
        Ok((SessionUser::from(&user), token))
    }

    /// Resolves the presented token back to a user. A session whose user
    /// has disappeared is evicted before failing.
    pub async fn status(&self, token: &str) -> Result<SessionUser, AuthError> {
        let record = self.sessions.get(token)
            .await?
            .ok_or(AuthError::InvalidSession)?;

        match self.user_repo.get_user_by_id(&record.user_id).await {
            Ok(Some(user)) => Ok(SessionUser::from(&user)),
            Ok(None) => {
                tracing::warn!("Session refers to a deleted user, evicting");
                self.sessions.remove(token).await?;
                Err(AuthError::InvalidSession)
            }
            Err(e) => Err(AuthError::StoreFailure(e.to_string())),
        }
    }

    /// Drops the session entry if one is presented. Always succeeds so
    /// repeated logouts are indistinguishable from the first.
    pub async fn logout(&self, token: Option<&str>) -> Result<(), AuthError> {
        if let Some(token) = token {
            self.sessions.remove(token).await?;
        }
        Ok(())
    }

    pub fn session_lifetime(&self) -> chrono::Duration {
        self.session_ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::user::{Role, User, UserInsert};
    use crate::session::MemorySessionStore;
    use chrono::Utc;
    use mockall::mock;
    use mockall::predicate::eq;
    use uuid::Uuid;

    mock! {
        pub UserRepo {}

        #[async_trait::async_trait]
        impl UserRepository for UserRepo {
            async fn check_connection(&self) -> Result<(), AppError>;
            async fn count_users(&self) -> Result<u64, AppError>;
            async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
            async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
            async fn create_user(&self, user: &UserInsert) -> Result<Uuid, AppError>;
        }
    }

    fn stored_user(email: &str, password: &str) -> User {
        User {
            id: Uuid::new_v4(),
            name: "Test User".into(),
            fullname: "Test User".into(),
            email: email.into(),
            password_hash: hash_password(password).unwrap(),
            role: Role::User,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn handler(repo: MockUserRepo) -> AuthHandler {
        AuthHandler::new(
            Arc::new(repo),
            Arc::new(MemorySessionStore::new()),
            std::time::Duration::from_secs(60 * 60),
        )
    }

    #[actix_rt::test]
    async fn register_success() {
        let mut repo = MockUserRepo::new();
        repo.expect_create_user().returning(|_| Ok(Uuid::new_v4()));

        let result = handler(repo)
            .register(RegisterRequest {
                fullname: "New User".into(),
                email: "new@test.com".into(),
                password: "k3P!xqTav9&wz".into(),
            })
            .await;
        assert!(result.is_ok());
    }

    #[actix_rt::test]
    async fn register_email_conflict() {
        let mut repo = MockUserRepo::new();
        repo.expect_create_user()
            .returning(|_| Err(AppError::Conflict("User with this email already exists".into())));

        let result = handler(repo)
            .register(RegisterRequest {
                fullname: "Dup User".into(),
                email: "exists@test.com".into(),
                password: "k3P!xqTav9&wz".into(),
            })
            .await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[actix_rt::test]
    async fn register_rejects_weak_password() {
        let repo = MockUserRepo::new();

        let result = handler(repo)
            .register(RegisterRequest {
                fullname: "Weak".into(),
                email: "weak@test.com".into(),
                password: "password".into(),
            })
            .await;
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn login_then_status_round_trips() {
        let email = "valid@test.com";
        let user = stored_user(email, "Str0ng!pass#x");
        let user_by_id = user.clone();

        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email()
            .with(eq(email))
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_get_user_by_id()
            .returning(move |_| Ok(Some(user_by_id.clone())));

        let auth = handler(repo);

        let (session_user, token) = auth
            .login(LoginRequest {
                email: email.into(),
                password: "Str0ng!pass#x".into(),
            })
            .await
            .unwrap();
        assert_eq!(session_user.email, email);

        let probed = auth.status(&token).await.unwrap();
        assert_eq!(probed.email, email);
        assert_eq!(probed.fullname, session_user.fullname);
    }

    #[actix_rt::test]
    async fn login_wrong_password_opens_no_session() {
        let email = "invalid@test.com";
        let user = stored_user(email, "CorrectP@ss1");

        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = handler(repo);
        let result = auth
            .login(LoginRequest {
                email: email.into(),
                password: "WrongP@ss1".into(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[actix_rt::test]
    async fn login_unknown_email_fails() {
        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email().returning(|_| Ok(None));

        let result = handler(repo)
            .login(LoginRequest {
                email: "nobody@test.com".into(),
                password: "whatever1!".into(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::WrongCredentials)));
    }

    #[actix_rt::test]
    async fn status_with_unknown_token_fails() {
        let repo = MockUserRepo::new();
        let result = handler(repo).status("no-such-token").await;
        assert!(matches!(result, Err(AuthError::InvalidSession)));
    }

    #[actix_rt::test]
    async fn status_evicts_session_of_deleted_user() {
        let email = "gone@test.com";
        let user = stored_user(email, "Str0ng!pass#x");

        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        repo.expect_get_user_by_id().returning(|_| Ok(None));

        let auth = handler(repo);
        let (_, token) = auth
            .login(LoginRequest {
                email: email.into(),
                password: "Str0ng!pass#x".into(),
            })
            .await
            .unwrap();

        assert!(matches!(auth.status(&token).await, Err(AuthError::InvalidSession)));
        // The registry entry is gone, not just the lookup result
        assert!(auth.sessions.get(&token).await.unwrap().is_none());
    }

    #[actix_rt::test]
    async fn logout_is_idempotent() {
        let email = "bye@test.com";
        let user = stored_user(email, "Str0ng!pass#x");

        let mut repo = MockUserRepo::new();
        repo.expect_get_user_by_email()
            .returning(move |_| Ok(Some(user.clone())));

        let auth = handler(repo);
        let (_, token) = auth
            .login(LoginRequest {
                email: email.into(),
                password: "Str0ng!pass#x".into(),
            })
            .await
            .unwrap();

        assert!(auth.logout(Some(&token)).await.is_ok());
        assert!(auth.logout(Some(&token)).await.is_ok());
        assert!(auth.logout(None).await.is_ok());
        assert!(matches!(auth.status(&token).await, Err(AuthError::InvalidSession)));
    }
}
