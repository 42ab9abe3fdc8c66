use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{ready, Ready};

use crate::entities::session::CurrentSession;
use crate::errors::AuthError;
use crate::route_guard::{self, AuthState, GuardDecision};

fn auth_state(session: &Option<CurrentSession>) -> AuthState {
    match session {
        Some(session) => AuthState::Authenticated { role: session.role },
        None => AuthState::Anonymous,
    }
}

fn guard(req: &HttpRequest, require_admin: bool) -> Result<CurrentSession, AuthError> {
    let session = req.extensions().get::<CurrentSession>().cloned();
    let decision = route_guard::evaluate(&auth_state(&session), require_admin, req.path());

    match (decision, session) {
        (GuardDecision::Render, Some(session)) => Ok(session),
        (GuardDecision::RedirectToDashboard { .. }, _) => {
            Err(AuthError::Forbidden("Admin access required".into()))
        }
        _ => Err(AuthError::MissingSession),
    }
}

/// Extractor for an authenticated session, resolved by the session
/// middleware. Returns 401 if the request carries no live session.
/// Usage: add `session: AuthSession` as a handler parameter.
#[derive(Debug)]
pub struct AuthSession(pub CurrentSession);

impl FromRequest for AuthSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(guard(req, false).map(AuthSession).map_err(Into::into))
    }
}

/// Extractor for an admin session.
/// Returns 403 if the user is not an admin, 401 if not authenticated.
#[derive(Debug)]
pub struct AdminSession(pub CurrentSession);

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(guard(req, true).map(AdminSession).map_err(Into::into))
    }
}
