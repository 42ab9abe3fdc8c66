use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, HttpMessage,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{constants::SESSION_COOKIE, entities::session::CurrentSession, AppState};

/// Resolves the session cookie to a `CurrentSession` request extension.
/// Never rejects a request itself — public routes stay public, and the
/// `AuthSession`/`AdminSession` extractors do the enforcement.
pub struct SessionMiddleware;

impl<S, B> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

            if let Some(token) = token {
                match req.app_data::<web::Data<AppState>>() {
                    Some(state) => match state.session_store.get(&token).await {
                        Ok(Some(record)) => {
                            req.extensions_mut()
                                .insert(CurrentSession::from_record(&token, &record));
                        }
                        Ok(None) => {
                            // Unknown or expired token: fall through anonymous
                        }
                        Err(e) => {
                            tracing::error!("Session lookup failed: {}", e);
                        }
                    },
                    None => {
                        tracing::error!("AppState missing in session middleware");
                    }
                }
            }

            service.call(req).await
        })
    }
}
