use actix_web::cookie::{time::Duration as CookieDuration, Cookie, SameSite};
use actix_web::error::ResponseError;
use actix_web::{get, post, web, HttpRequest, HttpResponse, Responder};

use crate::constants::SESSION_COOKIE;
use crate::entities::user::{LoginRequest, RegisterRequest};
use crate::errors::{AppError, AuthError};
use crate::utils::get_client_ip::get_client_ip;
use crate::AppState;

#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> impl Responder {
    match state.auth_handler.register(body.into_inner()).await {
        Ok(()) => HttpResponse::Created().json(serde_json::json!({
            "message": "User registered successfully"
        })),
        // The public contract reports a duplicate email as a plain 400
        Err(AppError::Conflict(_)) => HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Email already registered"
        })),
        Err(e @ AppError::ValidationError(_)) => e.to_http_response(),
        Err(e) => {
            tracing::error!("Registration failed: {}", e);
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Internal server error"
            }))
        }
    }
}

#[post("/login")]
pub async fn login(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    let client_ip = get_client_ip(&req, false);
    if let Err(retry_after) = state.login_throttle.check(&client_ip) {
        tracing::warn!(client_ip = %client_ip, "Login throttled");
        return AuthError::RateLimited(retry_after).error_response();
    }

    match state.auth_handler.login(body.into_inner()).await {
        Ok((user, token)) => {
            let cookie = session_cookie(&state, token);
            HttpResponse::Ok().cookie(cookie).json(serde_json::json!({
                "message": "Login successful",
                "user": user
            }))
        }
        Err(e) => e.error_response(),
    }
}

#[get("/status")]
pub async fn status(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let Some(cookie) = req.cookie(SESSION_COOKIE) else {
        return AuthError::MissingSession.error_response();
    };

    match state.auth_handler.status(cookie.value()).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({ "user": user })),
        Err(e) => e.error_response(),
    }
}

#[post("/logout")]
pub async fn logout(req: HttpRequest, state: web::Data<AppState>) -> impl Responder {
    let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

    // Logout always reports success; a store failure only loses the
    // server-side entry, and the cookie is cleared regardless.
    if let Err(e) = state.auth_handler.logout(token.as_deref()).await {
        tracing::error!("Failed to drop session entry on logout: {}", e);
    }

    let mut removal = Cookie::new(SESSION_COOKIE, "");
    removal.set_path("/");

    let mut response = HttpResponse::Ok().json(serde_json::json!({
        "message": "Logged out successfully"
    }));
    if let Err(e) = response.add_removal_cookie(&removal) {
        tracing::warn!("Failed to attach removal cookie: {}", e);
    }
    response
}

fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = CookieDuration::seconds(state.auth_handler.session_lifetime().num_seconds());
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .max_age(max_age)
        .finish()
}
