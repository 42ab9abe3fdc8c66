use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Name of the cookie carrying the opaque session token.
pub const SESSION_COOKIE: &str = "sessionId";

/// Frontend route the guard redirects unauthenticated users to.
pub const LOGIN_ROUTE: &str = "/login";

/// Frontend route the guard redirects under-privileged users to.
pub const DASHBOARD_ROUTE: &str = "/dashboard";
