use crate::constants::{DASHBOARD_ROUTE, LOGIN_ROUTE};
use crate::entities::user::Role;

/// Client-side auth state as the frontend sees it: the status probe may
/// still be in flight, resolved to nobody, or resolved to a user.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    Loading,
    Anonymous,
    Authenticated { role: Role },
}

/// Outcome of guarding a protected subtree. A pure decision — the caller
/// renders, redirects, or (server-side) maps it onto a status code.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    ShowLoading,
    RedirectToLogin { target: String },
    RedirectToDashboard { target: String },
    Render,
}

/// Decides what to do with a protected subtree given the current auth
/// state. `location` is the route being guarded; it is preserved in the
/// login redirect so the user returns there after signing in.
pub fn evaluate(state: &AuthState, require_admin: bool, location: &str) -> GuardDecision {
    match state {
        AuthState::Loading => GuardDecision::ShowLoading,
        AuthState::Anonymous => GuardDecision::RedirectToLogin {
            target: login_redirect_target(location),
        },
        AuthState::Authenticated { role } => {
            if require_admin && !role.is_admin() {
                GuardDecision::RedirectToDashboard {
                    target: DASHBOARD_ROUTE.to_string(),
                }
            } else {
                GuardDecision::Render
            }
        }
    }
}

/// Login route carrying the originating location as a `from` parameter.
pub fn login_redirect_target(location: &str) -> String {
    if location.is_empty() {
        LOGIN_ROUTE.to_string()
    } else {
        format!("{}?from={}", LOGIN_ROUTE, urlencoding::encode(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_wins_over_everything() {
        let decision = evaluate(&AuthState::Loading, true, "/admin/posts");
        assert_eq!(decision, GuardDecision::ShowLoading);
    }

    #[test]
    fn anonymous_redirects_to_login_preserving_origin() {
        let decision = evaluate(&AuthState::Anonymous, false, "/projects/new");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                target: "/login?from=%2Fprojects%2Fnew".to_string()
            }
        );
    }

    #[test]
    fn anonymous_with_empty_location_gets_bare_login() {
        let decision = evaluate(&AuthState::Anonymous, true, "");
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                target: "/login".to_string()
            }
        );
    }

    #[test]
    fn non_admin_is_bounced_to_dashboard_when_admin_required() {
        let state = AuthState::Authenticated { role: Role::User };
        let decision = evaluate(&state, true, "/admin/posts");
        assert_eq!(
            decision,
            GuardDecision::RedirectToDashboard {
                target: "/dashboard".to_string()
            }
        );
    }

    #[test]
    fn non_admin_renders_when_admin_not_required() {
        let state = AuthState::Authenticated { role: Role::User };
        assert_eq!(evaluate(&state, false, "/projects"), GuardDecision::Render);
    }

    #[test]
    fn admin_renders_protected_children() {
        let state = AuthState::Authenticated { role: Role::Admin };
        assert_eq!(evaluate(&state, true, "/admin/posts"), GuardDecision::Render);
    }
}
