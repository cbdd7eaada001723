//! Route table and navigation guard.
//!
//! Rules, evaluated in order for every navigation:
//! 1. target requires auth and there is no token: go to login;
//! 2. token present and target is login: go to the authenticated landing;
//! 3. otherwise proceed.
//!
//! The root path is a static redirect to login, applied before the guard.

use std::fmt;

use tracing::debug;

use crate::session::SessionAccessor;

/// Redirect chains longer than this indicate a broken route table.
const MAX_REDIRECTS: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Login,
    Register,
    Decompose,
}

impl Route {
    /// Landing route after a successful sign-in.
    pub const AUTHENTICATED_LANDING: Route = Route::Decompose;

    pub fn path(self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Decompose => "/decompose",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Root),
            "/login" => Some(Route::Login),
            "/register" => Some(Route::Register),
            "/decompose" => Some(Route::Decompose),
            _ => None,
        }
    }

    pub fn requires_auth(self) -> bool {
        matches!(self, Route::Decompose)
    }

    /// Router-level redirect that applies regardless of session state.
    fn static_redirect(self) -> Option<Route> {
        match self {
            Route::Root => Some(Route::Login),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Decision for a single navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect(Route),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("navigation to {from} did not settle after {max} redirects", max = MAX_REDIRECTS)]
pub struct RedirectLoop {
    pub from: Route,
}

/// Gatekeeper consulted on every navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard<S> {
    session: S,
}

impl<S: SessionAccessor> RouteGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// Apply the guard rules to one target.
    pub fn check(&self, to: Route) -> Navigation {
        let has_token = self.session.token().is_some();
        if to.requires_auth() && !has_token {
            Navigation::Redirect(Route::Login)
        } else if has_token && to == Route::Login {
            Navigation::Redirect(Route::AUTHENTICATED_LANDING)
        } else {
            Navigation::Proceed
        }
    }

    /// Follow static redirects and guard decisions to the route that finally
    /// renders.
    pub fn navigate(&self, to: Route) -> Result<Route, RedirectLoop> {
        let mut current = to;
        for _ in 0..MAX_REDIRECTS {
            if let Some(next) = current.static_redirect() {
                current = next;
                continue;
            }
            match self.check(current) {
                Navigation::Proceed => {
                    debug!(requested = %to, resolved = %current, "navigation settled");
                    return Ok(current);
                }
                Navigation::Redirect(next) => current = next,
            }
        }
        Err(RedirectLoop { from: to })
    }
}
