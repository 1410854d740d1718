#![forbid(unsafe_code)]

//! Route guard for protected views.
//!
//! The guard runs on every render of the current route and again after
//! every session change.
//!
//! # Invariants
//!
//! 1. A protected route is never rendered for an unauthenticated session:
//!    the decision is [`GuardDecision::Suppress`] whenever the session is
//!    signed out, and it is computed before any redirect is requested.
//! 2. One redirect per unauthenticated episode. An episode starts the first
//!    time a protected route is evaluated signed-out and ends when the
//!    session authenticates or the viewer leaves the protected area.
//! 3. An authenticated evaluation never navigates.

use tracing::debug;

use crate::route::{Navigator, RouteTable};
use crate::session::Session;

/// What to render for the current route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the route's subtree unchanged.
    Render,
    /// Render an empty placeholder.
    Suppress,
}

/// Continuous authentication guard.
#[derive(Debug, Clone, Default)]
pub struct RouteGuard {
    redirect_issued: bool,
    redirects: u64,
}

impl RouteGuard {
    /// Guard with no episode in progress.
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide what to render for `path`, redirecting through `nav` if needed.
    pub fn evaluate(
        &mut self,
        routes: &RouteTable,
        path: &str,
        session: &Session,
        nav: &mut dyn Navigator,
    ) -> GuardDecision {
        if !routes.is_protected(path) {
            self.redirect_issued = false;
            return GuardDecision::Render;
        }
        if session.is_authenticated() {
            self.redirect_issued = false;
            return GuardDecision::Render;
        }

        let decision = GuardDecision::Suppress;
        if !self.redirect_issued {
            self.redirect_issued = true;
            self.redirects += 1;
            debug!(from = path, to = routes.landing_path(), "unauthenticated; redirecting");
            nav.navigate(routes.landing_path());
        }
        decision
    }

    /// Whether a redirect has been issued for the current episode.
    pub fn redirect_pending(&self) -> bool {
        self.redirect_issued
    }

    /// Total redirects issued over the guard's lifetime.
    pub fn redirect_count(&self) -> u64 {
        self.redirects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route::{LANDING_PATH, NavigationLog};

    fn routes() -> RouteTable {
        RouteTable::default().protect("/nexus")
    }

    #[test]
    fn unauthenticated_protected_view_is_suppressed_with_one_redirect() {
        let routes = routes();
        let mut guard = RouteGuard::new();
        let mut nav = NavigationLog::default();
        let session = Session::signed_out();

        for _ in 0..5 {
            assert_eq!(
                guard.evaluate(&routes, "/nexus", &session, &mut nav),
                GuardDecision::Suppress
            );
        }
        assert_eq!(nav.requests(), [LANDING_PATH.to_string()]);
        assert_eq!(guard.redirect_count(), 1);
    }

    #[test]
    fn authenticated_view_renders_without_redirect() {
        let routes = routes();
        let mut guard = RouteGuard::new();
        let mut nav = NavigationLog::default();
        let session = Session::signed_in("op");
        assert_eq!(
            guard.evaluate(&routes, "/nexus/graph", &session, &mut nav),
            GuardDecision::Render
        );
        assert!(nav.is_empty());
    }

    #[test]
    fn login_mid_session_renders_without_new_redirect() {
        let routes = routes();
        let mut guard = RouteGuard::new();
        let mut nav = NavigationLog::default();

        guard.evaluate(&routes, "/nexus", &Session::signed_out(), &mut nav);
        assert_eq!(nav.len(), 1);

        let decision = guard.evaluate(&routes, "/nexus", &Session::signed_in("op"), &mut nav);
        assert_eq!(decision, GuardDecision::Render);
        assert_eq!(nav.len(), 1);
        assert!(!guard.redirect_pending());
    }

    #[test]
    fn logout_starts_a_new_episode() {
        let routes = routes();
        let mut guard = RouteGuard::new();
        let mut nav = NavigationLog::default();

        guard.evaluate(&routes, "/nexus", &Session::signed_in("op"), &mut nav);
        assert!(nav.is_empty());
        assert_eq!(
            guard.evaluate(&routes, "/nexus", &Session::signed_out(), &mut nav),
            GuardDecision::Suppress
        );
        assert_eq!(nav.len(), 1);
    }

    #[test]
    fn unprotected_routes_always_render() {
        let routes = routes();
        let mut guard = RouteGuard::new();
        let mut nav = NavigationLog::default();
        assert_eq!(
            guard.evaluate(&routes, "/", &Session::signed_out(), &mut nav),
            GuardDecision::Render
        );
        assert!(nav.is_empty());
    }
}
