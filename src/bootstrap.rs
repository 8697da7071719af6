//! Auth-gated bootstrap route resolution.
//!
//! On launch the app shows exactly one of three screens: sign-in for an
//! unauthenticated user, the first-time details form for an authenticated
//! user with no profile record, or home. The record lookup is asynchronous
//! and may race with the first render, so the resolver exposes a distinct
//! `Resolving` state until the decision lands.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::warn;

use crate::remote::{IdentityProvider, ProfileStore};
use crate::state::StateCell;

/// The three entry screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    SignIn,
    FirstTimeDetails,
    Home,
}

/// Route resolution progress. `Resolving` is neither `FirstTimeDetails` nor
/// `Home` - a renderer should show a splash or spinner, not pick a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteState {
    #[default]
    Resolving,
    Resolved(AppRoute),
}

impl RouteState {
    pub fn route(&self) -> Option<AppRoute> {
        match self {
            RouteState::Resolved(route) => Some(*route),
            RouteState::Resolving => None,
        }
    }
}

/// Which identity the current route was resolved for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ResolvedFor {
    SignedOut,
    User(String),
}

/// Decides the entry route from authentication state and the presence of a
/// remote profile record.
///
/// Once a route is resolved for an identity it does not change until the
/// identity changes: repeat calls return the cached decision without
/// consulting the store again, so the entry screen cannot flicker.
pub struct BootstrapResolver {
    auth: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    route: StateCell<RouteState>,
    resolved_for: Mutex<Option<ResolvedFor>>,
}

impl BootstrapResolver {
    pub fn new(auth: Arc<dyn IdentityProvider>, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            auth,
            store,
            route: StateCell::default(),
            resolved_for: Mutex::new(None),
        }
    }

    /// Current resolution state.
    pub fn route(&self) -> RouteState {
        self.route.get()
    }

    pub fn subscribe(&self) -> watch::Receiver<RouteState> {
        self.route.subscribe()
    }

    /// Resolve the entry route for the current identity.
    pub async fn resolve(&self) -> AppRoute {
        let current = self.auth.current_identity();

        if let Some(route) = self.cached_route_for(current.as_ref().map(|id| id.uid.as_str())) {
            return route;
        }

        let Some(identity) = current else {
            self.finish(ResolvedFor::SignedOut, AppRoute::SignIn);
            return AppRoute::SignIn;
        };

        self.route.set(RouteState::Resolving);
        let route = match self.store.get(&identity).await {
            Ok(Some(_)) => AppRoute::Home,
            Ok(None) => AppRoute::FirstTimeDetails,
            Err(err) => {
                // Indistinguishable from "no record" without a stronger
                // contract; the details form is the conservative default.
                warn!(uid = %identity.uid, "profile lookup failed during bootstrap: {err}");
                AppRoute::FirstTimeDetails
            }
        };
        self.finish(ResolvedFor::User(identity.uid), route);
        route
    }

    /// The already-resolved route, provided the identity has not changed.
    fn cached_route_for(&self, uid: Option<&str>) -> Option<AppRoute> {
        let resolved = self.resolved_for.lock().unwrap();
        let same = match (resolved.as_ref()?, uid) {
            (ResolvedFor::SignedOut, None) => true,
            (ResolvedFor::User(resolved_uid), Some(uid)) => resolved_uid == uid,
            _ => false,
        };
        if same { self.route.get().route() } else { None }
    }

    fn finish(&self, key: ResolvedFor, route: AppRoute) {
        *self.resolved_for.lock().unwrap() = Some(key);
        self.route.set(RouteState::Resolved(route));
    }
}
