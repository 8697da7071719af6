//! Integration tests for the auth-gated bootstrap decision: the three-way
//! route, the transient Resolving state, and route stickiness per identity.

mod common;

use std::sync::Arc;

use common::{GatedStore, RecordingStore, SwitchableIdentity, identity};
use hackfolio::bootstrap::{AppRoute, BootstrapResolver, RouteState};
use hackfolio::models::UserProfile;
use hackfolio::profile::ProfileController;
use hackfolio::remote::memory::{MemoryBlobStore, MemoryProfileStore, StaticIdentity};

fn signed_in(uid: &str) -> Arc<StaticIdentity> {
    Arc::new(StaticIdentity::signed_in(identity(uid)))
}

#[tokio::test]
async fn test_signed_out_routes_to_sign_in() {
    let store = Arc::new(MemoryProfileStore::new());
    let resolver = BootstrapResolver::new(Arc::new(StaticIdentity::signed_out()), store);

    assert_eq!(resolver.resolve().await, AppRoute::SignIn);
    assert_eq!(resolver.route(), RouteState::Resolved(AppRoute::SignIn));
}

#[tokio::test]
async fn test_existing_record_routes_home() {
    let store = Arc::new(MemoryProfileStore::new());
    store.seed(
        "u1",
        UserProfile {
            name: "Ann".to_string(),
            ..UserProfile::default()
        },
    );
    let resolver = BootstrapResolver::new(signed_in("u1"), store);

    assert_eq!(resolver.resolve().await, AppRoute::Home);
}

#[tokio::test]
async fn test_scenario_new_user_gets_details_and_prefilled_email() {
    // Identity "u1" has no remote record: the resolver sends them to the
    // details form, and the controller starts from an empty profile with
    // the email taken from the identity.
    let store = Arc::new(MemoryProfileStore::new());
    let auth = signed_in("u1");

    let resolver = BootstrapResolver::new(auth.clone(), store.clone());
    assert_eq!(resolver.resolve().await, AppRoute::FirstTimeDetails);

    let controller =
        ProfileController::new(auth, store, Arc::new(MemoryBlobStore::new()));
    controller.start().await;
    assert_eq!(controller.profile().name, "");
    assert_eq!(controller.profile().email, "u1@example.com");
}

#[tokio::test]
async fn test_lookup_failure_defaults_to_details() {
    let store = Arc::new(RecordingStore::new());
    store.seed("u1", UserProfile::default());
    store.set_fail_get(true);
    let resolver = BootstrapResolver::new(signed_in("u1"), store);

    assert_eq!(resolver.resolve().await, AppRoute::FirstTimeDetails);
}

#[tokio::test]
async fn test_route_is_resolving_until_lookup_lands() {
    let store = Arc::new(GatedStore::new());
    let resolver = Arc::new(BootstrapResolver::new(signed_in("u1"), store.clone()));
    assert_eq!(resolver.route(), RouteState::Resolving);

    let resolve = {
        let resolver = resolver.clone();
        tokio::spawn(async move { resolver.resolve().await })
    };
    store.wait_until_started().await;
    assert_eq!(resolver.route(), RouteState::Resolving);
    assert_eq!(resolver.route().route(), None);

    store.release();
    assert_eq!(resolve.await.unwrap(), AppRoute::FirstTimeDetails);
    assert_eq!(
        resolver.route(),
        RouteState::Resolved(AppRoute::FirstTimeDetails)
    );
}

#[tokio::test]
async fn test_route_sticks_for_the_same_identity() {
    let store = Arc::new(RecordingStore::new());
    let resolver = BootstrapResolver::new(signed_in("u1"), store.clone());

    assert_eq!(resolver.resolve().await, AppRoute::FirstTimeDetails);
    assert_eq!(store.get_calls(), 1);

    // The record appearing later does not flip an already-chosen route,
    // and the store is not consulted again.
    store.seed("u1", UserProfile::default());
    assert_eq!(resolver.resolve().await, AppRoute::FirstTimeDetails);
    assert_eq!(store.get_calls(), 1);
}

#[tokio::test]
async fn test_route_re_resolves_when_identity_changes() {
    let store = Arc::new(MemoryProfileStore::new());
    store.seed("u2", UserProfile::default());
    let auth = Arc::new(SwitchableIdentity::new(None));
    let resolver = BootstrapResolver::new(auth.clone(), store);

    assert_eq!(resolver.resolve().await, AppRoute::SignIn);

    auth.switch(Some(identity("u2")));
    assert_eq!(resolver.resolve().await, AppRoute::Home);

    auth.switch(None);
    assert_eq!(resolver.resolve().await, AppRoute::SignIn);
}
