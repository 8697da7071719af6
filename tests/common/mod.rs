//! Common test utilities for hackfolio integration tests.
//!
//! Provides instrumented collaborator implementations layered over the
//! in-memory stores: call counting, failure injection, a gate that holds a
//! remote call open so tests can observe the Loading state, and an identity
//! provider whose answer can change mid-test.

#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::{Notify, Semaphore};

use hackfolio::models::{FieldValue, ProfileField, UserProfile};
use hackfolio::remote::memory::MemoryProfileStore;
use hackfolio::remote::{Identity, IdentityProvider, ProfileStore, TransportError};

/// Identity fixture with a derived email.
pub fn identity(uid: &str) -> Identity {
    Identity::with_email(uid, format!("{uid}@example.com"))
}

/// A profile store that counts calls and can be told to fail per operation.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryProfileStore,
    get_calls: AtomicUsize,
    set_calls: AtomicUsize,
    patch_calls: AtomicUsize,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    fail_patch: AtomicBool,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, uid: &str, profile: UserProfile) {
        self.inner.seed(uid, profile);
    }

    pub fn record(&self, uid: &str) -> Option<UserProfile> {
        self.inner.record(uid)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }

    pub fn patch_calls(&self) -> usize {
        self.patch_calls.load(Ordering::SeqCst)
    }

    /// Remote writes issued so far, of any kind.
    pub fn write_calls(&self) -> usize {
        self.set_calls() + self.patch_calls()
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_set(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_patch(&self, fail: bool) {
        self.fail_patch.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl ProfileStore for RecordingStore {
    async fn get(&self, identity: &Identity) -> Result<Option<UserProfile>, TransportError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(TransportError::new("injected fetch failure"));
        }
        self.inner.get(identity).await
    }

    async fn set(&self, identity: &Identity, profile: &UserProfile) -> Result<(), TransportError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(TransportError::new("injected write failure"));
        }
        self.inner.set(identity, profile).await
    }

    async fn patch_field(
        &self,
        identity: &Identity,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), TransportError> {
        self.patch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_patch.load(Ordering::SeqCst) {
            return Err(TransportError::new("injected patch failure"));
        }
        self.inner.patch_field(identity, field, value).await
    }
}

/// A profile store whose remote calls block until the test releases them,
/// so the Loading state stays observable for as long as the test needs.
pub struct GatedStore {
    inner: MemoryProfileStore,
    started: Notify,
    gate: Semaphore,
}

impl GatedStore {
    pub fn new() -> Self {
        Self {
            inner: MemoryProfileStore::new(),
            started: Notify::new(),
            gate: Semaphore::new(0),
        }
    }

    pub fn seed(&self, uid: &str, profile: UserProfile) {
        self.inner.seed(uid, profile);
    }

    pub fn record(&self, uid: &str) -> Option<UserProfile> {
        self.inner.record(uid)
    }

    /// Wait until a remote call has entered the store.
    pub async fn wait_until_started(&self) {
        self.started.notified().await;
    }

    /// Let one held remote call proceed.
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    async fn pass_gate(&self) {
        self.started.notify_one();
        self.gate.acquire().await.unwrap().forget();
    }
}

#[async_trait]
impl ProfileStore for GatedStore {
    async fn get(&self, identity: &Identity) -> Result<Option<UserProfile>, TransportError> {
        self.pass_gate().await;
        self.inner.get(identity).await
    }

    async fn set(&self, identity: &Identity, profile: &UserProfile) -> Result<(), TransportError> {
        self.pass_gate().await;
        self.inner.set(identity, profile).await
    }

    async fn patch_field(
        &self,
        identity: &Identity,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), TransportError> {
        self.pass_gate().await;
        self.inner.patch_field(identity, field, value).await
    }
}

/// An identity provider whose answer can change mid-test, standing in for
/// sign-in and sign-out.
#[derive(Default)]
pub struct SwitchableIdentity {
    current: Mutex<Option<Identity>>,
}

impl SwitchableIdentity {
    pub fn new(initial: Option<Identity>) -> Self {
        Self {
            current: Mutex::new(initial),
        }
    }

    pub fn switch(&self, identity: Option<Identity>) {
        *self.current.lock().unwrap() = identity;
    }
}

impl IdentityProvider for SwitchableIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.current.lock().unwrap().clone()
    }
}
