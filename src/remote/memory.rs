//! In-memory collaborator implementations.
//!
//! Backs the test suite and offline development: same contracts as the
//! production adapters, no network. `MemoryProfileStore` applies field
//! patches the way the document store does - a patch creates the record
//! path when it does not exist yet.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{FieldValue, ProfileField, UserProfile};
use crate::remote::{BlobStore, Identity, IdentityProvider, ProfileStore, TransportError};

/// An identity provider with a fixed answer.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    identity: Option<Identity>,
}

impl StaticIdentity {
    pub fn signed_in(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn signed_out() -> Self {
        Self { identity: None }
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_identity(&self) -> Option<Identity> {
        self.identity.clone()
    }
}

/// In-process profile store keyed by uid.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    records: Mutex<HashMap<String, UserProfile>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record directly, bypassing the store contract. Test setup.
    pub fn seed(&self, uid: impl Into<String>, profile: UserProfile) {
        self.records.lock().unwrap().insert(uid.into(), profile);
    }

    /// Snapshot of the stored record for `uid`, if any.
    pub fn record(&self, uid: &str) -> Option<UserProfile> {
        self.records.lock().unwrap().get(uid).cloned()
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn get(&self, identity: &Identity) -> Result<Option<UserProfile>, TransportError> {
        Ok(self.records.lock().unwrap().get(&identity.uid).cloned())
    }

    async fn set(&self, identity: &Identity, profile: &UserProfile) -> Result<(), TransportError> {
        self.records
            .lock()
            .unwrap()
            .insert(identity.uid.clone(), profile.clone());
        Ok(())
    }

    async fn patch_field(
        &self,
        identity: &Identity,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), TransportError> {
        let mut records = self.records.lock().unwrap();
        let record = records.entry(identity.uid.clone()).or_default();
        if !record.apply_field(field, value) {
            return Err(TransportError::new(format!(
                "value kind does not match field {field}"
            )));
        }
        Ok(())
    }
}

/// In-process blob store. Upload URLs are `memory://` and unique per uid.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    uploads: Mutex<Vec<(String, PathBuf)>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every (uid, local path) pair uploaded so far, in order.
    pub fn uploads(&self) -> Vec<(String, PathBuf)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn upload(&self, identity: &Identity, blob: &Path) -> Result<String, TransportError> {
        self.uploads
            .lock()
            .unwrap()
            .push((identity.uid.clone(), blob.to_path_buf()));
        Ok(format!("memory://blobs/profile_images/{}", identity.uid))
    }
}
