//! Collaborator contracts for the remote systems the core depends on.
//!
//! The core never reaches a backend directly; it is handed implementations
//! of these traits at construction time:
//! - `IdentityProvider` - who is signed in right now
//! - `ProfileStore` - the remote document store keyed by user identity
//! - `BlobStore` - the remote object store for profile images
//!
//! Implementations:
//! - `memory` - in-process stores for tests and offline development
//! - `firebase` - REST adapters for the production backend
//!
//! The on-the-wire representation is the collaborator's concern; the core
//! only sees typed records and [`TransportError`]s.

pub mod firebase;
pub mod memory;

use std::path::Path;

use async_trait::async_trait;

use crate::models::{FieldValue, ProfileField, UserProfile};

/// An opaque authenticated-user handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable unique id of the authenticated user.
    pub uid: String,
    /// Email the identity provider knows for this user, if any.
    pub email: Option<String>,
}

impl Identity {
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: None,
        }
    }

    pub fn with_email(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: Some(email.into()),
        }
    }
}

/// A remote store or blob call failed in transit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Who is signed in right now. No other auth operations are part of the core.
pub trait IdentityProvider: Send + Sync {
    fn current_identity(&self) -> Option<Identity>;
}

/// The remote document store holding one profile record per identity.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch the record for `identity`, or `None` when no record exists.
    async fn get(&self, identity: &Identity) -> Result<Option<UserProfile>, TransportError>;

    /// Replace the full record for `identity`.
    async fn set(&self, identity: &Identity, profile: &UserProfile) -> Result<(), TransportError>;

    /// Overwrite a single field of the record for `identity`.
    async fn patch_field(
        &self,
        identity: &Identity,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), TransportError>;
}

/// The remote object store for profile images.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Upload the blob at `blob` for `identity` and return a resolvable
    /// download URL.
    async fn upload(&self, identity: &Identity, blob: &Path) -> Result<String, TransportError>;
}
