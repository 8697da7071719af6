//! Hackfolio - profile editing and synchronization core.
//!
//! This library implements the stateful core behind the Hackfolio profile
//! screens: an editable local copy of a user's remote profile, validated
//! commits to a remote document store, image uploads to a remote blob store,
//! and the auth-gated decision of which screen to show on launch.
//!
//! Modules:
//! - `models` - the profile record and its append-only sub-records
//! - `validation` - pure field checks gating every commit
//! - `state` - observable state cells and the save/upload state machine
//! - `remote` - collaborator contracts (identity provider, profile store,
//!   blob store) with in-memory and Firebase REST implementations
//! - `profile` - the synchronization controllers driving fetch, commit,
//!   image upload, and append flows
//! - `bootstrap` - the auth-gated entry-route decision
//! - `config` - remote endpoint and session configuration
//!
//! The UI layer is an external consumer of this crate: it renders the state
//! the controllers expose and calls the operations on them. Nothing in here
//! renders, routes, or handles input.

pub mod bootstrap;
pub mod config;
pub mod models;
pub mod profile;
pub mod remote;
pub mod state;
pub mod validation;

use crate::remote::TransportError;
use crate::validation::ValidationError;

/// Library-level error type for Hackfolio operations.
///
/// Nothing here is fatal: controllers convert every variant into an
/// observable `SaveState::Error` so the caller can render it and retry.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not authenticated")]
    AuthRequired,

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A write-producing operation was invoked while a prior write for the
    /// same profile was still in flight.
    #[error("A save is already in progress")]
    SaveInFlight,

    /// The profile image was uploaded but the record patch failed. The
    /// orphaned blob is not rolled back; the next successful upload simply
    /// points the record at a fresh object.
    #[error("Profile image uploaded but the profile record was not updated: {0}")]
    PartialWrite(TransportError),
}

/// Result type alias for Hackfolio operations.
pub type Result<T> = std::result::Result<T, Error>;
