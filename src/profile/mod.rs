//! Profile synchronization controller.
//!
//! One [`ProfileController`] owns the editing session for a signed-in user.
//! It holds the authoritative copy of the remote profile, buffers local
//! edits separately, and drives every remote write through a single
//! [`SaveSlot`] so at most one write is in flight per profile. Collaborators
//! are injected at construction; the controller is the only writer of its
//! own state cells.
//!
//! Remote failures never escape as panics: fetch failures are logged and
//! leave the prior profile untouched, write failures become an observable
//! [`SaveState::Error`] plus a returned [`Error`].

pub mod details;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::models::{
    EditBuffer, EditField, FieldValue, Hackathon, ProfileField, Project, UserProfile,
};
use crate::remote::{BlobStore, Identity, IdentityProvider, ProfileStore, TransportError};
use crate::state::{SaveOutcome, SaveSlot, SaveState, StateCell};
use crate::validation;
use crate::{Error, Result};

/// Fetches, edits, and writes back one user's profile.
pub struct ProfileController {
    auth: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,
    blobs: Arc<dyn BlobStore>,

    profile: StateCell<UserProfile>,
    buffer: StateCell<EditBuffer>,
    edit_mode: StateCell<bool>,
    pending_image: StateCell<Option<PathBuf>>,
    loading: StateCell<bool>,
    save: SaveSlot,
}

impl ProfileController {
    pub fn new(
        auth: Arc<dyn IdentityProvider>,
        store: Arc<dyn ProfileStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            auth,
            store,
            blobs,
            profile: StateCell::default(),
            buffer: StateCell::default(),
            edit_mode: StateCell::new(false),
            pending_image: StateCell::new(None),
            loading: StateCell::new(false),
            save: SaveSlot::new(),
        }
    }

    // ========== State surface ==========

    /// The last-committed profile.
    pub fn profile(&self) -> UserProfile {
        self.profile.get()
    }

    pub fn subscribe_profile(&self) -> watch::Receiver<UserProfile> {
        self.profile.subscribe()
    }

    /// The in-progress edits, distinct from the committed profile.
    pub fn edit_buffer(&self) -> EditBuffer {
        self.buffer.get()
    }

    pub fn subscribe_edit_buffer(&self) -> watch::Receiver<EditBuffer> {
        self.buffer.subscribe()
    }

    pub fn is_edit_mode(&self) -> bool {
        self.edit_mode.get()
    }

    pub fn subscribe_edit_mode(&self) -> watch::Receiver<bool> {
        self.edit_mode.subscribe()
    }

    /// Local path of the most recently uploaded image, if any.
    pub fn pending_image(&self) -> Option<PathBuf> {
        self.pending_image.get()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    pub fn save_state(&self) -> SaveState {
        self.save.state()
    }

    pub fn subscribe_save_state(&self) -> watch::Receiver<SaveState> {
        self.save.subscribe()
    }

    /// One-shot consumption of a terminal save outcome; see
    /// [`SaveSlot::take_outcome`].
    pub fn take_save_outcome(&self) -> Option<SaveOutcome> {
        self.save.take_outcome()
    }

    // ========== Operations ==========

    /// Fetch the remote profile once and make it authoritative.
    ///
    /// No record yet: the profile becomes an empty default with the email
    /// pre-filled from the identity. Fetch failure: logged, prior profile
    /// untouched, no automatic retry.
    pub async fn start(&self) {
        let Some(identity) = self.auth.current_identity() else {
            warn!("profile fetch skipped: no authenticated user");
            return;
        };

        self.loading.set(true);
        match self.store.get(&identity).await {
            Ok(record) => {
                let profile = record.unwrap_or_else(|| UserProfile::for_identity(&identity));
                self.buffer.set(EditBuffer::from_profile(&profile));
                self.profile.set(profile);
                debug!(uid = %identity.uid, "profile loaded");
            }
            Err(err) => {
                warn!(uid = %identity.uid, "failed to fetch profile: {err}");
            }
        }
        self.loading.set(false);
    }

    /// Flip edit mode. Entering seeds the buffer from the authoritative
    /// profile; leaving discards un-committed edits the same way.
    pub fn toggle_edit_mode(&self) {
        self.buffer.set(EditBuffer::from_profile(&self.profile.get()));
        self.edit_mode.set(!self.edit_mode.get());
    }

    /// Overwrite one buffered field. Touches only the edit buffer - the
    /// authoritative profile and the remote store are not involved, and
    /// validation is deferred to commit.
    pub fn update_field(&self, field: EditField, value: impl Into<String>) {
        let value = value.into();
        self.buffer.update(|buffer| buffer.set(field, value));
    }

    /// Validate the edit buffer and write the merged profile to the remote
    /// store. On acknowledgment the merged profile becomes authoritative
    /// and edit mode is turned off.
    pub async fn commit_profile_edits(&self) -> Result<()> {
        if self.save.is_loading() {
            return Err(Error::SaveInFlight);
        }
        let Some(identity) = self.auth.current_identity() else {
            self.save.reject(Error::AuthRequired.to_string());
            return Err(Error::AuthRequired);
        };
        let buffer = self.buffer.get();
        if let Err(err) = validation::validate_profile_edits(&buffer) {
            self.save.reject(err.to_string());
            return Err(err.into());
        }

        self.save.begin()?;
        self.loading.set(true);
        let merged = buffer.merge_into(&self.profile.get());
        let result = self.store.set(&identity, &merged).await;
        self.loading.set(false);

        match result {
            Ok(()) => {
                self.buffer.set(EditBuffer::from_profile(&merged));
                self.profile.set(merged);
                self.edit_mode.set(false);
                self.save.succeed();
                Ok(())
            }
            Err(err) => {
                self.save.fail(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Upload a new profile image and point the remote record at it.
    ///
    /// Two remote steps: blob upload, then a single-field patch. When the
    /// patch fails after a successful upload, the local profile is left
    /// unpatched and the orphaned blob is not rolled back.
    pub async fn update_profile_image(&self, image: &Path) -> Result<()> {
        if self.save.is_loading() {
            return Err(Error::SaveInFlight);
        }
        let Some(identity) = self.auth.current_identity() else {
            self.save.reject(Error::AuthRequired.to_string());
            return Err(Error::AuthRequired);
        };

        self.save.begin()?;
        self.loading.set(true);
        let result = self.upload_and_patch(&identity, image).await;
        self.loading.set(false);

        match result {
            Ok(url) => {
                self.profile.update(|profile| profile.profile_image_url = url);
                self.pending_image.set(Some(image.to_path_buf()));
                self.save.succeed();
                Ok(())
            }
            Err(err) => {
                self.save.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn upload_and_patch(&self, identity: &Identity, image: &Path) -> Result<String> {
        let url = self
            .blobs
            .upload(identity, image)
            .await
            .map_err(Error::Transport)?;

        if let Err(err) = self
            .store
            .patch_field(
                identity,
                ProfileField::ProfileImageUrl,
                FieldValue::Text(url.clone()),
            )
            .await
        {
            warn!(uid = %identity.uid, url = %url, "image uploaded but record patch failed: {err}");
            return Err(Error::PartialWrite(err));
        }
        Ok(url)
    }

    /// Append a hackathon entry: read the current sequence, push, write the
    /// full sequence back. The local sequence is updated only after the
    /// remote acknowledgment.
    pub async fn append_hackathon(&self, hackathon: Hackathon) -> Result<()> {
        let identity = self.claim_write()?;
        let mut hackathons = self.profile.get().hackathons;
        hackathons.push(hackathon);

        let result = self
            .store
            .patch_field(
                &identity,
                ProfileField::Hackathons,
                FieldValue::Hackathons(hackathons.clone()),
            )
            .await;
        self.finish_patch(result, |profile| profile.hackathons = hackathons)
    }

    /// Append a project entry; same read-modify-write as
    /// [`Self::append_hackathon`].
    pub async fn append_project(&self, project: Project) -> Result<()> {
        let identity = self.claim_write()?;
        let mut projects = self.profile.get().projects;
        projects.push(project);

        let result = self
            .store
            .patch_field(
                &identity,
                ProfileField::Projects,
                FieldValue::Projects(projects.clone()),
            )
            .await;
        self.finish_patch(result, |profile| profile.projects = projects)
    }

    /// Flip the premium flag on the remote record, then locally.
    pub async fn upgrade_tier(&self) -> Result<()> {
        let identity = self.claim_write()?;
        let result = self
            .store
            .patch_field(&identity, ProfileField::IsPremium, FieldValue::Flag(true))
            .await;
        self.finish_patch(result, |profile| profile.is_premium = true)
    }

    /// Shared preamble for the patch operations: reject re-entrancy, require
    /// an identity, claim the save slot.
    fn claim_write(&self) -> Result<Identity> {
        if self.save.is_loading() {
            return Err(Error::SaveInFlight);
        }
        let Some(identity) = self.auth.current_identity() else {
            self.save.reject(Error::AuthRequired.to_string());
            return Err(Error::AuthRequired);
        };
        self.save.begin()?;
        Ok(identity)
    }

    /// Shared epilogue: apply the local mutation only on acknowledgment.
    fn finish_patch(
        &self,
        result: std::result::Result<(), TransportError>,
        apply: impl FnOnce(&mut UserProfile),
    ) -> Result<()> {
        match result {
            Ok(()) => {
                self.profile.update(apply);
                self.save.succeed();
                Ok(())
            }
            Err(err) => {
                self.save.fail(err.to_string());
                Err(err.into())
            }
        }
    }
}
