//! First-time details capture.
//!
//! A newly signed-up user has no remote profile record yet; before reaching
//! the home screen they fill in a short details form. [`DetailsController`]
//! holds the form fields, validates on save, and writes the initial record.
//! The UI watches [`SaveState`] to disable the save action while a write is
//! in flight and consumes the terminal outcome exactly once to navigate or
//! show the failure.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::{DetailsForm, UserProfile};
use crate::remote::{IdentityProvider, ProfileStore};
use crate::state::{SaveOutcome, SaveSlot, SaveState, StateCell};
use crate::validation;
use crate::Error;

/// Fallback message when a remote failure carries no message of its own.
const SAVE_FALLBACK_MESSAGE: &str = "Failed to save details";

/// Captures and persists the first-time user details.
pub struct DetailsController {
    auth: Arc<dyn IdentityProvider>,
    store: Arc<dyn ProfileStore>,

    name: StateCell<String>,
    age: StateCell<String>,
    phone: StateCell<String>,
    save: SaveSlot,
}

impl DetailsController {
    pub fn new(auth: Arc<dyn IdentityProvider>, store: Arc<dyn ProfileStore>) -> Self {
        Self {
            auth,
            store,
            name: StateCell::default(),
            age: StateCell::default(),
            phone: StateCell::default(),
            save: SaveSlot::new(),
        }
    }

    // ========== State surface ==========

    pub fn name(&self) -> String {
        self.name.get()
    }

    pub fn age(&self) -> String {
        self.age.get()
    }

    pub fn phone(&self) -> String {
        self.phone.get()
    }

    pub fn subscribe_name(&self) -> watch::Receiver<String> {
        self.name.subscribe()
    }

    pub fn subscribe_age(&self) -> watch::Receiver<String> {
        self.age.subscribe()
    }

    pub fn subscribe_phone(&self) -> watch::Receiver<String> {
        self.phone.subscribe()
    }

    pub fn save_state(&self) -> SaveState {
        self.save.state()
    }

    pub fn subscribe_save_state(&self) -> watch::Receiver<SaveState> {
        self.save.subscribe()
    }

    /// One-shot consumption of a terminal save outcome; see
    /// [`crate::state::SaveSlot::take_outcome`].
    pub fn take_save_outcome(&self) -> Option<SaveOutcome> {
        self.save.take_outcome()
    }

    // ========== Operations ==========

    pub fn update_name(&self, value: impl Into<String>) {
        self.name.set(value.into());
    }

    pub fn update_age(&self, value: impl Into<String>) {
        self.age.set(value.into());
    }

    pub fn update_phone(&self, value: impl Into<String>) {
        self.phone.set(value.into());
    }

    /// Validate the form and persist the initial profile record.
    ///
    /// A missing identity or a validation failure short-circuits straight
    /// to `SaveState::Error` without entering Loading or touching the
    /// remote store. Failures surface only through the save state; the UI
    /// consumes them via [`Self::take_save_outcome`].
    pub async fn save_details(&self) {
        if self.save.is_loading() {
            return;
        }
        let Some(identity) = self.auth.current_identity() else {
            self.save.reject(Error::AuthRequired.to_string());
            return;
        };

        let form = DetailsForm {
            name: self.name.get(),
            age: self.age.get(),
            phone: self.phone.get(),
        };
        if let Err(err) = validation::validate_details(&form) {
            self.save.reject(err.to_string());
            return;
        }

        if self.save.begin().is_err() {
            return;
        }

        // The initial record: form fields plus the email the identity
        // provider knows. Everything else starts at its default.
        let mut record = UserProfile::for_identity(&identity);
        record.name = form.name;
        record.age = Some(form.age);
        record.phone = Some(form.phone);

        match self.store.set(&identity, &record).await {
            Ok(()) => {
                debug!(uid = %identity.uid, "initial details saved");
                self.save.succeed();
            }
            Err(err) => {
                let message = if err.message.is_empty() {
                    SAVE_FALLBACK_MESSAGE.to_string()
                } else {
                    err.message
                };
                self.save.fail(message);
            }
        }
    }
}
