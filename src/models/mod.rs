//! Data models for Hackfolio profiles.
//!
//! This module defines the core data structures:
//! - `UserProfile` - one user's editable profile record
//! - `Hackathon` / `Project` - append-only portfolio sub-records
//! - `EditBuffer` - unpersisted local copy of the fields being edited
//! - `DetailsForm` - the first-time details commit payload
//! - `ProfileField` / `FieldValue` - typed single-field patches
//!
//! Records serialize with the camelCase key names the mobile app already
//! stores remotely (`profileImageUrl`, `isPremium`, `githubLink`), so a
//! profile written by either client deserializes in the other.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::remote::Identity;

/// One user's editable profile.
///
/// Created empty on first load when no remote record exists, fetched from
/// the remote store on controller start, and mutated only through the
/// controller's commit and patch operations. `email` is always sourced from
/// the authenticated identity, never from user input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub name: String,

    /// Display handle.
    pub username: String,

    /// Set once from the authenticated identity; not user-editable.
    pub email: String,

    pub bio: String,

    /// College or affiliation.
    pub college: String,

    /// Empty, or a resolvable URL returned by the blob store.
    pub profile_image_url: String,

    /// Captured by the first-time details form; absent until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,

    /// Captured by the first-time details form; absent until then.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    pub hackathons: Vec<Hackathon>,

    pub projects: Vec<Project>,

    pub is_premium: bool,
}

impl UserProfile {
    /// Empty profile for a user with no remote record yet, with the email
    /// pre-filled from the authenticated identity.
    pub fn for_identity(identity: &Identity) -> Self {
        Self {
            email: identity.email.clone().unwrap_or_default(),
            ..Self::default()
        }
    }

    /// Apply a single-field patch to this record.
    ///
    /// Returns false when the value kind does not match the field.
    pub fn apply_field(&mut self, field: ProfileField, value: FieldValue) -> bool {
        match (field, value) {
            (ProfileField::ProfileImageUrl, FieldValue::Text(url)) => {
                self.profile_image_url = url;
            }
            (ProfileField::Hackathons, FieldValue::Hackathons(hackathons)) => {
                self.hackathons = hackathons;
            }
            (ProfileField::Projects, FieldValue::Projects(projects)) => {
                self.projects = projects;
            }
            (ProfileField::IsPremium, FieldValue::Flag(flag)) => {
                self.is_premium = flag;
            }
            _ => return false,
        }
        true
    }
}

/// A hackathon the user took part in. Append-only: entries are never edited
/// or removed once written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hackathon {
    /// Opaque unique id, generated client-side.
    pub id: String,
    pub name: String,
    pub description: String,
    pub date: String,
}

impl Hackathon {
    /// Create a new entry with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            date: date.into(),
        }
    }
}

/// A portfolio project. Append-only, like [`Hackathon`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Project {
    /// Opaque unique id, generated client-side.
    pub id: String,
    pub name: String,
    pub description: String,
    pub github_link: String,
}

impl Project {
    /// Create a new entry with a freshly generated id.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        github_link: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            github_link: github_link.into(),
        }
    }
}

/// Local, unpersisted copy of the editable profile fields.
///
/// Seeded from the authoritative profile when edit mode is entered,
/// discarded on cancel, merged back on successful commit. Never written to
/// the remote store directly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditBuffer {
    pub name: String,
    pub username: String,
    pub bio: String,
    pub college: String,
}

impl EditBuffer {
    /// Seed a buffer from the current authoritative profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            name: profile.name.clone(),
            username: profile.username.clone(),
            bio: profile.bio.clone(),
            college: profile.college.clone(),
        }
    }

    /// Overwrite one buffered field.
    pub fn set(&mut self, field: EditField, value: String) {
        match field {
            EditField::Name => self.name = value,
            EditField::Username => self.username = value,
            EditField::Bio => self.bio = value,
            EditField::College => self.college = value,
        }
    }

    /// The profile that a successful commit of this buffer produces.
    /// Non-editable fields are carried over from `profile` untouched.
    pub fn merge_into(&self, profile: &UserProfile) -> UserProfile {
        UserProfile {
            name: self.name.clone(),
            username: self.username.clone(),
            bio: self.bio.clone(),
            college: self.college.clone(),
            ..profile.clone()
        }
    }
}

/// The profile fields a UI may edit through the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditField {
    Name,
    Username,
    Bio,
    College,
}

/// The first-time details commit payload, exactly as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetailsForm {
    pub name: String,
    pub age: String,
    pub phone: String,
}

/// Profile fields addressable by a single-field remote patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    ProfileImageUrl,
    Hackathons,
    Projects,
    IsPremium,
}

impl ProfileField {
    /// The remote-store key for this field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfileImageUrl => "profileImageUrl",
            Self::Hackathons => "hackathons",
            Self::Projects => "projects",
            Self::IsPremium => "isPremium",
        }
    }
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Typed value for a single-field patch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// String field (image URL).
    Text(String),

    /// Boolean field (premium tier).
    Flag(bool),

    /// Full replacement hackathon sequence.
    Hackathons(Vec<Hackathon>),

    /// Full replacement project sequence.
    Projects(Vec<Project>),
}
