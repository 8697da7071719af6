//! Firebase REST adapters for the remote profile and blob stores.
//!
//! The mobile app keeps profile records under `users/<uid>` in the Realtime
//! Database and profile images under `profile_images/<uid>` in Cloud
//! Storage. These adapters speak the corresponding REST endpoints:
//! - records: `GET`/`PUT` `{database_url}/users/<uid>.json`, single-field
//!   patches via `PUT` `{database_url}/users/<uid>/<field>.json`
//! - images: media upload to the Storage `o` endpoint, returning a
//!   tokenized download URL
//!
//! Every failure is surfaced as a [`TransportError`]; callers decide what a
//! failed call means for local state.

use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use crate::models::{FieldValue, ProfileField, UserProfile};
use crate::remote::{BlobStore, Identity, ProfileStore, TransportError};

/// Cloud Storage REST API base.
pub const DEFAULT_STORAGE_API_BASE: &str = "https://firebasestorage.googleapis.com/v0";

/// Database path holding one record per uid.
const USERS_PATH: &str = "users";

/// Storage folder holding one image object per uid.
const PROFILE_IMAGES_PATH: &str = "profile_images";

fn transport(err: reqwest::Error) -> TransportError {
    TransportError::new(err.to_string())
}

/// Fail unless the response status is a success.
async fn check_status(
    resp: reqwest::Response,
    what: &str,
) -> Result<reqwest::Response, TransportError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(TransportError::new(format!(
        "{what} failed: HTTP {status}: {body}"
    )))
}

/// Profile record store backed by the Realtime Database REST API.
#[derive(Debug, Clone)]
pub struct FirebaseProfileStore {
    client: reqwest::Client,
    database_url: String,
}

impl FirebaseProfileStore {
    /// `database_url` is the database root, e.g.
    /// `https://hackfolio-default-rtdb.firebaseio.com`.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            database_url: database_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn record_url(&self, uid: &str) -> String {
        format!("{}/{USERS_PATH}/{uid}.json", self.database_url)
    }

    fn field_url(&self, uid: &str, field: ProfileField) -> String {
        format!("{}/{USERS_PATH}/{uid}/{field}.json", self.database_url)
    }
}

#[async_trait]
impl ProfileStore for FirebaseProfileStore {
    async fn get(&self, identity: &Identity) -> Result<Option<UserProfile>, TransportError> {
        let resp = self
            .client
            .get(self.record_url(&identity.uid))
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp, "profile fetch").await?;

        // The database answers `null` for an absent record.
        let value: serde_json::Value = resp.json().await.map_err(transport)?;
        if value.is_null() {
            return Ok(None);
        }
        let profile = serde_json::from_value(value)
            .map_err(|err| TransportError::new(format!("malformed profile record: {err}")))?;
        Ok(Some(profile))
    }

    async fn set(&self, identity: &Identity, profile: &UserProfile) -> Result<(), TransportError> {
        let resp = self
            .client
            .put(self.record_url(&identity.uid))
            .json(profile)
            .send()
            .await
            .map_err(transport)?;
        check_status(resp, "profile write").await?;
        Ok(())
    }

    async fn patch_field(
        &self,
        identity: &Identity,
        field: ProfileField,
        value: FieldValue,
    ) -> Result<(), TransportError> {
        let resp = self
            .client
            .put(self.field_url(&identity.uid, field))
            .json(&value)
            .send()
            .await
            .map_err(transport)?;
        check_status(resp, "profile patch").await?;
        Ok(())
    }
}

/// Metadata returned by a Storage media upload.
#[derive(Debug, Deserialize)]
struct UploadMetadata {
    name: String,
    #[serde(rename = "downloadTokens")]
    download_tokens: Option<String>,
}

/// Profile image store backed by the Cloud Storage REST API.
#[derive(Debug, Clone)]
pub struct FirebaseBlobStore {
    client: reqwest::Client,
    api_base: String,
    bucket: String,
}

impl FirebaseBlobStore {
    /// `bucket` is the Storage bucket name, e.g. `hackfolio.appspot.com`.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self::with_api_base(DEFAULT_STORAGE_API_BASE, bucket)
    }

    pub fn with_api_base(api_base: impl Into<String>, bucket: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            bucket: bucket.into(),
        }
    }

    fn upload_url(&self, object: &str) -> String {
        format!(
            "{}/b/{}/o?uploadType=media&name={object}",
            self.api_base, self.bucket
        )
    }

    /// Tokenized download URL for an uploaded object. The object path is a
    /// single URL segment, so its slashes are percent-encoded.
    fn download_url(&self, metadata: &UploadMetadata) -> String {
        let object = metadata.name.replace('/', "%2F");
        let mut url = format!("{}/b/{}/o/{object}?alt=media", self.api_base, self.bucket);
        if let Some(token) = &metadata.download_tokens {
            url.push_str("&token=");
            url.push_str(token);
        }
        url
    }
}

#[async_trait]
impl BlobStore for FirebaseBlobStore {
    async fn upload(&self, identity: &Identity, blob: &Path) -> Result<String, TransportError> {
        let bytes = tokio::fs::read(blob).await.map_err(|err| {
            TransportError::new(format!("failed to read {}: {err}", blob.display()))
        })?;

        // One image object per user; a re-upload replaces it.
        let object = format!("{PROFILE_IMAGES_PATH}/{}", identity.uid);
        let resp = self
            .client
            .post(self.upload_url(&object))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bytes)
            .send()
            .await
            .map_err(transport)?;
        let resp = check_status(resp, "image upload").await?;

        let metadata: UploadMetadata = resp.json().await.map_err(transport)?;
        Ok(self.download_url(&metadata))
    }
}
