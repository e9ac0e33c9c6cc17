//! Object storage: upload, public URL, removal, all scoped to one bucket.

use reqwest::RequestBuilder;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};

use super::{SupabaseClient, SupabaseError};

const CACHE_SECONDS: u32 = 3600;
const SERVICE_IMAGE_PREFIX: &str = "services";

/// Object path for a newly uploaded service image, e.g.
/// `services/service_1767225600000.png`.
#[must_use]
pub fn service_image_path(unix_millis: i128, extension: &str) -> String {
    format!("{SERVICE_IMAGE_PREFIX}/service_{unix_millis}.{extension}")
}

impl SupabaseClient {
    pub(crate) fn upload_request(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: Option<&str>,
    ) -> RequestBuilder {
        let url = self.endpoint(&format!("storage/v1/object/{}/{path}", self.bucket));
        let request = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, format!("max-age={CACHE_SECONDS}"))
            .header("x-upsert", "false")
            .body(bytes);
        self.authorize(request, access_token)
    }

    pub(crate) fn remove_request(&self, paths: &[String], access_token: Option<&str>) -> RequestBuilder {
        let url = self.endpoint(&format!("storage/v1/object/{}", self.bucket));
        let request = self
            .http
            .delete(url)
            .json(&serde_json::json!({ "prefixes": paths }));
        self.authorize(request, access_token)
    }

    /// Publicly reachable URL of an object in the bucket.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        self.endpoint(&format!("storage/v1/object/public/{}/{}", self.bucket, path.trim_start_matches('/')))
    }

    /// Recover the object path from a public URL produced by [`Self::public_url`].
    ///
    /// # Errors
    ///
    /// Returns [`SupabaseError::InvalidStorageUrl`] when the URL does not contain
    /// the bucket segment or names nothing after it.
    pub fn object_path_from_url(&self, public_url: &str) -> Result<String, SupabaseError> {
        let marker = format!("{}/", self.bucket);
        match public_url.split_once(&marker) {
            Some((_, path)) if !path.is_empty() => Ok(path.to_owned()),
            _ => Err(SupabaseError::InvalidStorageUrl),
        }
    }

    /// Upload a new object; never overwrites an existing one.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status (including a name clash).
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        access_token: Option<&str>,
    ) -> Result<(), SupabaseError> {
        self.send(self.upload_request(path, bytes, content_type, access_token))
            .await
            .map(|_| ())
    }

    /// Remove objects by path.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or non-2xx status.
    pub async fn remove(&self, paths: &[String], access_token: Option<&str>) -> Result<(), SupabaseError> {
        self.send(self.remove_request(paths, access_token))
            .await
            .map(|_| ())
    }
}
