use std::sync::Arc;

use reqwest::{
    multipart::{Form, Part},
    Method,
};
use serde_json::{json, Value};
use shared::{
    domain::PackSlug,
    protocol::{
        authenticate_route, pack_duplicate_route, pack_route, pack_upload_route,
        AuthenticateRequest, AuthenticateResponse, PackUpdate, RedirectResponse,
        UPLOAD_FILE_FIELD,
    },
};
use tracing::{error, info, warn};

use crate::{
    error::GatewayError,
    gateway::{Gateway, RequestBody},
    host::{PageHost, ADMIN_POPUP_ID},
};

pub const UNLISTED_NOTICE: &str = "Pack will no longer be shown in the main selection list";
pub const AUTH_FAILED_NOTICE: &str = "Auth failed";

const ARCHIVE_MIME: &str = "application/zip";

#[derive(Debug, Clone)]
pub struct ArchiveUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct UploadInput {
    selected: Option<ArchiveUpload>,
}

impl UploadInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears any earlier pick so choosing the same file again still counts.
    pub fn clear(&mut self) {
        self.selected = None;
    }

    pub fn select(&mut self, archive: ArchiveUpload) {
        self.selected = Some(archive);
    }

    pub fn selected(&self) -> Option<&ArchiveUpload> {
        self.selected.as_ref()
    }
}

pub struct PackConsole {
    gateway: Gateway,
    host: Arc<dyn PageHost>,
    slug: PackSlug,
}

impl PackConsole {
    pub fn new(gateway: Gateway, host: Arc<dyn PageHost>, slug: PackSlug) -> Self {
        Self {
            gateway,
            host,
            slug,
        }
    }

    pub fn slug(&self) -> &PackSlug {
        &self.slug
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// PATCHes one field group. Any failure is alerted and the page is reloaded so
    /// it re-renders from server state.
    pub async fn patch_update(&self, update: &PackUpdate) -> Result<Value, GatewayError> {
        self.send_patch(update).await.map_err(|err| {
            error!(slug = %self.slug, field = update.key(), error = %err, "update failed");
            self.host.alert(&format!("Update Failed: {err}"));
            self.host.reload();
            err
        })
    }

    async fn send_patch(&self, update: &PackUpdate) -> Result<Value, GatewayError> {
        let body = RequestBody::json(update)?;
        self.gateway
            .call(Method::PATCH, &pack_route(&self.slug), body)
            .await
    }

    /// Uploads the selected archive as the pack's replacement. Returns `None`
    /// without a request when nothing is selected.
    pub async fn upload_archive(
        &self,
        input: &UploadInput,
    ) -> Result<Option<String>, GatewayError> {
        let Some(archive) = input.selected() else {
            return Ok(None);
        };

        let result = self.send_archive(archive).await;
        self.require_redirect(result, "Upload", "Upload succeeded")
            .map(Some)
    }

    async fn send_archive(&self, archive: &ArchiveUpload) -> Result<Value, GatewayError> {
        let part = Part::bytes(archive.bytes.clone())
            .file_name(archive.file_name.clone())
            .mime_str(ARCHIVE_MIME)?;
        let form = Form::new().part(UPLOAD_FILE_FIELD, part);
        info!(slug = %self.slug, file = %archive.file_name, "uploading pack archive");
        self.gateway
            .call(Method::POST, &pack_upload_route(&self.slug), form.into())
            .await
    }

    pub async fn duplicate(&self) -> Result<String, GatewayError> {
        let result = self
            .gateway
            .call(
                Method::POST,
                &pack_duplicate_route(&self.slug),
                RequestBody::Json(json!({})),
            )
            .await;
        self.require_redirect(result, "Duplicate", "Duplication succeeded")
    }

    pub async fn unlist(&self) -> Result<(), GatewayError> {
        self.patch_update(&PackUpdate::Main(false)).await?;
        info!(slug = %self.slug, "pack unlisted");
        self.host.alert(UNLISTED_NOTICE);
        self.host.reload();
        Ok(())
    }

    /// Submits an admin token. Returns whether the server accepted it.
    pub async fn authenticate(&self, token: &str) -> bool {
        let accepted = match self.send_token(token).await {
            Ok(data) => serde_json::from_value::<AuthenticateResponse>(data)
                .map(|response| response.success)
                .unwrap_or(false),
            Err(err) => {
                warn!(error = %err, "authentication rejected");
                false
            }
        };

        if accepted {
            info!("authenticated");
            self.host.hide_popup(ADMIN_POPUP_ID);
            self.host.reload();
        } else {
            self.host.alert(AUTH_FAILED_NOTICE);
        }
        accepted
    }

    async fn send_token(&self, token: &str) -> Result<Value, GatewayError> {
        let body = RequestBody::json(&AuthenticateRequest {
            token: token.to_string(),
        })?;
        self.gateway
            .call(Method::POST, authenticate_route(), body)
            .await
    }

    fn require_redirect(
        &self,
        result: Result<Value, GatewayError>,
        action: &str,
        succeeded: &str,
    ) -> Result<String, GatewayError> {
        let checked = result.and_then(|data| {
            serde_json::from_value::<RedirectResponse>(data)
                .ok()
                .and_then(|response| response.target().map(str::to_string))
                .ok_or_else(|| {
                    GatewayError::application(format!(
                        "{succeeded}, but no redirect URL was provided."
                    ))
                })
        });

        checked.map_err(|err| {
            error!(slug = %self.slug, error = %err, "{action} error");
            self.host.alert(&format!("{action} failed:{err}"));
            err
        })
    }
}

#[cfg(test)]
#[path = "tests/console_tests.rs"]
mod tests;
