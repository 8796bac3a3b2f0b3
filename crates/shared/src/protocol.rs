use serde::{Deserialize, Serialize};

use crate::domain::{MinecraftVersionRange, PackSlug};

/// Name of the page-level meta tag carrying the slug of the pack being viewed.
pub const CURRENT_PACK_SLUG_META: &str = "current-pack-slug";

/// Multipart field the upload endpoint reads the archive from.
pub const UPLOAD_FILE_FIELD: &str = "file";

/// A partial update of a pack. Each variant is one logical field group and
/// serializes as a single-key object, e.g. `{"name": "My Pack"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PackUpdate {
    Name(String),
    Description(String),
    Minecraft(MinecraftVersionRange),
    Main(bool),
}

impl PackUpdate {
    pub fn key(&self) -> &'static str {
        match self {
            PackUpdate::Name(_) => "name",
            PackUpdate::Description(_) => "description",
            PackUpdate::Minecraft(_) => "minecraft",
            PackUpdate::Main(_) => "main",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticateRequest {
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticateResponse {
    #[serde(default)]
    pub success: bool,
}

/// Body of a successful upload or duplication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedirectResponse {
    #[serde(default)]
    pub redirect_url: Option<String>,
}

impl RedirectResponse {
    pub fn to(url: impl Into<String>) -> Self {
        Self {
            redirect_url: Some(url.into()),
        }
    }

    pub fn target(&self) -> Option<&str> {
        self.redirect_url.as_deref().filter(|url| !url.is_empty())
    }
}

pub fn pack_route(slug: &PackSlug) -> String {
    format!("/p/{slug}")
}

pub fn pack_upload_route(slug: &PackSlug) -> String {
    format!("/p/{slug}/upload")
}

pub fn pack_duplicate_route(slug: &PackSlug) -> String {
    format!("/p/{slug}/duplicate")
}

pub fn authenticate_route() -> &'static str {
    "/authenticate"
}
