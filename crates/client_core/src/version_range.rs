use shared::{
    domain::{MinecraftVersionRange, PackSlug},
    protocol::PackUpdate,
};
use tracing::{info, warn};

use crate::{console::PackConsole, error::GatewayError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionOption {
    pub value: String,
    pub slug: PackSlug,
    pub label: String,
    /// Auxiliary tag text appended to the label, e.g. `(latest)`.
    pub tags: Option<String>,
}

pub fn option_label(range: &MinecraftVersionRange, tags: Option<&str>) -> String {
    match tags.filter(|tags| !tags.is_empty()) {
        Some(tags) => format!("{range} {tags}"),
        None => range.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct VersionSelect {
    options: Vec<VersionOption>,
    selected: Option<usize>,
}

impl VersionSelect {
    pub fn new(options: Vec<VersionOption>) -> Self {
        let selected = if options.is_empty() { None } else { Some(0) };
        Self { options, selected }
    }

    pub fn options(&self) -> &[VersionOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&VersionOption> {
        self.selected.and_then(|index| self.options.get(index))
    }

    /// Selects the option that belongs to `slug`. Browsers restore a stale
    /// selection on back navigation, so this runs on every page show.
    pub fn sync_to_slug(&mut self, slug: &PackSlug) -> bool {
        match self.options.iter().position(|option| &option.slug == slug) {
            Some(index) => {
                self.selected = Some(index);
                true
            }
            None => false,
        }
    }

    fn relabel_selected(&mut self, range: &MinecraftVersionRange) {
        let Some(option) = self.selected.and_then(|index| self.options.get_mut(index)) else {
            warn!("no version option selected; label left unchanged");
            return;
        };
        option.label = option_label(range, option.tags.as_deref());
    }
}

#[derive(Debug, Clone)]
pub struct VersionRangeEditor {
    pub minimum: String,
    pub maximum: String,
    select: VersionSelect,
}

impl VersionRangeEditor {
    pub fn new(range: MinecraftVersionRange, select: VersionSelect) -> Self {
        Self {
            minimum: range.minimum,
            maximum: range.maximum,
            select,
        }
    }

    pub fn range(&self) -> MinecraftVersionRange {
        MinecraftVersionRange::new(self.minimum.clone(), self.maximum.clone())
    }

    pub fn select(&self) -> &VersionSelect {
        &self.select
    }

    pub fn select_mut(&mut self) -> &mut VersionSelect {
        &mut self.select
    }

    /// Sends the current inputs; on success the selected option shows the new range.
    /// Failures take the console's alert-and-reload path.
    pub async fn submit(&mut self, console: &PackConsole) -> Result<(), GatewayError> {
        let range = self.range();
        console
            .patch_update(&PackUpdate::Minecraft(range.clone()))
            .await?;
        info!(%range, "version range updated");
        self.select.relabel_selected(&range);
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/version_range_tests.rs"]
mod tests;
