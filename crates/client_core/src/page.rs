//! Reading the editable state out of a rendered pack page.

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use scraper::{ElementRef, Html, Selector};
use shared::{
    domain::{MinecraftVersionRange, PackSlug},
    protocol::CURRENT_PACK_SLUG_META,
};

use crate::{
    display::{lines_from_rendered, render_heading},
    error::PageError,
    field::{EditableField, FieldKind},
    version_range::{VersionOption, VersionSelect},
};

const TIMESTAMP_FORMAT: &str = "%b %-d, %Y, %H:%M:%S";

const SLUG_SELECTOR: &str = r#"meta[name="current-pack-slug"]"#;
const TIME_SELECTOR: &str = "time[datetime]";
const TITLE_SELECTOR: &str = "h1#title";
const DESCRIPTION_SELECTOR: &str = "#description";
const VERSION_OPTION_SELECTOR: &str = "select#mc-version-range option";
const MIN_VERSION_SELECTOR: &str = "input#edit-min-version";
const MAX_VERSION_SELECTOR: &str = "input#edit-max-version";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    pub slug: PackSlug,
    /// `datetime` attributes of the page's `<time>` elements, in document order.
    pub timestamps: Vec<String>,
    pub title: Option<String>,
    /// Texts of the description's line elements; the empty-line marker is kept as is.
    pub description_lines: Option<Vec<String>>,
    pub version_options: Vec<VersionOption>,
    /// Values of the minimum/maximum inputs, when the page has both.
    pub version_inputs: Option<MinecraftVersionRange>,
}

impl PageMetadata {
    pub fn from_html(html: &str) -> Result<Self, PageError> {
        let document = Html::parse_document(html);

        let slug = document
            .select(&selector(SLUG_SELECTOR)?)
            .filter_map(|meta| meta.value().attr("content"))
            .map(str::trim)
            .find(|slug| !slug.is_empty())
            .ok_or(PageError::MissingSlug {
                meta: CURRENT_PACK_SLUG_META,
            })?;

        let timestamps = document
            .select(&selector(TIME_SELECTOR)?)
            .filter_map(|time| time.value().attr("datetime"))
            .map(str::to_string)
            .collect();

        let title = document
            .select(&selector(TITLE_SELECTOR)?)
            .next()
            .map(|heading| text_of(heading).trim().to_string());

        let description_lines = document
            .select(&selector(DESCRIPTION_SELECTOR)?)
            .next()
            .map(line_texts);

        let version_options = document
            .select(&selector(VERSION_OPTION_SELECTOR)?)
            .filter_map(version_option)
            .collect();

        let min_version = input_value(&document, MIN_VERSION_SELECTOR)?;
        let max_version = input_value(&document, MAX_VERSION_SELECTOR)?;
        let version_inputs = min_version
            .zip(max_version)
            .map(|(minimum, maximum)| MinecraftVersionRange::new(minimum, maximum));

        Ok(Self {
            slug: PackSlug::new(slug),
            timestamps,
            title,
            description_lines,
            version_options,
            version_inputs,
        })
    }

    /// The page's timestamps in the local timezone; unparseable ones are skipped.
    pub fn localized_timestamps(&self) -> Vec<String> {
        self.timestamps
            .iter()
            .filter_map(|iso| localize_timestamp(iso))
            .collect()
    }

    pub fn title_field(&self) -> Option<EditableField> {
        let title = self.title.as_deref()?;
        let kind = FieldKind::Title;
        Some(EditableField::from_display(
            kind,
            render_heading(kind.element_id(), title),
        ))
    }

    pub fn description_field(&self) -> Option<EditableField> {
        let lines = self.description_lines.as_ref()?;
        let kind = FieldKind::Description;
        Some(EditableField::from_display(
            kind,
            lines_from_rendered(kind.element_id(), lines.iter().map(String::as_str)),
        ))
    }

    /// The version selection control, pointed at the option of this page's pack.
    pub fn version_select(&self) -> VersionSelect {
        let mut select = VersionSelect::new(self.version_options.clone());
        select.sync_to_slug(&self.slug);
        select
    }
}

fn selector(css: &'static str) -> Result<Selector, PageError> {
    Selector::parse(css).map_err(|err| PageError::Selector {
        selector: css,
        message: format!("{err:?}"),
    })
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// One entry per child element; a description without children is split on newlines.
fn line_texts(description: ElementRef<'_>) -> Vec<String> {
    let children: Vec<String> = description
        .children()
        .filter_map(ElementRef::wrap)
        .map(|line| text_of(line).trim().to_string())
        .collect();
    if !children.is_empty() {
        return children;
    }

    text_of(description)
        .trim()
        .split('\n')
        .map(|line| line.trim().to_string())
        .collect()
}

fn version_option(option: ElementRef<'_>) -> Option<VersionOption> {
    let element = option.value();
    let slug = element.attr("data-slug")?.trim();
    let label = text_of(option).trim().to_string();
    Some(VersionOption {
        value: element.attr("value").unwrap_or(&label).to_string(),
        slug: PackSlug::new(slug),
        tags: element
            .attr("data-tags")
            .map(str::trim)
            .filter(|tags| !tags.is_empty())
            .map(str::to_string),
        label,
    })
}

fn input_value(document: &Html, css: &'static str) -> Result<Option<String>, PageError> {
    Ok(document
        .select(&selector(css)?)
        .next()
        .and_then(|input| input.value().attr("value"))
        .map(|value| value.trim().to_string()))
}

/// Renders a server timestamp in the local timezone, e.g. `Mar 4, 2025, 17:02:09`.
pub fn localize_timestamp(iso: &str) -> Option<String> {
    format_timestamp_in(iso, &Local)
}

pub fn format_timestamp_in<Tz>(iso: &str, tz: &Tz) -> Option<String>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let parsed = parse_timestamp(iso.trim())?;
    Some(
        parsed
            .with_timezone(tz)
            .format(TIMESTAMP_FORMAT)
            .to_string(),
    )
}

fn parse_timestamp(iso: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(iso)
        .or_else(|_| DateTime::parse_from_str(iso, "%Y-%m-%d %H:%M:%S%.f%:z"))
        .ok()
}

#[cfg(test)]
#[path = "tests/page_tests.rs"]
mod tests;
