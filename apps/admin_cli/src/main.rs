use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    ArchiveUpload, EditableField, FieldKind, Gateway, PackConsole, PageMetadata, UploadInput,
    VersionRangeEditor,
};
use shared::{
    domain::{MinecraftVersionRange, PackSlug},
    protocol::pack_route,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod host;

use config::load_settings;
use host::TerminalHost;

#[derive(Parser, Debug)]
#[command(name = "pack-admin", about = "Edit pack metadata on a pack server")]
struct Cli {
    #[arg(long, default_value = "admin.toml")]
    config: PathBuf,
    #[arg(long)]
    server_url: Option<String>,
    /// Admin token sent as the session cookie.
    #[arg(long)]
    token: Option<String>,
    /// Pack to operate on. Defaults to the pack the server lists as main.
    #[arg(long)]
    slug: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the pack's slug, title, version range and timestamps.
    Inspect,
    /// Rename the pack. A blank value keeps the current title.
    Title { value: String },
    /// Replace the pack description. Newlines separate lines.
    Description { value: String },
    /// Set the supported Minecraft version range. Omitted bounds keep the page's values.
    Versions {
        #[arg(long)]
        minimum: Option<String>,
        #[arg(long)]
        maximum: Option<String>,
    },
    /// Upload a replacement archive.
    Upload { path: PathBuf },
    /// Copy the pack under a new slug.
    Duplicate,
    /// Remove the pack from the main selection list.
    Unlist,
    /// Exchange an admin token for a session.
    Authenticate { token: Option<String> },
}

async fn resolve_slug(gateway: &Gateway, slug: Option<String>) -> Result<PackSlug> {
    if let Some(slug) = slug {
        return Ok(PackSlug::new(slug));
    }
    let html = gateway
        .fetch_page("/")
        .await
        .context("failed to load the main pack page")?;
    Ok(PageMetadata::from_html(&html)?.slug)
}

async fn load_page(gateway: &Gateway, slug: &PackSlug) -> Result<PageMetadata> {
    let html = gateway
        .fetch_page(&format!("{}?dl=0", pack_route(slug)))
        .await
        .with_context(|| format!("failed to load the page of pack {slug}"))?;
    Ok(PageMetadata::from_html(&html)?)
}

fn editable_field(page: &PageMetadata, kind: FieldKind) -> Result<EditableField> {
    let field = match kind {
        FieldKind::Title => page.title_field(),
        FieldKind::Description => page.description_field(),
    };
    field.with_context(|| format!("page has no `{}` element to edit", kind.element_id()))
}

fn version_editor(
    page: &PageMetadata,
    minimum: Option<String>,
    maximum: Option<String>,
) -> Result<VersionRangeEditor> {
    let shown = page.version_inputs.as_ref();
    let minimum = minimum.or_else(|| shown.map(|range| range.minimum.clone()));
    let maximum = maximum.or_else(|| shown.map(|range| range.maximum.clone()));
    let (Some(minimum), Some(maximum)) = (minimum, maximum) else {
        bail!("page shows no version range; pass --minimum and --maximum");
    };
    Ok(VersionRangeEditor::new(
        MinecraftVersionRange::new(minimum, maximum),
        page.version_select(),
    ))
}

async fn edit_field(mut field: EditableField, value: String, console: &PackConsole) -> Result<()> {
    field.activate()?;
    field.input(value)?;
    field.blur(console).await?;
    if let Some(display) = field.display() {
        for line in display.visual_lines() {
            println!("{line}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(&cli.config)?;
    if let Some(server_url) = cli.server_url {
        settings.server_url = server_url;
    }
    if let Some(token) = cli.token {
        settings.token = Some(token);
    }

    let host = Arc::new(TerminalHost::default());
    let mut gateway = Gateway::new(&settings.server_url, host.clone())
        .with_context(|| format!("invalid server url '{}'", settings.server_url))?;
    if let Some(token) = &settings.token {
        gateway = gateway.with_session_token(token);
    }

    let slug = resolve_slug(&gateway, cli.slug).await?;
    info!(%slug, server_url = %settings.server_url, "operating on pack");
    let console = PackConsole::new(gateway, host.clone(), slug.clone());

    match cli.command {
        Command::Inspect => {
            let page = load_page(console.gateway(), &slug).await?;
            println!("slug: {}", page.slug);
            if let Some(title) = &page.title {
                println!("title: {title}");
            }
            if let Some(range) = &page.version_inputs {
                println!("versions: {range}");
            }
            for timestamp in page.localized_timestamps() {
                println!("time: {timestamp}");
            }
        }
        Command::Title { value } => {
            let page = load_page(console.gateway(), &slug).await?;
            edit_field(editable_field(&page, FieldKind::Title)?, value, &console).await?;
        }
        Command::Description { value } => {
            let page = load_page(console.gateway(), &slug).await?;
            edit_field(editable_field(&page, FieldKind::Description)?, value, &console).await?;
        }
        Command::Versions { minimum, maximum } => {
            let page = load_page(console.gateway(), &slug).await?;
            let mut editor = version_editor(&page, minimum, maximum)?;
            editor.submit(&console).await?;
            match editor.select().selected() {
                Some(option) if option.slug == slug => println!("{}", option.label),
                _ => println!("{}", editor.range()),
            }
        }
        Command::Upload { path } => {
            let bytes = tokio::fs::read(&path)
                .await
                .with_context(|| format!("failed to read '{}'", path.display()))?;
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "pack.zip".to_string());

            let mut input = UploadInput::new();
            input.clear();
            input.select(ArchiveUpload { file_name, bytes });
            if let Some(redirect) = console.upload_archive(&input).await? {
                println!("{redirect}");
            }
        }
        Command::Duplicate => {
            let redirect = console.duplicate().await?;
            println!("{redirect}");
        }
        Command::Unlist => console.unlist().await?,
        Command::Authenticate { token } => {
            let Some(token) = token.or(settings.token) else {
                bail!("no token given and none configured");
            };
            if !console.authenticate(&token).await {
                bail!("server rejected the token");
            }
        }
    }

    if let Some(url) = host.navigated_to() {
        println!("-> {url}");
    }
    if host.reload_requested() {
        info!("server state changed; re-run `inspect` to see it");
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
