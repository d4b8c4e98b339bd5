//! Photo picker CLI: lists, pages through, or searches photos and can pick
//! one of them.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use ortho_config::OrthoConfig;
use photo_picker::api::{Completion, FeedSnapshot, Photo, append_referral};
use photo_picker::{
    ClientError, HttpTransport, PhotoClient, PickerConfig, PickerSession, QueryMode,
    RequestBuilder,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), ClientError> {
    let config = load_config()?;
    config.validate()?;

    let credential = config.resolve_access_key()?;
    let requests = RequestBuilder::parse(config.api_base())?;
    let transport = Arc::new(HttpTransport::new(config.timeout())?);
    let session = PickerSession::new(
        PhotoClient::new(transport, requests, Some(credential)),
        config.per_page,
    );

    let mode = config.query_mode();
    if let Some(phrase) = config.search_phrase() {
        session.search(&phrase);
    }

    load_pages(&session, mode, config.pages).await?;
    let snapshot = session.snapshot(mode);
    write_listing(&snapshot)?;

    let Some(index) = config.pick else {
        return Ok(());
    };
    let picked = session
        .pick(mode, index)
        .ok_or_else(|| ClientError::Configuration {
            message: format!(
                "cannot pick photo {index}: only {} photos were loaded",
                snapshot.photos.len()
            ),
        })?;
    write_pick(&picked.photo, &config.app_name)?;

    if let Some(notification) = picked.notification
        && let Err(error) = notification.await
    {
        tracing::warn!(%error, "download notification task did not finish");
    }
    Ok(())
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`ClientError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PickerConfig, ClientError> {
    PickerConfig::load().map_err(|error| ClientError::Configuration {
        message: error.to_string(),
    })
}

/// Loads up to `pages` pages, stopping early at an empty page or the end of
/// a search.
async fn load_pages(
    session: &PickerSession<HttpTransport>,
    mode: QueryMode,
    pages: u32,
) -> Result<(), ClientError> {
    for _ in 0..pages {
        let Some(load) = session.load_next(mode) else {
            break;
        };
        match load.await {
            Completion::Merged { appended: 0 } | Completion::Stale => break,
            Completion::Merged { .. } => {}
            Completion::Failed(error) => return Err(error),
        }
    }
    Ok(())
}

fn write_listing(snapshot: &FeedSnapshot) -> Result<(), ClientError> {
    let mut stdout = io::stdout().lock();
    let heading = snapshot.search_phrase.as_deref().map_or_else(
        || format!("{} photos", snapshot.mode),
        |phrase| format!("search results for \"{phrase}\""),
    );
    let more = if snapshot.has_more {
        "more available"
    } else {
        "no more pages"
    };
    writeln!(stdout, "{heading}: {} loaded, {more}", snapshot.photos.len()).map_err(io_error)?;

    for (index, photo) in snapshot.photos.iter().enumerate() {
        let (width, height) = photo.size();
        writeln!(
            stdout,
            "{index:>4}  {id}  {width}x{height}  {color}  {likes:>5} likes  {author}  {caption}",
            id = photo.id,
            color = photo.color,
            likes = photo.likes,
            author = photo.user.name,
            caption = photo.description.as_deref().unwrap_or(""),
        )
        .map_err(io_error)?;
    }
    Ok(())
}

fn write_pick(photo: &Photo, app_name: &str) -> Result<(), ClientError> {
    let mut stdout = io::stdout().lock();
    let message = format!(
        "Picked {id} by {author}\nImage: {image}\nPhoto page: {page}\nPhotographer: {profile}",
        id = photo.id,
        author = photo.user.name,
        image = photo.urls.regular,
        page = append_referral(&photo.links.html, app_name),
        profile = append_referral(&photo.user.links.html, app_name),
    );
    writeln!(stdout, "{message}").map_err(io_error)
}

fn io_error(error: io::Error) -> ClientError {
    ClientError::Io {
        message: error.to_string(),
    }
}
