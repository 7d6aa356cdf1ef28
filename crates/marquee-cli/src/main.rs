//! marquee - browse TMDB movie and TV rows from the terminal.

/// Browsing session state.
mod browse;
/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_api::catalog::{CatalogClient, CatalogItem, LocalCatalogApi, MediaUrls};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::browse::{BrowseCommand, BrowseSession, HELP, HomeRows, Section};
use crate::config::{API_KEY_ENV, AppConfig};

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Show the featured title and the home rows.
    Home(HomeArgs),
    /// Browse interactively (commands are read from stdin).
    Browse,
    /// Show the featured title.
    Featured,
    /// Search movies by title.
    Search(SearchArgs),
    /// List movies of a genre.
    Genre(GenreArgs),
    /// Show the trailer of a movie.
    Trailer(TrailerArgs),
    /// Build image URLs from path fragments (no API key needed).
    Images(ImagesArgs),
}

/// Arguments for the `home` subcommand.
#[derive(clap::Args)]
struct HomeArgs {
    /// Simulate a logged-in user.
    #[arg(long)]
    login: bool,
    /// Comma-separated IDs to put in My List (requires --login).
    #[arg(long, value_delimiter = ',')]
    my_list: Vec<u64>,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "The Wild Robot").
    #[arg(long, required = true)]
    query: String,
}

/// Arguments for the `genre` subcommand.
#[derive(clap::Args)]
struct GenreArgs {
    /// TMDB genre ID (e.g. 878 for science fiction).
    #[arg(long, required = true)]
    id: u32,
}

/// Arguments for the `trailer` subcommand.
#[derive(clap::Args)]
struct TrailerArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: u64,
    /// Open the trailer in the default browser.
    #[arg(long)]
    open: bool,
}

/// Arguments for the `images` subcommand.
#[derive(clap::Args)]
struct ImagesArgs {
    /// Poster path fragment (e.g. "/x.jpg").
    #[arg(long)]
    poster: Option<String>,
    /// Backdrop path fragment.
    #[arg(long)]
    backdrop: Option<String>,
    /// Trailer key.
    #[arg(long)]
    trailer_key: Option<String>,
}

/// Loads the config file from `--dir` or the default location.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be parsed.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = AppConfig::path(dir.map(PathBuf::as_path))?;
    tracing::debug!(path = %path.display(), "loading config");
    AppConfig::load(&path)
}

/// Builds a `CatalogClient` from the config and the `TMDB_API_KEY` environment variable.
///
/// # Errors
///
/// Returns an error if no API key is available, the base URL is invalid,
/// or the client fails to build.
#[instrument(skip_all)]
fn build_catalog_client(config: &AppConfig) -> Result<CatalogClient> {
    let api_key = config
        .tmdb
        .resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let mut builder = CatalogClient::builder()
        .api_key(api_key)
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .media_urls(config.tmdb.media_urls());
    if let Some(url) = config.tmdb.parsed_base_url()? {
        builder = builder.base_url(url);
    }
    if let Some(ref language) = config.tmdb.language {
        builder = builder.language(language.clone());
    }

    builder.build().context("failed to build TMDB client")
}

/// Logs one item as a row entry.
fn render_item(urls: &MediaUrls, item: &CatalogItem, in_list: bool) {
    let year = item
        .release_year()
        .map_or_else(|| String::from("-"), |y| y.to_string());
    tracing::info!(
        "  {}\t{} ({})\t* {}{}\t{}",
        item.id,
        item.title,
        year,
        item.rating_label(),
        if in_list { "\t[My List]" } else { "" },
        urls.poster_url(item.poster_path.as_deref()),
    );
}

/// Logs the featured banner.
fn render_featured(urls: &MediaUrls, featured: Option<&CatalogItem>) {
    let Some(item) = featured else {
        tracing::info!("No featured title available");
        return;
    };
    let year = item
        .release_year()
        .map_or_else(|| String::from("-"), |y| y.to_string());
    tracing::info!("Featured: {} ({}) * {}", item.title, year, item.rating_label());
    if !item.overview.is_empty() {
        tracing::info!("  {}", item.overview);
    }
    tracing::info!(
        "  backdrop: {}",
        urls.backdrop_url(item.backdrop_path.as_deref())
    );
}

/// Logs non-empty sections, then the empty-state notice if any.
fn render_sections(urls: &MediaUrls, session: &BrowseSession, rows: &HomeRows) {
    for Section { title, items } in session.sections(rows) {
        if items.is_empty() {
            continue;
        }
        tracing::info!("== {} ({}) ==", title, items.len());
        for item in &items {
            render_item(urls, item, session.is_in_list(item.id));
        }
    }
    if let Some(notice) = session.empty_notice(rows) {
        tracing::info!("{}", notice);
    }
}

/// Logs the featured banner (when not searching) and the sections.
fn render_home(
    urls: &MediaUrls,
    session: &BrowseSession,
    rows: &HomeRows,
    featured: Option<&CatalogItem>,
) {
    if session.show_featured() {
        render_featured(urls, featured);
    }
    render_sections(urls, session, rows);
}

/// Adds a listed item to My List by ID.
fn add_by_id(session: &mut BrowseSession, rows: &HomeRows, id: u64) {
    if !session.is_authenticated() {
        tracing::warn!("Log in to use My List");
        return;
    }
    let found = rows
        .all()
        .chain(session.search_results())
        .find(|item| item.id == id)
        .cloned();
    match found {
        Some(item) if session.add_to_list(&item) => {
            tracing::info!("Added to My List: {}", item.title);
        }
        Some(item) => tracing::info!("Already in My List: {}", item.title),
        None => tracing::warn!("No listed title with ID {id}"),
    }
}

/// Opens the trailer view for `id` and reports the embed URL.
///
/// # Errors
///
/// Returns an error if `open_browser` is set and the browser cannot be launched.
async fn show_trailer(
    client: &CatalogClient,
    session: &mut BrowseSession,
    id: u64,
    open_browser: bool,
) -> Result<()> {
    session.open_trailer(id);
    let Some(trailer) = session.load_trailer(client).await else {
        tracing::info!("Trailer not available for this title.");
        return Ok(());
    };
    let url = client.trailer_embed_url(&trailer.key);
    tracing::info!("{}: {}", trailer.name, url);
    if open_browser {
        open::that(&url).with_context(|| format!("failed to open {url}"))?;
    }
    Ok(())
}

/// Fetches the featured title and the home rows concurrently.
///
/// A featured failure is logged; a row failure fails the whole load.
///
/// # Errors
///
/// Returns an error if any of the four row requests fails.
async fn load_home(client: &CatalogClient) -> Result<(Option<CatalogItem>, HomeRows)> {
    let (featured, rows) = futures::join!(client.fetch_featured(), HomeRows::load(client));
    let rows = rows.context("failed to load home rows")?;
    let featured = featured.unwrap_or_else(|e| {
        tracing::warn!("failed to load featured title: {e:#}");
        None
    });
    Ok((featured, rows))
}

/// Runs the `home` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or a row request fails.
#[instrument(skip_all)]
async fn run_home(args: &HomeArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;
    let (featured, rows) = load_home(&client).await?;

    let mut session = BrowseSession::new();
    if args.login {
        session.login();
    }
    for &id in &args.my_list {
        add_by_id(&mut session, &rows, id);
    }

    render_home(client.urls(), &session, &rows, featured.as_ref());
    Ok(())
}

/// Runs the `browse` subcommand: an interactive loop over stdin.
///
/// # Errors
///
/// Returns an error if the client fails to build, the home rows fail to
/// load, or stdin cannot be read.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;
    let (featured, rows) = load_home(&client).await?;
    let urls = client.urls();

    let mut session = BrowseSession::new();
    render_home(urls, &session, &rows, featured.as_ref());
    tracing::info!("Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
        let command = match line.parse::<BrowseCommand>() {
            Ok(command) => command,
            Err(e) => {
                tracing::warn!("{e}");
                continue;
            }
        };

        match command {
            BrowseCommand::Search(query) => {
                session.search(&client, &query).await;
                tracing::debug!(query = session.query(), "search applied");
                render_home(urls, &session, &rows, featured.as_ref());
            }
            BrowseCommand::Login => {
                session.login();
                tracing::info!("Logged in.");
            }
            BrowseCommand::Logout => {
                session.logout();
                tracing::info!("Logged out.");
            }
            BrowseCommand::Add(id) => add_by_id(&mut session, &rows, id),
            BrowseCommand::Remove(id) => {
                if !session.is_authenticated() {
                    tracing::warn!("Log in to use My List");
                } else if session.remove_from_list(id) {
                    tracing::info!("Removed {id} from My List");
                } else {
                    tracing::info!("{id} is not in My List");
                }
            }
            BrowseCommand::Trailer(id) => show_trailer(&client, &mut session, id, false).await?,
            BrowseCommand::Close => {
                if session.trailer().open {
                    session.close_trailer();
                    tracing::info!("Trailer closed.");
                } else {
                    tracing::info!("No trailer is open.");
                }
            }
            BrowseCommand::Rows => render_home(urls, &session, &rows, featured.as_ref()),
            BrowseCommand::Help => tracing::info!("{}", HELP),
            BrowseCommand::Quit => break,
        }
    }

    Ok(())
}

/// Runs the `featured` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_featured(dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;

    let featured = client
        .fetch_featured()
        .await
        .context("TMDB movie/popular request failed")?;

    render_featured(client.urls(), featured.as_ref());
    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;

    let results = client
        .search(&args.query)
        .await
        .context("TMDB search/movie request failed")?;

    let mut session = BrowseSession::new();
    session.set_search_results(&args.query, results);

    render_sections(client.urls(), &session, &HomeRows::default());
    Ok(())
}

/// Runs the `genre` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the API request fails.
#[instrument(skip_all)]
async fn run_genre(args: &GenreArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;

    let items = client
        .fetch_by_genre(args.id)
        .await
        .context("TMDB discover/movie request failed")?;

    tracing::info!("== Genre {} ({}) ==", args.id, items.len());
    for item in &items {
        render_item(client.urls(), item, false);
    }
    Ok(())
}

/// Runs the `trailer` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the browser cannot be opened.
#[instrument(skip_all)]
async fn run_trailer(args: &TrailerArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config)?;

    let mut session = BrowseSession::new();
    show_trailer(&client, &mut session, args.id, args.open).await
}

/// Runs the `images` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_images(args: &ImagesArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let urls = config.tmdb.media_urls();

    tracing::info!("poster: {}", urls.poster_url(args.poster.as_deref()));
    tracing::info!("backdrop: {}", urls.backdrop_url(args.backdrop.as_deref()));
    if let Some(ref key) = args.trailer_key {
        tracing::info!("trailer: {}", urls.trailer_embed_url(key));
    }
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Home(args) => run_home(&args, dir).await,
        Commands::Browse => run_browse(dir).await,
        Commands::Featured => run_featured(dir).await,
        Commands::Search(args) => run_search(&args, dir).await,
        Commands::Genre(args) => run_genre(&args, dir).await,
        Commands::Trailer(args) => run_trailer(&args, dir).await,
        Commands::Images(args) => run_images(&args, dir),
    }
}
