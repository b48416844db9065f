//! CLI runner - executes commands
//!
//! The runner is the presenter: it triggers loads on the controller, reads
//! snapshots back, and renders them.

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::details::DetailLoader;
use crate::error::{Error, Result};
use crate::pagination::{ListEvent, LoadOutcome, PaginationController};
use crate::tmdb::{Movie, MovieService};
use crate::types::ListId;
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type MovieController = PaginationController<Arc<MovieService>>;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;
        let service = Arc::new(MovieService::new(&config)?);

        match &self.cli.command {
            Commands::NowPlaying { pages } => {
                self.show_lists(service, &[ListId::NowPlaying], *pages)
                    .await
            }
            Commands::Popular { pages } => {
                self.show_lists(service, &[ListId::Popular], *pages).await
            }
            Commands::Browse { pages } => self.show_lists(service, &ListId::ALL, *pages).await,
            Commands::Search { query } => self.search(service, query).await,
            Commands::Details { id } => self.details(service, *id).await,
        }
    }

    /// Resolve config: file, then environment, then flags
    pub fn load_config(&self) -> Result<AppConfig> {
        let config = match &self.cli.config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };
        let mut config = config.with_env_overrides();

        if let Some(key) = &self.cli.api_key {
            config.api_key = Some(key.clone());
            config.access_token = None;
        }
        Ok(config)
    }

    /// Load `pages` pages of each list concurrently and print them
    async fn show_lists(&self, service: Arc<MovieService>, lists: &[ListId], pages: u32) -> Result<()> {
        let image_base = service.image_base_url().to_string();
        let controller = PaginationController::new(service);
        let event_log = spawn_event_log(&controller);

        let results =
            futures::future::join_all(lists.iter().map(|list| page_through(&controller, *list, pages)))
                .await;
        results.into_iter().collect::<Result<Vec<()>>>()?;

        for list in lists {
            let state = controller.snapshot(*list).await;
            if self.cli.format == OutputFormat::Pretty {
                println!(
                    "== {} ({} movies, {}) ==",
                    list,
                    state.items.len(),
                    page_summary(state.current_page, state.total_pages, state.has_more)
                );
            }
            for movie in &state.items {
                println!("{}", render_movie(movie, self.cli.format, &image_base)?);
            }
        }

        drop(controller);
        let _ = event_log.await;
        Ok(())
    }

    async fn search(&self, service: Arc<MovieService>, query: &str) -> Result<()> {
        let image_base = service.image_base_url().to_string();
        let controller = PaginationController::new(service);

        if controller.search(query).await == LoadOutcome::Failed {
            let state = controller.search_snapshot().await;
            return Err(describe_failure(&format!("search '{query}'"), state.last_error.as_deref()));
        }

        let state = controller.search_snapshot().await;
        if state.results.is_empty() && self.cli.format == OutputFormat::Pretty {
            println!("No movies found for '{query}'");
        }
        for movie in &state.results {
            println!("{}", render_movie(movie, self.cli.format, &image_base)?);
        }
        Ok(())
    }

    async fn details(&self, service: Arc<MovieService>, id: u64) -> Result<()> {
        let image_base = service.image_base_url().to_string();
        let loader = DetailLoader::new(service);

        loader.load(id).await;
        let state = loader.snapshot().await;
        let movie = state.item.ok_or_else(|| {
            describe_failure(&format!("movie {id}"), state.last_error.as_deref())
        })?;

        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&movie)?),
            OutputFormat::Pretty => print!("{}", render_details(&movie, &image_base)),
        }
        Ok(())
    }
}

/// Initial load, then load more at the trailing edge until `pages` pages
/// are loaded or the list runs out
///
/// A failed initial load is an error. A failed load more keeps the pages
/// already loaded.
async fn page_through(controller: &MovieController, list: ListId, pages: u32) -> Result<()> {
    if controller.load_initial(list).await == LoadOutcome::Failed {
        let state = controller.snapshot(list).await;
        return Err(describe_failure(list.as_str(), state.last_error.as_deref()));
    }

    let mut loaded = 1;
    while loaded < pages {
        let state = controller.snapshot(list).await;
        let Some(last) = state.items.len().checked_sub(1) else {
            break;
        };

        match controller.load_more_if_trailing(list, last).await {
            LoadOutcome::Loaded { .. } => loaded += 1,
            LoadOutcome::Failed => {
                warn!(list = %list, page = state.current_page, "Load more failed, keeping loaded pages");
                break;
            }
            _ => break,
        }
    }
    Ok(())
}

/// Log controller events until the controller is dropped
fn spawn_event_log(controller: &MovieController) -> JoinHandle<()> {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(ListEvent::Failed(list)) => warn!(list = %list, "List load failed"),
                Ok(event) => debug!(event = ?event, "List event"),
                Err(RecvError::Lagged(skipped)) => debug!(skipped, "Event log lagged"),
                Err(RecvError::Closed) => break,
            }
        }
    })
}

fn describe_failure(what: &str, error: Option<&Error>) -> Error {
    match error {
        Some(e) => Error::Other(format!("Failed to load {what} ({}): {e}", e.kind())),
        None => Error::Other(format!("Failed to load {what}")),
    }
}

fn page_summary(current_page: u32, total_pages: Option<u32>, has_more: bool) -> String {
    let loaded = if has_more { current_page.saturating_sub(1) } else { current_page };
    match total_pages {
        Some(total) => format!("page {loaded} of {total}"),
        None => format!("page {loaded}"),
    }
}

/// One line per movie
pub fn render_movie(movie: &Movie, format: OutputFormat, image_base_url: &str) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(movie)?),
        OutputFormat::Pretty => {
            let mut line = format!(
                "{:>8}  {}  ({})  \u{2605} {}",
                movie.id,
                movie.title,
                movie.formatted_release_date(),
                movie.formatted_rating()
            );
            if let Some(poster) = movie.poster_url(image_base_url) {
                let _ = write!(line, "  {poster}");
            }
            Ok(line)
        }
    }
}

/// Multi-line detail view
pub fn render_details(movie: &Movie, image_base_url: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", movie.title);
    let _ = writeln!(out, "Released: {}", movie.formatted_release_date());
    let _ = writeln!(
        out,
        "Rating:   {} ({} votes)",
        movie.formatted_rating(),
        movie.vote_count.unwrap_or(0)
    );
    if let Some(language) = &movie.original_language {
        let _ = writeln!(out, "Language: {language}");
    }
    if let Some(poster) = movie.poster_url(image_base_url) {
        let _ = writeln!(out, "Poster:   {poster}");
    }
    if let Some(backdrop) = movie.backdrop_url(image_base_url) {
        let _ = writeln!(out, "Backdrop: {backdrop}");
    }
    if !movie.overview.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", movie.overview);
    }
    out
}
