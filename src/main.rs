//! book-voice-search: terminal front end for the search component
//!
//! Reads one utterance per line from stdin and handles it the way the
//! storefront's search box would. A terminal has no speech capability, so
//! the component runs in text-only mode.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use book_voice_search::catalog::HttpCatalog;
use book_voice_search::events::SearchEvent;
use book_voice_search::lifecycle::ShutdownSignal;
use book_voice_search::navigation::{HistoryNavigator, Navigator, StaticAuth};
use book_voice_search::notify::ConsoleNotifier;
use book_voice_search::{Config, SearchPorts, SmartSearch};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize logging; stdout is reserved for notices
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "book-voice-search starting"
    );

    // Load configuration
    let config = Config::load()?;
    info!(api_url = %config.api_url, signed_in = config.user.is_some(), "configuration loaded");

    let shutdown = ShutdownSignal::new();

    // Component -> view layer
    let (event_tx, _event_rx) = broadcast::channel::<SearchEvent>(64);
    let mut event_rx = event_tx.subscribe();

    let auth = match &config.user {
        Some(name) => StaticAuth::signed_in(name.as_str()),
        None => StaticAuth::signed_out(),
    };
    let navigator = Arc::new(HistoryNavigator::new());
    let catalog = HttpCatalog::new(config.api_url.clone())?;

    let mut search = SmartSearch::new(
        SearchPorts {
            catalog: Arc::new(catalog),
            navigator: navigator.clone(),
            auth: Arc::new(auth),
            notifier: Arc::new(ConsoleNotifier),
            recognizer: None,
        },
        &config,
        event_tx,
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let shutdown_wait = shutdown.wait();
    tokio::pin!(shutdown_wait);

    search.focus();
    prompt(&search);

    info!("search ready, entering main loop");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed");
                    break;
                };
                search.set_search_text(&line);
                if let Some(outcome) = search.submit().await {
                    debug!(outcome = outcome.label(), path = %navigator.current_path(), "utterance handled");
                    println!("now at {}", navigator.current_path());
                }
                prompt(&search);
            }

            event = event_rx.recv() => {
                match event {
                    Ok(event) => debug!(%event, "search event"),
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "search event receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            _ = &mut shutdown_wait => {
                info!("shutdown signal received");
                break;
            }
        }
    }

    // Cleanup
    search.teardown();
    info!(history = navigator.history().len(), "book-voice-search stopped");

    Ok(())
}

fn prompt(search: &SmartSearch) {
    print!("{} > ", search.placeholder());
    let _ = std::io::stdout().flush();
}
