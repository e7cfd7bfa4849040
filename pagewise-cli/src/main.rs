use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagewise_commands::session::{PIN_LABEL, pin_headers};
use pagewise_commands::{BrowseSession, Flow, completion_channel, handle_completion, handle_line};
use pagewise_core::{Context, DynRecordSource, Settings};
use pagewise_database::{Database, MemoryPageSource, PgPageSource, TableSpec, seed_library_pins};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries the tables.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load the .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    info!(
        mode = ?settings.mode,
        page_size = settings.page_size,
        database = settings.database_url.is_some(),
        "settings loaded"
    );

    let source = open_source(&settings).await?;
    let ctx = Context::new(source, settings);

    let (completions, mut finished) = completion_channel();
    let mut session = BrowseSession::start(ctx, pin_headers(), PIN_LABEL, completions)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut out = tokio::io::stdout();

    info!("pagewise is ready, type `help` for commands");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if handle_line(&mut session, &mut out, &line).await? == Flow::Quit {
                    break;
                }
            }
            Some(completion) = finished.recv() => {
                handle_completion(&mut session, &mut out, completion).await?;
            }
        }
    }

    info!("pagewise is shutting down");
    Ok(()) // Return Success, shutdown cleanly
}

/// PostgreSQL when `DATABASE_URL` is set, otherwise the built-in pin library.
async fn open_source(settings: &Settings) -> anyhow::Result<Arc<DynRecordSource>> {
    let Some(url) = settings.database_url.as_deref() else {
        info!("DATABASE_URL not set, browsing the built-in pin library");
        let source = MemoryPageSource::new("pin_library", "barcode", seed_library_pins());
        return Ok(Arc::new(source));
    };

    let db = Database::connect(url, settings.db_password.as_ref(), settings.max_connections).await?;
    db.migrate().await?;
    info!("migrations applied");

    Ok(Arc::new(PgPageSource::new(db, TableSpec::pin_library()?)))
}
