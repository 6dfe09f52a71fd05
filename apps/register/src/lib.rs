//! # Cashier Register Library
//!
//! The register session: configuration, hydration from storage, ordered
//! persistence and the command layer the UI talks to.
//!
//! ## Module Organization
//! ```text
//! cashier_register/
//! ├── lib.rs          ◄─── You are here (startup & command loop)
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── config.rs   ◄─── Configuration (file + env)
//! │   ├── lifecycle.rs◄─── Per-collection load phases
//! │   ├── session.rs  ◄─── Engine + lifecycle + writer
//! │   └── shared.rs   ◄─── Arc<Mutex<Session>> and hydration
//! ├── commands/       ◄─── One function per UI operation + dispatch
//! ├── external.rs     ◄─── Image generator & identity provider seams
//! └── error.rs        ◄─── API error type for commands
//! ```
//!
//! ## Wire Format
//! The binary reads one JSON request per line on stdin and writes one JSON
//! reply per line on stdout. Logs go to stderr.
//! ```text
//! → {"id": 1, "command": "select_takeaway"}
//! ← {"id": 1, "ok": true, "data": {"kind": "takeaway"}}
//! → {"id": 2, "command": "add_to_cart", "args": {"productId": 99}}
//! ← {"id": 2, "ok": false, "error": {"code": "NOT_FOUND", "message": "..."}}
//! ```

pub mod commands;
pub mod error;
pub mod external;
pub mod state;

use std::sync::Arc;

use cashier_db::{Database, DbConfig, WriteQueue};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use commands::{CommandContext, CommandRequest, CommandResponse};
use error::ApiError;
use external::{ImageGenerator, NoImageGenerator, StaticIdentity};
use state::{ConfigState, Session, SessionState};

/// Runs the register until stdin closes, without image generation.
///
/// `generate_product_image` answers `IMAGE_GENERATION` here. Hosts that
/// have a generator call [`run_with`] instead.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    run_with(Arc::new(NoImageGenerator)).await
}

/// Runs the register until stdin closes, using `images` for
/// `generate_product_image`.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Register Startup                                  │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, to stderr                     │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • config.toml, then CASHIER_* overrides                             │
/// │                                                                         │
/// │  3. Connect to Database ──────────────────────────────────────────────► │
/// │     • SQLite with WAL mode, pending migrations                          │
/// │                                                                         │
/// │  4. Spawn Write Queue, Build Session ─────────────────────────────────► │
/// │     • Session serves configured defaults, writes gated per record      │
/// │                                                                         │
/// │  5. Hydrate ──────────────────────────────────────────────────────────► │
/// │     • each record replaces its default; unreadable ones fall back       │
/// │                                                                         │
/// │  6. Serve Commands ───────────────────────────────────────────────────► │
/// │     • until EOF, then drain the write queue and close the pool          │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run_with(images: Arc<dyn ImageGenerator>) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Cashier register");

    let config = ConfigState::load()?;
    let db_path = config.database_path()?;
    info!(?db_path, "Database path determined");

    let db = Database::new(DbConfig::new(db_path)).await?;
    info!("Database connected and migrations applied");

    let (writer, writer_task) = WriteQueue::spawn(Arc::new(db.kv()));
    let session = SessionState::new(Session::new(config.default_settings(), Some(writer)));

    let kv = db.kv();
    let report = session.hydrate(&kv).await;
    debug!(?report, "Hydration finished");

    let ctx = CommandContext {
        session: session.clone(),
        images,
        identity: Arc::new(StaticIdentity::from_config(&config)),
    };

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let served = serve(&ctx, stdin, tokio::io::stdout()).await?;
    info!(commands = served, "Input closed, shutting down");

    match session.shutdown().await {
        Ok(stats) => info!(written = stats.written, failed = stats.failed, "Write queue drained"),
        Err(e) => warn!(error = %e, "Write queue already closed"),
    }
    if let Err(e) = writer_task.await {
        warn!(error = %e, "Write queue task ended abnormally");
    }

    db.close().await;
    Ok(())
}

/// Answers one JSON request per input line until EOF.
///
/// Blank lines are ignored. Returns how many requests were answered.
pub async fn serve<R, W>(ctx: &CommandContext, input: R, mut output: W) -> std::io::Result<usize>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    let mut served = 0;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<CommandRequest>(line) {
            Ok(request) => {
                let id = request.id.clone();
                CommandResponse::from_result(id, commands::dispatch(ctx, request).await)
            }
            Err(e) => CommandResponse::from_result(
                None,
                Err(ApiError::bad_request(format!("Malformed request: {e}"))),
            ),
        };

        let mut bytes = serde_json::to_vec(&response)?;
        bytes.push(b'\n');
        output.write_all(&bytes).await?;
        output.flush().await?;
        served += 1;
    }

    Ok(served)
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=cashier=trace` - Show trace for cashier crates only
/// - Default: INFO level
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,cashier=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
