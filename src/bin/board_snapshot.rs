//! Loads the board from `PostgreSQL` and writes the projected columns as JSON.
//!
//! Usage:
//!
//! ```text
//! board_snapshot [assignee-id]
//! ```
//!
//! Configuration is read from the environment (and a `.env` file when
//! present); see [`taskboard::config`]. An assignee argument restricts the
//! board to tasks assigned to that user.

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};
use std::io::Write;
use std::sync::Arc;
use taskboard::board::{
    adapters::postgres::PostgresTaskStore, domain::AssigneeFilter, services::BoardService,
};
use taskboard::config::BoardConfig;
use taskboard::telemetry::init_tracing;

/// Boxed error type for the main result.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(err.into());
    }
    let config = BoardConfig::from_env()?;
    init_tracing(&config.log_filter)?;

    let filter = std::env::args()
        .nth(1)
        .and_then(|raw| AssigneeFilter::parse(&raw));

    let manager = ConnectionManager::<PgConnection>::new(&config.database_url);
    let pool = Pool::builder()
        .max_size(config.max_pool_size)
        .build(manager)?;
    let service = BoardService::new(Arc::new(PostgresTaskStore::new(pool)));

    let snapshot = service.resync().await?;
    let view = snapshot.project(filter.as_ref());
    tracing::info!(
        cards = view.card_count(),
        unplaced = view.unplaced.len(),
        "board loaded"
    );

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &view)?;
    writeln!(stdout)?;
    Ok(())
}
