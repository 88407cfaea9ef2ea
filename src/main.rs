//! Binary entry point: wires configuration, the database, and logging, then
//! prints a portfolio summary. Everything interactive lives in the excluded
//! UI shell; this is just the plumbing around the library.

use debtbook::config::database;
use debtbook::core::dashboard;
use debtbook::errors::Result;
use dotenvy::dotenv;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Non-fatal; env vars can be set externally.
    dotenv().ok();

    let db = database::create_connection()
        .await
        .inspect(|_| info!("Database connection established."))
        .inspect_err(|e| error!("Failed to connect to database: {e}"))?;
    database::create_tables(&db).await?;

    let summary = dashboard::global_summary(&db).await?;
    info!(
        partners = summary.partner_count,
        transactions = summary.transaction_count,
        receivable = summary.total_receivable,
        payable = summary.total_payable,
        net = summary.net,
        "Portfolio summary"
    );

    Ok(())
}
