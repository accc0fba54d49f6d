mod cli;

use std::sync::Arc;

use crate::cli::SentoraCli;
use anyhow::Result;
use clap::Parser;
use dotenvy::dotenv;
use pragma_common::services::{Service, ServiceGroup};
use pragma_common::telemetry::init_telemetry;

use sentora_api::{ApiService, AppState};
use sentora_db::{init_pool, run_migrations};
use sentora_indexer::task::IndexerTask;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let SentoraCli {
        database_url,
        otel_collector_endpoint,
        api_port,
        graph_endpoint,
        graph_api_key,
        pair_addresses,
        snapshot_interval_minutes,
    } = SentoraCli::parse();

    let app_name = "sentora_api";
    if let Err(e) = init_telemetry(app_name, otel_collector_endpoint) {
        panic!("Could not init telemetry: {e}");
    }

    if pair_addresses.is_empty() {
        anyhow::bail!("PAIR_ADDRESSES must list at least one pair to monitor");
    }

    let pool = init_pool(app_name, &database_url)?;
    run_migrations(&pool).await?;

    let app_state = AppState {
        pool: pool.clone(),
        pairs: Arc::new(pair_addresses.clone()),
    };

    let api_service = ApiService::new(app_state, "0.0.0.0", api_port);

    let indexer_service = IndexerTask::new(
        pool.clone(),
        graph_endpoint,
        graph_api_key,
        pair_addresses,
        snapshot_interval_minutes,
    );

    ServiceGroup::default()
        .with(api_service)
        .with(indexer_service)
        .start_and_drive_to_end()
        .await?;

    Ok(())
}
