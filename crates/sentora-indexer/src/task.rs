use deadpool_diesel::postgres::Pool;
use pragma_common::services::{Service, ServiceRunner};

use crate::IndexerService;
use crate::subgraph::SubgraphClient;

pub struct IndexerTask {
    db_pool: Pool,
    graph_endpoint: String,
    graph_api_key: String,
    pairs: Vec<String>,
    interval_minutes: u64,
}

impl IndexerTask {
    pub const fn new(
        db_pool: Pool,
        graph_endpoint: String,
        graph_api_key: String,
        pairs: Vec<String>,
        interval_minutes: u64,
    ) -> Self {
        Self {
            db_pool,
            graph_endpoint,
            graph_api_key,
            pairs,
            interval_minutes,
        }
    }
}

#[async_trait::async_trait]
impl Service for IndexerTask {
    async fn start<'a>(&mut self, mut runner: ServiceRunner<'a>) -> anyhow::Result<()> {
        let db_pool = self.db_pool.clone();
        let graph_endpoint = self.graph_endpoint.clone();
        let graph_api_key = self.graph_api_key.clone();
        let pairs = self.pairs.clone();
        let interval_minutes = self.interval_minutes;

        runner.spawn_loop(move |ctx| async move {
            let client = SubgraphClient::new(&graph_endpoint, &graph_api_key)?;
            let indexer_service =
                IndexerService::new(db_pool.clone(), client, pairs.clone(), interval_minutes);

            if let Some(result) = ctx.run_until_cancelled(indexer_service.run_forever()).await {
                result?;
            }

            anyhow::Ok(())
        });

        Ok(())
    }
}
