use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct SentoraCli {
    /// Database URL
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// OTEL collector endpoint
    #[arg(long, env = "OTEL_COLLECTOR_ENDPOINT")]
    pub otel_collector_endpoint: Option<String>,

    /// API port
    #[arg(long, env = "API_PORT", default_value = "3001")]
    pub api_port: u16,

    /// GraphQL endpoint of the DEX subgraph
    #[arg(long, env = "GRAPH_ENDPOINT")]
    pub graph_endpoint: String,

    /// Bearer token for the subgraph gateway
    #[arg(long, env = "GRAPH_API_KEY")]
    pub graph_api_key: String,

    /// Comma-separated addresses of the pairs to monitor
    #[arg(long, env = "PAIR_ADDRESSES", value_delimiter = ',')]
    pub pair_addresses: Vec<String>,

    /// Minutes between snapshot ingestion runs
    #[arg(long, env = "SNAPSHOT_INTERVAL_MINUTES", default_value = "60")]
    pub snapshot_interval_minutes: u64,
}
