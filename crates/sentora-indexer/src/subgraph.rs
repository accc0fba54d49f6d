use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SubgraphError {
    #[error("invalid subgraph endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("subgraph returned status {0}")]
    Status(u16),

    #[error("subgraph query failed: {0}")]
    Query(String),
}

/// One daily observation of a pair as the subgraph reports it. The USD
/// figures arrive as decimal strings and are parsed downstream.
#[derive(Debug, Clone, Deserialize)]
pub struct PairDayData {
    /// Unix timestamp of the day bucket, midnight UTC
    pub date: i64,
    #[serde(rename = "reserveUSD")]
    pub reserve_usd: String,
    #[serde(rename = "dailyVolumeUSD")]
    pub daily_volume_usd: String,
}

#[derive(Debug, Deserialize)]
struct PairDayDataEnvelope {
    #[serde(rename = "pairDayDatas")]
    pair_day_datas: Vec<PairDayData>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PairDayDataEnvelope>,
    errors: Option<Vec<GraphQlError>>,
}

const PAIR_DAY_DATA_QUERY: &str = r"
query GetPairDayData($pairAddress: String!, $timestampGt: Int!) {
  pairDayDatas(
    where: { pairAddress: $pairAddress, date_gt: $timestampGt }
    orderBy: date
    orderDirection: asc
  ) {
    date
    reserveUSD
    dailyVolumeUSD
  }
}";

/// Thin client for the DEX subgraph's daily pair data
pub struct SubgraphClient {
    http_client: Client,
    endpoint: Url,
    api_key: String,
}

impl SubgraphClient {
    pub fn new(endpoint: &str, api_key: &str) -> Result<Self, SubgraphError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: Url::parse(endpoint)?,
            api_key: api_key.to_string(),
        })
    }

    /// Daily rows for `pair_address` strictly after `timestamp_gt`, oldest
    /// first (the upstream query orders by day ascending)
    pub async fn pair_day_datas(
        &self,
        pair_address: &str,
        timestamp_gt: i64,
    ) -> Result<Vec<PairDayData>, SubgraphError> {
        let body = serde_json::json!({
            "query": PAIR_DAY_DATA_QUERY,
            "variables": {
                "pairAddress": pair_address,
                "timestampGt": timestamp_gt,
            },
        });

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubgraphError::Status(response.status().as_u16()));
        }

        let parsed: GraphQlResponse = response.json().await?;
        if let Some(errors) = parsed.errors {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            return Err(SubgraphError::Query(messages.join("; ")));
        }

        Ok(parsed
            .data
            .map(|envelope| envelope.pair_day_datas)
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_day_data_response() {
        let raw = r#"{
            "data": {
                "pairDayDatas": [
                    { "date": 1721433600, "reserveUSD": "24731904.55", "dailyVolumeUSD": "1250000.10" },
                    { "date": 1721520000, "reserveUSD": "25000000.00", "dailyVolumeUSD": "900000" }
                ]
            }
        }"#;

        let parsed: GraphQlResponse = serde_json::from_str(raw).unwrap();
        let rows = parsed.data.unwrap().pair_day_datas;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].date, 1_721_433_600);
        assert_eq!(rows[0].reserve_usd, "24731904.55");
        assert_eq!(rows[1].daily_volume_usd, "900000");
    }

    #[test]
    fn test_deserialize_error_response() {
        let raw = r#"{ "errors": [{ "message": "indexing error" }] }"#;
        let parsed: GraphQlResponse = serde_json::from_str(raw).unwrap();
        assert!(parsed.data.is_none());
        assert_eq!(parsed.errors.unwrap()[0].message, "indexing error");
    }
}
