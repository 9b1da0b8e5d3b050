pub mod error;
pub mod query;

pub use error::{Result, SupabaseError};
pub use query::{Order, SelectQuery};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

const REST_PATH: &str = "rest/v1";

pub struct SupabaseClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Build a client for a Supabase project. `timeout` bounds every request
    /// end to end.
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if base_url.is_empty() {
            return Err(SupabaseError::InvalidRequest(
                "Supabase URL must not be empty".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SupabaseError::Network(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, REST_PATH, path)
    }

    /// Run a table read and decode every row as `T`.
    pub async fn select<T: DeserializeOwned>(&self, query: &SelectQuery) -> Result<Vec<T>> {
        let url = self.rest_url(query.table());
        tracing::debug!(table = query.table(), "Supabase select");

        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .query(&query.to_query_pairs())
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::from_response(status.as_u16(), &body));
        }

        let rows: Vec<T> = resp.json().await?;
        Ok(rows)
    }

    /// Call a Postgres function exposed under `/rpc/{function}`.
    ///
    /// A `null` response body decodes as `T::default()`, matching how
    /// set-returning functions answer when they have nothing to return.
    pub async fn rpc<P, T>(&self, function: &str, params: &P) -> Result<T>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned + Default,
    {
        let url = self.rest_url(&format!("rpc/{function}"));
        tracing::debug!(function, "Supabase rpc");

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(params)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SupabaseError::from_response(status.as_u16(), &body));
        }

        let body = resp.text().await?;
        let value: Option<T> = serde_json::from_str(&body)?;
        Ok(value.unwrap_or_default())
    }
}
