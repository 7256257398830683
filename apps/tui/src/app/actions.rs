use bird_tracks_core::api::{parse_identifiers, parse_trajectory};
use bird_tracks_core::{Endpoints, FetchError, Identifier};
use serde_json::Value;
use std::time::Duration;

/// HTTP access to the tracking service.
#[derive(Debug, Clone)]
pub struct TrackClient {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl TrackClient {
    pub fn new(endpoints: Endpoints, timeout: Option<Duration>) -> color_eyre::Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            endpoints,
        })
    }

    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn fetch_identifiers(&self) -> Result<Vec<Identifier>, FetchError> {
        let body = self
            .get_json(
                &self.endpoints.identifiers_url(),
                &self.endpoints.identifiers_query(),
            )
            .await?;
        parse_identifiers(body)
    }

    pub async fn fetch_trajectory(&self, identifier: &Identifier) -> Result<Vec<Value>, FetchError> {
        let body = self
            .get_json(
                &self.endpoints.trajectory_url(),
                &self.endpoints.trajectory_query(identifier),
            )
            .await?;
        parse_trajectory(body)
    }

    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value, FetchError> {
        log::debug!("GET {url} {query:?}");

        let response = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}
