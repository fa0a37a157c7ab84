//! reddit api stuff
use {
    crate::{
        config::options::HttpCfg,
        error::{R2wError, Result},
    },
    reqwest::Client,
    std::time::Duration,
    tracing::info,
};

pub mod posts;

/// the client
#[derive(Clone, Debug)]
pub struct RedditClient {
    /// the http client, also used for image downloads
    pub client: Client,
    /// the base url for api requests
    pub base_url: String,
}

impl RedditClient {
    /// make a new reddit api client
    ///
    /// # Errors
    ///
    /// returns an error if the http client can't be built
    pub fn new(http: &HttpCfg, base_url: &str) -> Result<Self> {
        let client = Self::build_http_client(http)?;

        info!(user_agent = %http.user_agent, base_url, "initialized http client");

        Ok(Self::with_client(client, base_url))
    }

    /// wrap an already configured http client
    pub fn with_client(client: Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// build an http client from the http settings
    fn build_http_client(http: &HttpCfg) -> Result<Client> {
        Client::builder()
            .user_agent(http.user_agent.as_str())
            .timeout(Duration::from_secs(http.timeout))
            .connect_timeout(Duration::from_secs(http.connect_timeout))
            .build()
            .map_err(|e| R2wError::Config(format!("failed to build http client: {}", e)))
    }

    /// the underlying http client
    pub fn http(&self) -> &Client {
        &self.client
    }
}
