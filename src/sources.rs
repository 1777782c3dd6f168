//! HTTP clients for the dictionary, concordance and collocation services.

use crate::config::EnrichConfig;
use crate::error::{FailureReason, SourceKind, SourceUnavailable};
use crate::model::{CollocationDocument, ExampleLine, WordInfo};
use crate::parse::{parse_concordance, parse_dictionary, sanitize_collocation};
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Client;
use std::time::Instant;
use tracing::debug;

/// The three lookups a note is enriched from. Each call is a single attempt.
#[async_trait]
pub trait LexicalSources: Send + Sync {
    async fn definitions(&self, word: &str) -> Result<WordInfo, SourceUnavailable>;

    /// Example lines, already truncated to the configured cap.
    async fn examples(&self, word: &str) -> Result<Vec<ExampleLine>, SourceUnavailable>;

    async fn collocations(&self, word: &str) -> Result<CollocationDocument, SourceUnavailable>;
}

pub struct HttpSources {
    client: Client,
    config: EnrichConfig,
}

impl HttpSources {
    pub fn new(config: EnrichConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    fn dictionary_url(&self, word: &str) -> String {
        format!(
            "{}/{}",
            self.config.endpoints.dictionary.trim_end_matches('/'),
            encode_component(word)
        )
    }

    fn collocation_url(&self, word: &str) -> String {
        format!(
            "{}/{}.txt",
            self.config.endpoints.collocation.trim_end_matches('/'),
            encode_component(word)
        )
    }

    async fn get_body(
        &self,
        origin: SourceKind,
        request: reqwest::RequestBuilder,
    ) -> Result<Vec<u8>, FailureReason> {
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(source = %origin, status = status.as_u16(), "Source returned error status");
            return Err(FailureReason::Status(status.as_u16()));
        }
        let body = response.bytes().await?;
        debug!(
            source = %origin,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Source responded"
        );
        Ok(body.to_vec())
    }
}

#[async_trait]
impl LexicalSources for HttpSources {
    async fn definitions(&self, word: &str) -> Result<WordInfo, SourceUnavailable> {
        let origin = SourceKind::Dictionary;
        let request = self.client.get(self.dictionary_url(word));
        let body = self
            .get_body(origin, request)
            .await
            .map_err(|reason| SourceUnavailable::new(origin, reason))?;
        parse_dictionary(&body).map_err(|reason| SourceUnavailable::new(origin, reason))
    }

    async fn examples(&self, word: &str) -> Result<Vec<ExampleLine>, SourceUnavailable> {
        let origin = SourceKind::Concordance;
        let request = self.client.get(&self.config.endpoints.concordance).query(&[
            ("query", word),
            ("lang", "English"),
            ("format", "json"),
        ]);
        let body = self
            .get_body(origin, request)
            .await
            .map_err(|reason| SourceUnavailable::new(origin, reason))?;
        let mut lines =
            parse_concordance(&body).map_err(|reason| SourceUnavailable::new(origin, reason))?;
        debug!(word, lines = lines.len(), "Concordance lines parsed");
        lines.truncate(self.config.max_examples);
        Ok(lines)
    }

    async fn collocations(&self, word: &str) -> Result<CollocationDocument, SourceUnavailable> {
        let origin = SourceKind::Collocation;
        let request = self.client.get(self.collocation_url(word));
        let body = self
            .get_body(origin, request)
            .await
            .map_err(|reason| SourceUnavailable::new(origin, reason))?;
        let markup = String::from_utf8_lossy(&body);
        Ok(sanitize_collocation(&markup))
    }
}

fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, NON_ALPHANUMERIC).to_string()
}
