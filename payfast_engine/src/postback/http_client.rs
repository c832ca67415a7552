use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client,
};

use super::{interpret_response, postback_body, postback_url, PostbackClient, PostbackError, PostbackOutcome};
use crate::signature::FieldSet;

/// Confirms notifications with the gateway over HTTPS.
#[derive(Debug, Clone)]
pub struct HttpPostbackClient {
    url: String,
    client: Arc<Client>,
}

impl HttpPostbackClient {
    pub fn new(server_base_url: &str, timeout: Duration) -> Result<Self, PostbackError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/x-www-form-urlencoded"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| PostbackError::Transport(e.to_string()))?;
        let url = postback_url(server_base_url);
        Ok(Self { url, client: Arc::new(client) })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PostbackClient for HttpPostbackClient {
    async fn confirm(&self, fields: &FieldSet) -> Result<PostbackOutcome, PostbackError> {
        let body = postback_body(fields);
        trace!("📮️ Posting notification back to {}", self.url);
        let response = self
            .client
            .post(self.url.as_str())
            .body(body)
            .send()
            .await
            .map_err(|e| PostbackError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            warn!("📮️ Postback to {} returned HTTP {status}", self.url);
            return Err(PostbackError::Transport(format!("HTTP {status}")));
        }
        let text = response.text().await.map_err(|e| PostbackError::Transport(e.to_string()))?;
        let outcome = interpret_response(&text)?;
        debug!("📮️ Postback result: {outcome:?}");
        Ok(outcome)
    }
}
