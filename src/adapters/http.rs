use crate::core::request::RequestDescriptor;
use crate::domain::model::RawResponse;
use crate::utils::error::Result;
use reqwest::Client;
use std::time::Duration;

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Issues the GET and returns whatever came back; transport failures are errors, statuses are not.
    pub async fn get(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        tracing::debug!("Making API request to: {}", request.as_str());
        let response = self.client.get(request.url.clone()).send().await?;

        let status = response.status().as_u16();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        tracing::debug!("API response body: {} bytes", body.len());

        Ok(RawResponse { status, body })
    }
}
