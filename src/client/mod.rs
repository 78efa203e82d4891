pub mod models;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::{debug, error, instrument, trace};
use url::Url;

use crate::config::AppConfig;
use crate::error::ServiceError;
use self::models::{parse_captions, parse_description, CaptionRequest, DescriptionRequest};

/// Path of the image description endpoint, relative to the service URL
pub const DESCRIPTION_PATH: &str = "api/description";

/// Path of the caption generation endpoint, relative to the service URL
pub const CAPTION_PATH: &str = "api/caption";

/// The external service that describes images and writes captions
#[async_trait]
pub trait CaptionService: Send + Sync {
    /// Returns a text description of the image given as a base64 data URL
    async fn describe_image(&self, image_data_url: &str) -> Result<String, ServiceError>;

    /// Returns the captions generated for the given parameters, in order
    async fn generate_captions(&self, request: &CaptionRequest) -> Result<Vec<String>, ServiceError>;
}

/// [`CaptionService`] backed by the HTTP API
#[derive(Debug, Clone)]
pub struct HttpCaptionService {
    client: Client,
    base_url: Url,
}

impl HttpCaptionService {
    /// Creates a service client with default HTTP settings
    pub fn new(base_url: Url) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a service client around an existing `reqwest::Client`
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join drops the last path segment unless it ends with '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Creates a service client from the application configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let base_url = config.api_base()?;

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.request_timeout() {
            debug!("Using request timeout of {:?}", timeout);
            builder = builder.timeout(timeout);
        }
        let client = builder.build().context("Failed to build HTTP client")?;

        Ok(Self::with_client(client, base_url))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base_url
            .join(path)
            .map_err(|e| ServiceError::Client(format!("invalid endpoint {}: {}", path, e)))
    }

    /// Posts a JSON body and returns the raw response text of a successful response
    async fn post_json<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<String, ServiceError> {
        let url = self.endpoint(path)?;
        trace!("POST {}", url);

        let response = self.client.post(url.clone()).json(body).send().await.map_err(|e| {
            error!("Request to {} failed: {}", url, e);
            ServiceError::from(e)
        })?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let err = ServiceError::from_response(status.as_u16(), &text);
            error!("Server Error from {}: {}", url, err);
            return Err(err);
        }

        debug!("{} responded {} ({} bytes)", url, status, text.len());
        Ok(text)
    }
}

#[async_trait]
impl CaptionService for HttpCaptionService {
    #[instrument(skip(self, image_data_url), fields(image_len = image_data_url.len()))]
    async fn describe_image(&self, image_data_url: &str) -> Result<String, ServiceError> {
        let body = self
            .post_json(DESCRIPTION_PATH, &DescriptionRequest { image: image_data_url })
            .await?;
        Ok(parse_description(&body))
    }

    #[instrument(skip(self, request), fields(tone = %request.tone, style = %request.style))]
    async fn generate_captions(&self, request: &CaptionRequest) -> Result<Vec<String>, ServiceError> {
        let body = self.post_json(CAPTION_PATH, request).await?;
        let captions = parse_captions(&body)?;
        debug!("Received {} captions", captions.len());
        Ok(captions)
    }
}
