//! HTTP access to the generation service

use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{ClientError, ErrorKind, Result};
use crate::model::{GenerateRequest, GenerateResponse, ModelVersion};

/// Production API host
pub const DEFAULT_HOST: &str = "https://api.text2motion.ai";

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "x-api-key";

/// Generation can take a while for long clips
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Something that turns a prompt and skeleton into an animation payload
pub trait GenerationService {
    /// Request a generated animation
    ///
    /// Returns the serialized payload, or `None` when the service produced
    /// nothing.
    fn generate(
        &self,
        request: &GenerateRequest,
        version: ModelVersion,
    ) -> Result<Option<String>>;
}

/// Connection settings for [`Text2MotionClient`]
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub host: String,
    pub api_key: String,
    pub timeout: Duration,
    /// Refuse all requests when false
    pub online_access: bool,
    /// Honor proxy settings from the environment
    pub system_proxy: bool,
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            online_access: true,
            system_proxy: true,
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_online_access(mut self, online_access: bool) -> Self {
        self.online_access = online_access;
        self
    }

    pub fn with_system_proxy(mut self, system_proxy: bool) -> Self {
        self.system_proxy = system_proxy;
        self
    }
}

/// Blocking client for the Text2Motion API
#[derive(Debug, Clone)]
pub struct Text2MotionClient {
    http: Client,
    config: ClientConfig,
}

impl Text2MotionClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ClientError::MissingApiKey);
        }
        let mut builder = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("text2motion-rs/", env!("CARGO_PKG_VERSION")));
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of the endpoint serving `version`
    pub fn endpoint(&self, version: ModelVersion) -> String {
        format!("{}{}", self.config.host.trim_end_matches('/'), version.path())
    }
}

impl GenerationService for Text2MotionClient {
    fn generate(
        &self,
        request: &GenerateRequest,
        version: ModelVersion,
    ) -> Result<Option<String>> {
        if !self.config.online_access {
            return Err(ClientError::Offline);
        }

        let url = self.endpoint(version);
        log::info!(
            "Requesting Text2Motion server with prompt: {}",
            request.prompt
        );
        log::debug!("POST {} ({} bones)", url, request.target_skeleton.bone_count());

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(request)
            .send()?;

        let status = response.status();
        let body = response.text()?;

        if !status.is_success() {
            let kind = ErrorKind::from_status(status.as_u16());
            log::error!(
                "Failed to generate animation for prompt: {}\nHTTP status: {}\nBody: {}",
                request.prompt,
                status,
                body
            );
            return Err(ClientError::Api {
                kind,
                status: status.as_u16(),
                body,
            });
        }

        let response: GenerateResponse = serde_json::from_str(&body)?;
        let payload = response.into_payload();
        if payload.is_none() {
            log::warn!("Server returned no animation for prompt: {}", request.prompt);
        }
        Ok(payload)
    }
}
