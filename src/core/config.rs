use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Error, anyhow};
use serde::{Deserialize, Serialize};

use crate::openai::DEFAULT_MODEL;

pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";

/// Matches the ten minute ceiling used for non-streaming completions.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60 * 10;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum AuthScheme {
    #[serde(rename = "bearer")]
    Bearer,
    #[serde(rename = "test-key")]
    TestKey,
}

impl FromStr for AuthScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bearer" => Ok(AuthScheme::Bearer),
            "test-key" => Ok(AuthScheme::TestKey),
            other => Err(anyhow!("Unknown auth scheme: {}", other)),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum EndpointName {
    #[serde(rename = "primary")]
    Primary,
    #[serde(rename = "secondary")]
    Secondary,
}

impl EndpointName {
    /// Short tag shown next to each network log entry: the primary
    /// endpoint is called directly, the secondary one goes through
    /// the egress gateway.
    pub fn label(&self) -> &'static str {
        match self {
            EndpointName::Primary => "DIR",
            EndpointName::Secondary => "EGW",
        }
    }
}

impl fmt::Display for EndpointName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EndpointName::Primary => write!(f, "primary"),
            EndpointName::Secondary => write!(f, "secondary"),
        }
    }
}

impl FromStr for EndpointName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "primary" | "dir" => Ok(EndpointName::Primary),
            "secondary" | "egw" => Ok(EndpointName::Secondary),
            other => Err(anyhow!("Unknown endpoint: {}", other)),
        }
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct EndpointConfig {
    pub url: String,
    pub credential: String,
    pub auth_scheme: AuthScheme,
}

impl EndpointConfig {
    pub fn new(url: &str, credential: &str, auth_scheme: AuthScheme) -> Self {
        Self {
            url: url.to_string(),
            credential: credential.to_string(),
            auth_scheme,
        }
    }
}

/// The two configurable endpoints and which one new requests go to.
///
/// Owned by a `Session`. Requests copy the selected endpoint with
/// `snapshot` when they start so edits made while a request is in
/// flight only affect the next one.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct ApiConfig {
    pub primary: EndpointConfig,
    pub secondary: EndpointConfig,
    pub selected: EndpointName,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            primary: EndpointConfig::new("", "", AuthScheme::Bearer),
            secondary: EndpointConfig::new("", "", AuthScheme::TestKey),
            selected: EndpointName::Primary,
        }
    }
}

impl ApiConfig {
    pub fn endpoint(&self, name: EndpointName) -> &EndpointConfig {
        match name {
            EndpointName::Primary => &self.primary,
            EndpointName::Secondary => &self.secondary,
        }
    }

    fn endpoint_mut(&mut self, name: EndpointName) -> &mut EndpointConfig {
        match name {
            EndpointName::Primary => &mut self.primary,
            EndpointName::Secondary => &mut self.secondary,
        }
    }

    pub fn select(&mut self, name: EndpointName) {
        self.selected = name;
    }

    pub fn set_url(&mut self, name: EndpointName, url: &str) {
        self.endpoint_mut(name).url = url.trim().trim_end_matches('/').to_string();
    }

    pub fn set_credential(&mut self, name: EndpointName, credential: &str) {
        self.endpoint_mut(name).credential = credential.trim().to_string();
    }

    pub fn set_auth_scheme(&mut self, name: EndpointName, auth_scheme: AuthScheme) {
        self.endpoint_mut(name).auth_scheme = auth_scheme;
    }

    pub fn snapshot(&self) -> (EndpointName, EndpointConfig) {
        (self.selected, self.endpoint(self.selected).clone())
    }
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub model: String,
    pub greeting: String,
    pub request_timeout: Option<Duration>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut api = ApiConfig::default();
        api.set_url(
            EndpointName::Primary,
            &env::var("CHATSCOPE_PRIMARY_URL").unwrap_or_default(),
        );
        api.set_credential(
            EndpointName::Primary,
            &env::var("CHATSCOPE_PRIMARY_KEY").unwrap_or_default(),
        );
        api.set_url(
            EndpointName::Secondary,
            &env::var("CHATSCOPE_SECONDARY_URL").unwrap_or_default(),
        );
        api.set_credential(
            EndpointName::Secondary,
            &env::var("CHATSCOPE_SECONDARY_KEY").unwrap_or_default(),
        );
        if let Ok(selected) = env::var("CHATSCOPE_ENDPOINT") {
            match selected.parse() {
                Ok(name) => api.select(name),
                Err(e) => tracing::warn!("Ignoring CHATSCOPE_ENDPOINT: {}", e),
            }
        }

        let model = env::var("CHATSCOPE_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let greeting =
            env::var("CHATSCOPE_GREETING").unwrap_or_else(|_| DEFAULT_GREETING.to_string());
        let timeout_secs = env::var("CHATSCOPE_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        Self {
            api,
            model,
            greeting,
            request_timeout,
        }
    }
}
