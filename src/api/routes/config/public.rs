//! Public types for the endpoint configuration API
use serde::{Deserialize, Serialize};

use crate::core::{ApiConfig, AuthScheme, EndpointConfig, EndpointName};
use crate::net::redact::MASK;

/// An endpoint as shown to clients. The credential is never echoed
/// back, only whether one is set.
#[derive(Serialize)]
pub struct EndpointView {
    pub label: String,
    pub url: String,
    pub credential: String,
    pub auth_scheme: AuthScheme,
}

impl EndpointView {
    fn new(name: EndpointName, config: &EndpointConfig) -> Self {
        let credential = if config.credential.is_empty() {
            String::new()
        } else {
            MASK.to_string()
        };
        Self {
            label: name.label().to_string(),
            url: config.url.clone(),
            credential,
            auth_scheme: config.auth_scheme,
        }
    }
}

#[derive(Serialize)]
pub struct ConfigResponse {
    pub primary: EndpointView,
    pub secondary: EndpointView,
    pub selected: EndpointName,
}

impl From<&ApiConfig> for ConfigResponse {
    fn from(config: &ApiConfig) -> Self {
        Self {
            primary: EndpointView::new(EndpointName::Primary, &config.primary),
            secondary: EndpointView::new(EndpointName::Secondary, &config.secondary),
            selected: config.selected,
        }
    }
}

/// Partial update, absent fields are left alone
#[derive(Deserialize)]
pub struct UpdateEndpointRequest {
    pub url: Option<String>,
    pub credential: Option<String>,
    pub auth_scheme: Option<AuthScheme>,
}

#[derive(Deserialize)]
pub struct SelectEndpointRequest {
    pub endpoint: EndpointName,
}
