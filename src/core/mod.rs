mod config;

pub use config::{
    ApiConfig, AppConfig, AuthScheme, DEFAULT_GREETING, DEFAULT_REQUEST_TIMEOUT_SECS,
    EndpointConfig, EndpointName,
};
