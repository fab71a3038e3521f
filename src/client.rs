//! Client-side connection setup
//!
//! Every exercise client resolves its proxy the same way: build an endpoint
//! from host and port, connect eagerly, and wrap the resulting channel in the
//! generated service client. A failed connect means no usable proxy.

use crate::error::ClientError;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Default port shared by every exercise server
pub const DEFAULT_PORT: u16 = 10000;

/// Default host the clients connect to
pub const DEFAULT_HOST: &str = "localhost";

/// Client configuration
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Server host name or IP address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Upper bound on establishing the connection
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// URI of the gRPC endpoint. Bare IPv6 literals are bracketed.
    pub fn endpoint_uri(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("http://[{}]:{}", self.host, self.port)
        } else {
            format!("http://{}:{}", self.host, self.port)
        }
    }
}

/// Connect to the configured endpoint
pub async fn connect_channel(config: &ClientConfig) -> Result<Channel, ClientError> {
    let uri = config.endpoint_uri();
    tracing::info!("Connecting to server at {}", uri);

    let endpoint = Endpoint::from_shared(uri.clone())
        .map_err(|_| ClientError::InvalidEndpoint(uri.clone()))?
        .connect_timeout(config.connect_timeout);

    endpoint
        .connect()
        .await
        .map_err(|source| ClientError::Connect { uri, source })
}
