//! Configuration for SwapRate SDK

use crate::error::{Result, SwapRateError};
use crate::types::constants::{endpoints, socket};
use std::str::FromStr;
use url::Url;

/// Target deployment of the SwapRate API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Namespace {
    /// Production API
    #[default]
    Production,
    /// Staging API
    Development,
}

impl Namespace {
    /// Base REST endpoint for this namespace
    pub fn endpoint(&self) -> &'static str {
        match self {
            Namespace::Production => endpoints::PRODUCTION,
            Namespace::Development => endpoints::DEVELOPMENT,
        }
    }
}

impl FromStr for Namespace {
    type Err = SwapRateError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "production" => Ok(Namespace::Production),
            "development" => Ok(Namespace::Development),
            _ => Err(SwapRateError::config(
                "Invalid namespace. Use 'production' or 'development'",
            )),
        }
    }
}

impl std::fmt::Display for Namespace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Namespace::Production => write!(f, "production"),
            Namespace::Development => write!(f, "development"),
        }
    }
}

/// Configuration for SwapRate client
#[derive(Debug, Clone)]
pub struct Config {
    /// Deployment this configuration targets
    pub namespace: Namespace,

    /// API base URL (e.g. `https://api.swaprate.finance/v1`)
    pub api_url: Url,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Config {
    /// Create a configuration for one of the known deployments
    pub fn new(namespace: Namespace) -> Result<Self> {
        let api_url = Url::parse(namespace.endpoint())
            .map_err(|e| SwapRateError::config(format!("Invalid API URL: {}", e)))?;

        Ok(Self {
            namespace,
            api_url,
            timeout_secs: 30,
        })
    }

    /// Create a configuration pointing at an arbitrary API URL.
    ///
    /// The namespace is reported as [`Namespace::Development`] unless the URL
    /// is the production endpoint.
    pub fn from_api_url(api_url: &str) -> Result<Self> {
        let api_url = Url::parse(api_url).map_err(|_| SwapRateError::config("Invalid API URL"))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(SwapRateError::config("Unsupported URL scheme"));
        }

        let namespace = if api_url.as_str().trim_end_matches('/') == endpoints::PRODUCTION {
            Namespace::Production
        } else {
            Namespace::Development
        };

        Ok(Self {
            namespace,
            api_url,
            timeout_secs: 30,
        })
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Check if this is production
    pub fn is_production(&self) -> bool {
        self.namespace == Namespace::Production
    }

    /// API base URL without a trailing slash
    pub fn api_base(&self) -> String {
        self.api_url.as_str().trim_end_matches('/').to_string()
    }

    /// Socket.IO namespace derived from the API path (`/v1` for the public endpoints)
    pub fn socket_namespace(&self) -> String {
        let path = self.api_url.path().trim_end_matches('/');
        if path.is_empty() {
            "/".to_string()
        } else {
            path.to_string()
        }
    }

    /// WebSocket URL of the Socket.IO endpoint serving this API
    pub fn socket_url(&self) -> Result<Url> {
        let mut url = self.api_url.clone();
        let scheme = match url.scheme() {
            "https" => "wss",
            "http" => "ws",
            _ => return Err(SwapRateError::config("Unsupported URL scheme")),
        };
        url.set_scheme(scheme)
            .map_err(|_| SwapRateError::config("Unsupported URL scheme"))?;
        url.set_path(socket::PATH);
        url.set_query(Some(&format!(
            "EIO={}&transport=websocket",
            socket::ENGINE_IO_VERSION
        )));
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_namespace_from_str() {
        assert_eq!(
            Namespace::from_str("production").unwrap(),
            Namespace::Production
        );
        assert_eq!(
            Namespace::from_str("Development").unwrap(),
            Namespace::Development
        );
        assert!(Namespace::from_str("mainnet").is_err());
        assert_eq!(Namespace::Development.to_string(), "development");
    }

    #[test]
    fn test_default_endpoints() {
        let prod = Config::new(Namespace::Production).unwrap();
        assert!(prod.is_production());
        assert_eq!(prod.api_base(), "https://api.swaprate.finance/v1");

        let dev = Config::new(Namespace::Development).unwrap();
        assert!(!dev.is_production());
        assert_eq!(dev.api_base(), "https://api.stage.swaprate.finance/v1");
        assert_eq!(dev.timeout_secs, 30);
    }

    #[test]
    fn test_socket_url_and_namespace() {
        let config = Config::new(Namespace::Production).unwrap();
        assert_eq!(
            config.socket_url().unwrap().as_str(),
            "wss://api.swaprate.finance/socket.io/?EIO=3&transport=websocket"
        );
        assert_eq!(config.socket_namespace(), "/v1");

        let local = Config::from_api_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(
            local.socket_url().unwrap().as_str(),
            "ws://127.0.0.1:8080/socket.io/?EIO=3&transport=websocket"
        );
        assert_eq!(local.socket_namespace(), "/");
        assert_eq!(local.namespace, Namespace::Development);
    }

    #[test]
    fn test_from_api_url_rejects_bad_input() {
        assert!(Config::from_api_url("not a url").is_err());
        assert!(Config::from_api_url("ftp://example.com").is_err());
        assert!(Config::from_api_url("https://api.swaprate.finance/v1")
            .unwrap()
            .is_production());
    }

    #[test]
    fn test_with_timeout() {
        let config = Config::new(Namespace::Production).unwrap().with_timeout(5);
        assert_eq!(config.timeout_secs, 5);
    }
}
