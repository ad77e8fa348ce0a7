// HTTP client construction.
//
// Turns the TLS and timeout settings of a `ClientConfig` into a
// `reqwest::Client`. Each login and each RPC POST gets a client bound to its
// own cookie jar, so no session state outlives a single call.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use reqwest::cookie::Jar;

use crate::error::Error;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// TLS verification mode for `https` connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsMode {
    /// Use the system certificate store.
    #[default]
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (for self-signed Zenoss appliances).
    DangerAcceptInvalid,
}

/// Settings shared by every HTTP client a `ZenossClient` builds.
#[derive(Debug, Clone)]
pub(crate) struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub cookie_jar: Option<Arc<Jar>>,
}

impl TransportConfig {
    pub fn new(tls: TlsMode, timeout: Duration) -> Self {
        Self {
            tls,
            timeout,
            cookie_jar: None,
        }
    }

    /// Bind built clients to `jar`.
    pub fn with_cookie_jar(mut self, jar: Arc<Jar>) -> Self {
        self.cookie_jar = Some(jar);
        self
    }

    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("zenoss-api/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        if let Some(ref jar) = self.cookie_jar {
            builder = builder.cookie_provider(Arc::clone(jar));
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn missing_ca_file_is_a_tls_error() {
        let transport = TransportConfig::new(
            TlsMode::CustomCa(PathBuf::from("/nonexistent/ca.pem")),
            DEFAULT_TIMEOUT,
        );
        match transport.build_client() {
            Err(Error::Tls(msg)) => assert!(msg.contains("failed to read CA cert"), "got: {msg}"),
            other => panic!("expected Tls error, got {other:?}"),
        }
    }

    #[test]
    fn default_modes_build() {
        assert!(
            TransportConfig::new(TlsMode::System, DEFAULT_TIMEOUT)
                .build_client()
                .is_ok()
        );
        assert!(
            TransportConfig::new(TlsMode::DangerAcceptInvalid, Duration::from_secs(1))
                .build_client()
                .is_ok()
        );
    }

    #[test]
    fn cookie_jar_is_shared_not_copied() {
        let jar = Arc::new(Jar::default());
        let transport =
            TransportConfig::new(TlsMode::System, DEFAULT_TIMEOUT).with_cookie_jar(Arc::clone(&jar));
        assert!(transport.build_client().is_ok());
        assert!(Arc::ptr_eq(transport.cookie_jar.as_ref().unwrap(), &jar));
    }
}
