use std::error::Error as StdError;
use std::fmt::Write as _;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the `zenoss-api` crate.
///
/// Distinguishes configuration mistakes (bad construction parameters,
/// unknown routers) from transient network failures. Application-level
/// errors inside a successful HTTP response are never mapped here; the
/// raw body is handed back to the caller instead.
#[derive(Debug, Error)]
pub enum Error {
    // ── Configuration ───────────────────────────────────────────────
    /// Invalid construction parameters (unwritable cookie directory, bad host).
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Router identifier not present in the router table.
    #[error("Router \"{router}\" is not available")]
    UnknownRouter { router: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, TLS).
    #[error("HTTP transport error: {}", chain(.0))]
    Transport(#[from] reqwest::Error),

    /// HTTP client construction or CA certificate loading failed.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── Session ─────────────────────────────────────────────────────
    /// Reading or writing the session cookie file failed.
    #[error("Session cookie store {} failed: {source}", .path.display())]
    SessionStore {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// Request parameters could not be encoded as JSON.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Response body did not match the type requested by the caller.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` for failures caused by how the client was set up
    /// or called, as opposed to what happened on the wire.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::UnknownRouter { .. })
    }

    /// Returns `true` if this is a transient error worth retrying.
    ///
    /// The client itself never retries.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            _ => false,
        }
    }
}

/// Flatten an error and its sources into one line.
///
/// `reqwest::Error` hides the underlying cause (e.g. "Connection refused")
/// behind `source()`, so the top-level message alone is not diagnostic.
fn chain(err: &reqwest::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let _ = write!(out, ": {cause}");
        source = cause.source();
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn unknown_router_names_the_router() {
        let err = Error::UnknownRouter {
            router: "TreeRouter".into(),
        };
        assert_eq!(err.to_string(), "Router \"TreeRouter\" is not available");
        assert!(err.is_configuration());
        assert!(!err.is_transient());
    }

    #[test]
    fn session_store_includes_path() {
        let err = Error::SessionStore {
            path: PathBuf::from("/tmp/zenoss_cookie.txt"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/tmp/zenoss_cookie.txt"), "got: {msg}");
        assert!(msg.contains("denied"), "got: {msg}");
        assert!(!err.is_configuration());
    }

    #[test]
    fn serialization_error_converts() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
