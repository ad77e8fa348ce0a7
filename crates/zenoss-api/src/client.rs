// Zenoss JSON-RPC client
//
// Owns the immutable connection config and dispatches router calls:
// resolve router, log in, POST the envelope with the stored session, hand
// back the raw body. Endpoint helpers (devices, events, MIBs) live in sibling
// modules as inherent methods.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use strum::{AsRefStr, Display, EnumString};
use tokio::sync::Mutex;
use tracing::{debug, trace};
use url::Url;

use crate::envelope::RpcEnvelope;
use crate::error::Error;
use crate::router::Router;
use crate::session::{COOKIE_FILE_NAME, SessionCookie};
use crate::transport::{DEFAULT_TIMEOUT, TlsMode, TransportConfig};

/// Content type sent with every request.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// Default Zenoss web port.
pub const DEFAULT_PORT: u16 = 8080;

/// URL scheme used to reach the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

// ── Configuration ───────────────────────────────────────────────────

/// Connection parameters for a [`ZenossClient`].
///
/// Built once and moved into the client; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub address: String,
    pub username: String,
    pub password: SecretString,
    pub port: u16,
    pub scheme: Scheme,
    /// Directory holding the session cookie file. Must be writable.
    pub cookie_dir: PathBuf,
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl ClientConfig {
    /// Config with the required fields set and everything else defaulted:
    /// port 8080, plain HTTP, the platform temp directory for cookies.
    pub fn new(
        address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<SecretString>,
    ) -> Self {
        Self {
            address: address.into(),
            username: username.into(),
            password: password.into(),
            port: DEFAULT_PORT,
            scheme: Scheme::default(),
            cookie_dir: std::env::temp_dir(),
            timeout: DEFAULT_TIMEOUT,
            tls: TlsMode::default(),
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    pub fn with_cookie_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cookie_dir = dir.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsMode) -> Self {
        self.tls = tls;
        self
    }

    /// `scheme://address:port`, without a trailing slash.
    pub fn origin(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.address, self.port)
    }
}

/// Check that `dir` is an existing, writable directory and return the
/// cookie file path inside it.
fn resolve_cookie_path(dir: &Path) -> Result<PathBuf, Error> {
    let unwritable = |reason: String| Error::Configuration {
        message: format!(
            "cookie directory {} does not exist or is not writable: {reason}",
            dir.display()
        ),
    };

    if !dir.is_dir() {
        return Err(unwritable("not a directory".into()));
    }

    let scratch = dir.join(format!(".{COOKIE_FILE_NAME}.{}.tmp", std::process::id()));
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&scratch)
        .map_err(|e| unwritable(e.to_string()))?;
    let _ = std::fs::remove_file(&scratch);

    Ok(dir.join(COOKIE_FILE_NAME))
}

// ── Response ────────────────────────────────────────────────────────

/// An RPC response exactly as the server sent it.
///
/// The body is not inspected: a JSON-RPC error inside an HTTP 200 comes
/// back as a normal `RawResponse`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn into_body(self) -> String {
        self.body
    }

    /// Deserialize the body as `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: self.body.clone(),
        })
    }
}

// ── Client ──────────────────────────────────────────────────────────

/// Authenticated dispatcher for the Zenoss router API.
///
/// Every call performs two sequential round-trips: a fresh login, then the
/// RPC POST. Each half runs on its own HTTP client with its own cookie
/// jar; the POST's jar is filled from the cookie file the login wrote. The
/// login-then-call sequence holds a per-client lock because both halves
/// share that file; separate clients with separate cookie directories run
/// independently.
pub struct ZenossClient {
    transport: TransportConfig,
    config: ClientConfig,
    origin: Url,
    cookie_path: PathBuf,
    call_lock: Mutex<()>,
}

impl ZenossClient {
    /// Validate `config`. TLS settings are checked here by building a
    /// client once, so a bad CA file fails at construction.
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        if config.address.trim().is_empty() {
            return Err(Error::Configuration {
                message: "address must not be empty".into(),
            });
        }

        let address = config.origin();
        let origin = Url::parse(&address).map_err(|e| Error::Configuration {
            message: format!("invalid server address {address}: {e}"),
        })?;

        let transport = TransportConfig::new(config.tls.clone(), config.timeout);
        transport.build_client()?;

        let cookie_path = resolve_cookie_path(&config.cookie_dir)?;
        debug!(%origin, cookie_path = %cookie_path.display(), "zenoss client ready");

        Ok(Self {
            transport,
            config,
            origin,
            cookie_path,
            call_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Where the session cookie is persisted.
    pub fn cookie_path(&self) -> &Path {
        &self.cookie_path
    }

    pub(crate) fn transport(&self) -> &TransportConfig {
        &self.transport
    }

    /// Absolute URL for a server-relative path.
    ///
    /// `path` is taken as a path only: `?`, `#` and spaces are
    /// percent-encoded rather than starting a query or fragment.
    pub(crate) fn url_for(&self, path: &str) -> Url {
        let mut url = self.origin.clone();
        url.set_path(path);
        url
    }

    // ── Dispatch ─────────────────────────────────────────────────────

    /// Call `method` on the router named `router`, below `target_uri`.
    ///
    /// Unknown router names fail before any network traffic.
    pub async fn dispatch<T: Serialize>(
        &self,
        router: &str,
        method: &str,
        data: T,
        target_uri: &str,
    ) -> Result<RawResponse, Error> {
        let router = Router::resolve(router)?;
        self.call(router, method, data, target_uri).await
    }

    /// Typed form of [`dispatch`](Self::dispatch).
    pub async fn call<T: Serialize>(
        &self,
        router: Router,
        method: &str,
        data: T,
        target_uri: &str,
    ) -> Result<RawResponse, Error> {
        let body = RpcEnvelope::new(router, method, data).to_body()?;
        let url = self.url_for(&router.endpoint(target_uri));

        let _guard = self.call_lock.lock().await;
        self.authenticate().await?;

        let session = SessionCookie::load(&self.cookie_path).await?;
        let http = self
            .transport
            .clone()
            .with_cookie_jar(session.to_jar(&self.origin))
            .build_client()?;

        debug!(%router, method, cookies = session.len(), "POST {}", url);
        trace!(body = %String::from_utf8_lossy(&body), "rpc envelope");

        let resp = http
            .post(url)
            .basic_auth(
                &self.config.username,
                Some(self.config.password.expose_secret()),
            )
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(Error::Transport)?;
        trace!(status, len = body.len(), "rpc response");

        Ok(RawResponse { status, body })
    }
}
