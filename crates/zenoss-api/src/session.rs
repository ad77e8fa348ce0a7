// Session authentication
//
// Logs in against the Zope cookie auth helper with basic credentials and
// persists the session cookies to `<cookie_dir>/zenoss_cookie.txt`. The
// login runs with a fresh cookie jar, so cookies set on the helper's
// redirect are kept. A fresh login happens before every RPC call; nothing
// is cached.

use std::path::Path;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use secrecy::ExposeSecret;
use tracing::{debug, warn};
use url::Url;

use crate::client::{JSON_CONTENT_TYPE, ZenossClient};
use crate::error::Error;

/// Login endpoint, relative to the server root.
pub const LOGIN_PATH: &str = "/zport/acl_users/cookieAuthHelper/login";

/// File name of the cookie store inside the configured cookie directory.
pub const COOKIE_FILE_NAME: &str = "zenoss_cookie.txt";

/// Session cookies held by a login, as `name=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionCookie {
    pairs: Vec<String>,
}

impl SessionCookie {
    /// Split a `Cookie` header value produced by a jar.
    fn from_header(value: &HeaderValue) -> Self {
        let pairs = value
            .to_str()
            .unwrap_or_default()
            .split(';')
            .map(str::trim)
            .filter(|pair| !pair.is_empty())
            .map(str::to_owned)
            .collect();
        Self { pairs }
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Look up a cookie by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .filter_map(|pair| pair.split_once('='))
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v)
    }

    /// A fresh jar holding these cookies for every path on `origin`.
    pub fn to_jar(&self, origin: &Url) -> Arc<Jar> {
        let jar = Jar::default();
        for pair in &self.pairs {
            jar.add_cookie_str(&format!("{pair}; Path=/"), origin);
        }
        Arc::new(jar)
    }

    // ── Cookie file ─────────────────────────────────────────────────

    fn to_file_contents(&self) -> String {
        self.pairs.iter().map(|pair| format!("{pair}\n")).collect()
    }

    fn from_file_contents(contents: &str) -> Self {
        let pairs = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();
        Self { pairs }
    }

    /// Overwrite the cookie file at `path` with these cookies.
    pub async fn persist(&self, path: &Path) -> Result<(), Error> {
        tokio::fs::write(path, self.to_file_contents())
            .await
            .map_err(|source| Error::SessionStore {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Read cookies previously written by [`persist`](Self::persist).
    pub async fn load(path: &Path) -> Result<Self, Error> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| Error::SessionStore {
                    path: path.to_path_buf(),
                    source,
                })?;
        Ok(Self::from_file_contents(&contents))
    }
}

impl ZenossClient {
    /// Log in and persist the session cookie.
    ///
    /// Redirects from the login helper are followed and every cookie set
    /// along the way is kept. Only transport failures are errors. A
    /// non-success status is logged and the (possibly empty) cookie set is
    /// still written; the following RPC call surfaces the server's verdict.
    pub async fn authenticate(&self) -> Result<SessionCookie, Error> {
        let url = self.url_for(LOGIN_PATH);
        let jar = Arc::new(Jar::default());
        let http = self
            .transport()
            .clone()
            .with_cookie_jar(Arc::clone(&jar))
            .build_client()?;

        debug!("logging in at {}", url);
        let resp = http
            .get(url.clone())
            .basic_auth(
                &self.config().username,
                Some(self.config().password.expose_secret()),
            )
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, "login endpoint returned non-success status");
        }
        if *resp.url() != url {
            debug!(landed = %resp.url(), "login redirected");
        }
        let _ = resp.bytes().await.map_err(Error::Transport)?;

        let cookie = jar
            .cookies(&url)
            .map(|value| SessionCookie::from_header(&value))
            .unwrap_or_default();
        cookie.persist(self.cookie_path()).await?;
        debug!(cookies = cookie.len(), "session cookie stored");
        Ok(cookie)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("http://zenoss.example.com:8080").unwrap()
    }

    #[test]
    fn jar_header_is_split_into_pairs() {
        let cookie = SessionCookie::from_header(&HeaderValue::from_static(
            "__ginger_snap=abc123; _ZopeId=\"42A\"",
        ));
        assert_eq!(cookie.len(), 2);
        assert_eq!(cookie.get("__ginger_snap"), Some("abc123"));
        assert_eq!(cookie.get("_ZopeId"), Some("\"42A\""));
        assert_eq!(cookie.get("missing"), None);
    }

    #[test]
    fn values_may_contain_equals() {
        let cookie = SessionCookie::from_header(&HeaderValue::from_static("token=a=b=c"));
        assert_eq!(cookie.get("token"), Some("a=b=c"));
    }

    #[test]
    fn login_jar_keeps_attributes_out_of_pairs() {
        let jar = Jar::default();
        let login = origin().join(LOGIN_PATH).unwrap();
        jar.add_cookie_str("__ginger_snap=abc123; Path=/; HttpOnly", &login);

        let cookie = SessionCookie::from_header(&jar.cookies(&login).unwrap());
        assert_eq!(cookie.to_file_contents(), "__ginger_snap=abc123\n");
    }

    #[test]
    fn loaded_cookies_reach_every_router_path() {
        let cookie = SessionCookie::from_file_contents("session=xyz\ntoken=a=b\n");
        let jar = cookie.to_jar(&origin());
        let rpc = origin()
            .join("/zport/dmd/Devices/Server/devices/host1/device_router")
            .unwrap();
        let sent = SessionCookie::from_header(&jar.cookies(&rpc).unwrap());
        assert_eq!(sent.len(), 2);
        assert_eq!(sent.get("session"), Some("xyz"));
        assert_eq!(sent.get("token"), Some("a=b"));
    }

    #[test]
    fn empty_session_yields_no_cookie_header() {
        let jar = SessionCookie::default().to_jar(&origin());
        assert!(jar.cookies(&origin()).is_none());
    }

    #[test]
    fn cookie_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COOKIE_FILE_NAME);
        let cookie = SessionCookie::from_header(&HeaderValue::from_static("session=xyz; token=a=b"));

        tokio_test::block_on(async {
            cookie.persist(&path).await.unwrap();
            let loaded = SessionCookie::load(&path).await.unwrap();
            assert_eq!(loaded, cookie);
        });
    }

    #[test]
    fn persist_overwrites_previous_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(COOKIE_FILE_NAME);

        tokio_test::block_on(async {
            SessionCookie::from_header(&HeaderValue::from_static("old=1; stale=2"))
                .persist(&path)
                .await
                .unwrap();
            SessionCookie::from_header(&HeaderValue::from_static("new=3"))
                .persist(&path)
                .await
                .unwrap();
            let loaded = SessionCookie::load(&path).await.unwrap();
            assert_eq!(loaded.len(), 1);
            assert_eq!(loaded.get("new"), Some("3"));
        });
    }

    #[test]
    fn load_missing_file_is_a_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.txt");
        let result = tokio_test::block_on(SessionCookie::load(&path));
        assert!(matches!(result, Err(Error::SessionStore { .. })));
    }
}
