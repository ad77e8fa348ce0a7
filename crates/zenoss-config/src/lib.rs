//! Profile configuration for Zenoss API clients.
//!
//! TOML profiles merged with `ZENOSS_`-prefixed environment variables,
//! password resolution (env + keyring + plaintext), and translation to
//! `zenoss_api::ClientConfig`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use zenoss_api::{ClientConfig, Scheme, TlsMode};

/// Environment variable consulted for the password when a profile has no
/// `password_env` of its own.
pub const PASSWORD_ENV: &str = "ZENOSS_PASSWORD";

/// Environment variable consulted when a profile has no username.
pub const USERNAME_ENV: &str = "ZENOSS_USERNAME";

const KEYRING_SERVICE: &str = "zenoss";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no credentials configured for profile '{profile}'")]
    NoCredentials { profile: String },

    #[error("profile '{profile}' not found")]
    ProfileNotFound { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

impl From<ConfigError> for zenoss_api::Error {
    fn from(err: ConfigError) -> Self {
        Self::Configuration {
            message: err.to_string(),
        }
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named explicitly.
    pub default_profile: Option<String>,

    /// Values applied to every profile that does not override them.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_scheme")]
    pub scheme: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default)]
    pub insecure: bool,

    pub cookie_dir: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            port: default_port(),
            scheme: default_scheme(),
            timeout: default_timeout(),
            insecure: false,
            cookie_dir: None,
        }
    }
}

fn default_port() -> u16 {
    zenoss_api::client::DEFAULT_PORT
}
fn default_scheme() -> String {
    "http".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named Zenoss server profile.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Profile {
    /// Host name or IP of the Zenoss server.
    pub address: String,

    pub port: Option<u16>,

    /// "http" or "https".
    pub scheme: Option<String>,

    pub username: Option<String>,

    /// Password (plaintext — prefer keyring or env var).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,

    /// Directory for the session cookie file.
    pub cookie_dir: Option<PathBuf>,

    /// Path to custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "zenoss", "zenoss").map_or_else(
        || {
            let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
            p.push(".config");
            p.push("zenoss");
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the config from the canonical path plus environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the config from `path` plus environment.
///
/// A missing file is not an error; defaults and environment still apply.
/// Nested keys use a double underscore, e.g.
/// `ZENOSS_PROFILES__PROD__ADDRESS`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("ZENOSS_").split("__"));

    Ok(figment.extract()?)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Where secrets are looked up. [`CredentialSources::system`] uses the
/// process environment and the OS keyring.
#[derive(Clone, Copy)]
pub struct CredentialSources<'a> {
    pub env: &'a dyn Fn(&str) -> Option<String>,
    pub keyring: &'a dyn Fn(&str) -> Option<String>,
}

impl CredentialSources<'static> {
    pub fn system() -> Self {
        Self {
            env: &env_var,
            keyring: &keyring_password,
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn keyring_password(profile_name: &str) -> Option<String> {
    keyring::Entry::new(KEYRING_SERVICE, &format!("{profile_name}/password"))
        .ok()?
        .get_password()
        .ok()
}

/// Resolve username and password for a profile.
///
/// Username: profile, then `ZENOSS_USERNAME`.
/// Password: the profile's `password_env` variable, then `ZENOSS_PASSWORD`,
/// then the keyring entry `zenoss` / `<profile>/password`, then plaintext.
pub fn resolve_credentials(
    profile: &Profile,
    profile_name: &str,
    sources: CredentialSources<'_>,
) -> Result<(String, SecretString), ConfigError> {
    let no_credentials = || ConfigError::NoCredentials {
        profile: profile_name.into(),
    };

    let username = profile
        .username
        .clone()
        .or_else(|| (sources.env)(USERNAME_ENV))
        .ok_or_else(no_credentials)?;

    if let Some(pw) = profile.password_env.as_deref().and_then(sources.env) {
        return Ok((username, SecretString::from(pw)));
    }

    if let Some(pw) = (sources.env)(PASSWORD_ENV) {
        return Ok((username, SecretString::from(pw)));
    }

    if let Some(pw) = (sources.keyring)(profile_name) {
        return Ok((username, SecretString::from(pw)));
    }

    if let Some(ref pw) = profile.password {
        return Ok((username, SecretString::from(pw.clone())));
    }

    Err(no_credentials())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Look up `name`, or the default profile when `name` is `None`.
    pub fn profile(&self, name: Option<&str>) -> Result<(&str, &Profile), ConfigError> {
        let name = name
            .or(self.default_profile.as_deref())
            .unwrap_or("default");
        self.profiles
            .get_key_value(name)
            .map(|(k, v)| (k.as_str(), v))
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: name.into(),
            })
    }

    /// Build a `ClientConfig` for the named (or default) profile.
    pub fn client_config(
        &self,
        name: Option<&str>,
        sources: CredentialSources<'_>,
    ) -> Result<ClientConfig, ConfigError> {
        let (profile_name, profile) = self.profile(name)?;
        profile_to_client_config(profile, profile_name, &self.defaults, sources)
    }
}

/// Build a `ClientConfig` from a profile, filling gaps from `defaults`.
pub fn profile_to_client_config(
    profile: &Profile,
    profile_name: &str,
    defaults: &Defaults,
    sources: CredentialSources<'_>,
) -> Result<ClientConfig, ConfigError> {
    if profile.address.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "address".into(),
            reason: format!("profile '{profile_name}' has no address"),
        });
    }

    let scheme_str = profile.scheme.as_deref().unwrap_or(&defaults.scheme);
    let scheme = Scheme::from_str(scheme_str).map_err(|_| ConfigError::Validation {
        field: "scheme".into(),
        reason: format!("expected 'http' or 'https', got '{scheme_str}'"),
    })?;

    let (username, password) = resolve_credentials(profile, profile_name, sources)?;

    let tls = if profile.insecure.unwrap_or(defaults.insecure) {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = profile.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let mut config = ClientConfig::new(profile.address.clone(), username, password)
        .with_port(profile.port.unwrap_or(defaults.port))
        .with_scheme(scheme)
        .with_timeout(Duration::from_secs(
            profile.timeout.unwrap_or(defaults.timeout),
        ))
        .with_tls(tls);

    if let Some(dir) = profile.cookie_dir.as_ref().or(defaults.cookie_dir.as_ref()) {
        config = config.with_cookie_dir(dir.clone());
    }

    Ok(config)
}
