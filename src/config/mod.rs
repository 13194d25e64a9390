//! Configuration for the Adobe Analytics client.

use crate::errors::{AnalyticsResult, ConfigurationError};
use chrono::Duration as ChronoDuration;
use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default IMS host used for the JWT exchange and assertion claims.
pub const DEFAULT_IMS_URL: &str = "https://ims-na1.adobelogin.com/";

/// Path of the JWT exchange endpoint, relative to the IMS host.
pub const JWT_EXCHANGE_PATH: &str = "ims/exchange/jwt";

/// Default Analytics API root; discovery is served here directly.
pub const DEFAULT_API_ROOT: &str = "https://analytics.adobe.io/";

/// Default private key location read by [`Credentials::from_env`].
pub const DEFAULT_PRIVATE_KEY_PATH: &str = "./creds/keys/private.key";

/// Default lifetime of a signed assertion (24 hours).
pub const DEFAULT_ASSERTION_LIFETIME_HOURS: i64 = 24;

/// IMS metascopes requested in the assertion.
pub mod metascopes {
    /// Analytics bulk ingest / reporting metascope.
    pub const ENT_ANALYTICS_BULK_INGEST_SDK: &str = "ent_analytics_bulk_ingest_sdk";
}

/// Technical account credentials.
///
/// Immutable once built; the secret fields never appear in `Debug` output.
#[derive(Clone)]
pub struct Credentials {
    /// IMS organization id (`...@AdobeOrg`).
    pub org_id: String,
    /// Technical account id.
    pub tech_id: String,
    /// Client id (API key).
    pub client_id: String,
    client_secret: SecretString,
    private_key: SecretString,
}

impl Credentials {
    /// Creates credentials from already-resolved values.
    pub fn new(
        org_id: impl Into<String>,
        tech_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        private_key: impl Into<String>,
    ) -> Self {
        Self {
            org_id: org_id.into(),
            tech_id: tech_id.into(),
            client_id: client_id.into(),
            client_secret: SecretString::new(client_secret.into()),
            private_key: SecretString::new(private_key.into()),
        }
    }

    /// Loads credentials from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `ORG_ID`, `TECH_ID`, `CLIENT_ID`, `CLIENT_SECRET` (required)
    /// - `PRIVATE_KEY_PATH` (optional): PEM key file, defaults to
    ///   `./creds/keys/private.key`
    pub fn from_env() -> AnalyticsResult<Self> {
        let key_path = std::env::var("PRIVATE_KEY_PATH")
            .unwrap_or_else(|_| DEFAULT_PRIVATE_KEY_PATH.to_string());

        Ok(Self::new(
            env_var("ORG_ID")?,
            env_var("TECH_ID")?,
            env_var("CLIENT_ID")?,
            env_var("CLIENT_SECRET")?,
            read_private_key(&key_path)?,
        ))
    }

    /// Returns the client secret.
    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    /// Returns the PEM-encoded private key.
    pub(crate) fn private_key(&self) -> &str {
        self.private_key.expose_secret()
    }

    fn validate(&self) -> AnalyticsResult<()> {
        let required = [
            ("org_id", self.org_id.as_str()),
            ("tech_id", self.tech_id.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret()),
            ("private_key", self.private_key()),
        ];

        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigurationError::MissingCredentials(format!(
                    "{} must not be empty",
                    name
                ))
                .into());
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("org_id", &self.org_id)
            .field("tech_id", &self.tech_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}

fn env_var(name: &str) -> AnalyticsResult<String> {
    std::env::var(name).map_err(|_| {
        ConfigurationError::MissingEnvironment {
            name: name.to_string(),
        }
        .into()
    })
}

/// Reads a PEM private key from disk.
pub fn read_private_key(path: impl AsRef<Path>) -> AnalyticsResult<String> {
    let path = path.as_ref();
    std::fs::read_to_string(path).map_err(|e| {
        ConfigurationError::PrivateKeyUnreadable {
            path: path.display().to_string(),
            message: e.to_string(),
        }
        .into()
    })
}

/// Connection pool configuration.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,

    /// Idle timeout.
    pub idle_timeout: Option<Duration>,

    /// Connection establishment timeout.
    pub connect_timeout: Option<Duration>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Some(Duration::from_secs(90)),
            connect_timeout: None,
        }
    }
}

/// Configuration for the Adobe Analytics client.
#[derive(Clone, Debug)]
pub struct AnalyticsConfig {
    /// Technical account credentials.
    pub credentials: Credentials,

    /// Report suite id appended to every request.
    pub rsid: String,

    /// IMS host (trailing slash normalized).
    pub ims_url: Url,

    /// Analytics API root (trailing slash normalized).
    pub api_root: Url,

    /// Metascopes claimed in the assertion.
    pub metascopes: Vec<String>,

    /// Lifetime of signed assertions.
    pub assertion_lifetime: ChronoDuration,

    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,

    /// User agent string.
    pub user_agent: String,

    /// Pool configuration.
    pub pool: PoolConfig,
}

impl AnalyticsConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> AnalyticsConfigBuilder {
        AnalyticsConfigBuilder::new()
    }

    /// Returns the JWT exchange endpoint.
    pub fn exchange_url(&self) -> AnalyticsResult<Url> {
        self.ims_url.join(JWT_EXCHANGE_PATH).map_err(|e| {
            ConfigurationError::InvalidConfiguration(format!("Invalid IMS URL: {}", e)).into()
        })
    }

    /// Validates the configuration.
    pub fn validate(&self) -> AnalyticsResult<()> {
        self.credentials.validate()?;

        if self.rsid.trim().is_empty() {
            return Err(ConfigurationError::InvalidConfiguration(
                "Report suite id must not be empty".to_string(),
            )
            .into());
        }

        if self.metascopes.is_empty() {
            return Err(ConfigurationError::InvalidConfiguration(
                "At least one metascope is required".to_string(),
            )
            .into());
        }

        if self.assertion_lifetime <= ChronoDuration::zero() {
            return Err(ConfigurationError::InvalidConfiguration(
                "Assertion lifetime must be positive".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

/// Builder for AnalyticsConfig.
pub struct AnalyticsConfigBuilder {
    credentials: Option<Credentials>,
    rsid: Option<String>,
    ims_url: Option<String>,
    api_root: Option<String>,
    metascopes: Vec<String>,
    assertion_lifetime: ChronoDuration,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    pool: PoolConfig,
}

impl AnalyticsConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            credentials: None,
            rsid: None,
            ims_url: None,
            api_root: None,
            metascopes: vec![metascopes::ENT_ANALYTICS_BULK_INGEST_SDK.to_string()],
            assertion_lifetime: ChronoDuration::hours(DEFAULT_ASSERTION_LIFETIME_HOURS),
            timeout: None,
            user_agent: None,
            pool: PoolConfig::default(),
        }
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Sets the report suite id.
    pub fn rsid(mut self, rsid: impl Into<String>) -> Self {
        self.rsid = Some(rsid.into());
        self
    }

    /// Sets the IMS host.
    pub fn ims_url(mut self, url: impl Into<String>) -> Self {
        self.ims_url = Some(url.into());
        self
    }

    /// Sets the Analytics API root.
    pub fn api_root(mut self, url: impl Into<String>) -> Self {
        self.api_root = Some(url.into());
        self
    }

    /// Replaces the requested metascopes.
    pub fn metascopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metascopes = scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the lifetime of signed assertions.
    pub fn assertion_lifetime(mut self, lifetime: ChronoDuration) -> Self {
        self.assertion_lifetime = lifetime;
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the pool configuration.
    pub fn pool(mut self, pool: PoolConfig) -> Self {
        self.pool = pool;
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> AnalyticsResult<AnalyticsConfig> {
        let credentials = self.credentials.ok_or_else(|| {
            ConfigurationError::MissingCredentials("Credentials are required".to_string())
        })?;

        let rsid = self.rsid.ok_or_else(|| {
            ConfigurationError::InvalidConfiguration("Report suite id is required".to_string())
        })?;

        let ims_url = parse_root(self.ims_url.as_deref().unwrap_or(DEFAULT_IMS_URL), "IMS")?;
        let api_root = parse_root(
            self.api_root.as_deref().unwrap_or(DEFAULT_API_ROOT),
            "API root",
        )?;

        let user_agent = self.user_agent.unwrap_or_else(|| {
            format!("integrations-adobe-analytics/{}", env!("CARGO_PKG_VERSION"))
        });

        let config = AnalyticsConfig {
            credentials,
            rsid,
            ims_url,
            api_root,
            metascopes: self.metascopes,
            assertion_lifetime: self.assertion_lifetime,
            timeout: self.timeout,
            user_agent,
            pool: self.pool,
        };

        config.validate()?;

        Ok(config)
    }
}

impl Default for AnalyticsConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a root URL, forcing a trailing slash so relative joins append.
fn parse_root(raw: &str, label: &str) -> AnalyticsResult<Url> {
    let mut url = Url::parse(raw).map_err(|e| {
        ConfigurationError::InvalidConfiguration(format!("Invalid {} URL {}: {}", label, raw, e))
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
