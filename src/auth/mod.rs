//! Technical account (JWT) authentication for Adobe IMS.
//!
//! The client authenticates by signing an assertion with the technical
//! account's private key and exchanging it at the IMS JWT endpoint for a
//! bearer access token.
//!
//! # Example
//!
//! ```no_run
//! use integrations_adobe_analytics::auth::{AuthProvider, TokenExchanger};
//! use integrations_adobe_analytics::config::{AnalyticsConfig, Credentials};
//! use integrations_adobe_analytics::transport::ReqwestTransport;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalyticsConfig::builder()
//!     .credentials(Credentials::from_env()?)
//!     .rsid("mysuite")
//!     .build()?;
//!
//! let transport = Arc::new(ReqwestTransport::with_pool(&config.pool, &config.user_agent)?);
//! let exchanger = TokenExchanger::from_config(&config, transport)?;
//! let token = exchanger.access_token().await?;
//! # Ok(())
//! # }
//! ```

use crate::config::{AnalyticsConfig, Credentials};
use crate::errors::{AnalyticsResult, AuthenticationError, RequestError};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};
use url::Url;

/// Authentication provider abstraction.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Obtains a fresh access token.
    async fn access_token(&self) -> AnalyticsResult<AccessToken>;
}

/// Bearer access token issued by IMS.
#[derive(Debug, Clone)]
pub struct AccessToken {
    token: SecretString,

    /// When the token was obtained.
    pub obtained_at: DateTime<Utc>,
}

impl AccessToken {
    /// Creates a token obtained now. Empty tokens are rejected.
    pub fn new(token: impl Into<String>) -> Result<Self, AuthenticationError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(AuthenticationError::InvalidTokenResponse(
                "access_token is empty".to_string(),
            ));
        }

        Ok(Self {
            token: SecretString::new(token),
            obtained_at: Utc::now(),
        })
    }

    /// Returns the raw token string.
    pub fn secret(&self) -> &str {
        self.token.expose_secret()
    }

    /// Returns the authorization header value.
    pub fn authorization_header(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Time elapsed since the token was obtained.
    pub fn age(&self) -> Duration {
        Utc::now() - self.obtained_at
    }
}

/// Claims of the signed technical account assertion.
///
/// Each metascope is a claim whose key is `<ims host>/s/<scope>` and whose
/// value is `true`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssertionClaims {
    /// Expiry (seconds since the epoch).
    pub exp: i64,
    /// IMS organization id.
    pub iss: String,
    /// Technical account id.
    pub sub: String,
    /// Audience: `<ims host>/c/<client id>`.
    pub aud: String,
    /// Metascope claims.
    #[serde(flatten)]
    pub metascopes: BTreeMap<String, bool>,
}

/// Signs assertions and exchanges them for access tokens.
pub struct TokenExchanger {
    credentials: Credentials,
    ims_url: Url,
    exchange_url: Url,
    metascopes: Vec<String>,
    assertion_lifetime: Duration,
    timeout: Option<std::time::Duration>,
    transport: Arc<dyn HttpTransport>,
}

impl TokenExchanger {
    /// Creates an exchanger for the given configuration, sharing `transport`.
    pub fn from_config(
        config: &AnalyticsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> AnalyticsResult<Self> {
        Ok(Self {
            credentials: config.credentials.clone(),
            ims_url: config.ims_url.clone(),
            exchange_url: config.exchange_url()?,
            metascopes: config.metascopes.clone(),
            assertion_lifetime: config.assertion_lifetime,
            timeout: config.timeout,
            transport,
        })
    }

    /// Builds the assertion claims expiring at `expires_at`.
    pub fn claims(&self, expires_at: DateTime<Utc>) -> AssertionClaims {
        let metascopes = self
            .metascopes
            .iter()
            .map(|scope| (format!("{}s/{}", self.ims_url, scope), true))
            .collect();

        AssertionClaims {
            exp: expires_at.timestamp(),
            iss: self.credentials.org_id.clone(),
            sub: self.credentials.tech_id.clone(),
            aud: format!("{}c/{}", self.ims_url, self.credentials.client_id),
            metascopes,
        }
    }

    /// Signs the assertion with the technical account's private key (RS256).
    pub fn create_assertion(
        &self,
        expires_at: DateTime<Utc>,
    ) -> Result<String, AuthenticationError> {
        let claims = self.claims(expires_at);

        let key = EncodingKey::from_rsa_pem(self.credentials.private_key().as_bytes())
            .map_err(|e| {
                AuthenticationError::AssertionSigning(format!("Invalid private key: {}", e))
            })?;

        encode(&Header::new(Algorithm::RS256), &claims, &key).map_err(|e| {
            AuthenticationError::AssertionSigning(format!("JWT encoding failed: {}", e))
        })
    }

    /// Exchanges a freshly signed assertion for an access token.
    ///
    /// `expiry` overrides the assertion expiry; by default it is now plus the
    /// configured assertion lifetime.
    pub async fn exchange(&self, expiry: Option<DateTime<Utc>>) -> AnalyticsResult<AccessToken> {
        let expires_at = expiry.unwrap_or_else(|| Utc::now() + self.assertion_lifetime);
        let jwt = self.create_assertion(expires_at)?;

        #[derive(Serialize)]
        struct ExchangeRequest<'a> {
            client_id: &'a str,
            client_secret: &'a str,
            jwt_token: &'a str,
        }

        #[derive(Deserialize)]
        struct ExchangeResponse {
            access_token: Option<String>,
        }

        let form = serde_urlencoded::to_string(ExchangeRequest {
            client_id: &self.credentials.client_id,
            client_secret: self.credentials.client_secret(),
            jwt_token: &jwt,
        })
        .map_err(|e| RequestError::Encoding(e.to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );

        debug!(url = %self.exchange_url, "Exchanging JWT assertion for access token");

        let response = self
            .transport
            .send(HttpRequest {
                method: HttpMethod::Post,
                url: self.exchange_url.clone(),
                headers,
                body: Some(Bytes::from(form)),
                timeout: self.timeout,
            })
            .await
            .map_err(|e| AuthenticationError::Transport(e.to_string()))?;

        if !response.status.is_success() {
            let body = response.text();
            warn!(status = %response.status, "JWT exchange rejected");
            return Err(AuthenticationError::ExchangeFailed {
                status: response.status,
                body,
            }
            .into());
        }

        let parsed: ExchangeResponse = serde_json::from_slice(&response.body).map_err(|e| {
            AuthenticationError::InvalidTokenResponse(format!("Failed to parse response: {}", e))
        })?;

        let token = parsed.access_token.ok_or_else(|| {
            AuthenticationError::InvalidTokenResponse("access_token missing".to_string())
        })?;

        info!(org_id = %self.credentials.org_id, "Obtained access token");

        Ok(AccessToken::new(token)?)
    }
}

#[async_trait]
impl AuthProvider for TokenExchanger {
    async fn access_token(&self) -> AnalyticsResult<AccessToken> {
        self.exchange(None).await
    }
}
