//! Adobe Analytics API client implementation.

use crate::auth::{AuthProvider, TokenExchanger};
use crate::config::{AnalyticsConfig, AnalyticsConfigBuilder, Credentials};
use crate::errors::{AnalyticsError, AnalyticsResult, DiscoveryError, ValidationError};
use crate::reports::ReportQuery;
use crate::services::{DiscoveryService, ReportsService};
use crate::session::{DateRange, SessionContext};
use crate::transport::{HttpMethod, HttpTransport, ReqwestTransport};
use crate::types::DiscoveryResponse;
use chrono::NaiveDate;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use url::Url;

mod executor;
mod headers;
pub use executor::RequestExecutor;
pub use headers::{HeaderBuilder, API_KEY_HEADER, TENANT_HEADER};

/// Discovery endpoint, relative to the API root.
pub const DISCOVERY_ENDPOINT: &str = "discovery/me";

/// Adobe Analytics API client.
///
/// Construction authenticates and resolves the tenant, so a client value
/// always holds a usable [`SessionContext`]. The token is never refreshed
/// implicitly; call [`AnalyticsClient::refresh_token`] for long-lived clients.
///
/// # Example
///
/// ```no_run
/// use integrations_adobe_analytics::{AnalyticsClient, AnalyticsConfig, Credentials};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AnalyticsConfig::builder()
///     .credentials(Credentials::from_env()?)
///     .rsid("mysuite")
///     .build()?;
///
/// let mut client = AnalyticsClient::connect(config).await?;
/// client.set_date_range(None, None)?;
///
/// let report = client
///     .reports()
///     .get_report(&["metrics/visits"], "variables/page", None)
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct AnalyticsClient {
    config: AnalyticsConfig,
    auth: Arc<dyn AuthProvider>,
    executor: RequestExecutor,
    session: SessionContext,
}

impl AnalyticsClient {
    /// Connects using a pooled reqwest transport.
    pub async fn connect(config: AnalyticsConfig) -> AnalyticsResult<Self> {
        let transport = ReqwestTransport::with_pool(&config.pool, &config.user_agent)
            .map_err(|e| {
                AnalyticsError::configuration(format!("Failed to create transport: {}", e))
            })?;
        Self::connect_with_transport(config, Arc::new(transport)).await
    }

    /// Connects over the given transport, exchanging a JWT for the token.
    pub async fn connect_with_transport(
        config: AnalyticsConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> AnalyticsResult<Self> {
        let auth = Arc::new(TokenExchanger::from_config(&config, transport.clone())?);
        Self::connect_with(config, transport, auth).await
    }

    /// Connects with an explicit transport and authentication provider.
    pub async fn connect_with(
        config: AnalyticsConfig,
        transport: Arc<dyn HttpTransport>,
        auth: Arc<dyn AuthProvider>,
    ) -> AnalyticsResult<Self> {
        config.validate()?;

        let executor = RequestExecutor::new(transport, config.rsid.clone(), config.timeout);
        let token = auth.access_token().await?;

        let headers = HeaderBuilder::new(&token, &config.credentials.client_id).build(None, true)?;
        let body: Value = executor
            .execute(
                HttpMethod::Get,
                &config.api_root,
                DISCOVERY_ENDPOINT,
                headers,
                None::<&()>,
            )
            .await?;

        let discovery: DiscoveryResponse = serde_json::from_value(body)
            .map_err(|e| DiscoveryError::Malformed(e.to_string()))?;
        let company_id = discovery.global_company_id()?.to_string();
        let base_url = base_reporting_url(&config.api_root, &company_id)?;

        info!(
            global_company_id = %company_id,
            rsid = %config.rsid,
            "Resolved analytics tenant"
        );

        let session = SessionContext::new(token, company_id, base_url, config.rsid.clone());

        Ok(Self {
            config,
            auth,
            executor,
            session,
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> AnalyticsClientBuilder {
        AnalyticsClientBuilder::new()
    }

    // Service accessors

    /// Access the discovery listings.
    pub fn discovery(&self) -> DiscoveryService<'_> {
        DiscoveryService::new(self)
    }

    /// Access the reports endpoint.
    pub fn reports(&self) -> ReportsService<'_> {
        ReportsService::new(self)
    }

    /// Gets the session state.
    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    /// Gets the configuration.
    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Gets the request executor (for advanced use cases).
    pub fn executor(&self) -> &RequestExecutor {
        &self.executor
    }

    /// Builds tenant-bound headers, merging `additional` last.
    pub fn headers(&self, additional: Option<&HeaderMap>) -> AnalyticsResult<HeaderMap> {
        HeaderBuilder::for_session(&self.session, &self.config.credentials.client_id)
            .build(additional, false)
    }

    /// GETs `endpoint` relative to the base reporting URL.
    pub async fn get(
        &self,
        endpoint: &str,
        additional_headers: Option<&HeaderMap>,
    ) -> AnalyticsResult<Value> {
        let headers = self.headers(additional_headers)?;
        self.executor
            .get(self.session.base_reporting_url(), endpoint, headers)
            .await
    }

    /// POSTs `body` as JSON to `endpoint` relative to the base reporting URL.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        additional_headers: Option<&HeaderMap>,
        body: &B,
    ) -> AnalyticsResult<Value> {
        let headers = self.headers(additional_headers)?;
        self.executor
            .post(self.session.base_reporting_url(), endpoint, headers, body)
            .await
    }

    /// Sets the session's date range and returns its formatted form.
    ///
    /// Missing bounds default to seven days ago and today, evaluated now.
    pub fn set_date_range(
        &mut self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> AnalyticsResult<String> {
        let range = DateRange::resolve(start, end)?;
        self.session.set_date_range(range);
        Ok(range.format())
    }

    /// Formats the session's date range.
    pub fn format_range(&self) -> AnalyticsResult<String> {
        self.session
            .date_range()
            .map(DateRange::format)
            .ok_or_else(|| ValidationError::MissingDateRange.into())
    }

    /// Builds a report query over the session's date range.
    pub fn build_report_query<S: AsRef<str>>(
        &self,
        metrics: &[S],
        dimension: &str,
        segment_id: Option<&str>,
    ) -> AnalyticsResult<ReportQuery> {
        let range = self
            .session
            .date_range()
            .ok_or(ValidationError::MissingDateRange)?;

        Ok(ReportQuery::build(
            self.session.rsid(),
            range,
            metrics,
            dimension,
            segment_id,
        )?)
    }

    /// Obtains a new access token and swaps it into the session.
    ///
    /// The tenant binding is kept as is.
    pub async fn refresh_token(&mut self) -> AnalyticsResult<()> {
        let token = self.auth.access_token().await?;
        self.session.replace_token(token);
        info!(global_company_id = %self.session.global_company_id(), "Refreshed access token");
        Ok(())
    }
}

/// `<api root>api/<company id>/`.
fn base_reporting_url(api_root: &Url, company_id: &str) -> AnalyticsResult<Url> {
    api_root
        .join(&format!("api/{}/", company_id))
        .map_err(|e| {
            DiscoveryError::InvalidBaseUrl {
                company_id: company_id.to_string(),
                message: e.to_string(),
            }
            .into()
        })
}

/// Builder for AnalyticsClient.
///
/// Provides a fluent API for constructing a client with custom configuration.
pub struct AnalyticsClientBuilder {
    config_builder: AnalyticsConfigBuilder,
    transport: Option<Arc<dyn HttpTransport>>,
    auth: Option<Arc<dyn AuthProvider>>,
}

impl AnalyticsClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: AnalyticsConfig::builder(),
            transport: None,
            auth: None,
        }
    }

    /// Sets the credentials.
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.config_builder = self.config_builder.credentials(credentials);
        self
    }

    /// Sets the report suite id.
    pub fn rsid(mut self, rsid: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.rsid(rsid);
        self
    }

    /// Sets the IMS host.
    pub fn ims_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.ims_url(url);
        self
    }

    /// Sets the Analytics API root.
    pub fn api_root(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.api_root(url);
        self
    }

    /// Sets a per-request timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the user agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Uses a custom transport.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Uses a custom authentication provider instead of the JWT exchange.
    pub fn auth_provider(mut self, auth: Arc<dyn AuthProvider>) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Builds the configuration and connects.
    pub async fn connect(self) -> AnalyticsResult<AnalyticsClient> {
        let config = self.config_builder.build()?;

        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::with_pool(&config.pool, &config.user_agent).map_err(|e| {
                    AnalyticsError::configuration(format!("Failed to create transport: {}", e))
                })?,
            ),
        };

        let auth: Arc<dyn AuthProvider> = match self.auth {
            Some(auth) => auth,
            None => Arc::new(TokenExchanger::from_config(&config, transport.clone())?),
        };

        AnalyticsClient::connect_with(config, transport, auth).await
    }
}

impl Default for AnalyticsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
