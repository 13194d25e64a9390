//! Error types for the Adobe Analytics integration.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for Adobe Analytics operations.
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Top-level error type for the Adobe Analytics integration.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Authentication error.
    #[error("Authentication error: {0}")]
    Authentication(#[from] AuthenticationError),

    /// Tenant discovery error.
    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    /// Request error.
    #[error("Request error: {0}")]
    Request(#[from] RequestError),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Response error.
    #[error("Response error: {0}")]
    Response(#[from] ResponseError),
}

impl AnalyticsError {
    /// Creates a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        AnalyticsError::Configuration(ConfigurationError::InvalidConfiguration(msg.into()))
    }

    /// Returns the HTTP status code carried by the error, if any.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            AnalyticsError::Authentication(AuthenticationError::ExchangeFailed {
                status, ..
            }) => Some(*status),
            AnalyticsError::Request(RequestError::Status { status, .. }) => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the remote API rejected the credentials or token.
    pub fn is_authentication(&self) -> bool {
        match self {
            AnalyticsError::Authentication(_) => true,
            AnalyticsError::Request(RequestError::Status { status, .. }) => {
                *status == StatusCode::UNAUTHORIZED
            }
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Missing credentials.
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Environment lookup failed.
    #[error("Environment variable {name} is not set")]
    MissingEnvironment {
        /// Variable name.
        name: String,
    },

    /// Private key file could not be read.
    #[error("Failed to read private key {path}: {message}")]
    PrivateKeyUnreadable {
        /// Key file path.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },
}

/// Authentication errors raised by the token exchange.
#[derive(Debug, Error)]
pub enum AuthenticationError {
    /// The assertion could not be signed.
    #[error("Assertion signing failed: {0}")]
    AssertionSigning(String),

    /// The identity endpoint returned a non-success status.
    #[error("Token exchange failed with status {status}: {body}")]
    ExchangeFailed {
        /// HTTP status returned by the identity endpoint.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// The identity endpoint could not be reached.
    #[error("Token exchange transport failure: {0}")]
    Transport(String),

    /// The identity endpoint answered 2xx without a usable token.
    #[error("Invalid token response: {0}")]
    InvalidTokenResponse(String),
}

/// Tenant resolution errors.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// The response body does not have the discovery shape.
    #[error("Malformed discovery response: {0}")]
    Malformed(String),

    /// The response has no IMS organizations.
    #[error("Discovery response contains no IMS organizations")]
    NoOrganizations,

    /// The first organization has no companies.
    #[error("IMS organization {org} has no companies")]
    NoCompanies {
        /// IMS organization id, if present.
        org: String,
    },

    /// The company entry has no global company id.
    #[error("Company entry has no globalCompanyId")]
    MissingCompanyId,

    /// The resolved id does not form a valid base URL.
    #[error("Invalid base reporting URL for company {company_id}: {message}")]
    InvalidBaseUrl {
        /// Resolved global company id.
        company_id: String,
        /// URL parse error message.
        message: String,
    },
}

/// Request errors raised by the executor.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The API answered with a non-success status.
    #[error("{method} {url} failed with status {status}: {body}")]
    Status {
        /// HTTP method.
        method: String,
        /// Full request URL.
        url: String,
        /// HTTP status.
        status: StatusCode,
        /// Response body.
        body: String,
    },

    /// The request never produced a response.
    #[error("{method} {url} transport failure: {message}")]
    Transport {
        /// HTTP method.
        method: String,
        /// Full request URL.
        url: String,
        /// Transport error message.
        message: String,
    },

    /// The endpoint could not be joined onto the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header value could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// The request body could not be encoded.
    #[error("Failed to encode request body: {0}")]
    Encoding(String),
}

/// Client-side validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A report was requested before a date range was set.
    #[error("Date range must be set before building a report query")]
    MissingDateRange,

    /// The date range ends before it starts.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Range start.
        start: String,
        /// Range end.
        end: String,
    },

    /// The window reaches outside the representable calendar.
    #[error("Date range of {days} days is out of range")]
    DateOutOfRange {
        /// Requested window length.
        days: u32,
    },

    /// A workspace query could not be loaded or parsed.
    #[error("Malformed workspace query: {0}")]
    MalformedWorkspace(String),

    /// Tenant headers were requested before tenant resolution.
    #[error("Global company id has not been resolved")]
    TenantUnresolved,

    /// A report query was requested without metrics.
    #[error("Report query requires at least one metric")]
    NoMetrics,
}

/// Response decoding errors.
#[derive(Debug, Error)]
pub enum ResponseError {
    /// Deserialization error.
    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    /// Unexpected format.
    #[error("Unexpected response format: {0}")]
    UnexpectedFormat(String),
}

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Network error.
    #[error("Network error: {0}")]
    Network(String),

    /// Timeout error.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP error.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else {
            TransportError::Http(err.to_string())
        }
    }
}
