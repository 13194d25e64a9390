//! Adobe Analytics Integration Module
//!
//! An async client for the Adobe Analytics 2.0 reporting API. It
//! authenticates a technical account through the IMS JWT exchange, resolves
//! the tenant (global company id) the token belongs to, and issues discovery
//! and report requests against that tenant's reporting endpoint.
//!
//! # Features
//!
//! - **Authentication**: RS256-signed technical account assertion exchanged for a bearer token
//! - **Tenant Resolution**: one discovery call binds the session to a company
//! - **Discovery**: report suites, segments, dimensions, metrics and projects
//! - **Reports**: ad hoc ranked reports and Analysis Workspace query imports
//! - **Tables**: report responses shaped into named metric columns
//!
//! # Example
//!
//! ```no_run
//! use integrations_adobe_analytics::{AnalyticsClient, AnalyticsConfig, Credentials};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AnalyticsConfig::builder()
//!     .credentials(Credentials::from_env()?)
//!     .rsid("mysuite")
//!     .build()?;
//!
//! // Exchanges the JWT and resolves the tenant
//! let mut client = AnalyticsClient::connect(config).await?;
//!
//! // Last seven days
//! client.set_date_range(None, None)?;
//!
//! let table = client
//!     .reports()
//!     .get_report_table(&["metrics/visits", "metrics/pageviews"], "variables/page", None)
//!     .await?;
//! for row in &table.rows {
//!     println!("{}: {:?}", row.value, row.data);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

// Core modules
pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod observability;
pub mod reports;
pub mod services;
pub mod session;
pub mod transport;
pub mod types;


// Re-exports for convenience
pub use auth::{AccessToken, AuthProvider, TokenExchanger};
pub use client::{AnalyticsClient, AnalyticsClientBuilder};
pub use config::{AnalyticsConfig, AnalyticsConfigBuilder, Credentials};
pub use errors::{AnalyticsError, AnalyticsResult};
pub use reports::{ReportQuery, ReportTable};
pub use session::{DateRange, SessionContext};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use integrations_adobe_analytics::prelude::*;
/// ```
pub mod prelude {
    // Client
    pub use crate::client::{AnalyticsClient, AnalyticsClientBuilder};

    // Configuration
    pub use crate::config::{AnalyticsConfig, AnalyticsConfigBuilder, Credentials};

    // Authentication
    pub use crate::auth::{AccessToken, AuthProvider, TokenExchanger};

    // Services
    pub use crate::services::{DiscoveryService, ReportsService, WorkspaceSource};

    // Session
    pub use crate::session::{DateRange, SessionContext};

    // Reports
    pub use crate::reports::{ReportQuery, ReportRow, ReportTable};

    // Common types
    pub use crate::types::{LimitParams, ListParams};

    // Errors
    pub use crate::errors::{AnalyticsError, AnalyticsResult};

    // Transport
    pub use crate::transport::{HttpTransport, ReqwestTransport};
}
