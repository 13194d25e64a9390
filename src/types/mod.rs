//! Request and response types shared across services.

use crate::errors::DiscoveryError;
use serde::{Deserialize, Serialize};

/// Default page size for discovery listings.
pub const DEFAULT_LIMIT: u32 = 10;

/// Response of `GET discovery/me`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResponse {
    /// IMS organizations the technical account belongs to.
    #[serde(default)]
    pub ims_orgs: Vec<ImsOrg>,
}

impl DiscoveryResponse {
    /// Returns `imsOrgs[0].companies[0].globalCompanyId`.
    pub fn global_company_id(&self) -> Result<&str, DiscoveryError> {
        let org = self.ims_orgs.first().ok_or(DiscoveryError::NoOrganizations)?;

        let company = org.companies.first().ok_or_else(|| DiscoveryError::NoCompanies {
            org: org.ims_org_id.clone().unwrap_or_default(),
        })?;

        company
            .global_company_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(DiscoveryError::MissingCompanyId)
    }
}

/// IMS organization entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImsOrg {
    /// IMS organization id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ims_org_id: Option<String>,

    /// Analytics companies under the organization.
    #[serde(default)]
    pub companies: Vec<Company>,
}

/// Analytics company (tenant) entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    /// Global company id used to scope reporting endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_company_id: Option<String>,

    /// Display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,

    /// Rate limit policy name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_rate_limit_policy: Option<String>,
}

/// Page parameters for paginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    /// Page size.
    pub limit: u32,
    /// Zero-based page index.
    pub page: u32,
}

impl ListParams {
    /// Creates page parameters.
    pub fn new(limit: u32, page: u32) -> Self {
        Self { limit, page }
    }
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            page: 0,
        }
    }
}

/// Limit-only parameters for unpaginated listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitParams {
    /// Maximum number of entries.
    pub limit: u32,
}

impl Default for LimitParams {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}
