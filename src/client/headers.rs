//! Request header composition.

use crate::auth::AccessToken;
use crate::errors::{AnalyticsResult, RequestError, ValidationError};
use crate::session::SessionContext;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};

/// Header carrying the client id.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Header binding a request to the resolved tenant.
pub const TENANT_HEADER: &str = "x-proxy-global-company-id";

/// Composes the headers every Analytics request carries.
#[derive(Debug, Clone, Copy)]
pub struct HeaderBuilder<'a> {
    token: &'a AccessToken,
    api_key: &'a str,
    global_company_id: Option<&'a str>,
}

impl<'a> HeaderBuilder<'a> {
    /// Creates a builder for a token that is not yet bound to a tenant.
    pub fn new(token: &'a AccessToken, api_key: &'a str) -> Self {
        Self {
            token,
            api_key,
            global_company_id: None,
        }
    }

    /// Creates a builder bound to a session's token and tenant.
    pub fn for_session(session: &'a SessionContext, api_key: &'a str) -> Self {
        Self::new(session.access_token(), api_key).with_company_id(session.global_company_id())
    }

    /// Binds the builder to a resolved global company id.
    pub fn with_company_id(mut self, global_company_id: &'a str) -> Self {
        self.global_company_id = Some(global_company_id);
        self
    }

    /// Builds the header map.
    ///
    /// With `global_id` set the tenant header is omitted, which is what the
    /// discovery call needs. Otherwise the tenant header is required.
    /// `additional` headers are merged last and win on collision.
    pub fn build(
        &self,
        additional: Option<&HeaderMap>,
        global_id: bool,
    ) -> AnalyticsResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTHORIZATION, header_value(&self.token.authorization_header())?);
        headers.insert(HeaderName::from_static(API_KEY_HEADER), header_value(self.api_key)?);

        if !global_id {
            let company_id = self
                .global_company_id
                .ok_or(ValidationError::TenantUnresolved)?;
            headers.insert(HeaderName::from_static(TENANT_HEADER), header_value(company_id)?);
        }

        if let Some(additional) = additional {
            for name in additional.keys() {
                headers.remove(name);
                for value in additional.get_all(name) {
                    headers.append(name.clone(), value.clone());
                }
            }
        }

        Ok(headers)
    }
}

fn header_value(value: &str) -> AnalyticsResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RequestError::InvalidHeader(e.to_string()).into())
}
