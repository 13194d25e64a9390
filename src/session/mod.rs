//! Per-client session state.

use crate::auth::AccessToken;
use crate::errors::ValidationError;
use chrono::{Duration, Local, NaiveDate};
use std::fmt;
use url::Url;

/// Number of days covered by the default date range.
pub const DEFAULT_RANGE_DAYS: u32 = 7;

/// Inclusive reporting window, midnight to midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidDateRange {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// The last `days` days ending today, evaluated at call time.
    pub fn last_days(days: u32) -> Result<Self, ValidationError> {
        let end = Local::now().date_naive();
        let start = Duration::try_days(i64::from(days))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or(ValidationError::DateOutOfRange { days })?;
        Self::new(start, end)
    }

    /// Resolves optional bounds against the default window.
    ///
    /// A missing start defaults to seven days ago and a missing end to today.
    pub fn resolve(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let default = Self::last_days(DEFAULT_RANGE_DAYS)?;
        Self::new(start.unwrap_or(default.start), end.unwrap_or(default.end))
    }

    /// Range start.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Range end.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Renders `YYYY-MM-DDT00:00:00.000/YYYY-MM-DDT00:00:00.000`.
    pub fn format(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}T00:00:00.000/{}T00:00:00.000",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

/// Authenticated, tenant-bound session.
///
/// Built once by the client after the token exchange and tenant resolution;
/// only the owning client mutates it.
#[derive(Debug, Clone)]
pub struct SessionContext {
    access_token: AccessToken,
    global_company_id: String,
    base_reporting_url: Url,
    rsid: String,
    date_range: Option<DateRange>,
}

impl SessionContext {
    /// Creates a session for a resolved tenant.
    pub fn new(
        access_token: AccessToken,
        global_company_id: impl Into<String>,
        base_reporting_url: Url,
        rsid: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            global_company_id: global_company_id.into(),
            base_reporting_url,
            rsid: rsid.into(),
            date_range: None,
        }
    }

    /// Current access token.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Resolved global company id.
    pub fn global_company_id(&self) -> &str {
        &self.global_company_id
    }

    /// Tenant-scoped base reporting URL.
    pub fn base_reporting_url(&self) -> &Url {
        &self.base_reporting_url
    }

    /// Report suite id appended to every request.
    pub fn rsid(&self) -> &str {
        &self.rsid
    }

    /// Active date range, if one was set.
    pub fn date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref()
    }

    /// Time elapsed since the access token was obtained.
    pub fn token_age(&self) -> Duration {
        self.access_token.age()
    }

    pub(crate) fn set_date_range(&mut self, range: DateRange) {
        self.date_range = Some(range);
    }

    pub(crate) fn replace_token(&mut self, token: AccessToken) {
        self.access_token = token;
    }
}
