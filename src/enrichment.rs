//! Enrichment lookup client
//!
//! Thin client over the paid company-database API. Two entry points:
//! lookup by domain and lookup by name (+ optional location). Both normalize
//! the domain before calling out, because the remote service is sensitive to
//! canonical form. Results are routed through the reconciliation engine; this
//! client never touches the profile.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain_utils;
use crate::profile::CompanyFacts;

#[derive(Error, Debug, PartialEq)]
pub enum EnrichmentFailure {
    #[error("No company record found for {0}")]
    NotFound(String),

    #[error("Enrichment service rate limit exceeded")]
    RateLimited,

    #[error("Enrichment transport error: {0}")]
    TransportError(String),
}

/// Tagged success/failure of one enrichment lookup.
pub type EnrichmentResult = Result<CompanyFacts, EnrichmentFailure>;

/// Company record as the remote API serves it. Field names and shapes differ
/// from our model; `normalize` maps them onto `CompanyFacts`.
#[derive(Debug, Deserialize)]
struct ApiCompanyRecord {
    name: Option<String>,
    industry: Option<String>,
    #[serde(alias = "employees_range", alias = "employee_count")]
    employees: Option<String>,
    #[serde(alias = "founded_year")]
    founded: Option<u16>,
    #[serde(alias = "revenue_range", alias = "annual_revenue")]
    revenue: Option<String>,
    #[serde(default, alias = "social_links")]
    social_profiles: Vec<String>,
}

impl ApiCompanyRecord {
    fn normalize(self) -> CompanyFacts {
        CompanyFacts {
            name: self.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            industry: self
                .industry
                .map(|i| i.trim().to_lowercase())
                .filter(|i| !i.is_empty()),
            employee_count: self.employees,
            founded: self.founded,
            annual_revenue_bucket: self.revenue,
            social_profiles: self.social_profiles,
        }
    }
}

pub struct EnrichmentClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl EnrichmentClient {
    /// Build a client from configuration. The API key is read from the
    /// environment variable the config names; a missing key still builds a
    /// client (requests then go out unauthenticated and the service decides).
    pub fn from_config(config: &AppConfig) -> Result<Self, EnrichmentFailure> {
        let api_key = std::env::var(&config.enrichment.api_key_env).ok();
        if api_key.is_none() {
            debug!(
                "No enrichment API key in ${}; proceeding unauthenticated",
                config.enrichment.api_key_env
            );
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.enrichment.timeout_secs))
            .user_agent(&config.http.user_agent)
            .build()
            .map_err(|e| EnrichmentFailure::TransportError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.enrichment.api_base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// Client against an explicit base URL. Used by tests with a mock server.
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, EnrichmentFailure> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| EnrichmentFailure::TransportError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Look up company facts by domain.
    pub async fn by_domain(&self, domain: &str) -> EnrichmentResult {
        let domain = domain_utils::normalize_domain(domain);
        debug!("Enrichment lookup by domain: {}", domain);
        self.lookup(&[("domain", domain.as_str())], &domain).await
    }

    /// Look up company facts by name, optionally constrained to a location.
    pub async fn by_name(&self, name: &str, location: Option<&str>) -> EnrichmentResult {
        let name = name.trim();
        debug!("Enrichment lookup by name: {}", name);
        match location {
            Some(loc) => {
                self.lookup(&[("name", name), ("location", loc)], name).await
            }
            None => self.lookup(&[("name", name)], name).await,
        }
    }

    async fn lookup(&self, query: &[(&str, &str)], subject: &str) -> EnrichmentResult {
        let url = format!("{}/companies/lookup", self.base_url);

        let mut request = self.client.get(&url).query(query);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EnrichmentFailure::TransportError(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {}
            reqwest::StatusCode::NOT_FOUND => {
                return Err(EnrichmentFailure::NotFound(subject.to_string()))
            }
            reqwest::StatusCode::TOO_MANY_REQUESTS => return Err(EnrichmentFailure::RateLimited),
            status => {
                return Err(EnrichmentFailure::TransportError(format!(
                    "unexpected status {}",
                    status
                )))
            }
        }

        let record: ApiCompanyRecord = response
            .json()
            .await
            .map_err(|e| EnrichmentFailure::TransportError(format!("bad response body: {}", e)))?;

        let facts = record.normalize();
        if facts == CompanyFacts::default() {
            // A 200 with an empty record is still "not found" for our purposes
            return Err(EnrichmentFailure::NotFound(subject.to_string()));
        }

        debug!("Enrichment found record for {}: {:?}", subject, facts.name);
        Ok(facts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_record_normalization() {
        let raw = r#"{
            "name": "  Acme Widgets Inc  ",
            "industry": "Manufacturing",
            "employees_range": "11-50",
            "founded_year": 1987,
            "revenue_range": "$1M-$10M",
            "social_links": ["https://linkedin.com/company/acme-widgets"]
        }"#;
        let record: ApiCompanyRecord = serde_json::from_str(raw).unwrap();
        let facts = record.normalize();

        assert_eq!(facts.name.as_deref(), Some("Acme Widgets Inc"));
        assert_eq!(facts.industry.as_deref(), Some("manufacturing"));
        assert_eq!(facts.employee_count.as_deref(), Some("11-50"));
        assert_eq!(facts.founded, Some(1987));
        assert_eq!(facts.annual_revenue_bucket.as_deref(), Some("$1M-$10M"));
        assert_eq!(facts.social_profiles.len(), 1);
    }

    #[test]
    fn test_empty_strings_normalize_to_none() {
        let raw = r#"{"name": "   ", "industry": ""}"#;
        let record: ApiCompanyRecord = serde_json::from_str(raw).unwrap();
        let facts = record.normalize();
        assert_eq!(facts.name, None);
        assert_eq!(facts.industry, None);
    }
}
