//! Passive domain/DNS signal collection
//!
//! Given a bare domain, gathers a point-in-time technical snapshot:
//! MX records and the mail provider they imply, name-server hosting provider,
//! WHOIS registration date, SSL certificate expiry (via CT logs), and
//! technology-stack markers from the landing page response.
//!
//! One attempt per trigger; the caller decides whether to re-run. Re-running
//! replaces the snapshot wholesale.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use hickory_resolver::config::{LookupIpStrategy, ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use whois_rust::{WhoIs, WhoIsLookupOptions};

use crate::config::AppConfig;
use crate::domain_utils;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Domain {0} is unreachable")]
    Unreachable(String),

    #[error("Lookup for {0} timed out")]
    Timeout(String),

    #[error("Malformed domain: {0}")]
    MalformedDomain(String),
}

/// Immutable technical snapshot for one domain.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DomainSignal {
    pub domain: String,
    pub registration_date: Option<NaiveDate>,
    pub ssl_expiry: Option<DateTime<Utc>>,
    /// MX exchange hosts, ordered by preference.
    pub mx_records: Vec<String>,
    pub inferred_mail_provider: Option<String>,
    pub hosting_provider: Option<String>,
    pub tech_stack: BTreeSet<String>,
}

static WHOIS_CREATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^\s*(?:Creation Date|created|Registered On|Registration Date):\s*(\S+)")
        .unwrap()
});

/// crt.sh API entry (partial)
#[derive(Debug, Deserialize)]
struct CrtShEntry {
    not_after: Option<String>,
}

/// Collect the full technical snapshot for a bare domain.
///
/// The individual sub-lookups are best effort: a failed WHOIS or CT query
/// leaves its field `None` rather than failing the snapshot. Only an
/// unusable domain or a completely unreachable DNS zone is an error.
pub async fn collect(domain: &str, config: &AppConfig) -> Result<DomainSignal, LookupError> {
    let domain = domain_utils::normalize_domain(domain);
    if !domain_utils::is_valid_domain(&domain) {
        return Err(LookupError::MalformedDomain(domain));
    }

    debug!("Collecting domain signal for {}", domain);

    let resolver = build_resolver(config);
    let dns_timeout = Duration::from_secs(config.dns.lookup_timeout_secs);

    let mx_records = match tokio::time::timeout(dns_timeout, resolver.mx_lookup(domain.clone())).await
    {
        Ok(Ok(lookup)) => {
            let mut records: Vec<(u16, String)> = lookup
                .iter()
                .map(|mx| {
                    (
                        mx.preference(),
                        mx.exchange().to_utf8().trim_end_matches('.').to_string(),
                    )
                })
                .collect();
            records.sort();
            records.into_iter().map(|(_, host)| host).collect()
        }
        Ok(Err(e)) => {
            debug!("MX lookup failed for {}: {}", domain, e);
            Vec::new()
        }
        Err(_) => return Err(LookupError::Timeout(domain)),
    };

    let ns_records = match tokio::time::timeout(dns_timeout, resolver.ns_lookup(domain.clone())).await
    {
        Ok(Ok(lookup)) => lookup
            .iter()
            .map(|ns| ns.0.to_utf8().trim_end_matches('.').to_string())
            .collect::<Vec<String>>(),
        Ok(Err(e)) => {
            debug!("NS lookup failed for {}: {}", domain, e);
            Vec::new()
        }
        Err(_) => Vec::new(),
    };

    // A zone that answers neither MX nor NS is effectively dark to us.
    if mx_records.is_empty() && ns_records.is_empty() {
        return Err(LookupError::Unreachable(domain));
    }

    let inferred_mail_provider = infer_mail_provider(&mx_records, config);
    let hosting_provider = infer_hosting_provider(&ns_records, config);

    let registration_date = match lookup_registration_date(&domain).await {
        Ok(date) => date,
        Err(e) => {
            warn!("WHOIS registration lookup failed for {}: {}", domain, e);
            None
        }
    };

    let ssl_expiry = match lookup_ssl_expiry(&domain, config).await {
        Ok(expiry) => expiry,
        Err(e) => {
            warn!("CT log expiry lookup failed for {}: {}", domain, e);
            None
        }
    };

    let tech_stack = match detect_tech_stack(&domain, config).await {
        Ok(stack) => stack,
        Err(e) => {
            debug!("Tech stack detection failed for {}: {}", domain, e);
            BTreeSet::new()
        }
    };

    Ok(DomainSignal {
        domain,
        registration_date,
        ssl_expiry,
        mx_records,
        inferred_mail_provider,
        hosting_provider,
        tech_stack,
    })
}

fn build_resolver(config: &AppConfig) -> TokioAsyncResolver {
    let mut opts = ResolverOpts::default();
    opts.timeout = Duration::from_secs(config.dns.lookup_timeout_secs);
    opts.attempts = 1; // Single attempt, caller owns retry policy
    opts.ip_strategy = LookupIpStrategy::Ipv4thenIpv6;
    TokioAsyncResolver::tokio(ResolverConfig::default(), opts)
}

/// Map the ordered MX hosts onto a mail provider display name. First match
/// in preference order wins; unmatched hosts yield `None`, never a guess.
pub fn infer_mail_provider(mx_records: &[String], config: &AppConfig) -> Option<String> {
    mx_records
        .iter()
        .find_map(|host| config.providers.mail_provider_for(host))
}

/// Map name-server hosts onto a hosting provider display name.
pub fn infer_hosting_provider(ns_records: &[String], config: &AppConfig) -> Option<String> {
    ns_records
        .iter()
        .find_map(|host| config.providers.hosting_provider_for(host))
}

/// WHOIS creation date for the domain, best effort.
async fn lookup_registration_date(domain: &str) -> anyhow::Result<Option<NaiveDate>> {
    let whois = WhoIs::from_string(
        r#"{
            "com": "whois.verisign-grs.com",
            "net": "whois.verisign-grs.com",
            "org": "whois.pir.org",
            "": "whois.iana.org"
        }"#,
    )
    .map_err(|e| anyhow::anyhow!("Failed to create WHOIS client: {}", e))?;

    let options = WhoIsLookupOptions::from_string(domain)
        .map_err(|e| anyhow::anyhow!("Invalid domain for WHOIS lookup: {}", e))?;

    let raw = tokio::time::timeout(
        Duration::from_secs(10),
        whois.lookup_async(options),
    )
    .await
    .map_err(|_| anyhow::anyhow!("WHOIS lookup timed out"))?
    .map_err(|e| anyhow::anyhow!("WHOIS lookup failed: {}", e))?;

    Ok(parse_registration_date(&raw))
}

/// Pull the creation date out of a raw WHOIS response. Registries disagree
/// on both field names and date formats.
pub fn parse_registration_date(raw: &str) -> Option<NaiveDate> {
    let captured = WHOIS_CREATION_REGEX.captures(raw)?;
    let value = captured[1].trim_end_matches(',');

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.fZ", "%Y-%m-%d", "%d-%b-%Y", "%Y.%m.%d"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }
    None
}

/// Latest certificate expiry for the domain, from crt.sh.
async fn lookup_ssl_expiry(
    domain: &str,
    config: &AppConfig,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    let url = format!("https://crt.sh/?q={}&output=json", domain);
    debug!("Querying crt.sh: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.request_timeout_secs))
        .user_agent(&config.http.user_agent)
        .build()?;

    let entries: Vec<CrtShEntry> = client.get(&url).send().await?.json().await?;

    let latest = entries
        .iter()
        .filter_map(|e| e.not_after.as_deref())
        .filter_map(parse_cert_timestamp)
        .max();

    Ok(latest)
}

fn parse_cert_timestamp(value: &str) -> Option<DateTime<Utc>> {
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc());
        }
    }
    None
}

/// Detect technology-stack markers from the landing page response: server
/// headers and a few well-known generator/platform fingerprints in the HTML.
async fn detect_tech_stack(
    domain: &str,
    config: &AppConfig,
) -> anyhow::Result<BTreeSet<String>> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http.request_timeout_secs))
        .user_agent(&config.http.user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()?;

    let response = client.get(format!("https://{}", domain)).send().await?;

    let mut stack = BTreeSet::new();

    for header in ["server", "x-powered-by", "x-generator"] {
        if let Some(value) = response.headers().get(header).and_then(|v| v.to_str().ok()) {
            // "nginx/1.24.0" -> "nginx"
            let name = value.split(['/', ' ']).next().unwrap_or(value).trim();
            if !name.is_empty() {
                stack.insert(name.to_string());
            }
        }
    }

    let body = response.text().await.unwrap_or_default();
    stack.extend(detect_html_markers(&body));

    Ok(stack)
}

/// Platform fingerprints visible in page markup.
pub fn detect_html_markers(html: &str) -> BTreeSet<String> {
    let markers: &[(&str, &str)] = &[
        ("wp-content", "WordPress"),
        ("wp-includes", "WordPress"),
        ("cdn.shopify.com", "Shopify"),
        ("squarespace.com", "Squarespace"),
        ("static.wixstatic.com", "Wix"),
        ("hs-scripts.com", "HubSpot"),
        ("assets.squarespace.com", "Squarespace"),
        ("__NEXT_DATA__", "Next.js"),
        ("data-reactroot", "React"),
        ("ng-version", "Angular"),
        ("drupal-", "Drupal"),
        ("gtag(", "Google Analytics"),
        ("googletagmanager.com", "Google Tag Manager"),
    ];

    markers
        .iter()
        .filter(|(needle, _)| html.contains(needle))
        .map(|(_, name)| name.to_string())
        .collect()
}
