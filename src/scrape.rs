//! Website scraping and candidate extraction
//!
//! Turns raw, noisy HTML into zero or more validated field candidates:
//! - company name (og:site_name, title tag patterns, prominent heading)
//! - phone number
//! - postal address (script-content filter, cleaning, shape gate, decomposition)
//! - industry hint
//!
//! The extractor owns all text-quality decisions. A candidate that leaves this
//! module is already safe to offer to reconciliation; a rejected candidate
//! never reaches the profile.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;
use crate::domain_utils;
use crate::profile::{Candidate, CandidateSource, ProfileField};

/// Typed failure for the page fetch itself.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Could not reach {domain}: {reason}")]
    Unreachable { domain: String, reason: String },

    #[error("Response for {domain} is not HTML (content-type: {content_type})")]
    NonHtml { domain: String, content_type: String },

    #[error("Response body for {domain} exceeds {limit} bytes")]
    TooLarge { domain: String, limit: u64 },
}

/// Why an address candidate was rejected before reaching reconciliation.
#[derive(Error, Debug, PartialEq)]
pub enum ExtractionRejected {
    #[error("Candidate text contains embedded script/style content")]
    ScriptContentSuspected,

    #[error("Candidate text failed shape validation (needs a digit, a word and length > 5)")]
    ShapeInvalid,
}

/// Outcome of a successful scrape: zero or more pre-validated candidates.
#[derive(Debug, Clone, Default)]
pub struct ScrapeResult {
    pub candidates: Vec<Candidate>,
}

static HTML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static HTML_COMMENT_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());

static SCRIPT_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").unwrap());

static STYLE_BLOCK_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").unwrap());

// Variable-declaration patterns are the most common residue of naive text
// extraction pulling in inline <script> bodies.
static VAR_DECL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:var|let|const)\s+[A-Za-z_$][\w$]*\s*[=;]").unwrap());

static PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+?1[\s.\-]?)?\(?\d{3}\)?[\s.\-]\d{3}[\s.\-]\d{4}\b").unwrap()
});

// Street-number-first address shape in running text, e.g.
// "742 Evergreen Terrace, Springfield, IL 62704"
static INLINE_ADDRESS_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b\d{1,6}\s+[A-Za-z][A-Za-z0-9 .'\-]*(?:,\s*[A-Za-z][A-Za-z .'\-]*){1,3},?\s*(?:[A-Za-z]{2}\s+)?\d{5}(?:-\d{4})?\b").unwrap()
});

static STATE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([A-Za-z]{2})\s").unwrap());

static POSTAL_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{5}(?:-\d{4})?)\b").unwrap());

/// Tell-tale markers of embedded script/style blocks and third-party
/// form-widget settings blobs. Any hit disqualifies an address candidate.
const SCRIPT_CONTENT_MARKERS: &[&str] = &[
    "<![CDATA[",
    "function(",
    "function (",
    "window.",
    "document.",
    "wpforms_settings",
    "hbspt.forms",
    "gform_",
    "grecaptcha",
    "dataLayer",
    "=>",
    "{\"",
];

const INDUSTRY_KEYWORDS: &[&str] = &[
    "manufacturing",
    "healthcare",
    "insurance",
    "construction",
    "logistics",
    "accounting",
    "real estate",
    "law firm",
    "legal services",
    "financial services",
    "education",
    "hospitality",
    "restaurant",
    "retail",
    "software",
    "engineering",
    "consulting",
];

/// Fetch the landing page for a normalized domain, trying HTTPS first and
/// falling back to plain HTTP.
pub async fn fetch_page(domain: &str, config: &AppConfig) -> Result<String, FetchError> {
    let domain = domain_utils::normalize_domain(domain);

    if let Some(base) = &config.scrape.base_url {
        return fetch_url(&domain, base, config).await;
    }

    match fetch_url(&domain, &format!("https://{}", domain), config).await {
        Ok(body) => Ok(body),
        Err(FetchError::Unreachable { reason, .. }) => {
            debug!("HTTPS fetch failed for {}, trying HTTP: {}", domain, reason);
            fetch_url(&domain, &format!("http://{}", domain), config)
                .await
                .map_err(|e| match e {
                    FetchError::Unreachable { domain, reason: r2 } => FetchError::Unreachable {
                        domain,
                        reason: format!("HTTPS: {}, HTTP: {}", reason, r2),
                    },
                    other => other,
                })
        }
        Err(other) => Err(other),
    }
}

/// One fetch attempt against an explicit URL.
///
/// Fails fast with a typed error when the site is unreachable, serves a
/// non-HTML content type, or the body exceeds the configured size cap.
pub async fn fetch_url(
    domain: &str,
    url: &str,
    config: &AppConfig,
) -> Result<String, FetchError> {
    debug!("Fetching page for scrape: {}", url);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.scrape.timeout_secs))
        .user_agent(&config.http.user_agent)
        .redirect(reqwest::redirect::Policy::limited(5))
        .build()
        .map_err(|e| FetchError::Unreachable {
            domain: domain.to_string(),
            reason: e.to_string(),
        })?;

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Unreachable {
            domain: domain.to_string(),
            reason: e.to_string(),
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Unreachable {
            domain: domain.to_string(),
            reason: format!("status {}", response.status()),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    if !content_type.is_empty() && !content_type.contains("html") {
        return Err(FetchError::NonHtml {
            domain: domain.to_string(),
            content_type,
        });
    }

    if let Some(len) = response.content_length() {
        if len > config.scrape.max_body_bytes {
            return Err(FetchError::TooLarge {
                domain: domain.to_string(),
                limit: config.scrape.max_body_bytes,
            });
        }
    }

    let body = response.text().await.map_err(|e| FetchError::Unreachable {
        domain: domain.to_string(),
        reason: format!("failed to read body: {}", e),
    })?;

    if body.len() as u64 > config.scrape.max_body_bytes {
        return Err(FetchError::TooLarge {
            domain: domain.to_string(),
            limit: config.scrape.max_body_bytes,
        });
    }

    Ok(body)
}

/// Fetch and extract in one step.
pub async fn scrape_domain(domain: &str, config: &AppConfig) -> Result<ScrapeResult, FetchError> {
    let html = fetch_page(domain, config).await?;
    Ok(extract_candidates(&html, domain))
}

/// Extract validated field candidates from HTML content. Pure; never fails -
/// unusable input just yields fewer (or zero) candidates.
pub fn extract_candidates(html: &str, domain: &str) -> ScrapeResult {
    let document = Html::parse_document(html);
    let mut candidates = Vec::new();

    if let Some(name) = extract_company_name(&document) {
        debug!("Scrape found name candidate for {}: {}", domain, name);
        candidates.push(Candidate::new(ProfileField::Name, name, CandidateSource::Scrape));
    }

    if let Some(phone) = extract_phone(&document, html) {
        debug!("Scrape found phone candidate for {}: {}", domain, phone);
        candidates.push(Candidate::new(ProfileField::Phone, phone, CandidateSource::Scrape));
    }

    if let Some(address) = extract_address(&document, html) {
        debug!("Scrape found address candidate for {}: {}", domain, address);
        candidates.extend(decompose_address(&address));
        candidates.push(Candidate::new(
            ProfileField::LegacyAddress,
            address,
            CandidateSource::Scrape,
        ));
    }

    if let Some(industry) = extract_industry_hint(html) {
        debug!("Scrape found industry hint for {}: {}", domain, industry);
        candidates.push(Candidate::new(
            ProfileField::Industry,
            industry,
            CandidateSource::Scrape,
        ));
    }

    ScrapeResult { candidates }
}

/// Best-effort company name: og:site_name, then title tag patterns, then the
/// first prominent heading.
fn extract_company_name(document: &Html) -> Option<String> {
    if let Some(site_name) = get_meta_property(document, "og:site_name") {
        if is_plausible_name(&site_name) {
            return Some(collapse_whitespace(&site_name));
        }
    }

    if let Some(title) = get_first_text(document, "title") {
        if let Some(name) = name_from_title(&title) {
            return Some(name);
        }
    }

    if let Some(heading) = get_first_text(document, "h1") {
        let heading = collapse_whitespace(&heading);
        if is_plausible_name(&heading) && !looks_like_page_name(&heading) {
            return Some(heading);
        }
    }

    None
}

/// Title patterns: "Product | Company", "Product - Company", "Company: Product",
/// or a short bare title.
fn name_from_title(title: &str) -> Option<String> {
    let title = collapse_whitespace(title);
    if title.len() < 3 {
        return None;
    }

    let right_separators = [" | ", " - ", " \u{2013} ", " \u{2014} "];
    for sep in right_separators {
        if let Some((_, right)) = title.split_once(sep) {
            let right = right.trim();
            if is_plausible_name(right) && !looks_like_page_name(right) {
                return Some(right.to_string());
            }
        }
    }

    let left_separators = [": ", " :: "];
    for sep in left_separators {
        if let Some((left, _)) = title.split_once(sep) {
            let left = left.trim();
            if is_plausible_name(left) && !looks_like_page_name(left) {
                return Some(left.to_string());
            }
        }
    }

    if title.len() < 50 && is_plausible_name(&title) && !looks_like_page_name(&title) {
        return Some(title);
    }

    None
}

/// First phone-number pattern in visible text, also checking tel: links.
fn extract_phone(document: &Html, raw_html: &str) -> Option<String> {
    if let Ok(selector) = Selector::parse(r#"a[href^="tel:"]"#) {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                let number = href.trim_start_matches("tel:").trim();
                if number.chars().filter(|c| c.is_ascii_digit()).count() >= 10 {
                    // Prefer the human-formatted link text when it matches
                    let text = collapse_whitespace(&element.text().collect::<String>());
                    if PHONE_REGEX.is_match(&text) {
                        return Some(text);
                    }
                    return Some(number.to_string());
                }
            }
        }
    }

    let text = visible_text(raw_html);
    PHONE_REGEX
        .find(&text)
        .map(|m| m.as_str().trim().to_string())
}

/// Locate and validate an address candidate. Candidates come from, in order:
/// `<address>` elements, elements with address-ish class/id, the footer, and
/// finally an inline pattern scan. The first candidate that survives the
/// script filter and the shape gate wins.
fn extract_address(document: &Html, raw_html: &str) -> Option<String> {
    let mut raw_candidates: Vec<String> = Vec::new();

    for sel_str in [
        "address",
        "[class*=\"address\"]",
        "[id*=\"address\"]",
        "footer",
    ] {
        if let Ok(selector) = Selector::parse(sel_str) {
            for element in document.select(&selector) {
                raw_candidates.push(element.text().collect::<String>());
            }
        }
    }

    // Fall back to scanning the visible text for an inline street-first shape.
    if let Some(m) = INLINE_ADDRESS_REGEX.find(&visible_text(raw_html)) {
        raw_candidates.push(m.as_str().to_string());
    }

    for raw in raw_candidates {
        match validate_address_candidate(&raw) {
            Ok(cleaned) => {
                // Footer text often carries more than the address; narrow to
                // the inline shape when one is present.
                if let Some(m) = INLINE_ADDRESS_REGEX.find(&cleaned) {
                    return Some(m.as_str().trim().to_string());
                }
                return Some(cleaned);
            }
            Err(reason) => {
                debug!("Address candidate rejected ({}): {:.60}", reason, raw);
            }
        }
    }

    None
}

/// Script filter, cleaning and shape gate for one raw address candidate.
pub fn validate_address_candidate(raw: &str) -> Result<String, ExtractionRejected> {
    if contains_script_content(raw) {
        return Err(ExtractionRejected::ScriptContentSuspected);
    }

    let cleaned = clean_candidate(raw);

    let has_digit = cleaned.chars().any(|c| c.is_ascii_digit());
    let has_word = cleaned
        .split_whitespace()
        .any(|token| token.chars().any(|c| c.is_alphabetic()));
    if !has_digit || !has_word || cleaned.len() <= 5 {
        return Err(ExtractionRejected::ShapeInvalid);
    }

    Ok(cleaned)
}

/// Markers of embedded script/style blocks. These are common false positives
/// from naive text extraction and must never reach the profile.
pub fn contains_script_content(text: &str) -> bool {
    SCRIPT_CONTENT_MARKERS.iter().any(|m| text.contains(m)) || VAR_DECL_REGEX.is_match(text)
}

/// Strip tags and comment/script residue, collapse whitespace, trim.
fn clean_candidate(raw: &str) -> String {
    let without_comments = HTML_COMMENT_REGEX.replace_all(raw, " ");
    let without_tags = HTML_TAG_REGEX.replace_all(&without_comments, " ");
    collapse_whitespace(&without_tags)
}

/// Decompose a validated address string into components using ordered
/// pattern extraction. Components that fail to match are omitted, never
/// defaulted.
pub fn decompose_address(address: &str) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    let segments: Vec<&str> = address
        .split([',', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if let Some(street) = segments.first() {
        candidates.push(Candidate::new(
            ProfileField::StreetAddress,
            street.to_string(),
            CandidateSource::Scrape,
        ));
    }

    if let Some(city) = segments.get(1) {
        candidates.push(Candidate::new(
            ProfileField::City,
            city.to_string(),
            CandidateSource::Scrape,
        ));
    }

    // State and postal code are matched in the remainder after the city so a
    // short street token ("St ") cannot masquerade as a state.
    let remainder = if segments.len() > 2 {
        segments[2..].join(", ")
    } else {
        address.to_string()
    };

    if let Some(caps) = STATE_REGEX.captures(&remainder) {
        candidates.push(Candidate::new(
            ProfileField::State,
            caps[1].to_uppercase(),
            CandidateSource::Scrape,
        ));
    }

    if let Some(caps) = POSTAL_CODE_REGEX.captures(&remainder) {
        candidates.push(Candidate::new(
            ProfileField::PostalCode,
            caps[1].to_string(),
            CandidateSource::Scrape,
        ));
    }

    // Country: trailing segment, only when it carries no digits.
    if segments.len() > 2 {
        if let Some(last) = segments.last() {
            if !last.chars().any(|c| c.is_ascii_digit()) {
                candidates.push(Candidate::new(
                    ProfileField::Country,
                    last.to_string(),
                    CandidateSource::Scrape,
                ));
            }
        }
    }

    candidates
}

/// Industry hint: first recognizable keyword in visible text, passed through
/// unprocessed.
fn extract_industry_hint(raw_html: &str) -> Option<String> {
    let text = visible_text(raw_html).to_lowercase();
    INDUSTRY_KEYWORDS
        .iter()
        .find(|kw| text.contains(*kw))
        .map(|kw| kw.to_string())
}

fn get_meta_property(document: &Html, property: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[property="{}"]"#, property)).ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.to_string())
}

fn get_first_text(document: &Html, selector_str: &str) -> Option<String> {
    let selector = Selector::parse(selector_str).ok()?;
    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
}

/// Page text with script/style blocks, comments and tags stripped.
fn visible_text(html: &str) -> String {
    let no_scripts = SCRIPT_BLOCK_REGEX.replace_all(html, " ");
    let no_styles = STYLE_BLOCK_REGEX.replace_all(&no_scripts, " ");
    let no_comments = HTML_COMMENT_REGEX.replace_all(&no_styles, " ");
    let no_tags = HTML_TAG_REGEX.replace_all(&no_comments, " ");
    collapse_whitespace(&no_tags)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<&str>>().join(" ")
}

fn is_plausible_name(name: &str) -> bool {
    let name = name.trim();
    if name.len() < 2 || name.len() > 100 {
        return false;
    }
    if !name
        .chars()
        .next()
        .map(|c| c.is_alphanumeric())
        .unwrap_or(false)
    {
        return false;
    }
    if name.chars().all(|c| c.is_numeric() || c.is_whitespace()) {
        return false;
    }

    let invalid_names = [
        "home", "welcome", "about", "contact", "login", "sign in", "sign up",
        "404", "error", "page not found", "undefined", "null", "loading",
        "loading...", "please wait", "redirecting",
    ];
    let lower = name.to_lowercase();
    !invalid_names.iter().any(|inv| lower == *inv)
}

// Matches whole word tokens only, so "Signature Bank" is not flagged by
// "sign" and "Newsome & Co" is not flagged by "news".
fn looks_like_page_name(name: &str) -> bool {
    let page_words = [
        "home", "welcome", "about", "contact", "login", "sign", "register",
        "dashboard", "settings", "blog", "news", "products", "services",
        "pricing", "support", "help", "faq", "privacy", "terms", "careers",
    ];
    name.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .any(|token| page_words.contains(&token.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values_for(result: &ScrapeResult, field: ProfileField) -> Vec<&str> {
        result
            .candidates
            .iter()
            .filter(|c| c.field == field)
            .map(|c| c.value.as_str())
            .collect()
    }

    #[test]
    fn test_script_content_rejected_regardless_of_shape() {
        let blobs = [
            "var wpforms_settings = {\"val_required\":\"This field is required\"}; 123 Fake St",
            "742 Evergreen Terrace <![CDATA[ alert(1) ]]> Springfield",
            "const addr = '123 Main St'; Springfield IL 62704",
            "hbspt.forms.create({ portalId: 1234567 }); 500 Oak Ave",
            // Bare declaration with no initializer
            "var spinnerState; 500 Oak Ave, Springfield, IL 62704",
        ];
        for blob in blobs {
            assert_eq!(
                validate_address_candidate(blob),
                Err(ExtractionRejected::ScriptContentSuspected),
                "should reject: {}",
                blob
            );
        }
    }

    #[test]
    fn test_shape_gate() {
        assert!(validate_address_candidate("123 Main St, Springfield, IL 62704").is_ok());
        assert_eq!(
            validate_address_candidate("Click here"),
            Err(ExtractionRejected::ShapeInvalid)
        );
        assert_eq!(
            validate_address_candidate("1a2"),
            Err(ExtractionRejected::ShapeInvalid)
        );
        assert_eq!(
            validate_address_candidate("1234567890"),
            Err(ExtractionRejected::ShapeInvalid)
        );
        assert_eq!(
            validate_address_candidate(""),
            Err(ExtractionRejected::ShapeInvalid)
        );
    }

    #[test]
    fn test_clean_strips_tags_and_comments() {
        let cleaned =
            validate_address_candidate("<p>742 Evergreen <!-- note --> Terrace,\n Springfield</p>")
                .unwrap();
        assert_eq!(cleaned, "742 Evergreen Terrace, Springfield");
    }

    #[test]
    fn test_decompose_full_address() {
        let candidates = decompose_address("742 Evergreen Terrace, Springfield, IL 62704");
        let get = |field: ProfileField| {
            candidates
                .iter()
                .find(|c| c.field == field)
                .map(|c| c.value.as_str())
        };
        assert_eq!(get(ProfileField::StreetAddress), Some("742 Evergreen Terrace"));
        assert_eq!(get(ProfileField::City), Some("Springfield"));
        assert_eq!(get(ProfileField::State), Some("IL"));
        assert_eq!(get(ProfileField::PostalCode), Some("62704"));
        // Trailing segment contains digits, so no country is emitted
        assert_eq!(get(ProfileField::Country), None);
    }

    #[test]
    fn test_decompose_with_country_and_zip4() {
        let candidates =
            decompose_address("1 Infinite Loop, Cupertino, CA 95014-2083, United States");
        let get = |field: ProfileField| {
            candidates
                .iter()
                .find(|c| c.field == field)
                .map(|c| c.value.as_str())
        };
        assert_eq!(get(ProfileField::State), Some("CA"));
        assert_eq!(get(ProfileField::PostalCode), Some("95014-2083"));
        assert_eq!(get(ProfileField::Country), Some("United States"));
    }

    #[test]
    fn test_decompose_partial_address_omits_missing_components() {
        let candidates = decompose_address("742 Evergreen Terrace");
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].field, ProfileField::StreetAddress);
    }

    #[test]
    fn test_extract_candidates_full_page() {
        let html = r#"
        <html>
        <head><title>Widgets &amp; More | Acme Widgets</title></head>
        <body>
            <h1>Precision manufacturing since 1947</h1>
            <p>Call us: (555) 867-5309</p>
            <footer>
                <address>742 Evergreen Terrace, Springfield, IL 62704</address>
            </footer>
        </body>
        </html>
        "#;

        let result = extract_candidates(html, "acmewidgets.com");
        assert_eq!(values_for(&result, ProfileField::Name), vec!["Acme Widgets"]);
        assert_eq!(values_for(&result, ProfileField::Phone), vec!["(555) 867-5309"]);
        assert_eq!(
            values_for(&result, ProfileField::StreetAddress),
            vec!["742 Evergreen Terrace"]
        );
        assert_eq!(values_for(&result, ProfileField::City), vec!["Springfield"]);
        assert_eq!(values_for(&result, ProfileField::State), vec!["IL"]);
        assert_eq!(values_for(&result, ProfileField::PostalCode), vec!["62704"]);
        assert!(values_for(&result, ProfileField::Country).is_empty());
        assert_eq!(
            values_for(&result, ProfileField::Industry),
            vec!["manufacturing"]
        );
    }

    #[test]
    fn test_extract_candidates_ignores_script_address_blob() {
        // An inline form-widget settings blob near digits must not produce
        // an address candidate.
        let html = r#"
        <html>
        <body>
            <div class="address">
                <script>var wpforms_settings = {"form":"123 Fake St, Nowhere, ZZ 00000"};</script>
            </div>
        </body>
        </html>
        "#;
        let result = extract_candidates(html, "example.com");
        assert!(values_for(&result, ProfileField::StreetAddress).is_empty());
        assert!(values_for(&result, ProfileField::LegacyAddress).is_empty());
    }

    #[test]
    fn test_extract_candidates_empty_page() {
        let result = extract_candidates("<html><body></body></html>", "example.com");
        assert!(result.candidates.is_empty());
    }

    #[test]
    fn test_name_from_title_patterns() {
        assert_eq!(
            name_from_title("Product Name | Acme Corporation").as_deref(),
            Some("Acme Corporation")
        );
        assert_eq!(
            name_from_title("Acme Corporation: The Product").as_deref(),
            Some("Acme Corporation")
        );
        assert_eq!(name_from_title("Acme Corporation").as_deref(), Some("Acme Corporation"));
        assert_eq!(name_from_title("Welcome"), None);
        assert_eq!(name_from_title("Loading..."), None);
    }

    #[test]
    fn test_names_containing_page_word_fragments_kept() {
        // Page words only disqualify whole tokens, not substrings of a name
        assert_eq!(
            name_from_title("Welcome | Signature Bank").as_deref(),
            Some("Signature Bank")
        );
        assert_eq!(name_from_title("Newsome & Co").as_deref(), Some("Newsome & Co"));
        assert_eq!(name_from_title("Acme | Contact Us"), None);
    }

    #[test]
    fn test_phone_from_tel_link() {
        let html = r#"
        <html><body>
            <a href="tel:+15558675309">(555) 867-5309</a>
        </body></html>
        "#;
        let document = Html::parse_document(html);
        assert_eq!(extract_phone(&document, html).as_deref(), Some("(555) 867-5309"));
    }

    #[test]
    fn test_phone_absent() {
        let html = "<html><body>No numbers here</body></html>";
        let document = Html::parse_document(html);
        assert_eq!(extract_phone(&document, html), None);
    }

    #[test]
    fn test_og_site_name_preferred_over_title() {
        let html = r#"
        <html>
        <head>
            <meta property="og:site_name" content="Acme Widgets Inc">
            <title>Some Landing Page | Acme</title>
        </head>
        <body></body>
        </html>
        "#;
        let result = extract_candidates(html, "acmewidgets.com");
        assert_eq!(values_for(&result, ProfileField::Name), vec!["Acme Widgets Inc"]);
    }
}
