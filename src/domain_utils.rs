use once_cell::sync::Lazy;
use regex::Regex;

static DOMAIN_VALIDATION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9\-]{0,62}(\.[a-zA-Z0-9][a-zA-Z0-9\-]{0,62})+$").unwrap()
});

/// Normalize a domain or URL into the bare canonical form the remote services
/// expect: lowercase, no scheme, no `www.` prefix, no path/query/port.
pub fn normalize_domain(input: &str) -> String {
    let mut domain = input.trim().to_lowercase();

    for scheme in ["https://", "http://", "//"] {
        if let Some(rest) = domain.strip_prefix(scheme) {
            domain = rest.to_string();
            break;
        }
    }

    if let Some(rest) = domain.strip_prefix("www.") {
        domain = rest.to_string();
    }

    // Drop path, query, fragment and port
    if let Some(idx) = domain.find(['/', '?', '#']) {
        domain.truncate(idx);
    }
    if let Some(idx) = domain.find(':') {
        domain.truncate(idx);
    }

    domain.trim_end_matches('.').to_string()
}

/// Check whether a normalized domain is syntactically plausible.
/// Requires at least one dot; single labels like "localhost" are rejected.
pub fn is_valid_domain(domain: &str) -> bool {
    !domain.is_empty() && domain.len() <= 253 && DOMAIN_VALIDATION_REGEX.is_match(domain)
}

/// Qualify a website value into a full URL, prepending https:// when the
/// operator or a source supplied a bare domain.
pub fn qualify_website(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

/// Derive a display-cased fallback company name from a domain
/// ("acmewidgets.com" -> "Acmewidgets"). Lowest-priority name source.
pub fn name_from_domain(domain: &str) -> Option<String> {
    let label = normalize_domain(domain);
    let label = label.split('.').next()?;
    if label.is_empty() {
        return None;
    }
    let mut chars = label.chars();
    let first = chars.next()?;
    Some(first.to_uppercase().collect::<String>() + chars.as_str())
}
