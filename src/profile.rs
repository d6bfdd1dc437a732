//! Core data model: the company profile, per-field provenance, and the
//! candidate values the three signal sources feed into reconciliation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain_utils;

/// A single profile field that sources may suggest values for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    Website,
    Industry,
    EmployeeCountBucket,
    Phone,
    StreetAddress,
    City,
    State,
    PostalCode,
    Country,
    LegacyAddress,
}

impl std::fmt::Display for ProfileField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ProfileField::Name => "name",
            ProfileField::Website => "website",
            ProfileField::Industry => "industry",
            ProfileField::EmployeeCountBucket => "employee_count_bucket",
            ProfileField::Phone => "phone",
            ProfileField::StreetAddress => "street_address",
            ProfileField::City => "city",
            ProfileField::State => "state",
            ProfileField::PostalCode => "postal_code",
            ProfileField::Country => "country",
            ProfileField::LegacyAddress => "legacy_address",
        };
        write!(f, "{}", s)
    }
}

/// Which automatic source proposed a candidate value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CandidateSource {
    DomainSignal,
    Scrape,
    Enrichment,
}

impl CandidateSource {
    /// In-pass precedence when multiple sources compete for the same field.
    /// Higher wins: enrichment > scrape > domain.
    pub fn precedence(&self) -> u8 {
        match self {
            CandidateSource::Enrichment => 3,
            CandidateSource::Scrape => 2,
            CandidateSource::DomainSignal => 1,
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::DomainSignal => write!(f, "domain_signal"),
            CandidateSource::Scrape => write!(f, "scrape"),
            CandidateSource::Enrichment => write!(f, "enrichment"),
        }
    }
}

/// Recorded origin of a field's current value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Origin {
    #[default]
    Unset,
    DomainSuggested,
    EnrichmentSuggested,
    ScrapeSuggested,
    /// The operator typed into this field. Absorbing: no automatic source
    /// may overwrite the field afterwards.
    UserEdited,
}

impl From<CandidateSource> for Origin {
    fn from(source: CandidateSource) -> Self {
        match source {
            CandidateSource::DomainSignal => Origin::DomainSuggested,
            CandidateSource::Scrape => Origin::ScrapeSuggested,
            CandidateSource::Enrichment => Origin::EnrichmentSuggested,
        }
    }
}

impl Origin {
    /// Precedence of the automatic source behind this origin, if any.
    pub fn source_precedence(&self) -> Option<u8> {
        match self {
            Origin::EnrichmentSuggested => Some(CandidateSource::Enrichment.precedence()),
            Origin::ScrapeSuggested => Some(CandidateSource::Scrape.precedence()),
            Origin::DomainSuggested => Some(CandidateSource::DomainSignal.precedence()),
            Origin::Unset | Origin::UserEdited => None,
        }
    }
}

/// One proposed value for one profile field, tagged with its source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub field: ProfileField,
    pub value: String,
    pub source: CandidateSource,
}

impl Candidate {
    pub fn new(field: ProfileField, value: impl Into<String>, source: CandidateSource) -> Self {
        Candidate {
            field,
            value: value.into(),
            source,
        }
    }
}

/// Provenance record for a single profile field.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FieldProvenance {
    pub origin: Origin,
    /// The value most recently offered by a non-user source. Comparing the
    /// stored field against this (never a recomputed suggestion) is how the
    /// engine decides whether the operator has diverged from the auto-fill.
    pub last_suggested_value: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    /// Collection pass that produced the current auto-fill. Lets the engine
    /// enforce source precedence among completions of the same pass.
    #[serde(default)]
    pub accepted_pass: Option<u64>,
}

/// Per-field provenance for a whole profile.
pub type ProvenanceMap = HashMap<ProfileField, FieldProvenance>;

/// Structured postal address. Components that could not be decomposed stay
/// `None`; they are never defaulted.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct PostalAddress {
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// The authoritative company record under reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompanyProfile {
    pub name: Option<String>,
    /// Always stored fully qualified (scheme prepended if absent).
    pub website: Option<String>,
    pub industry: Option<String>,
    pub employee_count_bucket: Option<String>,
    pub phone: Option<String>,
    pub address: PostalAddress,
    /// Free-form address string kept for backward display.
    pub legacy_address: Option<String>,
}

impl CompanyProfile {
    /// Create the empty profile for a new assessment, knowing only the website.
    pub fn for_website(website: &str) -> Self {
        CompanyProfile {
            website: Some(domain_utils::qualify_website(website)),
            ..Default::default()
        }
    }

    pub fn get(&self, field: ProfileField) -> Option<&str> {
        match field {
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Website => self.website.as_deref(),
            ProfileField::Industry => self.industry.as_deref(),
            ProfileField::EmployeeCountBucket => self.employee_count_bucket.as_deref(),
            ProfileField::Phone => self.phone.as_deref(),
            ProfileField::StreetAddress => self.address.street_address.as_deref(),
            ProfileField::City => self.address.city.as_deref(),
            ProfileField::State => self.address.state.as_deref(),
            ProfileField::PostalCode => self.address.postal_code.as_deref(),
            ProfileField::Country => self.address.country.as_deref(),
            ProfileField::LegacyAddress => self.legacy_address.as_deref(),
        }
    }

    /// Website values are qualified on the way in so the invariant holds
    /// regardless of which source set the field.
    pub fn set(&mut self, field: ProfileField, value: String) {
        let value = match field {
            ProfileField::Website => domain_utils::qualify_website(&value),
            _ => value,
        };
        let slot = match field {
            ProfileField::Name => &mut self.name,
            ProfileField::Website => &mut self.website,
            ProfileField::Industry => &mut self.industry,
            ProfileField::EmployeeCountBucket => &mut self.employee_count_bucket,
            ProfileField::Phone => &mut self.phone,
            ProfileField::StreetAddress => &mut self.address.street_address,
            ProfileField::City => &mut self.address.city,
            ProfileField::State => &mut self.address.state,
            ProfileField::PostalCode => &mut self.address.postal_code,
            ProfileField::Country => &mut self.address.country,
            ProfileField::LegacyAddress => &mut self.legacy_address,
        };
        *slot = Some(value);
    }
}

/// Normalized company record returned by the enrichment lookup service.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CompanyFacts {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<String>,
    pub founded: Option<u16>,
    pub annual_revenue_bucket: Option<String>,
    #[serde(default)]
    pub social_profiles: Vec<String>,
}

impl CompanyFacts {
    /// Flatten facts into field candidates for reconciliation.
    pub fn to_candidates(&self) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        if let Some(name) = &self.name {
            candidates.push(Candidate::new(
                ProfileField::Name,
                name.clone(),
                CandidateSource::Enrichment,
            ));
        }
        if let Some(industry) = &self.industry {
            candidates.push(Candidate::new(
                ProfileField::Industry,
                industry.clone(),
                CandidateSource::Enrichment,
            ));
        }
        if let Some(count) = &self.employee_count {
            candidates.push(Candidate::new(
                ProfileField::EmployeeCountBucket,
                count.clone(),
                CandidateSource::Enrichment,
            ));
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_always_fully_qualified() {
        let profile = CompanyProfile::for_website("acme.com");
        assert_eq!(profile.website.as_deref(), Some("https://acme.com"));

        let mut profile = CompanyProfile::default();
        profile.set(ProfileField::Website, "acme.com".to_string());
        assert_eq!(profile.website.as_deref(), Some("https://acme.com"));

        profile.set(ProfileField::Website, "http://acme.com".to_string());
        assert_eq!(profile.website.as_deref(), Some("http://acme.com"));
    }

    #[test]
    fn test_field_get_set_roundtrip() {
        let mut profile = CompanyProfile::default();
        let fields = [
            ProfileField::Name,
            ProfileField::Industry,
            ProfileField::Phone,
            ProfileField::StreetAddress,
            ProfileField::City,
            ProfileField::State,
            ProfileField::PostalCode,
            ProfileField::Country,
            ProfileField::LegacyAddress,
        ];
        for field in fields {
            profile.set(field, format!("value-{}", field));
            assert_eq!(profile.get(field), Some(format!("value-{}", field).as_str()));
        }
    }

    #[test]
    fn test_source_precedence_ordering() {
        assert!(CandidateSource::Enrichment.precedence() > CandidateSource::Scrape.precedence());
        assert!(CandidateSource::Scrape.precedence() > CandidateSource::DomainSignal.precedence());
    }

    #[test]
    fn test_facts_to_candidates() {
        let facts = CompanyFacts {
            name: Some("Acme Widgets Inc".to_string()),
            industry: Some("manufacturing".to_string()),
            employee_count: Some("11-50".to_string()),
            ..Default::default()
        };
        let candidates = facts.to_candidates();
        assert_eq!(candidates.len(), 3);
        assert!(candidates
            .iter()
            .all(|c| c.source == CandidateSource::Enrichment));
    }
}
